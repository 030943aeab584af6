// Matching: encodings, character classes and the backtracking engine.

pub mod class;
pub mod encoding;
pub mod engine;
pub mod limits;

pub use encoding::RegexEncoding;
pub use engine::{MatchLimits, RawMatch, search_program};
