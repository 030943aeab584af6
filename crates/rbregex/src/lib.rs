// Ruby-compatible regular expression engine
// Backtracking matcher with Onigmo-style syntax, captures and encodings

#[cfg(test)]
mod test;

pub mod compiler;
pub mod match_result;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod program;
pub mod quote;
pub mod regex_error;
pub mod union;

pub use match_result::{GroupRef, MatchResult};
pub use matcher::{MatchLimits, RegexEncoding};
pub use options::Options;
pub use pattern::Pattern;
pub use program::CaptureTable;
pub use quote::{quote, quote_str};
pub use regex_error::{RegexError, RegexResult};
pub use union::{UnionItem, union};
