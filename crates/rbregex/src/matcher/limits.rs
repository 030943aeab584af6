//! Centralized engine limits.
//!
//! All tunable magic numbers that bound compilation and matching are
//! collected here.

/// Default step budget for one `search` call. Every node visit and
/// backtrack counts as a step; exceeding the budget aborts the search
/// with `RegexError::Timeout` instead of letting catastrophic
/// backtracking run unbounded.
pub const DEFAULT_MAX_STEPS: u64 = 1 << 24;

/// Default maximum backtracking recursion depth. Greedy/lazy loops over
/// single-character bodies are iterated, not recursed, so this bounds
/// nesting of groups, alternations and complex quantifier bodies.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// How often (in steps) the cooperative cancellation flag is polled.
pub const CANCEL_POLL_MASK: u64 = 0xFF;

/// Maximum number of capturing groups in one pattern.
pub const MAX_CAPTURE_GROUPS: u32 = 512;

/// Maximum number of nodes in a compiled program.
pub const MAX_PROGRAM_NODES: usize = 1 << 16;

/// Maximum parser recursion depth (prevents stack overflow on
/// pathologically nested patterns).
pub const MAX_PARSE_DEPTH: usize = 200;
