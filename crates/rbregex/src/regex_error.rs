/// Engine error taxonomy.
///
/// "No match" is never an error: matching APIs return `Ok(None)` for it.
/// `Syntax` and `Encoding` surface at compile/union time, `Index`/`Name`
/// at group-accessor time, `Timeout` when the step budget is exhausted
/// (or a caller-provided cancel flag is raised) during a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// Malformed pattern, detected at compile time.
    Syntax(String),
    /// Source or subject bytes invalid/incompatible under the declared encoding.
    Encoding(String),
    /// Numeric group reference out of range.
    Index(String),
    /// Unknown group name reference.
    Name(String),
    /// Step budget exceeded or match cancelled; partial state discarded.
    Timeout,
}

pub type RegexResult<T> = Result<T, RegexError>;

impl std::fmt::Display for RegexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegexError::Syntax(msg) => write!(f, "regexp syntax error: {}", msg),
            RegexError::Encoding(msg) => write!(f, "encoding error: {}", msg),
            RegexError::Index(msg) => write!(f, "index error: {}", msg),
            RegexError::Name(msg) => write!(f, "name error: {}", msg),
            RegexError::Timeout => write!(f, "match step budget exceeded"),
        }
    }
}

impl std::error::Error for RegexError {}

impl RegexError {
    pub fn syntax(msg: impl Into<String>) -> RegexError {
        RegexError::Syntax(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> RegexError {
        RegexError::Encoding(msg.into())
    }
}
