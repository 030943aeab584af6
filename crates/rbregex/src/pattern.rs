// Compiled, immutable, shareable pattern handle.
//
// `Pattern` is a cheap clone over an `Arc` of the compiled program and
// capture table. All matching state lives on the caller's stack, so one
// pattern can serve any number of threads concurrently.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::compiler;
use crate::match_result::MatchResult;
use crate::matcher::encoding::RegexEncoding;
use crate::matcher::engine::{MatchLimits, search_program};
use crate::options::Options;
use crate::program::{CaptureTable, Program};
use crate::regex_error::{RegexError, RegexResult};

#[derive(Debug)]
pub(crate) struct PatternInner {
    pub(crate) source: Box<[u8]>,
    pub(crate) options: Options,
    pub(crate) encoding: RegexEncoding,
    pub(crate) program: Program,
    pub(crate) captures: CaptureTable,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    inner: Arc<PatternInner>,
}

impl Pattern {
    /// Compile a pattern from raw source bytes.
    ///
    /// NOENCODING forces the binary encoding regardless of `encoding`.
    /// The source must be valid in the effective encoding.
    pub fn compile(
        source: &[u8],
        options: Options,
        encoding: RegexEncoding,
    ) -> RegexResult<Pattern> {
        let encoding = if options.contains(Options::NOENCODING) {
            RegexEncoding::Binary
        } else {
            encoding
        };
        let (program, captures) = compiler::compile(source, options, encoding)?;
        Ok(Pattern {
            inner: Arc::new(PatternInner {
                source: source.into(),
                options,
                encoding,
                program,
                captures,
            }),
        })
    }

    /// Compile a UTF-8 pattern with no options.
    pub fn new(source: &str) -> RegexResult<Pattern> {
        Pattern::compile(source.as_bytes(), Options::NONE, RegexEncoding::Utf8)
    }

    /// Compile a UTF-8 pattern with options.
    pub fn with_options(source: &str, options: Options) -> RegexResult<Pattern> {
        Pattern::compile(source.as_bytes(), options, RegexEncoding::Utf8)
    }

    /// Scan `subject` for the leftmost match at or after byte offset
    /// `start`. With `anchored_only`, only a match beginning exactly at
    /// `start` is accepted.
    ///
    /// `Err` signals resource exhaustion or an encoding violation, not
    /// "no match".
    pub fn search(
        &self,
        subject: &[u8],
        start: usize,
        anchored_only: bool,
        limits: &MatchLimits,
    ) -> RegexResult<Option<MatchResult>> {
        if self.options().contains(Options::FIXEDENCODING)
            && !self.encoding().validate(subject)
        {
            return Err(RegexError::Encoding(
                "subject is not valid in the pattern encoding".to_string(),
            ));
        }
        let raw = search_program(
            &self.inner.program,
            self.group_count(),
            subject,
            self.encoding(),
            start,
            anchored_only,
            limits,
        )?;
        Ok(raw.map(|raw| MatchResult::from_raw(self.clone(), Arc::from(subject), raw, start)))
    }

    /// Leftmost match in a string subject, with default limits.
    pub fn find(&self, subject: &str) -> RegexResult<Option<MatchResult>> {
        self.search(subject.as_bytes(), 0, false, &MatchLimits::default())
    }

    /// Anchored match attempt at byte offset `at`, with default limits.
    pub fn match_at(&self, subject: &str, at: usize) -> RegexResult<Option<MatchResult>> {
        self.search(subject.as_bytes(), at, true, &MatchLimits::default())
    }

    pub fn is_match(&self, subject: &str) -> RegexResult<bool> {
        Ok(self.find(subject)?.is_some())
    }

    /// The pattern source exactly as given to the compiler.
    pub fn source(&self) -> &[u8] {
        &self.inner.source
    }

    pub fn options(&self) -> Options {
        self.inner.options
    }

    pub fn encoding(&self) -> RegexEncoding {
        self.inner.encoding
    }

    /// Whether IGNORECASE was set at compile time.
    pub fn casefold(&self) -> bool {
        self.options().contains(Options::IGNORECASE)
    }

    pub fn fixed_encoding(&self) -> bool {
        self.options().contains(Options::FIXEDENCODING)
    }

    /// Number of capturing groups, excluding group 0.
    pub fn group_count(&self) -> u32 {
        self.inner.captures.group_count()
    }

    /// Declared group names in first-declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.captures.names()
    }

    /// Name → ordered group index list.
    pub fn named_captures(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.inner.captures.named_captures()
    }

    pub(crate) fn capture_table(&self) -> &CaptureTable {
        &self.inner.captures
    }
}

/// Two patterns are equal when their sources match and their options
/// match ignoring NOENCODING.
impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.inner.source == other.inner.source
            && self.inner.options.bits() & !Options::NOENCODING.bits()
                == other.inner.options.bits() & !Options::NOENCODING.bits()
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.source.hash(state);
        (self.inner.options.bits() & !Options::NOENCODING.bits()).hash(state);
    }
}

/// Ruby-style rendering: `(?mix-mix:source)`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on = self.options().option_string();
        let off: String = "mix".chars().filter(|&c| !on.contains(c)).collect();
        let source = String::from_utf8_lossy(self.source());
        if off.is_empty() {
            write!(f, "(?{}:{})", on, source)
        } else {
            write!(f, "(?{}-{}:{})", on, off, source)
        }
    }
}
