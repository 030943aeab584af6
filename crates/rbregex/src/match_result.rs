// Match result: an immutable snapshot of one successful search.
//
// The result owns its subject bytes and a clone of the pattern handle,
// so it stays valid after the caller's buffer is gone. Group accessors
// take either a numeric index or a name; a name resolves to the last
// group index declared under it.

use std::sync::Arc;

use crate::matcher::engine::RawMatch;
use crate::options::Options;
use crate::pattern::Pattern;
use crate::regex_error::{RegexError, RegexResult};

/// A group designator: `m.begin(2)` or `m.begin("year")`.
#[derive(Debug, Clone, Copy)]
pub enum GroupRef<'a> {
    Index(u32),
    Name(&'a str),
}

impl From<u32> for GroupRef<'static> {
    fn from(index: u32) -> GroupRef<'static> {
        GroupRef::Index(index)
    }
}

impl From<usize> for GroupRef<'static> {
    fn from(index: usize) -> GroupRef<'static> {
        // An index beyond u32 can never name a group; saturate so it
        // reports out-of-range instead of wrapping onto a real group.
        GroupRef::Index(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> GroupRef<'a> {
        GroupRef::Name(name)
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pattern: Pattern,
    subject: Arc<[u8]>,
    start: usize,
    end: usize,
    // Byte spans for groups 1..=group_count.
    spans: Vec<Option<(usize, usize)>>,
    search_start: usize,
}

impl MatchResult {
    pub(crate) fn from_raw(
        pattern: Pattern,
        subject: Arc<[u8]>,
        raw: RawMatch,
        search_start: usize,
    ) -> MatchResult {
        MatchResult {
            pattern,
            subject,
            start: raw.start,
            end: raw.end,
            spans: raw.slots,
            search_start,
        }
    }

    /// Resolve a group designator to a numeric index.
    fn resolve(&self, group: GroupRef<'_>) -> RegexResult<u32> {
        match group {
            GroupRef::Index(index) => {
                if index <= self.group_count() {
                    Ok(index)
                } else {
                    Err(RegexError::Index(format!(
                        "index {} out of matches",
                        index
                    )))
                }
            }
            GroupRef::Name(name) => self
                .pattern
                .capture_table()
                .last_index_for(name)
                .ok_or_else(|| {
                    RegexError::Name(format!("undefined group name reference: {}", name))
                }),
        }
    }

    fn span(&self, index: u32) -> Option<(usize, usize)> {
        if index == 0 {
            Some((self.start, self.end))
        } else {
            self.spans[index as usize - 1]
        }
    }

    /// Byte offset where the group begins, or `None` if it did not
    /// participate in the match.
    pub fn group_begin<'a>(&self, group: impl Into<GroupRef<'a>>) -> RegexResult<Option<usize>> {
        let index = self.resolve(group.into())?;
        Ok(self.span(index).map(|(s, _)| s))
    }

    /// Byte offset one past the end of the group.
    pub fn group_end<'a>(&self, group: impl Into<GroupRef<'a>>) -> RegexResult<Option<usize>> {
        let index = self.resolve(group.into())?;
        Ok(self.span(index).map(|(_, e)| e))
    }

    /// `(begin, end)` byte span of the group.
    pub fn offset<'a>(
        &self,
        group: impl Into<GroupRef<'a>>,
    ) -> RegexResult<Option<(usize, usize)>> {
        let index = self.resolve(group.into())?;
        Ok(self.span(index))
    }

    /// The text the group captured, or `None` for a non-participating
    /// group. Index 0 is the whole match.
    pub fn captured<'a>(&self, group: impl Into<GroupRef<'a>>) -> RegexResult<Option<&[u8]>> {
        let index = self.resolve(group.into())?;
        Ok(self.span(index).map(|(s, e)| &self.subject[s..e]))
    }

    /// Whole-match text.
    pub fn matched(&self) -> &[u8] {
        &self.subject[self.start..self.end]
    }

    /// Capture texts for groups 1..=n, in index order.
    pub fn captures(&self) -> Vec<Option<&[u8]>> {
        self.spans
            .iter()
            .map(|span| span.map(|(s, e)| &self.subject[s..e]))
            .collect()
    }

    /// Subject bytes before the match.
    pub fn pre_match(&self) -> &[u8] {
        &self.subject[..self.start]
    }

    /// Subject bytes after the match.
    pub fn post_match(&self) -> &[u8] {
        &self.subject[self.end..]
    }

    pub fn subject(&self) -> &[u8] {
        &self.subject
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Offset the originating search started from.
    pub fn search_start(&self) -> usize {
        self.search_start
    }

    pub fn group_count(&self) -> u32 {
        self.pattern.group_count()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pattern.capture_table().names()
    }

    pub fn named_captures(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.pattern.capture_table().named_captures()
    }
}

/// Two results are equal when they matched the same subject with an
/// equivalent pattern and captured identical texts, group by group.
/// Offsets do not participate: two matches of the same pattern that
/// capture the same substrings at different positions compare equal.
/// NOENCODING is ignored in the option comparison, like pattern
/// equality.
impl PartialEq for MatchResult {
    fn eq(&self, other: &MatchResult) -> bool {
        self.subject == other.subject
            && self.pattern.source() == other.pattern.source()
            && self.pattern.options().bits() & !Options::NOENCODING.bits()
                == other.pattern.options().bits() & !Options::NOENCODING.bits()
            && self.matched() == other.matched()
            && self.spans.len() == other.spans.len()
            && self
                .spans
                .iter()
                .zip(other.spans.iter())
                .all(|(a, b)| {
                    a.map(|(s, e)| &self.subject[s..e]) == b.map(|(s, e)| &other.subject[s..e])
                })
    }
}

impl Eq for MatchResult {}
