// Pattern union: build one pattern that matches any of the inputs.
//
// Plain text items are quoted; pattern items contribute their source
// wrapped in a `(?opts:...)` shell so their options and precedence
// survive the alternation. An empty union compiles to `(?!)`, which
// can never match.

use crate::matcher::encoding::RegexEncoding;
use crate::options::Options;
use crate::pattern::Pattern;
use crate::quote::quote;
use crate::regex_error::{RegexError, RegexResult};

/// One alternative of a union.
#[derive(Debug, Clone, Copy)]
pub enum UnionItem<'a> {
    Pattern(&'a Pattern),
    Text(&'a [u8], RegexEncoding),
}

impl<'a> From<&'a Pattern> for UnionItem<'a> {
    fn from(pattern: &'a Pattern) -> UnionItem<'a> {
        UnionItem::Pattern(pattern)
    }
}

impl<'a> From<&'a str> for UnionItem<'a> {
    fn from(text: &'a str) -> UnionItem<'a> {
        UnionItem::Text(text.as_bytes(), RegexEncoding::Utf8)
    }
}

impl<'a> From<&'a [u8]> for UnionItem<'a> {
    fn from(bytes: &'a [u8]) -> UnionItem<'a> {
        UnionItem::Text(bytes, RegexEncoding::Binary)
    }
}

/// Combine `items` into a single pattern matching any of them.
///
/// Encodings must agree: items that are not pure ASCII must all carry
/// the same encoding, which becomes the result's encoding. An all-ASCII
/// union compiles as UTF-8.
pub fn union(items: &[UnionItem<'_>]) -> RegexResult<Pattern> {
    if items.is_empty() {
        return Pattern::new("(?!)");
    }
    if items.len() == 1 {
        return match &items[0] {
            UnionItem::Pattern(pattern) => Ok((*pattern).clone()),
            UnionItem::Text(bytes, encoding) => {
                Pattern::compile(&quote(bytes), Options::NONE, *encoding)
            }
        };
    }
    let mut source = Vec::new();
    let mut fixed: Option<RegexEncoding> = None;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            source.push(b'|');
        }
        let (piece, encoding) = match item {
            UnionItem::Pattern(pattern) => (wrapped_source(pattern), pattern.encoding()),
            UnionItem::Text(bytes, encoding) => (quote(bytes), *encoding),
        };
        // ASCII-only pieces are compatible with everything.
        if !piece.iter().all(|&b| b < 0x80) {
            match fixed {
                None => fixed = Some(encoding),
                Some(found) if found != encoding => {
                    return Err(RegexError::Encoding(
                        "incompatible encodings in union".to_string(),
                    ));
                }
                _ => {}
            }
        }
        source.extend_from_slice(&piece);
    }
    Pattern::compile(&source, Options::NONE, fixed.unwrap_or(RegexEncoding::Utf8))
}

/// The pattern source wrapped in its option shell, byte-exact.
fn wrapped_source(pattern: &Pattern) -> Vec<u8> {
    let on = pattern.options().option_string();
    let off: String = "mix".chars().filter(|&c| !on.contains(c)).collect();
    let mut out = Vec::with_capacity(pattern.source().len() + 8);
    out.extend_from_slice(b"(?");
    out.extend_from_slice(on.as_bytes());
    if !off.is_empty() {
        out.push(b'-');
        out.extend_from_slice(off.as_bytes());
    }
    out.push(b':');
    out.extend_from_slice(pattern.source());
    out.push(b')');
    out
}
