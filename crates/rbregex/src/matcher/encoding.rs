// Byte-level character decoding.
//
// All engine offsets are byte offsets; quantifiers, classes and anchors
// operate on whole encoded characters. The decoder never splits a valid
// multi-byte sequence; an invalid byte under UTF-8 decodes as itself
// (one byte wide) so raw-byte subjects still scan deterministically.

/// The encodings the engine understands. `Binary` is Ruby's
/// ASCII-8BIT: one byte per character, ASCII class semantics, no
/// Unicode-aware folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegexEncoding {
    Utf8,
    Binary,
}

impl RegexEncoding {
    /// Decode the character starting at byte offset `at`.
    /// Returns the character and its width in bytes, or `None` at the
    /// end of the buffer.
    pub fn decode(self, bytes: &[u8], at: usize) -> Option<(char, usize)> {
        if at >= bytes.len() {
            return None;
        }
        match self {
            RegexEncoding::Binary => Some((bytes[at] as char, 1)),
            RegexEncoding::Utf8 => Some(decode_utf8(bytes, at)),
        }
    }

    /// Byte offset of the character preceding offset `at` (`at > 0`).
    pub fn prev_char_start(self, bytes: &[u8], at: usize) -> usize {
        debug_assert!(at > 0);
        match self {
            RegexEncoding::Binary => at - 1,
            RegexEncoding::Utf8 => {
                let mut p = at - 1;
                // Walk back over continuation bytes to the leading byte.
                while p > 0 && at - p < 4 && bytes[p] & 0b1100_0000 == 0b1000_0000 {
                    p -= 1;
                }
                // If the leading byte does not actually cover `at`, the
                // sequence is invalid; fall back to a single byte.
                match self.decode(bytes, p) {
                    Some((_, w)) if p + w == at => p,
                    _ => at - 1,
                }
            }
        }
    }

    /// Whole-buffer validity under this encoding.
    pub fn validate(self, bytes: &[u8]) -> bool {
        match self {
            RegexEncoding::Binary => true,
            RegexEncoding::Utf8 => std::str::from_utf8(bytes).is_ok(),
        }
    }

    /// Encoded width of `c` in bytes.
    pub fn char_len(self, c: char) -> usize {
        match self {
            RegexEncoding::Binary => 1,
            RegexEncoding::Utf8 => c.len_utf8(),
        }
    }

    /// First byte of the encoded form of `c`.
    pub fn first_byte(self, c: char) -> u8 {
        match self {
            RegexEncoding::Binary => c as u32 as u8,
            RegexEncoding::Utf8 => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf);
                buf[0]
            }
        }
    }

    /// Whether classes/properties use Unicode-aware semantics.
    pub fn is_unicode(self) -> bool {
        matches!(self, RegexEncoding::Utf8)
    }
}

/// Decode one UTF-8 character at `at`. Invalid or truncated sequences
/// decode as the single raw byte.
fn decode_utf8(bytes: &[u8], at: usize) -> (char, usize) {
    let b0 = bytes[at];
    if b0 < 0x80 {
        return (b0 as char, 1);
    }
    let width = match b0 {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return (b0 as char, 1),
    };
    if at + width > bytes.len() {
        return (b0 as char, 1);
    }
    match std::str::from_utf8(&bytes[at..at + width]) {
        Ok(s) => match s.chars().next() {
            Some(c) => (c, width),
            None => (b0 as char, 1),
        },
        Err(_) => (b0 as char, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(RegexEncoding::Utf8.decode(b"abc", 1), Some(('b', 1)));
        assert_eq!(RegexEncoding::Utf8.decode(b"abc", 3), None);
    }

    #[test]
    fn test_decode_multibyte() {
        let s = "aé漢".as_bytes();
        assert_eq!(RegexEncoding::Utf8.decode(s, 1), Some(('é', 2)));
        assert_eq!(RegexEncoding::Utf8.decode(s, 3), Some(('漢', 3)));
    }

    #[test]
    fn test_decode_invalid_is_single_byte() {
        let s = &[b'a', 0xFF, b'b'];
        assert_eq!(RegexEncoding::Utf8.decode(s, 1), Some(('\u{FF}', 1)));
    }

    #[test]
    fn test_binary_is_byte_per_char() {
        let s = "é".as_bytes();
        assert_eq!(RegexEncoding::Binary.decode(s, 0), Some(('\u{C3}', 1)));
    }

    #[test]
    fn test_prev_char_start() {
        let s = "aé漢".as_bytes();
        assert_eq!(RegexEncoding::Utf8.prev_char_start(s, 6), 3);
        assert_eq!(RegexEncoding::Utf8.prev_char_start(s, 3), 1);
        assert_eq!(RegexEncoding::Utf8.prev_char_start(s, 1), 0);
    }
}
