use std::ops::{BitOr, BitOrAssign};

/// Pattern option bitmask. Bit values are stable and match the Ruby
/// `Regexp` constants, so a persisted bitmask round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Options(u16);

impl Options {
    pub const NONE: Options = Options(0);
    /// Case-insensitive matching (`/i`).
    pub const IGNORECASE: Options = Options(1);
    /// Free-spacing mode: unescaped whitespace and `#` comments ignored (`/x`).
    pub const EXTENDED: Options = Options(2);
    /// `.` also matches a newline (`/m`).
    pub const MULTILINE: Options = Options(4);
    /// Reject subjects whose bytes are invalid under the pattern encoding.
    pub const FIXEDENCODING: Options = Options(16);
    /// Treat subject as raw bytes; character classes use ASCII semantics.
    pub const NOENCODING: Options = Options(32);
    /// Plain `(...)` groups never capture (named groups still do).
    pub const DONT_CAPTURE_GROUP: Options = Options(128);
    /// Plain `(...)` groups capture even when named groups are present.
    pub const CAPTURE_GROUP: Options = Options(256);

    const MASK: u16 = 1 | 2 | 4 | 16 | 32 | 128 | 256;

    /// Build from a raw bitmask, discarding unknown bits.
    pub fn from_bits(bits: u16) -> Options {
        Options(bits & Self::MASK)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Map a constructor language-code suffix to options: `n`/`N`
    /// selects NOENCODING (raw bytes); every other code carries no
    /// option bits.
    pub fn from_lang(lang: &str) -> Options {
        if lang.eq_ignore_ascii_case("n") {
            Options::NOENCODING
        } else {
            Options::NONE
        }
    }

    /// The `m`/`i`/`x` suffix string used when displaying a pattern.
    pub fn option_string(self) -> String {
        let mut s = String::new();
        if self.contains(Options::MULTILINE) {
            s.push('m');
        }
        if self.contains(Options::IGNORECASE) {
            s.push('i');
        }
        if self.contains(Options::EXTENDED) {
            s.push('x');
        }
        s
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

#[cfg(feature = "serde")]
impl Options {
    /// JSON round-trip helpers for embedders that persist option sets.
    pub fn to_json(self) -> serde_json::Result<String> {
        serde_json::to_string(&self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Options> {
        let opts: Options = serde_json::from_str(json)?;
        Ok(Options::from_bits(opts.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(Options::IGNORECASE.bits(), 1);
        assert_eq!(Options::EXTENDED.bits(), 2);
        assert_eq!(Options::MULTILINE.bits(), 4);
        assert_eq!(Options::FIXEDENCODING.bits(), 16);
        assert_eq!(Options::NOENCODING.bits(), 32);
        assert_eq!(Options::DONT_CAPTURE_GROUP.bits(), 128);
        assert_eq!(Options::CAPTURE_GROUP.bits(), 256);
    }

    #[test]
    fn test_from_bits_masks_unknown() {
        assert_eq!(Options::from_bits(0xFFFF).bits(), Options::MASK);
        assert_eq!(Options::from_bits(8), Options::NONE);
    }

    #[test]
    fn test_from_lang() {
        assert_eq!(Options::from_lang("n"), Options::NOENCODING);
        assert_eq!(Options::from_lang("N"), Options::NOENCODING);
        assert_eq!(Options::from_lang(""), Options::NONE);
        assert_eq!(Options::from_lang("u"), Options::NONE);
    }

    #[test]
    fn test_option_string() {
        let opts = Options::MULTILINE | Options::IGNORECASE | Options::EXTENDED;
        assert_eq!(opts.option_string(), "mix");
        assert_eq!(Options::NONE.option_string(), "");
    }
}
