// Character class matching.
// Handles \d \w \s \h escapes, POSIX brackets ([[:alpha:]] etc.),
// \p{Name} properties and [set] membership.

/// A named character class.
///
/// The escape classes (`Digit`, `Word`, `Space`, `Hex`) are ASCII-only
/// regardless of encoding, matching Ruby's `\d`/`\w`/`\s`/`\h`. The
/// POSIX classes are Unicode-aware under a Unicode encoding and ASCII
/// under the binary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit, // \d
    Word,  // \w
    Space, // \s
    Hex,   // \h
    Alpha,
    Alnum,
    Blank,
    Cntrl,
    Graph,
    Lower,
    Print,
    Punct,
    PosixSpace,
    Upper,
    XDigit,
    PosixWord,
    PosixDigit,
    Ascii,
}

impl CharClass {
    /// Resolve a POSIX bracket / property name.
    pub fn from_posix_name(name: &str) -> Option<CharClass> {
        match name {
            "alpha" => Some(CharClass::Alpha),
            "alnum" => Some(CharClass::Alnum),
            "blank" => Some(CharClass::Blank),
            "cntrl" => Some(CharClass::Cntrl),
            "digit" => Some(CharClass::PosixDigit),
            "graph" => Some(CharClass::Graph),
            "lower" => Some(CharClass::Lower),
            "print" => Some(CharClass::Print),
            "punct" => Some(CharClass::Punct),
            "space" => Some(CharClass::PosixSpace),
            "upper" => Some(CharClass::Upper),
            "xdigit" => Some(CharClass::XDigit),
            "word" => Some(CharClass::PosixWord),
            "ascii" => Some(CharClass::Ascii),
            _ => None,
        }
    }

    /// Resolve a `\p{Name}` property (small fixed set; the full Unicode
    /// property database is out of scope).
    pub fn from_property_name(name: &str) -> Option<CharClass> {
        match name {
            "Alpha" | "Alphabetic" => Some(CharClass::Alpha),
            "Alnum" => Some(CharClass::Alnum),
            "Digit" => Some(CharClass::PosixDigit),
            "Space" => Some(CharClass::PosixSpace),
            "Word" => Some(CharClass::PosixWord),
            "Upper" | "Uppercase" => Some(CharClass::Upper),
            "Lower" | "Lowercase" => Some(CharClass::Lower),
            _ => None,
        }
    }

    /// Whether `c` belongs to the class. `unicode` selects Unicode-aware
    /// semantics for the POSIX classes; the escape classes ignore it.
    pub fn matches(self, c: char, unicode: bool) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Word => c.is_ascii_alphanumeric() || c == '_',
            CharClass::Space => c.is_ascii_whitespace() || c == '\x0B',
            CharClass::Hex => c.is_ascii_hexdigit(),
            CharClass::Alpha => {
                if unicode {
                    c.is_alphabetic()
                } else {
                    c.is_ascii_alphabetic()
                }
            }
            CharClass::Alnum => {
                if unicode {
                    c.is_alphanumeric()
                } else {
                    c.is_ascii_alphanumeric()
                }
            }
            CharClass::Blank => c == ' ' || c == '\t',
            CharClass::Cntrl => c.is_control(),
            CharClass::Graph => {
                if unicode {
                    !c.is_whitespace() && !c.is_control()
                } else {
                    c.is_ascii_graphic()
                }
            }
            CharClass::Lower => {
                if unicode {
                    c.is_lowercase()
                } else {
                    c.is_ascii_lowercase()
                }
            }
            CharClass::Print => {
                CharClass::Graph.matches(c, unicode) || c == ' '
            }
            CharClass::Punct => c.is_ascii_punctuation(),
            CharClass::PosixSpace => {
                if unicode {
                    c.is_whitespace()
                } else {
                    c.is_ascii_whitespace() || c == '\x0B'
                }
            }
            CharClass::Upper => {
                if unicode {
                    c.is_uppercase()
                } else {
                    c.is_ascii_uppercase()
                }
            }
            CharClass::XDigit => c.is_ascii_hexdigit(),
            CharClass::PosixWord => {
                if unicode {
                    c.is_alphanumeric() || c == '_'
                } else {
                    c.is_ascii_alphanumeric() || c == '_'
                }
            }
            CharClass::PosixDigit => {
                if unicode {
                    c.is_ascii_digit() || c.is_numeric()
                } else {
                    c.is_ascii_digit()
                }
            }
            CharClass::Ascii => c.is_ascii(),
        }
    }
}

/// An item inside a character set `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    Range(char, char),
    Class(CharClass),
    InvertedClass(CharClass),
}

impl ClassItem {
    pub fn matches(&self, c: char, unicode: bool) -> bool {
        match self {
            ClassItem::Char(ch) => c == *ch,
            ClassItem::Range(start, end) => c >= *start && c <= *end,
            ClassItem::Class(class) => class.matches(c, unicode),
            ClassItem::InvertedClass(class) => !class.matches(c, unicode),
        }
    }
}

/// A full character set, possibly negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSet {
    pub items: Vec<ClassItem>,
    pub negated: bool,
}

impl ClassSet {
    /// Membership test. Case folding is applied before negation, so
    /// `[^a]` with IGNORECASE rejects both `a` and `A`.
    pub fn matches(&self, c: char, unicode: bool, fold: bool) -> bool {
        let mut hit = self.items.iter().any(|it| it.matches(c, unicode));
        if !hit && fold {
            for v in fold_variants(c, unicode) {
                if v != c && self.items.iter().any(|it| it.matches(v, unicode)) {
                    hit = true;
                    break;
                }
            }
        }
        hit != self.negated
    }
}

/// Simple per-character case fold: map to the single-character lowercase
/// form when one exists. Under the binary encoding (`unicode == false`)
/// only ASCII letters fold; bytes >= 0x80 are caseless raw bytes, not
/// Latin-1 characters. Locale-specific folding tables are out of scope.
pub fn fold_char(c: char, unicode: bool) -> char {
    if !unicode {
        return c.to_ascii_lowercase();
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// The simple-case variants of a character (lower and upper forms) used
/// for folded class membership.
pub fn fold_variants(c: char, unicode: bool) -> [char; 2] {
    if !unicode {
        return [c.to_ascii_lowercase(), c.to_ascii_uppercase()];
    }
    let lower = fold_char(c, true);
    let mut upper_it = c.to_uppercase();
    let upper = match (upper_it.next(), upper_it.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    [lower, upper]
}

/// Character equality under an optional case fold.
#[inline]
pub fn chars_eq(a: char, b: char, fold: bool, unicode: bool) -> bool {
    a == b || (fold && fold_char(a, unicode) == fold_char(b, unicode))
}

/// Word character for `\b`/`\B` boundaries. Ruby's word boundary follows
/// `\w`, which is ASCII-only.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
