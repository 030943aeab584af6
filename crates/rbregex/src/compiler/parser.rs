// Recursive-descent pattern parser.
//
// Alternation `|` binds loosest, then concatenation, then postfix
// quantifiers, then atoms. The pattern is walked as a `&[char]` slice
// with index arithmetic. Inline `(?imx-imx)` flags mutate the parser's
// flag state; group boundaries save and restore it, which gives the
// Ruby scoping rule (a bare `(?i)` runs to the end of the enclosing
// group) for free.

use smol_str::SmolStr;

use crate::compiler::ast::{Ast, BackrefTarget, GroupKind};
use crate::matcher::class::{CharClass, ClassItem, ClassSet};
use crate::matcher::limits::MAX_PARSE_DEPTH;
use crate::options::Options;
use crate::program::{AssertKind, LookKind};
use crate::regex_error::{RegexError, RegexResult};

/// Parse a pattern (already decoded to characters) into an AST.
pub fn parse_pattern(chars: &[char], options: Options) -> RegexResult<Ast> {
    let mut parser = Parser {
        chars,
        pos: 0,
        depth: 0,
        flags: ParseFlags {
            fold: options.contains(Options::IGNORECASE),
            extended: options.contains(Options::EXTENDED),
            dot_all: options.contains(Options::MULTILINE),
        },
    };
    let ast = parser.parse_alternation()?;
    if parser.pos < chars.len() {
        // Only an unbalanced ')' can stop the top-level alternation.
        return Err(syntax("unmatched close parenthesis"));
    }
    Ok(ast)
}

fn syntax(msg: impl Into<String>) -> RegexError {
    RegexError::Syntax(msg.into())
}

#[derive(Debug, Clone, Copy)]
struct ParseFlags {
    fold: bool,
    extended: bool,
    dot_all: bool,
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    depth: usize,
    flags: ParseFlags,
}

/// One parsed class element: a plain character (range-capable) or a
/// finished item (class escapes cannot form ranges).
enum ClassElem {
    Char(char),
    Item(ClassItem),
}

impl<'a> Parser<'a> {
    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    #[inline]
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_alternation(&mut self) -> RegexResult<Ast> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(syntax("pattern is too deeply nested"));
        }
        let mut branches = vec![self.parse_concat()?];
        while self.eat('|') {
            branches.push(self.parse_concat()?);
        }
        self.depth -= 1;
        if branches.len() == 1 {
            Ok(branches.pop().unwrap())
        } else {
            Ok(Ast::Alternate(branches))
        }
    }

    fn parse_concat(&mut self) -> RegexResult<Ast> {
        let mut seq = Vec::new();
        loop {
            self.skip_extended();
            match self.peek() {
                None | Some('|') | Some(')') => break,
                _ => {}
            }
            let atom = self.parse_atom()?;
            let atom = self.parse_quantifier(atom)?;
            // Comment groups and bare flag groups contribute nothing.
            if !matches!(atom, Ast::Empty) {
                seq.push(atom);
            }
        }
        match seq.len() {
            0 => Ok(Ast::Empty),
            1 => Ok(seq.pop().unwrap()),
            _ => Ok(Ast::Concat(seq)),
        }
    }

    /// Skip free-spacing whitespace and `#` comments when EXTENDED.
    fn skip_extended(&mut self) {
        if !self.flags.extended {
            return;
        }
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_atom(&mut self) -> RegexResult<Ast> {
        let Some(c) = self.peek() else {
            return Ok(Ast::Empty);
        };
        match c {
            '(' => {
                self.pos += 1;
                self.parse_group()
            }
            '[' => {
                self.pos += 1;
                self.parse_class()
            }
            '.' => {
                self.pos += 1;
                Ok(Ast::Any {
                    dot_all: self.flags.dot_all,
                })
            }
            '^' => {
                self.pos += 1;
                Ok(Ast::Assert(AssertKind::LineStart))
            }
            '$' => {
                self.pos += 1;
                Ok(Ast::Assert(AssertKind::LineEnd))
            }
            '\\' => {
                self.pos += 1;
                self.parse_escape_atom()
            }
            '*' | '+' | '?' => Err(syntax("target of repeat operator is not specified")),
            _ => {
                self.pos += 1;
                Ok(Ast::Literal {
                    c,
                    fold: self.flags.fold,
                })
            }
        }
    }

    /// Apply any postfix quantifier (with optional lazy `?`) to `atom`.
    fn parse_quantifier(&mut self, atom: Ast) -> RegexResult<Ast> {
        let mut result = atom;
        loop {
            self.skip_extended();
            let Some(c) = self.peek() else {
                return Ok(result);
            };
            let (min, max) = match c {
                '*' => (0, None),
                '+' => (1, None),
                '?' => (0, Some(1)),
                '{' => match self.try_parse_brace()? {
                    Some(range) => range,
                    None => return Ok(result), // literal '{'
                },
                _ => return Ok(result),
            };
            if !is_quantifiable(&result) {
                return Err(syntax("target of repeat operator is not specified"));
            }
            if matches!(result, Ast::Repeat { .. }) {
                return Err(syntax("nested repeat operator"));
            }
            if c != '{' {
                self.pos += 1;
            }
            let greedy = !self.eat('?');
            result = Ast::Repeat {
                child: Box::new(result),
                min,
                max,
                greedy,
            };
        }
    }

    /// Parse `{m}`, `{m,}`, `{m,n}` or `{,n}`. Returns `None` (with the
    /// position restored) when the braces do not form a quantifier, in
    /// which case `{` is a literal.
    fn try_parse_brace(&mut self) -> RegexResult<Option<(u32, Option<u32>)>> {
        let save = self.pos;
        self.pos += 1; // '{'
        let min_digits = self.take_repeat_number()?;
        let (min, max);
        if self.eat(',') {
            let max_digits = self.take_repeat_number()?;
            if !self.eat('}') || (min_digits.is_none() && max_digits.is_none()) {
                self.pos = save;
                return Ok(None);
            }
            min = min_digits.unwrap_or(0);
            max = max_digits;
        } else if let Some(m) = min_digits {
            if !self.eat('}') {
                self.pos = save;
                return Ok(None);
            }
            min = m;
            max = Some(m);
        } else {
            self.pos = save;
            return Ok(None);
        }
        if let Some(mx) = max
            && min > mx
        {
            return Err(syntax("min repeat greater than max repeat"));
        }
        Ok(Some((min, max)))
    }

    fn take_repeat_number(&mut self) -> RegexResult<Option<u32>> {
        let mut value: u32 = 0;
        let mut seen = false;
        while let Some(c) = self.peek()
            && c.is_ascii_digit()
        {
            seen = true;
            value = value * 10 + (c as u32 - '0' as u32);
            if value > 100_000 {
                return Err(syntax("too big number for repeat range"));
            }
            self.pos += 1;
        }
        Ok(if seen { Some(value) } else { None })
    }

    // ======================== Groups ========================

    fn parse_group(&mut self) -> RegexResult<Ast> {
        if !self.eat('?') {
            let child = self.parse_group_body()?;
            return Ok(Ast::Group {
                kind: GroupKind::Plain,
                child: Box::new(child),
            });
        }
        match self.peek() {
            Some(':') => {
                self.pos += 1;
                let child = self.parse_group_body()?;
                Ok(Ast::Group {
                    kind: GroupKind::NonCapture,
                    child: Box::new(child),
                })
            }
            Some('#') => {
                // (?#...) comment
                loop {
                    match self.bump() {
                        Some(')') => return Ok(Ast::Empty),
                        Some(_) => {}
                        None => return Err(syntax("end pattern with unmatched parenthesis")),
                    }
                }
            }
            Some('=') => {
                self.pos += 1;
                self.parse_look(LookKind::Ahead)
            }
            Some('!') => {
                self.pos += 1;
                self.parse_look(LookKind::AheadNeg)
            }
            Some('<') => {
                self.pos += 1;
                match self.peek() {
                    Some('=') => {
                        self.pos += 1;
                        self.parse_look(LookKind::Behind)
                    }
                    Some('!') => {
                        self.pos += 1;
                        self.parse_look(LookKind::BehindNeg)
                    }
                    _ => {
                        let name = self.parse_group_name('>')?;
                        let child = self.parse_group_body()?;
                        Ok(Ast::Group {
                            kind: GroupKind::Named(name),
                            child: Box::new(child),
                        })
                    }
                }
            }
            Some('\'') => {
                self.pos += 1;
                let name = self.parse_group_name('\'')?;
                let child = self.parse_group_body()?;
                Ok(Ast::Group {
                    kind: GroupKind::Named(name),
                    child: Box::new(child),
                })
            }
            Some('i') | Some('m') | Some('x') | Some('-') => self.parse_flag_group(),
            _ => Err(syntax("undefined group option")),
        }
    }

    fn parse_group_body(&mut self) -> RegexResult<Ast> {
        let saved = self.flags;
        let child = self.parse_alternation()?;
        self.expect_close()?;
        self.flags = saved;
        Ok(child)
    }

    fn parse_look(&mut self, kind: LookKind) -> RegexResult<Ast> {
        let child = self.parse_group_body()?;
        Ok(Ast::Look {
            kind,
            child: Box::new(child),
        })
    }

    fn expect_close(&mut self) -> RegexResult<()> {
        if self.eat(')') {
            Ok(())
        } else {
            Err(syntax("end pattern with unmatched parenthesis"))
        }
    }

    /// `(?imx-imx)` or `(?imx-imx:...)`.
    fn parse_flag_group(&mut self) -> RegexResult<Ast> {
        let mut neg = false;
        let mut new_flags = self.flags;
        loop {
            let Some(c) = self.peek() else {
                return Err(syntax("end pattern with unmatched parenthesis"));
            };
            match c {
                'i' => {
                    new_flags.fold = !neg;
                    self.pos += 1;
                }
                'm' => {
                    new_flags.dot_all = !neg;
                    self.pos += 1;
                }
                'x' => {
                    new_flags.extended = !neg;
                    self.pos += 1;
                }
                '-' if !neg => {
                    neg = true;
                    self.pos += 1;
                }
                ':' => {
                    self.pos += 1;
                    let saved = self.flags;
                    self.flags = new_flags;
                    let child = self.parse_alternation()?;
                    self.expect_close()?;
                    self.flags = saved;
                    return Ok(Ast::Group {
                        kind: GroupKind::NonCapture,
                        child: Box::new(child),
                    });
                }
                ')' => {
                    // Bare flag group: applies until the end of the
                    // enclosing group (the enclosing parse restores).
                    self.pos += 1;
                    self.flags = new_flags;
                    return Ok(Ast::Empty);
                }
                _ => return Err(syntax("undefined group option")),
            }
        }
    }

    fn parse_group_name(&mut self, close: char) -> RegexResult<SmolStr> {
        let mut name = String::new();
        loop {
            match self.bump() {
                None => return Err(syntax("invalid group name")),
                Some(c) if c == close => break,
                Some(c) => name.push(c),
            }
        }
        if !is_valid_group_name(&name) {
            return Err(syntax(format!("invalid group name <{}>", name)));
        }
        Ok(SmolStr::new(&name))
    }

    // ======================== Escapes ========================

    fn parse_escape_atom(&mut self) -> RegexResult<Ast> {
        let Some(c) = self.bump() else {
            return Err(syntax("too short escape sequence"));
        };
        let fold = self.flags.fold;
        match c {
            't' => Ok(self.literal('\t')),
            'n' => Ok(self.literal('\n')),
            'r' => Ok(self.literal('\r')),
            'f' => Ok(self.literal('\x0C')),
            'v' => Ok(self.literal('\x0B')),
            'a' => Ok(self.literal('\x07')),
            'e' => Ok(self.literal('\x1B')),
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                let class = match c.to_ascii_lowercase() {
                    'd' => CharClass::Digit,
                    'w' => CharClass::Word,
                    's' => CharClass::Space,
                    _ => CharClass::Hex,
                };
                Ok(Ast::Class {
                    set: ClassSet {
                        items: vec![ClassItem::Class(class)],
                        negated: c.is_ascii_uppercase(),
                    },
                    fold,
                })
            }
            'b' => Ok(Ast::Assert(AssertKind::WordBoundary)),
            'B' => Ok(Ast::Assert(AssertKind::NotWordBoundary)),
            'A' => Ok(Ast::Assert(AssertKind::TextStart)),
            'z' => Ok(Ast::Assert(AssertKind::TextEnd)),
            'Z' => Ok(Ast::Assert(AssertKind::TextEndNewline)),
            'x' => {
                let ch = self.parse_hex_escape()?;
                Ok(self.literal(ch))
            }
            'u' => {
                let ch = self.parse_unicode_escape()?;
                Ok(self.literal(ch))
            }
            '0' => {
                let ch = self.parse_octal('0')?;
                Ok(self.literal(ch))
            }
            '1'..='9' => {
                let number = self.finish_backref_number(c)?;
                Ok(Ast::Backref {
                    target: BackrefTarget::Number(number),
                    fold,
                })
            }
            'k' => {
                let close = match self.bump() {
                    Some('<') => '>',
                    Some('\'') => '\'',
                    _ => return Err(syntax("invalid backref number/name")),
                };
                let name = self.parse_group_name(close)?;
                Ok(Ast::Backref {
                    target: BackrefTarget::Name(name),
                    fold,
                })
            }
            'p' | 'P' => {
                let (class, negated) = self.parse_property(c == 'P')?;
                Ok(Ast::Class {
                    set: ClassSet {
                        items: vec![ClassItem::Class(class)],
                        negated,
                    },
                    fold,
                })
            }
            c if c.is_ascii_alphanumeric() => {
                Err(syntax(format!("undefined escape sequence \\{}", c)))
            }
            c => Ok(self.literal(c)),
        }
    }

    fn literal(&self, c: char) -> Ast {
        Ast::Literal {
            c,
            fold: self.flags.fold,
        }
    }

    /// `\xH`, `\xHH` or `\x{HHHHHH}`.
    fn parse_hex_escape(&mut self) -> RegexResult<char> {
        if self.eat('{') {
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(c) = self.peek()
                && c.is_ascii_hexdigit()
            {
                value = value * 16 + hex_value(c);
                digits += 1;
                if digits > 6 {
                    return Err(syntax("too big character code"));
                }
                self.pos += 1;
            }
            if digits == 0 || !self.eat('}') {
                return Err(syntax("invalid hex escape"));
            }
            char::from_u32(value).ok_or_else(|| syntax("invalid character code"))
        } else {
            let mut value: u32 = 0;
            let mut digits = 0;
            while digits < 2
                && let Some(c) = self.peek()
                && c.is_ascii_hexdigit()
            {
                value = value * 16 + hex_value(c);
                digits += 1;
                self.pos += 1;
            }
            if digits == 0 {
                return Err(syntax("invalid hex escape"));
            }
            char::from_u32(value).ok_or_else(|| syntax("invalid character code"))
        }
    }

    /// `\uHHHH` or `\u{...}`.
    fn parse_unicode_escape(&mut self) -> RegexResult<char> {
        if self.peek() == Some('{') {
            return self.parse_hex_escape();
        }
        let mut value: u32 = 0;
        for _ in 0..4 {
            let Some(c) = self.peek() else {
                return Err(syntax("invalid Unicode escape"));
            };
            if !c.is_ascii_hexdigit() {
                return Err(syntax("invalid Unicode escape"));
            }
            value = value * 16 + hex_value(c);
            self.pos += 1;
        }
        char::from_u32(value).ok_or_else(|| syntax("invalid character code"))
    }

    /// Octal escape; `first` is the already-consumed leading digit.
    fn parse_octal(&mut self, first: char) -> RegexResult<char> {
        let mut value = first as u32 - '0' as u32;
        let mut digits = 1;
        while digits < 3
            && let Some(c) = self.peek()
            && ('0'..='7').contains(&c)
        {
            value = value * 8 + (c as u32 - '0' as u32);
            digits += 1;
            self.pos += 1;
        }
        char::from_u32(value).ok_or_else(|| syntax("invalid character code"))
    }

    fn finish_backref_number(&mut self, first: char) -> RegexResult<u32> {
        let mut value = first as u32 - '0' as u32;
        while let Some(c) = self.peek()
            && c.is_ascii_digit()
        {
            value = value * 10 + (c as u32 - '0' as u32);
            if value > 1000 {
                return Err(syntax("invalid backref number"));
            }
            self.pos += 1;
        }
        Ok(value)
    }

    /// `\p{Name}` / `\P{Name}` / `\p{^Name}`.
    fn parse_property(&mut self, negated_by_case: bool) -> RegexResult<(CharClass, bool)> {
        if !self.eat('{') {
            return Err(syntax("invalid character property"));
        }
        let neg_inner = self.eat('^');
        let mut name = String::new();
        loop {
            match self.bump() {
                None => return Err(syntax("invalid character property")),
                Some('}') => break,
                Some(c) => name.push(c),
            }
        }
        let class = CharClass::from_property_name(&name)
            .ok_or_else(|| syntax(format!("invalid character property name {{{}}}", name)))?;
        Ok((class, negated_by_case != neg_inner))
    }

    // ======================== Character classes ========================

    fn parse_class(&mut self) -> RegexResult<Ast> {
        let negated = self.eat('^');
        if self.peek() == Some(']') {
            // Ruby rejects a leading ']' instead of taking it literally.
            return Err(syntax("empty char-class"));
        }
        let mut items = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(syntax("premature end of char-class"));
            };
            if c == ']' {
                self.pos += 1;
                break;
            }
            if c == '[' && self.peek_at(1) == Some(':') {
                items.push(self.parse_posix_bracket()?);
                continue;
            }
            let elem = if c == '\\' {
                self.pos += 1;
                self.parse_class_escape()?
            } else {
                self.pos += 1;
                ClassElem::Char(c)
            };
            match elem {
                ClassElem::Item(item) => items.push(item),
                ClassElem::Char(lo) => {
                    let is_range = self.peek() == Some('-')
                        && self.peek_at(1).is_some()
                        && self.peek_at(1) != Some(']');
                    if is_range {
                        self.pos += 1; // '-'
                        let hi = match self.peek() {
                            Some('\\') => {
                                self.pos += 1;
                                match self.parse_class_escape()? {
                                    ClassElem::Char(h) => h,
                                    ClassElem::Item(_) => {
                                        return Err(syntax(
                                            "char-class value range with character class",
                                        ));
                                    }
                                }
                            }
                            Some(h) => {
                                self.pos += 1;
                                h
                            }
                            None => return Err(syntax("premature end of char-class")),
                        };
                        if lo > hi {
                            return Err(syntax("empty range in char class"));
                        }
                        items.push(ClassItem::Range(lo, hi));
                    } else {
                        items.push(ClassItem::Char(lo));
                    }
                }
            }
        }
        Ok(Ast::Class {
            set: ClassSet { items, negated },
            fold: self.flags.fold,
        })
    }

    fn parse_class_escape(&mut self) -> RegexResult<ClassElem> {
        let Some(c) = self.bump() else {
            return Err(syntax("too short escape sequence"));
        };
        match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => {
                let class = match c.to_ascii_lowercase() {
                    'd' => CharClass::Digit,
                    'w' => CharClass::Word,
                    's' => CharClass::Space,
                    _ => CharClass::Hex,
                };
                Ok(ClassElem::Item(if c.is_ascii_uppercase() {
                    ClassItem::InvertedClass(class)
                } else {
                    ClassItem::Class(class)
                }))
            }
            'p' | 'P' => {
                let (class, negated) = self.parse_property(c == 'P')?;
                Ok(ClassElem::Item(if negated {
                    ClassItem::InvertedClass(class)
                } else {
                    ClassItem::Class(class)
                }))
            }
            'b' => Ok(ClassElem::Char('\x08')), // backspace inside a class
            't' => Ok(ClassElem::Char('\t')),
            'n' => Ok(ClassElem::Char('\n')),
            'r' => Ok(ClassElem::Char('\r')),
            'f' => Ok(ClassElem::Char('\x0C')),
            'v' => Ok(ClassElem::Char('\x0B')),
            'a' => Ok(ClassElem::Char('\x07')),
            'e' => Ok(ClassElem::Char('\x1B')),
            'x' => Ok(ClassElem::Char(self.parse_hex_escape()?)),
            'u' => Ok(ClassElem::Char(self.parse_unicode_escape()?)),
            '0'..='7' => Ok(ClassElem::Char(self.parse_octal(c)?)),
            c if c.is_ascii_alphanumeric() => {
                Err(syntax(format!("undefined escape sequence \\{}", c)))
            }
            c => Ok(ClassElem::Char(c)),
        }
    }

    fn parse_posix_bracket(&mut self) -> RegexResult<ClassItem> {
        self.pos += 2; // "[:"
        let negated = self.eat('^');
        let mut name = String::new();
        while let Some(c) = self.peek()
            && c.is_ascii_lowercase()
        {
            name.push(c);
            self.pos += 1;
        }
        if !(self.eat(':') && self.eat(']')) {
            return Err(syntax("invalid POSIX bracket type"));
        }
        let class = CharClass::from_posix_name(&name)
            .ok_or_else(|| syntax(format!("invalid POSIX bracket type [:{}:]", name)))?;
        Ok(if negated {
            ClassItem::InvertedClass(class)
        } else {
            ClassItem::Class(class)
        })
    }
}

fn is_quantifiable(ast: &Ast) -> bool {
    matches!(
        ast,
        Ast::Literal { .. }
            | Ast::Any { .. }
            | Ast::Class { .. }
            | Ast::Group { .. }
            | Ast::Backref { .. }
            | Ast::Repeat { .. }
    )
}

fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn hex_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'a'..='f' => c as u32 - 'a' as u32 + 10,
        _ => c as u32 - 'A' as u32 + 10,
    }
}
