// Pattern syntax tree produced by the recursive-descent parser.
//
// Flag-sensitive behavior (case folding, dot-matches-newline) is baked
// into the atoms at parse time so inline `(?imx)` groups cost nothing at
// match time.

use smol_str::SmolStr;

use crate::matcher::class::ClassSet;
use crate::program::{AssertKind, LookKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Matches the empty string.
    Empty,
    Literal {
        c: char,
        fold: bool,
    },
    Any {
        dot_all: bool,
    },
    Class {
        set: ClassSet,
        fold: bool,
    },
    Assert(AssertKind),
    Concat(Vec<Ast>),
    Alternate(Vec<Ast>),
    Repeat {
        child: Box<Ast>,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    },
    Group {
        kind: GroupKind,
        child: Box<Ast>,
    },
    Backref {
        target: BackrefTarget,
        fold: bool,
    },
    Look {
        kind: LookKind,
        child: Box<Ast>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKind {
    /// Plain `(...)` — whether it captures depends on options and on
    /// whether the pattern declares named groups.
    Plain,
    /// `(?:...)` and inline-flag groups.
    NonCapture,
    /// `(?<name>...)` / `(?'name'...)`.
    Named(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackrefTarget {
    Number(u32),
    Name(SmolStr),
}
