// Compiled program representation.
//
// A pattern compiles to a flat node arena indexed by `NodeId`, plus
// metadata the search loop uses to prune candidate start positions.
// Sequences and alternations hold child id lists; the matcher walks the
// arena with index arithmetic instead of chasing boxed trees.

use crate::matcher::class::ClassSet;

pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Matches the empty string.
    Empty,
    /// One literal character; `fold` selects case-insensitive comparison.
    Literal { c: char, fold: bool },
    /// `.` — any character; a newline only when `dot_all` (MULTILINE).
    Any { dot_all: bool },
    /// Character set, `\d`-style escape or POSIX class.
    Class { set: ClassSet, fold: bool },
    /// Zero-width assertion.
    Assert(AssertKind),
    /// Children matched in order.
    Seq(Box<[NodeId]>),
    /// Branches tried in source order (leftmost-first).
    Alt(Box<[NodeId]>),
    /// Quantified child. `max == None` means unbounded.
    Repeat {
        child: NodeId,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    },
    /// Group. `slot` is the capture index, `None` for non-capturing.
    Group { slot: Option<u32>, child: NodeId },
    /// Backreference to one or more capture indices (duplicate-named
    /// groups share a name; most recent declaration is tried first).
    Backref { indices: Box<[u32]>, fold: bool },
    /// Lookaround. `max_back` is the bounded byte length of the body,
    /// used only by the behind variants.
    Look {
        kind: LookKind,
        child: NodeId,
        max_back: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertKind {
    LineStart,      // ^
    LineEnd,        // $
    TextStart,      // \A
    TextEnd,        // \z
    TextEndNewline, // \Z
    WordBoundary,   // \b
    NotWordBoundary, // \B
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookKind {
    Ahead,     // (?=...)
    AheadNeg,  // (?!...)
    Behind,    // (?<=...)
    BehindNeg, // (?<!...)
}

/// Search-acceleration metadata computed at compile time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramMeta {
    /// Minimum possible match length in bytes.
    pub min_len: usize,
    /// Pattern begins with `\A`: only the first candidate position can match.
    pub anchored_start: bool,
    /// First byte of a mandatory leading literal, if any.
    pub first_byte: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    nodes: Vec<Node>,
    root: NodeId,
    pub meta: ProgramMeta,
}

impl Program {
    pub fn new(nodes: Vec<Node>, root: NodeId, meta: ProgramMeta) -> Program {
        Program { nodes, root, meta }
    }

    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline(always)]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
