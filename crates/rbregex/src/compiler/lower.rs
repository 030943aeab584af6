// AST → program lowering.
//
// Two pre-order walks share one index-assignment policy: the first
// builds the capture table (so forward `\k<name>` references resolve),
// the second emits nodes into the flat arena. Whether a plain `(...)`
// captures depends on the options and on whether the pattern declares
// any named group:
//
//   DONT_CAPTURE_GROUP        plain groups never capture
//   CAPTURE_GROUP             plain groups always capture
//   named groups present      plain groups do not capture
//   otherwise                 plain groups capture

use crate::compiler::ast::{Ast, BackrefTarget, GroupKind};
use crate::matcher::encoding::RegexEncoding;
use crate::matcher::limits::{MAX_CAPTURE_GROUPS, MAX_PROGRAM_NODES};
use crate::options::Options;
use crate::program::{CaptureTable, LookKind, Node, NodeId, Program, ProgramMeta};
use crate::regex_error::{RegexError, RegexResult};

pub fn lower(
    ast: &Ast,
    options: Options,
    encoding: RegexEncoding,
) -> RegexResult<(Program, CaptureTable)> {
    if options.contains(Options::DONT_CAPTURE_GROUP) && options.contains(Options::CAPTURE_GROUP) {
        return Err(RegexError::Syntax(
            "invalid combination of options".to_string(),
        ));
    }
    let has_named = has_named_group(ast);
    let plain_captures = if options.contains(Options::DONT_CAPTURE_GROUP) {
        false
    } else if options.contains(Options::CAPTURE_GROUP) {
        true
    } else {
        !has_named
    };

    let mut table = CaptureTable::new();
    collect_captures(ast, plain_captures, &mut table);
    if table.group_count() > MAX_CAPTURE_GROUPS {
        return Err(RegexError::Syntax("too many capture groups".to_string()));
    }

    let mut lowerer = Lowerer {
        nodes: Vec::new(),
        table: &table,
        plain_captures,
        next_slot: 0,
        encoding,
    };
    let root = lowerer.lower_ast(ast)?;
    if lowerer.nodes.len() > MAX_PROGRAM_NODES {
        return Err(RegexError::Syntax("regex pattern is too big".to_string()));
    }

    let meta = ProgramMeta {
        min_len: lowerer.min_bytes(root),
        anchored_start: lowerer.anchored_start(root),
        first_byte: lowerer.first_byte(root),
    };
    Ok((Program::new(lowerer.nodes, root, meta), table))
}

fn has_named_group(ast: &Ast) -> bool {
    match ast {
        Ast::Group { kind, child } => {
            matches!(kind, GroupKind::Named(_)) || has_named_group(child)
        }
        Ast::Concat(children) | Ast::Alternate(children) => {
            children.iter().any(has_named_group)
        }
        Ast::Repeat { child, .. } | Ast::Look { child, .. } => has_named_group(child),
        _ => false,
    }
}

/// First walk: register capturing groups in source order.
fn collect_captures(ast: &Ast, plain_captures: bool, table: &mut CaptureTable) {
    match ast {
        Ast::Group { kind, child } => {
            match kind {
                GroupKind::Plain if plain_captures => {
                    table.push_group(None);
                }
                GroupKind::Named(name) => {
                    table.push_group(Some(name));
                }
                _ => {}
            }
            collect_captures(child, plain_captures, table);
        }
        Ast::Concat(children) | Ast::Alternate(children) => {
            for child in children {
                collect_captures(child, plain_captures, table);
            }
        }
        Ast::Repeat { child, .. } | Ast::Look { child, .. } => {
            collect_captures(child, plain_captures, table);
        }
        _ => {}
    }
}

struct Lowerer<'a> {
    nodes: Vec<Node>,
    table: &'a CaptureTable,
    plain_captures: bool,
    // Mirrors the index assignment of `collect_captures`.
    next_slot: u32,
    encoding: RegexEncoding,
}

impl<'a> Lowerer<'a> {
    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    fn lower_ast(&mut self, ast: &Ast) -> RegexResult<NodeId> {
        match ast {
            Ast::Empty => Ok(self.push(Node::Empty)),
            Ast::Literal { c, fold } => {
                if self.encoding == RegexEncoding::Binary && *c as u32 > 0xFF {
                    return Err(RegexError::Syntax(format!(
                        "character {:?} does not fit in a single-byte encoding",
                        c
                    )));
                }
                Ok(self.push(Node::Literal { c: *c, fold: *fold }))
            }
            Ast::Any { dot_all } => Ok(self.push(Node::Any { dot_all: *dot_all })),
            Ast::Class { set, fold } => Ok(self.push(Node::Class {
                set: set.clone(),
                fold: *fold,
            })),
            Ast::Assert(kind) => Ok(self.push(Node::Assert(*kind))),
            Ast::Concat(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.lower_ast(child)?);
                }
                Ok(self.push(Node::Seq(ids.into_boxed_slice())))
            }
            Ast::Alternate(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.lower_ast(child)?);
                }
                Ok(self.push(Node::Alt(ids.into_boxed_slice())))
            }
            Ast::Repeat {
                child,
                min,
                max,
                greedy,
            } => {
                let child = self.lower_ast(child)?;
                Ok(self.push(Node::Repeat {
                    child,
                    min: *min,
                    max: *max,
                    greedy: *greedy,
                }))
            }
            Ast::Group { kind, child } => {
                let slot = match kind {
                    GroupKind::Plain if self.plain_captures => {
                        self.next_slot += 1;
                        Some(self.next_slot)
                    }
                    GroupKind::Named(_) => {
                        self.next_slot += 1;
                        Some(self.next_slot)
                    }
                    _ => None,
                };
                let child = self.lower_ast(child)?;
                Ok(self.push(Node::Group { slot, child }))
            }
            Ast::Backref { target, fold } => {
                let indices = self.resolve_backref(target)?;
                Ok(self.push(Node::Backref {
                    indices,
                    fold: *fold,
                }))
            }
            Ast::Look { kind, child } => {
                let child = self.lower_ast(child)?;
                let max_back = match kind {
                    LookKind::Behind | LookKind::BehindNeg => {
                        let Some(max) = self.max_bytes(child) else {
                            return Err(RegexError::Syntax(
                                "invalid pattern in look-behind".to_string(),
                            ));
                        };
                        u32::try_from(max).map_err(|_| {
                            RegexError::Syntax("invalid pattern in look-behind".to_string())
                        })?
                    }
                    _ => 0,
                };
                Ok(self.push(Node::Look {
                    kind: *kind,
                    child,
                    max_back,
                }))
            }
        }
    }

    fn resolve_backref(&self, target: &BackrefTarget) -> RegexResult<Box<[u32]>> {
        match target {
            BackrefTarget::Number(n) => {
                if self.table.has_names() {
                    return Err(RegexError::Syntax(
                        "numbered backref/call is not allowed".to_string(),
                    ));
                }
                if *n == 0 || *n > self.table.group_count() {
                    return Err(RegexError::Syntax("invalid backref number".to_string()));
                }
                Ok(Box::new([*n]))
            }
            BackrefTarget::Name(name) => {
                let Some(indices) = self.table.indices_for(name) else {
                    return Err(RegexError::Syntax(format!(
                        "undefined name <{}> reference",
                        name
                    )));
                };
                // Most recent declaration is tried first.
                Ok(indices.iter().rev().copied().collect())
            }
        }
    }

    // ================== Metadata over the built arena ==================

    /// Minimum number of subject bytes the subtree can consume.
    fn min_bytes(&self, id: NodeId) -> usize {
        match &self.nodes[id as usize] {
            Node::Empty | Node::Assert(_) | Node::Look { .. } | Node::Backref { .. } => 0,
            Node::Literal { c, fold } => {
                if *fold {
                    1
                } else {
                    self.encoding.char_len(*c)
                }
            }
            Node::Any { .. } | Node::Class { .. } => 1,
            Node::Seq(children) => children.iter().map(|&c| self.min_bytes(c)).sum(),
            Node::Alt(children) => children
                .iter()
                .map(|&c| self.min_bytes(c))
                .min()
                .unwrap_or(0),
            Node::Repeat { child, min, .. } => self.min_bytes(*child) * *min as usize,
            Node::Group { child, .. } => self.min_bytes(*child),
        }
    }

    /// Maximum number of subject bytes the subtree can consume, or
    /// `None` when unbounded. Backreference lengths depend on the
    /// subject, so they count as unbounded.
    fn max_bytes(&self, id: NodeId) -> Option<usize> {
        match &self.nodes[id as usize] {
            Node::Empty | Node::Assert(_) | Node::Look { .. } => Some(0),
            Node::Backref { .. } => None,
            Node::Literal { c, fold } => {
                if self.encoding == RegexEncoding::Binary {
                    Some(1)
                } else if *fold {
                    // A folded variant can be wider than the literal.
                    Some(4)
                } else {
                    Some(c.len_utf8())
                }
            }
            Node::Any { .. } | Node::Class { .. } => {
                if self.encoding == RegexEncoding::Binary {
                    Some(1)
                } else {
                    Some(4)
                }
            }
            Node::Seq(children) => {
                let mut total = 0usize;
                for &child in children.iter() {
                    total = total.checked_add(self.max_bytes(child)?)?;
                }
                Some(total)
            }
            Node::Alt(children) => {
                let mut best = 0usize;
                for &child in children.iter() {
                    best = best.max(self.max_bytes(child)?);
                }
                Some(best)
            }
            Node::Repeat { child, max, .. } => {
                let inner = self.max_bytes(*child)?;
                if inner == 0 {
                    return Some(0);
                }
                let max = (*max)?;
                inner.checked_mul(max as usize)
            }
            Node::Group { child, .. } => self.max_bytes(*child),
        }
    }

    /// Whether every path through the subtree starts with `\A`.
    fn anchored_start(&self, id: NodeId) -> bool {
        match &self.nodes[id as usize] {
            Node::Assert(crate::program::AssertKind::TextStart) => true,
            Node::Seq(children) => children
                .first()
                .is_some_and(|&first| self.anchored_start(first)),
            Node::Alt(children) => {
                !children.is_empty() && children.iter().all(|&c| self.anchored_start(c))
            }
            Node::Group { child, .. } => self.anchored_start(*child),
            Node::Repeat { child, min, .. } => *min >= 1 && self.anchored_start(*child),
            _ => false,
        }
    }

    /// Mandatory first subject byte, when the pattern opens with an
    /// unfolded literal. Used as a scan prefilter.
    fn first_byte(&self, id: NodeId) -> Option<u8> {
        match &self.nodes[id as usize] {
            Node::Literal { c, fold: false } => Some(self.encoding.first_byte(*c)),
            Node::Seq(children) => {
                for &child in children.iter() {
                    match &self.nodes[child as usize] {
                        // Zero-width nodes never consume the first byte.
                        Node::Empty | Node::Assert(_) | Node::Look { .. } => continue,
                        _ => return self.first_byte(child),
                    }
                }
                None
            }
            Node::Group { child, .. } => self.first_byte(*child),
            Node::Repeat {
                child, min: 1.., ..
            } => self.first_byte(*child),
            _ => None,
        }
    }
}
