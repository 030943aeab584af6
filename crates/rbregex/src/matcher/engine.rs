// Backtracking matcher.
//
// The interpreter walks the program arena in continuation-passing
// style: `run` matches one node and hands the rest of the pattern to a
// stack-allocated `Cont` chain. Backtracking is ordinary control-flow
// return; capture slots are written on the success path and restored
// when a continuation fails, so a failed branch never leaks captures.
//
// Greedy and lazy loops over single-character bodies are iterated
// instead of recursed, which keeps `a*`-style quantifiers out of the
// recursion depth budget. Every node visit counts against a step
// budget; blowing the budget aborts the whole search with
// `RegexError::Timeout` rather than letting catastrophic backtracking
// run unbounded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::matcher::class::{chars_eq, is_word_char};
use crate::matcher::encoding::RegexEncoding;
use crate::matcher::limits::{CANCEL_POLL_MASK, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STEPS};
use crate::program::{AssertKind, LookKind, Node, NodeId, Program};
use crate::regex_error::{RegexError, RegexResult};

/// Per-search resource limits. One `search` call consumes at most
/// `max_steps` node visits; the cooperative `cancel` flag is polled
/// every few hundred steps and aborts the search when set.
#[derive(Debug, Clone)]
pub struct MatchLimits {
    pub max_steps: u64,
    pub max_depth: usize,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for MatchLimits {
    fn default() -> MatchLimits {
        MatchLimits {
            max_steps: DEFAULT_MAX_STEPS,
            max_depth: DEFAULT_MAX_DEPTH,
            cancel: None,
        }
    }
}

impl MatchLimits {
    pub fn with_max_steps(max_steps: u64) -> MatchLimits {
        MatchLimits {
            max_steps,
            ..MatchLimits::default()
        }
    }
}

/// A successful attempt: byte span of the whole match plus the spans of
/// every capture slot (1-based group `i` lives in `slots[i - 1]`).
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub slots: Vec<Option<(usize, usize)>>,
}

/// The rest of the pattern, as a linked chain on the Rust call stack.
enum Cont<'a> {
    /// Nothing left: accept at the current position.
    Accept,
    /// Accept only at exactly this position (lookbehind bodies).
    AcceptAt(usize),
    /// Remaining nodes of a sequence.
    Seq {
        seq: &'a [NodeId],
        next: &'a Cont<'a>,
    },
    /// Close capture `slot` (opened at `start`) and continue.
    Group {
        slot: u32,
        start: usize,
        next: &'a Cont<'a>,
    },
    /// One loop iteration finished; decide whether to go around again.
    Repeat {
        id: NodeId,
        done: u32,
        iter_start: usize,
        next: &'a Cont<'a>,
    },
}

struct MatchState<'a> {
    program: &'a Program,
    subject: &'a [u8],
    encoding: RegexEncoding,
    slots: Vec<Option<(usize, usize)>>,
    steps: u64,
    depth: usize,
    limits: &'a MatchLimits,
    failure: Option<RegexError>,
}

/// Scan `subject` from `start` for the leftmost match.
///
/// The step budget covers the whole scan, not one attempt, so a
/// pathological pattern cannot multiply its budget by the subject
/// length. Returns `Err` only for resource exhaustion.
pub fn search_program(
    program: &Program,
    group_count: u32,
    subject: &[u8],
    encoding: RegexEncoding,
    start: usize,
    anchored_only: bool,
    limits: &MatchLimits,
) -> RegexResult<Option<RawMatch>> {
    if start > subject.len() {
        return Ok(None);
    }
    let mut state = MatchState {
        program,
        subject,
        encoding,
        slots: vec![None; group_count as usize],
        steps: 0,
        depth: 0,
        limits,
        failure: None,
    };
    let single_attempt = anchored_only || program.meta.anchored_start;
    let min_len = program.meta.min_len;
    let mut si = start;
    loop {
        if !single_attempt && let Some(first) = program.meta.first_byte {
            match subject[si..].iter().position(|&b| b == first) {
                Some(off) => si += off,
                None => return Ok(None),
            }
        }
        if si + min_len > subject.len() {
            return Ok(None);
        }
        state.slots.fill(None);
        if let Some(end) = state.run(program.root(), si, &Cont::Accept) {
            return Ok(Some(RawMatch {
                start: si,
                end,
                slots: std::mem::take(&mut state.slots),
            }));
        }
        if let Some(err) = state.failure.take() {
            return Err(err);
        }
        if single_attempt || si >= subject.len() {
            return Ok(None);
        }
        let Some((_, width)) = encoding.decode(subject, si) else {
            return Ok(None);
        };
        si += width;
    }
}

impl<'a> MatchState<'a> {
    /// Match the node `id` at `si`, then the continuation. Returns the
    /// final match end on success. A `None` with `self.failure` set is
    /// a hard abort, not a backtrack.
    fn run(&mut self, id: NodeId, si: usize, cont: &Cont<'_>) -> Option<usize> {
        if self.failure.is_some() || !self.tick() {
            return None;
        }
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            self.failure = Some(RegexError::Timeout);
            self.depth -= 1;
            return None;
        }
        let result = self.run_node(id, si, cont);
        self.depth -= 1;
        result
    }

    fn tick(&mut self) -> bool {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            self.failure = Some(RegexError::Timeout);
            return false;
        }
        if self.steps & CANCEL_POLL_MASK == 0
            && let Some(flag) = &self.limits.cancel
            && flag.load(Ordering::Relaxed)
        {
            self.failure = Some(RegexError::Timeout);
            return false;
        }
        true
    }

    fn run_node(&mut self, id: NodeId, si: usize, cont: &Cont<'_>) -> Option<usize> {
        let program = self.program;
        match program.node(id) {
            Node::Empty => self.resume(si, cont),
            Node::Literal { c, fold } => match self.encoding.decode(self.subject, si) {
                Some((sc, width)) if chars_eq(sc, *c, *fold, self.encoding.is_unicode()) => {
                    self.resume(si + width, cont)
                }
                _ => None,
            },
            Node::Any { dot_all } => match self.encoding.decode(self.subject, si) {
                Some((sc, width)) if *dot_all || sc != '\n' => self.resume(si + width, cont),
                _ => None,
            },
            Node::Class { set, fold } => match self.encoding.decode(self.subject, si) {
                Some((sc, width)) if set.matches(sc, self.encoding.is_unicode(), *fold) => {
                    self.resume(si + width, cont)
                }
                _ => None,
            },
            Node::Assert(kind) => {
                if self.check_assert(*kind, si) {
                    self.resume(si, cont)
                } else {
                    None
                }
            }
            Node::Seq(children) => self.run_seq(children, si, cont),
            Node::Alt(children) => {
                for &branch in children.iter() {
                    if let Some(end) = self.run(branch, si, cont) {
                        return Some(end);
                    }
                    if self.failure.is_some() {
                        return None;
                    }
                }
                None
            }
            Node::Group { slot, child } => match slot {
                Some(index) => {
                    let next = Cont::Group {
                        slot: *index,
                        start: si,
                        next: cont,
                    };
                    self.run(*child, si, &next)
                }
                None => self.run(*child, si, cont),
            },
            Node::Repeat {
                child,
                min,
                max,
                greedy,
            } => {
                if is_simple(program.node(*child)) {
                    self.repeat_simple(*child, *min, *max, *greedy, si, cont)
                } else {
                    self.repeat(id, 0, si, cont)
                }
            }
            Node::Backref { indices, fold } => self.backref(indices, *fold, si, cont),
            Node::Look {
                kind,
                child,
                max_back,
            } => self.lookaround(*kind, *child, *max_back, si, cont),
        }
    }

    fn run_seq(&mut self, seq: &[NodeId], si: usize, cont: &Cont<'_>) -> Option<usize> {
        match seq.split_first() {
            None => self.resume(si, cont),
            Some((&first, rest)) => {
                if rest.is_empty() {
                    self.run(first, si, cont)
                } else {
                    let next = Cont::Seq { seq: rest, next: cont };
                    self.run(first, si, &next)
                }
            }
        }
    }

    /// Feed a position into the continuation chain.
    fn resume(&mut self, si: usize, cont: &Cont<'_>) -> Option<usize> {
        match cont {
            Cont::Accept => Some(si),
            Cont::AcceptAt(target) => (si == *target).then_some(si),
            Cont::Seq { seq, next } => self.run_seq(seq, si, next),
            Cont::Group { slot, start, next } => {
                let at = *slot as usize - 1;
                let old = self.slots[at];
                self.slots[at] = Some((*start, si));
                match self.resume(si, next) {
                    Some(end) => Some(end),
                    None => {
                        self.slots[at] = old;
                        None
                    }
                }
            }
            Cont::Repeat {
                id,
                done,
                iter_start,
                next,
            } => {
                if si == *iter_start {
                    // The body matched nothing; another turn could not
                    // make progress, so leave the loop here.
                    self.resume(si, next)
                } else {
                    self.repeat(*id, *done, si, next)
                }
            }
        }
    }

    /// One decision point of a general quantifier: `done` iterations
    /// are complete and the cursor is at `si`.
    fn repeat(&mut self, id: NodeId, done: u32, si: usize, cont: &Cont<'_>) -> Option<usize> {
        let program = self.program;
        let Node::Repeat {
            child,
            min,
            max,
            greedy,
        } = program.node(id)
        else {
            return None;
        };
        let can_iterate = max.is_none_or(|m| done < m);
        let satisfied = done >= *min;
        if *greedy {
            if can_iterate {
                let next = Cont::Repeat {
                    id,
                    done: done + 1,
                    iter_start: si,
                    next: cont,
                };
                if let Some(end) = self.run(*child, si, &next) {
                    return Some(end);
                }
                if self.failure.is_some() {
                    return None;
                }
            }
            if satisfied { self.resume(si, cont) } else { None }
        } else {
            if satisfied {
                if let Some(end) = self.resume(si, cont) {
                    return Some(end);
                }
                if self.failure.is_some() {
                    return None;
                }
            }
            if can_iterate {
                let next = Cont::Repeat {
                    id,
                    done: done + 1,
                    iter_start: si,
                    next: cont,
                };
                self.run(*child, si, &next)
            } else {
                None
            }
        }
    }

    /// Iterative quantifier for single-character bodies: consume the
    /// longest run up front, then hand candidate end positions to the
    /// continuation in greedy (longest-first) or lazy order.
    fn repeat_simple(
        &mut self,
        child: NodeId,
        min: u32,
        max: Option<u32>,
        greedy: bool,
        si: usize,
        cont: &Cont<'_>,
    ) -> Option<usize> {
        let program = self.program;
        let node = program.node(child);
        let unicode = self.encoding.is_unicode();
        let mut ends = vec![si];
        let mut at = si;
        loop {
            if let Some(m) = max
                && ends.len() as u64 > m as u64
            {
                break;
            }
            if !self.tick() {
                return None;
            }
            match self.encoding.decode(self.subject, at) {
                Some((c, width)) if simple_matches(node, c, unicode) => {
                    at += width;
                    ends.push(at);
                }
                _ => break,
            }
        }
        let count = ends.len() - 1;
        if count < min as usize {
            return None;
        }
        if greedy {
            for &end in ends[min as usize..].iter().rev() {
                if let Some(result) = self.resume(end, cont) {
                    return Some(result);
                }
                if self.failure.is_some() {
                    return None;
                }
            }
        } else {
            for &end in ends[min as usize..].iter() {
                if let Some(result) = self.resume(end, cont) {
                    return Some(result);
                }
                if self.failure.is_some() {
                    return None;
                }
            }
        }
        None
    }

    /// Backreference: try each candidate index (most recent declaration
    /// first), skipping groups that have not participated. A reference
    /// whose every group is unset fails the branch.
    fn backref(
        &mut self,
        indices: &[u32],
        fold: bool,
        si: usize,
        cont: &Cont<'_>,
    ) -> Option<usize> {
        for &index in indices {
            let Some((start, end)) = self.slots[index as usize - 1] else {
                continue;
            };
            if let Some(after) = self.backref_text_match(start, end, fold, si) {
                if let Some(result) = self.resume(after, cont) {
                    return Some(result);
                }
                if self.failure.is_some() {
                    return None;
                }
            }
        }
        None
    }

    /// Compare the captured span against the subject at `si`.
    fn backref_text_match(
        &self,
        start: usize,
        end: usize,
        fold: bool,
        si: usize,
    ) -> Option<usize> {
        if !fold {
            let len = end - start;
            if si + len <= self.subject.len() && self.subject[si..si + len] == self.subject[start..end]
            {
                Some(si + len)
            } else {
                None
            }
        } else {
            let unicode = self.encoding.is_unicode();
            let mut a = start;
            let mut b = si;
            while a < end {
                let (ca, wa) = self.encoding.decode(self.subject, a)?;
                let (cb, wb) = self.encoding.decode(self.subject, b)?;
                if !chars_eq(ca, cb, true, unicode) {
                    return None;
                }
                a += wa;
                b += wb;
            }
            Some(b)
        }
    }

    /// Zero-width lookaround. Captures made inside the body are
    /// discarded whether or not the assertion holds.
    fn lookaround(
        &mut self,
        kind: LookKind,
        child: NodeId,
        max_back: u32,
        si: usize,
        cont: &Cont<'_>,
    ) -> Option<usize> {
        let found = match kind {
            LookKind::Ahead | LookKind::AheadNeg => self.sub_match(child, si, None),
            LookKind::Behind | LookKind::BehindNeg => {
                // Candidate start positions, nearest (shortest) first.
                let mut hit = false;
                let mut p = si;
                loop {
                    if self.sub_match(child, p, Some(si)) {
                        hit = true;
                        break;
                    }
                    if self.failure.is_some() {
                        return None;
                    }
                    if p == 0 || si - p >= max_back as usize {
                        break;
                    }
                    p = self.encoding.prev_char_start(self.subject, p);
                }
                hit
            }
        };
        if self.failure.is_some() {
            return None;
        }
        let holds = match kind {
            LookKind::Ahead | LookKind::Behind => found,
            LookKind::AheadNeg | LookKind::BehindNeg => !found,
        };
        if holds { self.resume(si, cont) } else { None }
    }

    /// Run `child` as an isolated sub-pattern at `si`. With a `target`,
    /// the body must end exactly there (lookbehind). Capture slots are
    /// restored afterwards in every case.
    fn sub_match(&mut self, child: NodeId, si: usize, target: Option<usize>) -> bool {
        let saved = self.slots.clone();
        let matched = match target {
            None => self.run(child, si, &Cont::Accept).is_some(),
            Some(t) => self.run(child, si, &Cont::AcceptAt(t)).is_some(),
        };
        self.slots = saved;
        matched
    }

    fn check_assert(&self, kind: AssertKind, si: usize) -> bool {
        let len = self.subject.len();
        match kind {
            // ^ and $ are always line anchors; MULTILINE only widens `.`.
            AssertKind::LineStart => si == 0 || self.subject[si - 1] == b'\n',
            AssertKind::LineEnd => si == len || self.subject[si] == b'\n',
            AssertKind::TextStart => si == 0,
            AssertKind::TextEnd => si == len,
            AssertKind::TextEndNewline => {
                si == len || (si + 1 == len && self.subject[si] == b'\n')
            }
            AssertKind::WordBoundary => self.word_before(si) != self.word_after(si),
            AssertKind::NotWordBoundary => self.word_before(si) == self.word_after(si),
        }
    }

    fn word_after(&self, si: usize) -> bool {
        self.encoding
            .decode(self.subject, si)
            .is_some_and(|(c, _)| is_word_char(c))
    }

    fn word_before(&self, si: usize) -> bool {
        if si == 0 {
            return false;
        }
        let p = self.encoding.prev_char_start(self.subject, si);
        self.encoding
            .decode(self.subject, p)
            .is_some_and(|(c, _)| is_word_char(c))
    }
}

/// Single-character nodes eligible for the iterative repeat path.
fn is_simple(node: &Node) -> bool {
    matches!(
        node,
        Node::Literal { .. } | Node::Any { .. } | Node::Class { .. }
    )
}

fn simple_matches(node: &Node, c: char, unicode: bool) -> bool {
    match node {
        Node::Literal { c: lit, fold } => chars_eq(c, *lit, *fold, unicode),
        Node::Any { dot_all } => *dot_all || c != '\n',
        Node::Class { set, fold } => set.matches(c, unicode, *fold),
        _ => false,
    }
}
