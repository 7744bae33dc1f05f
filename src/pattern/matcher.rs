//! Backtracking matcher over the pattern tree.
//!
//! All positions are **byte** indices into the full haystack. The window
//! only bounds what the matcher may look at: anchors treat `window.start`
//! as the start of the subject and `window.end` as its end, and no element
//! reads a byte outside it.
//!
//! Matching is leftmost-first with the usual backtracking preferences:
//! alternation branches left to right, greedy quantifiers longest first,
//! lazy ones shortest first. A backreference to a group that has not
//! matched fails. Repeats of fixed-width elements run iteratively,
//! captureless groups of them included; other repeats recurse once per
//! iteration. Each attempt gets a fresh step budget and a recursion depth
//! bound, so pathological patterns report a failed match instead of
//! running away, and a search gives up once one of its attempts does.

use std::ops::Range;

use memchr::memchr;

use super::ast::*;
use super::classes::set_matches;

/// Maximum number of backtracking steps in one attempt.
const MAX_STEPS: usize = 100_000;

/// Maximum live recursion depth of the backtracking core. Composite
/// repeats recurse once per iteration; this bounds the stack they can
/// consume on a long subject.
const MAX_DEPTH: usize = 1_000;

/// Spans of a successful match, absolute within the haystack.
#[derive(Debug)]
pub struct MatchSpans {
    pub start: usize,
    pub end: usize,
    /// One entry per numbered group, `None` when the group did not
    /// participate in the match.
    pub groups: Vec<Option<(usize, usize)>>,
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Try to match starting exactly at `at`.
pub fn match_at(ast: &Ast, text: &[u8], window: Range<usize>, at: usize) -> Option<MatchSpans> {
    debug_assert!(window.start <= at && at <= window.end && window.end <= text.len());
    let mut state = MatchState::new(ast, text, window);
    let end = state.attempt(&ast.root, at)?;
    Some(state.spans(at, end))
}

/// Find the leftmost match starting in `from..=window.end`.
///
/// Each candidate position is tried with a fresh budget; the search
/// stops early only when a single attempt exhausts its own.
pub fn search_in(ast: &Ast, text: &[u8], window: Range<usize>, from: usize) -> Option<MatchSpans> {
    debug_assert!(window.start <= from && from <= window.end && window.end <= text.len());
    let mut state = MatchState::new(ast, text, window.clone());
    let skip = required_first_byte(ast);
    let mut pos = from;
    while pos <= window.end {
        if let Some(byte) = skip {
            match memchr(byte, &text[pos..window.end]) {
                Some(found) => pos += found,
                None => return None,
            }
        }
        if let Some(end) = state.attempt(&ast.root, pos) {
            return Some(state.spans(pos, end));
        }
        if state.exhausted() {
            return None;
        }
        pos += 1;
    }
    None
}

/// First byte every match must start with, when the tree proves one.
fn required_first_byte(ast: &Ast) -> Option<u8> {
    let [branch] = ast.root.branches.as_slice() else {
        return None;
    };
    let item = branch.items.first()?;
    if item.quantifier.min == 0 {
        return None;
    }
    match &item.element {
        Element::Literal(bytes) => bytes.first().copied(),
        _ => None,
    }
}

// ─── Matcher state ──────────────────────────────────────────────────────────

/// In-flight capture bounds of one group.
#[derive(Debug, Clone, Copy, Default)]
struct Cap {
    begin: Option<usize>,
    end: Option<usize>,
}

struct MatchState<'a> {
    text: &'a [u8],
    window: Range<usize>,
    names: &'a [NamedGroup],
    /// Indexed by group number; slot 0 is unused.
    caps: Vec<Cap>,
    steps: usize,
    depth: usize,
}

impl<'a> MatchState<'a> {
    fn new(ast: &'a Ast, text: &'a [u8], window: Range<usize>) -> Self {
        MatchState {
            text,
            window,
            names: &ast.names,
            caps: vec![Cap::default(); ast.group_count + 1],
            steps: 0,
            depth: 0,
        }
    }

    /// One match attempt at `at`, with fresh captures and a fresh budget.
    fn attempt(&mut self, root: &'a Alternation, at: usize) -> Option<usize> {
        self.caps.fill(Cap::default());
        self.steps = 0;
        self.depth = 0;
        let found = match_alternation(root, at, self, &Cont::Done);
        // an over-budget attempt may still unwind into a short match
        if self.exhausted() {
            return None;
        }
        found
    }

    fn spans(&self, start: usize, end: usize) -> MatchSpans {
        let groups = self.caps[1..]
            .iter()
            .map(|cap| match (cap.begin, cap.end) {
                (Some(b), Some(e)) => Some((b, e)),
                _ => None,
            })
            .collect();
        MatchSpans { start, end, groups }
    }

    /// Charge one step against the attempt's budget and report whether it
    /// is spent. Going past the depth bound forfeits the remaining steps,
    /// so a too-deep attempt fails as a whole instead of backing off into
    /// a shorter match.
    fn over_budget(&mut self) -> bool {
        if self.depth > MAX_DEPTH {
            self.steps = MAX_STEPS + 1;
        } else {
            self.steps += 1;
        }
        self.steps > MAX_STEPS
    }

    fn exhausted(&self) -> bool {
        self.steps > MAX_STEPS
    }

    fn anchor_holds(&self, anchor: Anchor, pos: usize) -> bool {
        match anchor {
            Anchor::TextStart => pos == self.window.start,
            Anchor::TextEnd => pos == self.window.end,
            Anchor::LineStart => pos == self.window.start || self.text[pos - 1] == b'\n',
            Anchor::LineEnd => pos == self.window.end || self.text[pos] == b'\n',
        }
    }

    /// End of the repeated capture when group `group` matches again at
    /// `pos`, `None` when the group has not participated or the bytes
    /// differ.
    fn match_backref(&self, group: usize, pos: usize) -> Option<usize> {
        let cap = self.caps[group];
        let (begin, end) = (cap.begin?, cap.end?);
        let stop = pos + (end - begin);
        if stop <= self.window.end && self.text[pos..stop] == self.text[begin..end] {
            Some(stop)
        } else {
            None
        }
    }

    /// Group number a named backreference uses right now: the highest
    /// group under the name that has fully matched, otherwise the highest
    /// defined.
    fn live_group_for(&self, name: &str) -> Option<usize> {
        let entry = self.names.iter().find(|entry| entry.name == name)?;
        for &number in entry.numbers.iter().rev() {
            let cap = self.caps[number];
            if cap.begin.is_some() && cap.end.is_some() {
                return Some(number);
            }
        }
        entry.numbers.last().copied()
    }
}

// ─── Backtracking core ──────────────────────────────────────────────────────

/// What to match after the current element succeeds. Stored on the call
/// stack; backtracking unwinds back through it.
#[derive(Clone, Copy)]
enum Cont<'a, 'c> {
    /// End of the pattern: the current position is the match end.
    Done,
    /// Resume a quantifier loop after one iteration of its element.
    Rep {
        item: &'a Item,
        rest: &'a [Item],
        count: u32,
        start: usize,
        next: &'c Cont<'a, 'c>,
    },
    /// Record the end of a capturing group, then continue.
    Close {
        group: usize,
        next: &'c Cont<'a, 'c>,
    },
}

fn match_alternation<'a>(
    alt: &'a Alternation,
    pos: usize,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    for branch in &alt.branches {
        if let Some(end) = match_sequence(&branch.items, pos, st, cont) {
            return Some(end);
        }
    }
    None
}

fn match_sequence<'a>(
    items: &'a [Item],
    pos: usize,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    match items.split_first() {
        None => resume(cont, pos, st),
        Some((item, rest)) => match_item_backtrack(item, rest, pos, 0, st, cont),
    }
}

/// Drive one item's quantifier. `count` iterations have already matched.
///
/// Every deepening of the backtracking core passes through here, so this
/// is where the budget is charged and the recursion depth tracked.
fn match_item_backtrack<'a>(
    item: &'a Item,
    rest: &'a [Item],
    pos: usize,
    count: u32,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    if st.over_budget() {
        return None;
    }
    st.depth += 1;
    let found = match_item(item, rest, pos, count, st, cont);
    st.depth -= 1;
    found
}

fn match_item<'a>(
    item: &'a Item,
    rest: &'a [Item],
    pos: usize,
    count: u32,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    if count == 0
        && let Some(width) = fixed_width(&item.element)
    {
        return match_simple_repeat(item, rest, pos, width, st, cont);
    }
    let q = item.quantifier;
    let may_repeat = q.max.is_none_or(|max| count < max);
    if q.lazy {
        if count >= q.min
            && let Some(end) = match_sequence(rest, pos, st, cont)
        {
            return Some(end);
        }
        if may_repeat {
            return match_element_once(item, rest, pos, count, st, cont);
        }
        None
    } else {
        if may_repeat
            && let Some(end) = match_element_once(item, rest, pos, count, st, cont)
        {
            return Some(end);
        }
        if count >= q.min {
            return match_sequence(rest, pos, st, cont);
        }
        None
    }
}

/// Width in bytes of an element that consumes a fixed amount, captures
/// nothing and makes no choices, `None` otherwise.
fn fixed_width(element: &Element) -> Option<usize> {
    match element {
        Element::Literal(bytes) => Some(bytes.len()),
        Element::Any | Element::Class(_) => Some(1),
        Element::Group { index: None, inner } => {
            let [branch] = inner.branches.as_slice() else {
                return None;
            };
            branch
                .items
                .iter()
                .try_fold(0, |total, item| {
                    if item.quantifier != Quantifier::ONCE {
                        return None;
                    }
                    Some(total + fixed_width(&item.element)?)
                })
                // a zero-width group must repeat through the quantifier
                // loop, which guards against non-progress
                .filter(|width| *width > 0)
        }
        _ => None,
    }
}

/// Repeat a fixed-width element by scanning forward once, then hand each
/// candidate count to the rest of the pattern: longest first when greedy,
/// shortest first when lazy. Iterative, so long runs do not recurse.
fn match_simple_repeat<'a>(
    item: &'a Item,
    rest: &'a [Item],
    pos: usize,
    width: usize,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    let q = item.quantifier;
    let mut count: u32 = 0;
    let mut end = pos;
    while q.max.is_none_or(|max| count < max) && consumes_at(&item.element, end, st) {
        count += 1;
        end += width;
    }
    if count < q.min {
        return None;
    }
    if q.lazy {
        for n in q.min..=count {
            if st.over_budget() {
                return None;
            }
            if let Some(found) = match_sequence(rest, pos + n as usize * width, st, cont) {
                return Some(found);
            }
        }
    } else {
        for n in (q.min..=count).rev() {
            if st.over_budget() {
                return None;
            }
            if let Some(found) = match_sequence(rest, pos + n as usize * width, st, cont) {
                return Some(found);
            }
        }
    }
    None
}

/// One instance of a fixed-width element at `pos`.
fn consumes_at(element: &Element, pos: usize, st: &MatchState<'_>) -> bool {
    match element {
        Element::Literal(bytes) => {
            let end = pos + bytes.len();
            end <= st.window.end && st.text[pos..end] == bytes[..]
        }
        Element::Any => pos < st.window.end && st.text[pos] != b'\n',
        Element::Class(set) => pos < st.window.end && set_matches(set, st.text[pos]),
        Element::Group { index: None, inner } => {
            let [branch] = inner.branches.as_slice() else {
                return false;
            };
            let mut at = pos;
            branch.items.iter().all(|item| match fixed_width(&item.element) {
                Some(width) => {
                    let hit = consumes_at(&item.element, at, st);
                    at += width;
                    hit
                }
                None => false,
            })
        }
        _ => false,
    }
}

/// Match one iteration of a composite element, then resume its quantifier
/// loop through a [`Cont::Rep`] frame.
fn match_element_once<'a>(
    item: &'a Item,
    rest: &'a [Item],
    pos: usize,
    count: u32,
    st: &mut MatchState<'a>,
    cont: &Cont<'a, '_>,
) -> Option<usize> {
    let rep = Cont::Rep {
        item,
        rest,
        count: count + 1,
        start: pos,
        next: cont,
    };
    match &item.element {
        Element::Anchor(anchor) => {
            if st.anchor_holds(*anchor, pos) {
                resume(&rep, pos, st)
            } else {
                None
            }
        }
        Element::Group {
            index: Some(group),
            inner,
        } => {
            let saved = st.caps[*group];
            st.caps[*group] = Cap {
                begin: Some(pos),
                end: None,
            };
            let close = Cont::Close {
                group: *group,
                next: &rep,
            };
            let found = match_alternation(inner, pos, st, &close);
            if found.is_none() {
                st.caps[*group] = saved;
            }
            found
        }
        Element::Group { index: None, inner } => match_alternation(inner, pos, st, &rep),
        Element::NumberBackref(group) => {
            let end = st.match_backref(*group, pos)?;
            resume(&rep, end, st)
        }
        Element::NamedBackref(name) => {
            let group = st.live_group_for(name)?;
            let end = st.match_backref(group, pos)?;
            resume(&rep, end, st)
        }
        Element::Literal(_) | Element::Any | Element::Class(_) => {
            unreachable!("fixed-width elements repeat in match_simple_repeat")
        }
    }
}

/// Continue after an element succeeded at `pos`.
fn resume<'a>(cont: &Cont<'a, '_>, pos: usize, st: &mut MatchState<'a>) -> Option<usize> {
    match *cont {
        Cont::Done => Some(pos),
        Cont::Close { group, next } => {
            let saved = st.caps[group];
            st.caps[group].end = Some(pos);
            let found = resume(next, pos, st);
            if found.is_none() {
                st.caps[group] = saved;
            }
            found
        }
        Cont::Rep {
            item,
            rest,
            count,
            start,
            next,
        } => {
            if pos == start {
                // the iteration consumed nothing; repeating it would loop
                match_sequence(rest, pos, st, next)
            } else {
                match_item_backtrack(item, rest, pos, count, st, next)
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
