//! Matching entry points for a scanner step.
//!
//! Each function takes a [`ScanCtx`] and a [`RegionSet`], runs one engine
//! call (or none, for the literal path), and on success returns the absolute
//! byte position where the match ended. The caller moves its cursor there.
//! The stored regions stay window-relative; adding [`ScanCtx::offs`] converts
//! them back to absolute positions, which is exactly what the return value
//! does for slot 0.

use crate::context::ScanCtx;
use crate::engine::Matcher;
use crate::region::RegionSet;

/// Matches `pattern` anchored at the cursor.
///
/// The match must begin exactly at [`ScanCtx::curr`]; a match further right
/// does not count. Returns the absolute end of the match, `None` on failure.
pub fn match_anchored<M: Matcher + ?Sized>(
    pattern: &M,
    ctx: ScanCtx<'_>,
    regs: &mut RegionSet,
) -> Option<usize> {
    pattern.match_at(ctx.text(), ctx.window(), ctx.curr(), regs)?;
    Some(absolute_end(regs, ctx))
}

/// Searches for the leftmost match of `pattern` at or after the cursor.
///
/// Returns the absolute end of the match, `None` when the rest of the
/// window never matches.
pub fn search_unanchored<M: Matcher + ?Sized>(
    pattern: &M,
    ctx: ScanCtx<'_>,
    regs: &mut RegionSet,
) -> Option<usize> {
    pattern.search_in(ctx.text(), ctx.window(), ctx.curr(), regs)?;
    Some(absolute_end(regs, ctx))
}

/// Matches a plain string anchored at the cursor, bypassing the engine.
///
/// Succeeds when the bytes at the cursor equal `lit`, storing the match as
/// slot 0 and nothing else. Region bookkeeping is identical to a successful
/// [`match_anchored`] of the literal, so callers cannot tell the two paths
/// apart afterwards. On failure the regions are left untouched.
pub fn match_literal(lit: &str, ctx: ScanCtx<'_>, regs: &mut RegionSet) -> Option<usize> {
    if ctx.rest_len() < lit.len() {
        return None;
    }
    let at = ctx.curr();
    if &ctx.text().as_bytes()[at..at + lit.len()] != lit.as_bytes() {
        return None;
    }
    regs.clear();
    let begin = (at - ctx.offs()) as isize;
    regs.set_region(0, begin, begin + lit.len() as isize);
    Some(absolute_end(regs, ctx))
}

/// Converts the end of slot 0 back to an absolute position.
fn absolute_end(regs: &RegionSet, ctx: ScanCtx<'_>) -> usize {
    debug_assert!(regs.pos(0).is_some(), "match reported without a slot 0 region");
    regs.end(0) as usize + ctx.offs()
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use proptest::prelude::*;

    use super::*;
    use crate::pattern::Pattern;

    fn pat(source: &str) -> Pattern {
        Pattern::new(source).expect(source)
    }

    // --- Literal path ---

    #[test]
    fn literal_at_the_start() {
        let mut regs = RegionSet::new();
        let end = match_literal("foo", ScanCtx::new("foobar", 0, 0), &mut regs);
        assert_eq!(end, Some(3));
        assert_eq!(regs.pos(0), Some((0, 3)));
        assert_eq!(regs.len(), 1);
    }

    #[test]
    fn literal_reports_relative_to_the_window_base() {
        let mut regs = RegionSet::new();
        let end = match_literal("bar", ScanCtx::new("foobar", 3, 3), &mut regs);
        assert_eq!(end, Some(6));
        assert_eq!(regs.pos(0), Some((0, 3)));

        let end = match_literal("bar", ScanCtx::new("foobar", 3, 0), &mut regs);
        assert_eq!(end, Some(6));
        assert_eq!(regs.pos(0), Some((3, 6)));
    }

    #[test]
    fn empty_literal_matches_at_the_cursor() {
        let mut regs = RegionSet::new();
        assert_eq!(match_literal("", ScanCtx::new("foobar", 2, 0), &mut regs), Some(2));
        assert_eq!(regs.pos(0), Some((2, 2)));
    }

    #[test]
    fn failed_literal_leaves_regions_alone() {
        let mut regs = RegionSet::new();
        regs.set_region(0, 4, 7);
        assert_eq!(match_literal("zz", ScanCtx::new("abc", 0, 0), &mut regs), None);
        assert_eq!(match_literal("abcd", ScanCtx::new("abc", 1, 0), &mut regs), None);
        assert_eq!(regs.pos(0), Some((4, 7)));
    }

    #[test]
    fn literal_replaces_older_slots() {
        let mut regs = RegionSet::new();
        regs.set_region(2, 1, 2);
        match_literal("fo", ScanCtx::new("foobar", 0, 0), &mut regs);
        assert_eq!(regs.len(), 1);
    }

    // --- Anchored match vs. search ---

    #[test]
    fn anchored_match_begins_at_the_cursor() {
        let mut regs = RegionSet::new();
        let end = match_anchored(&pat("[a-z]+"), ScanCtx::new("abc123", 0, 0), &mut regs);
        assert_eq!(end, Some(3));
        assert_eq!(regs.pos(0), Some((0, 3)));
    }

    #[test]
    fn anchored_fails_where_search_succeeds() {
        let digits = pat("[0-9]+");
        let mut regs = RegionSet::new();
        regs.set_region(0, 9, 9);

        let ctx = ScanCtx::new("abc123", 0, 0);
        assert_eq!(match_anchored(&digits, ctx, &mut regs), None);
        assert_eq!(regs.pos(0), Some((9, 9)));

        let end = search_unanchored(&digits, ctx, &mut regs);
        assert_eq!(end, Some(6));
        assert_eq!(regs.pos(0), Some((3, 6)));
    }

    #[test]
    fn search_starts_at_the_cursor_not_the_window_base() {
        let mut regs = RegionSet::new();
        let end = search_unanchored(&pat("a"), ScanCtx::new("aba", 1, 0), &mut regs);
        assert_eq!(end, Some(3));
        assert_eq!(regs.pos(0), Some((2, 3)));
    }

    #[test]
    fn search_reports_relative_to_the_window_base() {
        let mut regs = RegionSet::new();
        let end = search_unanchored(&pat("bc"), ScanCtx::new("xxabc", 2, 2), &mut regs);
        assert_eq!(end, Some(5));
        assert_eq!(regs.pos(0), Some((1, 3)));
    }

    #[test]
    fn group_regions_are_stored_per_slot() {
        let mut regs = RegionSet::new();
        let end = search_unanchored(
            &pat("([a-z]+)=([0-9]+)"),
            ScanCtx::new("k=42", 0, 0),
            &mut regs,
        );
        assert_eq!(end, Some(4));
        assert_eq!(regs.len(), 3);
        assert_eq!(regs.pos(0), Some((0, 4)));
        assert_eq!(regs.pos(1), Some((0, 1)));
        assert_eq!(regs.pos(2), Some((2, 4)));
    }

    #[test]
    fn unparticipating_group_stays_unset() {
        let mut regs = RegionSet::new();
        match_anchored(&pat("(a)|(b)"), ScanCtx::new("b", 0, 0), &mut regs);
        assert_eq!(regs.len(), 3);
        assert_eq!(regs.pos(1), None);
        assert_eq!(regs.pos(2), Some((0, 1)));
    }

    #[test]
    fn caret_anchors_to_the_window_base() {
        let pattern = pat("^b");
        let mut regs = RegionSet::new();
        // Window starts at the cursor, so the cursor counts as a line start.
        let end = match_anchored(&pattern, ScanCtx::new("ab", 1, 1), &mut regs);
        assert_eq!(end, Some(2));
        // Window starts at zero; position 1 is mid-line.
        assert_eq!(match_anchored(&pattern, ScanCtx::new("ab", 1, 0), &mut regs), None);
        // After a newline the caret holds regardless of the base.
        assert_eq!(match_anchored(&pattern, ScanCtx::new("a\nb", 2, 0), &mut regs), Some(3));
    }

    #[test]
    fn cursor_walkthrough_in_both_reporting_modes() {
        let text = "ab 12";
        let word = pat("[a-z]+");
        let gap = pat(" +");
        let digits = pat("[0-9]+");
        let mut regs = RegionSet::new();

        // Window-relative reporting: the base rides along with the cursor.
        let mut curr = 0;
        for (pattern, expect) in [(&word, 2), (&gap, 3), (&digits, 5)] {
            let end = match_anchored(pattern, ScanCtx::new(text, curr, curr), &mut regs);
            assert_eq!(end, Some(expect));
            assert_eq!(regs.pos(0), Some((0, expect - curr)));
            curr = expect;
        }

        // Absolute reporting: the base stays pinned at zero.
        let mut curr = 0;
        for (pattern, expect) in [(&word, 2), (&gap, 3), (&digits, 5)] {
            let end = match_anchored(pattern, ScanCtx::new(text, curr, 0), &mut regs);
            assert_eq!(end, Some(expect));
            assert_eq!(regs.pos(0), Some((curr, expect)));
            curr = expect;
        }
    }

    // --- Engine substitution ---

    /// Matches a fixed number of bytes at the requested position, whatever
    /// they are.
    struct FixedLen(usize);

    impl Matcher for FixedLen {
        fn match_at(
            &self,
            _text: &str,
            window: Range<usize>,
            at: usize,
            regs: &mut RegionSet,
        ) -> Option<usize> {
            if at + self.0 > window.end {
                return None;
            }
            regs.clear();
            let begin = (at - window.start) as isize;
            regs.set_region(0, begin, begin + self.0 as isize);
            Some(self.0)
        }

        fn search_in(
            &self,
            text: &str,
            window: Range<usize>,
            from: usize,
            regs: &mut RegionSet,
        ) -> Option<usize> {
            self.match_at(text, window.clone(), from, regs)?;
            Some(from - window.start)
        }

        fn for_each_named_group(&self, _visit: &mut dyn FnMut(&str, &[usize])) {}

        fn name_to_backref(&self, _name: &str, _regs: &RegionSet) -> Option<usize> {
            None
        }
    }

    #[test]
    fn any_engine_can_sit_behind_the_entry_points() {
        let engine: &dyn Matcher = &FixedLen(2);
        let mut regs = RegionSet::new();
        assert_eq!(match_anchored(engine, ScanCtx::new("abcd", 1, 0), &mut regs), Some(3));
        assert_eq!(regs.pos(0), Some((1, 3)));
        assert_eq!(match_anchored(engine, ScanCtx::new("abcd", 3, 0), &mut regs), None);
        assert_eq!(search_unanchored(engine, ScanCtx::new("abcd", 2, 2), &mut regs), Some(4));
        assert_eq!(regs.pos(0), Some((0, 2)));
    }

    // --- Properties ---

    fn literal_cases() -> impl Strategy<Value = (String, usize, usize, usize)> {
        "[a-z]{0,24}"
            .prop_flat_map(|text| {
                let len = text.len();
                (Just(text), 0..=len)
            })
            .prop_flat_map(|(text, curr)| {
                let take = text.len() - curr;
                (Just(text), Just(curr), 0..=take)
            })
            .prop_flat_map(|(text, curr, take)| (Just(text), Just(curr), Just(take), 0..=curr))
    }

    proptest! {
        #[test]
        fn prop_literal_bounds_follow_cursor_and_base((text, curr, take, offs) in literal_cases()) {
            let lit = text[curr..curr + take].to_string();
            let mut regs = RegionSet::new();
            let end = match_literal(&lit, ScanCtx::new(&text, curr, offs), &mut regs);
            prop_assert_eq!(end, Some(curr + take));
            let begin = curr - offs;
            prop_assert_eq!(regs.pos(0), Some((begin, begin + take)));
            prop_assert_eq!(regs.len(), 1);
        }

        #[test]
        fn prop_anchored_success_agrees_with_search(
            text in "[a-z0-9 ]{0,16}",
            curr_seed in 0usize..16,
        ) {
            let curr = curr_seed.min(text.len());
            let pattern = Pattern::new("[a-z]+").unwrap();
            let mut m_regs = RegionSet::new();
            let mut s_regs = RegionSet::new();
            let ctx = ScanCtx::new(&text, curr, curr);
            if let Some(end) = match_anchored(&pattern, ctx, &mut m_regs) {
                prop_assert_eq!(search_unanchored(&pattern, ctx, &mut s_regs), Some(end));
                prop_assert_eq!(s_regs.pos(0), m_regs.pos(0));
            }
        }
    }
}
