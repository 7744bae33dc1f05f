//! Interface to a pattern engine.
//!
//! The scanning entry points in [`crate::scan`] and the name lookups in
//! [`crate::names`] drive any engine through this trait. The bundled
//! [`crate::pattern::Pattern`] implements it; so can an adapter around a
//! different engine, as long as it honors the region contract below.

use std::ops::Range;

use crate::region::RegionSet;

/// A compiled pattern that can match and search over a byte window.
///
/// `window` bounds what the engine may examine: `window.start` is the
/// position anchors treat as the start of the subject and the base all
/// stored regions are relative to; `window.end` caps how far matching may
/// read. On success the engine must rewrite `regs` through its public
/// interface, filling slot 0 with the overall match and one slot per
/// numbered group, unparticipating groups unset. On failure `regs` must be
/// left exactly as it was.
pub trait Matcher {
    /// Tries to match starting exactly at `at`.
    ///
    /// `at` lies inside `window`. Returns the length of the match in bytes,
    /// `None` when nothing matches at that position.
    fn match_at(
        &self,
        text: &str,
        window: Range<usize>,
        at: usize,
        regs: &mut RegionSet,
    ) -> Option<usize>;

    /// Searches forward from `from` for the leftmost match.
    ///
    /// `from` lies inside `window`; candidate positions run from there to
    /// `window.end`. Returns the window-relative start of the match, `None`
    /// when no position matches.
    fn search_in(
        &self,
        text: &str,
        window: Range<usize>,
        from: usize,
        regs: &mut RegionSet,
    ) -> Option<usize>;

    /// Calls `visit` once per distinct group name, with every group number
    /// defined under that name in ascending order. Visit order is
    /// engine-defined.
    fn for_each_named_group(&self, visit: &mut dyn FnMut(&str, &[usize]));

    /// Resolves a group name to a single group number, `None` when the
    /// name is not defined.
    ///
    /// When several groups share the name, the numbers are consulted from
    /// highest to lowest and the first whose slot in `regs` is filled wins;
    /// if none is filled, the highest number is returned.
    fn name_to_backref(&self, name: &str, regs: &RegionSet) -> Option<usize>;
}
