//! Scan state shared by the matching entry points.

use std::ops::Range;

/// A borrowed haystack plus the two positions that drive a scan step.
///
/// `curr` is the cursor: the byte index where anchored matching and forward
/// searching start. `offs` is the window base: the byte index the pattern
/// engine treats as the start of its subject, and the base every stored
/// region is relative to. A scanner that reports window-relative positions
/// passes `offs == curr`; one that reports absolute positions passes
/// `offs == 0`. Either way `offs <= curr` holds, so matching never starts
/// to the left of the window.
#[derive(Debug, Clone, Copy)]
pub struct ScanCtx<'s> {
    text: &'s str,
    curr: usize,
    offs: usize,
}

impl<'s> ScanCtx<'s> {
    /// Bundles a haystack with a cursor and window base.
    ///
    /// # Panics
    ///
    /// Panics unless `offs <= curr <= text.len()`.
    pub fn new(text: &'s str, curr: usize, offs: usize) -> Self {
        assert!(
            curr <= text.len(),
            "scan cursor {curr} out of range for a {}-byte haystack",
            text.len()
        );
        assert!(offs <= curr, "window base {offs} lies past the cursor {curr}");
        ScanCtx { text, curr, offs }
    }

    /// The haystack being scanned.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Cursor position, in bytes from the start of the haystack.
    pub fn curr(&self) -> usize {
        self.curr
    }

    /// Window base, in bytes from the start of the haystack.
    pub fn offs(&self) -> usize {
        self.offs
    }

    /// Bytes remaining between the cursor and the end of the haystack.
    pub fn rest_len(&self) -> usize {
        self.text.len() - self.curr
    }

    /// The byte range the pattern engine may see.
    ///
    /// Runs from the window base to the end of the haystack; the cursor
    /// always lies inside it.
    pub fn window(&self) -> Range<usize> {
        self.offs..self.text.len()
    }
}
