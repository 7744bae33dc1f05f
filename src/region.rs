//! Capture region storage.
//!
//! A [`RegionSet`] records one begin/end byte pair per capture slot. Slot 0
//! holds the overall match, slots 1.. hold the numbered groups. Positions are
//! relative to the match window base, not to the start of the haystack, so a
//! stored pair is only meaningful together with the offset of the scan that
//! produced it.

/// Sentinel for a slot bound that no match has filled in.
pub const UNSET: isize = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    begin: isize,
    end: isize,
}

impl Slot {
    const fn unset() -> Self {
        Slot {
            begin: UNSET,
            end: UNSET,
        }
    }
}

/// A growable set of capture regions.
///
/// Slot count is whatever the last writer left behind: a fresh set has no
/// slots, [`RegionSet::set_region`] grows the set on demand and
/// [`RegionSet::clear`] drops every slot while keeping the allocation for
/// reuse. Filled slots satisfy `begin <= end` when both bounds are set;
/// a slot whose group did not participate in the match holds [`UNSET`] in
/// both bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    slots: Vec<Slot>,
}

impl RegionSet {
    /// Creates an empty region set.
    pub fn new() -> Self {
        RegionSet { slots: Vec::new() }
    }

    /// Number of slots currently stored.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slots are stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes every slot, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Stores both bounds of slot `at`, growing the set as needed.
    ///
    /// Slots created between the old length and `at` are left unset.
    pub fn set_region(&mut self, at: usize, begin: isize, end: isize) {
        if at >= self.slots.len() {
            self.slots.resize(at + 1, Slot::unset());
        }
        self.slots[at] = Slot { begin, end };
    }

    /// Begin bound of slot `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not a stored slot.
    pub fn begin(&self, at: usize) -> isize {
        self.slots[at].begin
    }

    /// End bound of slot `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not a stored slot.
    pub fn end(&self, at: usize) -> isize {
        self.slots[at].end
    }

    /// Overwrites the begin bound of slot `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not a stored slot.
    pub fn set_begin(&mut self, at: usize, value: isize) {
        self.slots[at].begin = value;
    }

    /// Overwrites the end bound of slot `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not a stored slot.
    pub fn set_end(&mut self, at: usize, value: isize) {
        self.slots[at].end = value;
    }

    /// Both bounds of slot `at`, or `None` when the slot is missing or
    /// either bound is negative.
    pub fn pos(&self, at: usize) -> Option<(usize, usize)> {
        let slot = self.slots.get(at)?;
        if slot.begin < 0 || slot.end < 0 {
            return None;
        }
        Some((slot.begin as usize, slot.end as usize))
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        Self::new()
    }
}
