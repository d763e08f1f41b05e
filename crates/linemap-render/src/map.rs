#![forbid(unsafe_code)]

//! The correspondence map and the hunks derived from it.
//!
//! The map holds one slot per new-screen line: the old-screen line that
//! plausibly carries the same content, or `None`. Every stage of the
//! computation edits it in place. A slot only moves `None → Some` (anchors,
//! growth) or `Some → None` (hunk validation), never between two different
//! old lines.
//!
//! A [`Hunk`] is a maximal run of new lines sharing one shift
//! (`old − new`). Hunks are what a scroll optimizer turns into terminal
//! scroll, insert-line and delete-line operations.

use std::collections::TryReserveError;

/// A maximal run of new lines mapped with one constant shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    /// First new line (inclusive).
    pub start: u16,
    /// One past the last new line.
    pub end: u16,
    /// `old − new` for every line in the run.
    pub shift: i32,
}

impl Hunk {
    /// Create a hunk.
    #[inline]
    pub const fn new(start: u16, end: u16, shift: i32) -> Self {
        debug_assert!(start <= end);
        Self { start, end, shift }
    }

    /// Number of new lines covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// Check if the hunk covers no lines.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// First old line the hunk is sourced from.
    #[inline]
    pub const fn old_start(&self) -> i32 {
        self.start as i32 + self.shift
    }

    /// One past the last old line the hunk is sourced from.
    #[inline]
    pub const fn old_end(&self) -> i32 {
        self.end as i32 + self.shift
    }

    /// Whether moving this run pays for itself: it must be longer than the
    /// distance it travels.
    #[inline]
    pub const fn is_worth_moving(&self) -> bool {
        self.len() > self.shift.unsigned_abs() as usize
    }
}

/// New line → candidate old line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceMap {
    slots: Vec<Option<u16>>,
}

impl CorrespondenceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from explicit slots.
    pub fn from_slots(slots: Vec<Option<u16>>) -> Self {
        Self { slots }
    }

    /// Resize to `lines` slots, all `None`.
    ///
    /// On allocation failure the map is left empty.
    pub fn reset(&mut self, lines: usize) -> Result<(), TryReserveError> {
        self.slots.clear();
        self.slots.try_reserve(lines)?;
        self.slots.resize(lines, None);
        Ok(())
    }

    /// Set every slot to `None`, keeping the length.
    pub fn clear_all(&mut self) {
        self.slots.fill(None);
    }

    /// Number of slots (new-screen lines).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the map has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Old line for new line `i`, or `None` if unknown or out of bounds.
    #[inline]
    pub fn get(&self, i: usize) -> Option<u16> {
        self.slots.get(i).copied().flatten()
    }

    #[inline]
    pub(crate) fn is_assigned(&self, i: usize) -> bool {
        self.slots[i].is_some()
    }

    /// Assign new line `i` to old line `old`.
    ///
    /// Only unassigned slots may be written.
    #[inline]
    pub(crate) fn assign(&mut self, i: usize, old: usize) {
        debug_assert!(self.slots[i].is_none(), "slot {i} already assigned");
        debug_assert!(old < self.slots.len(), "old line {old} out of range");
        self.slots[i] = Some(old as u16);
    }

    #[inline]
    pub(crate) fn unassign(&mut self, i: usize) {
        self.slots[i] = None;
    }

    /// `old − new` for slot `i`, if assigned.
    #[inline]
    pub fn shift_at(&self, i: usize) -> Option<i32> {
        self.get(i).map(|old| i32::from(old) - i as i32)
    }

    /// Whether new line `i` maps onto the same old line.
    #[inline]
    pub fn is_identity_at(&self, i: usize) -> bool {
        self.shift_at(i) == Some(0)
    }

    /// All slots.
    #[inline]
    pub fn as_slice(&self) -> &[Option<u16>] {
        &self.slots
    }

    /// Iterate over slots.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Option<u16>> + '_ {
        self.slots.iter().copied()
    }

    /// Number of assigned slots.
    pub fn mapped_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// End of the constant-shift run starting at assigned slot `start`.
    pub(crate) fn run_end(&self, start: usize, shift: i32) -> usize {
        let mut i = start + 1;
        while i < self.slots.len() && self.shift_at(i) == Some(shift) {
            i += 1;
        }
        i
    }

    /// First assigned slot at or after `from`, or `len()`.
    pub(crate) fn next_assigned(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.slots.len() && self.slots[i].is_none() {
            i += 1;
        }
        i
    }

    /// Split the map into maximal constant-shift runs, in order.
    pub fn hunks(&self) -> Vec<Hunk> {
        let mut hunks = Vec::new();
        let mut i = self.next_assigned(0);
        while i < self.slots.len() {
            let Some(shift) = self.shift_at(i) else {
                break;
            };
            let end = self.run_end(i, shift);
            hunks.push(Hunk::new(i as u16, end as u16, shift));
            i = self.next_assigned(end);
        }
        hunks
    }

    /// Drop all storage.
    pub fn release(&mut self) {
        self.slots = Vec::new();
    }
}

impl std::fmt::Display for CorrespondenceMap {
    /// Space-separated old indices, `-` for unknown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match slot {
                Some(old) => write!(f, "{old}")?,
                None => f.write_str("-")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(slots: &[Option<u16>]) -> CorrespondenceMap {
        CorrespondenceMap::from_slots(slots.to_vec())
    }

    #[test]
    fn reset_fills_with_none() {
        let mut m = map(&[Some(1), Some(0)]);
        m.reset(4).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.mapped_count(), 0);
    }

    #[test]
    fn shift_is_old_minus_new() {
        let m = map(&[None, Some(0), Some(4)]);
        assert_eq!(m.shift_at(0), None);
        assert_eq!(m.shift_at(1), Some(-1));
        assert_eq!(m.shift_at(2), Some(2));
        assert_eq!(m.shift_at(9), None);
    }

    #[test]
    fn hunks_split_on_shift_change_and_gaps() {
        let m = map(&[None, Some(0), Some(1), Some(5), None, Some(6), Some(7)]);
        let hunks = m.hunks();
        assert_eq!(
            hunks,
            vec![Hunk::new(1, 3, -1), Hunk::new(3, 4, 2), Hunk::new(5, 7, 1)]
        );
    }

    #[test]
    fn hunks_of_empty_map() {
        assert!(CorrespondenceMap::new().hunks().is_empty());
        assert!(map(&[None, None]).hunks().is_empty());
    }

    #[test]
    fn hunk_worth_moving_needs_length_over_distance() {
        assert!(Hunk::new(1, 5, -1).is_worth_moving());
        assert!(!Hunk::new(0, 2, 2).is_worth_moving());
        assert!(!Hunk::new(0, 3, -3).is_worth_moving());
        assert!(Hunk::new(0, 4, -3).is_worth_moving());
    }

    #[test]
    fn hunk_old_range() {
        let h = Hunk::new(1, 5, -1);
        assert_eq!(h.len(), 4);
        assert_eq!(h.old_start(), 0);
        assert_eq!(h.old_end(), 4);
    }

    #[test]
    fn inverted_hunk_is_empty() {
        let h = Hunk {
            start: 5,
            end: 2,
            shift: 1,
        };
        assert_eq!(h.len(), 0);
        assert!(h.is_empty());
        assert!(!h.is_worth_moving());
    }

    #[test]
    fn reset_reports_capacity_overflow() {
        let mut m = map(&[Some(1), Some(0)]);
        assert!(m.reset(usize::MAX).is_err());
        assert!(m.is_empty());
        m.reset(3).unwrap();
        assert_eq!(m.as_slice(), &[None, None, None]);
    }

    #[test]
    fn display_marks_unknown_slots() {
        let m = map(&[None, Some(0), Some(1)]);
        assert_eq!(m.to_string(), "- 0 1");
    }

    #[test]
    fn identity_detection() {
        let m = map(&[Some(0), Some(0)]);
        assert!(m.is_identity_at(0));
        assert!(!m.is_identity_at(1));
    }
}
