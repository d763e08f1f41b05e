#![forbid(unsafe_code)]

//! Fingerprint buckets.
//!
//! The [`BucketTable`] aggregates, per fingerprint, how many old and new
//! lines produced it and which index produced it last. After both screens
//! are recorded, a bucket with exactly one sighting on each side names a
//! line that is unique on both screens: the raw material for anchors.
//!
//! Buckets live in a `Vec` in first-sighting order, with a `HashMap` from
//! fingerprint to slot. Iteration order is therefore a function of the
//! input alone, which keeps computations reproducible.

use std::collections::{HashMap, TryReserveError};

use crate::hash::Fingerprint;

/// Per-fingerprint sighting counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// The fingerprint this bucket aggregates.
    pub fingerprint: Fingerprint,
    /// Old-screen lines with this fingerprint.
    pub old_count: u32,
    /// New-screen lines with this fingerprint.
    pub new_count: u32,
    /// Index of the last old line recorded, if any.
    pub last_old_index: Option<u16>,
    /// Index of the last new line recorded, if any.
    pub last_new_index: Option<u16>,
}

impl Bucket {
    const fn empty(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            old_count: 0,
            new_count: 0,
            last_old_index: None,
            last_new_index: None,
        }
    }

    /// The `(old, new)` pair when the fingerprint occurs exactly once on
    /// each screen.
    #[inline]
    pub fn unique_pair(&self) -> Option<(u16, u16)> {
        if self.old_count == 1 && self.new_count == 1 {
            self.last_old_index.zip(self.last_new_index)
        } else {
            None
        }
    }
}

/// Fingerprint → [`Bucket`] table for one computation.
#[derive(Debug, Clone, Default)]
pub struct BucketTable {
    slots: HashMap<Fingerprint, usize>,
    buckets: Vec<Bucket>,
}

impl BucketTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all buckets and make room for `capacity` distinct fingerprints.
    ///
    /// Two screens of `n` lines produce at most `2n` fingerprints; callers
    /// size for `2n + 1`.
    pub fn reset(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        self.slots.clear();
        self.buckets.clear();
        self.slots.try_reserve(capacity)?;
        self.buckets.try_reserve(capacity)
    }

    fn bucket_mut(&mut self, fingerprint: Fingerprint) -> &mut Bucket {
        let next = self.buckets.len();
        let slot = *self.slots.entry(fingerprint).or_insert(next);
        if slot == next {
            self.buckets.push(Bucket::empty(fingerprint));
        }
        &mut self.buckets[slot]
    }

    /// Record a sighting of `fingerprint` on old line `index`.
    pub fn record_old(&mut self, index: u16, fingerprint: Fingerprint) {
        let bucket = self.bucket_mut(fingerprint);
        bucket.old_count += 1;
        bucket.last_old_index = Some(index);
    }

    /// Record a sighting of `fingerprint` on new line `index`.
    pub fn record_new(&mut self, index: u16, fingerprint: Fingerprint) {
        let bucket = self.bucket_mut(fingerprint);
        bucket.new_count += 1;
        bucket.last_new_index = Some(index);
    }

    /// Look up the bucket for `fingerprint`.
    pub fn find(&self, fingerprint: Fingerprint) -> Option<&Bucket> {
        self.slots.get(&fingerprint).map(|&slot| &self.buckets[slot])
    }

    /// Iterate over buckets in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> + '_ {
        self.buckets.iter()
    }

    /// Number of distinct fingerprints recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of buckets that can be held without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.capacity().min(self.slots.capacity())
    }

    /// Drop all storage.
    pub fn release(&mut self) {
        self.slots = HashMap::new();
        self.buckets = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_creates_bucket() {
        let mut table = BucketTable::new();
        table.reset(5).unwrap();
        table.record_old(3, 0xAB);

        let bucket = table.find(0xAB).unwrap();
        assert_eq!(bucket.old_count, 1);
        assert_eq!(bucket.new_count, 0);
        assert_eq!(bucket.last_old_index, Some(3));
        assert_eq!(bucket.last_new_index, None);
    }

    #[test]
    fn later_sightings_update_counts_and_last_index() {
        let mut table = BucketTable::new();
        table.reset(9).unwrap();
        table.record_old(0, 7);
        table.record_old(2, 7);
        table.record_new(1, 7);

        let bucket = table.find(7).unwrap();
        assert_eq!(bucket.old_count, 2);
        assert_eq!(bucket.new_count, 1);
        assert_eq!(bucket.last_old_index, Some(2));
        assert_eq!(bucket.last_new_index, Some(1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unique_pair_requires_one_sighting_per_side() {
        let mut table = BucketTable::new();
        table.reset(9).unwrap();
        table.record_old(0, 1);
        table.record_new(4, 1);
        table.record_old(1, 2);
        table.record_new(1, 2);
        table.record_new(2, 2);
        table.record_old(3, 3);

        assert_eq!(table.find(1).unwrap().unique_pair(), Some((0, 4)));
        assert_eq!(table.find(2).unwrap().unique_pair(), None);
        assert_eq!(table.find(3).unwrap().unique_pair(), None);
    }

    #[test]
    fn reset_clears_buckets() {
        let mut table = BucketTable::new();
        table.reset(3).unwrap();
        table.record_old(0, 42);
        table.reset(3).unwrap();
        assert!(table.is_empty());
        assert!(table.find(42).is_none());
    }

    #[test]
    fn iteration_follows_first_sighting() {
        let mut table = BucketTable::new();
        table.reset(7).unwrap();
        table.record_old(0, 30);
        table.record_old(1, 10);
        table.record_new(0, 20);
        table.record_new(1, 30);

        let order: Vec<_> = table.iter().map(|b| b.fingerprint).collect();
        assert_eq!(order, vec![30, 10, 20]);
    }

    #[test]
    fn zero_fingerprint_is_a_normal_key() {
        let mut table = BucketTable::new();
        table.reset(3).unwrap();
        table.record_old(0, 0);
        table.record_new(1, 0);
        assert_eq!(table.find(0).unwrap().unique_pair(), Some((0, 1)));
    }
}
