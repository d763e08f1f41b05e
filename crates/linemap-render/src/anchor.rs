#![forbid(unsafe_code)]

//! Anchors: lines that are fingerprint-unique on both screens.
//!
//! A fingerprint seen exactly once on the old screen and once on the new
//! screen pairs those two lines. Pairs that did not move (old index equal to
//! new index) are skipped: a zero-shift anchor buys no scrolling, and seeding
//! it would make the growth cost model refuse neighbors that a real shift
//! could claim.

use crate::bucket::BucketTable;
use crate::map::CorrespondenceMap;

/// Mark every moved, uniquely-fingerprinted line in `map`.
///
/// Returns the number of anchors placed. Assigned slots are never
/// overwritten.
pub fn find_anchors(table: &BucketTable, map: &mut CorrespondenceMap) -> usize {
    let mut placed = 0;
    for bucket in table.iter() {
        let Some((old, new)) = bucket.unique_pair() else {
            continue;
        };
        if old == new {
            continue;
        }
        let (old, new) = (usize::from(old), usize::from(new));
        if new >= map.len() || old >= map.len() || map.is_assigned(new) {
            continue;
        }
        linemap_core::trace!(new, old, "new line is hash-identical to old line (unique)");
        map.assign(new, old);
        placed += 1;
    }
    placed
}
