#![forbid(unsafe_code)]

//! Hunk growth and validation.
//!
//! Anchors are single lines. Content usually moves in blocks, so each run
//! of equally-shifted lines is extended outward: a neighbor joins the run if
//! its fingerprint matches the old line the shift points at, or if the
//! [cost model](crate::cost::ScreenPair::is_worth_connecting) says taking it
//! is no worse than drawing it fresh. Growth stops at the first neighbor that
//! passes neither test.
//!
//! # Limits
//!
//! A run never grows into a neighbor run, and never past the old lines a
//! neighbor run is sourced from:
//!
//! ```text
//! new:  ... prev run ][ free ][ this run ][ free ][ next run ...
//!                     ^ back limit               ^ forward limit
//! ```
//!
//! With a negative shift the back limit moves up by `|shift|` so the
//! shifted index stays in bounds and clear of old lines the previous run
//! already uses; with a positive shift the forward limit moves down by
//! `shift` for the same reason on the other side.
//!
//! Validation then drops every run that is not longer than the distance it
//! moves: relocating it would cost at least as much as redrawing it.

use linemap_core::LineCell;

use crate::cost::ScreenPair;
use crate::hash::Fingerprints;
use crate::map::CorrespondenceMap;

/// Lines connected by one growth pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrowthCounts {
    /// Lines added above existing runs.
    pub backward: usize,
    /// Lines added below existing runs.
    pub forward: usize,
}

impl GrowthCounts {
    /// Total lines connected.
    #[inline]
    pub const fn total(&self) -> usize {
        self.backward + self.forward
    }
}

/// Lines removed by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidation {
    /// Runs dropped.
    pub hunks: usize,
    /// Slots reset to `None`.
    pub lines: usize,
}

/// Extend every run in `map` as far as fingerprints and costs allow.
///
/// A single top-to-bottom scan; only unassigned slots are written, so a
/// second call on a map that can no longer grow changes nothing.
pub fn grow_hunks<C: LineCell>(
    map: &mut CorrespondenceMap,
    pair: &ScreenPair<'_, C>,
    hashes: &Fingerprints,
) -> GrowthCounts {
    let n = map.len().min(pair.lines()) as isize;
    let mut counts = GrowthCounts::default();

    let mut back_limit: isize = 0;
    let mut back_ref_limit: isize = 0;

    let mut i = map.next_assigned(0) as isize;
    while i < n {
        let start = i;
        let Some(shift) = map.shift_at(start as usize) else {
            break;
        };
        let shift = shift as isize;

        let end = map.run_end(start as usize, shift as i32).min(n as usize) as isize;
        let next_hunk = map.next_assigned(end as usize).min(n as usize) as isize;

        let mut forward_limit = next_hunk;
        let forward_ref_limit = match map.get(next_hunk as usize) {
            Some(old) if (old as isize) < next_hunk => old as isize,
            _ => next_hunk,
        };

        // Backward.
        if shift < 0 {
            back_limit = back_ref_limit - shift;
        }
        let mut j = start - 1;
        while j >= back_limit {
            let source = j + shift;
            if connects(map, pair, hashes, source as usize, j as usize, shift < 0) {
                map.assign(j as usize, source as usize);
                counts.backward += 1;
                linemap_core::trace!(
                    new = j,
                    old = source,
                    "connected new line to old line (backward continuation)"
                );
            } else {
                linemap_core::trace!(
                    new = j,
                    old = source,
                    "not connecting new line to old line (backward continuation)"
                );
                break;
            }
            j -= 1;
        }

        // Forward.
        if shift > 0 {
            forward_limit = forward_ref_limit - shift;
        }
        let mut j = end;
        while j < forward_limit {
            let source = j + shift;
            if connects(map, pair, hashes, source as usize, j as usize, shift > 0) {
                map.assign(j as usize, source as usize);
                counts.forward += 1;
                linemap_core::trace!(
                    new = j,
                    old = source,
                    "connected new line to old line (forward continuation)"
                );
            } else {
                linemap_core::trace!(
                    new = j,
                    old = source,
                    "not connecting new line to old line (forward continuation)"
                );
                break;
            }
            j += 1;
        }

        back_limit = j;
        back_ref_limit = j;
        if shift > 0 {
            back_ref_limit += shift;
        }

        i = next_hunk;
    }

    counts
}

#[inline]
fn connects<C: LineCell>(
    map: &CorrespondenceMap,
    pair: &ScreenPair<'_, C>,
    hashes: &Fingerprints,
    source: usize,
    target: usize,
    would_blank: bool,
) -> bool {
    hashes.new_line(target) == hashes.old(source)
        || pair.is_worth_connecting(map, source, target, would_blank)
}

/// Reset every run that is not longer than the distance it moves.
pub fn invalidate_small_hunks(map: &mut CorrespondenceMap) -> Invalidation {
    let mut dropped = Invalidation::default();
    for hunk in map.hunks() {
        if hunk.is_worth_moving() {
            continue;
        }
        linemap_core::trace!(
            start = hunk.start,
            end = hunk.end,
            shift = hunk.shift,
            "dropping hunk too short for its shift"
        );
        for i in hunk.start..hunk.end {
            map.unassign(usize::from(i));
        }
        dropped.hunks += 1;
        dropped.lines += hunk.len();
    }
    dropped
}
