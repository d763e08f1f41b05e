#![forbid(unsafe_code)]

//! The line-map computation and the session state it runs in.
//!
//! A [`LineMapContext`] owns every piece of scratch state one screen pair
//! needs: the bucket table, both fingerprint arrays and the correspondence
//! map. Storage is sized on first use, grown when the screen grows, reset
//! at the start of every computation and freed by [`release`] or drop.
//! Separate sessions use separate contexts; nothing is shared.
//!
//! # Pipeline
//!
//! 1. Size scratch storage for `n` lines (the only fallible step).
//! 2. Fingerprint every line of both screens and fill the bucket table.
//! 3. Anchor lines that are unique on both screens and moved.
//! 4. Grow runs around the anchors.
//! 5. Drop runs too short for the distance they move.
//! 6. Grow again, into room the dropped runs freed.
//!
//! [`release`]: LineMapContext::release
//!
//! # Usage
//!
//! ```
//! use linemap_render::context::LineMapContext;
//! use linemap_render::screen::Screen;
//!
//! let old = Screen::from_lines(&["A", "B", "C", "D", "E"]);
//! let new = Screen::from_lines(&["Z", "A", "B", "C", "D"]);
//!
//! let mut ctx = LineMapContext::default();
//! let map = ctx.compute(&old, &new, ' ').unwrap();
//! assert_eq!(map.as_slice(), &[None, Some(0), Some(1), Some(2), Some(3)]);
//! ```

use linemap_core::LineCell;

use crate::anchor::find_anchors;
use crate::bucket::BucketTable;
use crate::config::LineMapConfig;
use crate::cost::ScreenPair;
use crate::error::{LineMapError, LineMapResult};
use crate::hash::Fingerprints;
use crate::hunk::{grow_hunks, invalidate_small_hunks};
use crate::map::CorrespondenceMap;
use crate::screen::Screen;

/// Counters from the most recent computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMapStats {
    /// Lines compared.
    pub lines: usize,
    /// Anchors placed from unique fingerprints.
    pub anchors: usize,
    /// Lines connected above existing runs, over both growth passes.
    pub grown_backward: usize,
    /// Lines connected below existing runs, over both growth passes.
    pub grown_forward: usize,
    /// Runs dropped by validation.
    pub hunks_invalidated: usize,
    /// Slots reset by validation.
    pub lines_invalidated: usize,
    /// Slots assigned in the final map.
    pub mapped: usize,
}

impl LineMapStats {
    /// Lines connected by growth in either direction.
    #[inline]
    pub const fn total_grown(&self) -> usize {
        self.grown_backward + self.grown_forward
    }
}

/// Scratch state and entry point for line-correspondence computations.
#[derive(Debug, Clone, Default)]
pub struct LineMapContext {
    config: LineMapConfig,
    table: BucketTable,
    hashes: Fingerprints,
    map: CorrespondenceMap,
    stats: LineMapStats,
    #[cfg(test)]
    oversize: Option<Storage>,
}

/// Storage sized by a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    Map,
    Scratch,
}

impl LineMapContext {
    /// Create a context.
    ///
    /// If the config asks for initial storage and it cannot be reserved,
    /// the context starts empty and the first computation retries.
    pub fn new(config: LineMapConfig) -> Self {
        let initial = config.initial_lines.min(config.max_lines);
        let mut ctx = Self {
            config,
            ..Default::default()
        };
        if initial > 0 && ctx.prepare(initial).is_err() {
            linemap_core::warn!(lines = initial, "could not reserve initial line-map storage");
        }
        ctx
    }

    /// Create a context with storage reserved for `lines` lines.
    pub fn with_capacity(lines: usize) -> Self {
        Self::new(LineMapConfig::with_initial_lines(lines))
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &LineMapConfig {
        &self.config
    }

    /// Turn matching on or off for subsequent computations.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// The map produced by the most recent computation.
    #[inline]
    pub fn map(&self) -> &CorrespondenceMap {
        &self.map
    }

    /// Counters from the most recent computation.
    #[inline]
    pub fn stats(&self) -> LineMapStats {
        self.stats
    }

    /// Lines of fingerprint storage currently reserved.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.hashes.capacity()
    }

    /// Free all storage. The context stays usable and re-sizes on the next
    /// computation.
    pub fn release(&mut self) {
        self.release_scratch();
        self.map.release();
        self.stats = LineMapStats::default();
    }

    fn release_scratch(&mut self) {
        self.table.release();
        self.hashes.release();
    }

    #[cfg(not(test))]
    #[inline]
    fn reserve_size(&self, lines: usize, _storage: Storage) -> usize {
        lines
    }

    /// Tests force one storage to a size no allocator can satisfy.
    #[cfg(test)]
    fn reserve_size(&self, lines: usize, storage: Storage) -> usize {
        if self.oversize == Some(storage) {
            usize::MAX / 2
        } else {
            lines
        }
    }

    /// Size the bucket table and fingerprint arrays for `lines` lines.
    fn prepare(&mut self, lines: usize) -> LineMapResult<()> {
        if lines > self.config.max_lines {
            return Err(LineMapError::over_budget(lines, self.config.max_lines));
        }
        let size = self.reserve_size(lines, Storage::Scratch);
        let sized = self
            .table
            .reset(size.saturating_mul(2).saturating_add(1))
            .and_then(|()| self.hashes.reserve(size));
        if let Err(e) = sized {
            self.release_scratch();
            return Err(LineMapError::allocation(lines, e));
        }
        Ok(())
    }

    /// Map each line of `new` to the line of `old` that most plausibly
    /// holds the same content.
    ///
    /// `blank` is the cell a cleared line is filled with; it prices lines
    /// that a scroll would expose.
    ///
    /// # Errors
    ///
    /// Returns [`LineMapError::ResourceExhausted`] when scratch storage
    /// cannot be sized for the screen. The map is then all-`None` and the
    /// caller should repaint without scroll hints.
    pub fn compute<C: LineCell>(
        &mut self,
        old: &Screen<C>,
        new: &Screen<C>,
        blank: C,
    ) -> LineMapResult<&CorrespondenceMap> {
        let pair = ScreenPair::new(old, new, blank);
        let n = pair.lines();

        let span = linemap_core::debug_span!("line_map_compute", lines = n, width = old.width());
        let _guard = span.enter();

        self.stats = LineMapStats {
            lines: n,
            ..Default::default()
        };

        if let Err(e) = self.map.reset(self.reserve_size(n, Storage::Map)) {
            let err = LineMapError::allocation(n, e);
            linemap_core::warn!(lines = n, error = %err, "line map unavailable");
            return Err(err);
        }
        if !self.config.enabled {
            return Ok(&self.map);
        }
        if let Err(err) = self.prepare(n) {
            linemap_core::warn!(lines = n, error = %err, "line map unavailable");
            return Err(err);
        }

        self.hashes.fill(old, new, n);
        for (y, &fp) in self.hashes.old_slice().iter().enumerate() {
            self.table.record_old(y as u16, fp);
        }
        for (y, &fp) in self.hashes.new_slice().iter().enumerate() {
            self.table.record_new(y as u16, fp);
        }

        self.stats.anchors = find_anchors(&self.table, &mut self.map);

        let first = grow_hunks(&mut self.map, &pair, &self.hashes);
        let dropped = invalidate_small_hunks(&mut self.map);
        let second = grow_hunks(&mut self.map, &pair, &self.hashes);

        self.stats.grown_backward = first.backward + second.backward;
        self.stats.grown_forward = first.forward + second.forward;
        self.stats.hunks_invalidated = dropped.hunks;
        self.stats.lines_invalidated = dropped.lines;
        self.stats.mapped = self.map.mapped_count();

        linemap_core::debug!(
            lines = n,
            anchors = self.stats.anchors,
            grown = self.stats.total_grown(),
            invalidated = self.stats.lines_invalidated,
            mapped = self.stats.mapped,
            "line map computed"
        );

        Ok(&self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Exhaustion;

    fn screen(text: &str) -> Screen<char> {
        let rows: Vec<Vec<char>> = text.chars().map(|c| vec![c]).collect();
        Screen::from_rows(1, '.', &rows)
    }

    #[test]
    fn scroll_down_by_one() {
        let mut ctx = LineMapContext::default();
        let map = ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ').unwrap();
        assert_eq!(map.as_slice(), &[None, Some(0), Some(1), Some(2), Some(3)]);

        let stats = ctx.stats();
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.anchors, 4);
        assert_eq!(stats.mapped, 4);
    }

    #[test]
    fn in_place_edit_yields_no_hints() {
        let mut ctx = LineMapContext::default();
        let map = ctx.compute(&screen("ABCDE"), &screen("XBCDE"), ' ').unwrap();
        assert_eq!(map.mapped_count(), 0);
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn disabled_context_returns_empty_map() {
        let mut ctx = LineMapContext::new(LineMapConfig::disabled());
        let map = ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ').unwrap();
        assert_eq!(map.len(), 5);
        assert_eq!(map.mapped_count(), 0);
        assert_eq!(ctx.stats().anchors, 0);
    }

    #[test]
    fn over_budget_screen_is_exhausted() {
        let mut ctx = LineMapContext::new(LineMapConfig::with_max_lines(3));
        let err = ctx
            .compute(&screen("ABCDE"), &screen("ZABCD"), ' ')
            .unwrap_err();
        assert_eq!(
            err,
            LineMapError::ResourceExhausted {
                lines: 5,
                cause: Exhaustion::LineBudget { limit: 3 },
            }
        );
        assert!(ctx.map().iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn failed_scratch_allocation_releases_storage() {
        let mut ctx = LineMapContext::with_capacity(16);
        assert!(ctx.capacity() >= 16);

        ctx.oversize = Some(Storage::Scratch);
        let err = ctx
            .compute(&screen("ABCDE"), &screen("ZABCD"), ' ')
            .unwrap_err();
        assert!(matches!(
            err,
            LineMapError::ResourceExhausted {
                lines: 5,
                cause: Exhaustion::Allocation(_),
            }
        ));
        assert_eq!(ctx.map().len(), 5);
        assert!(ctx.map().iter().all(|slot| slot.is_none()));
        assert_eq!(ctx.capacity(), 0);

        ctx.oversize = None;
        let map = ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ').unwrap();
        assert_eq!(map.as_slice(), &[None, Some(0), Some(1), Some(2), Some(3)]);
        assert!(ctx.capacity() >= 5);
    }

    #[test]
    fn failed_map_allocation_leaves_empty_map() {
        let mut ctx = LineMapContext::default();
        ctx.compute(&screen("ABC"), &screen("CAB"), ' ').unwrap();

        ctx.oversize = Some(Storage::Map);
        let err = ctx
            .compute(&screen("ABCDE"), &screen("ZABCD"), ' ')
            .unwrap_err();
        assert!(matches!(
            err,
            LineMapError::ResourceExhausted {
                lines: 5,
                cause: Exhaustion::Allocation(_),
            }
        ));
        assert!(ctx.map().is_empty());
        assert_eq!(ctx.stats().mapped, 0);

        ctx.oversize = None;
        let map = ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ').unwrap();
        assert_eq!(map.mapped_count(), 4);
    }

    #[test]
    fn context_recovers_after_exhaustion() {
        let mut ctx = LineMapContext::new(LineMapConfig::with_max_lines(5));
        assert!(ctx.compute(&screen("ABCDEF"), &screen("ZABCDE"), ' ').is_err());
        let map = ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ').unwrap();
        assert_eq!(map.mapped_count(), 4);
    }

    #[test]
    fn storage_is_reused_and_released() {
        let mut ctx = LineMapContext::with_capacity(40);
        assert!(ctx.capacity() >= 40);

        ctx.compute(&screen("ABC"), &screen("CAB"), ' ').unwrap();
        assert!(ctx.capacity() >= 40);

        ctx.release();
        assert_eq!(ctx.capacity(), 0);
        assert!(ctx.map().is_empty());
    }

    #[test]
    fn set_enabled_toggles_matching() {
        let mut ctx = LineMapContext::default();
        ctx.set_enabled(false);
        assert_eq!(
            ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ')
                .unwrap()
                .mapped_count(),
            0
        );
        ctx.set_enabled(true);
        assert_eq!(
            ctx.compute(&screen("ABCDE"), &screen("ZABCD"), ' ')
                .unwrap()
                .mapped_count(),
            4
        );
    }

    #[test]
    fn empty_screens_give_empty_map() {
        let mut ctx = LineMapContext::default();
        let map = ctx.compute(&screen(""), &screen(""), ' ').unwrap();
        assert!(map.is_empty());
    }
}
