#![forbid(unsafe_code)]

//! Approximate redraw costs.
//!
//! The cost of drawing a line is the number of cells that would change:
//! positions where the on-screen line differs from the wanted one, or,
//! when the line would be cleared first, positions that are not blank.
//! These counts drive [`ScreenPair::is_worth_connecting`], the two-line
//! heuristic that decides whether a hunk keeps growing past lines whose
//! fingerprints do not match.

use linemap_core::LineCell;

use crate::map::CorrespondenceMap;
use crate::screen::Screen;

/// Cells that differ between `from` and `to`.
#[inline]
pub fn line_diff_cost<C: LineCell>(from: &[C], to: &[C]) -> usize {
    from.iter().zip(to).filter(|(a, b)| a != b).count()
}

/// Cells of `to` that are not `blank`.
#[inline]
pub fn blank_diff_cost<C: LineCell>(to: &[C], blank: C) -> usize {
    to.iter().filter(|&&c| c != blank).count()
}

/// The two screens of one computation, plus the caller's blank cell.
#[derive(Debug, Clone, Copy)]
pub struct ScreenPair<'a, C> {
    old: &'a Screen<C>,
    new: &'a Screen<C>,
    blank: C,
    lines: usize,
}

impl<'a, C: LineCell> ScreenPair<'a, C> {
    /// Pair two screens. Only the first `min(old.height, new.height)` lines
    /// take part.
    pub fn new(old: &'a Screen<C>, new: &'a Screen<C>, blank: C) -> Self {
        debug_assert_eq!(old.width(), new.width(), "screen widths must match");
        debug_assert_eq!(old.height(), new.height(), "screen heights must match");
        let lines = old.height().min(new.height()) as usize;
        Self {
            old,
            new,
            blank,
            lines,
        }
    }

    /// Lines taking part in the computation.
    #[inline]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// The old screen.
    #[inline]
    pub const fn old(&self) -> &'a Screen<C> {
        self.old
    }

    /// The new screen.
    #[inline]
    pub const fn new_screen(&self) -> &'a Screen<C> {
        self.new
    }

    /// The blank cell.
    #[inline]
    pub fn blank(&self) -> C {
        self.blank
    }

    /// Cost of turning old line `old` into new line `new`.
    #[inline]
    pub fn update_cost(&self, old: usize, new: usize) -> usize {
        line_diff_cost(self.old.line(old), self.new.line(new))
    }

    /// Cost of drawing new line `new` onto a cleared line.
    #[inline]
    pub fn blank_cost(&self, new: usize) -> usize {
        blank_diff_cost(self.new.line(new), self.blank)
    }

    /// Whether extending a hunk so that new line `to` comes from old line
    /// `from` looks no worse than leaving it alone.
    ///
    /// `from` is also read as a new-line index: if the hunk moves old line
    /// `from` onto `to`, new line `from` loses its in-place source and must
    /// be drawn from whatever the map currently assigns it, or from blank.
    /// `would_blank` says whether line `to` would otherwise be cleared by
    /// the scroll (and so be drawn against blank rather than diffed).
    pub fn is_worth_connecting(
        &self,
        map: &CorrespondenceMap,
        from: usize,
        to: usize,
        would_blank: bool,
    ) -> bool {
        if from == to {
            return false;
        }

        let source_of_from = map.get(from).map_or(from, usize::from);

        // Cost as things stand: `to` drawn in place (or from blank), and
        // `from` drawn from its current source.
        let to_alone = if would_blank {
            self.blank_cost(to)
        } else {
            self.update_cost(to, to)
        };
        let before = to_alone + self.update_cost(source_of_from, from);

        // Cost once old line `from` slides onto `to`.
        let from_after = if source_of_from == from {
            self.blank_cost(from)
        } else {
            self.update_cost(source_of_from, from)
        };
        let after = from_after + self.update_cost(from, to);

        before >= after
    }
}
