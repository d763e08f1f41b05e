#![forbid(unsafe_code)]

//! Line fingerprints.
//!
//! Each line is reduced to a [`Fingerprint`] with a shift-and-add hash over
//! every cell's [`LineCell::hash_bits`]. The hash is not cryptographic: a
//! collision makes two unrelated lines look like candidates for each other,
//! which the downstream per-cell diff absorbs as an ordinary redraw.

use std::collections::TryReserveError;

use linemap_core::LineCell;

use crate::screen::Screen;

/// Integer digest of one line's cells.
pub type Fingerprint = u64;

/// Hash one line.
///
/// O(width), allocation free. Every cell contributes, and the high bits of
/// each cell are folded down so attribute-only changes still perturb the
/// low bits.
#[inline]
pub fn line_hash<C: LineCell>(line: &[C]) -> Fingerprint {
    line.iter().fold(0, |acc: Fingerprint, cell| {
        let bits = cell.hash_bits();
        acc.wrapping_add(acc << 5)
            .wrapping_add(bits)
            .wrapping_add(bits >> 16)
    })
}

/// Per-line fingerprints for both screens of one computation.
///
/// Owned by a [`LineMapContext`](crate::context::LineMapContext) and reused
/// across computations; storage only grows.
#[derive(Debug, Clone, Default)]
pub struct Fingerprints {
    old: Vec<Fingerprint>,
    new: Vec<Fingerprint>,
}

impl Fingerprints {
    /// Create empty scratch storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for `lines` fingerprints per side without reallocating
    /// during [`fill`](Self::fill).
    pub fn reserve(&mut self, lines: usize) -> Result<(), TryReserveError> {
        self.old.clear();
        self.new.clear();
        self.old.try_reserve(lines)?;
        self.new.try_reserve(lines)
    }

    /// Hash the first `lines` lines of both screens.
    pub fn fill<C: LineCell>(&mut self, old: &Screen<C>, new: &Screen<C>, lines: usize) {
        self.old.clear();
        self.new.clear();
        self.old
            .extend((0..lines).map(|y| line_hash(old.line(y))));
        self.new
            .extend((0..lines).map(|y| line_hash(new.line(y))));
    }

    /// Fingerprint of old line `y`.
    #[inline]
    pub fn old(&self, y: usize) -> Fingerprint {
        self.old[y]
    }

    /// Fingerprint of new line `y`.
    #[inline]
    pub fn new_line(&self, y: usize) -> Fingerprint {
        self.new[y]
    }

    /// All old-screen fingerprints.
    #[inline]
    pub fn old_slice(&self) -> &[Fingerprint] {
        &self.old
    }

    /// All new-screen fingerprints.
    #[inline]
    pub fn new_slice(&self) -> &[Fingerprint] {
        &self.new
    }

    /// Number of lines hashed per side.
    #[inline]
    pub fn len(&self) -> usize {
        self.new.len()
    }

    /// Check if nothing has been hashed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.new.is_empty()
    }

    /// Reserved lines per side.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.old.capacity().min(self.new.capacity())
    }

    /// Drop all storage.
    pub fn release(&mut self) {
        self.old = Vec::new();
        self.new = Vec::new();
    }
}
