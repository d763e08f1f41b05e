//! Property-based invariant tests for cells.
//!
//! 1. Equal cells report equal hash bits.
//! 2. Changing only the character changes the hash bits.
//! 3. Style flags and link IDs survive packing.

use linemap_core::{Cell, CellAttrs, LineCell, PackedRgba, StyleFlags};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn cell_strategy() -> impl Strategy<Value = Cell> {
    (
        any::<char>(),
        any::<u32>(),
        any::<u32>(),
        any::<u8>(),
        0u32..=0x00FF_FFFF,
    )
        .prop_map(|(c, fg, bg, flags, link)| {
            Cell::from_char(c)
                .with_fg(PackedRgba(fg))
                .with_bg(PackedRgba(bg))
                .with_attrs(CellAttrs::new(StyleFlags::from_bits_truncate(flags), link))
        })
}

proptest! {
    #[test]
    fn equal_cells_hash_equal(cell in cell_strategy()) {
        let copy = cell;
        prop_assert_eq!(cell.hash_bits(), copy.hash_bits());
    }

    #[test]
    fn content_change_moves_hash(cell in cell_strategy(), other in any::<char>()) {
        prop_assume!(cell.content.as_char() != Some(other));
        prop_assume!(other != '\0');
        let changed = Cell { content: linemap_core::CellContent::from_char(other), ..cell };
        prop_assert_ne!(cell.hash_bits(), changed.hash_bits());
    }

    #[test]
    fn attrs_round_trip(flags in any::<u8>(), link in 0u32..=0x00FF_FFFF) {
        let flags = StyleFlags::from_bits_truncate(flags);
        let attrs = CellAttrs::new(flags, link);
        prop_assert_eq!(attrs.flags(), flags);
        prop_assert_eq!(attrs.link_id(), link);
    }
}
