#![forbid(unsafe_code)]

//! Cell types and the [`LineCell`] contract.
//!
//! The line-correspondence engine never looks inside a cell. It needs three
//! things from the cell type:
//!
//! - value equality, to count differing positions between two lines;
//! - a caller-supplied blank value, to price drawing a line from scratch;
//! - a raw bit pattern, folded into each line's fingerprint.
//!
//! [`LineCell`] captures exactly that. A compact 16-byte [`Cell`] is provided
//! for callers that do not bring their own glyph model, and the trait is
//! implemented for plain integers and `char` so tests can describe screens as
//! text.
//!
//! # Cell layout (16 bytes)
//!
//! ```text
//! Cell {
//!     content: CellContent,  // 4 bytes - Unicode scalar, 0 for empty
//!     fg: PackedRgba,        // 4 bytes - foreground color
//!     bg: PackedRgba,        // 4 bytes - background color
//!     attrs: CellAttrs,      // 4 bytes - style flags + link ID
//! }
//! ```

/// The contract a screen cell must satisfy to be matched line-by-line.
///
/// Equal cells must report equal [`hash_bits`](LineCell::hash_bits). The
/// converse is not required: colliding bit patterns only cost the engine an
/// optimization opportunity, never correctness.
pub trait LineCell: Copy + Eq {
    /// Raw bits folded into the line fingerprint.
    fn hash_bits(&self) -> u64;
}

impl LineCell for u8 {
    #[inline]
    fn hash_bits(&self) -> u64 {
        u64::from(*self)
    }
}

impl LineCell for u32 {
    #[inline]
    fn hash_bits(&self) -> u64 {
        u64::from(*self)
    }
}

impl LineCell for u64 {
    #[inline]
    fn hash_bits(&self) -> u64 {
        *self
    }
}

impl LineCell for char {
    #[inline]
    fn hash_bits(&self) -> u64 {
        u64::from(u32::from(*self))
    }
}

/// Cell content: a Unicode scalar value, or nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CellContent(u32);

impl CellContent {
    /// Empty cell content (no character).
    pub const EMPTY: Self = Self(0);

    /// Create content from a single Unicode character.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    /// Check if this cell is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Extract the character, or `None` for empty content.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.is_empty() {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "{c:?}"),
            None => f.write_str("Empty"),
        }
    }
}

/// A compact RGBA color, laid out as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }
}

bitflags::bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD          = 0b0000_0001;
        const DIM           = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const UNDERLINE     = 0b0000_1000;
        const BLINK         = 0b0001_0000;
        const REVERSE       = 0b0010_0000;
        const STRIKETHROUGH = 0b0100_0000;
        const HIDDEN        = 0b1000_0000;
    }
}

/// Packed cell attributes:
/// - bits 31..24: `StyleFlags` (8 bits)
/// - bits 23..0: `link_id` (24 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct CellAttrs(u32);

impl CellAttrs {
    /// No attributes or link.
    pub const NONE: Self = Self(0);

    /// Create attributes from flags and a hyperlink ID.
    #[inline]
    pub fn new(flags: StyleFlags, link_id: u32) -> Self {
        debug_assert!(link_id <= 0x00FF_FFFF, "link_id overflow: {link_id}");
        Self((u32::from(flags.bits()) << 24) | (link_id & 0x00FF_FFFF))
    }

    /// Extract the style flags.
    #[inline]
    pub fn flags(self) -> StyleFlags {
        StyleFlags::from_bits_truncate((self.0 >> 24) as u8)
    }

    /// Extract the hyperlink ID.
    #[inline]
    pub fn link_id(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A single terminal cell.
///
/// The default cell is empty with a white foreground, transparent
/// background and no attributes; it is the usual blank for
/// [`LineCell`]-based matching.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C, align(16))]
pub struct Cell {
    /// Character content.
    pub content: CellContent,
    /// Foreground color.
    pub fg: PackedRgba,
    /// Background color.
    pub bg: PackedRgba,
    /// Style flags and hyperlink ID.
    pub attrs: CellAttrs,
}

const _: () = assert!(core::mem::size_of::<Cell>() == 16);

impl Cell {
    /// The empty cell.
    pub const BLANK: Self = Self {
        content: CellContent::EMPTY,
        fg: PackedRgba::WHITE,
        bg: PackedRgba::TRANSPARENT,
        attrs: CellAttrs::NONE,
    };

    /// Create a cell from a single character with default colors.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self {
            content: CellContent::from_char(c),
            ..Self::BLANK
        }
    }

    /// Set the foreground color.
    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[inline]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }

    /// Set the style attributes.
    #[inline]
    pub const fn with_attrs(mut self, attrs: CellAttrs) -> Self {
        self.attrs = attrs;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl core::fmt::Debug for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cell")
            .field("content", &self.content)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl LineCell for Cell {
    /// Content and attributes occupy the low and high halves; colors are
    /// rotated in so a pure color change still moves the fingerprint.
    #[inline]
    fn hash_bits(&self) -> u64 {
        (u64::from(self.content.raw()) | (u64::from(self.attrs.raw()) << 32))
            ^ u64::from(self.fg.0).rotate_left(13)
            ^ u64::from(self.bg.0).rotate_left(45)
    }
}
