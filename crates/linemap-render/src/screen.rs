#![forbid(unsafe_code)]

//! Screen grid storage.
//!
//! A [`Screen`] is one side of a line-correspondence computation: the
//! content currently on the terminal ("old") or the content that should
//! appear next ("new").
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation

use linemap_core::LineCell;

/// A 2D grid of cells, addressed by line.
///
/// # Example
///
/// ```
/// use linemap_render::screen::Screen;
///
/// let screen = Screen::from_lines(&["ab", "cd"]);
/// assert_eq!(screen.height(), 2);
/// assert_eq!(screen.row(1), Some(&['c', 'd'][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen<C> {
    width: u16,
    height: u16,
    cells: Vec<C>,
}

impl<C: LineCell> Screen<C> {
    /// Create a screen with every cell set to `fill`.
    pub fn new(width: u16, height: u16, fill: C) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![fill; size],
        }
    }

    /// Build a screen from explicit rows.
    ///
    /// Rows shorter than `width` are padded with `fill`; longer rows are
    /// truncated.
    ///
    /// # Panics
    ///
    /// Panics if there are more than `u16::MAX` rows.
    pub fn from_rows<R>(width: u16, fill: C, rows: &[R]) -> Self
    where
        R: AsRef<[C]>,
    {
        let height = u16::try_from(rows.len()).expect("screen height must fit in u16");
        let mut screen = Self::new(width, height, fill);
        for (y, row) in rows.iter().enumerate() {
            let dst = screen.line_mut(y);
            for (slot, cell) in dst.iter_mut().zip(row.as_ref()) {
                *slot = *cell;
            }
        }
        screen
    }

    /// Screen width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Screen height in lines.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the screen holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow line `y`, or `None` if out of bounds.
    #[inline]
    pub fn row(&self, y: u16) -> Option<&[C]> {
        (y < self.height).then(|| self.line(y as usize))
    }

    /// Borrow line `y` without an `Option` wrapper.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn line(&self, y: usize) -> &[C] {
        let w = self.width as usize;
        &self.cells[y * w..(y + 1) * w]
    }

    #[inline]
    fn line_mut(&mut self, y: usize) -> &mut [C] {
        let w = self.width as usize;
        &mut self.cells[y * w..(y + 1) * w]
    }

    /// Get the cell at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&C> {
        if x < self.width && y < self.height {
            self.cells
                .get(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Set the cell at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: C) {
        if x < self.width && y < self.height {
            let w = self.width as usize;
            self.cells[y as usize * w + x as usize] = cell;
        }
    }

    /// Overwrite every cell of line `y`. Out-of-bounds rows are ignored.
    pub fn fill_row(&mut self, y: u16, cell: C) {
        if y < self.height {
            self.line_mut(y as usize).fill(cell);
        }
    }

    /// Iterate over lines from top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = &[C]> + '_ {
        (0..self.height as usize).map(move |y| self.line(y))
    }
}

impl Screen<char> {
    /// Build a screen of `char` cells from text lines.
    ///
    /// The width is the longest line (in chars); shorter lines are padded
    /// with spaces.
    ///
    /// # Panics
    ///
    /// Panics if the longest line or the line count exceeds `u16::MAX`.
    pub fn from_lines(lines: &[&str]) -> Self {
        let rows: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let width = u16::try_from(width).expect("screen width must fit in u16");
        Self::from_rows(width, ' ', &rows)
    }

    /// Render the screen back to text, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for (y, line) in self.lines().enumerate() {
            if y > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }
}
