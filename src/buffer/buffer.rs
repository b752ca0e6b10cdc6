//! Buffer: A grid of cells representing the terminal screen.
//!
//! Cells are stored in row-major order in one contiguous `Vec`.

use super::cell::{Cell, Rgb};
use crate::layout::Rect;

/// A grid of cells representing the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        Self {
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangular region with a cell, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.area());
        for row in clipped.y..clipped.bottom() {
            for col in clipped.x..clipped.right() {
                self.set(col, row, cell);
            }
        }
    }

    /// Draw a single line of text starting at (x, y), clipped at `max_x`.
    ///
    /// Wide characters occupy two columns; the second gets a continuation
    /// cell. Returns the number of columns used.
    pub fn draw_text(&mut self, x: u16, y: u16, max_x: u16, text: &str, fg: Rgb, bg: Rgb) -> u16 {
        self.draw_styled(x, y, max_x, text, Cell::new(' ').with_fg(fg).with_bg(bg))
    }

    /// [`Buffer::draw_text`] taking colors and modifiers from `style`.
    pub fn draw_styled(&mut self, x: u16, y: u16, max_x: u16, text: &str, style: Cell) -> u16 {
        let (fg, bg, modifiers) = (style.fg(), style.bg(), style.modifiers());
        let limit = max_x.min(self.width);
        let mut col = x;
        for c in text.chars() {
            let cell = Cell::new(c).with_fg(fg).with_bg(bg).with_modifiers(modifiers);
            let width = u16::from(cell.display_width());
            if width == 0 {
                continue;
            }
            if col + width > limit {
                break;
            }
            self.set(col, y, cell);
            if width == 2 {
                self.set(col + 1, y, Cell::wide_continuation().with_bg(bg));
            }
            col += width;
        }
        col - x
    }

    /// Resize the buffer. Content is discarded; the next frame redraws it.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width.max(1), height.max(1));
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }

    /// Render the symbols of one row as a string (continuations skipped).
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| {
                row.iter()
                    .filter(|c| !c.is_wide_continuation())
                    .map(Cell::symbol)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
