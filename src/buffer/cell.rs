//! Cell: The atomic unit of terminal display.
//!
//! Page rasters are drawn with the upper half block (`▀`): the foreground
//! color paints the top view pixel of a cell and the background color
//! paints the bottom one. Text (status bar, messages) uses the same cell
//! with an ordinary character.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Cell Layout (12 bytes)                      │
//! ├──────────┬──────────┬──────────┬─────┬───────┤
//! │  symbol  │    fg    │    bg    │ mod │ width │
//! │  char    │ [u8; 3]  │ [u8; 3]  │ u8  │  u8   │
//! └──────────┴──────────┴──────────┴─────┴───────┘
//! ```

use bitflags::bitflags;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default foreground (white)
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Default background (black)
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Convert to an opaque RGBA pixel.
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Drop the alpha channel of an RGBA pixel.
    #[inline]
    pub const fn from_rgba(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// # Example
    /// ```
    /// use pagelens::{Cell, Modifiers};
    /// let cell = Cell::new('x').with_modifiers(Modifiers::BOLD);
    /// assert!(cell.modifiers().contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The upper half block used for two-pixels-per-cell rendering.
pub const HALF_BLOCK: char = '▀';

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    symbol: char,
    fg: Rgb,
    bg: Rgb,
    modifiers: Modifiers,
    /// Display width of `symbol` (0 for a wide-character continuation).
    width: u8,
}

const _: () = assert!(
    std::mem::size_of::<Cell>() <= 12,
    "Cell must stay small; a 200x60 page view is redrawn on every drag"
);

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space character with default colors).
    pub const EMPTY: Self = Self {
        symbol: ' ',
        fg: Rgb::DEFAULT_FG,
        bg: Rgb::DEFAULT_BG,
        modifiers: Modifiers::empty(),
        width: 1,
    };

    /// Create a new cell from a character.
    #[inline]
    pub fn new(c: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        Self {
            symbol: c,
            width: u8::try_from(width).unwrap_or(1),
            ..Self::EMPTY
        }
    }

    /// A half-block cell showing `top` over `bottom`.
    #[inline]
    pub const fn pixels(top: Rgb, bottom: Rgb) -> Self {
        Self {
            symbol: HALF_BLOCK,
            fg: top,
            bg: bottom,
            modifiers: Modifiers::empty(),
            width: 1,
        }
    }

    /// The cell that follows a double-width character.
    #[inline]
    pub const fn wide_continuation() -> Self {
        Self {
            symbol: ' ',
            fg: Rgb::DEFAULT_FG,
            bg: Rgb::DEFAULT_BG,
            modifiers: Modifiers::empty(),
            width: 0,
        }
    }

    /// The character drawn in this cell.
    #[inline]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Check if this is a wide-character continuation.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.width == 0
    }

    /// Get the display width (0, 1, or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.width
    }

    /// Get the foreground color.
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.fg
    }

    /// Get the background color.
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.bg
    }

    /// Get the modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("symbol", &self.symbol)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_u32(0xFF8000), Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_rgba_round_trip() {
        let rgb = Rgb::new(1, 2, 3);
        assert_eq!(rgb.to_rgba(), [1, 2, 3, 255]);
        assert_eq!(Rgb::from_rgba([1, 2, 3, 0]), rgb);
    }

    #[test]
    fn test_cell_widths() {
        assert_eq!(Cell::new('A').display_width(), 1);
        assert_eq!(Cell::new('日').display_width(), 2);
        assert!(Cell::wide_continuation().is_wide_continuation());
    }

    #[test]
    fn test_pixel_cell() {
        let cell = Cell::pixels(Rgb::WHITE, Rgb::BLACK);
        assert_eq!(cell.symbol(), HALF_BLOCK);
        assert_eq!(cell.fg(), Rgb::WHITE);
        assert_eq!(cell.bg(), Rgb::BLACK);
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255))
            .with_modifiers(Modifiers::BOLD);

        assert_eq!(cell.fg(), Rgb::new(255, 0, 0));
        assert_eq!(cell.bg(), Rgb::new(0, 0, 255));
        assert!(cell.modifiers().contains(Modifiers::BOLD));
    }
}
