//! Layout module: terminal rectangles and the page viewport.
//!
//! The screen is split once per resize into the page view and a one-row
//! status bar; the [`Viewport`] then maps page-view cells to image pixels.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::{Viewport, MAX_ZOOM};

/// Rows reserved for the status bar.
pub const STATUS_ROWS: u16 = 1;

/// Split a terminal of the given size into `(page_view, status_bar)`.
pub fn split_screen(width: u16, height: u16) -> (Rect, Rect) {
    Rect::from_size(width, height).split_bottom(STATUS_ROWS)
}
