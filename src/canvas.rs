//! Canvas: the box overlay, drawn in image pixel space.
//!
//! The overlay has the page image's natural dimensions and is redrawn from
//! scratch whenever the editor's rectangle set changes. The page view
//! composes it over the page raster when sampling pixels.

use crate::buffer::Rgb;
use crate::editor::{EditableRect, Handle, HANDLE_SIZE};
use image::{Rgba, RgbaImage};

/// Outline stroke width in image pixels.
pub const STROKE_WIDTH: u32 = 2;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Transparent RGBA overlay holding box outlines and handles.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    drawn_revision: Option<u64>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A zero-sized canvas (no image loaded).
    pub fn new() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
            drawn_revision: None,
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Match the canvas to a newly loaded image's natural size.
    ///
    /// Always forces the next [`Canvas::render_if_stale`] to draw.
    pub fn sync_size(&mut self, width: u32, height: u32) {
        if (width, height) != self.pixels.dimensions() {
            self.pixels = RgbaImage::new(width, height);
        }
        self.drawn_revision = None;
    }

    /// Overlay pixel at (x, y); transparent outside the canvas.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel_checked(x, y).map_or(TRANSPARENT.0, |p| p.0)
    }

    /// The first opaque overlay pixel in the `size × size` block at
    /// (x, y), or transparent. Used when one view pixel covers many image
    /// pixels so thin strokes do not vanish when zoomed out.
    pub fn pixel_in_block(&self, x: u32, y: u32, size: u32) -> [u8; 4] {
        if size <= 1 {
            return self.pixel(x, y);
        }
        let x_end = x.saturating_add(size).min(self.width());
        let y_end = y.saturating_add(size).min(self.height());
        (y..y_end)
            .flat_map(|py| (x..x_end).map(move |px| (px, py)))
            .map(|(px, py)| self.pixels.get_pixel(px, py).0)
            .find(|p| p[3] != 0)
            .unwrap_or(TRANSPARENT.0)
    }

    /// Redraw if `revision` differs from the last drawn one. Returns whether
    /// a redraw happened.
    pub fn render_if_stale(&mut self, rects: &[EditableRect], revision: u64) -> bool {
        if self.drawn_revision == Some(revision) {
            return false;
        }
        self.render(rects);
        self.drawn_revision = Some(revision);
        true
    }

    /// Clear and draw every rectangle's outline and eight handles.
    pub fn render(&mut self, rects: &[EditableRect]) {
        self.pixels.pixels_mut().for_each(|p| *p = TRANSPARENT);
        for rect in rects {
            self.draw_rect(rect);
        }
    }

    fn draw_rect(&mut self, rect: &EditableRect) {
        let color = Rgba(rect.color.rgb.to_rgba());

        // Negative extents are drawn as the box they cover.
        let left = rect.x.min(rect.x + rect.width);
        let top = rect.y.min(rect.y + rect.height);
        let right = rect.x.max(rect.x + rect.width);
        let bottom = rect.y.max(rect.y + rect.height);

        // Stroke centered on the boundary.
        let half = STROKE_WIDTH as f32 / 2.0;
        let stroke = STROKE_WIDTH as f32;
        self.fill(left - half, top - half, right - left + stroke, stroke, color);
        self.fill(left - half, bottom - half, right - left + stroke, stroke, color);
        self.fill(left - half, top - half, stroke, bottom - top + stroke, color);
        self.fill(right - half, top - half, stroke, bottom - top + stroke, color);

        let size = HANDLE_SIZE as f32;
        for handle in Handle::ALL {
            let center = rect.handle_position(handle);
            self.fill(center.x - size / 2.0, center.y - size / 2.0, size, size, color);
        }
    }

    /// Fill an axis-aligned area, clipped to the canvas.
    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        let (canvas_w, canvas_h) = self.pixels.dimensions();
        let x0 = clamp_px(x, canvas_w);
        let y0 = clamp_px(y, canvas_h);
        let x1 = clamp_px(x + width, canvas_w);
        let y1 = clamp_px(y + height, canvas_h);
        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_px(value: f32, limit: u32) -> u32 {
    value.round().clamp(0.0, limit as f32) as u32
}

/// Source-over blend of an overlay pixel onto an opaque page pixel.
#[inline]
pub fn compose(page: Rgb, overlay: [u8; 4]) -> Rgb {
    let alpha = u16::from(overlay[3]);
    if alpha == 0 {
        return page;
    }
    let blend = |under: u8, over: u8| -> u8 {
        let mixed = (u16::from(over) * alpha + u16::from(under) * (255 - alpha)) / 255;
        u8::try_from(mixed).unwrap_or(u8::MAX)
    };
    Rgb::new(
        blend(page.r, overlay[0]),
        blend(page.g, overlay[1]),
        blend(page.b, overlay[2]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, BlockKind};
    use crate::editor::RectId;

    fn text_rect() -> EditableRect {
        EditableRect::from_block(RectId(0), &Block::new(BlockKind::Text, [10.0, 20.0, 110.0, 70.0]))
    }

    fn is_set(canvas: &Canvas, x: u32, y: u32) -> bool {
        canvas.pixel(x, y)[3] == 255
    }

    #[test]
    fn test_sync_size_follows_image() {
        let mut canvas = Canvas::new();
        canvas.sync_size(200, 100);
        assert_eq!((canvas.width(), canvas.height()), (200, 100));
        canvas.sync_size(640, 480);
        assert_eq!((canvas.width(), canvas.height()), (640, 480));
    }

    #[test]
    fn test_outline_and_handles() {
        let mut canvas = Canvas::new();
        canvas.sync_size(200, 100);
        canvas.render(&[text_rect()]);

        // Stroke on the top edge, in the rectangle's color.
        assert_eq!(canvas.pixel(50, 20), [0x80, 0x80, 0x80, 255]);
        assert!(is_set(&canvas, 50, 19));
        // Interior stays transparent.
        assert!(!is_set(&canvas, 50, 45));
        // Right-edge midpoint handle spans 8px around (110, 45).
        assert!(is_set(&canvas, 113, 45));
        assert!(!is_set(&canvas, 115, 45));
        // Corner handle.
        assert!(is_set(&canvas, 7, 17));
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut canvas = Canvas::new();
        canvas.sync_size(200, 100);
        let mut rect = text_rect();
        canvas.render(std::slice::from_ref(&rect));
        rect.x += 50.0;
        canvas.render(std::slice::from_ref(&rect));
        assert!(!is_set(&canvas, 10, 45));
        assert!(is_set(&canvas, 60, 45));
    }

    #[test]
    fn test_render_if_stale() {
        let mut canvas = Canvas::new();
        canvas.sync_size(50, 50);
        assert!(canvas.render_if_stale(&[], 3));
        assert!(!canvas.render_if_stale(&[], 3));
        canvas.sync_size(50, 50);
        assert!(canvas.render_if_stale(&[], 3));
    }

    #[test]
    fn test_clipping_and_negative_extent() {
        let mut canvas = Canvas::new();
        canvas.sync_size(30, 30);
        let mut rect = text_rect();
        rect.x = 20.0;
        rect.y = 20.0;
        rect.width = -15.0;
        rect.height = 40.0;
        canvas.render(&[rect]);
        // Left edge of the normalised box at x = 5.
        assert!(is_set(&canvas, 5, 25));
        assert_eq!(canvas.pixel(100, 100), [0, 0, 0, 0]);
    }

    #[test]
    fn test_pixel_in_block_finds_thin_strokes() {
        let mut canvas = Canvas::new();
        canvas.sync_size(200, 100);
        canvas.render(&[text_rect()]);
        // The block (48..56, 40..48) lies inside the box and misses the stroke.
        assert_eq!(canvas.pixel_in_block(48, 40, 8)[3], 0);
        // The block (48..56, 16..24) straddles the top edge.
        assert_eq!(canvas.pixel_in_block(48, 16, 8)[3], 255);
        assert_eq!(canvas.pixel_in_block(500, 500, 8), [0, 0, 0, 0]);
    }

    #[test]
    fn test_compose() {
        let page = Rgb::WHITE;
        assert_eq!(compose(page, [0, 0, 0, 0]), page);
        assert_eq!(compose(page, [255, 0, 0, 255]), Rgb::new(255, 0, 0));
    }
}
