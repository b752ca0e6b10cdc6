//! Viewport: maps a rectangle of terminal cells onto image pixel space.
//!
//! Each cell shows two vertically stacked view pixels (half-block
//! rendering). One view pixel covers `zoom × zoom` image pixels, and the
//! view pixel at the top-left of the area shows image pixel `offset`.

use super::rect::Rect;
use crate::editor::Point;

/// Largest supported zoom-out factor.
pub const MAX_ZOOM: u32 = 16;

/// Cell-to-image mapping for the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    area: Rect,
    image_width: u32,
    image_height: u32,
    zoom: u32,
    offset_x: u32,
    offset_y: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

impl Viewport {
    /// A viewport over `area` at natural resolution with no image yet.
    pub const fn new(area: Rect) -> Self {
        Self {
            area,
            image_width: 0,
            image_height: 0,
            zoom: 1,
            offset_x: 0,
            offset_y: 0,
        }
    }

    /// The cell rectangle this viewport occupies.
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Image pixels per view pixel.
    pub const fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Image pixel shown at the top-left of the area.
    pub const fn offset(&self) -> (u32, u32) {
        (self.offset_x, self.offset_y)
    }

    /// Move the viewport to a new cell rectangle (terminal resize).
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.clamp_offset();
    }

    /// Point the viewport at a freshly loaded image, scrolled to the top.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
        self.offset_x = 0;
        self.offset_y = 0;
    }

    /// Visible image span in pixels (width, height).
    pub const fn visible_span(&self) -> (u32, u32) {
        (
            self.area.width as u32 * self.zoom,
            self.area.height as u32 * 2 * self.zoom,
        )
    }

    /// The image-space point under the top-left view pixel of a cell.
    ///
    /// Returns `None` if the cell is outside the viewport area. Points past
    /// the image edge are still returned; the editor decides what they hit.
    pub fn cell_to_image(&self, col: u16, row: u16) -> Option<Point> {
        if !self.area.contains(col, row) {
            return None;
        }
        let vx = u32::from(col - self.area.x);
        let vy = u32::from(row - self.area.y) * 2;
        Some(Point::new(
            (self.offset_x + vx * self.zoom) as f32,
            (self.offset_y + vy * self.zoom) as f32,
        ))
    }

    /// The cell showing an image-space point, if it is visible.
    pub fn image_to_cell(&self, point: Point) -> Option<(u16, u16)> {
        if point.x < self.offset_x as f32 || point.y < self.offset_y as f32 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (vx, vy) = (
            (point.x - self.offset_x as f32) as u32 / self.zoom,
            (point.y - self.offset_y as f32) as u32 / self.zoom / 2,
        );
        let col = u16::try_from(vx).ok()?.checked_add(self.area.x)?;
        let row = u16::try_from(vy).ok()?.checked_add(self.area.y)?;
        self.area.contains(col, row).then_some((col, row))
    }

    /// The image pixel sampled for the upper (`lower == false`) or lower
    /// half of a cell, or `None` if it falls outside the image.
    pub fn sample(&self, col: u16, row: u16, lower: bool) -> Option<(u32, u32)> {
        if !self.area.contains(col, row) {
            return None;
        }
        let vx = u32::from(col - self.area.x);
        let vy = u32::from(row - self.area.y) * 2 + u32::from(lower);
        let x = self.offset_x + vx * self.zoom;
        let y = self.offset_y + vy * self.zoom;
        (x < self.image_width && y < self.image_height).then_some((x, y))
    }

    /// Scroll by whole cells; clamps to the image.
    pub fn scroll_by(&mut self, cols: i32, rows: i32) {
        let dx = i64::from(cols) * i64::from(self.zoom);
        let dy = i64::from(rows) * 2 * i64::from(self.zoom);
        self.offset_x = shift(self.offset_x, dx);
        self.offset_y = shift(self.offset_y, dy);
        self.clamp_offset();
    }

    /// Show more detail (halve the zoom factor).
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom((self.zoom / 2).max(1))
    }

    /// Show more of the page (double the zoom factor).
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom((self.zoom * 2).min(MAX_ZOOM))
    }

    /// Zoom out until the whole image width fits, as far as [`MAX_ZOOM`]
    /// allows. Returns whether the zoom changed.
    pub fn fit_width(&mut self) -> bool {
        let cols = u32::from(self.area.width.max(1));
        let mut zoom = 1;
        while zoom < MAX_ZOOM && cols * zoom < self.image_width {
            zoom *= 2;
        }
        self.set_zoom(zoom)
    }

    fn set_zoom(&mut self, zoom: u32) -> bool {
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.clamp_offset();
        true
    }

    fn clamp_offset(&mut self) {
        let (span_w, span_h) = self.visible_span();
        self.offset_x = self.offset_x.min(self.image_width.saturating_sub(span_w));
        self.offset_y = self.offset_y.min(self.image_height.saturating_sub(span_h));
    }
}

fn shift(value: u32, delta: i64) -> u32 {
    u32::try_from((i64::from(value) + delta).max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(Rect::new(0, 0, 80, 23));
        vp.set_image_size(1000, 1400);
        vp
    }

    #[test]
    fn test_natural_resolution_mapping() {
        let vp = viewport();
        assert_eq!(vp.cell_to_image(10, 5), Some(Point::new(10.0, 10.0)));
        assert_eq!(vp.sample(10, 5, true), Some((10, 11)));
        assert_eq!(vp.cell_to_image(80, 0), None);
    }

    #[test]
    fn test_cell_round_trip() {
        let mut vp = viewport();
        vp.zoom_out();
        vp.scroll_by(3, 4);
        let point = vp.cell_to_image(17, 9).unwrap();
        assert_eq!(vp.image_to_cell(point), Some((17, 9)));
    }

    #[test]
    fn test_scroll_clamps_to_image() {
        let mut vp = viewport();
        vp.scroll_by(-5, -5);
        assert_eq!(vp.offset(), (0, 0));

        vp.scroll_by(10_000, 10_000);
        assert_eq!(vp.offset(), (1000 - 80, 1400 - 46));
    }

    #[test]
    fn test_zoom_bounds() {
        let mut vp = viewport();
        assert!(!vp.zoom_in());
        for _ in 0..10 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        // Page is narrower than the view: no horizontal scrolling.
        vp.scroll_by(50, 50);
        assert_eq!(vp.offset().0, 0);
        assert_eq!(vp.offset().1, 1400 - 46 * 16);
    }

    #[test]
    fn test_sample_outside_image() {
        let mut vp = Viewport::new(Rect::new(0, 0, 10, 10));
        vp.set_image_size(5, 5);
        assert_eq!(vp.sample(4, 2, false), Some((4, 4)));
        assert_eq!(vp.sample(4, 2, true), None);
        assert_eq!(vp.sample(5, 0, false), None);
    }

    #[test]
    fn test_fit_width() {
        let mut vp = Viewport::new(Rect::new(0, 0, 100, 20));
        vp.set_image_size(350, 500);
        assert!(vp.fit_width());
        assert_eq!(vp.zoom(), 4);
        assert!(!vp.fit_width());

        vp.set_image_size(60, 60);
        assert!(vp.fit_width());
        assert_eq!(vp.zoom(), 1);
    }
}
