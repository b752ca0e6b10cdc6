//! Editable rectangles and the category color table.

use super::geometry::{DragMode, Handle, Point};
use crate::buffer::Rgb;
use crate::document::{Block, BlockKind};

/// Identifier of an editable rectangle. Never reused across page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RectId(pub u64);

/// A named display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxColor {
    /// Color name as shown to the operator.
    pub name: &'static str,
    /// Pixel value used when drawing.
    pub rgb: Rgb,
}

impl BoxColor {
    /// `red`
    pub const RED: Self = Self::named("red", 0xFF_00_00);
    /// `grey`
    pub const GREY: Self = Self::named("grey", 0x80_80_80);
    /// `green`
    pub const GREEN: Self = Self::named("green", 0x00_80_00);
    /// `blue`
    pub const BLUE: Self = Self::named("blue", 0x00_00_FF);
    /// `black`, used for unrecognised categories.
    pub const DEFAULT: Self = Self::named("black", 0x00_00_00);

    const fn named(name: &'static str, hex: u32) -> Self {
        Self {
            name,
            rgb: Rgb::from_u32(hex),
        }
    }

    /// The display color for a block category.
    pub fn for_kind(kind: &BlockKind) -> Self {
        match kind {
            BlockKind::Title => Self::RED,
            BlockKind::Text => Self::GREY,
            BlockKind::Image => Self::GREEN,
            BlockKind::InterlineEquation => Self::BLUE,
            BlockKind::Other(_) => Self::DEFAULT,
        }
    }
}

/// A bounding box the operator can move and resize.
///
/// Width and height are signed: an edge dragged past the opposite one
/// yields a negative extent, which is kept as is.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableRect {
    /// Identifier.
    pub id: RectId,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
    /// Outline color.
    pub color: BoxColor,
    /// Source category.
    pub kind: BlockKind,
}

impl EditableRect {
    /// Derive a rectangle from a layout block.
    pub fn from_block(id: RectId, block: &Block) -> Self {
        let [x0, y0, x1, y1] = block.bbox;
        Self {
            id,
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
            color: BoxColor::for_kind(&block.kind),
            kind: block.kind.clone(),
        }
    }

    /// Position of a handle.
    pub fn handle_position(&self, handle: Handle) -> Point {
        let (left, top) = (self.x, self.y);
        let (right, bottom) = (self.x + self.width, self.y + self.height);
        let (mid_x, mid_y) = (self.x + self.width / 2.0, self.y + self.height / 2.0);
        match handle {
            Handle::TopLeft => Point::new(left, top),
            Handle::TopRight => Point::new(right, top),
            Handle::BottomLeft => Point::new(left, bottom),
            Handle::BottomRight => Point::new(right, bottom),
            Handle::Top => Point::new(mid_x, top),
            Handle::Right => Point::new(right, mid_y),
            Handle::Bottom => Point::new(mid_x, bottom),
            Handle::Left => Point::new(left, mid_y),
        }
    }

    /// Whether the point lies inside the body, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// What a pointer-down at `p` would do, corners before edges before body.
    pub fn hit(&self, p: Point, tolerance: f32) -> DragMode {
        Handle::ALL
            .into_iter()
            .find(|h| self.handle_position(*h).near(p, tolerance))
            .map_or_else(
                || if self.contains(p) { DragMode::Move } else { DragMode::None },
                DragMode::Resize,
            )
    }

    /// Apply a pointer delta under the given mode.
    pub fn apply(&mut self, mode: DragMode, delta: Point) {
        match mode {
            DragMode::None => {}
            DragMode::Move => {
                self.x += delta.x;
                self.y += delta.y;
            }
            DragMode::Resize(handle) => {
                if handle.moves_top() {
                    self.y += delta.y;
                    self.height -= delta.y;
                }
                if handle.moves_bottom() {
                    self.height += delta.y;
                }
                if handle.moves_left() {
                    self.x += delta.x;
                    self.width -= delta.x;
                }
                if handle.moves_right() {
                    self.width += delta.x;
                }
            }
        }
    }

    /// Corner coordinates `[x0, y0, x1, y1]` of the current geometry.
    pub fn bbox(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::geometry::HANDLE_TOLERANCE;
    use pretty_assertions::assert_eq;

    fn rect() -> EditableRect {
        EditableRect::from_block(RectId(1), &Block::new(BlockKind::Text, [10.0, 20.0, 110.0, 70.0]))
    }

    #[test]
    fn test_from_block() {
        let r = rect();
        assert_eq!((r.x, r.y, r.width, r.height), (10.0, 20.0, 100.0, 50.0));
        assert_eq!(r.color.name, "grey");
        assert_eq!(r.bbox(), [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_color_table() {
        assert_eq!(BoxColor::for_kind(&BlockKind::Title).name, "red");
        assert_eq!(BoxColor::for_kind(&BlockKind::Image).name, "green");
        assert_eq!(BoxColor::for_kind(&BlockKind::InterlineEquation).name, "blue");
        assert_eq!(BoxColor::for_kind(&BlockKind::Other("table".into())), BoxColor::DEFAULT);
    }

    #[test]
    fn test_hit_precedence() {
        let r = rect();
        assert_eq!(r.hit(Point::new(12.0, 22.0), HANDLE_TOLERANCE), DragMode::Resize(Handle::TopLeft));
        assert_eq!(r.hit(Point::new(60.0, 70.0), HANDLE_TOLERANCE), DragMode::Resize(Handle::Bottom));
        assert_eq!(r.hit(Point::new(60.0, 45.0), HANDLE_TOLERANCE), DragMode::Move);
        assert_eq!(r.hit(Point::new(200.0, 45.0), HANDLE_TOLERANCE), DragMode::None);
    }

    #[test]
    fn test_corner_wins_over_edge_on_tiny_box() {
        // Every handle of a 4x4 box is within tolerance of its corner.
        let r = EditableRect::from_block(RectId(2), &Block::new(BlockKind::Text, [0.0, 0.0, 4.0, 4.0]));
        assert_eq!(r.hit(Point::new(2.0, 0.0), HANDLE_TOLERANCE), DragMode::Resize(Handle::TopLeft));
        assert_eq!(r.hit(Point::new(4.0, 4.0), HANDLE_TOLERANCE), DragMode::Resize(Handle::TopLeft));
    }

    #[test]
    fn test_resize_left_keeps_right_edge() {
        let mut r = rect();
        r.apply(DragMode::Resize(Handle::Left), Point::new(15.0, 99.0));
        assert_eq!(r.bbox(), [25.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn test_resize_bottom_right() {
        let mut r = rect();
        r.apply(DragMode::Resize(Handle::BottomRight), Point::new(5.0, -7.0));
        assert_eq!((r.x, r.y, r.width, r.height), (10.0, 20.0, 105.0, 43.0));
    }

    #[test]
    fn test_resize_past_opposite_edge_goes_negative() {
        let mut r = rect();
        r.apply(DragMode::Resize(Handle::Top), Point::new(0.0, 80.0));
        assert_eq!(r.y, 100.0);
        assert_eq!(r.height, -30.0);
    }
}
