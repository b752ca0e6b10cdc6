//! Image-space points and the ten drag modes.

use std::fmt;
use std::ops::Sub;

/// Half-width of the square around a handle that still grabs it, in
/// image pixels.
pub const HANDLE_TOLERANCE: f32 = 8.0;

/// Side length of a drawn handle square, in image pixels.
pub const HANDLE_SIZE: u32 = 8;

/// A position in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether `other` lies within `tolerance` of this point on both axes.
    #[inline]
    pub fn near(self, other: Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// One of the eight resize handles of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Midpoint of the top edge.
    Top,
    /// Midpoint of the right edge.
    Right,
    /// Midpoint of the bottom edge.
    Bottom,
    /// Midpoint of the left edge.
    Left,
}

impl Handle {
    /// All handles in hit-test order: corners first, then edges.
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
    ];

    /// Whether dragging this handle moves the top edge.
    pub const fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    /// Whether dragging this handle moves the bottom edge.
    pub const fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Whether dragging this handle moves the left edge.
    pub const fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the right edge.
    pub const fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    /// Human-readable name ("top-left", "right", ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// What a pointer gesture does to the selected rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragMode {
    /// No gesture.
    #[default]
    None,
    /// Translate the whole rectangle.
    Move,
    /// Drag one of the eight handles.
    Resize(Handle),
}

impl DragMode {
    /// Whether a gesture is in progress.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for DragMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Move => f.write_str("move"),
            Self::Resize(handle) => write!(f, "resize {}", handle.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_is_inclusive() {
        let p = Point::new(10.0, 10.0);
        assert!(p.near(Point::new(18.0, 2.0), HANDLE_TOLERANCE));
        assert!(!p.near(Point::new(18.5, 10.0), HANDLE_TOLERANCE));
    }

    #[test]
    fn test_corner_handles_move_two_edges() {
        for handle in &Handle::ALL[..4] {
            let edges = [
                handle.moves_top(),
                handle.moves_bottom(),
                handle.moves_left(),
                handle.moves_right(),
            ];
            assert_eq!(edges.iter().filter(|e| **e).count(), 2, "{handle:?}");
        }
        for handle in &Handle::ALL[4..] {
            let edges = [
                handle.moves_top(),
                handle.moves_bottom(),
                handle.moves_left(),
                handle.moves_right(),
            ];
            assert_eq!(edges.iter().filter(|e| **e).count(), 1, "{handle:?}");
        }
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(DragMode::Move.to_string(), "move");
        assert_eq!(DragMode::Resize(Handle::TopLeft).to_string(), "resize top-left");
    }
}
