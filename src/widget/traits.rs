//! The `Widget` trait shared by the page view and the status bar.

use crate::actor::InputEvent;
use crate::buffer::Buffer;
use crate::layout::Rect;

/// A screen region that draws itself into a buffer and may react to input.
pub trait Widget {
    /// The cell rectangle this widget occupies.
    fn bounds(&self) -> Rect;

    /// Move or resize the widget (terminal resize).
    fn set_bounds(&mut self, bounds: Rect);

    /// Draw into `buffer`, touching only cells within [`Widget::bounds`].
    fn render(&self, buffer: &mut Buffer);

    /// React to an input event.
    ///
    /// Returns `true` if the event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Whether the widget changed since the last frame.
    fn needs_redraw(&self) -> bool;

    /// Mark the widget as drawn.
    fn clear_redraw(&mut self);
}
