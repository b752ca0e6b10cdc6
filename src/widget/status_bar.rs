//! Status Bar Widget: one row under the page view.
//!
//! Left: the resource name and page number. Center: what the viewer is
//! doing (loading, error, box count, hover hint). Right: key hints.

use super::traits::Widget;
use crate::actor::InputEvent;
use crate::buffer::{Buffer, Cell, Modifiers, Rgb};
use crate::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Colors of the status bar.
#[derive(Debug, Clone)]
pub struct StatusBarConfig {
    /// Background color.
    pub bg: Rgb,
    /// Left section text color.
    pub left_fg: Rgb,
    /// Center section text color.
    pub center_fg: Rgb,
    /// Center section color while showing an error.
    pub error_fg: Rgb,
    /// Right section text color.
    pub right_fg: Rgb,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            bg: Rgb::new(40, 40, 40),
            left_fg: Rgb::WHITE,
            center_fg: Rgb::new(150, 150, 150),
            error_fg: Rgb::new(230, 90, 90),
            right_fg: Rgb::new(100, 200, 100),
        }
    }
}

/// A three-section status bar (left, center, right).
#[derive(Debug)]
pub struct StatusBar {
    left: String,
    center: String,
    right: String,
    error: bool,
    bounds: Rect,
    config: StatusBarConfig,
    dirty: bool,
}

impl StatusBar {
    /// Create a status bar with default colors.
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, StatusBarConfig::default())
    }

    /// Create a status bar with custom colors.
    pub const fn with_config(bounds: Rect, config: StatusBarConfig) -> Self {
        Self {
            left: String::new(),
            center: String::new(),
            right: String::new(),
            error: false,
            bounds,
            config,
            dirty: true,
        }
    }

    /// Set the left section.
    pub fn set_left(&mut self, text: impl Into<String>) {
        set_if_changed(&mut self.left, text.into(), &mut self.dirty);
    }

    /// Set the center section.
    pub fn set_center(&mut self, text: impl Into<String>) {
        set_if_changed(&mut self.center, text.into(), &mut self.dirty);
        if self.error {
            self.error = false;
            self.dirty = true;
        }
    }

    /// Show an error message in the center section.
    pub fn set_error(&mut self, text: impl Into<String>) {
        set_if_changed(&mut self.center, text.into(), &mut self.dirty);
        if !self.error {
            self.error = true;
            self.dirty = true;
        }
    }

    /// Set the right section.
    pub fn set_right(&mut self, text: impl Into<String>) {
        set_if_changed(&mut self.right, text.into(), &mut self.dirty);
    }

    /// The left section.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// The center section.
    pub fn center(&self) -> &str {
        &self.center
    }

    /// The right section.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// Whether the center section shows an error.
    pub const fn is_error(&self) -> bool {
        self.error
    }
}

fn set_if_changed(slot: &mut String, text: String, dirty: &mut bool) {
    if *slot != text {
        *slot = text;
        *dirty = true;
    }
}

#[allow(clippy::cast_possible_truncation)]
fn text_width(text: &str) -> u16 {
    text.width().min(usize::from(u16::MAX)) as u16
}

impl Widget for StatusBar {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        if self.bounds.is_empty() {
            return;
        }
        let Rect { x, y, width, .. } = self.bounds;
        let bg = self.config.bg;
        buffer.fill_rect(Rect::new(x, y, width, 1), Cell::new(' ').with_bg(bg));

        // Right and left sections are fixed; the center gets what is left.
        let right_len = text_width(&self.right).min(width / 3);
        let right_start = self.bounds.right() - right_len;
        buffer.draw_text(right_start, y, self.bounds.right(), &self.right, self.config.right_fg, bg);

        let left_style = Cell::new(' ').with_fg(self.config.left_fg).with_bg(bg).with_modifiers(Modifiers::BOLD);
        let left_used = buffer.draw_styled(x + 1, y, right_start, &self.left, left_style);

        let center_style = if self.error {
            Cell::new(' ').with_fg(self.config.error_fg).with_modifiers(Modifiers::BOLD)
        } else {
            Cell::new(' ').with_fg(self.config.center_fg)
        };
        let free_start = x + 1 + left_used + 2;
        let free_end = right_start.saturating_sub(2);
        if free_start < free_end {
            let free = free_end - free_start;
            let center_len = text_width(&self.center).min(free);
            let center_start = (x + (width - center_len) / 2).clamp(free_start, free_end - center_len);
            buffer.draw_styled(center_start, y, free_end, &self.center, center_style.with_bg(bg));
        }
    }

    fn handle_input(&mut self, _event: &InputEvent) -> bool {
        false
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}
