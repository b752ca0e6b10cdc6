//! Diffing Engine: Generate minimal ANSI sequences from buffer changes.
//!
//! Dragging a box repaints the whole page view, but only the cells under
//! the old and new outline actually change. The diff walks both buffers,
//! emits escape sequences for changed cells only, skips cursor moves for
//! adjacent writes, and tracks the last emitted colors and modifiers.
//!
//! All output is accumulated in a single buffer and flushed with one syscall.

use super::{Buffer, Cell, Modifiers, Rgb};
use std::io::Write;

/// The terminal state as last written by the diff engine.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// Cursor position, `None` when unknown.
    cursor: Option<(u16, u16)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Option<Modifiers>,
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything (after a full redraw or raw output).
    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Statistics of a diff operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Render the difference between `current` and `next` into `output`.
///
/// Both buffers must have the same dimensions.
pub fn render_diff(
    current: &Buffer,
    next: &Buffer,
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = next.width();

    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new || new.is_wide_continuation() {
            continue;
        }

        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((idx % usize::from(width)) as u16, (idx / usize::from(width)) as u16);
        result.cells_changed += 1;

        if state.cursor != Some((x, y)) {
            emit_cursor_move(output, x, y);
            result.cursor_moves += 1;
        }
        result.color_changes += emit_style(output, new, state);
        emit_symbol(output, new);
        state.cursor = Some((x + u16::from(new.display_width().max(1)), y));
    }

    result
}

/// Generate a full redraw sequence (no diffing).
///
/// Used for the first frame and after a resize, when what is on screen is
/// unknown.
pub fn render_full(buffer: &Buffer, output: &mut Vec<u8>, state: &mut DiffState) {
    state.reset();
    output.extend_from_slice(b"\x1b[0m\x1b[2J\x1b[H");
    state.cursor = Some((0, 0));

    for (y, row) in buffer.rows().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let y = y as u16;
        emit_cursor_move(output, 0, y);
        let mut x = 0u16;
        for cell in row.iter().filter(|c| !c.is_wide_continuation()) {
            emit_style(output, cell, state);
            emit_symbol(output, cell);
            x += u16::from(cell.display_width().max(1));
        }
        state.cursor = Some((x, y));
    }
}

/// Emit SGR sequences needed to draw `cell`; returns the color changes.
fn emit_style(output: &mut Vec<u8>, cell: &Cell, state: &mut DiffState) -> usize {
    let mods = cell.modifiers();

    // Removing an attribute needs a full reset, which also drops colors.
    let current = state.modifiers.unwrap_or_else(Modifiers::empty);
    if !current.difference(mods).is_empty() {
        output.extend_from_slice(b"\x1b[0m");
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
    }

    let mut changes = 0;
    if state.fg != Some(cell.fg()) {
        emit_fg_color(output, cell.fg());
        state.fg = Some(cell.fg());
        changes += 1;
    }
    if state.bg != Some(cell.bg()) {
        emit_bg_color(output, cell.bg());
        state.bg = Some(cell.bg());
        changes += 1;
    }
    if state.modifiers != Some(mods) {
        let added = mods.difference(state.modifiers.unwrap_or_else(Modifiers::empty));
        emit_modifier_set(output, added);
        state.modifiers = Some(mods);
    }
    changes
}

/// Emit a cursor move sequence (ANSI positions are 1-indexed).
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let row = y + 1;
    let col = x + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    if modifiers.contains(Modifiers::BOLD) {
        output.extend_from_slice(b"\x1b[1m");
    }
}

#[inline]
fn emit_symbol(output: &mut Vec<u8>, cell: &Cell) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(cell.symbol().encode_utf8(&mut utf8).as_bytes());
}
