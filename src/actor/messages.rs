//! Message types for actor communication.
//!
//! These enums define the protocol between the main loop and its
//! background threads.

use crate::buffer::Buffer;
use crate::loader::LoadedPage;

/// Key codes the viewer reacts to.
///
/// A subset of crossterm's key codes; anything else is dropped by the
/// input actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Only Shift.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    /// Only Control.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

/// Mouse event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Button held or involved, if any.
    pub button: Option<MouseButton>,
    /// Key modifiers held during the event.
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    /// An event at (x, y) with no modifiers.
    pub const fn at(x: u16, y: u16, button: Option<MouseButton>) -> Self {
        Self {
            x,
            y,
            button,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Mouse button pressed.
    MouseDown(MouseEvent),

    /// Mouse button released.
    MouseUp(MouseEvent),

    /// Pointer moved, with or without a button held.
    MouseMove(MouseEvent),

    /// Mouse wheel.
    MouseScroll {
        /// Column.
        x: u16,
        /// Row.
        y: u16,
        /// Scroll delta (positive = up, negative = down).
        delta: i16,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Focus gained.
    FocusGained,

    /// Focus lost.
    FocusLost,

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

impl InputEvent {
    /// A key press without modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Commands sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Diff this buffer against the visible one and flush the changes.
    Update(Box<Buffer>),

    /// Resize the buffers. The next frame is a full redraw.
    Resize {
        /// New width.
        width: u16,
        /// New height.
        height: u16,
    },

    /// Shutdown the render thread.
    Shutdown,
}

/// Ask the loader thread for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Token from the app's load tracker.
    pub generation: u64,
    /// Page number.
    pub page: u32,
}

/// Outcome of a [`LoadRequest`].
#[derive(Debug)]
pub enum LoadEvent {
    /// Both resources arrived and decoded.
    Loaded {
        /// Generation of the request served.
        generation: u64,
        /// The page.
        page: Box<LoadedPage>,
    },

    /// The load failed.
    Failed {
        /// Generation of the request served.
        generation: u64,
        /// Page number requested.
        page: u32,
        /// Human-readable reason.
        message: String,
    },
}

impl LoadEvent {
    /// Generation of the request this answers.
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}
