//! # Pagelens
//!
//! A terminal viewer and box editor for document layout-analysis results.
//!
//! Pagelens fetches a rendered page image and its layout JSON from a
//! backend, draws the page with true-color half blocks and overlays one
//! colored box per layout block. Boxes can be moved and resized with the
//! mouse.
//!
//! ## Core Concepts
//!
//! - **Loader**: both page resources fetched concurrently, stale loads
//!   discarded by generation
//! - **Editor**: hit-testing and drag gestures over the box set
//! - **Canvas**: the box overlay in image pixel space
//! - **Actor model**: isolated threads for input, rendering and loading
//!
//! ## Example
//!
//! ```rust
//! use pagelens::editor::{DragMode, Editor, Point};
//! use pagelens::document::LayoutDocument;
//!
//! let json = br#"{"pdf_info": [{"preproc_blocks": [{"type": "text", "bbox": [10, 20, 110, 70]}]}]}"#;
//! let document = LayoutDocument::from_slice(json).unwrap();
//!
//! let mut editor = Editor::new();
//! editor.load_document(&document);
//! assert_eq!(editor.pointer_down(Point::new(60.0, 45.0)).map(|(_, mode)| mode), Some(DragMode::Move));
//! editor.pointer_move(Point::new(70.0, 45.0));
//! editor.pointer_up();
//! assert_eq!(editor.rects()[0].x, 20.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod app;
pub mod buffer;
pub mod canvas;
pub mod config;
pub mod document;
pub mod editor;
pub mod layout;
pub mod loader;
pub mod widget;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, InputEvent, KeyCode, KeyModifiers, LoadEvent, LoadRequest, LoaderActor};
pub use app::{App, PageNav};
pub use buffer::{Buffer, Cell, Modifiers, Rgb};
pub use canvas::Canvas;
pub use config::{Args, ViewerConfig};
pub use document::{Block, BlockKind, LayoutDocument};
pub use editor::{DragMode, EditableRect, Editor, Handle, Point};
pub use layout::{Rect, Viewport};
pub use loader::{HttpPageSource, LoadError, LoadTracker, LoadedPage, PageLoader, PageNaming, PageSource};
pub use widget::{PageView, StatusBar, ViewState, Widget};
