//! Actor Model: Message-passing concurrency for the viewer.
//!
//! - **Input Actor**: polls terminal events, forwards them to the main loop
//! - **Render Actor**: receives finished frames, diffs and flushes them
//! - **Loader Actor**: fetches pages off the main loop
//! - **Main Loop**: owns all viewer state and reacts to input and loads
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//!                                      │  Main Loop   │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀─────────────────  │              │
//! └──────────────┘                     └──────────────┘
//!                                        │        ▲
//!                             LoadRequest│        │LoadEvent
//!                                        ▼        │
//!                                      ┌──────────────┐
//!                                      │Loader Thread │
//!                                      └──────────────┘
//! ```

mod engine;
mod input;
mod loader;
mod messages;
mod renderer;

pub use engine::{Engine, EngineConfig};
pub use input::InputActor;
pub use loader::LoaderActor;
pub use messages::{
    InputEvent, KeyCode, KeyModifiers, LoadEvent, LoadRequest, MouseButton, MouseEvent, RenderCommand,
};
pub use renderer::{RenderStats, RendererActor};
