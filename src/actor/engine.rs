//! Engine: owns the terminal session and the input/render actors.
//!
//! Creating an engine switches the terminal into raw mode (optionally with
//! the alternate screen, mouse capture and focus reporting); dropping it
//! stops the actors and restores the terminal.

use super::messages::{InputEvent, RenderCommand};
use super::{InputActor, RendererActor};
use crate::buffer::Buffer;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the Engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to capture the mouse. Editing boxes needs it.
    pub enable_mouse: bool,
    /// Whether to report focus changes (focus loss ends a drag).
    pub focus_events: bool,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            focus_events: true,
            alternate_screen: true,
        }
    }
}

/// The terminal session.
pub struct Engine {
    config: EngineConfig,
    input_rx: Receiver<InputEvent>,
    render_tx: Sender<RenderCommand>,
    input_actor: Option<InputActor>,
    renderer_actor: Option<RendererActor>,
    width: u16,
    height: u16,
    frames: u64,
}

impl Engine {
    /// Set up the terminal and spawn the actors.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails or a thread cannot be
    /// spawned. The terminal is restored in that case.
    pub fn with_config(config: EngineConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        terminal::enable_raw_mode()?;
        if let Err(e) = Self::enter(&config) {
            Self::restore(&config);
            return Err(e);
        }

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(16);

        let actors = InputActor::spawn(input_tx, config.input_poll_timeout)
            .and_then(|input| RendererActor::spawn(render_rx, width, height).map(|render| (input, render)));
        let (input_actor, renderer_actor) = match actors {
            Ok(actors) => actors,
            Err(e) => {
                Self::restore(&config);
                return Err(e);
            }
        };

        info!(width, height, mouse = config.enable_mouse, "terminal session started");
        Ok(Self {
            config,
            input_rx,
            render_tx,
            input_actor: Some(input_actor),
            renderer_actor: Some(renderer_actor),
            width,
            height,
            frames: 0,
        })
    }

    fn enter(config: &EngineConfig) -> io::Result<()> {
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        if config.focus_events {
            execute!(stdout, EnableFocusChange)?;
        }
        execute!(stdout, cursor::Hide)
    }

    fn restore(config: &EngineConfig) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if config.focus_events {
            let _ = execute!(stdout, DisableFocusChange);
        }
        if config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }

    /// Terminal width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Terminal height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Input receiver for `select!`-driven loops.
    pub const fn input_receiver(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }

    /// Frames submitted so far.
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Submit a frame to be diffed against the screen.
    pub fn present(&mut self, buffer: &Buffer) {
        self.frames += 1;
        let _ = self.render_tx.send(RenderCommand::Update(Box::new(buffer.clone())));
    }

    /// Record a terminal resize.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let _ = self.render_tx.send(RenderCommand::Resize { width, height });
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }

        let _ = self.render_tx.send(RenderCommand::Shutdown);
        if let Some(actor) = self.renderer_actor.take() {
            actor.join();
        }

        Self::restore(&self.config);
        debug!(frames = self.frames, "terminal session ended");
    }
}
