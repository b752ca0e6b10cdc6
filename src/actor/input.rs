//! Input Actor: Dedicated thread for polling terminal events.
//!
//! Polls crossterm with a timeout so the shutdown flag is noticed, and
//! forwards converted events to the main loop.

use super::messages::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Input actor that polls terminal events.
pub struct InputActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input thread.
    ///
    /// `poll_timeout` bounds how long a shutdown request can go unnoticed.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("pagelens-input".to_string())
            .spawn(move || Self::run_loop(&sender, &shutdown_clone, poll_timeout))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Signal shutdown and wait for the thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            let event = match event::poll(poll_timeout) {
                Ok(true) => event::read(),
                Ok(false) => continue,
                Err(e) => Err(e),
            };

            match event {
                Ok(event) => {
                    if let Some(input_event) = convert_event(event) {
                        if sender.send(input_event).is_err() {
                            debug!("input receiver dropped");
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "terminal input error");
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Convert a crossterm event; `None` for events the viewer ignores.
pub(crate) fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key_event) => {
            // Release and repeat events would double every keypress.
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            let code = convert_key_code(key_event.code)?;
            let modifiers = convert_modifiers(key_event.modifiers);
            Some(InputEvent::Key { code, modifiers })
        }
        Event::Mouse(mouse_event) => convert_mouse_event(mouse_event),
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
        Event::Paste(_) => None,
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}

fn convert_mouse_event(mouse: event::MouseEvent) -> Option<InputEvent> {
    let modifiers = convert_modifiers(mouse.modifiers);
    let at = |button: Option<MouseButton>| MouseEvent {
        x: mouse.column,
        y: mouse.row,
        button,
        modifiers,
    };

    match mouse.kind {
        event::MouseEventKind::Down(button) => Some(InputEvent::MouseDown(at(Some(convert_mouse_button(button))))),
        event::MouseEventKind::Up(button) => Some(InputEvent::MouseUp(at(Some(convert_mouse_button(button))))),
        event::MouseEventKind::Moved => Some(InputEvent::MouseMove(at(None))),
        event::MouseEventKind::Drag(button) => Some(InputEvent::MouseMove(at(Some(convert_mouse_button(button))))),
        event::MouseEventKind::ScrollUp => Some(InputEvent::MouseScroll {
            x: mouse.column,
            y: mouse.row,
            delta: 1,
        }),
        event::MouseEventKind::ScrollDown => Some(InputEvent::MouseScroll {
            x: mouse.column,
            y: mouse.row,
            delta: -1,
        }),
        _ => None,
    }
}

const fn convert_mouse_button(button: event::MouseButton) -> MouseButton {
    match button {
        event::MouseButton::Left => MouseButton::Left,
        event::MouseButton::Right => MouseButton::Right,
        event::MouseButton::Middle => MouseButton::Middle,
    }
}
