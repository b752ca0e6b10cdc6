//! Renderer Actor: Dedicated thread for rendering to the terminal.
//!
//! This actor owns the visible buffer. It receives finished frames from
//! the main loop, diffs them against what is on screen and flushes the
//! result in a single write.

use super::messages::RenderCommand;
use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Buffer;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Renderer actor that handles terminal output.
pub struct RendererActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames rendered.
    pub frames: u64,
    /// Total cells changed across all diffed frames.
    pub cells_changed: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
    /// Smoothed render time in microseconds.
    pub avg_render_us: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
}

/// Double-buffered frame writer.
pub(crate) struct Renderer<W: Write> {
    current: Buffer,
    diff_state: DiffState,
    output: Vec<u8>,
    out: W,
    stats: RenderStats,
    needs_full_redraw: bool,
}

impl<W: Write> Renderer<W> {
    pub(crate) fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            current: Buffer::new(width.max(1), height.max(1)),
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            out,
            stats: RenderStats::default(),
            needs_full_redraw: true,
        }
    }

    pub(crate) const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub(crate) const fn mark_full_dirty(&mut self) {
        self.needs_full_redraw = true;
    }

    /// Draw `next`, then keep it as the visible buffer.
    pub(crate) fn render(&mut self, next: Buffer) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();

        let size_changed = (next.width(), next.height()) != (self.current.width(), self.current.height());
        if self.needs_full_redraw || size_changed {
            render_full(&next, &mut self.output, &mut self.diff_state);
            self.needs_full_redraw = false;
        } else {
            let result = render_diff(&self.current, &next, &mut self.output, &mut self.diff_state);
            self.stats.cells_changed += result.cells_changed as u64;
        }

        if !self.output.is_empty() {
            self.out.write_all(&self.output)?;
            self.out.flush()?;
        }

        self.current = next;

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.last_render_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        if self.stats.avg_render_us == 0 {
            self.stats.avg_render_us = self.stats.last_render_us;
        } else {
            self.stats.avg_render_us = (self.stats.avg_render_us * 15 + self.stats.last_render_us) / 16;
        }

        Ok(())
    }

    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width.max(1), height.max(1));
        self.mark_full_dirty();
    }
}

impl RendererActor {
    /// Spawn the render thread writing to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(receiver: Receiver<RenderCommand>, width: u16, height: u16) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("pagelens-render".to_string())
            .spawn(move || {
                let mut renderer = Renderer::new(io::stdout(), width, height);
                if let Err(e) = Self::run_loop(&receiver, &shutdown_clone, &mut renderer) {
                    error!(error = %e, "render thread failed");
                }
                let stats = renderer.stats();
                debug!(
                    frames = stats.frames,
                    bytes = stats.bytes_written,
                    avg_us = stats.avg_render_us,
                    "render thread stopped"
                );
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop<W: Write>(
        receiver: &Receiver<RenderCommand>,
        shutdown: &AtomicBool,
        renderer: &mut Renderer<W>,
    ) -> io::Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            let command = match receiver.recv_timeout(Duration::from_millis(16)) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            match command {
                RenderCommand::Update(buffer) => renderer.render(*buffer)?,
                RenderCommand::Resize { width, height } => renderer.resize(width, height),
                RenderCommand::Shutdown => break,
            }
        }
        Ok(())
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cell;

    #[test]
    fn test_first_frame_is_full_redraw() {
        let mut renderer = Renderer::new(Vec::new(), 4, 2);
        renderer.render(Buffer::new(4, 2)).unwrap();
        assert!(renderer.out.starts_with(b"\x1b[0m\x1b[2J"));
        assert_eq!(renderer.stats().frames, 1);
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut renderer = Renderer::new(Vec::new(), 4, 2);
        renderer.render(Buffer::new(4, 2)).unwrap();
        let written = renderer.out.len();
        renderer.render(Buffer::new(4, 2)).unwrap();
        assert_eq!(renderer.out.len(), written);
    }

    #[test]
    fn test_changed_cell_is_diffed() {
        let mut renderer = Renderer::new(Vec::new(), 4, 2);
        renderer.render(Buffer::new(4, 2)).unwrap();
        renderer.out.clear();

        let mut next = Buffer::new(4, 2);
        next.set(1, 1, Cell::new('x'));
        renderer.render(next).unwrap();

        let text = String::from_utf8_lossy(&renderer.out);
        assert!(text.starts_with("\x1b[2;2H"));
        assert!(text.ends_with('x'));
        assert_eq!(renderer.stats().cells_changed, 1);
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut renderer = Renderer::new(Vec::new(), 4, 2);
        renderer.render(Buffer::new(4, 2)).unwrap();
        renderer.resize(6, 3);
        renderer.out.clear();
        renderer.render(Buffer::new(6, 3)).unwrap();
        assert!(renderer.out.starts_with(b"\x1b[0m\x1b[2J"));
    }
}
