//! Loader Actor: Dedicated thread for fetching pages.
//!
//! Loads block on two HTTP requests, so they run here instead of on the
//! main loop. Requests that pile up while a load is in flight are
//! collapsed: only the newest one is served, the rest would be discarded
//! by the generation check anyway.

use super::messages::{LoadEvent, LoadRequest};
use crate::loader::PageLoader;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Loader actor serving [`LoadRequest`]s with a [`PageLoader`].
pub struct LoaderActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    request_tx: Sender<LoadRequest>,
    event_rx: Receiver<LoadEvent>,
}

impl LoaderActor {
    /// Spawn the loader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(loader: PageLoader) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (request_tx, request_rx) = unbounded();
        let (event_tx, event_rx) = bounded(4);

        let handle = thread::Builder::new()
            .name("pagelens-loader".to_string())
            .spawn(move || Self::run_loop(&loader, &request_rx, &event_tx, &shutdown_clone))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            request_tx,
            event_rx,
        })
    }

    /// Queue a load. Returns `false` if the loader thread is gone.
    pub fn request(&self, request: LoadRequest) -> bool {
        self.request_tx.send(request).is_ok()
    }

    /// Receiver of load outcomes, for use with `select!`.
    pub const fn receiver(&self) -> &Receiver<LoadEvent> {
        &self.event_rx
    }

    /// Signal the loader thread to shutdown.
    ///
    /// A load already in flight finishes first.
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

    fn run_loop(
        loader: &PageLoader,
        requests: &Receiver<LoadRequest>,
        events: &Sender<LoadEvent>,
        shutdown: &AtomicBool,
    ) {
        while !shutdown.load(Ordering::Relaxed) {
            let first = match requests.recv_timeout(POLL_INTERVAL) {
                Ok(request) => request,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            let request = newest(first, requests);

            let event = match loader.load(request.page) {
                Ok(page) => LoadEvent::Loaded {
                    generation: request.generation,
                    page: Box::new(page),
                },
                Err(e) => {
                    warn!(page = request.page, error = %e, "page load failed");
                    LoadEvent::Failed {
                        generation: request.generation,
                        page: request.page,
                        message: e.to_string(),
                    }
                }
            };

            if events.send(event).is_err() {
                debug!("load event receiver dropped");
                break;
            }
        }
    }
}

impl Drop for LoaderActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The newest of `first` and everything already queued behind it.
fn newest(first: LoadRequest, requests: &Receiver<LoadRequest>) -> LoadRequest {
    let newest = requests.try_iter().last().unwrap_or(first);
    if newest != first {
        debug!(
            skipped_from = first.generation,
            serving = newest.generation,
            "collapsed queued load requests"
        );
    }
    newest
}
