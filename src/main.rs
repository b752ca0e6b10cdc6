//! Pagelens binary: wires the terminal, the loader and the app together.

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::select;
use pagelens::{App, Args, Engine, HttpPageSource, InputEvent, LoaderActor, PageLoader, ViewerConfig};
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(config: &ViewerConfig) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagelens=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let (viewer, engine_config) = Args::parse().into_configs();
    init_logging(&viewer)?;
    info!(base_url = %viewer.base_url, prefix = viewer.naming.prefix(), "starting");

    let source = HttpPageSource::new(&viewer.base_url, viewer.timeout).context("configuring backend client")?;
    let loader = LoaderActor::spawn(PageLoader::new(Arc::new(source), viewer.naming.clone()))
        .context("starting loader thread")?;

    let mut engine = Engine::with_config(engine_config).context("setting up terminal")?;
    let mut app = App::new(viewer.naming, viewer.initial_page, engine.width(), engine.height());
    let input_events = engine.input_receiver().clone();
    let load_events = loader.receiver().clone();

    while app.is_running() {
        if let Some(request) = app.take_request() {
            if !loader.request(request) {
                anyhow::bail!("loader thread stopped");
            }
        }
        if let Some(frame) = app.frame() {
            engine.present(frame);
        }

        select! {
            recv(input_events) -> event => {
                let Ok(event) = event else { break };
                if let InputEvent::Resize { width, height } = event {
                    engine.handle_resize(width, height);
                }
                app.handle_input(&event);
            }
            recv(load_events) -> event => {
                let Ok(event) = event else { break };
                app.handle_load_event(event);
            }
        }
    }

    info!(frames = engine.frame_count(), "exiting");
    drop(engine);
    // A fetch in flight has no timeout by default; do not wait for it.
    loader.shutdown();
    Ok(())
}
