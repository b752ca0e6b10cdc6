//! Command-line and environment configuration.
//!
//! Every option can also come from a `PAGELENS_*` environment variable.

use crate::actor::EngineConfig;
use crate::loader::{PageFormat, PageNaming, DEFAULT_PAGE_WIDTH};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default log file; the terminal itself is owned by the viewer.
pub const DEFAULT_LOG_FILE: &str = "pagelens.log";

/// View and edit layout-analysis boxes over rendered document pages.
#[derive(Debug, Clone, Parser)]
#[command(name = "pagelens", version, about)]
pub struct Args {
    /// Backend serving page images and layout JSON.
    #[arg(long, env = "PAGELENS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Document prefix; page N is fetched as `{prefix}-{N padded}`.
    #[arg(long, env = "PAGELENS_PREFIX")]
    pub prefix: String,

    /// Page to open first.
    #[arg(long, env = "PAGELENS_PAGE", default_value_t = 0)]
    pub page: u32,

    /// Zero-pad width of page numbers in file names.
    #[arg(long, env = "PAGELENS_PAGE_WIDTH", default_value_t = DEFAULT_PAGE_WIDTH)]
    pub page_width: usize,

    /// HTTP timeout in seconds. No timeout when unset.
    #[arg(long, env = "PAGELENS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Where to write logs (filter with `RUST_LOG`).
    #[arg(long, env = "PAGELENS_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Do not capture the mouse (view only).
    #[arg(long)]
    pub no_mouse: bool,
}

/// Everything the viewer needs besides the terminal.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Resource naming.
    pub naming: PageNaming,
    /// First page shown.
    pub initial_page: u32,
    /// HTTP timeout.
    pub timeout: Option<Duration>,
    /// Log destination.
    pub log_file: PathBuf,
}

impl Args {
    /// Split into viewer and terminal settings.
    pub fn into_configs(self) -> (ViewerConfig, EngineConfig) {
        let engine = EngineConfig {
            enable_mouse: !self.no_mouse,
            ..EngineConfig::default()
        };
        let viewer = ViewerConfig {
            base_url: self.base_url,
            naming: PageNaming::new(self.prefix, PageFormat::ZeroPadded(self.page_width)),
            initial_page: self.page,
            timeout: self.timeout_secs.map(Duration::from_secs),
            log_file: self.log_file,
        };
        (viewer, engine)
    }
}
