//! Load failures.

use thiserror::Error;

/// Why a page could not be loaded.
///
/// The `Display` text is what the viewer shows in place of the page.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend URL could not be built.
    #[error("invalid backend URL {url}: {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The layout JSON did not match the expected shape.
    #[error("invalid layout document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The page raster could not be decoded.
    #[error("invalid page image: {0}")]
    Image(#[from] image::ImageError),

    /// A fetch thread died or the loader went away.
    #[error("page loader failed: {0}")]
    Worker(String),
}

impl LoadError {
    /// HTTP status of a failed request, if the backend answered at all.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
