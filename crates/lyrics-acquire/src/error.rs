use std::path::PathBuf;
use thiserror::Error;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The song page did not have the expected container/paragraph shape.
    #[error("no lyrics found on {url}: none of {containers} div containers holds a <p>")]
    NoLyrics { url: String, containers: usize },

    #[error("invalid song marker '{marker}': {source}")]
    InvalidMarker {
        marker: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to append to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    /// Failures confined to a single album or song page.
    ///
    /// These are recorded and skipped unless the run is fail-fast;
    /// everything else aborts the run.
    pub fn is_per_item(&self) -> bool {
        matches!(self, AcquireError::Fetch(_) | AcquireError::NoLyrics { .. })
    }
}
