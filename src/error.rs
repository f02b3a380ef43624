//! Error types for the card generator.

use std::path::PathBuf;
use thiserror::Error;

/// A single failed HTTP exchange.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned a malformed body")]
    Body {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} returned an empty body")]
    Empty { url: String },
}

impl FetchError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Failures that abort the run before anything is rendered.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("profile fetch failed")]
    Profile(#[source] FetchError),

    #[error("repository list fetch failed")]
    Repositories(#[source] FetchError),

    #[error("no avatar source succeeded ({})", describe_attempts(.attempts))]
    Avatar { attempts: Vec<(String, FetchError)> },
}

fn describe_attempts(attempts: &[(String, FetchError)]) -> String {
    if attempts.is_empty() {
        return "no candidates".to_string();
    }
    attempts
        .iter()
        .map(|(url, err)| format!("{url}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Top-level error returned by [`crate::run`].
#[derive(Debug, Error)]
pub enum CardError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("failed to write card to {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CardError {
    /// Process exit code for this failure. Output failures are kept
    /// distinct from everything that happens before rendering.
    pub fn exit_code(&self) -> i32 {
        match self {
            CardError::Client(_) | CardError::Acquisition(_) => 1,
            CardError::Output { .. } => 2,
        }
    }
}
