//! Error types for repowatch-dispatch.

use std::path::PathBuf;

use thiserror::Error;

/// All errors from scanner invocation and escalation collaborators.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scanner binary could not be spawned.
    #[error("failed to run scanner: {source}")]
    ScannerSpawn {
        #[source]
        source: std::io::Error,
    },

    /// The scanner exited non-zero.
    #[error("scanner exited with failure: {stderr}")]
    ScannerFailed { stderr: String },

    /// Transport-level HTTP failure.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Non-2xx response from a collaborator API.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// The collaborator accepted the call but rejected the request.
    #[error("{endpoint} rejected the request: {detail}")]
    Api { endpoint: &'static str, detail: String },

    /// JSON encode/decode failure on a collaborator payload.
    #[error("collaborator JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`DispatchError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DispatchError {
    DispatchError::Io {
        path: path.into(),
        source,
    }
}
