//! Error types for repowatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from state store operations.
///
/// An `Err` from the store means the store could not be consulted. Callers
/// must treat it as "unknown", never as "no prior record" — conflating the
/// two would force a spurious full scan or, worse, silently drop a diff.
#[derive(Debug, Error)]
pub enum StateError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (state record).
    #[error("state record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`StateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}

/// Errors from building the process configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHome,
}
