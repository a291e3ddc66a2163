//! Error types for repowatch-provider.
//!
//! Every variant is a skip-and-retry condition for the affected repository:
//! classification aborts for this run, state stays untouched, and the next
//! run retries.

use thiserror::Error;

/// All errors that can arise from provider catalog calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("provider transport error: {0}")]
    Transport(#[from] Box<ureq::Error>),

    /// Non-2xx response from the provider.
    #[error("provider returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body could not be decoded as the expected payload.
    #[error("malformed provider payload: {0}")]
    Malformed(String),
}
