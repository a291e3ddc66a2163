//! # repowatch-provider
//!
//! Hosting-provider catalog access: the paginated repository listing and the
//! per-repository branch listing the sync engine consumes.
//!
//! [`RepoCatalog`] is the seam the engine depends on; [`ProviderClient`] is
//! the blocking HTTP implementation. Payload decoding lives in [`wire`] as
//! pure functions so malformed-payload handling is testable without a server.

pub mod client;
pub mod error;
pub mod wire;

pub use client::ProviderClient;
pub use error::ProviderError;

use repowatch_core::types::{RemoteBranch, RemoteRepository, RepoSlug};

/// Read access to the hosting provider's repository catalog.
pub trait RepoCatalog {
    /// Full repository listing for the configured workspace, following
    /// `next`-cursor pagination to exhaustion.
    fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError>;

    /// Branch heads for one repository, in provider order.
    fn list_branches(&self, slug: &RepoSlug) -> Result<Vec<RemoteBranch>, ProviderError>;
}
