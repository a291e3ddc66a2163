//! Error types for repowatch-sync.

use thiserror::Error;

use repowatch_core::error::StateError;
use repowatch_core::types::{BranchName, RepoSlug};
use repowatch_provider::ProviderError;

use crate::mirror::MirrorError;

/// All errors that can abort processing of a single repository.
///
/// Every variant is contained at per-repository granularity: the run
/// orchestrator records the skip and moves on to the next repository. State
/// is never mutated on the error path, so the next run retries the same
/// transition.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The state store could not be consulted or written.
    #[error("state store error: {0}")]
    State(#[from] StateError),

    /// The provider catalog call failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A mirror (version control) operation failed.
    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),

    /// The provider returned no branches for the repository.
    #[error("no branches returned for repository '{slug}'")]
    NoBranches { slug: RepoSlug },

    /// The selected branch carries no resolvable head commit.
    #[error("no head commit for branch '{branch}' of repository '{slug}'")]
    MissingHead { slug: RepoSlug, branch: BranchName },
}
