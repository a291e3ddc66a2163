//! Deterministic branch selection.
//!
//! Prefer `master`; else `main`; else the first branch in provider order.
//! Applied identically on fresh clones and on updates, so a repository never
//! flips branches between runs unless the remote branch set itself changed.

use repowatch_core::types::RemoteBranch;

/// Select the branch to track, or `None` when the list is empty.
///
/// Branch lists are small (tens, not thousands); a linear scan is fine.
pub fn select_branch(branches: &[RemoteBranch]) -> Option<&RemoteBranch> {
    branches
        .iter()
        .find(|b| b.name.0 == "master")
        .or_else(|| branches.iter().find(|b| b.name.0 == "main"))
        .or_else(|| branches.first())
}
