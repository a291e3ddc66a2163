//! Sync decision engine.
//!
//! Classification for one repository:
//! 1. `NEW` — no local mirror. Clone at the selected branch head, persist
//!    state, trigger no scan (there is no prior state to diff against).
//! 2. `UNCHANGED` — mirror exists and the remote head equals the stored
//!    commit. No mutation, no scan.
//! 3. `UPDATED` — mirror exists and the head differs from the stored commit,
//!    or a mirror exists with no record at all (empty baseline; the diff
//!    degrades to the file listing at HEAD).
//!
//! Ordering invariant: on UPDATED, state is persisted only after the mirror
//! was fast-forwarded and scan dispatch was initiated. A crash before the
//! persist leaves `last_commit` at the pre-update value, so the next run
//! recomputes the same diff — at-least-once scanning, never at-most-zero.

use std::path::{Path, PathBuf};

use repowatch_core::state;
use repowatch_core::types::{
    audit_now, BranchName, CommitHash, RemoteRepository, RepositoryRecord,
};
use repowatch_provider::RepoCatalog;

use crate::dispatch::{DispatchOutcome, ScanDispatch};
use crate::error::SyncError;
use crate::mirror::Mirror;
use crate::selection::select_branch;

/// Outcome of syncing a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fresh clone; state persisted, zero scans dispatched.
    New { branch: BranchName, head: CommitHash },
    /// Remote head equals the stored commit; nothing happened.
    Unchanged,
    /// Mirror fast-forwarded, changed set scanned, state advanced.
    Updated {
        branch: BranchName,
        head: CommitHash,
        changed: Vec<PathBuf>,
        dispatched: DispatchOutcome,
    },
}

/// Sync one repository end to end.
///
/// Any `Err` means the repository is skipped for this run with state
/// untouched; the orchestrator records the skip and continues the batch.
pub fn sync_repository(
    home: &Path,
    catalog: &dyn RepoCatalog,
    mirror: &dyn Mirror,
    dispatch: &dyn ScanDispatch,
    repo: &RemoteRepository,
) -> Result<SyncOutcome, SyncError> {
    let branches = catalog.list_branches(&repo.slug)?;
    let Some(selected) = select_branch(&branches) else {
        return Err(SyncError::NoBranches {
            slug: repo.slug.clone(),
        });
    };
    let Some(head) = selected.head.clone() else {
        return Err(SyncError::MissingHead {
            slug: repo.slug.clone(),
            branch: selected.name.clone(),
        });
    };

    if !mirror.exists(&repo.slug) {
        mirror.clone_branch(&repo.slug, &selected.name)?;
        state::save_record_at(home, &record_for(repo, &selected.name, &head))?;
        tracing::info!("new repository '{}' cloned at {}", repo.slug, head.short());
        return Ok(SyncOutcome::New {
            branch: selected.name.clone(),
            head,
        });
    }

    // A store failure aborts this repository only. It must never be read as
    // "no prior record" — that would rescan from scratch or skip the diff.
    let prior = state::load_record_at(home, &repo.slug)?;
    let prior_commit = prior.map(|record| record.last_commit);

    if prior_commit.as_ref() == Some(&head) {
        tracing::debug!("'{}' unchanged at {}", repo.slug, head.short());
        return Ok(SyncOutcome::Unchanged);
    }

    mirror.fast_forward(&repo.slug, &selected.name)?;
    let changed = mirror.diff_files(&repo.slug, prior_commit.as_ref(), &head)?;
    tracing::info!(
        "'{}' updated {} -> {}: {} changed file(s)",
        repo.slug,
        prior_commit
            .as_ref()
            .map(|c| c.short().to_string())
            .unwrap_or_else(|| "(none)".to_string()),
        head.short(),
        changed.len()
    );

    // Dispatch before persisting; see the module-level ordering invariant.
    let dispatched = dispatch.dispatch(repo, &changed);

    state::save_record_at(home, &record_for(repo, &selected.name, &head))?;
    Ok(SyncOutcome::Updated {
        branch: selected.name.clone(),
        head,
        changed,
        dispatched,
    })
}

fn record_for(repo: &RemoteRepository, branch: &BranchName, head: &CommitHash) -> RepositoryRecord {
    RepositoryRecord {
        slug: repo.slug.clone(),
        display_name: repo.display_name.clone(),
        branch: branch.clone(),
        last_commit: head.clone(),
        observed_at: audit_now(),
    }
}
