//! Run orchestrator — sequential iteration over the repository catalog.
//!
//! One repository's failure never aborts the batch: errors are logged,
//! recorded in the summary, and the repository is retried on the next run
//! because its state was not advanced. The only fatal conditions are state
//! store initialization failure and failure to fetch the catalog itself.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use repowatch_core::error::StateError;
use repowatch_core::state;
use repowatch_core::types::{audit_now, RemoteRepository, RepoName, RunSummary, SkippedRepo};
use repowatch_provider::RepoCatalog;

use crate::dispatch::ScanDispatch;
use crate::engine::{sync_repository, SyncOutcome};
use crate::error::SyncError;
use crate::mirror::Mirror;

/// Audit document written once per run: what the catalog contained and when.
#[derive(Debug, Serialize)]
pub struct RunInfo {
    pub total_repositories: usize,
    pub timestamp: DateTime<FixedOffset>,
    pub repositories: Vec<RepoName>,
}

/// Run the full sync batch over every repository in the catalog.
pub fn run(
    home: &Path,
    catalog: &dyn RepoCatalog,
    mirror: &dyn Mirror,
    dispatch: &dyn ScanDispatch,
) -> Result<RunSummary, SyncError> {
    // Fatal before any repository is processed: a store that cannot even be
    // initialized would turn every repository into a false NEW.
    state::init_at(home)?;

    let repos = catalog.list_repositories()?;
    tracing::info!("catalog returned {} repositories", repos.len());

    // Audit-only; a write failure here must not cost us the run.
    if let Err(err) = save_run_info(home, &repos) {
        tracing::warn!("failed to write run info: {err}");
    }

    let mut summary = RunSummary {
        total: repos.len(),
        ..RunSummary::default()
    };

    for repo in &repos {
        match sync_repository(home, catalog, mirror, dispatch, repo) {
            Ok(SyncOutcome::New { .. }) => summary.new_repos.push(repo.display_name.clone()),
            Ok(SyncOutcome::Updated { .. }) => {
                summary.updated_repos.push(repo.display_name.clone())
            }
            Ok(SyncOutcome::Unchanged) => {}
            Err(err) => {
                tracing::warn!("skipping '{}' this run: {err}", repo.slug);
                summary.skipped.push(SkippedRepo {
                    name: repo.display_name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!("{}", summary.headline());
    Ok(summary)
}

/// `<home>/.repowatch/run_info.json` — pure, no I/O.
pub fn run_info_path_at(home: &Path) -> std::path::PathBuf {
    home.join(".repowatch").join("run_info.json")
}

fn save_run_info(home: &Path, repos: &[RemoteRepository]) -> Result<(), StateError> {
    let info = RunInfo {
        total_repositories: repos.len(),
        timestamp: audit_now(),
        repositories: repos.iter().map(|r| r.display_name.clone()).collect(),
    };
    let path = run_info_path_at(home);
    let io = |path: &Path, source: std::io::Error| StateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let Some(dir) = path.parent() else {
        return Err(io(&path, std::io::Error::other("invalid run info path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io(dir, e))?;
    let json = serde_json::to_string_pretty(&info)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io(&path, e))?;
    Ok(())
}
