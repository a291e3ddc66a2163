//! In-memory collaborator fakes for engine and pipeline tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use repowatch_core::state;
use repowatch_core::types::{
    BranchName, CommitHash, RemoteBranch, RemoteRepository, RepoName, RepoSlug,
};
use repowatch_provider::{ProviderError, RepoCatalog};

use crate::dispatch::{DispatchOutcome, ScanDispatch};
use crate::mirror::{Mirror, MirrorError};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCatalog {
    repos: Vec<RemoteRepository>,
    branches: HashMap<RepoSlug, Vec<RemoteBranch>>,
    fail_branches_for: HashSet<RepoSlug>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, slug: &str) -> Self {
        self.repos.push(RemoteRepository {
            slug: RepoSlug::from(slug),
            display_name: RepoName::from(slug),
        });
        self
    }

    pub fn with_branches(mut self, slug: &str, branches: &[(&str, Option<&str>)]) -> Self {
        self.branches.insert(
            RepoSlug::from(slug),
            branches
                .iter()
                .map(|(name, head)| RemoteBranch {
                    name: BranchName::from(*name),
                    head: head.map(CommitHash::from),
                })
                .collect(),
        );
        self
    }

    pub fn failing_branches_for(mut self, slug: &str) -> Self {
        self.fail_branches_for.insert(RepoSlug::from(slug));
        self
    }
}

impl RepoCatalog for FakeCatalog {
    fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError> {
        Ok(self.repos.clone())
    }

    fn list_branches(&self, slug: &RepoSlug) -> Result<Vec<RemoteBranch>, ProviderError> {
        if self.fail_branches_for.contains(slug) {
            return Err(ProviderError::Status {
                status: 502,
                url: format!("fake://branches/{slug}"),
            });
        }
        Ok(self.branches.get(slug).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeMirror {
    existing: RefCell<HashSet<RepoSlug>>,
    diffs: HashMap<(Option<CommitHash>, CommitHash), Vec<PathBuf>>,
    clones: RefCell<Vec<String>>,
    fast_forwards: RefCell<Vec<String>>,
    fail_clone: bool,
    fail_fast_forward: bool,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing(self, slug: &str) -> Self {
        self.existing.borrow_mut().insert(RepoSlug::from(slug));
        self
    }

    pub fn with_diff(mut self, from: Option<&str>, to: &str, files: &[&str]) -> Self {
        self.diffs.insert(
            (from.map(CommitHash::from), CommitHash::from(to)),
            files.iter().map(PathBuf::from).collect(),
        );
        self
    }

    pub fn failing_clone(mut self) -> Self {
        self.fail_clone = true;
        self
    }

    pub fn failing_fast_forward(mut self) -> Self {
        self.fail_fast_forward = true;
        self
    }

    pub fn clones(&self) -> Vec<String> {
        self.clones.borrow().clone()
    }

    pub fn fast_forwards(&self) -> Vec<String> {
        self.fast_forwards.borrow().clone()
    }
}

impl Mirror for FakeMirror {
    fn exists(&self, slug: &RepoSlug) -> bool {
        self.existing.borrow().contains(slug)
    }

    fn clone_branch(&self, slug: &RepoSlug, _branch: &BranchName) -> Result<(), MirrorError> {
        if self.fail_clone {
            return Err(MirrorError::Command {
                action: "clone",
                stderr: "fake clone failure".to_string(),
            });
        }
        self.existing.borrow_mut().insert(slug.clone());
        self.clones.borrow_mut().push(slug.0.clone());
        Ok(())
    }

    fn fast_forward(&self, slug: &RepoSlug, _branch: &BranchName) -> Result<(), MirrorError> {
        if self.fail_fast_forward {
            return Err(MirrorError::Command {
                action: "fast-forward",
                stderr: "fake fast-forward failure".to_string(),
            });
        }
        self.fast_forwards.borrow_mut().push(slug.0.clone());
        Ok(())
    }

    fn diff_files(
        &self,
        _slug: &RepoSlug,
        from: Option<&CommitHash>,
        to: &CommitHash,
    ) -> Result<Vec<PathBuf>, MirrorError> {
        Ok(self
            .diffs
            .get(&(from.cloned(), to.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingDispatch {
    calls: RefCell<Vec<(RepoSlug, Vec<PathBuf>)>>,
}

impl RecordingDispatch {
    pub fn calls(&self) -> Vec<(RepoSlug, Vec<PathBuf>)> {
        self.calls.borrow().clone()
    }
}

impl ScanDispatch for RecordingDispatch {
    fn dispatch(&self, repo: &RemoteRepository, changed: &[PathBuf]) -> DispatchOutcome {
        self.calls
            .borrow_mut()
            .push((repo.slug.clone(), changed.to_vec()));
        DispatchOutcome {
            scanned: changed.len(),
            findings: 0,
        }
    }
}

/// Captures what the state store held for the repository at dispatch time,
/// to pin down the dispatch-before-persist ordering.
pub struct StoreReadingDispatch {
    home: PathBuf,
    seen: RefCell<Option<CommitHash>>,
}

impl StoreReadingDispatch {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            seen: RefCell::new(None),
        }
    }

    pub fn commit_seen_during_dispatch(&self) -> Option<CommitHash> {
        self.seen.borrow().clone()
    }
}

impl ScanDispatch for StoreReadingDispatch {
    fn dispatch(&self, repo: &RemoteRepository, changed: &[PathBuf]) -> DispatchOutcome {
        let commit = state::load_record_at(Path::new(&self.home), &repo.slug)
            .ok()
            .flatten()
            .map(|record| record.last_commit);
        *self.seen.borrow_mut() = commit;
        DispatchOutcome {
            scanned: changed.len(),
            findings: 0,
        }
    }
}
