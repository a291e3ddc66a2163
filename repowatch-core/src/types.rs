//! Domain types for repowatch.
//!
//! Identities are strongly typed: a repository slug (the immutable primary
//! key), its human-facing display name, a branch name, and a commit hash are
//! four different things and never interchange silently.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Provider-assigned repository slug — the immutable primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoSlug(pub String);

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoSlug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoSlug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Human-facing repository display name (may contain spaces and casing the
/// slug does not).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoName(pub String);

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A git branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchName(pub String);

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A git commit hash as reported by the provider or the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitHash(pub String);

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommitHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommitHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl CommitHash {
    /// Abbreviated hash for display (first 12 characters).
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

// ---------------------------------------------------------------------------
// Durable record
// ---------------------------------------------------------------------------

/// One durable record per tracked repository.
///
/// `last_commit` always names the commit the local mirror was synchronized to
/// at the end of the most recent successful run. It is replaced wholesale on
/// every UPDATED classification and never advanced past an unscanned diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub slug: RepoSlug,
    pub display_name: RepoName,
    pub branch: BranchName,
    pub last_commit: CommitHash,
    /// Audit-only write timestamp in the fixed audit time zone. Never used
    /// for decision logic.
    pub observed_at: DateTime<FixedOffset>,
}

// ---------------------------------------------------------------------------
// Ephemeral provider inputs
// ---------------------------------------------------------------------------

/// A repository as listed by the hosting provider. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub slug: RepoSlug,
    pub display_name: RepoName,
}

/// A remote branch head as reported by the provider's branch listing.
///
/// `head` is `None` when the provider returned the branch without a
/// resolvable target commit; selecting such a branch fail-skips the
/// repository for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub name: BranchName,
    pub head: Option<CommitHash>,
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// A repository skipped during a run, with the reason it was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRepo {
    pub name: RepoName,
    pub reason: String,
}

/// Aggregated outcome of one full run over the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub new_repos: Vec<RepoName>,
    pub updated_repos: Vec<RepoName>,
    pub skipped: Vec<SkippedRepo>,
}

impl RunSummary {
    /// Compact one-line form used in chat announcements and logs.
    pub fn headline(&self) -> String {
        format!(
            "{} repositories: {} new, {} updated, {} skipped",
            self.total,
            self.new_repos.len(),
            self.updated_repos.len(),
            self.skipped.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Audit clock
// ---------------------------------------------------------------------------

/// Fixed audit time zone offset: IST, UTC+05:30.
const AUDIT_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Current time in the fixed audit time zone.
///
/// Recorded on every state write; audit-only, never compared for decisions.
pub fn audit_now() -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(AUDIT_OFFSET_SECS) {
        Some(tz) => Utc::now().with_timezone(&tz),
        None => Utc::now().fixed_offset(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
