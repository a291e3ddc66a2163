//! Mirror operator — local working copies of remote repositories.
//!
//! The core owns only the decision of *when* to clone, fast-forward, or diff;
//! the mechanics are behind the [`Mirror`] trait. [`GitMirror`] is the real
//! implementation, shelling out to `git` with captured output.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use repowatch_core::config::ProviderConfig;
use repowatch_core::types::{BranchName, CommitHash, RepoSlug};

/// All errors that can arise from mirror operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The `git` binary could not be spawned.
    #[error("failed to run git: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// A git command exited non-zero.
    #[error("git {action} failed: {stderr}")]
    Command { action: &'static str, stderr: String },
}

/// Opaque version-control operations on the local mirror of one repository.
pub trait Mirror {
    /// Whether a local mirror directory exists for the repository.
    fn exists(&self, slug: &RepoSlug) -> bool;

    /// Clone the repository at the head of `branch`.
    fn clone_branch(&self, slug: &RepoSlug, branch: &BranchName) -> Result<(), MirrorError>;

    /// Fast-forward the existing mirror to the remote head of `branch`.
    fn fast_forward(&self, slug: &RepoSlug, branch: &BranchName) -> Result<(), MirrorError>;

    /// File paths that differ between `from` and `to`, repository-relative,
    /// in git's output order.
    ///
    /// With `from = None` there is no baseline to diff against; the result
    /// degrades to the full file listing at HEAD.
    fn diff_files(
        &self,
        slug: &RepoSlug,
        from: Option<&CommitHash>,
        to: &CommitHash,
    ) -> Result<Vec<PathBuf>, MirrorError>;
}

/// Mirror operator backed by the `git` CLI.
///
/// Clone URLs embed the provider app password; stderr from failed commands is
/// scrubbed of the remote base before it reaches error messages or logs.
pub struct GitMirror {
    root: PathBuf,
    clone_base: String,
}

impl GitMirror {
    /// Mirror rooted at `root`, cloning from the configured provider
    /// workspace over HTTPS with embedded credentials.
    pub fn new(root: PathBuf, provider: &ProviderConfig) -> Self {
        let clone_base = format!(
            "https://{}:{}@bitbucket.org/{}",
            provider.username, provider.app_password, provider.workspace
        );
        Self { root, clone_base }
    }

    /// Mirror cloning from an arbitrary base (tests use a local directory of
    /// bare repositories).
    pub fn with_clone_base(root: PathBuf, clone_base: String) -> Self {
        Self { root, clone_base }
    }

    /// `<root>/<slug>` — the mirror directory for one repository.
    pub fn mirror_path(&self, slug: &RepoSlug) -> PathBuf {
        self.root.join(&slug.0)
    }

    fn remote_url(&self, slug: &RepoSlug) -> String {
        format!("{}/{}.git", self.clone_base, slug)
    }

    fn run_git(&self, action: &'static str, args: &[&str]) -> Result<String, MirrorError> {
        let output = Command::new("git")
            .args(args)
            .output()
            .map_err(|source| MirrorError::Spawn { source })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr)
                .replace(&self.clone_base, "<remote>")
                .trim()
                .to_string();
            return Err(MirrorError::Command { action, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Mirror for GitMirror {
    fn exists(&self, slug: &RepoSlug) -> bool {
        self.mirror_path(slug).exists()
    }

    fn clone_branch(&self, slug: &RepoSlug, branch: &BranchName) -> Result<(), MirrorError> {
        let path = self.mirror_path(slug);
        let url = self.remote_url(slug);
        tracing::info!("cloning '{}' at branch '{}'", slug, branch);
        self.run_git(
            "clone",
            &[
                "clone",
                "--branch",
                &branch.0,
                &url,
                &path.to_string_lossy(),
            ],
        )?;
        Ok(())
    }

    fn fast_forward(&self, slug: &RepoSlug, branch: &BranchName) -> Result<(), MirrorError> {
        let path = self.mirror_path(slug);
        let path_arg = path.to_string_lossy().into_owned();
        tracing::info!("fast-forwarding '{}' on branch '{}'", slug, branch);
        // Fetch then check out before merging: branch selection can move to a
        // different branch between runs, and the merge must land on the branch
        // the record will name, not whatever the mirror last had checked out.
        self.run_git("fetch", &["-C", &path_arg, "fetch", "origin", &branch.0])?;
        self.run_git("checkout", &["-C", &path_arg, "checkout", &branch.0])?;
        self.run_git(
            "fast-forward",
            &[
                "-C",
                &path_arg,
                "merge",
                "--ff-only",
                &format!("origin/{}", branch),
            ],
        )?;
        Ok(())
    }

    fn diff_files(
        &self,
        slug: &RepoSlug,
        from: Option<&CommitHash>,
        to: &CommitHash,
    ) -> Result<Vec<PathBuf>, MirrorError> {
        let path = self.mirror_path(slug);
        let path_arg = path.to_string_lossy().into_owned();
        let stdout = match from {
            Some(from) => {
                let range = format!("{from}..{to}");
                self.run_git(
                    "diff",
                    &["-C", &path_arg, "diff", "--name-only", &range],
                )?
            }
            // No baseline commit: fall back to the full file listing at HEAD.
            None => self.run_git("ls-files", &["-C", &path_arg, "ls-files"])?,
        };
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

/// Run a git command in `dir`, for test fixtures.
#[cfg(test)]
pub(crate) fn run_git_in(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Creates an origin repository named `<slug>.git` under `origins` with
    /// one committed file, returning the head commit hash.
    fn make_origin(origins: &Path, slug: &str) -> (PathBuf, CommitHash) {
        let repo = origins.join(format!("{slug}.git"));
        fs::create_dir_all(&repo).expect("mkdir origin");
        run_git_in(&repo, &["init", "-b", "master"]);
        run_git_in(&repo, &["config", "user.name", "test"]);
        run_git_in(&repo, &["config", "user.email", "test@example.com"]);
        // Allow pushes/fetches against a checked-out branch in tests.
        run_git_in(&repo, &["config", "receive.denyCurrentBranch", "ignore"]);
        fs::write(repo.join("README.md"), "hello\n").expect("write");
        run_git_in(&repo, &["add", "."]);
        run_git_in(&repo, &["commit", "-m", "initial"]);
        let head = head_of(&repo);
        (repo, head)
    }

    fn head_of(repo: &Path) -> CommitHash {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(repo)
            .output()
            .expect("rev-parse");
        CommitHash::from(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn mirror_over(origins: &Path, root: &Path) -> GitMirror {
        GitMirror::with_clone_base(
            root.to_path_buf(),
            origins.to_string_lossy().into_owned(),
        )
    }

    #[test]
    fn clone_then_exists() {
        let origins = TempDir::new().expect("origins");
        let root = TempDir::new().expect("root");
        let (_repo, _head) = make_origin(origins.path(), "api");

        let mirror = mirror_over(origins.path(), root.path());
        let slug = RepoSlug::from("api");
        assert!(!mirror.exists(&slug));
        mirror
            .clone_branch(&slug, &BranchName::from("master"))
            .expect("clone");
        assert!(mirror.exists(&slug));
        assert!(mirror.mirror_path(&slug).join("README.md").exists());
    }

    #[test]
    fn fast_forward_and_diff_between_commits() {
        let origins = TempDir::new().expect("origins");
        let root = TempDir::new().expect("root");
        let (origin, first) = make_origin(origins.path(), "api");

        let mirror = mirror_over(origins.path(), root.path());
        let slug = RepoSlug::from("api");
        mirror
            .clone_branch(&slug, &BranchName::from("master"))
            .expect("clone");

        fs::write(origin.join("config.yaml"), "secret: nope\n").expect("write");
        run_git_in(&origin, &["add", "."]);
        run_git_in(&origin, &["commit", "-m", "add config"]);
        let second = head_of(&origin);

        mirror
            .fast_forward(&slug, &BranchName::from("master"))
            .expect("fast-forward");

        let changed = mirror
            .diff_files(&slug, Some(&first), &second)
            .expect("diff");
        assert_eq!(changed, vec![PathBuf::from("config.yaml")]);
    }

    fn current_branch(repo: &Path) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(repo)
            .output()
            .expect("rev-parse");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    #[test]
    fn fast_forward_follows_a_branch_switch() {
        let origins = TempDir::new().expect("origins");
        let root = TempDir::new().expect("root");
        let (origin, _first) = make_origin(origins.path(), "api");

        let mirror = mirror_over(origins.path(), root.path());
        let slug = RepoSlug::from("api");
        mirror
            .clone_branch(&slug, &BranchName::from("master"))
            .expect("clone");

        // The remote moves to 'main' and drops 'master'; the next run selects
        // 'main' and the mirror's checkout must follow.
        run_git_in(&origin, &["checkout", "-b", "main"]);
        fs::write(origin.join("renamed.txt"), "moved\n").expect("write");
        run_git_in(&origin, &["add", "."]);
        run_git_in(&origin, &["commit", "-m", "on main"]);
        run_git_in(&origin, &["branch", "-D", "master"]);

        mirror
            .fast_forward(&slug, &BranchName::from("main"))
            .expect("fast-forward onto the newly selected branch");

        let mirror_dir = mirror.mirror_path(&slug);
        assert_eq!(current_branch(&mirror_dir), "main");
        assert!(mirror_dir.join("renamed.txt").exists());
    }

    #[test]
    fn diff_without_baseline_lists_all_files_at_head() {
        let origins = TempDir::new().expect("origins");
        let root = TempDir::new().expect("root");
        let (_origin, head) = make_origin(origins.path(), "api");

        let mirror = mirror_over(origins.path(), root.path());
        let slug = RepoSlug::from("api");
        mirror
            .clone_branch(&slug, &BranchName::from("master"))
            .expect("clone");

        let files = mirror.diff_files(&slug, None, &head).expect("ls");
        assert_eq!(files, vec![PathBuf::from("README.md")]);
    }

    #[test]
    fn clone_failure_scrubs_remote_base_from_error() {
        let origins = TempDir::new().expect("origins");
        let root = TempDir::new().expect("root");
        let mirror = mirror_over(origins.path(), root.path());

        let err = mirror
            .clone_branch(&RepoSlug::from("missing"), &BranchName::from("master"))
            .expect_err("clone of missing origin should fail");
        let message = err.to_string();
        assert!(
            !message.contains(&origins.path().to_string_lossy().into_owned()),
            "error message must not leak the remote base: {message}"
        );
    }
}
