//! Scan dispatcher — per-file scan and escalation cycle.
//!
//! For each changed file: scan; on a non-empty (verified) report, write the
//! result artifact, alert the chat channel with the artifact attached, and
//! open a ticket keyed by the repository's project-key mapping. One cycle
//! per file; findings are not deduplicated across files.
//!
//! Nothing in here is fatal to a run. Collaborator failures are logged and
//! the cycle continues — by the time an alert can fail, the scan has already
//! happened, and state persistence upstream must not be blocked.

use std::path::{Path, PathBuf};

use repowatch_core::types::RemoteRepository;
use repowatch_sync::dispatch::{DispatchOutcome, ScanDispatch};

use crate::error::{io_err, DispatchError};
use crate::mapping::ProjectKeyMap;
use crate::notify::Notifier;
use crate::scanner::SecretScanner;
use crate::ticket::{IssueKey, Ticketing};

/// Non-credential context the escalation messages need.
#[derive(Debug, Clone)]
pub struct EscalationContext {
    /// Root directory the repository mirrors live under.
    pub mirror_root: PathBuf,
    /// Directory scan result artifacts are written to.
    pub results_dir: PathBuf,
    /// Provider workspace, for the repository browse URL in tickets.
    pub workspace: String,
    /// Ticketing base URL, for browse links in chat announcements.
    pub ticket_browse_base: String,
}

/// Routes changed files through the scanner and escalation collaborators.
pub struct Dispatcher {
    scanner: Box<dyn SecretScanner>,
    notifier: Box<dyn Notifier>,
    ticketing: Box<dyn Ticketing>,
    mapping: ProjectKeyMap,
    context: EscalationContext,
}

/// Outcome of a full-mirror sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub scanned_dirs: usize,
    pub with_findings: usize,
}

impl Dispatcher {
    pub fn new(
        scanner: Box<dyn SecretScanner>,
        notifier: Box<dyn Notifier>,
        ticketing: Box<dyn Ticketing>,
        mapping: ProjectKeyMap,
        context: EscalationContext,
    ) -> Self {
        Self {
            scanner,
            notifier,
            ticketing,
            mapping,
            context,
        }
    }

    /// Scan every mirror directory wholesale and report per directory:
    /// an upload for non-empty results, a "no results" message otherwise.
    pub fn sweep(&self) -> Result<SweepSummary, DispatchError> {
        let root = &self.context.mirror_root;
        let entries = std::fs::read_dir(root).map_err(|e| io_err(root, e))?;
        let mut summary = SweepSummary::default();

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        for dir in dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::info!("sweeping {name}");
            summary.scanned_dirs += 1;

            let report = match self.scanner.scan(&dir) {
                Ok(report) => report,
                Err(err) => {
                    tracing::warn!("sweep scan failed for {name}: {err}");
                    continue;
                }
            };
            if report.is_clean() {
                self.try_message(&format!("No results found for {name}."));
                continue;
            }
            summary.with_findings += 1;
            let cleaned = clean_report(&report.text, &self.context.mirror_root);
            if let Some(artifact) = self.write_artifact(&name, &cleaned) {
                self.try_file(&artifact, &name);
            }
        }
        Ok(summary)
    }

    fn escalate(&self, repo: &RemoteRepository, file: &Path, report: &str) {
        tracing::warn!(
            "verified finding in '{}' ({})",
            repo.display_name,
            file.display()
        );

        let alert = format!(
            ":warning: *Potential secrets* found in repository `{}` (`{}`).\nPlease review the attached results.",
            repo.display_name,
            file.display()
        );
        self.try_message(&alert);

        if let Some(artifact) = self.write_artifact(&repo.slug.0, report) {
            self.try_file(&artifact, &repo.display_name.0);
        }

        let Some(project_key) = self.mapping.project_key_for(&repo.display_name) else {
            tracing::warn!(
                "no project key mapping for '{}'; skipping ticket creation",
                repo.display_name
            );
            return;
        };

        let summary = format!("Potential secrets found in {}", repo.display_name);
        let description = self.finding_description(repo, report);
        let labels = ["automation_scripts", "security_alert"];
        match self
            .ticketing
            .create_issue(&summary, &description, project_key, "Bug", &labels)
        {
            Ok(key) => self.announce_ticket(repo, &key),
            Err(err) => tracing::warn!(
                "ticket creation failed for '{}': {err}",
                repo.display_name
            ),
        }
    }

    fn announce_ticket(&self, repo: &RemoteRepository, key: &IssueKey) {
        // Read the issue back before announcing; a create that did not land
        // should not produce a dead link in the channel.
        match self.ticketing.get_issue(key) {
            Ok(Some(_)) => {
                let url = format!("{}/browse/{}", self.context.ticket_browse_base, key);
                self.try_message(&format!(
                    ":jira: *Ticket created*: <{url}|{key}> for repository `{}`.",
                    repo.display_name
                ));
            }
            Ok(None) => tracing::warn!("created issue {key} could not be read back"),
            Err(err) => tracing::warn!("issue lookup failed for {key}: {err}"),
        }
    }

    fn finding_description(&self, repo: &RemoteRepository, report: &str) -> String {
        let browse_url = format!(
            "https://bitbucket.org/{}/{}",
            self.context.workspace, repo.slug
        );
        format!(
            "*Issue Summary:*\n\
             We have detected potential secret(s) in your repository. These may include API keys, passwords, or other credentials that pose a security risk if exposed.\n\
             *Project Name:*\n\
             {name}\n\
             *Bitbucket URL:*\n\
             {browse_url}\n\
             *Results:*\n\
             ```\n\
             {report}\n\
             ```\n\
             *Potential Risks:*\n\
             Exposed secrets can be used for unauthorized access to systems, accounts, or services, leading to data breaches or system compromise.\n\
             *Recommended Actions:*\n\
             - Review the identified files to confirm the presence of secrets.\n\
             - Remove the hardcoded credentials from the repository.\n\
             - Revoke the exposed keys immediately.\n\
             - Move secrets into a managed secret store.",
            name = repo.display_name,
        )
    }

    fn write_artifact(&self, name: &str, report: &str) -> Option<PathBuf> {
        let dir = &self.context.results_dir;
        if let Err(err) = std::fs::create_dir_all(dir) {
            tracing::warn!("cannot create results dir {}: {err}", dir.display());
            return None;
        }
        let path = dir.join(format!("{name}_results.txt"));
        match std::fs::write(&path, report) {
            Ok(()) => Some(path),
            Err(err) => {
                tracing::warn!("cannot write artifact {}: {err}", path.display());
                None
            }
        }
    }

    fn try_message(&self, text: &str) {
        if let Err(err) = self.notifier.send_message(text) {
            tracing::warn!("alert delivery failed: {err}");
        }
    }

    fn try_file(&self, path: &Path, context: &str) {
        if let Err(err) = self.notifier.send_file(path, context) {
            tracing::warn!("file delivery failed: {err}");
        }
    }
}

impl ScanDispatch for Dispatcher {
    fn dispatch(&self, repo: &RemoteRepository, changed: &[PathBuf]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let repo_dir = self.context.mirror_root.join(&repo.slug.0);

        for file in changed {
            let absolute = repo_dir.join(file);
            // Diffs include deleted paths; only regular files can be scanned.
            if !absolute.is_file() {
                continue;
            }
            let report = match self.scanner.scan(&absolute) {
                Ok(report) => report,
                Err(err) => {
                    tracing::warn!("scan failed for {}: {err}", absolute.display());
                    continue;
                }
            };
            outcome.scanned += 1;
            if report.is_clean() {
                continue;
            }
            outcome.findings += 1;
            let cleaned = clean_report(&report.text, &self.context.mirror_root);
            self.escalate(repo, file, &cleaned);
        }
        outcome
    }
}

/// Strip the local mirror-root prefix from scanner output so reports read in
/// repository-relative terms.
fn clean_report(report: &str, mirror_root: &Path) -> String {
    let prefix = format!("{}/", mirror_root.display());
    report.replace(&prefix, "")
}
