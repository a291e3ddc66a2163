//! Scan dispatch seam consumed by the decision engine.
//!
//! Dispatch is fire-and-observe from the engine's perspective: collaborator
//! failures (scanner, chat, ticketing) are the dispatcher's to log, and must
//! never block state persistence — scanning has already happened by the time
//! they can fail.

use std::path::PathBuf;

use repowatch_core::types::RemoteRepository;

/// Counters reported back from one dispatch over a changed-file set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Files actually handed to the scanner.
    pub scanned: usize,
    /// Files whose scan produced a non-empty (verified) report.
    pub findings: usize,
}

/// Routes a changed-file set to the secret scanner and escalation channels.
pub trait ScanDispatch {
    /// Dispatch scans for `changed` (repository-relative paths) of `repo`.
    ///
    /// Infallible by contract: implementations log their own collaborator
    /// failures and report what they managed to do.
    fn dispatch(&self, repo: &RemoteRepository, changed: &[PathBuf]) -> DispatchOutcome;
}

/// Dispatcher that does nothing; for runs where scanning is disabled.
pub struct NullDispatch;

impl ScanDispatch for NullDispatch {
    fn dispatch(&self, _repo: &RemoteRepository, _changed: &[PathBuf]) -> DispatchOutcome {
        DispatchOutcome::default()
    }
}
