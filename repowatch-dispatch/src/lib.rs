//! # repowatch-dispatch
//!
//! Scan dispatch: runs the secret scanner over changed files and escalates
//! verified findings to the chat and ticketing collaborators.
//!
//! [`Dispatcher`] implements the `ScanDispatch` seam from `repowatch-sync`.
//! Every collaborator failure in here is logged and contained — a lost alert
//! never blocks state persistence in the engine.

pub mod adf;
pub mod dispatcher;
pub mod error;
pub mod mapping;
pub mod notify;
pub mod scanner;
pub mod ticket;

pub use dispatcher::{Dispatcher, EscalationContext, SweepSummary};
pub use error::DispatchError;
pub use mapping::ProjectKeyMap;
pub use notify::{Notifier, Slack};
pub use scanner::{ScanReport, SecretScanner, TruffleHog};
pub use ticket::{IssueDetails, IssueKey, Jira, Ticketing};
