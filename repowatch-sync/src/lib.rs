//! # repowatch-sync
//!
//! Incremental synchronization and change detection.
//!
//! For each repository in the catalog, [`engine::sync_repository`] decides
//! NEW / UNCHANGED / UPDATED against the durable state store, drives the
//! [`Mirror`] operator, and hands the changed-file set to a [`ScanDispatch`]
//! collaborator. [`pipeline::run`] iterates the whole catalog with
//! per-repository failure containment.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod mirror;
pub mod pipeline;
pub mod selection;

#[cfg(test)]
mod fakes;

pub use dispatch::{DispatchOutcome, ScanDispatch};
pub use engine::{sync_repository, SyncOutcome};
pub use error::SyncError;
pub use mirror::{GitMirror, Mirror, MirrorError};
