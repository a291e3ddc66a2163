//! # repowatch-core
//!
//! Domain types, durable state store, and process configuration shared by
//! every repowatch crate.
//!
//! The state store is the only durable artifact the engine owns: one JSON
//! record per tracked repository, written atomically, read at the start of
//! each run to decide whether a repository is new, unchanged, or updated.

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, StateError};
