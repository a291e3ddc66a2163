//! Durable repository state store.
//!
//! # Storage layout
//!
//! ```text
//! <home>/.repowatch/
//!   state/
//!     <slug>.json   (one RepositoryRecord per tracked repository)
//! ```
//!
//! Writes use the atomic `.tmp` + rename pattern. A missing record file means
//! "no prior record" (`Ok(None)`); any I/O or parse failure is an `Err` and
//! must never be read as absence — the caller skips the repository for the
//! run instead of re-scanning from scratch.
//!
//! Single-writer assumption: one run at a time against a given `home`;
//! upserts are whole-record replacements keyed by slug.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, StateError};
use crate::types::{RepoSlug, RepositoryRecord};

/// `<home>/.repowatch/state/` — pure, no I/O.
pub fn state_dir_at(home: &Path) -> PathBuf {
    home.join(".repowatch").join("state")
}

/// `<home>/.repowatch/state/<slug>.json` — pure, no I/O.
pub fn record_path_at(home: &Path, slug: &RepoSlug) -> PathBuf {
    state_dir_at(home).join(format!("{}.json", slug.0))
}

/// Create the state directory.
///
/// Called once at startup; failure here aborts the whole run before any
/// repository is processed.
pub fn init_at(home: &Path) -> Result<(), StateError> {
    let dir = state_dir_at(home);
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))
}

/// Load the record for `slug`, or `None` if no record exists yet.
pub fn load_record_at(home: &Path, slug: &RepoSlug) -> Result<Option<RepositoryRecord>, StateError> {
    let path = record_path_at(home, slug);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_err(&path, err)),
    };
    let record: RepositoryRecord = serde_json::from_str(&contents)?;
    Ok(Some(record))
}

/// Upsert the record for its slug atomically (replace semantics, not merge).
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_record_at(home: &Path, record: &RepositoryRecord) -> Result<(), StateError> {
    let path = record_path_at(home, &record.slug);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid state record path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    tracing::debug!("state saved: {} @ {}", record.slug, record.last_commit);
    Ok(())
}

/// All records in the store, sorted by slug.
///
/// Skips leftover `.tmp` files from interrupted writes.
pub fn list_records_at(home: &Path) -> Result<Vec<RepositoryRecord>, StateError> {
    let dir = state_dir_at(home);
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut records = Vec::new();
    let entries = std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(&dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        records.push(serde_json::from_str(&contents)?);
    }
    records.sort_by(|a: &RepositoryRecord, b: &RepositoryRecord| a.slug.cmp(&b.slug));
    Ok(records)
}
