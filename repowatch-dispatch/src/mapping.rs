//! Repository→project-key mapping.
//!
//! A static JSON object loaded once at startup, keyed by repository display
//! name:
//!
//! ```json
//! { "Payments API": "SEC", "web": "WEBOPS" }
//! ```
//!
//! A missing entry is a recoverable condition: the ticket step is skipped
//! with a logged warning, the alert still goes out.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use repowatch_core::types::RepoName;

use crate::error::{io_err, DispatchError};

/// Display-name → ticketing project key lookup table.
#[derive(Debug, Clone, Default)]
pub struct ProjectKeyMap {
    entries: HashMap<String, String>,
}

impl ProjectKeyMap {
    /// Load the mapping document.
    ///
    /// A missing file loads as an empty map (warned, not fatal): runs still
    /// alert on findings, they just cannot open tickets.
    pub fn load(path: &Path) -> Result<Self, DispatchError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "project key mapping not found at {}; tickets will be skipped",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(err) => return Err(io_err(path, err)),
        };
        let entries: HashMap<String, String> = serde_json::from_str(&contents)?;
        Ok(Self { entries })
    }

    /// In-memory mapping for tests.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn project_key_for(&self, name: &RepoName) -> Option<&str> {
        self.entries.get(&name.0).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lookup_hits_and_misses() {
        let map = ProjectKeyMap::from_entries([("Payments API", "SEC")]);
        assert_eq!(
            map.project_key_for(&RepoName::from("Payments API")),
            Some("SEC")
        );
        assert_eq!(map.project_key_for(&RepoName::from("web")), None);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let map = ProjectKeyMap::load(&dir.path().join("nope.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn loads_json_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project_keys.json");
        std::fs::write(&path, r#"{"web": "WEBOPS"}"#).unwrap();
        let map = ProjectKeyMap::load(&path).unwrap();
        assert_eq!(map.project_key_for(&RepoName::from("web")), Some("WEBOPS"));
    }

    #[test]
    fn malformed_mapping_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project_keys.json");
        std::fs::write(&path, "project,repo").unwrap();
        assert!(ProjectKeyMap::load(&path).is_err());
    }
}
