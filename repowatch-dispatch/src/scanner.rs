//! Secret scanner invocation.
//!
//! The detection algorithm is the scanner's business; the core only needs
//! "empty report" versus "non-empty report". An empty report means no
//! verified finding.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::DispatchError;

/// Text report produced by one scanner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub text: String,
}

impl ScanReport {
    /// No verified findings.
    pub fn is_clean(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Invokes the scanning tool against one filesystem target.
pub trait SecretScanner {
    fn scan(&self, target: &Path) -> Result<ScanReport, DispatchError>;
}

/// TruffleHog CLI adapter: `trufflehog filesystem <target> --only-verified`.
pub struct TruffleHog {
    binary: PathBuf,
}

impl TruffleHog {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("trufflehog"),
        }
    }

    /// Use a specific scanner binary (tests point this at a stub script).
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl Default for TruffleHog {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretScanner for TruffleHog {
    fn scan(&self, target: &Path) -> Result<ScanReport, DispatchError> {
        tracing::debug!("scanning {}", target.display());
        let output = Command::new(&self.binary)
            .arg("filesystem")
            .arg(target)
            .arg("--only-verified")
            .output()
            .map_err(|source| DispatchError::ScannerSpawn { source })?;
        if !output.status.success() {
            return Err(DispatchError::ScannerFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(ScanReport {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
