use crate::{write_json_to, ApplyError, PolicyDocument, PolicyTarget, POLICY_FILE_NAME};
use std::path::{Path, PathBuf};

/// Directory Chrome on Linux reads mandatory policies from.
pub const MANAGED_POLICY_DIR: &str = "/etc/opt/chrome/policies/managed";

/// Installs the policy as a JSON file in a managed policy directory.
#[derive(Debug, Clone)]
pub struct ManagedFileTarget {
    dir: PathBuf,
    file_name: String,
}

impl ManagedFileTarget {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        ManagedFileTarget { dir: dir.into(), file_name: file_name.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn policy_file(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

impl Default for ManagedFileTarget {
    fn default() -> Self {
        ManagedFileTarget::new(MANAGED_POLICY_DIR, POLICY_FILE_NAME)
    }
}

impl PolicyTarget for ManagedFileTarget {
    fn apply(&self, document: &PolicyDocument) -> Result<(), ApplyError> {
        write_json_to(document, &self.dir, &self.file_name).map(drop)
    }

    /// There is nothing to undo the write with, so this always fails and names the file.
    fn remove(&self) -> Result<(), ApplyError> {
        Err(ApplyError::NoRemovalPath { path: self.policy_file() })
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
