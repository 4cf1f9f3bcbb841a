use crate::{ApplyError, PolicyDocument};
use derive_more::Display;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Name of the JSON policy file inside a managed policy directory.
pub const POLICY_FILE_NAME: &str = "crx-extensions.json";

/// Encode `document` as JSON indented by two spaces, without a trailing newline.
pub fn to_json(document: &PolicyDocument) -> Result<String, ApplyError> {
    serde_json::to_string_pretty(document).map_err(ApplyError::Serialize)
}

/// Outcome of comparing a document against a policy file on disk.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{description}")]
pub struct PolicyDiff {
    pub changed: bool,
    pub description: String,
}

/// Compare the JSON form of `document` with the content of `existing_file`.
///
/// The comparison is byte for byte. A missing file counts as a change.
pub fn diff(document: &PolicyDocument, existing_file: &Path) -> Result<PolicyDiff, ApplyError> {
    let new = to_json(document)?;
    let existing = match fs::read(existing_file) {
        Ok(existing) => existing,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            let description = format!("New file will be created:\n{new}");
            return Ok(PolicyDiff { changed: true, description });
        }
        Err(error) => {
            return Err(ApplyError::ReadExisting { path: existing_file.to_path_buf(), error });
        }
    };

    if existing == new.as_bytes() {
        return Ok(PolicyDiff { changed: false, description: "No changes".to_string() });
    }

    let existing = String::from_utf8_lossy(&existing);
    let description = format!("Changes detected:\n--- existing\n{existing}\n+++ new\n{new}");
    Ok(PolicyDiff { changed: true, description })
}

/// Write the JSON form of `document` to `dir/file_name`, creating `dir` if needed.
///
/// The file is truncated before writing. Returns the path of the written file.
pub fn write_json_to(
    document: &PolicyDocument,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ApplyError> {
    if dir.as_os_str().is_empty() {
        return Err(ApplyError::PolicyPathNotSet);
    }

    let json = to_json(document)?;
    fs::create_dir_all(dir).map_err(|error| ApplyError::from_io(dir.display().to_string(), error))?;
    let path = dir.join(file_name);
    fs::write(&path, json).map_err(|error| ApplyError::from_io(path.display().to_string(), error))?;

    tracing::info!(target: "crx::policy", ?path, "Wrote policy file");
    Ok(path)
}
