use crate::{parse_artifact, Artifact, Package, RegistryError, RegistryIndex};
use serde::de::DeserializeOwned;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Package source backed by a directory laid out like a registry repository.
///
/// Every lookup reads the filesystem again. Nothing is cached.
#[derive(Debug, Clone)]
pub struct LocalSource {
    base_dir: PathBuf,
}

impl LocalSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        LocalSource { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of `artifact` under the base directory.
    pub fn path_of(&self, artifact: &Artifact) -> PathBuf {
        self.base_dir.join(artifact.path())
    }

    fn load<Value: DeserializeOwned>(&self, artifact: Artifact) -> Result<Value, RegistryError> {
        let path = self.path_of(&artifact);
        tracing::debug!(target: "crx::registry", ?path, "Read local artifact");
        let body = match fs::read(&path) {
            Ok(body) => body,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                let location = path.display().to_string();
                return Err(RegistryError::NotFound { artifact, location });
            }
            Err(error) => return Err(RegistryError::ReadFile { path, error }),
        };
        parse_artifact(artifact, path.display().to_string(), &body)
    }

    /// Load `pkgs/<name>.yaml`.
    pub fn resolve(&self, name: &str) -> Result<Package, RegistryError> {
        self.load(Artifact::Package(name.to_string()))
    }

    /// Load `registry.yaml`.
    pub fn resolve_index(&self) -> Result<RegistryIndex, RegistryError> {
        self.load(Artifact::Index)
    }
}
