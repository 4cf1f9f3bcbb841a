mod defaults;

pub use defaults::{default_config_file, default_policy_path, DEFAULT_REF};

use derive_more::{Display, Error};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use strum::IntoStaticStr;

/// How the configured extensions end up in the browser.
///
/// The mode alone decides which policy shape gets generated. Unknown values are
/// rejected while the config is deserialized, so downstream code never sees them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InstallMode {
    /// Installed silently and cannot be removed by the user.
    #[default]
    ForceInstall,

    /// Installed automatically, but the user may disable or remove it.
    NormalInstall,

    /// Not installed, only permitted when the user installs it.
    Allowed,
}

impl InstallMode {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Directory that holds the JSON policy file, used for diffing and backups.
    #[serde(default = "default_policy_path")]
    pub policy_path: String,

    #[serde(default)]
    pub mode: InstallMode,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { policy_path: default_policy_path(), mode: InstallMode::default() }
    }
}

/// A remote package registry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Kind of the registry. Only `github` is understood.
    #[serde(rename = "type")]
    pub kind: String,

    /// Repository in `owner/name` form.
    pub repo: String,

    /// Branch, tag or commit. Defaults to [`DEFAULT_REF`].
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl RegistryConfig {
    pub fn reference(&self) -> &str {
        self.reference.as_deref().unwrap_or(DEFAULT_REF)
    }
}

/// Content of the `config.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub settings: Settings,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registries: Vec<RegistryConfig>,
}

/// Error type of [`Config::load_from`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum LoadConfigError {
    #[display("Failed to read the config file at {path:?}: {error}")]
    #[diagnostic(code(crx_config::read_file))]
    ReadFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to parse the config file at {path:?}: {error}")]
    #[diagnostic(
        code(crx_config::parse_file),
        help("`settings.mode` must be one of force_install, normal_install or allowed")
    )]
    ParseFile {
        path: PathBuf,
        #[error(source)]
        error: serde_yaml::Error,
    },
}

/// Error type of [`Config::save_to`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum SaveConfigError {
    #[display("Failed to create the config directory at {dir:?}: {error}")]
    #[diagnostic(code(crx_config::create_dir))]
    CreateDir {
        dir: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to serialize the config: {_0}")]
    #[diagnostic(code(crx_config::serialize))]
    Serialize(serde_yaml::Error),

    #[display("Failed to write the config file at {path:?}: {error}")]
    #[diagnostic(code(crx_config::write_file))]
    WriteFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

impl Config {
    /// Load the config at `path`, falling back to [`Config::default`] when it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Config, LoadConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(target: "crx::config", ?path, "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(error) => {
                return Err(LoadConfigError::ReadFile { path: path.to_path_buf(), error });
            }
        };

        serde_yaml::from_str(&content)
            .map_err(|error| LoadConfigError::ParseFile { path: path.to_path_buf(), error })
    }

    /// Write the config to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SaveConfigError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|error| SaveConfigError::CreateDir { dir: dir.to_path_buf(), error })?;
        }

        let content = serde_yaml::to_string(self).map_err(SaveConfigError::Serialize)?;
        fs::write(path, content)
            .map_err(|error| SaveConfigError::WriteFile { path: path.to_path_buf(), error })?;

        tracing::debug!(target: "crx::config", ?path, "Saved config");
        Ok(())
    }

    /// Append `name` unless it's already listed. Returns whether it was added.
    pub fn add_extension(&mut self, name: &str) -> bool {
        if self.extensions.iter().any(|extension| extension == name) {
            return false;
        }
        self.extensions.push(name.to_string());
        true
    }

    /// Drop `name` from the list. Returns whether it was present.
    pub fn remove_extension(&mut self, name: &str) -> bool {
        let Some(index) = self.extensions.iter().position(|extension| extension == name) else {
            return false;
        };
        self.extensions.remove(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn have_default_values() {
        let config = Config::default();
        assert!(config.extensions.is_empty());
        assert!(config.registries.is_empty());
        assert_eq!(config.settings.mode, InstallMode::ForceInstall);
        assert_eq!(config.settings.policy_path, default_policy_path());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn default_policy_path_on_linux() {
        assert_eq!(default_policy_path(), "/etc/opt/chrome/policies/managed");
    }

    #[test]
    fn parse_modes() {
        for (text, mode) in [
            ("force_install", InstallMode::ForceInstall),
            ("normal_install", InstallMode::NormalInstall),
            ("allowed", InstallMode::Allowed),
        ] {
            let config: Config = serde_yaml::from_str(&format!("settings:\n  mode: {text}\n")).unwrap();
            assert_eq!(config.settings.mode, mode);
            assert_eq!(mode.as_str(), text);
        }
    }

    #[test]
    fn reject_unknown_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "settings:\n  mode: blocked\n").unwrap();
        let error = Config::load_from(&path).expect_err("unknown mode");
        assert!(matches!(error, LoadConfigError::ParseFile { .. }));
    }

    #[test]
    fn parse_registries() {
        let text = "extensions:\n- ublock-origin\nregistries:\n- type: github\n  repo: sivchari/crx-registry\n- type: github\n  repo: acme/extensions\n  ref: stable\n";
        let config: Config = serde_yaml::from_str(text).unwrap();
        assert_eq!(config.extensions, ["ublock-origin"]);
        assert_eq!(config.registries[0].kind, "github");
        assert_eq!(config.registries[0].reference(), "main");
        assert_eq!(config.registries[1].reference(), "stable");
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/crx/config.yaml");

        let mut config = Config::default();
        config.add_extension("ublock-origin");
        config.settings.mode = InstallMode::Allowed;
        config.save_to(&path).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("mode: allowed"));
        assert!(!saved.contains("registries"));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn add_extension_skips_duplicates() {
        let mut config = Config::default();
        assert!(config.add_extension("ublock-origin"));
        assert!(config.add_extension("bitwarden"));
        assert!(!config.add_extension("ublock-origin"));
        assert_eq!(config.extensions, ["ublock-origin", "bitwarden"]);
    }

    #[test]
    fn remove_extension_reports_presence() {
        let mut config = Config::default();
        config.add_extension("ublock-origin");
        config.add_extension("bitwarden");
        assert!(config.remove_extension("ublock-origin"));
        assert!(!config.remove_extension("ublock-origin"));
        assert_eq!(config.extensions, ["bitwarden"]);
    }
}
