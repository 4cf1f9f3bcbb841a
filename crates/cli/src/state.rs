use crx_config::{default_config_file, Config, LoadConfigError, SaveConfigError};
use crx_diagnostics::tracing;
use crx_registry::{PackageSource, SelectSourceError};
use derive_more::{Display, Error};
use miette::Diagnostic;
use std::path::{Path, PathBuf};

/// Application state shared by the commands that read the config.
pub struct State {
    /// Where the config was loaded from and will be saved to.
    pub config_file: PathBuf,
    /// Content of the config file, or the defaults when it doesn't exist yet.
    pub config: Config,
    /// Registry directory passed with `--registry`.
    pub local_registry: Option<PathBuf>,
}

/// Error type of [`State::init`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum InitStateError {
    #[display("Cannot determine the location of the config file")]
    #[diagnostic(
        code(crx_cli::no_config_path),
        help("Pass `--config <file>` or set the CRX_CONFIG environment variable.")
    )]
    NoConfigPath,

    #[diagnostic(transparent)]
    LoadConfig(#[error(source)] LoadConfigError),
}

/// `--config` if given, otherwise the default location.
pub fn config_file_path(explicit: Option<PathBuf>) -> Result<PathBuf, InitStateError> {
    explicit.or_else(default_config_file).ok_or(InitStateError::NoConfigPath)
}

impl State {
    /// Locate and load the config.
    pub fn init(
        config_file: Option<PathBuf>,
        local_registry: Option<PathBuf>,
    ) -> Result<Self, InitStateError> {
        let config_file = config_file_path(config_file)?;
        let config = Config::load_from(&config_file).map_err(InitStateError::LoadConfig)?;
        tracing::debug!(target: "crx::cli", ?config_file, extensions = config.extensions.len(), "Loaded config");
        Ok(State { config_file, config, local_registry })
    }

    pub fn package_source(&self) -> Result<PackageSource, SelectSourceError> {
        PackageSource::select(self.local_registry.as_deref(), &self.config.registries)
    }

    pub fn save(&self) -> Result<(), SaveConfigError> {
        self.config.save_to(&self.config_file)
    }

    pub fn policy_dir(&self) -> &Path {
        Path::new(&self.config.settings.policy_path)
    }
}
