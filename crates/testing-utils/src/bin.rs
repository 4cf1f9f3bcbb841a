use crate::registry::write_sample_registry;
use assert_cmd::prelude::*;
use command_extra::CommandExtra;
use std::{fs, path::PathBuf, process::Command};
use tempfile::{tempdir, TempDir};

/// A `crx` command running inside a temporary directory.
///
/// The config file is pinned inside the sandbox through `CRX_CONFIG`, so the
/// command never reads or writes the real user config.
#[must_use]
pub struct CommandTempCwd<Registry = ()> {
    pub crx: Command,
    pub root: TempDir,
    pub workspace: PathBuf,
    pub config_file: PathBuf,
    pub registry: Registry,
}

impl CommandTempCwd<()> {
    /// Create a temporary directory, a workspace directory inside it, and a
    /// `crx` command running in the workspace.
    pub fn init() -> Self {
        let root = tempdir().expect("create temporary directory");
        let workspace = root.path().join("workspace");
        fs::create_dir(&workspace).expect("create temporary workspace for crx");
        let config_file = root.path().join("config").join("crx").join("config.yaml");
        let crx = Command::cargo_bin("crx")
            .expect("find the crx binary")
            .with_current_dir(&workspace)
            .with_env("CRX_CONFIG", &config_file)
            .without_env("XDG_CONFIG_HOME")
            .without_env("TRACE");
        CommandTempCwd { crx, root, workspace, config_file, registry: () }
    }

    /// Write the sample registry next to the workspace and pass it with `--registry`.
    pub fn add_local_registry(self) -> CommandTempCwd<PathBuf> {
        let CommandTempCwd { crx, root, workspace, config_file, .. } = self;
        let registry = root.path().join("registry");
        write_sample_registry(&registry);
        let crx = crx.with_arg("--registry").with_arg(&registry);
        CommandTempCwd { crx, root, workspace, config_file, registry }
    }
}
