use assert_cmd::prelude::*;
use command_extra::CommandExtra;
use crx_testing_utils::{bin::CommandTempCwd, fs::write_file};
use std::{ffi::OsStr, path::PathBuf, process::Output};
use tempfile::TempDir;

/// Run `crx` with the sample registry and a config file holding `config`.
///
/// Returns the output of the command, whether it succeeded or not.
pub fn exec_crx_with_config<Args>(config: &str, args: Args) -> (TempDir, PathBuf, Output)
where
    Args: IntoIterator,
    Args::Item: AsRef<OsStr>,
{
    let CommandTempCwd { crx, root, config_file, .. } = CommandTempCwd::init().add_local_registry();
    write_file(&config_file, config);
    let output = crx.with_args(args).output().expect("execute crx");
    dbg!(&output);
    (root, config_file, output)
}

/// Like [`exec_crx_with_config`] but the command must succeed. Returns its stdout.
pub fn exec_crx_success<Args>(config: &str, args: Args) -> (TempDir, PathBuf, String)
where
    Args: IntoIterator,
    Args::Item: AsRef<OsStr>,
{
    let (root, config_file, output) = exec_crx_with_config(config, args);
    output.clone().assert().success();
    (root, config_file, String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
