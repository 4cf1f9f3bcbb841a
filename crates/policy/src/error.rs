use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{io, path::PathBuf};

/// Error type of encoding, writing, installing and removing a policy.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ApplyError {
    #[display("Failed to serialize the policy: {_0}")]
    #[diagnostic(code(crx_policy::serialize))]
    Serialize(serde_json::Error),

    #[display("Permission denied while writing {location}: {error}")]
    #[diagnostic(
        code(crx_policy::permission_denied),
        help("Writing browser policies needs elevated privileges. Run with sudo, or as Administrator on Windows.")
    )]
    PermissionDenied {
        location: String,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to write {location}: {error}")]
    #[diagnostic(code(crx_policy::io_error))]
    Io {
        location: String,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to read the existing policy at {path:?}: {error}")]
    #[diagnostic(code(crx_policy::read_existing))]
    ReadExisting {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to start `{command}`: {error}")]
    #[diagnostic(code(crx_policy::launch_error))]
    Launch {
        command: String,
        #[error(source)]
        error: io::Error,
    },

    #[display("`{command}` exited unsuccessfully: {output}")]
    #[diagnostic(code(crx_policy::command_failed), help("Try again with sudo."))]
    CommandFailed { command: String, output: String },

    #[display("The {target} policy target is not available on {os}")]
    #[diagnostic(code(crx_policy::unsupported_platform))]
    UnsupportedPlatform { target: &'static str, os: &'static str },

    #[display("No automatic removal exists for {path:?}")]
    #[diagnostic(
        code(crx_policy::no_removal_path),
        help("Delete the file by hand, for example with `sudo rm`.")
    )]
    NoRemovalPath { path: PathBuf },

    #[display("The home directory could not be determined")]
    #[diagnostic(code(crx_policy::home_dir_not_found))]
    HomeDirNotFound,

    #[display("`settings.policy_path` is not set")]
    #[diagnostic(
        code(crx_policy::policy_path_not_set),
        help("Set `settings.policy_path` in the config file.")
    )]
    PolicyPathNotSet,
}

impl ApplyError {
    /// Classify a failed filesystem or registry write on `location`.
    pub(crate) fn from_io(location: impl Into<String>, error: io::Error) -> Self {
        let location = location.into();
        match error.kind() {
            io::ErrorKind::PermissionDenied => ApplyError::PermissionDenied { location, error },
            _ => ApplyError::Io { location, error },
        }
    }
}
