use std::{ffi::OsStr, io, process::Command};

/// What an external command reported once it finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Combined stdout and stderr.
    pub output: String,
}

/// Spawns external programs on behalf of a policy target.
pub trait CommandRunner {
    /// Run `program` with `args` to completion.
    ///
    /// `Err` means the program could not be started at all.
    fn run(&self, program: &str, args: &[&OsStr]) -> io::Result<CommandOutcome>;
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&OsStr]) -> io::Result<CommandOutcome> {
        tracing::debug!(target: "crx::policy", ?program, ?args, "Spawn");
        let output = Command::new(program).args(args).output()?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandOutcome { success: output.status.success(), output: combined })
    }
}

/// Render `program args...` for messages.
pub(crate) fn display_command(program: &str, args: &[&OsStr]) -> String {
    args.iter().fold(program.to_string(), |mut command, arg| {
        command.push(' ');
        command.push_str(&arg.to_string_lossy());
        command
    })
}
