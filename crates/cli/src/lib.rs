mod cli_args;
mod state;

pub use cli_args::{CliArgs, CliCommand};
pub use state::{InitStateError, State};

use clap::Parser;
use crx_diagnostics::{enable_tracing_by_env, Result};

pub async fn run_cli() -> Result<()> {
    enable_tracing_by_env()?;
    CliArgs::parse().run().await
}
