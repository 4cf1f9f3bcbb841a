pub mod add;
pub mod apply;
pub mod remove;
pub mod search;

use crate::state::{config_file_path, State};
use add::AddArgs;
use apply::ApplyArgs;
use clap::{Parser, Subcommand};
use crx_config::Config;
use crx_policy::current_target;
use miette::Context;
use remove::RemoveArgs;
use search::SearchArgs;
use std::path::{Path, PathBuf};

/// Declarative browser extension manager.
#[derive(Debug, Parser)]
#[clap(name = "crx")]
#[clap(bin_name = "crx")]
#[clap(version)]
#[clap(about = "Manage browser extensions declaratively through enterprise policies")]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: CliCommand,

    /// Path of the config file.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Resolve packages from a local registry directory instead of the configured registries.
    #[clap(long, global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create a config file with the default settings.
    Init,
    /// Add an extension to the config.
    Add(AddArgs),
    /// Remove an extension from the config.
    Remove(RemoveArgs),
    /// List the configured extensions.
    List,
    /// Search the registry.
    Search(SearchArgs),
    /// Generate the policy for the configured extensions and install it.
    Apply(ApplyArgs),
    /// Remove the installed policy.
    Uninstall,
}

impl CliArgs {
    /// Execute the command
    pub async fn run(self) -> miette::Result<()> {
        let CliArgs { command, config, registry } = self;
        let state = || State::init(config.clone(), registry.clone()).wrap_err("initialize the state");

        match command {
            CliCommand::Init => {
                let config_file = config_file_path(config.clone())?;
                init_config(&config_file)?;
            }
            CliCommand::Add(args) => return args.run(state()?).await,
            CliCommand::Remove(args) => return args.run(state()?),
            CliCommand::List => list_extensions(&state()?.config),
            CliCommand::Search(args) => return args.run(state()?).await,
            CliCommand::Apply(args) => return args.run(state()?).await,
            CliCommand::Uninstall => {
                let target = current_target().wrap_err("select the policy target")?;
                target.remove().wrap_err("remove the installed policy")?;
                println!("Removed policy from: {}", target.location());
            }
        }

        Ok(())
    }
}

/// Write the default config unless a config file already exists.
fn init_config(config_file: &Path) -> miette::Result<()> {
    if config_file.exists() {
        println!("Configuration already exists at {}", config_file.display());
        return Ok(());
    }

    Config::default().save_to(config_file).wrap_err("save the default config")?;

    println!("Configuration created at {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. Add a registry to the configuration, or pass --registry <dir>");
    println!("  2. Run 'crx add <extension>' to add extensions");
    println!("  3. Run 'crx apply' to install the policy");
    Ok(())
}

fn list_extensions(config: &Config) {
    if config.extensions.is_empty() {
        println!("No extensions configured.");
        println!("Use 'crx add <extension>' to add extensions.");
        return;
    }

    println!("Configured extensions:");
    for extension in &config.extensions {
        println!("  - {extension}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn global_flags_go_anywhere() {
        let args = CliArgs::parse_from(["crx", "apply", "--dry-run", "--registry", "reg"]);
        assert_eq!(args.registry, Some(PathBuf::from("reg")));
        assert!(matches!(args.command, CliCommand::Apply(ApplyArgs { dry_run: true, .. })));

        let args = CliArgs::parse_from(["crx", "--config", "c.yaml", "add", "bitwarden"]);
        assert_eq!(args.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(args.command, CliCommand::Add(AddArgs { ref name }) if name == "bitwarden"));
    }

    #[test]
    fn search_query_is_optional() {
        let args = CliArgs::parse_from(["crx", "search"]);
        assert!(matches!(args.command, CliCommand::Search(SearchArgs { ref query }) if query.is_empty()));
    }

    #[test]
    fn dry_run_conflicts_with_diff() {
        let result = CliArgs::try_parse_from(["crx", "apply", "--dry-run", "--diff"]);
        assert!(result.is_err());
    }
}
