use crate::State;
use clap::Args;
use crx_diagnostics::tracing;
use crx_policy::{
    current_target, diff, generate, policy_location, to_json, write_json_to, ApplyError,
    PolicyDocument, POLICY_FILE_NAME,
};
use miette::Context;
use std::env;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Print the generated policy instead of installing it.
    #[clap(long, conflicts_with = "diff")]
    pub dry_run: bool,

    /// Compare the generated policy with the JSON file in `settings.policy_path`.
    #[clap(long)]
    pub diff: bool,

    /// Also write the generated policy as JSON into `settings.policy_path`.
    #[clap(long, conflicts_with = "diff")]
    pub backup: bool,
}

impl ApplyArgs {
    /// Execute the subcommand.
    pub async fn run(self, state: State) -> miette::Result<()> {
        let ApplyArgs { dry_run, diff: show_diff, backup } = self;
        let config = &state.config;

        if config.extensions.is_empty() {
            println!("No extensions configured.");
            return Ok(());
        }

        let source = state.package_source().wrap_err("select a package source")?;
        let packages = source
            .resolve_many(&config.extensions)
            .await
            .wrap_err("resolve the configured extensions")?;
        let document = generate(config.settings.mode, &packages);
        tracing::debug!(target: "crx::cli", mode = config.settings.mode.as_str(), dry_run, show_diff, backup, "Generated policy");

        if show_diff {
            if state.policy_dir().as_os_str().is_empty() {
                return Err(ApplyError::PolicyPathNotSet.into());
            }
            let existing_file = state.policy_dir().join(POLICY_FILE_NAME);
            let diff = diff(&document, &existing_file).wrap_err("compare with the existing policy")?;
            println!("{diff}");
            return Ok(());
        }

        if dry_run {
            let json = to_json(&document)?;
            println!("Generated policy (dry-run):");
            println!("{json}");
        } else {
            install(&document)?;
        }

        if backup {
            let path = write_json_to(&document, state.policy_dir(), POLICY_FILE_NAME)
                .wrap_err("write the policy backup")?;
            println!("Policy JSON written to: {}", path.display());
        }

        Ok(())
    }
}

fn install(document: &PolicyDocument) -> miette::Result<()> {
    let target = current_target().wrap_err("select the policy target")?;
    target.apply(document).wrap_err("apply the policy")?;

    println!("Policy applied to: {}", policy_location());
    if env::consts::OS == "macos" {
        println!();
        println!("The profile has been opened in System Settings.");
        println!("Click 'Install' to apply it, then reload policies at chrome://policy or restart Chrome.");
        println!();
        println!("To remove: run 'crx uninstall', or System Settings > Privacy & Security > Profiles > crx Chrome Extensions > Remove");
    } else {
        println!("Reload policies at chrome://policy or restart Chrome to apply changes.");
    }
    Ok(())
}
