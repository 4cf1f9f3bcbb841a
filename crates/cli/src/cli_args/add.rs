use crate::State;
use clap::Args;
use crx_diagnostics::tracing;
use miette::Context;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Name of the extension in the registry.
    pub name: String,
}

impl AddArgs {
    /// Execute the subcommand.
    pub async fn run(self, mut state: State) -> miette::Result<()> {
        let AddArgs { name } = self;

        let source = state.package_source().wrap_err("select a package source")?;
        let package = source
            .resolve(&name)
            .await
            .wrap_err_with(|| format!("verify that {name:?} exists in {}", source.location()))?;
        tracing::debug!(target: "crx::cli", ?name, id = ?package.id, "Package found");

        if !state.config.add_extension(&name) {
            println!("Extension already exists: {name}");
            return Ok(());
        }

        state.save().wrap_err("save the config")?;
        println!("Added extension: {} ({name})", package.display_name);
        Ok(())
    }
}
