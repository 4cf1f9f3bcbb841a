use crate::State;
use clap::Args;
use miette::Context;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Name of the extension in the config.
    pub name: String,
}

impl RemoveArgs {
    /// Execute the subcommand.
    pub fn run(self, mut state: State) -> miette::Result<()> {
        let RemoveArgs { name } = self;

        if !state.config.remove_extension(&name) {
            println!("Extension not found: {name}");
            return Ok(());
        }

        state.save().wrap_err("save the config")?;
        println!("Removed extension: {name}");
        println!("Run 'crx apply' to update the policy.");
        Ok(())
    }
}
