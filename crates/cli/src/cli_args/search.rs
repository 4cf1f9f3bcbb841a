use crate::State;
use clap::Args;
use miette::Context;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text matched against package names, display names and tags. Lists everything when omitted.
    #[clap(default_value = "")]
    pub query: String,
}

impl SearchArgs {
    /// Execute the subcommand.
    pub async fn run(self, state: State) -> miette::Result<()> {
        let SearchArgs { query } = self;

        let source = state.package_source().wrap_err("select a package source")?;
        let packages = source.search(&query).await.wrap_err("search the registry")?;

        if packages.is_empty() {
            println!("No packages found.");
            return Ok(());
        }

        for package in packages {
            let installed = state.config.extensions.contains(&package.name);
            let marker = if installed { "*" } else { " " };
            println!("{marker} {} - {}", package.name, package.display_name);
            if let Some(description) = &package.description {
                println!("    {description}");
            }
        }
        Ok(())
    }
}
