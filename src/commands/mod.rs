//! Command implementations for the `lingo` CLI.
//!
//! Each submodule implements a group of related commands.

mod config;
mod locales;
mod routing;
mod translate;

pub use config::{config_explain, config_path, config_show};
pub use locales::locales;
pub use routing::{detect, negotiate, route, switch};
pub use translate::{GetOptions, dump, get, warm};

use crate::cli::{Commands, ConfigCommands, Shell};
use crate::client::Context;
use crate::error::Result;

/// Execute a CLI command.
pub async fn execute(ctx: &Context, command: &Commands) -> Result<()> {
    match command {
        // Routing commands
        Commands::Route { path, accept_language } => {
            route(ctx, path, accept_language.as_deref()).await
        }
        Commands::Negotiate { header } => negotiate(ctx, header.as_deref()).await,
        Commands::Switch { path, locale } => switch(ctx, path, locale).await,
        Commands::Detect { browser_lang, country } => {
            detect(ctx, browser_lang.as_deref(), country.as_deref()).await
        }

        // Translation commands
        Commands::Get { keys, fallback, locale, path, no_wait, seed } => {
            get(
                ctx,
                GetOptions {
                    keys,
                    fallback: fallback.as_deref(),
                    locale: locale.as_deref(),
                    path,
                    no_wait: *no_wait,
                    seed: seed.as_deref(),
                },
            )
            .await
        }
        Commands::Dump { locale } => dump(ctx, locale).await,
        Commands::Warm => warm(ctx).await,
        Commands::Locales => locales(ctx).await,

        // Config commands
        Commands::Config(sub) => match sub {
            ConfigCommands::Show { key } => config_show(ctx, key.as_deref()).await,
            ConfigCommands::Path { dir } => config_path(ctx, *dir).await,
            ConfigCommands::Explain => config_explain(ctx).await,
        },

        Commands::Completion { shell } => completion(*shell),
    }
}

/// Print shell completions for the CLI.
pub fn completion(shell: Shell) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Generator, generate};

    fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
        let name = cmd.get_name().to_string();
        generate(generator, cmd, name, &mut std::io::stdout());
    }

    let mut cmd = crate::cli::Cli::command();
    match shell {
        Shell::Bash => print_completions(clap_complete::shells::Bash, &mut cmd),
        Shell::Zsh => print_completions(clap_complete::shells::Zsh, &mut cmd),
        Shell::Fish => print_completions(clap_complete::shells::Fish, &mut cmd),
        Shell::PowerShell => print_completions(clap_complete::shells::PowerShell, &mut cmd),
    }

    Ok(())
}
