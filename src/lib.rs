//! Lingo CLI Library
//!
//! Locale routing and translation loading for localized web applications,
//! with a command-line front end for inspecting both.
//!
//! ## Usage
//!
//! The CLI can be invoked as `lingo` with various subcommands:
//!
//! ```bash
//! lingo route /products -l "bn-BD,en;q=0.5"     # Where does this request go?
//! lingo get nav.home --path /bn                  # Look up a translation
//! lingo warm                                     # Preload every locale
//! ```
//!
//! ## Library
//!
//! The [`i18n`] module is usable on its own: [`i18n::LocaleRouter`] decides
//! redirects for inbound requests and [`i18n::Translator`] loads, caches and
//! looks up per-locale tables.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod i18n;
pub mod output;

pub use cli::Cli;
pub use error::{Error, Result};

/// CLI version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI with the given arguments.
///
/// This is the main entry point for the CLI, parsing arguments and
/// dispatching to the appropriate command handler.
pub async fn run(args: Vec<String>) -> Result<()> {
    use clap::Parser;
    use clap::error::ErrorKind;

    let cli_args = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap error (includes help/version)
            e.print().ok();
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Ok(()),
                _ => Err(Error::InvalidArgument(String::new())),
            };
        }
    };

    if cli_args.debug {
        init_logging();
    }

    // Completions don't depend on configuration.
    if let cli::Commands::Completion { shell } = &cli_args.command {
        return commands::completion(*shell);
    }

    let ctx = client::Context::new(
        cli_args.overrides(),
        cli_args.output.as_deref(),
        &cli_args.color,
        cli_args.quiet,
        cli_args.debug,
    )?;

    commands::execute(&ctx, &cli_args.command).await
}

/// Initialize tracing/logging for debug mode.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingo_cli=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
