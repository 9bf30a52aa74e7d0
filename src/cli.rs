//! Command-line argument parsing and command definitions.
//!
//! Uses clap with derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

/// Lingo - locale routing and translation lookups
#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Default locale
    #[arg(long, global = true)]
    pub default_locale: Option<String>,

    /// Supported locales (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub locales: Option<Vec<String>>,

    /// Directory containing {locale}.json files
    #[arg(long, global = true, conflicts_with = "source_url")]
    pub source_dir: Option<PathBuf>,

    /// Base URL serving {locale}.json files
    #[arg(long, global = true)]
    pub source_url: Option<String>,

    /// Fetch timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format [default: from config, else table]
    #[arg(short, long, global = true, value_parser = ["table", "json", "yaml", "jsonl"])]
    pub output: Option<String>,

    /// Color output mode
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    pub color: String,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given as flags.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            default_locale: self.default_locale.clone(),
            locales: self.locales.clone(),
            source_dir: self.source_dir.clone(),
            source_url: self.source_url.clone(),
            fetch_timeout_ms: self.timeout_ms,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide how a request path is routed
    Route {
        /// Request path (e.g., /products?page=2)
        path: String,

        /// Accept-Language header value
        #[arg(long, short = 'l')]
        accept_language: Option<String>,
    },

    /// Negotiate a locale from an Accept-Language header
    Negotiate {
        /// Header value (defaults to the environment locale)
        header: Option<String>,
    },

    /// Look up translations
    Get {
        /// Translation keys (dotted paths allowed)
        #[arg(required = true)]
        keys: Vec<String>,

        /// Value to use when a key is missing
        #[arg(long)]
        fallback: Option<String>,

        /// Locale to look up in (defaults to the locale of --path)
        #[arg(long)]
        locale: Option<String>,

        /// Current route path
        #[arg(long, default_value = "/")]
        path: String,

        /// Answer from already-loaded data only, without waiting for a fetch
        #[arg(long)]
        no_wait: bool,

        /// Seed the mirror with this JSON file before looking up
        #[arg(long, value_name = "FILE")]
        seed: Option<PathBuf>,
    },

    /// Load a locale and print its translations
    Dump {
        /// Locale to load
        locale: String,
    },

    /// Preload every supported locale
    Warm,

    /// List supported locales
    Locales,

    /// Rewrite a path to another locale
    Switch {
        /// Current path
        path: String,

        /// Target locale
        locale: String,
    },

    /// Detect a locale from a browser language and country code
    Detect {
        /// Browser language (e.g., bn-BD; defaults to the environment locale)
        #[arg(long)]
        browser_lang: Option<String>,

        /// ISO 3166-1 alpha-2 country code (e.g., BD)
        #[arg(long)]
        country: Option<String>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    PowerShell,
}

/// Configuration commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Specific key to show
        key: Option<String>,
    },

    /// Show configuration file path
    Path {
        /// Show directory instead of file
        #[arg(long)]
        dir: bool,
    },

    /// Explain configuration resolution
    Explain,
}
