//! Execution context shared by every command.
//!
//! Builds the locale router and translator from the resolved
//! configuration, so commands only deal with locale operations.

use std::sync::Arc;

use crate::config::{Config, Overrides};
use crate::error::Result;
use crate::i18n::{CurrentPath, LocaleRouter, LocaleSet, RouteContext, Translator};
use crate::output::Output;

/// Context for CLI command execution.
///
/// Contains everything needed to execute CLI commands:
/// - Configuration
/// - Output settings
/// - The locale router and translator built from the configuration
pub struct Context {
    /// CLI configuration.
    pub config: Config,

    /// Output configuration.
    pub output: Output,

    /// Request routing over the configured locales.
    pub router: LocaleRouter,

    /// Locale loader and lookup.
    pub translator: Translator,

    /// Path the translator treats as the current route.
    pub route: Arc<CurrentPath>,

    /// Debug mode.
    pub debug: bool,
}

impl Context {
    /// Create a new context from CLI options.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        overrides: Overrides,
        output_format: Option<&str>,
        color: &str,
        quiet: bool,
        debug: bool,
    ) -> Result<Self> {
        let mut config = Config::load()?;
        config.apply_overrides(overrides);

        let format = output_format.unwrap_or(&config.output.format).to_string();
        let output = Output::from_cli(&format, color, quiet)?;

        let mut ctx = Self::from_config(config, output)?;
        ctx.debug = debug;
        Ok(ctx)
    }

    /// Build a context from an already-resolved configuration.
    pub fn from_config(config: Config, output: Output) -> Result<Self> {
        config.validate()?;
        let locales = config.locale_set()?;
        let router = LocaleRouter::new(locales.clone(), config.routing.clone());
        let translator_route = Arc::new(CurrentPath::new("/"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("lingo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let registry = config.source_registry(&locales, &client)?;

        let translator = Translator::builder()
            .locales(locales)
            .registry(registry)
            .route(Arc::clone(&translator_route) as Arc<dyn RouteContext>)
            .fetch_timeout(config.fetch_timeout()?)
            .build();

        tracing::debug!(
            default = %translator.locales().default_locale(),
            source = %config.source,
            "Context ready"
        );

        Ok(Self { config, output, router, translator, route: translator_route, debug: false })
    }

    /// The supported locales.
    pub fn locales(&self) -> &LocaleSet {
        self.translator.locales()
    }

    /// Point the translator's current route at `path`.
    pub fn navigate(&self, path: &str) {
        self.route.set(path);
    }
}
