//! Locale resolution, loading and lookup.
//!
//! The module has two halves:
//!
//! - **Routing** ([`resolver`], [`negotiate`], [`locales`]): decide which
//!   locale a request path uses and where to redirect paths without one.
//! - **Data** ([`source`], [`cache`], [`table`], [`translator`]): fetch
//!   per-locale translation tables, cache them, and look keys up.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lingo_cli::i18n::{DirectorySource, LocaleSet, SourceRegistry, Translator};
//!
//! let locales = LocaleSet::new(["en", "bn"], "en")?;
//! let registry = SourceRegistry::uniform(locales.locales(), Arc::new(DirectorySource::new("locales")));
//! let translator = Translator::builder().locales(locales).registry(registry).build();
//!
//! // Best effort, never waits.
//! let label = translator.lt("home", Some("Home"), None);
//!
//! // Fresh, awaits the load.
//! let label = translator.lta("nav.home", None).await;
//! ```

pub mod cache;
pub mod locales;
pub mod negotiate;
pub mod resolver;
pub mod source;
pub mod table;
pub mod translator;

pub use cache::{LocaleCache, LocaleMirror};
pub use locales::{
    DEFAULT_LOCALE, Locale, LocaleSet, browser_language_locale, country_locale, detect_env_locale,
    determine_locale, normalize_locale,
};
pub use negotiate::{LanguageRange, negotiate_locale, parse_accept_language};
pub use resolver::{
    BypassRules, LocaleRouter, RouteDecision, build_redirect_target, redirect_response,
    resolve_from_path, should_bypass, switch_locale,
};
pub use source::{
    DirectorySource, FileSource, HttpSource, LocaleSource, MemorySource, SourceRegistry,
};
pub use table::LocaleTable;
pub use translator::{CurrentPath, DEFAULT_FETCH_TIMEOUT, RouteContext, Translator};
