//! Configuration system for the `lingo` CLI.
//!
//! The configuration follows XDG Base Directory Specification and supports:
//! - User config: `~/.config/lingo/config.yaml`
//! - Project config: `.lingo.yaml` in current directory
//! - Environment variables: `LINGO_*`
//! - Command-line flags (highest precedence)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::i18n::{
    BypassRules, DEFAULT_LOCALE, DirectorySource, FileSource, HttpSource, LocaleSet, LocaleSource,
    SourceRegistry,
};

/// Project config file name, looked up in the current directory.
pub const PROJECT_CONFIG_FILE: &str = ".lingo.yaml";

/// Main CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Locale used when nothing else matches.
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Supported locale codes.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Where locale tables are fetched from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Per-locale sources taking precedence over `source`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, SourceConfig>,

    /// Time allowed for one locale fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Paths that skip locale routing.
    #[serde(default)]
    pub routing: BypassRules,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// A locale data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A directory of `{locale}.json` files.
    Directory {
        /// Directory path.
        path: PathBuf,
    },

    /// A base URL serving `{locale}.json`.
    Http {
        /// Base URL.
        url: String,
    },

    /// One JSON file, used as-is for a single locale.
    File {
        /// File path.
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Directory { path: PathBuf::from("locales") }
    }
}

impl std::fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory { path } => write!(f, "directory {}", path.display()),
            Self::Http { url } => write!(f, "http {url}"),
            Self::File { path } => write!(f, "file {}", path.display()),
        }
    }
}

impl SourceConfig {
    /// Construct the loader this entry describes.
    pub fn build(&self, client: &reqwest::Client) -> Result<Arc<dyn LocaleSource>> {
        Ok(match self {
            Self::Directory { path } => Arc::new(DirectorySource::new(path)),
            Self::Http { url } => Arc::new(HttpSource::new(client.clone(), url)?),
            Self::File { path } => Arc::new(FileSource::new(path)),
        })
    }
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format (table, json, yaml, jsonl).
    #[serde(default = "default_format")]
    pub format: String,

    /// Color output mode (auto, always, never).
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_locales() -> Vec<String> {
    vec![DEFAULT_LOCALE.to_string()]
}

const fn default_fetch_timeout_ms() -> u64 {
    5000
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> String {
    "auto".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: default_format(), color: default_color() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
            source: SourceConfig::default(),
            overrides: BTreeMap::new(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            routing: BypassRules::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--default-locale`
    pub default_locale: Option<String>,
    /// `--locales`
    pub locales: Option<Vec<String>>,
    /// `--source-dir`
    pub source_dir: Option<PathBuf>,
    /// `--source-url`
    pub source_url: Option<String>,
    /// `--timeout-ms`
    pub fetch_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Resolution order (highest to lowest):
    /// 1. CLI flags (handled separately)
    /// 2. Environment variables
    /// 3. Project config (`.lingo.yaml`)
    /// 4. User config (`~/.config/lingo/config.yaml`)
    /// 5. Defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path()
            && path.exists()
        {
            let user_config = Self::load_from_file(&path)?;
            config.merge(user_config);
        }

        let project_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            let project_config = Self::load_from_file(&project_path)?;
            config.merge(project_config);
        }

        config.apply_env_overrides(|name| std::env::var(name).ok())?;

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&contents).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Fields still at their default value in `other` are left alone.
    pub fn merge(&mut self, other: Self) {
        if other.default_locale != default_locale() {
            self.default_locale = other.default_locale;
        }

        if other.locales != default_locales() {
            self.locales = other.locales;
        }

        if other.source != SourceConfig::default() {
            self.source = other.source;
        }

        self.overrides.extend(other.overrides);

        if other.fetch_timeout_ms != default_fetch_timeout_ms() {
            self.fetch_timeout_ms = other.fetch_timeout_ms;
        }

        if other.routing != BypassRules::default() {
            self.routing = other.routing;
        }

        if other.output.format != default_format() {
            self.output.format = other.output.format;
        }

        if other.output.color != default_color() {
            self.output.color = other.output.color;
        }
    }

    /// Apply environment variable overrides read through `var`.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(locale) = var("LINGO_DEFAULT_LOCALE") {
            self.default_locale = locale.trim().to_string();
        }

        if let Some(locales) = var("LINGO_LOCALES") {
            self.locales = split_list(&locales);
        }

        if let Some(dir) = var("LINGO_SOURCE_DIR") {
            self.source = SourceConfig::Directory { path: PathBuf::from(dir) };
        }

        if let Some(url) = var("LINGO_SOURCE_URL") {
            self.source = SourceConfig::Http { url };
        }

        if let Some(timeout) = var("LINGO_FETCH_TIMEOUT_MS") {
            self.fetch_timeout_ms = timeout.trim().parse().map_err(|_| {
                Error::config(format!("LINGO_FETCH_TIMEOUT_MS must be a number, got '{timeout}'"))
            })?;
        }

        Ok(())
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(locale) = overrides.default_locale {
            self.default_locale = locale;
        }
        if let Some(locales) = overrides.locales {
            self.locales = locales;
        }
        if let Some(path) = overrides.source_dir {
            self.source = SourceConfig::Directory { path };
        }
        if let Some(url) = overrides.source_url {
            self.source = SourceConfig::Http { url };
        }
        if let Some(timeout) = overrides.fetch_timeout_ms {
            self.fetch_timeout_ms = timeout;
        }
    }

    /// The validated locale set.
    pub fn locale_set(&self) -> Result<LocaleSet> {
        LocaleSet::new(self.locales.iter().map(|l| l.trim()), self.default_locale.trim())
    }

    /// The validated fetch timeout.
    pub fn fetch_timeout(&self) -> Result<Duration> {
        if self.fetch_timeout_ms == 0 {
            return Err(Error::config("fetch_timeout_ms must be greater than zero"));
        }
        Ok(Duration::from_millis(self.fetch_timeout_ms))
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        self.locale_set()?;
        self.fetch_timeout()?;
        Ok(())
    }

    /// The source a locale is loaded from.
    pub fn source_for(&self, locale: &str) -> &SourceConfig {
        self.overrides.get(locale).unwrap_or(&self.source)
    }

    /// Build the loader registry.
    ///
    /// Every supported locale gets the shared source unless it has an
    /// override. Overrides for locales outside the supported set are
    /// registered as well, so they can still be loaded explicitly.
    pub fn source_registry(
        &self,
        locales: &LocaleSet,
        client: &reqwest::Client,
    ) -> Result<SourceRegistry> {
        let shared = self.source.build(client)?;
        let mut registry = SourceRegistry::uniform(locales.locales(), shared);
        for (locale, source) in &self.overrides {
            registry.register(locale.as_str(), source.build(client)?);
        }
        Ok(registry)
    }

    /// Get the path to the user config file.
    ///
    /// Follows XDG Base Directory Specification:
    /// - Uses `XDG_CONFIG_HOME/lingo/config.yaml` if set
    /// - Falls back to `~/.config/lingo/config.yaml`
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.yaml"))
    }

    /// Get the path to the user config directory.
    ///
    /// Cross-platform behavior:
    /// - If `XDG_CONFIG_HOME` is set, uses `$XDG_CONFIG_HOME/lingo`
    /// - Linux/macOS: Falls back to `~/.config/lingo` (XDG default)
    /// - Windows: Falls back to `%APPDATA%\lingo`
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("lingo"));
        }

        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("lingo"))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(".config").join("lingo"))
        }
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
