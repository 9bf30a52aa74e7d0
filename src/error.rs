//! Error types for the Lingo CLI.
//!
//! This module provides structured error handling with semantic exit codes.
//! Locale loading failures are modelled here too, but they never escape the
//! translator: `load_locale_data`, `lt` and `lta` absorb them.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (invalid config file, inconsistent locale set).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Parse error (malformed locale tag, malformed locale data).
    #[error("Parse error: {0}")]
    Parse(String),

    /// The locale is not part of the configured set.
    #[error("Locale '{0}' is not supported. Run 'lingo locales' to see available locales.")]
    UnsupportedLocale(String),

    /// Fetching or decoding a locale's data source failed.
    #[error("Failed to load locale '{locale}': {reason}")]
    LocaleLoad {
        /// Locale that was being loaded.
        locale: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Fetching a locale's data source did not finish in time.
    #[error("Loading locale '{locale}' timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Locale that was being loaded.
        locale: String,
        /// Configured fetch timeout.
        after: Duration,
    },

    /// IO error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP error from a remote locale source.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL for a remote locale source.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// General/unspecified error.
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the exit code for this error type.
    ///
    /// - 0: Success
    /// - 1: General error
    /// - 2: Invalid arguments or configuration
    /// - 5: Resource not found
    /// - 10: Network or IO error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) | Self::Parse(_) | Self::Url(_) => 2,
            Self::UnsupportedLocale(_) => 5,
            Self::LocaleLoad { .. } | Self::Timeout { .. } | Self::Io(_) | Self::Http(_) => 10,
            Self::Json(_) | Self::Yaml(_) | Self::Other(_) => 1,
        }
    }

    /// Returns true if the error came from fetching a locale's data.
    ///
    /// These are the failures the translator recovers from by substituting
    /// the default locale.
    pub const fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::LocaleLoad { .. } | Self::Timeout { .. } | Self::Io(_) | Self::Http(_) | Self::Json(_)
        )
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a locale load error.
    pub fn locale_load(locale: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LocaleLoad { locale: locale.into(), reason: reason.into() }
    }

    /// Create a general error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
