//! Locale codes, the supported set, and environment detection.

mod regions;

pub use regions::{browser_language_locale, country_locale, determine_locale};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::{Error, Result};

/// Default locale code used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// A short locale code such as `en`, `bn` or `zh-CN`.
///
/// Cloning is cheap; the code is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Create a locale from a code. The code is stored as given.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(Arc::from(code.as_ref()))
    }

    /// The locale code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the code as a BCP 47 language identifier.
    ///
    /// Returns `None` for codes `unic-langid` cannot parse.
    pub fn language_id(&self) -> Option<LanguageIdentifier> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self(Arc::from(code))
    }
}

/// The fixed set of supported locales with one designated default.
///
/// Invariant: the default is always a member, so every fallback path in the
/// resolver and translator ends on a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Build a locale set.
    ///
    /// Empty codes are rejected and duplicates are dropped, keeping the first
    /// occurrence. The default must be one of the locales.
    pub fn new<I, S>(locales: I, default: impl Into<Locale>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Locale>,
    {
        let default = default.into();
        let mut unique: Vec<Locale> = Vec::new();
        for locale in locales {
            let locale = locale.into();
            if locale.as_str().trim().is_empty() {
                return Err(Error::config("Locale codes must not be empty"));
            }
            if locale.as_str().contains('/') {
                return Err(Error::config(format!("Locale code '{locale}' must not contain '/'")));
            }
            if !unique.contains(&locale) {
                unique.push(locale);
            }
        }

        if !unique.contains(&default) {
            return Err(Error::config(format!(
                "Default locale '{default}' is not in the supported set [{}]",
                unique.iter().map(Locale::as_str).collect::<Vec<_>>().join(", ")
            )));
        }

        Ok(Self { locales: unique, default })
    }

    /// The designated default locale.
    pub const fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// All supported locales, in configuration order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, code: &str) -> bool {
        self.locales.iter().any(|l| l.as_str() == code)
    }

    /// Look up the supported locale with exactly this code.
    pub fn get(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.as_str() == code)
    }

    /// Return the supported locale for `code`, or the default.
    pub fn resolve(&self, code: Option<&str>) -> Locale {
        code.and_then(|c| self.get(c)).unwrap_or(&self.default).clone()
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        let default = Locale::new(DEFAULT_LOCALE);
        Self { locales: vec![default.clone()], default }
    }
}

/// Detect the user's preferred locale from environment variables.
///
/// Checks in order:
/// 1. `LINGO_LOCALE` - explicit override
/// 2. `LC_ALL` - POSIX locale override
/// 3. `LANG` - default POSIX locale
///
/// Returns `None` when nothing usable is set.
pub fn detect_env_locale() -> Option<String> {
    if let Ok(locale) = std::env::var("LINGO_LOCALE")
        && !locale.is_empty()
    {
        return Some(normalize_locale(&locale));
    }

    for var in ["LC_ALL", "LANG"] {
        if let Ok(locale) = std::env::var(var)
            && !locale.is_empty()
            && locale != "C"
            && locale != "POSIX"
        {
            return Some(normalize_locale(&locale));
        }
    }

    None
}

/// Normalize a locale string to BCP 47 format.
///
/// Examples:
/// - "en_US.UTF-8" -> "en-US"
/// - "`de_DE@euro`" -> "de-DE"
/// - "en" -> "en"
pub fn normalize_locale(locale: &str) -> String {
    let locale = locale.split(['.', '@']).next().unwrap_or(locale);
    locale.trim().replace('_', "-")
}
