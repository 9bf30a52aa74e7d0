//! Route-level locale resolution.
//!
//! Decides, for an inbound request path, whether the request is left alone
//! (static asset or already localized) or redirected to a locale-prefixed
//! path. The per-request flow is:
//!
//! ```text
//! CHECK_BYPASS --bypass--> DONE
//!      |
//!      v
//! CHECK_LOCALE_PREFIX --present--> DONE
//!      |
//!      v
//! NEGOTIATE --> REDIRECT
//! ```
//!
//! Everything here is pure string work; emitting the redirect is left to
//! whatever HTTP stack hosts the resolver (see [`redirect_response`]).

use http::{HeaderValue, Response, StatusCode, Uri, header};
use serde::{Deserialize, Serialize};

use super::locales::{Locale, LocaleSet};
use super::negotiate::negotiate_locale;
use crate::error::{Error, Result};

/// Exact paths that never receive a redirect decision.
pub const DEFAULT_BYPASS_PATHS: &[&str] = &[
    "/manifest.json",
    "/favicon.ico",
    "/favicon-32x32.png",
    "/favicon-16x16.png",
    "/opengraph-image.png",
    "/Doraemon.jpg",
];

/// File extensions (without the dot) treated as static assets.
pub const DEFAULT_BYPASS_EXTENSIONS: &[&str] = &[
    "ico", "png", "jpg", "jpeg", "gif", "svg", "webp", "mp3", "mp4", "webm", "ogg", "pdf", "css",
    "js",
];

/// Path prefixes owned by the host framework (API routes, build output).
pub const DEFAULT_BYPASS_PREFIXES: &[&str] = &["/api", "/_next/static", "/_next/image", "/public/"];

/// Static-asset rules deciding which paths skip locale routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassRules {
    /// Exact path matches.
    #[serde(default = "default_bypass_paths")]
    pub paths: Vec<String>,

    /// Case-sensitive file extensions, without the leading dot.
    #[serde(default = "default_bypass_extensions")]
    pub extensions: Vec<String>,

    /// Path prefixes.
    #[serde(default = "default_bypass_prefixes")]
    pub prefixes: Vec<String>,
}

fn default_bypass_paths() -> Vec<String> {
    DEFAULT_BYPASS_PATHS.iter().map(ToString::to_string).collect()
}

fn default_bypass_extensions() -> Vec<String> {
    DEFAULT_BYPASS_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_bypass_prefixes() -> Vec<String> {
    DEFAULT_BYPASS_PREFIXES.iter().map(ToString::to_string).collect()
}

impl Default for BypassRules {
    fn default() -> Self {
        Self {
            paths: default_bypass_paths(),
            extensions: default_bypass_extensions(),
            prefixes: default_bypass_prefixes(),
        }
    }
}

impl BypassRules {
    /// True if the path is a static asset and must not be routed.
    pub fn should_bypass(&self, path: &str) -> bool {
        if self.paths.iter().any(|p| p == path) {
            return true;
        }

        if self.prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'))
        }) {
            return true;
        }

        path.rsplit_once('.').is_some_and(|(_, ext)| {
            !ext.contains('/') && self.extensions.iter().any(|e| e == ext)
        })
    }
}

/// Return true for static asset paths under the default rules.
pub fn should_bypass(path: &str) -> bool {
    BypassRules::default().should_bypass(path)
}

/// The supported locale named by the path's first segment, if any.
///
/// Never fails: empty and malformed paths simply have no locale segment.
pub fn resolve_from_path<'a>(path: &str, locales: &'a LocaleSet) -> Option<&'a Locale> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.split('/').find(|s| !s.is_empty())?;
    locales.get(segment)
}

/// Build the locale-prefixed redirect target for a path.
///
/// `/` becomes `/{locale}`; any other path becomes `/{locale}{path}` with the
/// path normalized to start with exactly one `/`.
pub fn build_redirect_target(path: &str, locale: &Locale) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{trimmed}")
    }
}

/// Rewrite a path to another locale.
///
/// Replaces the leading locale segment if the path has one, and prefixes the
/// locale otherwise. Query strings are kept.
pub fn switch_locale(path: &str, locale: &Locale, locales: &LocaleSet) -> String {
    let (path_part, suffix) = match path.find(['?', '#']) {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    };

    let trimmed = path_part.trim_start_matches('/');
    let rest = match trimmed.split_once('/') {
        Some((first, rest)) if locales.contains(first) => rest,
        None if locales.contains(trimmed) => "",
        _ => trimmed,
    };

    let target = if rest.is_empty() { format!("/{locale}") } else { format!("/{locale}/{rest}") };
    format!("{target}{suffix}")
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Static asset; no locale routing applies.
    Bypass,

    /// The path already carries a supported locale.
    Localized {
        /// The locale from the path.
        locale: Locale,
    },

    /// The path must be redirected to a locale-prefixed target.
    Redirect {
        /// The negotiated locale.
        locale: Locale,
        /// Redirect target path (without query string).
        target: String,
    },
}

impl RouteDecision {
    /// The locale the request will be served in, if one applies.
    pub const fn locale(&self) -> Option<&Locale> {
        match self {
            Self::Bypass => None,
            Self::Localized { locale } | Self::Redirect { locale, .. } => Some(locale),
        }
    }

    /// Short label for the decision.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Bypass => "bypass",
            Self::Localized { .. } => "localized",
            Self::Redirect { .. } => "redirect",
        }
    }
}

/// Locale routing for inbound requests.
#[derive(Debug, Clone, Default)]
pub struct LocaleRouter {
    locales: LocaleSet,
    bypass: BypassRules,
}

impl LocaleRouter {
    /// Create a router over a locale set with the given bypass rules.
    pub const fn new(locales: LocaleSet, bypass: BypassRules) -> Self {
        Self { locales, bypass }
    }

    /// The supported locales.
    pub const fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// The bypass rules in effect.
    pub const fn bypass_rules(&self) -> &BypassRules {
        &self.bypass
    }

    /// Run the per-request decision for a path and its `Accept-Language` value.
    pub fn decide(&self, path: &str, accept_language: Option<&str>) -> RouteDecision {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        if self.bypass.should_bypass(path) {
            tracing::debug!(path, "Bypassing static asset");
            return RouteDecision::Bypass;
        }

        if let Some(locale) = resolve_from_path(path, &self.locales) {
            return RouteDecision::Localized { locale: locale.clone() };
        }

        let locale = negotiate_locale(accept_language, &self.locales);
        let target = build_redirect_target(path, &locale);
        tracing::debug!(path, target = %target, "Redirecting to localized path");
        RouteDecision::Redirect { locale, target }
    }

    /// Route an HTTP request, returning the redirect response when one is due.
    pub fn handle<B>(&self, request: &http::Request<B>) -> Result<Option<Response<()>>> {
        let accept_language =
            request.headers().get(header::ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());

        match self.decide(request.uri().path(), accept_language) {
            RouteDecision::Redirect { target, .. } => {
                redirect_response(request.uri(), &target).map(Some)
            }
            RouteDecision::Bypass | RouteDecision::Localized { .. } => Ok(None),
        }
    }
}

/// Build a `307 Temporary Redirect` to `target`, carrying over the query
/// string of the original request URI.
pub fn redirect_response(original: &Uri, target: &str) -> Result<Response<()>> {
    let location = match original.query() {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target.to_string(),
    };
    let location = HeaderValue::from_str(&location)
        .map_err(|e| Error::invalid_arg(format!("Invalid redirect target '{location}': {e}")))?;

    Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(header::LOCATION, location)
        .body(())
        .map_err(|e| Error::other(format!("Failed to build redirect response: {e}")))
}
