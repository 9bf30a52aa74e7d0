//! Request routing commands.

use serde::Serialize;

use crate::client::Context;
use crate::error::{Error, Result};
use crate::i18n::{
    LanguageRange, Locale, RouteDecision, browser_language_locale, country_locale,
    detect_env_locale, determine_locale, negotiate_locale, parse_accept_language, switch_locale,
};
use crate::output::Displayable;

#[derive(Debug, Serialize)]
struct RouteResult<'a> {
    path: &'a str,
    #[serde(flatten)]
    decision: RouteDecision,
    /// Full `Location` header value, including any query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

/// Run the per-request routing decision for a path.
pub async fn route(ctx: &Context, path: &str, accept_language: Option<&str>) -> Result<()> {
    // A bare `products` would otherwise parse as an authority with an empty path.
    let rooted = with_leading_slash(path);
    let path = rooted.as_str();
    // Paths `http` cannot parse are still routed, just without a Location header.
    let uri = path.parse::<http::Uri>().ok();
    let decision = ctx.router.decide(uri.as_ref().map_or(path, http::Uri::path), accept_language);

    let location = match (&decision, &uri) {
        (RouteDecision::Redirect { target, .. }, Some(uri)) => {
            let response = crate::i18n::redirect_response(uri, target)?;
            response
                .headers()
                .get(http::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        }
        _ => None,
    };

    let text = match (&decision, &location) {
        (RouteDecision::Bypass, _) => format!("bypass {path}"),
        (RouteDecision::Localized { locale }, _) => format!("localized {path} ({locale})"),
        (RouteDecision::Redirect { locale, .. }, Some(location)) => {
            format!("redirect {path} -> {location} ({locale})")
        }
        (RouteDecision::Redirect { locale, target }, None) => {
            format!("redirect {path} -> {target} ({locale})")
        }
    };

    ctx.output.value(&RouteResult { path, decision, location }, &text)
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, Serialize)]
struct NegotiateResult {
    header: Option<String>,
    locale: Locale,
    ranges: Vec<RangeRow>,
}

#[derive(Debug, Clone, Serialize)]
struct RangeRow {
    tag: String,
    quality: f32,
}

impl From<LanguageRange> for RangeRow {
    fn from(range: LanguageRange) -> Self {
        Self { tag: range.tag, quality: range.quality }
    }
}

/// Negotiate a locale from an `Accept-Language` value.
pub async fn negotiate(ctx: &Context, header: Option<&str>) -> Result<()> {
    let header = header.map(String::from).or_else(detect_env_locale);
    let locale = negotiate_locale(header.as_deref(), ctx.locales());
    let ranges: Vec<RangeRow> = header
        .as_deref()
        .map(parse_accept_language)
        .unwrap_or_default()
        .into_iter()
        .map(RangeRow::from)
        .collect();

    let text = locale.to_string();
    ctx.output.value(&NegotiateResult { header, locale, ranges }, &text)
}

/// Rewrite a path to another locale.
pub async fn switch(ctx: &Context, path: &str, locale: &str) -> Result<()> {
    let locale = ctx
        .locales()
        .get(locale)
        .ok_or_else(|| Error::UnsupportedLocale(locale.to_string()))?;
    let target = switch_locale(path, locale, ctx.locales());

    #[derive(Serialize)]
    struct SwitchResult<'a> {
        path: &'a str,
        locale: &'a Locale,
        target: &'a str,
    }

    ctx.output.value(&SwitchResult { path, locale, target: &target }, &target)
}

#[derive(Debug, Clone, Serialize)]
struct DetectRow {
    input: String,
    value: String,
    candidate: String,
}

impl Displayable for DetectRow {
    fn table_row(&self) -> Vec<String> {
        vec![self.input.clone(), self.value.clone(), self.candidate.clone()]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["INPUT", "VALUE", "CANDIDATE"]
    }
}

/// Detect a locale from a browser language and a country code.
pub async fn detect(ctx: &Context, browser_lang: Option<&str>, country: Option<&str>) -> Result<()> {
    let browser_lang = browser_lang.map(String::from).or_else(|| {
        // Nothing given at all: treat the shell's locale as the browser language.
        if country.is_none() { detect_env_locale() } else { None }
    });

    let locale = determine_locale(browser_lang.as_deref(), country, ctx.locales());

    let mut rows = Vec::new();
    if let Some(lang) = &browser_lang {
        rows.push(DetectRow {
            input: "browser language".to_string(),
            value: lang.clone(),
            candidate: browser_language_locale(lang).unwrap_or("-").to_string(),
        });
    }
    if let Some(code) = country {
        rows.push(DetectRow {
            input: "country".to_string(),
            value: code.to_string(),
            candidate: country_locale(code).unwrap_or("-").to_string(),
        });
    }

    match ctx.output.format() {
        crate::output::OutputFormat::Table => {
            if !rows.is_empty() && !ctx.output.is_quiet() {
                ctx.output.table(&rows)?;
                println!();
            }
            println!("{locale}");
            Ok(())
        }
        _ => {
            #[derive(Serialize)]
            struct DetectResult {
                locale: Locale,
                inputs: Vec<DetectRow>,
            }
            ctx.output.value(&DetectResult { locale, inputs: rows }, "")
        }
    }
}
