//! `Accept-Language` parsing and locale negotiation.
//!
//! Header parsing is lenient: malformed ranges are skipped rather than
//! rejected, and negotiation always ends on a supported locale because the
//! default is the guaranteed fallback.

use std::cmp::Ordering;

use unic_langid::LanguageIdentifier;

use super::locales::{Locale, LocaleSet};

/// A single weighted language range from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// The range as written, e.g. `bn-BD` or `*`.
    pub tag: String,
    /// Quality value in `0.0..=1.0`.
    pub quality: f32,
}

impl LanguageRange {
    /// True for the `*` wildcard range.
    pub fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }
}

/// Parse an `Accept-Language` header value into ranges ordered by preference.
///
/// Ranges are sorted by quality, highest first; equal qualities keep header
/// order. Ranges with `q=0`, an unparsable or out-of-range `q`, or an empty
/// tag are dropped.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let tag = params.next()?.trim();
            if tag.is_empty() || tag.contains(char::is_whitespace) {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in params {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q))?;
                }
            }

            (quality > 0.0).then(|| LanguageRange { tag: tag.to_string(), quality })
        })
        .collect();

    // sort_by is stable, so equal qualities keep header order.
    ranges.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal));
    ranges
}

/// Negotiate the best supported locale for an `Accept-Language` header.
///
/// For each range in preference order the first supported locale matching
/// it is chosen, trying in turn:
/// 1. an exact, case-insensitive tag match (`en-us` matches `en-US`)
/// 2. the range with its region stripped (`bn-BD` matches `bn`)
/// 3. the same primary language (`zh` matches `zh-CN`)
///
/// `*` selects the default. When nothing matches, or the header is absent or
/// malformed, the default is returned.
pub fn negotiate_locale(header: Option<&str>, locales: &LocaleSet) -> Locale {
    let Some(header) = header else {
        return locales.default_locale().clone();
    };

    for range in parse_accept_language(header) {
        if range.is_wildcard() {
            return locales.default_locale().clone();
        }
        if let Some(locale) = match_range(&range.tag, locales) {
            tracing::debug!(range = %range.tag, locale = %locale, "Negotiated locale");
            return locale.clone();
        }
    }

    locales.default_locale().clone()
}

/// Find the supported locale that best matches one language range.
fn match_range<'a>(tag: &str, locales: &'a LocaleSet) -> Option<&'a Locale> {
    if let Some(exact) = locales.locales().iter().find(|l| l.as_str().eq_ignore_ascii_case(tag)) {
        return Some(exact);
    }

    let base = without_extensions(tag);
    if base.is_empty() {
        return None;
    }
    let primary = base.split('-').next().unwrap_or_default();
    let requested: LanguageIdentifier = base.parse().or_else(|_| primary.parse()).ok()?;

    let language_only = |locale: &Locale| {
        locale.language_id().is_some_and(|id| {
            id.language == requested.language && id.script.is_none() && id.region.is_none()
        })
    };
    if let Some(locale) = locales.locales().iter().find(|l| language_only(*l)) {
        return Some(locale);
    }

    locales
        .locales()
        .iter()
        .find(|l| l.language_id().is_some_and(|id| id.language == requested.language))
}

/// Drop extension and private-use subtags (`-u-…`, `-x-…`) from a range.
fn without_extensions(tag: &str) -> String {
    tag.split('-').take_while(|subtag| subtag.len() > 1).collect::<Vec<_>>().join("-")
}
