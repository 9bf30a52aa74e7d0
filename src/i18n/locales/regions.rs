//! Locale detection from a browser language and a country code.
//!
//! Used when there is no request header to negotiate against, e.g. when a
//! client reports `navigator.language` and an IP-derived country.

use super::{Locale, LocaleSet, normalize_locale};

/// Browser language tag to locale code.
const BROWSER_LANGUAGES: &[(&str, &str)] = &[
    ("en", "en"),
    ("en-US", "en"),
    ("en-GB", "en"),
    ("en-CA", "en"),
    ("en-AU", "en"),
    ("es", "es"),
    ("es-ES", "es"),
    ("es-MX", "es"),
    ("es-AR", "es"),
    ("fr", "fr"),
    ("fr-FR", "fr"),
    ("fr-CA", "fr"),
    ("de", "de"),
    ("de-DE", "de"),
    ("de-AT", "de"),
    ("pt", "pt"),
    ("pt-BR", "pt"),
    ("pt-PT", "pt"),
    ("zh", "zh-CN"),
    ("zh-CN", "zh-CN"),
    ("zh-TW", "zh-TW"),
    ("zh-HK", "zh-CN"),
    ("ja", "ja"),
    ("ko", "ko"),
    ("ar", "ar"),
    ("hi", "hi"),
    ("bn", "bn"),
    ("ur", "ur"),
    ("ru", "ru"),
    ("it", "it"),
    ("nl", "nl"),
    ("sv", "sv"),
    ("da", "da"),
    ("no", "no"),
    ("fi", "fi"),
    ("pl", "pl"),
    ("tr", "tr"),
    ("el", "el"),
    ("th", "th"),
    ("vi", "vi"),
    ("id", "id"),
    ("ms", "ms"),
    ("he", "iw"),
    ("fa", "fa"),
    ("uk", "uk"),
    ("cs", "cs"),
    ("sk", "sk"),
    ("hu", "hu"),
    ("ro", "ro"),
    ("bg", "bg"),
    ("hr", "hr"),
    ("sr", "sr"),
    ("sl", "sl"),
    ("et", "et"),
    ("lv", "lv"),
    ("lt", "lt"),
    ("mt", "mt"),
    ("is", "is"),
    ("ga", "ga"),
    ("cy", "cy"),
    ("eu", "eu"),
    ("ca", "ca"),
    ("gl", "gl"),
];

/// ISO 3166-1 alpha-2 country code to the locale most commonly spoken there.
const COUNTRIES: &[(&str, &str)] = &[
    // English
    ("US", "en"),
    ("GB", "en"),
    ("CA", "en"),
    ("AU", "en"),
    ("NZ", "en"),
    ("IE", "en"),
    ("ZA", "en"),
    // Arabic
    ("SA", "ar"),
    ("AE", "ar"),
    ("EG", "ar"),
    ("MA", "ar"),
    ("DZ", "ar"),
    ("TN", "ar"),
    ("LY", "ar"),
    ("SY", "ar"),
    ("JO", "ar"),
    ("LB", "ar"),
    ("IQ", "ar"),
    ("KW", "ar"),
    ("QA", "ar"),
    ("BH", "ar"),
    ("OM", "ar"),
    ("YE", "ar"),
    ("PS", "ar"),
    ("SO", "ar"),
    ("SD", "ar"),
    ("DJ", "ar"),
    ("KM", "ar"),
    ("MR", "ar"),
    ("TD", "ar"),
    // Spanish
    ("ES", "es"),
    ("MX", "es"),
    ("AR", "es"),
    ("CO", "es"),
    ("PE", "es"),
    ("VE", "es"),
    ("CL", "es"),
    ("EC", "es"),
    ("BO", "es"),
    ("PY", "es"),
    ("UY", "es"),
    ("CR", "es"),
    ("PA", "es"),
    ("DO", "es"),
    ("CU", "es"),
    ("GT", "es"),
    ("HN", "es"),
    ("SV", "es"),
    ("NI", "es"),
    ("GQ", "es"),
    // Portuguese
    ("BR", "pt"),
    ("PT", "pt"),
    ("AO", "pt"),
    ("MZ", "pt"),
    ("GW", "pt"),
    ("ST", "pt"),
    ("CV", "pt"),
    ("TL", "pt"),
    ("MO", "pt"),
    // French
    ("FR", "fr"),
    ("MC", "fr"),
    ("SN", "fr"),
    ("CI", "fr"),
    ("ML", "fr"),
    ("BF", "fr"),
    ("NE", "fr"),
    ("GN", "fr"),
    ("CM", "fr"),
    ("CF", "fr"),
    ("CG", "fr"),
    ("GA", "fr"),
    ("BI", "fr"),
    ("RW", "fr"),
    ("VU", "fr"),
    ("NC", "fr"),
    ("PF", "fr"),
    ("WF", "fr"),
    ("RE", "fr"),
    ("YT", "fr"),
    ("GP", "fr"),
    ("MQ", "fr"),
    ("GF", "fr"),
    ("PM", "fr"),
    // German
    ("DE", "de"),
    ("AT", "de"),
    ("LI", "de"),
    // Asia
    ("CN", "zh-CN"),
    ("TW", "zh-TW"),
    ("HK", "zh-CN"),
    ("SG", "zh-CN"),
    ("JP", "ja"),
    ("KR", "ko"),
    ("IN", "hi"),
    ("BD", "bn"),
    ("PK", "ur"),
    ("TH", "th"),
    ("VN", "vi"),
    ("ID", "id"),
    ("MY", "ms"),
    ("PH", "tl"),
    ("MM", "my"),
    ("KH", "km"),
    ("LA", "lo"),
    ("MN", "mn"),
    ("KZ", "kk"),
    ("KG", "ky"),
    ("TJ", "tg"),
    ("TM", "tk"),
    ("UZ", "uz"),
    ("AF", "fa"),
    ("IR", "fa"),
    ("AM", "hy"),
    ("AZ", "az"),
    ("GE", "ka"),
    // Europe
    ("RU", "ru"),
    ("BY", "be"),
    ("UA", "uk"),
    ("PL", "pl"),
    ("CZ", "cs"),
    ("SK", "sk"),
    ("HU", "hu"),
    ("RO", "ro"),
    ("MD", "ro"),
    ("BG", "bg"),
    ("HR", "hr"),
    ("RS", "sr"),
    ("BA", "bs"),
    ("ME", "sr"),
    ("MK", "mk"),
    ("SI", "sl"),
    ("AL", "sq"),
    ("XK", "sq"),
    ("GR", "el"),
    ("CY", "el"),
    ("TR", "tr"),
    ("IT", "it"),
    ("SM", "it"),
    ("VA", "it"),
    ("NL", "nl"),
    ("SR", "nl"),
    ("DK", "da"),
    ("NO", "no"),
    ("SE", "sv"),
    ("FI", "fi"),
    ("IS", "is"),
    ("EE", "et"),
    ("LV", "lv"),
    ("LT", "lt"),
    // Multilingual
    ("BE", "nl"),
    ("CH", "de"),
    ("LU", "fr"),
    ("MT", "mt"),
    // Africa
    ("ET", "am"),
    ("ER", "ti"),
    ("GH", "ak"),
    ("BJ", "yo"),
    ("NG", "yo"),
    ("KE", "sw"),
    ("TZ", "sw"),
    ("UG", "sw"),
    ("ZW", "sn"),
    ("MW", "en"),
    ("BW", "en"),
    ("LS", "st"),
    ("SZ", "en"),
    ("NA", "af"),
    ("MG", "fr"),
    // Elsewhere
    ("IL", "iw"),
    ("MV", "dv"),
    ("LK", "si"),
    ("NP", "ne"),
    ("BT", "en"),
    ("FJ", "en"),
    ("TO", "en"),
    ("WS", "sm"),
];

/// Map a browser language (`navigator.language` style) to a locale code.
///
/// Tries the full tag first, then the primary language subtag. Matching is
/// case-insensitive and accepts `_` separators.
pub fn browser_language_locale(language: &str) -> Option<&'static str> {
    let normalized = normalize_locale(language);
    if normalized.is_empty() {
        return None;
    }

    let lookup = |tag: &str| {
        BROWSER_LANGUAGES
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(tag))
            .map(|(_, locale)| *locale)
    };

    lookup(normalized.as_str()).or_else(|| normalized.split('-').next().and_then(lookup))
}

/// Map a country code to a locale code.
pub fn country_locale(country: &str) -> Option<&'static str> {
    let country = country.trim().to_ascii_uppercase();
    COUNTRIES.iter().find(|(code, _)| *code == country).map(|(_, locale)| *locale)
}

/// Pick a locale from a browser language and a country code.
///
/// Browser language wins over country. A candidate is only used when it is
/// in the supported set; otherwise the set's default is returned.
pub fn determine_locale(
    browser_language: Option<&str>,
    country: Option<&str>,
    locales: &LocaleSet,
) -> Locale {
    let from_browser = browser_language.and_then(browser_language_locale);
    let from_country = country.and_then(country_locale);

    [from_browser, from_country]
        .into_iter()
        .flatten()
        .find_map(|code| locales.get(code))
        .unwrap_or_else(|| locales.default_locale())
        .clone()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "bn", "zh-CN", "fr"], "en").unwrap()
    }

    #[test]
    fn test_browser_language_full_tag() {
        assert_eq!(browser_language_locale("zh-TW"), Some("zh-TW"));
        assert_eq!(browser_language_locale("pt-BR"), Some("pt"));
    }

    #[test]
    fn test_browser_language_is_case_insensitive() {
        assert_eq!(browser_language_locale("EN-us"), Some("en"));
        assert_eq!(browser_language_locale("zh_hk"), Some("zh-CN"));
    }

    #[test]
    fn test_browser_language_primary_subtag() {
        assert_eq!(browser_language_locale("bn-IN"), Some("bn"));
        assert_eq!(browser_language_locale("he-IL"), Some("iw"));
        assert_eq!(browser_language_locale("xx-YY"), None);
        assert_eq!(browser_language_locale(""), None);
    }

    #[test]
    fn test_country_locale() {
        assert_eq!(country_locale("bd"), Some("bn"));
        assert_eq!(country_locale("FR"), Some("fr"));
        assert_eq!(country_locale("ZZ"), None);
    }

    #[test]
    fn test_country_locale_covers_smaller_countries() {
        assert_eq!(country_locale("SY"), Some("ar"));
        assert_eq!(country_locale("md"), Some("ro"));
        assert_eq!(country_locale("UY"), Some("es"));
        assert_eq!(country_locale("KH"), Some("km"));
        assert_eq!(country_locale("WS"), Some("sm"));

        let set = LocaleSet::new(["bn", "es", "ar"], "bn").unwrap();
        assert_eq!(determine_locale(None, Some("PY"), &set).as_str(), "es");
        assert_eq!(determine_locale(None, Some("OM"), &set).as_str(), "ar");
    }

    #[test]
    fn test_determine_prefers_browser_language() {
        let set = locales();
        assert_eq!(determine_locale(Some("fr-CA"), Some("BD"), &set).as_str(), "fr");
    }

    #[test]
    fn test_determine_falls_back_to_country() {
        let set = locales();
        assert_eq!(determine_locale(Some("xx"), Some("BD"), &set).as_str(), "bn");
        assert_eq!(determine_locale(None, Some("CN"), &set).as_str(), "zh-CN");
    }

    #[test]
    fn test_determine_skips_unsupported_candidates() {
        let set = locales();
        // "ja" is detected from the browser but not supported; the country still counts.
        assert_eq!(determine_locale(Some("ja"), Some("FR"), &set).as_str(), "fr");
        assert_eq!(determine_locale(Some("ja"), Some("JP"), &set).as_str(), "en");
        assert_eq!(determine_locale(None, None, &set).as_str(), "en");
    }
}
