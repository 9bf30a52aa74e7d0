//! Supported locale listing.

use serde::Serialize;

use crate::client::Context;
use crate::error::Result;
use crate::i18n::Locale;
use crate::output::Displayable;

#[derive(Debug, Clone, Serialize)]
struct LocaleRow {
    locale: Locale,
    default: bool,
    source: String,
}

impl Displayable for LocaleRow {
    fn table_row(&self) -> Vec<String> {
        let default_marker = if self.default { "*" } else { "" };
        vec![format!("{}{}", self.locale, default_marker), self.source.clone()]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["LOCALE", "SOURCE"]
    }
}

/// List supported locales and where each one loads from.
pub async fn locales(ctx: &Context) -> Result<()> {
    let default = ctx.locales().default_locale();
    let rows: Vec<LocaleRow> = ctx
        .locales()
        .locales()
        .iter()
        .map(|locale| LocaleRow {
            locale: locale.clone(),
            default: locale == default,
            source: ctx
                .translator
                .registry()
                .get(locale)
                .map_or_else(|| "-".to_string(), |source| source.describe(locale)),
        })
        .collect();

    ctx.output.table(&rows)
}
