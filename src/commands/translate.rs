//! Translation lookup and cache commands.

use std::path::Path;

use serde::Serialize;

use crate::client::Context;
use crate::error::{Error, Result};
use crate::i18n::{Locale, LocaleTable};
use crate::output::{Displayable, TableFormatter};

/// Widest translation shown in table output before truncation.
const MAX_VALUE_WIDTH: usize = 60;

#[derive(Debug, Clone, Serialize)]
struct LookupRow {
    key: String,
    locale: Locale,
    value: String,
}

impl Displayable for LookupRow {
    fn table_row(&self) -> Vec<String> {
        vec![self.key.clone(), self.value.clone()]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["KEY", "VALUE"]
    }
}

/// Options for [`get`].
#[derive(Debug)]
pub struct GetOptions<'a> {
    /// Keys to look up.
    pub keys: &'a [String],
    /// Value for missing keys.
    pub fallback: Option<&'a str>,
    /// Explicit locale.
    pub locale: Option<&'a str>,
    /// Current route path.
    pub path: &'a str,
    /// Use the synchronous accessor.
    pub no_wait: bool,
    /// JSON file to seed the mirror with.
    pub seed: Option<&'a Path>,
}

/// Look up translations.
///
/// By default every key is resolved with a fresh load. With `no_wait` only
/// data already at hand (the seeded mirror) is consulted.
pub async fn get(ctx: &Context, opts: GetOptions<'_>) -> Result<()> {
    ctx.navigate(opts.path);
    let explicit = opts.locale.map(Locale::new);
    let locale = match &explicit {
        Some(explicit) => ctx.locales().resolve(Some(explicit.as_str())),
        None => ctx.translator.active_locale(),
    };

    if let Some(explicit) = &explicit
        && &locale != explicit
    {
        ctx.output.warn(&format!("Locale '{explicit}' is not supported, using '{locale}'"));
    }

    if let Some(seed) = opts.seed {
        let bytes = tokio::fs::read(seed).await.map_err(|e| {
            Error::invalid_arg(format!("Cannot read seed file {}: {e}", seed.display()))
        })?;
        ctx.translator.seed_mirror(LocaleTable::from_slice(locale.clone(), &bytes)?);
    }

    let mut rows = Vec::with_capacity(opts.keys.len());
    for key in opts.keys {
        let value = if opts.no_wait {
            ctx.translator.lt(key, opts.fallback, Some(&locale))
        } else if explicit.is_some() {
            ctx.translator.lta_in(&locale, key, opts.fallback).await
        } else {
            ctx.translator.lta(key, opts.fallback).await
        };
        rows.push(LookupRow { key: key.clone(), locale: locale.clone(), value });
    }

    match (ctx.output.format(), rows.as_slice()) {
        (crate::output::OutputFormat::Table, [single]) => {
            println!("{}", single.value);
            Ok(())
        }
        _ => ctx.output.table(&rows),
    }
}

#[derive(Debug, Serialize)]
struct DumpResult<'a> {
    requested: &'a Locale,
    locale: &'a Locale,
    keys: std::collections::BTreeMap<&'a str, &'a str>,
}

/// Load a locale and print its flattened translations.
pub async fn dump(ctx: &Context, locale: &str) -> Result<()> {
    let requested = Locale::new(locale);
    let table = ctx.translator.load_locale_data(&requested).await;

    if table.locale() != &requested {
        ctx.output.warn(&format!(
            "Locale '{requested}' could not be loaded, showing '{}' instead",
            table.locale()
        ));
    }

    let entries = table.entries();
    match ctx.output.format() {
        crate::output::OutputFormat::Table => {
            let mut formatter = TableFormatter::new();
            formatter.headers(["KEY", "VALUE"]).max_width(1, MAX_VALUE_WIDTH);
            for (key, value) in &entries {
                formatter.row([*key, *value]);
            }
            formatter.print();
            Ok(())
        }
        _ => ctx.output.value(
            &DumpResult { requested: &requested, locale: table.locale(), keys: entries },
            "",
        ),
    }
}

#[derive(Debug, Clone, Serialize)]
struct CacheRow {
    locale: Locale,
    cached: bool,
    keys: usize,
    loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Displayable for CacheRow {
    fn table_row(&self) -> Vec<String> {
        vec![
            self.locale.to_string(),
            if self.cached { "yes" } else { "no" }.to_string(),
            self.keys.to_string(),
            self.loaded_at.map(|t| t.format("%H:%M:%S%.3f").to_string()).unwrap_or_default(),
        ]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["LOCALE", "CACHED", "KEYS", "LOADED"]
    }
}

/// Preload every supported locale and report what ended up cached.
pub async fn warm(ctx: &Context) -> Result<()> {
    let started = std::time::Instant::now();
    ctx.translator.preload_all().await;

    let rows: Vec<CacheRow> = ctx
        .locales()
        .locales()
        .iter()
        .map(|locale| {
            let table = ctx.translator.cache().get(locale);
            CacheRow {
                locale: locale.clone(),
                cached: table.is_some(),
                keys: table.as_ref().map_or(0, LocaleTable::len),
                loaded_at: table.as_ref().map(LocaleTable::loaded_at),
            }
        })
        .collect();

    let failed = rows.iter().filter(|r| !r.cached).count();
    ctx.output.table(&rows)?;

    if failed == 0 {
        ctx.output.success(&format!(
            "Warmed {} locale(s) in {}ms",
            rows.len(),
            started.elapsed().as_millis()
        ));
    } else {
        ctx.output.warn(&format!("{failed} locale(s) could not be loaded"));
    }
    Ok(())
}
