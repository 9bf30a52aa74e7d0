//! Locale data sources and the locale → loader registry.
//!
//! Every loadable locale is registered explicitly, so the set of locales a
//! translator can fetch is enumerable up front. A locale with no registered
//! loader fails to load like any other fetch error.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use url::Url;

use super::locales::Locale;
use super::table::LocaleTable;
use crate::error::{Error, Result};

/// A place locale tables are fetched from.
pub trait LocaleSource: Send + Sync + fmt::Debug {
    /// Fetch and parse the table for `locale`.
    fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>>;

    /// Human-readable description of where data comes from.
    fn describe(&self, locale: &Locale) -> String;
}

/// Reads `{dir}/{locale}.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `locale`.
    pub fn path_for(&self, locale: &Locale) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }
}

impl LocaleSource for DirectorySource {
    fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>> {
        Box::pin(async move { read_table_file(locale, &self.path_for(locale)).await })
    }

    fn describe(&self, locale: &Locale) -> String {
        self.path_for(locale).display().to_string()
    }
}

/// Reads a single JSON file regardless of the locale requested.
///
/// Used for per-locale overrides whose file name does not follow the
/// `{locale}.json` convention.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for one file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocaleSource for FileSource {
    fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>> {
        Box::pin(async move { read_table_file(locale, &self.path).await })
    }

    fn describe(&self, _locale: &Locale) -> String {
        self.path.display().to_string()
    }
}

async fn read_table_file(locale: &Locale, path: &Path) -> Result<LocaleTable> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        Error::locale_load(locale.as_str(), format!("cannot read {}: {e}", path.display()))
    })?;
    LocaleTable::from_slice(locale.clone(), &bytes)
}

/// Fetches `{base_url}/{locale}.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// Create a source for a base URL.
    ///
    /// A trailing `/` is added to the base if missing so that locale file
    /// names are appended rather than replacing the last path segment.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!("'{base_url}' cannot be used as a base URL")));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    /// URL of the resource backing `locale`.
    pub fn url_for(&self, locale: &Locale) -> Result<Url> {
        Ok(self.base.join(&format!("{locale}.json"))?)
    }
}

impl LocaleSource for HttpSource {
    fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>> {
        Box::pin(async move {
            let url = self.url_for(locale)?;
            tracing::debug!(%url, "Fetching locale data");
            let response = self.client.get(url).send().await?.error_for_status()?;
            let bytes = response.bytes().await?;
            LocaleTable::from_slice(locale.clone(), &bytes)
        })
    }

    fn describe(&self, locale: &Locale) -> String {
        self.url_for(locale).map_or_else(|_| self.base.to_string(), |u| u.to_string())
    }
}

/// In-memory JSON documents keyed by locale.
///
/// Useful for embedded translations and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<Locale, Value>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the document for a locale.
    pub fn with(mut self, locale: impl Into<Locale>, document: Value) -> Self {
        self.documents.insert(locale.into(), document);
        self
    }
}

impl LocaleSource for MemorySource {
    fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>> {
        Box::pin(async move {
            let document = self
                .documents
                .get(locale)
                .cloned()
                .ok_or_else(|| Error::locale_load(locale.as_str(), "no in-memory data"))?;
            LocaleTable::from_value(locale.clone(), document)
        })
    }

    fn describe(&self, _locale: &Locale) -> String {
        "memory".to_string()
    }
}

/// Maps each loadable locale to its loader.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    loaders: HashMap<Locale, Arc<dyn LocaleSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one source for every locale in `locales`.
    pub fn uniform<'a>(
        locales: impl IntoIterator<Item = &'a Locale>,
        source: Arc<dyn LocaleSource>,
    ) -> Self {
        let loaders = locales.into_iter().map(|l| (l.clone(), Arc::clone(&source))).collect();
        Self { loaders }
    }

    /// Register (or replace) the loader for a locale.
    pub fn register(&mut self, locale: impl Into<Locale>, source: Arc<dyn LocaleSource>) {
        self.loaders.insert(locale.into(), source);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, locale: impl Into<Locale>, source: Arc<dyn LocaleSource>) -> Self {
        self.register(locale, source);
        self
    }

    /// The loader for a locale.
    pub fn get(&self, locale: &Locale) -> Option<&Arc<dyn LocaleSource>> {
        self.loaders.get(locale)
    }

    /// True if a loader is registered for the locale.
    pub fn contains(&self, locale: &Locale) -> bool {
        self.loaders.contains_key(locale)
    }

    /// Registered locales, sorted.
    pub fn locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<&Locale> = self.loaders.keys().collect();
        locales.sort();
        locales
    }

    /// Fetch a locale through its registered loader.
    pub async fn fetch(&self, locale: &Locale) -> Result<LocaleTable> {
        let source = self.get(locale).ok_or_else(|| {
            Error::locale_load(locale.as_str(), "no data source registered for this locale")
        })?;
        source.fetch(locale).await
    }
}
