//! Locale loading, caching and translation lookup.
//!
//! A [`Translator`] owns the fetch side (a [`SourceRegistry`] plus a fetch
//! timeout) and shares two stores with anyone holding a handle to them: the
//! [`LocaleCache`] of fetched tables and the [`LocaleMirror`] of seeded ones.
//!
//! Two lookup modes are offered:
//!
//! - [`Translator::lt`] is synchronous and never waits. On a cold cache it
//!   queues a background preload and answers with the fallback (or the key
//!   itself); later calls see the loaded table.
//! - [`Translator::lta`] awaits the load first, so it always answers from
//!   fresh data.
//!
//! Neither mode, nor [`Translator::load_locale_data`], ever returns an
//! error. Load failures degrade to the default locale's table and, failing
//! that, to an empty table.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use bon::bon;
use tokio::sync::mpsc;

use super::cache::{LocaleCache, LocaleMirror};
use super::locales::{Locale, LocaleSet};
use super::resolver::resolve_from_path;
use super::source::SourceRegistry;
use super::table::{KEY_SEPARATOR, LocaleTable};
use crate::error::{Error, Result};

/// Default time allowed for a single locale fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Exposes the path of the current request or page.
pub trait RouteContext: Send + Sync + fmt::Debug {
    /// The current path, e.g. `/bn/products`.
    fn current_path(&self) -> String;
}

/// A settable current path.
#[derive(Debug, Default)]
pub struct CurrentPath {
    path: RwLock<String>,
}

impl CurrentPath {
    /// Create a route context pointing at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: RwLock::new(path.into()) }
    }

    /// Navigate to a new path.
    pub fn set(&self, path: impl Into<String>) {
        *self.path.write().unwrap_or_else(PoisonError::into_inner) = path.into();
    }
}

impl RouteContext for CurrentPath {
    fn current_path(&self) -> String {
        self.path.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Loads, caches and looks up locale tables.
///
/// Cloning is cheap; clones share the cache, mirror and background worker.
/// The worker stops once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct Translator {
    shared: Arc<Shared>,
    preload_tx: mpsc::UnboundedSender<Locale>,
}

#[derive(Debug)]
struct Shared {
    locales: LocaleSet,
    registry: SourceRegistry,
    cache: LocaleCache,
    mirror: LocaleMirror,
    route: Option<Arc<dyn RouteContext>>,
    fetch_timeout: Duration,
    pending: Mutex<HashSet<Locale>>,
}

#[bon]
impl Translator {
    /// Build a translator.
    ///
    /// The background preload worker is spawned on the current tokio
    /// runtime. Without a runtime no worker runs and [`lt`](Self::lt) only
    /// answers from already-loaded data.
    #[builder]
    pub fn new(
        locales: LocaleSet,
        registry: SourceRegistry,
        #[builder(default)] cache: LocaleCache,
        #[builder(default)] mirror: LocaleMirror,
        route: Option<Arc<dyn RouteContext>>,
        #[builder(default = DEFAULT_FETCH_TIMEOUT)] fetch_timeout: Duration,
    ) -> Self {
        let shared = Arc::new(Shared {
            locales,
            registry,
            cache,
            mirror,
            route,
            fetch_timeout,
            pending: Mutex::new(HashSet::new()),
        });

        let (preload_tx, preload_rx) = mpsc::unbounded_channel();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(preload_worker(Arc::clone(&shared), preload_rx));
            }
            Err(_) => tracing::debug!("No tokio runtime; background preloading disabled"),
        }

        Self { shared, preload_tx }
    }
}

impl Translator {
    /// The supported locales.
    pub fn locales(&self) -> &LocaleSet {
        &self.shared.locales
    }

    /// The shared cache of fetched tables.
    pub fn cache(&self) -> &LocaleCache {
        &self.shared.cache
    }

    /// The shared mirror of seeded tables.
    pub fn mirror(&self) -> &LocaleMirror {
        &self.shared.mirror
    }

    /// The registry of locale loaders.
    pub fn registry(&self) -> &SourceRegistry {
        &self.shared.registry
    }

    /// Time allowed for a single fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.shared.fetch_timeout
    }

    /// The locale of the current route.
    ///
    /// The first path segment if it is a supported locale, otherwise the
    /// default. Without a route context the default is used.
    pub fn active_locale(&self) -> Locale {
        self.shared.active_locale()
    }

    /// Load a locale's table, from cache when possible.
    ///
    /// On a miss the table is fetched and cached under `locale`. If the fetch
    /// fails (or times out) for a non-default locale, the default locale's
    /// table is loaded and cached under the default instead, and `locale`'s
    /// slot stays empty so a later call retries. If the default itself
    /// cannot be loaded an empty table is returned and nothing is cached.
    pub async fn load_locale_data(&self, locale: &Locale) -> LocaleTable {
        self.shared.load_locale_data(locale).await
    }

    /// Warm the cache for one locale.
    pub async fn preload_locale(&self, locale: &Locale) {
        self.shared.load_locale_data(locale).await;
    }

    /// Warm the cache for the current route's locale.
    pub async fn preload_current_locale(&self) {
        let locale = self.active_locale();
        self.preload_locale(&locale).await;
    }

    /// Warm the cache for every supported locale concurrently.
    pub async fn preload_all(&self) {
        let loads = self.shared.locales.locales().iter().map(|l| self.preload_locale(l));
        futures::future::join_all(loads).await;
    }

    /// Synchronous, best-effort lookup.
    ///
    /// Looks `key` up in the mirror, then in the cache, for `locale` (or the
    /// active locale). When neither store holds a table for the locale a
    /// background preload is queued. Missing translations resolve to
    /// `fallback`, or to `key` itself.
    pub fn lt(&self, key: &str, fallback: Option<&str>, locale: Option<&Locale>) -> String {
        let locale = self.shared.resolve_locale(locale);

        let mirrored = self.shared.mirror.get(&locale);
        if let Some(value) = mirrored.as_ref().and_then(|t| t.get(key)) {
            return value.to_string();
        }

        match self.shared.cache.get(&locale) {
            Some(table) => {
                if let Some(value) = table.get(key) {
                    return value.to_string();
                }
            }
            None if mirrored.is_none() => self.request_preload(locale),
            None => {}
        }

        fallback.unwrap_or(key).to_string()
    }

    /// Fresh lookup in the active locale.
    ///
    /// Always awaits [`load_locale_data`](Self::load_locale_data), then
    /// resolves `key` as a dotted path. Missing translations resolve to
    /// `fallback`, then the last dotted segment of `key`, then `key`.
    pub async fn lta(&self, key: &str, fallback: Option<&str>) -> String {
        let locale = self.active_locale();
        self.lta_in(&locale, key, fallback).await
    }

    /// [`lta`](Self::lta) for an explicit locale.
    ///
    /// Locales outside the supported set resolve to the default.
    pub async fn lta_in(&self, locale: &Locale, key: &str, fallback: Option<&str>) -> String {
        let locale = self.shared.resolve_locale(Some(locale));
        let table = self.shared.load_locale_data(&locale).await;

        if let Some(value) = table.get_path(key).or_else(|| table.get(key)) {
            return value.to_string();
        }
        if let Some(fallback) = fallback {
            return fallback.to_string();
        }
        match key.rsplit(KEY_SEPARATOR).next() {
            Some(last) if !last.is_empty() => last.to_string(),
            _ => key.to_string(),
        }
    }

    /// Drop every fetched table. Seeded mirror data is kept.
    pub fn clear_locale_cache(&self) {
        tracing::debug!("Clearing locale cache");
        self.shared.cache.clear();
    }

    /// Seed the mirror with a table that was obtained elsewhere.
    pub fn seed_mirror(&self, table: LocaleTable) {
        tracing::debug!(locale = %table.locale(), keys = table.len(), "Seeding locale mirror");
        self.shared.mirror.seed(table.locale().clone(), table);
    }

    /// True while a background preload for `locale` is queued or running.
    pub fn is_preload_pending(&self, locale: &Locale) -> bool {
        self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner).contains(locale)
    }

    fn request_preload(&self, locale: Locale) {
        let newly_pending = self
            .shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(locale.clone());
        if !newly_pending {
            return;
        }

        tracing::debug!(locale = %locale, "Queueing background preload");
        if let Err(mpsc::error::SendError(locale)) = self.preload_tx.send(locale) {
            self.shared.finish_preload(&locale);
        }
    }
}

impl Shared {
    fn active_locale(&self) -> Locale {
        self.route
            .as_ref()
            .map(|route| route.current_path())
            .and_then(|path| resolve_from_path(&path, &self.locales).cloned())
            .unwrap_or_else(|| self.locales.default_locale().clone())
    }

    fn resolve_locale(&self, locale: Option<&Locale>) -> Locale {
        match locale {
            Some(locale) => self.locales.resolve(Some(locale.as_str())),
            None => self.active_locale(),
        }
    }

    async fn load_locale_data(&self, locale: &Locale) -> LocaleTable {
        let err = match self.load_exact(locale).await {
            Ok(table) => return table,
            Err(err) => err,
        };

        let default = self.locales.default_locale();
        if locale == default {
            tracing::error!(locale = %locale, error = %err, "Failed to load default locale");
            return LocaleTable::empty(default.clone());
        }

        tracing::warn!(
            locale = %locale,
            fallback = %default,
            error = %err,
            "Failed to load locale, falling back to default"
        );
        match self.load_exact(default).await {
            Ok(table) => table,
            Err(err) => {
                tracing::error!(locale = %default, error = %err, "Failed to load default locale");
                LocaleTable::empty(default.clone())
            }
        }
    }

    async fn load_exact(&self, locale: &Locale) -> Result<LocaleTable> {
        if let Some(table) = self.cache.get(locale) {
            tracing::debug!(locale = %locale, "Locale cache hit");
            return Ok(table);
        }

        tracing::debug!(locale = %locale, "Locale cache miss, fetching");
        let table = match tokio::time::timeout(self.fetch_timeout, self.registry.fetch(locale)).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Timeout {
                    locale: locale.to_string(),
                    after: self.fetch_timeout,
                });
            }
        };

        self.cache.insert(locale.clone(), table.clone());
        tracing::debug!(locale = %locale, keys = table.len(), "Cached locale");
        Ok(table)
    }

    fn finish_preload(&self, locale: &Locale) {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).remove(locale);
    }
}

async fn preload_worker(shared: Arc<Shared>, mut rx: mpsc::UnboundedReceiver<Locale>) {
    while let Some(locale) = rx.recv().await {
        shared.load_locale_data(&locale).await;
        shared.finish_preload(&locale);
        tracing::debug!(locale = %locale, "Background preload finished");
    }
    tracing::debug!("Preload worker stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;
    use serde_json::{Value, json};

    use super::*;
    use crate::i18n::source::{LocaleSource, MemorySource};

    /// Memory source that counts fetches and can be slowed down.
    #[derive(Debug, Default)]
    struct CountingSource {
        inner: MemorySource,
        fetches: AtomicUsize,
        delay: Option<Duration>,
    }

    impl CountingSource {
        fn new(documents: &[(&str, Value)]) -> Self {
            let inner = documents
                .iter()
                .fold(MemorySource::new(), |source, (locale, doc)| source.with(*locale, doc.clone()));
            Self { inner, ..Self::default() }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl LocaleSource for CountingSource {
        fn fetch<'a>(&'a self, locale: &'a Locale) -> BoxFuture<'a, Result<LocaleTable>> {
            Box::pin(async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.inner.fetch(locale).await
            })
        }

        fn describe(&self, _locale: &Locale) -> String {
            "counting".to_string()
        }
    }

    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "bn"], "en").unwrap()
    }

    fn documents() -> Vec<(&'static str, Value)> {
        vec![
            ("en", json!({ "home": "Home", "nav": { "about": "About" } })),
            ("bn", json!({ "home": "হোম" })),
        ]
    }

    /// Registry with `en`, `bn` and a broken `xx` all served by `source`.
    fn registry(source: &Arc<CountingSource>) -> SourceRegistry {
        let source: Arc<dyn LocaleSource> = Arc::clone(source) as Arc<dyn LocaleSource>;
        SourceRegistry::uniform(&[Locale::new("en"), Locale::new("bn"), Locale::new("xx")], source)
    }

    fn translator(source: &Arc<CountingSource>) -> Translator {
        Translator::builder().locales(locales()).registry(registry(source)).build()
    }

    async fn wait_for_cache(translator: &Translator, locale: &Locale) {
        for _ in 0..100 {
            if translator.cache().contains(locale) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("locale {locale} was never cached");
    }

    #[tokio::test]
    async fn test_load_caches_and_does_not_refetch() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let bn = Locale::new("bn");

        let first = t.load_locale_data(&bn).await;
        let second = t.load_locale_data(&bn).await;

        assert_eq!(first.get("home"), Some("হোম"));
        assert!(first.ptr_eq(&second));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_failed_locale_falls_back_to_default() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let xx = Locale::new("xx");

        let table = t.load_locale_data(&xx).await;

        assert_eq!(table.locale().as_str(), "en");
        assert_eq!(table.get("home"), Some("Home"));
        assert!(!t.cache().contains(&xx));
        assert!(t.cache().contains(&Locale::new("en")));
    }

    #[tokio::test]
    async fn test_unregistered_locale_falls_back_to_default() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);

        let table = t.load_locale_data(&Locale::new("fr")).await;
        assert_eq!(table.locale().as_str(), "en");
        assert!(!t.cache().contains(&Locale::new("fr")));
    }

    #[tokio::test]
    async fn test_failed_locale_is_retried_later() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let xx = Locale::new("xx");

        t.load_locale_data(&xx).await;
        t.load_locale_data(&xx).await;

        // xx twice, en once (second time from cache).
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn test_default_failure_yields_empty_table() {
        let source = Arc::new(CountingSource::new(&[("bn", json!({ "home": "হোম" }))]));
        let t = translator(&source);

        let table = t.load_locale_data(&Locale::new("xx")).await;
        assert!(table.is_empty());
        assert_eq!(table.locale().as_str(), "en");
        assert!(t.cache().is_empty());

        assert_eq!(t.lta_in(&Locale::new("en"), "nav.about", None).await, "about");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let slow = Arc::new(CountingSource {
            delay: Some(Duration::from_secs(30)),
            ..CountingSource::new(&documents())
        });
        let fast: Arc<dyn LocaleSource> =
            Arc::new(MemorySource::new().with("en", json!({ "home": "Home" })));
        let registry = SourceRegistry::new()
            .with("en", fast)
            .with("bn", Arc::clone(&slow) as Arc<dyn LocaleSource>);
        let t = Translator::builder()
            .locales(locales())
            .registry(registry)
            .fetch_timeout(Duration::from_millis(100))
            .build();

        let table = t.load_locale_data(&Locale::new("bn")).await;
        assert_eq!(table.locale().as_str(), "en");
        assert!(!t.cache().contains(&Locale::new("bn")));
        assert_eq!(slow.fetches(), 1);
    }

    #[tokio::test]
    async fn test_lt_cold_cache_returns_fallback_then_value() {
        let source = Arc::new(CountingSource::new(&documents()));
        let route = Arc::new(CurrentPath::new("/bn/products"));
        let t = Translator::builder()
            .locales(locales())
            .registry(registry(&source))
            .route(Arc::clone(&route) as Arc<dyn RouteContext>)
            .build();

        assert_eq!(t.lt("home", Some("Home"), None), "Home");
        assert_eq!(t.lt("missing.key", None, None), "missing.key");

        t.preload_current_locale().await;
        assert_eq!(t.lt("home", Some("Home"), None), "হোম");
    }

    #[tokio::test]
    async fn test_lt_triggers_background_preload() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let bn = Locale::new("bn");

        assert_eq!(t.lt("home", Some("Home"), Some(&bn)), "Home");
        assert_eq!(t.lt("home", Some("Home"), Some(&bn)), "Home");
        wait_for_cache(&t, &bn).await;

        assert_eq!(t.lt("home", None, Some(&bn)), "হোম");
        assert_eq!(source.fetches(), 1);
        assert!(!t.is_preload_pending(&bn));
    }

    #[tokio::test]
    async fn test_lt_prefers_mirror() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let en = Locale::new("en");

        t.seed_mirror(LocaleTable::from_pairs(en.clone(), [("home", "Mirrored")]));
        assert_eq!(t.lt("home", None, Some(&en)), "Mirrored");
        // Mirror holds a table for en, so no preload is queued for a missing key.
        assert_eq!(t.lt("other", Some("Other"), Some(&en)), "Other");
        assert!(!t.is_preload_pending(&en));

        t.load_locale_data(&en).await;
        assert_eq!(t.lt("home", None, Some(&en)), "Mirrored");
    }

    #[tokio::test]
    async fn test_lt_unsupported_locale_uses_default() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        t.preload_locale(&Locale::new("en")).await;

        assert_eq!(t.lt("home", None, Some(&Locale::new("fr"))), "Home");
    }

    #[tokio::test]
    async fn test_lta_lookup_chain() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);

        assert_eq!(t.lta("nav.about", None).await, "About");
        assert_eq!(t.lta("nav.contact", Some("Contact us")).await, "Contact us");
        assert_eq!(t.lta("footer.copyright", None).await, "copyright");
        assert_eq!(t.lta("trailing.", None).await, "trailing.");
    }

    #[tokio::test]
    async fn test_lta_follows_route() {
        let source = Arc::new(CountingSource::new(&documents()));
        let route = Arc::new(CurrentPath::new("/"));
        let t = Translator::builder()
            .locales(locales())
            .registry(registry(&source))
            .route(Arc::clone(&route) as Arc<dyn RouteContext>)
            .build();

        assert_eq!(t.lta("home", None).await, "Home");
        route.set("/bn/about");
        assert_eq!(t.active_locale().as_str(), "bn");
        assert_eq!(t.lta("home", None).await, "হোম");
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let en = Locale::new("en");

        t.preload_all().await;
        assert_eq!(t.cache().len(), 2);

        t.seed_mirror(LocaleTable::from_pairs(en.clone(), [("home", "Seeded")]));
        t.clear_locale_cache();
        assert!(t.cache().is_empty());
        assert!(t.mirror().get(&en).is_some());

        t.load_locale_data(&en).await;
        assert_eq!(source.fetches(), 3);
    }

    #[test]
    fn test_without_runtime_lt_still_answers() {
        let source = Arc::new(CountingSource::new(&documents()));
        let t = translator(&source);
        let bn = Locale::new("bn");

        assert_eq!(t.lt("home", Some("Home"), Some(&bn)), "Home");
        assert!(!t.is_preload_pending(&bn));
    }
}
