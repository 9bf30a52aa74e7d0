//! Shared, in-process stores of loaded locale tables.
//!
//! Both stores are cheap-to-clone handles over the same map, so a cache can be
//! handed to several translators (or a test) and observed from all of them.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::locales::Locale;
use super::table::LocaleTable;

#[derive(Debug, Clone, Default)]
struct TableMap {
    tables: Arc<RwLock<HashMap<Locale, LocaleTable>>>,
}

impl TableMap {
    fn get(&self, locale: &Locale) -> Option<LocaleTable> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).get(locale).cloned()
    }

    fn insert(&self, locale: Locale, table: LocaleTable) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).insert(locale, table);
    }

    fn contains(&self, locale: &Locale) -> bool {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).contains_key(locale)
    }

    fn clear(&self) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> =
            self.tables.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        locales.sort();
        locales
    }

    fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Tables fetched at runtime, keyed by the locale they were requested for.
///
/// A cached table is never replaced by a failed fetch. Concurrent loads of
/// the same locale may both insert; the last writer wins, and both tables
/// are equivalent.
#[derive(Debug, Clone, Default)]
pub struct LocaleCache {
    inner: TableMap,
}

impl LocaleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached table for a locale.
    pub fn get(&self, locale: &Locale) -> Option<LocaleTable> {
        self.inner.get(locale)
    }

    /// Store a table.
    pub fn insert(&self, locale: Locale, table: LocaleTable) {
        self.inner.insert(locale, table);
    }

    /// True if a table is cached for the locale.
    pub fn contains(&self, locale: &Locale) -> bool {
        self.inner.contains(locale)
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Cached locales, sorted.
    pub fn locales(&self) -> Vec<Locale> {
        self.inner.locales()
    }

    /// Number of cached locales.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tables seeded from outside the loader, such as data rendered alongside a
/// page.
///
/// The synchronous accessor consults the mirror before the cache. Clearing
/// the cache leaves the mirror alone.
#[derive(Debug, Clone, Default)]
pub struct LocaleMirror {
    inner: TableMap,
}

impl LocaleMirror {
    /// Create an empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirrored table for a locale.
    pub fn get(&self, locale: &Locale) -> Option<LocaleTable> {
        self.inner.get(locale)
    }

    /// Seed (or replace) a locale's table.
    pub fn seed(&self, locale: Locale, table: LocaleTable) {
        self.inner.insert(locale, table);
    }

    /// Drop every mirrored table.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Mirrored locales, sorted.
    pub fn locales(&self) -> Vec<Locale> {
        self.inner.locales()
    }
}
