//! Immutable per-locale translation tables.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::locales::Locale;
use crate::error::{Error, Result};

/// Key separator for nested lookups.
pub const KEY_SEPARATOR: char = '.';

/// A locale's key/value translations.
///
/// Tables are immutable once built and cheap to clone; a reload produces a
/// new table rather than mutating an existing one. Two views are kept: the
/// JSON document as loaded (for nested dotted-path lookup) and a flattened
/// `key -> string` map.
#[derive(Debug, Clone)]
pub struct LocaleTable {
    inner: Arc<TableData>,
}

#[derive(Debug)]
struct TableData {
    locale: Locale,
    document: Value,
    flat: HashMap<String, String>,
    loaded_at: DateTime<Utc>,
}

impl LocaleTable {
    /// Build a table from a parsed JSON document.
    ///
    /// The document must be a JSON object.
    pub fn from_value(locale: Locale, document: Value) -> Result<Self> {
        if !document.is_object() {
            return Err(Error::locale_load(
                locale.as_str(),
                "locale data must be a JSON object of translations",
            ));
        }

        let flat = flatten_json(&document);
        Ok(Self { inner: Arc::new(TableData { locale, document, flat, loaded_at: Utc::now() }) })
    }

    /// Parse a table from raw JSON bytes.
    pub fn from_slice(locale: Locale, bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::locale_load(locale.as_str(), format!("malformed JSON: {e}")))?;
        Self::from_value(locale, document)
    }

    /// Build a flat table from key/value pairs.
    pub fn from_pairs<I, K, V>(locale: Locale, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: serde_json::Map<String, Value> =
            pairs.into_iter().map(|(k, v)| (k.into(), Value::String(v.into()))).collect();
        let document = Value::Object(map);
        let flat = flatten_json(&document);
        Self { inner: Arc::new(TableData { locale, document, flat, loaded_at: Utc::now() }) }
    }

    /// An empty table, used when not even the default locale can be loaded.
    pub fn empty(locale: Locale) -> Self {
        Self::from_pairs(locale, std::iter::empty::<(String, String)>())
    }

    /// The locale this table was loaded for.
    pub fn locale(&self) -> &Locale {
        &self.inner.locale
    }

    /// When the table was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.inner.loaded_at
    }

    /// Number of translated keys (after flattening).
    pub fn len(&self) -> usize {
        self.inner.flat.len()
    }

    /// True if the table has no translations.
    pub fn is_empty(&self) -> bool {
        self.inner.flat.is_empty()
    }

    /// Direct key lookup, no path traversal.
    ///
    /// A top-level key containing dots (`"nav.home": "..."`) is found here;
    /// so is a nested string addressed by its flattened path.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.flat.get(key).map(String::as_str)
    }

    /// Dotted-path lookup through nested objects.
    ///
    /// Only string leaves count as values; objects, arrays and other
    /// scalars yield `None`.
    pub fn get_path(&self, key: &str) -> Option<&str> {
        if let Some(Value::String(direct)) = self.inner.document.get(key) {
            return Some(direct.as_str());
        }

        key.split(KEY_SEPARATOR)
            .try_fold(&self.inner.document, |node, segment| node.get(segment))
            .and_then(Value::as_str)
    }

    /// True if both handles share the same underlying data.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Sorted flattened entries, for display.
    pub fn entries(&self) -> BTreeMap<&str, &str> {
        self.inner.flat.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

impl PartialEq for LocaleTable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.locale == other.inner.locale && self.inner.flat == other.inner.flat)
    }
}

/// Flatten a nested JSON document into dot-separated keys.
///
/// String leaves are kept as-is, other scalars are rendered as JSON text and
/// array elements get `[index]` suffixes. Nulls are skipped.
pub fn flatten_json(document: &Value) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_value(document, None, &mut result);
    result
}

fn flatten_value(value: &Value, prefix: Option<&str>, result: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
                flatten_value(child, Some(&full_key), result);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_value(child, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        Value::Null => {}
        other => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), other.to_string());
            }
        }
    }
}
