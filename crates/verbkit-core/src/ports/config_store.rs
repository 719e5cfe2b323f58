//! Configuration store port.
//!
//! Keys are dotted names (`section.name`). The store is owned by the
//! surrounding program; verbs read and write it but never cache it.

use std::collections::BTreeMap;

use super::ConfigError;

/// Key/value configuration storage.
pub trait ConfigStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` and persist it.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;

    /// Remove `key`, returning whether it existed.
    fn remove(&mut self, key: &str) -> Result<bool, ConfigError>;

    /// All pairs in key order, optionally restricted by [`key_matches`].
    fn query_pairs(&self, filter: Option<&str>) -> Vec<(String, String)>;
}

/// Whether `key` equals `filter` or lies beneath it as a dotted prefix.
///
/// `"app.name"` matches the filters `"app"` and `"app.name"` but not `"ap"`.
pub fn key_matches(key: &str, filter: &str) -> bool {
    key == filter
        || key
            .strip_prefix(filter)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Non-persistent store, used where no file should be touched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    values: BTreeMap<String, String>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with initial pairs.
    pub fn with_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key.trim().is_empty() {
            return Err(ConfigError::Malformed("empty key".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.values.remove(key).is_some())
    }

    fn query_pairs(&self, filter: Option<&str>) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(k, _)| filter.is_none_or(|f| key_matches(k, f)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches_dotted_prefix() {
        assert!(key_matches("app.name", "app"));
        assert!(key_matches("app.name", "app.name"));
        assert!(!key_matches("app.name", "ap"));
        assert!(!key_matches("application.name", "app"));
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let mut store = InMemoryConfigStore::new();
        store.set("a.b", "1").unwrap();
        assert_eq!(store.get("a.b").as_deref(), Some("1"));
        assert!(store.remove("a.b").unwrap());
        assert!(!store.remove("a.b").unwrap());
        assert!(store.get("a.b").is_none());
    }

    #[test]
    fn test_query_pairs_filters_and_orders() {
        let store = InMemoryConfigStore::with_pairs([
            ("tool.z", "26"),
            ("other.x", "1"),
            ("tool.a", "1"),
        ]);
        let pairs = store.query_pairs(Some("tool"));
        assert_eq!(
            pairs,
            vec![
                ("tool.a".to_string(), "1".to_string()),
                ("tool.z".to_string(), "26".to_string())
            ]
        );
        assert_eq!(store.query_pairs(None).len(), 3);
    }

    #[test]
    fn test_set_rejects_empty_key() {
        let mut store = InMemoryConfigStore::new();
        assert!(store.set("  ", "x").is_err());
    }
}
