//! File-backed configuration store.
//!
//! The file holds one `key=value` pair per line. Blank lines and lines
//! starting with `#` are ignored. Every change rewrites the whole file,
//! sorted by key.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use verbkit_core::ports::{ConfigError, ConfigStore, key_matches};

/// Configuration persisted to a `key=value` text file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileConfigStore {
    /// Load `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| ConfigError::Storage(format!("{}: {e}", path.display())))?;
            parse(&text)
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = values.len(), "Loaded configuration");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Storage(format!("{}: {e}", parent.display())))?;
        }
        let mut content = String::new();
        for (key, value) in &self.values {
            content.push_str(key);
            content.push('=');
            content.push_str(value);
            content.push('\n');
        }
        fs::write(&self.path, content)
            .map_err(|e| ConfigError::Storage(format!("{}: {e}", self.path.display())))
    }
}

fn parse(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Some((key.trim().to_string(), value.trim().to_string()))
            }
            _ => {
                debug!("Ignoring malformed configuration line: {}", line);
                None
            }
        })
        .collect()
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        if key.is_empty() || key.contains('=') || key.contains('\n') {
            return Err(ConfigError::Malformed(format!("invalid key \"{key}\"")));
        }
        if value.contains('\n') {
            return Err(ConfigError::Malformed(format!("value for \"{key}\" spans lines")));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<bool, ConfigError> {
        if self.values.remove(key).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn query_pairs(&self, filter: Option<&str>) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(key, _)| filter.is_none_or(|f| key_matches(key, f)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let store = FileConfigStore::open(temp.path().join("none.cfg")).unwrap();
        assert!(store.query_pairs(None).is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.cfg");
        fs::write(&path, "# settings\n\nvolt.user = admin\nnot a pair\n").unwrap();
        let store = FileConfigStore::open(&path).unwrap();
        assert_eq!(store.query_pairs(None), [("volt.user".to_string(), "admin".to_string())]);
    }

    #[test]
    fn test_set_persists_sorted() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("app.cfg");
        let mut store = FileConfigStore::open(&path).unwrap();
        store.set("b.key", "2").unwrap();
        store.set("a.key", "1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.key=1\nb.key=2\n");

        let reopened = FileConfigStore::open(&path).unwrap();
        assert_eq!(reopened.get("b.key").as_deref(), Some("2"));
    }

    #[test]
    fn test_remove_rewrites_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.cfg");
        let mut store = FileConfigStore::open(&path).unwrap();
        store.set("a.key", "1").unwrap();
        assert!(store.remove("a.key").unwrap());
        assert!(!store.remove("a.key").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_query_pairs_filters_by_dotted_prefix() {
        let temp = tempdir().unwrap();
        let mut store = FileConfigStore::open(temp.path().join("app.cfg")).unwrap();
        store.set("volt.user", "admin").unwrap();
        store.set("voltage.level", "5").unwrap();
        let pairs = store.query_pairs(Some("volt"));
        assert_eq!(pairs, [("volt.user".to_string(), "admin".to_string())]);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let temp = tempdir().unwrap();
        let mut store = FileConfigStore::open(temp.path().join("app.cfg")).unwrap();
        assert!(matches!(store.set("a=b", "1"), Err(ConfigError::Malformed(_))));
    }
}
