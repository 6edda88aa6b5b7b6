//! Explicit response cache, keyed the way the screens key their queries.
//!
//! Each entry is a whole JSON value plus a version counter and is replaced
//! atomically under one lock. Mutations enumerate the key prefixes they
//! invalidate instead of relying on naming convention.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    version: u64,
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        QueryCache::default()
    }

    /// Deserialize the cached value under `key`, if any.
    /// A value that no longer matches `T` is treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Store `value` under `key`, bumping the entry version.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
        let value =
            serde_json::to_value(value).map_err(|e| format!("Failed to cache response: {}", e))?;
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let version = entries.get(key).map(|e| e.version).unwrap_or(0) + 1;
        entries.insert(key.to_string(), CacheEntry { value, version });
        Ok(())
    }

    /// Drop every entry whose key is `prefix` or starts with `prefix:`.
    /// Returns the number of removed entries.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let scoped = format!("{}:", prefix);
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| key != prefix && !key.starts_with(&scoped));
        before - entries.len()
    }

    #[allow(dead_code)]
    pub fn version(&self, key: &str) -> Option<u64> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.get(key).map(|e| e.version)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryCache;

    #[test]
    fn put_bumps_version_and_replaces_whole_value() {
        let cache = QueryCache::new();
        cache.put("grades", &vec![1, 2, 3]).unwrap();
        assert_eq!(cache.version("grades"), Some(1));

        cache.put("grades", &vec![4]).unwrap();
        assert_eq!(cache.version("grades"), Some(2));
        assert_eq!(cache.get_as::<Vec<i32>>("grades"), Some(vec![4]));
    }

    #[test]
    fn invalidate_prefix_drops_all_pages_but_not_lookalike_keys() {
        let cache = QueryCache::new();
        cache.put("tasks:7:10:1", &"page1").unwrap();
        cache.put("tasks:7:10:2", &"page2").unwrap();
        cache.put("tasks", &"bare").unwrap();
        cache.put("taskAttachments:3", &"files").unwrap();

        let removed = cache.invalidate_prefix("tasks");
        assert_eq!(removed, 3);
        assert!(cache.get_as::<String>("tasks:7:10:1").is_none());
        assert!(cache.get_as::<String>("tasks:7:10:2").is_none());
        assert!(cache.get_as::<String>("tasks").is_none());
        assert_eq!(
            cache.get_as::<String>("taskAttachments:3"),
            Some("files".to_string())
        );
    }

    #[test]
    fn mismatched_type_reads_as_miss() {
        let cache = QueryCache::new();
        cache.put("profile:1", &"not a number").unwrap();
        assert!(cache.get_as::<u32>("profile:1").is_none());
    }
}
