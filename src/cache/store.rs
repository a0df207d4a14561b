use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use crate::translation::fingerprint;

/// A completed translation, immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The full translated text.
    pub content: String,
    /// When the translation completed.
    pub timestamp: SystemTime,
    /// Identifier of the source document (file path, URI, ...).
    pub source_identifier: String,
    /// Target language the content was translated into.
    pub target_language: String,
}

/// Builds the composite cache key for a document/language/content triple.
///
/// Format: `{source_identifier}-{target_language}-{fingerprint}`. The key is
/// the hit/miss contract: an unchanged document translated to the same
/// language always maps to the same key.
pub fn cache_key(source_identifier: &str, target_language: &str, source_text: &str) -> String {
    format!(
        "{source_identifier}-{target_language}-{}",
        fingerprint(source_text)
    )
}

/// In-memory store of completed translations.
///
/// Entries live for the process lifetime; there is no eviction and no
/// persistence. All operations take `&self` so the store can be shared
/// behind an `Arc` between the orchestrator and background session tasks.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an entry under the given key, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, entry: CacheEntry) {
        self.entries().insert(key.into(), entry);
    }

    /// Looks up an entry. Absent keys yield `None`, never an error.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries().get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Removes an entry, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries().remove(key).is_some()
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> CacheEntry {
        CacheEntry {
            content: content.to_string(),
            timestamp: SystemTime::now(),
            source_identifier: "file:///notes.md".to_string(),
            target_language: "ja".to_string(),
        }
    }

    #[test]
    fn test_get_after_set_returns_equal_entry() {
        let cache = TranslationCache::new();
        let stored = entry("こんにちは、世界！");

        cache.set("key-1", stored.clone());

        assert_eq!(cache.get("key-1"), Some(stored));
    }

    #[test]
    fn test_get_absent_key() {
        let cache = TranslationCache::new();
        assert_eq!(cache.get("missing"), None);
        assert!(!cache.has("missing"));
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let cache = TranslationCache::new();
        cache.set("key-1", entry("first"));
        cache.set("key-1", entry("second"));

        assert_eq!(cache.get("key-1").map(|e| e.content), Some("second".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete() {
        let cache = TranslationCache::new();
        cache.set("key-1", entry("content"));

        assert!(cache.delete("key-1"));
        assert!(!cache.delete("key-1"));
        assert!(!cache.has("key-1"));
    }

    #[test]
    fn test_clear_empties_all_keys() {
        let cache = TranslationCache::new();
        cache.set("a", entry("1"));
        cache.set("b", entry("2"));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_cache_key_format() {
        let key = cache_key("file:///notes.md", "zh-CN", "Hello, World!");
        assert_eq!(
            key,
            "file:///notes.md-zh-CN-65a8e27d8879283831b664bd8b7f0ad4"
        );
    }

    #[test]
    fn test_cache_key_changes_with_content() {
        let a = cache_key("file:///notes.md", "zh-CN", "Hello");
        let b = cache_key("file:///notes.md", "zh-CN", "Hello!");
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_changes_with_language() {
        let a = cache_key("file:///notes.md", "zh-CN", "Hello");
        let b = cache_key("file:///notes.md", "ja", "Hello");
        assert_ne!(a, b);
    }
}
