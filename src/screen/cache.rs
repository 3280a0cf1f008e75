//! Per-screen content cache.
//!
//! The cache belongs to exactly one screen and lives as long as it does. Entries are
//! keyed by normalized request path (path + query). An entry added before the screen
//! made any request is *unbound*: it answers the next lookup for any path, which is
//! how content pre-seeded for a freshly created screen is served.

use crate::screen::ScreenContent;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScreenCache {
    cacheable: bool,
    entries: HashMap<String, ScreenContent>,
    unbound: Option<ScreenContent>,
}

impl ScreenCache {
    pub fn new(cacheable: bool) -> Self {
        Self {
            cacheable,
            entries: HashMap::new(),
            unbound: None,
        }
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Turning caching off drops every entry.
    pub fn set_cacheable(&mut self, cacheable: bool) {
        if !cacheable {
            self.clear();
        }
        self.cacheable = cacheable;
    }

    /// Stores `content` under `path`, or unbound when `path` is `None`.
    /// Ignored when caching is off.
    pub fn add(&mut self, path: Option<&str>, content: ScreenContent) {
        if !self.cacheable {
            return;
        }
        match path {
            Some(path) => {
                self.entries.insert(path.to_string(), content);
            }
            None => self.unbound = Some(content),
        }
    }

    pub fn get(&self, path: &str) -> Option<ScreenContent> {
        self.entries.get(path).or(self.unbound.as_ref()).cloned()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.unbound = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.unbound.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn entries_are_keyed_by_path() {
        let mut cache = ScreenCache::new(true);
        let content: ScreenContent = Arc::from("page");
        cache.add(Some("/page"), content.clone());

        assert!(Arc::ptr_eq(&cache.get("/page").unwrap(), &content));
        assert!(cache.get("/other").is_none());
    }

    #[test]
    fn unbound_entry_answers_any_path() {
        let mut cache = ScreenCache::new(true);
        cache.add(None, Arc::from("seed"));
        assert_eq!(cache.get("/anything").as_deref(), Some("seed"));
    }

    #[test]
    fn disabling_clears_and_blocks_entries() {
        let mut cache = ScreenCache::new(true);
        cache.add(Some("/page"), Arc::from("page"));
        cache.set_cacheable(false);
        assert!(cache.is_empty());

        cache.add(Some("/page"), Arc::from("page"));
        assert!(cache.get("/page").is_none());
    }
}
