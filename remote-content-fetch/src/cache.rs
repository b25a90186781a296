//! Per-panel fetch cache.

use remote_content_core::Resource;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Parsed resources keyed by their fully-qualified URL.
///
/// Owned by a single panel. Entries are never evicted or refreshed, so the
/// cache only suits resources that stay unchanged for one page view.
#[derive(Default)]
pub struct FetchCache {
    entries: RwLock<HashMap<String, Arc<Resource>>>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<Resource>> {
        self.entries.read().ok()?.get(url).cloned()
    }

    /// Store a resource, replacing any entry for the same URL.
    pub fn insert(&self, url: impl Into<String>, resource: Arc<Resource>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(url.into(), resource);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("current_size", &self.len())
            .finish()
    }
}
