use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct CachedPage {
    pub body: Vec<u8>,
    pub etag: String,
    pub created_at: Instant,
}

/// TTL plus capacity bounded cache of rendered pages, keyed by
/// `{site}:{canonical path}`. Staleness inside the TTL window is accepted;
/// the revalidation endpoint gives an explicit invalidation path.
pub struct RenderCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CachedPage>,
}

impl RenderCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn cache_key(site_slug: &str, canonical_path: &str) -> String {
        format!("{site_slug}:{canonical_path}")
    }

    pub fn get(&mut self, key: &str) -> Option<CachedPage> {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, value: CachedPage) {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        if self.entries.len() >= self.max_entries {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(key, value);
    }

    /// Drops one entry; returns whether anything was cached under the key.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}
