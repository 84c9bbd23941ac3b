use std::collections::HashMap;
use std::sync::Arc;

use super::types::{CacheKey, Category, Opportunity};

/// Immutable result sequence shared between the cache and the session.
pub type Listing = Arc<[Opportunity]>;

/// In-memory listing cache keyed by `(category, query)`.
///
/// Entries are never edited in place: `store` replaces the whole sequence,
/// and the `Arc<[_]>` handed out by `lookup` cannot be mutated. There is no
/// TTL or eviction; entries live until `invalidate_prefix` or drop.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<CacheKey, Listing>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Listing> {
        self.entries.get(key).cloned()
    }

    /// Insert or wholesale-replace the entry for `key`.
    pub fn store(&mut self, key: CacheKey, listing: Listing) {
        tracing::trace!(key = %key, count = listing.len(), "Caching listing");
        self.entries.insert(key, listing);
    }

    /// Remove every entry whose key starts with the category name.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, category: Category) -> usize {
        let prefix = category.as_str();
        let before = self.entries.len();
        self.entries
            .retain(|key, _| !key.as_str().starts_with(prefix));
        let removed = before - self.entries.len();
        tracing::debug!(category = %category, removed, "Invalidated cached listings");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(titles: &[&str]) -> Listing {
        titles
            .iter()
            .map(|t| {
                serde_json::from_value::<Opportunity>(serde_json::json!({ "title": t }))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_lookup_returns_stored_sequence() {
        let mut cache = ResultCache::new();
        let key = CacheKey::new(Category::Scholarships, "");
        let data = listing(&["a", "b", "c"]);
        cache.store(key.clone(), data.clone());

        let hit = cache.lookup(&key).unwrap();
        assert!(Arc::ptr_eq(&hit, &data));
        assert_eq!(hit.len(), 3);
    }

    #[test]
    fn test_store_replaces_wholesale() {
        let mut cache = ResultCache::new();
        let key = CacheKey::new(Category::Hackathons, "");
        let old = listing(&["old"]);
        cache.store(key.clone(), old.clone());
        cache.store(key.clone(), listing(&["new1", "new2"]));

        let hit = cache.lookup(&key).unwrap();
        assert_eq!(hit.len(), 2);
        // A handle obtained before replacement still sees the old sequence
        assert_eq!(old[0].title, "old");
    }

    #[test]
    fn test_miss() {
        let cache = ResultCache::new();
        assert!(cache
            .lookup(&CacheKey::new(Category::Freelancing, "x"))
            .is_none());
    }

    #[test]
    fn test_invalidate_prefix_only_touches_category() {
        let mut cache = ResultCache::new();
        cache.store(CacheKey::new(Category::Scholarships, ""), listing(&["a"]));
        cache.store(CacheKey::new(Category::Scholarships, "stem"), listing(&["b"]));
        cache.store(CacheKey::new(Category::Hackathons, ""), listing(&["c"]));

        let removed = cache.invalidate_prefix(Category::Scholarships);
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache
            .lookup(&CacheKey::new(Category::Hackathons, ""))
            .is_some());
    }
}
