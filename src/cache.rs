//! Process-lifetime store of resolved creature records.
//!
//! Records are never evicted or persisted. A later insert for the same key
//! replaces the earlier record.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::state::CreatureDetail;

/// Normalize a lookup name into the form used as the cache key.
pub fn cache_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[derive(Clone, Default)]
pub struct DetailCache {
    entries: Arc<RwLock<HashMap<String, Arc<CreatureDetail>>>>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<CreatureDetail>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&cache_key(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&cache_key(name))
    }

    /// Store `detail` under `name`. Replaces any earlier record for the key.
    pub fn insert(&self, name: &str, detail: Arc<CreatureDetail>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(cache_key(name), detail);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for DetailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GenderRatio;

    fn detail(name: &str) -> Arc<CreatureDetail> {
        Arc::new(CreatureDetail {
            id: 10,
            name: name.to_string(),
            height_m: 0.4,
            weight_kg: 6.0,
            types: vec!["electric".to_string()],
            image_url: None,
            abilities: vec![],
            base_stats: vec![],
            evolution_chain: vec![],
            species_label: "Mouse Pokémon".to_string(),
            color: "yellow".to_string(),
            egg_groups: vec![],
            egg_cycle: "10".to_string(),
            gender_ratio: GenderRatio { male: 50.0, female: 50.0 },
            national_dex_number: 25,
            flavor_text: String::new(),
        })
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(cache_key("  Pikachu "), "pikachu");
        assert_eq!(cache_key("Mr Mime"), "mr-mime");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cache = DetailCache::new();
        assert!(cache.is_empty());
        cache.insert("pikachu", detail("pikachu"));
        assert!(cache.contains("PIKACHU"));
        assert_eq!(cache.get("Pikachu").map(|d| d.national_dex_number), Some(25));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = DetailCache::new();
        let other = cache.clone();
        other.insert("pikachu", detail("pikachu"));
        assert!(cache.contains("pikachu"));
    }

    #[test]
    fn test_later_insert_replaces_record() {
        let cache = DetailCache::new();
        cache.insert("pikachu", detail("pikachu"));
        let newer = detail("pikachu");
        cache.insert("Pikachu", Arc::clone(&newer));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("pikachu").is_some_and(|d| Arc::ptr_eq(&d, &newer)));
    }
}
