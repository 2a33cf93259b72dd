//! In-memory knowledge cache with a background sweeper.

use crate::types::{KnowledgeConfig, KnowledgeEntry};
use maestro_common::KnowledgeLookup;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Advisory store of agent findings keyed by topic.
///
/// Reads hand out clones, so a sweep can never pull an entry out from under
/// a reader.
pub struct KnowledgeCache {
    config: KnowledgeConfig,
    entries: RwLock<HashMap<String, KnowledgeEntry>>,
}

impl KnowledgeCache {
    pub fn new(config: KnowledgeConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    /// Cache findings for a topic, replacing any previous entry.
    pub fn insert(&self, topic: impl Into<String>, results: serde_json::Value) {
        self.put(KnowledgeEntry::new(topic, results));
    }

    pub fn put(&self, entry: KnowledgeEntry) {
        debug!(topic = %entry.topic, "Caching knowledge");
        self.entries.write().insert(entry.topic.clone(), entry);
    }

    pub fn get(&self, topic: &str) -> Option<KnowledgeEntry> {
        self.entries.read().get(topic).cloned()
    }

    /// Cached findings for a topic, or `None` if nothing is cached.
    pub fn results(&self, topic: &str) -> Option<serde_json::Value> {
        self.entries.read().get(topic).map(|e| e.results.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn topic_names(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.entries.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Remove every entry older than the retention window at `now` (Unix millis).
    /// Returns the number of evicted entries.
    pub fn evict_expired_at(&self, now: u64) -> usize {
        let retention = self.config.retention();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|topic, entry| {
            let keep = !entry.is_expired(now, retention);
            if !keep {
                debug!(topic = %topic, "Evicted from knowledge cache");
            }
            keep
        });
        before - entries.len()
    }

    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(maestro_common::now_millis())
    }

    /// Run the periodic sweep until `cancel` fires.
    pub fn spawn_sweeper(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let interval = cache.config.sweep_interval();

        tokio::spawn(async move {
            info!(
                interval_secs = interval.as_secs(),
                retention_secs = cache.config.retention_secs,
                "Knowledge sweeper started"
            );
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        let evicted = cache.evict_expired();
                        if evicted > 0 {
                            info!(evicted, remaining = cache.len(), "Knowledge cache swept");
                        }
                    }
                }
            }
            debug!("Knowledge sweeper stopped");
        })
    }
}

impl Default for KnowledgeCache {
    fn default() -> Self {
        Self::new(KnowledgeConfig::default())
    }
}

impl KnowledgeLookup for KnowledgeCache {
    fn lookup(&self, topic: &str) -> Option<serde_json::Value> {
        self.results(topic)
    }

    fn topics(&self) -> Vec<String> {
        self.topic_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let cache = KnowledgeCache::default();
        cache.insert("latest_ai_models", json!({"latest_models": []}));

        assert_eq!(cache.len(), 1);
        let entry = cache.get("latest_ai_models").unwrap();
        assert_eq!(entry.topic, "latest_ai_models");
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_insert_replaces_topic() {
        let cache = KnowledgeCache::default();
        cache.insert("t", json!(1));
        cache.insert("t", json!(2));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.results("t"), Some(json!(2)));
    }

    #[test]
    fn test_evict_expired_keeps_fresh_entries() {
        let cache = KnowledgeCache::new(KnowledgeConfig {
            retention_secs: 60,
            sweep_interval_secs: 1,
        });
        cache.put(KnowledgeEntry::at("old", json!({}), 0));
        cache.put(KnowledgeEntry::at("fresh", json!({}), 100_000));

        let evicted = cache.evict_expired_at(120_000);

        assert_eq!(evicted, 1);
        assert!(cache.get("old").is_none());
        assert!(cache.get("fresh").is_some());
    }

    #[test]
    fn test_read_clone_survives_eviction() {
        let cache = KnowledgeCache::default();
        cache.put(KnowledgeEntry::at("t", json!({"k": "v"}), 0));

        let held = cache.get("t").unwrap();
        cache.evict_expired_at(u64::MAX);

        assert!(cache.is_empty());
        assert_eq!(held.results["k"], "v");
    }

    #[test]
    fn test_lookup_trait_lists_sorted_topics() {
        let cache = KnowledgeCache::default();
        cache.insert("b", json!({}));
        cache.insert("a", json!({}));

        let lookup: &dyn KnowledgeLookup = &cache;
        assert_eq!(lookup.topics(), vec!["a".to_string(), "b".to_string()]);
        assert!(lookup.lookup("a").is_some());
    }
}
