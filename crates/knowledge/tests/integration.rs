//! Integration tests for the knowledge cache sweeper.

use maestro_knowledge::{KnowledgeCache, KnowledgeConfig, KnowledgeEntry};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn short_lived_cache() -> Arc<KnowledgeCache> {
    Arc::new(KnowledgeCache::new(KnowledgeConfig {
        retention_secs: 1,
        sweep_interval_secs: 1,
    }))
}

#[tokio::test]
async fn test_sweeper_evicts_stale_entries() {
    let cache = short_lived_cache();
    cache.put(KnowledgeEntry::at("stale", serde_json::json!({}), 0));

    let cancel = CancellationToken::new();
    let handle = cache.spawn_sweeper(cancel.clone());

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(cache.get("stale").is_none());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_keeps_fresh_entries() {
    let cache = short_lived_cache();
    let cancel = CancellationToken::new();
    let handle = cache.spawn_sweeper(cancel.clone());

    cache.insert("fresh", serde_json::json!({"speech_optimizations": []}));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(cache.get("fresh").is_some());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_stops_on_cancel() {
    let cache = short_lived_cache();
    let cancel = CancellationToken::new();
    let handle = cache.spawn_sweeper(cancel.clone());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper should stop promptly")
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_writers() {
    let cache = Arc::new(KnowledgeCache::default());
    let mut handles = Vec::new();

    for i in 0..16 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache.insert(format!("topic_{i}"), serde_json::json!({ "i": i }));
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(cache.len(), 16);
}
