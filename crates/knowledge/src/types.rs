//! Knowledge entry and cache configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Findings cached under one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: String,

    /// Whatever the producing agent found
    pub results: serde_json::Value,

    /// Insertion timestamp (Unix millis)
    pub timestamp: u64,
}

impl KnowledgeEntry {
    pub fn new(topic: impl Into<String>, results: serde_json::Value) -> Self {
        Self::at(topic, results, maestro_common::now_millis())
    }

    pub fn at(topic: impl Into<String>, results: serde_json::Value, timestamp: u64) -> Self {
        Self {
            topic: topic.into(),
            results,
            timestamp,
        }
    }

    /// Whether this entry is past the retention window at `now`.
    pub fn is_expired(&self, now: u64, retention: Duration) -> bool {
        now.saturating_sub(self.timestamp) > retention.as_millis() as u64
    }
}

/// Configuration for the knowledge cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// How long an entry stays cached
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// How often the sweeper runs
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl KnowledgeConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let entry = KnowledgeEntry::at("topic", serde_json::json!({}), 1_000);
        let retention = Duration::from_secs(1);

        assert!(!entry.is_expired(2_000, retention));
        assert!(entry.is_expired(2_001, retention));
        // Clock skew must not count as expired
        assert!(!entry.is_expired(500, retention));
    }

    #[test]
    fn test_config_defaults_from_empty_table() {
        let config: KnowledgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.retention(), Duration::from_secs(3600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
    }
}
