//! Configuration for the coordinator.
//!
//! Every field has a default, so an empty TOML file is a valid config.

use crate::store::RetryConfig;
use maestro_knowledge::KnowledgeConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Directory receiving one `<task_id>.json` completion record per task
    #[serde(default = "default_completions_dir")]
    pub completions_dir: PathBuf,

    /// Base directory for fast-path file creation
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Per-task budget for agent results
    #[serde(default = "default_task_timeout_ms")]
    pub task_timeout_ms: u64,

    /// Bounded wait on each dequeue attempt
    #[serde(default = "default_queue_poll_interval_ms")]
    pub queue_poll_interval_ms: u64,

    /// Program used by `find <term>`
    #[serde(default = "default_search_program")]
    pub search_program: String,

    /// Maximum number of files reported by `find <term>`
    #[serde(default = "default_search_result_limit")]
    pub search_result_limit: usize,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Retry policy for writing completion records
    #[serde(default)]
    pub persistence: RetryConfig,
}

fn default_completions_dir() -> PathBuf {
    PathBuf::from("./data/task_completions")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_task_timeout_ms() -> u64 {
    60_000
}

fn default_queue_poll_interval_ms() -> u64 {
    1_000
}

fn default_search_program() -> String {
    "mdfind".into()
}

fn default_search_result_limit() -> usize {
    5
}

/// Spoken output of short responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,

    /// Text-to-speech program, invoked as `<program> -r <rate> <text>`
    #[serde(default = "default_speech_program")]
    pub program: String,

    /// Words per minute
    #[serde(default = "default_speech_rate")]
    pub rate: u32,

    /// Responses at or above this length are not spoken
    #[serde(default = "default_speech_max_chars")]
    pub max_chars: usize,
}

fn default_speech_enabled() -> bool {
    true
}

fn default_speech_program() -> String {
    "say".into()
}

fn default_speech_rate() -> u32 {
    320
}

fn default_speech_max_chars() -> usize {
    200
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            program: default_speech_program(),
            rate: default_speech_rate(),
            max_chars: default_speech_max_chars(),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            completions_dir: default_completions_dir(),
            working_dir: default_working_dir(),
            task_timeout_ms: default_task_timeout_ms(),
            queue_poll_interval_ms: default_queue_poll_interval_ms(),
            search_program: default_search_program(),
            search_result_limit: default_search_result_limit(),
            speech: SpeechConfig::default(),
            knowledge: KnowledgeConfig::default(),
            persistence: RetryConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.task_timeout_ms)
    }

    pub fn queue_poll_interval(&self) -> Duration {
        Duration::from_millis(self.queue_poll_interval_ms)
    }

    /// Load configuration from a TOML file.
    ///
    /// On Unix the file must be a regular file and must not be world-writable.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        validate_config_file_permissions(path)?;

        Self::from_file_unchecked(path)
    }

    /// Load configuration from a TOML file without permission checks.
    pub fn from_file_unchecked(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(unix)]
fn validate_config_file_permissions(path: &std::path::Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    if !metadata.is_file() {
        anyhow::bail!(
            "Config path '{}' is not a regular file. Symlinks and directories are not allowed.",
            path.display()
        );
    }

    let permission_bits = metadata.permissions().mode() & 0o777;
    if permission_bits & 0o002 != 0 {
        anyhow::bail!(
            "Config file '{}' is world-writable (mode {:04o}). Fix with: chmod o-w {}",
            path.display(),
            permission_bits,
            path.display()
        );
    }

    Ok(())
}
