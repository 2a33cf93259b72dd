//! Completion store - durable, write-once task outcomes.

use async_trait::async_trait;
use maestro_common::{CompletionRecord, MaestroError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

/// Storage backend for completion records.
#[async_trait]
pub trait CompletionStore: Send + Sync {
    async fn save(&self, record: &CompletionRecord) -> Result<()>;

    /// Load a record. Unknown ids yield `Ok(None)`.
    async fn load(&self, task_id: &str) -> Result<Option<CompletionRecord>>;
}

/// Task ids become file names, so only a conservative alphabet is accepted.
pub fn is_valid_task_id(task_id: &str) -> bool {
    !task_id.is_empty()
        && task_id.len() <= 128
        && task_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Writes `<dir>/<task_id>.json` as pretty JSON.
#[derive(Debug, Clone)]
pub struct FileCompletionStore {
    dir: PathBuf,
}

impl FileCompletionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, task_id: &str) -> Result<PathBuf> {
        if !is_valid_task_id(task_id) {
            return Err(MaestroError::Persistence(format!(
                "invalid task id '{}'",
                task_id
            )));
        }
        Ok(self.dir.join(format!("{}.json", task_id)))
    }
}

#[async_trait]
impl CompletionStore for FileCompletionStore {
    async fn save(&self, record: &CompletionRecord) -> Result<()> {
        let path = self.path_for(&record.task.id)?;
        let json = serde_json::to_vec_pretty(record)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Write to a sibling file and rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(task_id = %record.task.id, path = %path.display(), "Stored completion record");
        Ok(())
    }

    async fn load(&self, task_id: &str) -> Result<Option<CompletionRecord>> {
        let path = self.path_for(task_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, optionally failing its first saves.
#[derive(Default)]
pub struct MemoryCompletionStore {
    records: Mutex<HashMap<String, CompletionRecord>>,
    failures_left: AtomicU32,
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first `failures` saves return an error.
    pub fn failing(failures: u32) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failures_left: AtomicU32::new(failures),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn get(&self, task_id: &str) -> Option<CompletionRecord> {
        self.records.lock().get(task_id).cloned()
    }
}

#[async_trait]
impl CompletionStore for MemoryCompletionStore {
    async fn save(&self, record: &CompletionRecord) -> Result<()> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(MaestroError::Persistence("simulated write failure".into()));
        }

        self.records
            .lock()
            .insert(record.task.id.clone(), record.clone());
        Ok(())
    }

    async fn load(&self, task_id: &str) -> Result<Option<CompletionRecord>> {
        Ok(self.get(task_id))
    }
}

/// Backoff policy for persisting completion records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let base = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        (base as u64).min(self.max_delay_ms)
    }
}

/// Save a record, retrying with exponential backoff. Returns the last error
/// once every attempt has failed.
pub async fn persist_with_retry(
    store: &dyn CompletionStore,
    record: &CompletionRecord,
    retry: &RetryConfig,
) -> Result<()> {
    let mut attempt = 0;
    loop {
        match store.save(record).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retry.max_retries => {
                let delay = retry.delay_ms(attempt);
                warn!(
                    task_id = %record.task.id,
                    attempt = attempt + 1,
                    max_retries = retry.max_retries,
                    delay_ms = delay,
                    error = %e,
                    "Retrying completion write"
                );
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
