//! Application state for the API server.

use maestro_coordinator::{Coordinator, CoordinatorConfig};
use std::sync::Arc;

/// Shared application state for the API server.
pub struct AppState {
    pub coordinator: Arc<Coordinator>,

    /// Server start time (for health checks)
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build a coordinator from `config`. Must run inside a Tokio runtime.
    pub fn new(config: CoordinatorConfig) -> maestro_common::Result<Self> {
        Ok(Self::with_coordinator(Coordinator::new(config)?))
    }

    pub fn with_coordinator(coordinator: Coordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
