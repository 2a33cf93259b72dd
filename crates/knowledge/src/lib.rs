//! Knowledge cache for Maestro.
//!
//! Agents and background research write findings here keyed by topic. The
//! cache is advisory: nothing in a task's lifecycle waits on it, and a
//! periodic sweep drops entries once they are older than the retention
//! window.
//!
//! ```text
//!  research task ──insert──►┌──────────────────┐◄──lookup── agent worker
//!  research task ──insert──►│  KnowledgeCache  │
//!                           └────────┬─────────┘
//!                                    │ every sweep_interval
//!                                    ▼
//!                            evict entries older
//!                              than retention
//! ```

pub mod store;
pub mod types;

pub use store::KnowledgeCache;
pub use types::{KnowledgeConfig, KnowledgeEntry};
