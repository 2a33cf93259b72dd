//! Task coordinator for Maestro.
//!
//! The coordinator is the central brain that:
//! 1. Answers fast-path commands (open, create file, find, status) inline
//! 2. Classifies everything else into a typed, prioritized task
//! 3. Fans each task out to its agents and waits for their results
//! 4. Synthesizes whatever arrived before the deadline into a response
//!
//! # Architecture
//!
//! ```text
//! Command
//!    │
//!    ▼
//! ┌─────────────────┐   fast path   ┌──────────────┐
//! │   Coordinator   │──────────────►│ open / find  │
//! │   (this crate)  │               │ create/status│
//! └────────┬────────┘               └──────────────┘
//!          │ FIFO queue
//!          ▼
//! ┌─────────────────┐  one worker per (agent, capability)
//! │   Dispatcher    │──────┬──────────┬──────────┐
//! └────────┬────────┘      ▼          ▼          ▼
//!          │            [Agent]    [Agent]    [Agent]
//!          │               └──── ResultSink ─────┘
//!          ▼                          │
//! ┌─────────────────┐   notify        ▼
//! │ Progress Monitor│◄──────── Active Task Registry
//! └────────┬────────┘
//!          ▼
//!   synthesis ─► completion store ─► speech ─► subscribers
//! ```

pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod fast_path;
pub mod monitor;
pub mod registry;
pub mod routing;
pub mod speech;
pub mod store;
pub mod synthesis;
pub mod triage;
pub mod worker;

pub use config::{CoordinatorConfig, SpeechConfig};
pub use coordinator::{Coordinator, CoordinatorBuilder, StatusSnapshot};
pub use fast_path::{FastCommand, FastPathExecutor};
pub use monitor::Outcome;
pub use registry::{ActiveTask, ActiveTaskRecord, ActiveTaskRegistry, RecordOutcome, ResultSink};
pub use routing::RoutingTable;
pub use speech::{CommandSpeaker, SilentSpeaker, Speaker};
pub use store::{
    persist_with_retry, CompletionStore, FileCompletionStore, MemoryCompletionStore, RetryConfig,
};
pub use synthesis::{generate_response, synthesize};
pub use triage::{classify, classify_command, determine_priority, Classification};
pub use worker::{run_worker, WorkerExit};
