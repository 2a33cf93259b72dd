//! Agent executors for Maestro.
//!
//! This crate provides one executor per agent kind plus the supporting
//! pieces the coordinator needs:
//!
//! - **GitHub Knowledge**: development patterns from public repositories
//! - **Elite Repos**: practices shared by top-rated projects
//! - **Deep Analyzer**: high-quality reference implementations
//! - **Viral Innovation**: breakthrough approaches
//! - **Predictive**: architectural suggestions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     AGENT REGISTRY                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ │
//! │  │ GitHub  │ │  Elite  │ │  Deep   │ │  Viral  │ │Predict-│ │
//! │  │Knowledge│ │  Repos  │ │Analyzer │ │Innovat. │ │  ive   │ │
//! │  └────┬────┘ └────┬────┘ └────┬────┘ └────┬────┘ └───┬────┘ │
//! │       └───────────┴─────┬─────┴───────────┴──────────┘      │
//! │                         ▼ opportunistic reads               │
//! │              ┌─────────────────────┐                        │
//! │              │   Knowledge Cache   │◄── proactive research  │
//! │              └─────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod deep_analyzer;
pub mod elite_repos;
pub mod github_knowledge;
pub mod predictive;
pub mod registry;
pub mod research;
pub mod viral_innovation;

pub use command::{CommandOutput, CommandRunner, ScriptedCommandRunner, SystemCommandRunner};
pub use deep_analyzer::DeepAnalyzerAgent;
pub use elite_repos::EliteReposAgent;
pub use github_knowledge::GithubKnowledgeAgent;
pub use maestro_common::{Agent, AgentKind, Capability};
pub use predictive::PredictiveAgent;
pub use registry::AgentRegistry;
pub use research::{select_topics, spawn_research, ResearchTopic};
pub use viral_innovation::ViralInnovationAgent;
