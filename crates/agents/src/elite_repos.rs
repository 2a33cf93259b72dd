//! Elite repositories agent - practices shared by top-rated projects.

use async_trait::async_trait;
use maestro_common::{Agent, AgentContext, AgentKind, Capability, Result};
use serde_json::{json, Value};
use tracing::info;

const BEST_PRACTICES: [&str; 4] = [
    "Comprehensive test coverage >90%",
    "Clear documentation with examples",
    "Semantic versioning and changelog",
    "CI/CD pipeline with automated testing",
];

pub struct EliteReposAgent {
    name: String,
}

impl EliteReposAgent {
    pub fn new() -> Self {
        Self {
            name: "Elite Repos Agent".into(),
        }
    }
}

impl Default for EliteReposAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for EliteReposAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::EliteRepos
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, capability: Capability, ctx: &AgentContext) -> Result<Value> {
        info!(
            agent = %self.kind(),
            capability = %capability,
            task_id = %ctx.task_id,
            "Collecting elite repository practices"
        );

        Ok(match capability {
            Capability::GetBestPractices => json!({ "best_practices": BEST_PRACTICES }),
            _ => json!({ "status": "completed" }),
        })
    }
}
