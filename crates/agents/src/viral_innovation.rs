//! Viral innovation agent - breakthrough approaches from trending projects.

use async_trait::async_trait;
use maestro_common::{Agent, AgentContext, AgentKind, Capability, Result};
use serde_json::{json, Value};
use tracing::info;

const INNOVATIONS: [&str; 3] = [
    "Zero-config setup approach",
    "Real-time collaborative features",
    "AI-powered code generation",
];

pub struct ViralInnovationAgent {
    name: String,
}

impl ViralInnovationAgent {
    pub fn new() -> Self {
        Self {
            name: "Viral Innovation Agent".into(),
        }
    }
}

impl Default for ViralInnovationAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for ViralInnovationAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ViralInnovation
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, capability: Capability, ctx: &AgentContext) -> Result<Value> {
        info!(
            agent = %self.kind(),
            capability = %capability,
            task_id = %ctx.task_id,
            "Scanning for breakthrough solutions"
        );

        Ok(match capability {
            Capability::FindBreakthroughSolutions => json!({ "innovations": INNOVATIONS }),
            _ => json!({ "status": "completed" }),
        })
    }
}
