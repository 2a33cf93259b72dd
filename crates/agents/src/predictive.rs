//! Predictive agent - suggests architectural approaches.
//!
//! Its `suggestions` are recorded with the task but are not one of the
//! fields the synthesizer merges.

use async_trait::async_trait;
use maestro_common::{Agent, AgentContext, AgentKind, Capability, Result};
use serde_json::{json, Value};
use tracing::info;

const SUGGESTIONS: [&str; 3] = [
    "Consider microservices architecture",
    "Implement event-driven design",
    "Use containerization for deployment",
];

pub struct PredictiveAgent {
    name: String,
}

impl PredictiveAgent {
    pub fn new() -> Self {
        Self {
            name: "Predictive Agent".into(),
        }
    }
}

impl Default for PredictiveAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for PredictiveAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Predictive
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, capability: Capability, ctx: &AgentContext) -> Result<Value> {
        info!(
            agent = %self.kind(),
            capability = %capability,
            task_id = %ctx.task_id,
            "Predicting approaches"
        );

        Ok(match capability {
            Capability::SuggestApproaches => json!({ "suggestions": SUGGESTIONS }),
            _ => json!({ "status": "completed" }),
        })
    }
}
