use crate::agents::{Agent, AgentContext, TranscriptEntry};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs its sub-agents in order over one shared context.
///
/// Each sub-agent's output is appended to the transcript before the next one
/// starts. The result is the last sub-agent's output.
pub struct SequentialAgent {
    name: String,
    description: String,
    sub_agents: Vec<Arc<dyn Agent>>,
}

impl SequentialAgent {
    pub fn new(name: impl Into<String>, sub_agents: Vec<Arc<dyn Agent>>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sub_agents,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn sub_agents(&self) -> &[Arc<dyn Agent>] {
        &self.sub_agents
    }
}

#[async_trait]
impl Agent for SequentialAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: &str, context: &mut AgentContext) -> Result<String> {
        if self.sub_agents.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Sequential agent '{}' has no sub-agents",
                self.name
            )));
        }

        let mut last = String::new();
        for agent in &self.sub_agents {
            tracing::info!(pipeline = %self.name, agent = agent.name(), "Running sub-agent");
            last = agent.execute(input, context).await?;
            context
                .transcript
                .push(TranscriptEntry::new(agent.name(), last.clone()));
        }
        Ok(last)
    }
}
