use crate::agents::{Agent, AgentContext, AgentEvent};
use crate::types::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a finished session produced
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub session_id: String,
    pub final_response: String,
    pub state: HashMap<String, String>,
    pub events: Vec<AgentEvent>,
}

/// Creates a fresh session per query and runs one root agent in it.
pub struct Runner {
    agent: Arc<dyn Agent>,
}

impl Runner {
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self { agent }
    }

    pub async fn run(&self, query: &str) -> Result<RunOutput> {
        self.run_with_state(query, HashMap::new()).await
    }

    pub async fn run_with_state(
        &self,
        query: &str,
        state: HashMap<String, String>,
    ) -> Result<RunOutput> {
        let session_id = Uuid::new_v4().to_string();
        let mut context = AgentContext::new(session_id.clone());
        context.state = state;

        tracing::info!(agent = self.agent.name(), session = %session_id, "Starting session");
        let final_response = self.agent.execute(query, &mut context).await?;

        Ok(RunOutput {
            session_id,
            final_response,
            state: context.state,
            events: context.events,
        })
    }
}
