//! Agent framework
//!
//! An [`Agent`] turns an input string into an output string, reading and
//! writing a shared [`AgentContext`]. Agents compose: a [`SequentialAgent`]
//! runs sub-agents over one context, a [`Runner`] owns a session, and the
//! [`workflows`](crate::workflows) engine schedules agents over a graph.
//!
//! # Session state
//!
//! Agents with an `output_key` store their final text in
//! [`AgentContext::state`]. Later agents reference those values through
//! `{key}` placeholders in their instructions.

/// Demo agents (simple assistant, weather/time, code pipeline).
pub mod demos;
/// LLM-backed agent with tool calling.
pub mod llm_agent;
/// Session runner.
pub mod runner;
/// Runs sub-agents in order.
pub mod sequential;

use crate::types::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

pub use demos::AgentKind;
pub use llm_agent::LlmAgent;
pub use runner::{RunOutput, Runner};
pub use sequential::SequentialAgent;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique name, used as the transcript source
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Session state key the final output is stored under
    fn output_key(&self) -> Option<&str> {
        None
    }

    /// Short text shown when workflows are rendered
    fn summary(&self) -> String {
        self.description().to_string()
    }

    /// Execute the agent with given input and context
    async fn execute(&self, input: &str, context: &mut AgentContext) -> Result<String>;
}

/// A message produced by an agent and visible to the agents after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub source: String,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentEventKind {
    ToolCall {
        name: String,
        arguments: serde_json::Value,
    },
    ToolResult {
        name: String,
        result: serde_json::Value,
    },
    Response {
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentEvent {
    pub author: String,
    #[serde(flatten)]
    pub kind: AgentEventKind,
}

/// Mutable state shared by the agents of one session
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub session_id: String,
    pub state: HashMap<String, String>,
    pub transcript: Vec<TranscriptEntry>,
    pub events: Vec<AgentEvent>,
}

impl AgentContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    pub fn with_transcript(mut self, transcript: Vec<TranscriptEntry>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn record(&mut self, author: &str, kind: AgentEventKind) {
        self.events.push(AgentEvent {
            author: author.to_string(),
            kind,
        });
    }

    /// Final responses in the order they were produced
    pub fn responses(&self) -> impl Iterator<Item = (&str, &str)> {
        self.events.iter().filter_map(|e| match &e.kind {
            AgentEventKind::Response { content } => Some((e.author.as_str(), content.as_str())),
            _ => None,
        })
    }
}
