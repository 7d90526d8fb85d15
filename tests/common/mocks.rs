//! Mock implementations for testing.
//!
//! This module provides a scripted LLM client that can be shared across
//! test files without duplication.

use agentlab::llm::{LLMClient, LLMResponse};
use agentlab::types::{AppError, Message, MessageRole, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

type Responder = Box<dyn Fn(&[Message]) -> String + Send + Sync>;

/// One recorded `chat` call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

impl RecordedCall {
    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
    }

    pub fn first_user(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

/// Mock LLM client with scripted responses.
///
/// Responses are taken from the script queue first, then from the responder
/// closure, then the default text. Every call is recorded.
pub struct MockLLMClient {
    script: Mutex<VecDeque<LLMResponse>>,
    responder: Option<Responder>,
    default: String,
    should_fail: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLLMClient {
    /// Create a mock client that always returns the given text.
    pub fn new(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            responder: None,
            default: response.to_string(),
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Return these responses in order, then `fallback`.
    pub fn scripted(responses: Vec<LLMResponse>, fallback: &str) -> Self {
        let mock = Self::new(fallback);
        mock.script.lock().extend(responses);
        mock
    }

    /// Compute the reply from the messages (handy when agents run concurrently).
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&[Message]) -> String + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::new("")
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LLMResponse> {
        self.calls.lock().push(RecordedCall {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }

        if let Some(response) = self.script.lock().pop_front() {
            return Ok(response);
        }

        let content = match &self.responder {
            Some(responder) => responder(messages),
            None => self.default.clone(),
        };
        Ok(LLMResponse::text(content))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A response asking for one tool call
pub fn tool_call_response(id: &str, name: &str, arguments: serde_json::Value) -> LLMResponse {
    LLMResponse {
        content: String::new(),
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
        finish_reason: "tool_calls".to_string(),
    }
}
