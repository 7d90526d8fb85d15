//! LLM-backed agent
//!
//! Builds a conversation from the agent's instruction, the user input and the
//! transcript, then loops while the model asks for tools.

use crate::agents::{Agent, AgentContext, AgentEventKind};
use crate::llm::LLMClient;
use crate::tools::ToolRegistry;
use crate::types::{Message, Result, ToolDefinition};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Default bound on model round-trips that may request tools
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 5;

pub struct LlmAgent {
    name: String,
    description: String,
    instruction: String,
    llm: Arc<dyn LLMClient>,
    tools: Option<Arc<ToolRegistry>>,
    output_key: Option<String>,
    max_tool_iterations: usize,
}

impl LlmAgent {
    pub fn new(name: impl Into<String>, llm: Arc<dyn LLMClient>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            instruction: String::new(),
            llm,
            tools: None,
            output_key: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = Some(key.into());
        self
    }

    pub fn with_max_tool_iterations(mut self, max: usize) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .as_ref()
            .map(|registry| registry.get_tool_definitions())
            .unwrap_or_default()
    }

    /// Conversation sent on the first model call
    pub fn build_messages(&self, input: &str, context: &AgentContext) -> Vec<Message> {
        let mut messages = Vec::with_capacity(context.transcript.len() + 2);

        let instruction = render_instruction(&self.instruction, &context.state);
        if !instruction.trim().is_empty() {
            messages.push(Message::system(instruction));
        }
        messages.push(Message::user(input));

        for entry in &context.transcript {
            if entry.source == self.name {
                messages.push(Message::assistant(entry.content.clone()));
            } else {
                messages.push(Message::user(format!("{}:\n{}", entry.source, entry.content)));
            }
        }

        messages
    }

    async fn run_tool_loop(
        &self,
        mut messages: Vec<Message>,
        tools: &[ToolDefinition],
        context: &mut AgentContext,
    ) -> Result<String> {
        let Some(registry) = self.tools.as_ref() else {
            return Ok(self.llm.chat(&messages, &[]).await?.content);
        };

        for iteration in 0..self.max_tool_iterations {
            let response = self.llm.chat(&messages, tools).await?;
            if !response.has_tool_calls() {
                return Ok(response.content);
            }

            tracing::debug!(
                agent = %self.name,
                iteration,
                calls = response.tool_calls.len(),
                "Model requested tools"
            );
            messages.push(Message::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                context.record(
                    &self.name,
                    AgentEventKind::ToolCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                );

                let result = match registry.execute(&call.name, call.arguments.clone()).await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(agent = %self.name, tool = %call.name, error = %e, "Tool call failed");
                        json!({ "status": "error", "error_message": e.to_string() })
                    }
                };

                context.record(
                    &self.name,
                    AgentEventKind::ToolResult {
                        name: call.name.clone(),
                        result: result.clone(),
                    },
                );
                messages.push(Message::tool(call.id.clone(), result.to_string()));
            }
        }

        tracing::warn!(
            agent = %self.name,
            max = self.max_tool_iterations,
            "Tool iteration limit reached, requesting final answer without tools"
        );
        Ok(self.llm.chat(&messages, &[]).await?.content)
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn output_key(&self) -> Option<&str> {
        self.output_key.as_deref()
    }

    fn summary(&self) -> String {
        if self.instruction.is_empty() {
            self.description.clone()
        } else {
            self.instruction.clone()
        }
    }

    async fn execute(&self, input: &str, context: &mut AgentContext) -> Result<String> {
        let messages = self.build_messages(input, context);
        let tools = self.tool_definitions();

        let output = self.run_tool_loop(messages, &tools, context).await?;

        if let Some(key) = &self.output_key {
            context.state.insert(key.clone(), output.clone());
        }
        context.record(
            &self.name,
            AgentEventKind::Response {
                content: output.clone(),
            },
        );

        Ok(output)
    }
}

/// Replace `{key}` placeholders with session state values.
///
/// Only identifier-like keys present in `state` are replaced; anything else,
/// including unmatched braces, is copied through unchanged.
pub fn render_instruction(template: &str, state: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replaced = after.find('}').and_then(|end| {
            let key = &after[..end];
            let valid = !key.is_empty()
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if valid {
                state.get(key).map(|value| (value, end))
            } else {
                None
            }
        });

        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
