//! LLM client abstraction
//!
//! Every demo talks to its model through [`LLMClient`]. The only production
//! provider is an OpenAI-compatible chat completions endpoint; tests plug in
//! scripted clients.

use crate::types::{AppError, Message, Result, ToolCall, ToolDefinition};
use crate::utils::config::LLMConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Send a full conversation, optionally offering tools to the model
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LLMResponse>;

    /// Generate a completion from a single user prompt
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self.chat(&[Message::user(prompt)], &[]).await?;
        Ok(response.content)
    }

    /// Generate with a system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let response = self
            .chat(&[Message::system(system), Message::user(prompt)], &[])
            .await?;
        Ok(response.content)
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone, Default)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            finish_reason: "stop".to_string(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Sampling parameters applied to every request a client sends
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including any OpenAI-compatible endpoint)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },
}

impl Provider {
    /// Build the provider from environment-derived settings.
    pub fn from_config(config: &LLMConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        Ok(Provider::OpenAI {
            api_key,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
        })
    }

    /// Create a client instance for this provider
    pub fn create_client(&self, params: GenerationParams) -> Result<Arc<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Arc::new(
                super::openai::OpenAIClient::new(api_key.clone(), api_base.clone(), model.clone())
                    .with_params(params),
            )),

            #[cfg(not(feature = "openai"))]
            Provider::OpenAI { .. } => {
                let _ = params;
                Err(AppError::Configuration(
                    "OpenAI support not compiled in; rebuild with the `openai` feature".to_string(),
                ))
            }
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
        }
    }
}

/// Factory trait for creating LLM clients
pub trait LLMClientFactory: Send + Sync {
    fn create(&self, params: GenerationParams) -> Result<Arc<dyn LLMClient>>;
}

/// Factory that hands out clients for a single configured provider
pub struct ProviderFactory {
    provider: Provider,
}

impl ProviderFactory {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

impl LLMClientFactory for ProviderFactory {
    fn create(&self, params: GenerationParams) -> Result<Arc<dyn LLMClient>> {
        self.provider.create_client(params)
    }
}
