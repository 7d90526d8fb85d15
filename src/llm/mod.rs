//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for talking to a chat model. The
//! rest of the crate only sees [`LLMClient`], so agents, workflows, RAG and the
//! summarizer can run against a scripted client in tests.
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `openai` - OpenAI API and any OpenAI-compatible base URL
//!
//! # Example
//!
//! ```ignore
//! use agentlab::llm::{GenerationParams, Provider};
//!
//! let provider = Provider::from_config(&config.llm)?;
//! let client = provider.create_client(GenerationParams::default())?;
//!
//! let answer = client.generate("What is 2+2?").await?;
//! println!("{}", answer);
//! ```

/// Core LLM client trait, response types and provider selection.
pub mod client;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{
    GenerationParams, LLMClient, LLMClientFactory, LLMResponse, Provider, ProviderFactory,
};
