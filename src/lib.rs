//! # agentlab
//!
//! LLM agent, multi-agent workflow and graph RAG demonstrations built on a
//! single OpenAI-compatible client.
//!
//! ## Overview
//!
//! agentlab can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `agentlab` binary
//! 2. **As a library** - Import components into your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ### Answering from the sample knowledge graph
//!
//! ```rust,ignore
//! use agentlab::graph::{sample::dspy_knowledge_graph, InMemoryGraphStore};
//! use agentlab::rag::{GraphRag, GraphRetriever};
//! use agentlab::{GenerationParams, Provider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> agentlab::Result<()> {
//!     let config = agentlab::utils::config::Config::from_env()?;
//!     let llm = Provider::from_config(&config.llm)?.create_client(GenerationParams::default())?;
//!
//!     let store = Arc::new(InMemoryGraphStore::with_graph(&dspy_knowledge_graph()));
//!     let rag = GraphRag::new(GraphRetriever::new(store), llm);
//!
//!     let answer = rag.answer("What is a Teleprompter?").await?;
//!     println!("{}", answer.answer);
//!     Ok(())
//! }
//! ```
//!
//! ### Building a workflow
//!
//! ```rust,ignore
//! use agentlab::agents::LlmAgent;
//! use agentlab::workflows::{DiGraphBuilder, GraphFlow};
//! use std::sync::Arc;
//!
//! let mut builder = DiGraphBuilder::new();
//! builder
//!     .add_node(Arc::new(LlmAgent::new("writer", llm.clone()).with_instruction("Draft it.")))
//!     .add_node(Arc::new(LlmAgent::new("reviewer", llm).with_instruction("Improve it.")))
//!     .add_edge("writer", "reviewer");
//!
//! let result = GraphFlow::new(builder.build()?).run("Write about tennis.").await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI-compatible chat completions (default) |
//! | `neo4j` | Neo4j graph store over Bolt (default) |
//! | `minimal` | No optional features |
//!
//! ## Modules
//!
//! - [`agents`] - Tool-calling LLM agents, sequential pipelines and the runner
//! - [`api`] - Graph visualization web server
//! - [`cli`] - Command-line parsing, output and subcommands
//! - [`fetch`] - Webpage worklist fetcher
//! - [`graph`] - Graph database access (Neo4j and in-memory)
//! - [`llm`] - LLM client implementations
//! - [`rag`] - Graph retrieval augmented generation
//! - [`summarize`] - Meta-question generation for documents
//! - [`tools`] - Tool definitions and registry
//! - [`types`] - Common types and error handling
//! - [`viz`] - Spring layout and Plotly figures
//! - [`workflows`] - Multi-agent graph workflows

#![cfg_attr(docsrs, feature(doc_cfg))]

/// LLM agents, pipelines and sessions.
pub mod agents;
/// Graph visualization HTTP server.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Webpage fetching into Markdown.
pub mod fetch;
/// Graph database access.
pub mod graph;
/// LLM provider clients and abstractions.
pub mod llm;
/// Graph retrieval augmented generation.
pub mod rag;
/// Document meta-question summarizer.
pub mod summarize;
/// Built-in tools (weather, local time).
pub mod tools;
/// Core types (messages, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;
/// Force-directed layout and Plotly figures.
pub mod viz;
/// Multi-agent graph workflows.
pub mod workflows;

// Re-export commonly used types
pub use agents::{Agent, AgentContext, LlmAgent, Runner, SequentialAgent};
pub use api::AppState;
pub use graph::{GraphStore, InMemoryGraphStore};
#[cfg(feature = "neo4j")]
pub use graph::Neo4jStore;
pub use llm::{GenerationParams, LLMClient, LLMClientFactory, LLMResponse, Provider};
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Result};
pub use utils::config::Config;
pub use workflows::{DiGraphBuilder, GraphFlow};
