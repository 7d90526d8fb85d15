//! Graph RAG pipeline
//!
//! Retrieval runs a keyword concept search against a [`GraphStore`](crate::graph::GraphStore)
//! and generation prompts the language model with the retrieved passages.
//!
//! # Module Structure
//!
//! - [`rag::retriever`](crate::rag::retriever) - Query cleaning and keyword retrieval with a word fallback
//! - [`rag::pipeline`](crate::rag::pipeline) - Retrieve, then reason step by step to an answer
//!
//! # Example
//!
//! ```ignore
//! use agentlab::graph::{sample::dspy_knowledge_graph, GraphStore, InMemoryGraphStore};
//! use agentlab::rag::{GraphRag, GraphRetriever};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryGraphStore::with_graph(&dspy_knowledge_graph()));
//! let rag = GraphRag::new(GraphRetriever::new(store), llm);
//! let answer = rag.answer("What is a Teleprompter?").await?;
//! println!("{}", answer.answer);
//! ```

/// Retrieve, then generate.
pub mod pipeline;
/// Keyword retrieval over concepts.
pub mod retriever;

pub use pipeline::{GraphRag, RagAnswer, DEFAULT_QUESTION, NO_CONTEXT_ANSWER};
pub use retriever::{clean_query, GraphRetriever};
