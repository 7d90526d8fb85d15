//! Multi-Agent Workflow Module
//!
//! Workflows are directed graphs of agents. Edges may carry a condition on
//! the source agent's output; nodes that become ready in the same step run
//! concurrently, and their outputs join a shared transcript.
//!
//! # Usage
//!
//! ```ignore
//! let mut builder = DiGraphBuilder::new();
//! builder
//!     .add_node(writer)
//!     .add_node(reviewer)
//!     .add_edge("writer", "reviewer");
//!
//! let flow = GraphFlow::new(builder.build()?);
//! let result = flow.run("Write a short paragraph about tennis.").await?;
//! println!("{:?}", result.last_by_source().get("reviewer"));
//! ```

/// Demo flows (sequence, conditional, parallel, loop).
pub mod demos;
/// Scheduler.
pub mod engine;
/// Graph definition and validation.
pub mod graph;
/// Text, DOT and HTML rendering.
pub mod render;

pub use demos::{build_flow, DemoFlow, FlowKind};
pub use engine::{FlowEvent, FlowResult, GraphFlow, Termination, DEFAULT_MAX_TURNS};
pub use graph::{Activation, DiGraph, DiGraphBuilder, Edge, EdgeCondition};
