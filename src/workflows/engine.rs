//! Graph flow scheduler
//!
//! Runs the agents of a [`DiGraph`] step by step. Every node that is ready at
//! the start of a step runs concurrently; results are applied in node
//! declaration order so transcripts are deterministic.

use crate::agents::{AgentContext, TranscriptEntry};
use crate::types::{AppError, Result};
use crate::workflows::graph::{Activation, DiGraph};
use futures::Stream;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::task::JoinSet;
use uuid::Uuid;

/// Default bound on agent runs per flow
pub const DEFAULT_MAX_TURNS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// No node was ready any more
    Completed,
    /// The run budget was spent
    MaxTurns,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    TaskStarted { task: String },
    AgentCompleted { source: String, content: String },
    Stopped { termination: Termination },
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowResult {
    pub messages: Vec<TranscriptEntry>,
    pub termination: Termination,
}

impl FlowResult {
    /// Latest message of each agent
    pub fn last_by_source(&self) -> HashMap<String, String> {
        self.messages
            .iter()
            .map(|m| (m.source.clone(), m.content.clone()))
            .collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.source.as_str()).collect()
    }
}

pub struct GraphFlow {
    graph: DiGraph,
    max_turns: usize,
}

impl GraphFlow {
    pub fn new(graph: DiGraph) -> Self {
        Self {
            graph,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }

    /// Stream the flow's progress for `task`.
    pub fn run_stream(&self, task: &str) -> impl Stream<Item = Result<FlowEvent>> + Send + '_ {
        let task = task.to_string();

        async_stream::try_stream! {
            let graph = &self.graph;
            let session_id = Uuid::new_v4().to_string();
            let mut state: HashMap<String, String> = HashMap::new();
            let mut transcript: Vec<TranscriptEntry> = Vec::new();
            let mut fired: Vec<HashSet<String>> = vec![HashSet::new(); graph.nodes().len()];
            let mut ready: BTreeSet<usize> = graph
                .start_nodes()
                .into_iter()
                .filter_map(|name| graph.position(name))
                .collect();
            let mut turns = 0usize;

            tracing::info!(session = %session_id, nodes = graph.nodes().len(), "Starting graph flow");
            yield FlowEvent::TaskStarted { task: task.clone() };

            let termination = loop {
                if ready.is_empty() {
                    break Termination::Completed;
                }
                if turns >= self.max_turns {
                    break Termination::MaxTurns;
                }

                let budget = self.max_turns - turns;
                let batch: Vec<usize> = ready.iter().copied().take(budget).collect();
                for i in &batch {
                    ready.remove(i);
                    fired[*i].clear();
                }
                turns += batch.len();

                let mut tasks = JoinSet::new();
                for &i in &batch {
                    let agent = graph.nodes()[i].agent.clone();
                    let input = task.clone();
                    let mut context = AgentContext::new(session_id.clone())
                        .with_transcript(transcript.clone());
                    context.state = state.clone();

                    tasks.spawn(async move {
                        let output = agent.execute(&input, &mut context).await;
                        (i, output.map(|content| (content, context)))
                    });
                }

                let mut finished: Vec<(usize, String, AgentContext)> = Vec::with_capacity(batch.len());
                while let Some(joined) = tasks.join_next().await {
                    let (i, output) = joined
                        .map_err(|e| AppError::Internal(format!("Agent task failed: {}", e)))?;
                    let (content, context) = output?;
                    finished.push((i, content, context));
                }
                finished.sort_by_key(|(i, _, _)| *i);

                for (i, content, context) in finished {
                    let source = graph.nodes()[i].name().to_string();
                    state.extend(context.state);
                    transcript.push(TranscriptEntry::new(source.clone(), content.clone()));

                    for edge in graph.outgoing(&source) {
                        if !edge.condition.matches(&content) {
                            continue;
                        }
                        let Some(target) = graph.position(&edge.to) else {
                            continue;
                        };
                        tracing::debug!(from = %edge.from, to = %edge.to, "Edge fired");

                        if edge.condition.is_conditional() {
                            ready.insert(target);
                            continue;
                        }

                        fired[target].insert(source.clone());
                        let node = &graph.nodes()[target];
                        let activate = match node.activation {
                            Activation::Any => true,
                            Activation::All => graph
                                .unconditional_parents(&edge.to)
                                .iter()
                                .all(|p| fired[target].contains(p)),
                        };
                        if activate {
                            ready.insert(target);
                        }
                    }

                    yield FlowEvent::AgentCompleted { source, content };
                }
            };

            tracing::info!(session = %session_id, turns, ?termination, "Graph flow stopped");
            yield FlowEvent::Stopped { termination };
        }
    }

    /// Run the flow to completion and collect its messages.
    pub async fn run(&self, task: &str) -> Result<FlowResult> {
        use futures::StreamExt;

        let stream = self.run_stream(task);
        futures::pin_mut!(stream);

        let mut messages = Vec::new();
        let mut termination = Termination::Completed;
        while let Some(event) = stream.next().await {
            match event? {
                FlowEvent::AgentCompleted { source, content } => {
                    messages.push(TranscriptEntry::new(source, content));
                }
                FlowEvent::Stopped { termination: t } => termination = t,
                FlowEvent::TaskStarted { .. } => {}
            }
        }

        Ok(FlowResult {
            messages,
            termination,
        })
    }
}
