//! Directed agent graphs and their validation.

use crate::agents::Agent;
use crate::types::{AppError, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Predicate evaluated on a source agent's output before an edge fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeCondition {
    Always,
    /// Case-sensitive substring match
    Contains(String),
    /// Fires when any keyword occurs, ignoring case
    Keywords(Vec<String>),
}

impl EdgeCondition {
    pub fn keywords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EdgeCondition::Keywords(words.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, output: &str) -> bool {
        match self {
            EdgeCondition::Always => true,
            EdgeCondition::Contains(needle) => output.contains(needle.as_str()),
            EdgeCondition::Keywords(words) => {
                let lowered = output.to_lowercase();
                words
                    .iter()
                    .any(|w| lowered.contains(w.to_lowercase().as_str()))
            }
        }
    }

    pub fn is_conditional(&self) -> bool {
        !matches!(self, EdgeCondition::Always)
    }
}

impl fmt::Display for EdgeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeCondition::Always => write!(f, "always"),
            EdgeCondition::Contains(needle) => write!(f, "{}", needle),
            EdgeCondition::Keywords(words) => write!(f, "{}", words.join("|")),
        }
    }
}

/// When a node with several unconditional parents becomes ready
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Activation {
    /// Wait until every unconditional parent has fired
    #[default]
    All,
    /// Any fired incoming edge is enough
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: EdgeCondition,
}

#[derive(Clone)]
pub struct GraphNode {
    pub agent: Arc<dyn Agent>,
    pub activation: Activation,
}

impl GraphNode {
    pub fn name(&self) -> &str {
        self.agent.name()
    }
}

/// A validated workflow graph. Nodes keep their declaration order.
#[derive(Clone)]
pub struct DiGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
}

impl DiGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Declaration index of a node
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.position(name).map(|i| &self.nodes[i])
    }

    pub fn outgoing<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == name)
    }

    pub fn incoming<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.to == name)
    }

    /// Parents whose edges into `name` carry no condition
    pub fn unconditional_parents(&self, name: &str) -> HashSet<String> {
        self.incoming(name)
            .filter(|e| !e.condition.is_conditional())
            .map(|e| e.from.clone())
            .collect()
    }

    /// Nodes without incoming edges, in declaration order
    pub fn start_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .map(|n| n.name())
            .filter(|name| self.incoming(name).next().is_none())
            .collect()
    }
}

#[derive(Default)]
pub struct DiGraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
    activations: Vec<(String, Activation)>,
}

impl DiGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, agent: Arc<dyn Agent>) -> &mut Self {
        self.nodes.push(GraphNode {
            agent,
            activation: Activation::All,
        });
        self
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> &mut Self {
        self.add_conditional_edge(from, to, EdgeCondition::Always)
    }

    pub fn add_conditional_edge(
        &mut self,
        from: &str,
        to: &str,
        condition: EdgeCondition,
    ) -> &mut Self {
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            condition,
        });
        self
    }

    pub fn set_activation(&mut self, node: &str, activation: Activation) -> &mut Self {
        self.activations.push((node.to_string(), activation));
        self
    }

    pub fn build(&self) -> Result<DiGraph> {
        if self.nodes.is_empty() {
            return Err(AppError::InvalidInput("Graph has no nodes".to_string()));
        }

        let mut index = HashMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.name().to_string(), i).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate node name: {}",
                    node.name()
                )));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !index.contains_key(endpoint) {
                    return Err(AppError::InvalidInput(format!(
                        "Edge {} -> {} references unknown node '{}'",
                        edge.from, edge.to, endpoint
                    )));
                }
            }
        }

        let mut nodes = self.nodes.clone();
        for (name, activation) in &self.activations {
            let i = *index.get(name).ok_or_else(|| {
                AppError::InvalidInput(format!("Cannot set activation on unknown node '{}'", name))
            })?;
            nodes[i].activation = *activation;
        }

        let graph = DiGraph {
            nodes,
            edges: self.edges.clone(),
            index,
        };

        if graph.start_nodes().is_empty() {
            return Err(AppError::InvalidInput(
                "Graph has no start node (every node has an incoming edge)".to_string(),
            ));
        }

        if let Some(node) = unconditional_cycle(&graph) {
            return Err(AppError::InvalidInput(format!(
                "Cycle through '{}' has no conditional edge to exit it",
                node
            )));
        }

        Ok(graph)
    }
}

/// First node found on a cycle made only of unconditional edges.
fn unconditional_cycle(graph: &DiGraph) -> Option<String> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(graph: &DiGraph, i: usize, marks: &mut [Mark]) -> Option<usize> {
        marks[i] = Mark::Active;
        let name = graph.nodes[i].name();
        for edge in graph.outgoing(name).filter(|e| !e.condition.is_conditional()) {
            let j = graph.index[&edge.to];
            match marks[j] {
                Mark::Active => return Some(j),
                Mark::New => {
                    if let Some(found) = visit(graph, j, marks) {
                        return Some(found);
                    }
                }
                Mark::Done => {}
            }
        }
        marks[i] = Mark::Done;
        None
    }

    let mut marks = vec![Mark::New; graph.nodes.len()];
    (0..graph.nodes.len()).find_map(|i| {
        if marks[i] == Mark::New {
            visit(graph, i, &mut marks).map(|j| graph.nodes[j].name().to_string())
        } else {
            None
        }
    })
}
