//! Graph database access
//!
//! The [`GraphStore`] trait covers everything the crate asks of a graph
//! database: dumping all triples for visualization, concept search for RAG,
//! and loading the sample knowledge graph.
//!
//! Two implementations are provided:
//! - [`Neo4jStore`] (feature `neo4j`) talks Bolt to a Neo4j server
//! - [`InMemoryGraphStore`] keeps the graph in process, with the same search
//!   semantics, for tests and `--in-memory` runs

/// In-process graph store.
pub mod memory;
/// Neo4j graph store.
#[cfg(feature = "neo4j")]
pub mod neo4j;
/// DSPy / RAG sample knowledge graph.
pub mod sample;
/// Store trait.
pub mod traits;

pub use memory::InMemoryGraphStore;
#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jStore;
pub use traits::GraphStore;

use serde::{Deserialize, Serialize};

/// A database node as returned by a triple query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub labels: Vec<String>,
    /// The node's `name` property, when present
    pub name: Option<String>,
}

impl GraphNode {
    /// The `name` property, or `Node {id}` when absent
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Node {}", self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTriple {
    pub source: GraphNode,
    pub relation: String,
    pub target: GraphNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRelation {
    pub from: String,
    pub relation: String,
    pub to: String,
}

/// Concepts and the typed relations between them, referenced by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub concepts: Vec<Concept>,
    pub relations: Vec<ConceptRelation>,
}

impl KnowledgeGraph {
    pub fn concept(&mut self, name: &str, text: &str) -> &mut Self {
        self.concepts.push(Concept {
            name: name.to_string(),
            text: text.to_string(),
        });
        self
    }

    pub fn relate(&mut self, from: &str, relation: &str, to: &str) -> &mut Self {
        self.relations.push(ConceptRelation {
            from: from.to_string(),
            relation: relation.to_string(),
            to: to.to_string(),
        });
        self
    }
}

/// Parameters of a keyword concept search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptQuery {
    pub query_text: String,
    pub clean_query: String,
    /// Keywords that match a concept when they occur in both query and concept
    pub boost_keywords: Vec<String>,
    /// Relation types whose neighbours are listed in the passage
    pub related_types: Vec<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptHit {
    pub passage: String,
    pub relevance: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub concepts: usize,
    pub relations: usize,
}

/// Whether a concept matches `query`, comparing case-insensitively.
///
/// An empty cleaned query never matches on its own.
pub fn concept_matches(name: &str, text: &str, query: &ConceptQuery) -> bool {
    let name = name.to_lowercase();
    let text = text.to_lowercase();
    let full = query.query_text.to_lowercase();
    let clean = query.clean_query.to_lowercase();

    let direct = name.contains(&full) || text.contains(&full);
    let cleaned = !clean.is_empty() && (name.contains(&clean) || text.contains(&clean));
    let boosted = query.boost_keywords.iter().any(|kw| {
        let kw = kw.to_lowercase();
        full.contains(&kw) && (name.contains(&kw) || text.contains(&kw))
    });

    direct || cleaned || boosted
}

/// Relevance score, first matching rule wins: 3 name contains query, 2 text
/// contains query, 2 name contains cleaned query, 1 text contains cleaned
/// query, else 0.
pub fn concept_relevance(name: &str, text: &str, query: &ConceptQuery) -> u8 {
    let name = name.to_lowercase();
    let text = text.to_lowercase();
    let full = query.query_text.to_lowercase();
    let clean = query.clean_query.to_lowercase();

    if name.contains(&full) {
        3
    } else if text.contains(&full) {
        2
    } else if !clean.is_empty() && name.contains(&clean) {
        2
    } else if !clean.is_empty() && text.contains(&clean) {
        1
    } else {
        0
    }
}

/// `name (related: a, b): text`, or `name: text` without neighbours
pub fn format_passage(name: &str, text: &str, related: &[String]) -> String {
    if related.is_empty() {
        format!("{}: {}", name, text)
    } else {
        format!("{} (related: {}): {}", name, related.join(", "), text)
    }
}
