use crate::graph::{ConceptHit, ConceptQuery, GraphTriple, KnowledgeGraph, LoadStats};
use crate::types::Result;
use async_trait::async_trait;

/// Operations the crate needs from a graph database
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Every `(n)-[r]->(m)` triple in the database
    async fn fetch_triples(&self) -> Result<Vec<GraphTriple>>;

    /// Keyword concept search, ordered by relevance (highest first)
    async fn search_concepts(&self, query: &ConceptQuery) -> Result<Vec<ConceptHit>>;

    /// Concepts whose name or text contains any of `words`, as `name: text`
    async fn search_concepts_by_words(&self, words: &[String], limit: usize)
        -> Result<Vec<String>>;

    /// Replace the database contents with `graph`
    async fn load_knowledge_graph(&self, graph: &KnowledgeGraph) -> Result<LoadStats>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}
