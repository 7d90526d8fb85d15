use crate::graph::{
    concept_matches, concept_relevance, format_passage, ConceptHit, ConceptQuery, GraphNode,
    GraphStore, GraphTriple, KnowledgeGraph, LoadStats,
};
use crate::types::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Inner {
    /// (name, text)
    concepts: Vec<(String, String)>,
    /// (from index, relation type, to index)
    relations: Vec<(usize, String, usize)>,
}

/// Graph store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    inner: RwLock<Inner>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `graph`
    pub fn with_graph(graph: &KnowledgeGraph) -> Self {
        let store = Self::new();
        store.replace(graph);
        store
    }

    fn replace(&self, graph: &KnowledgeGraph) -> LoadStats {
        let mut inner = self.inner.write();
        inner.concepts = graph
            .concepts
            .iter()
            .map(|c| (c.name.clone(), c.text.clone()))
            .collect();

        let position = |name: &str, concepts: &[(String, String)]| {
            concepts.iter().position(|(n, _)| n == name)
        };

        let mut relations: Vec<(usize, String, usize)> = Vec::new();
        for rel in &graph.relations {
            match (
                position(&rel.from, &inner.concepts),
                position(&rel.to, &inner.concepts),
            ) {
                (Some(a), Some(b)) => {
                    let entry = (a, rel.relation.clone(), b);
                    if !relations.contains(&entry) {
                        relations.push(entry);
                    }
                }
                _ => tracing::warn!(
                    from = %rel.from,
                    to = %rel.to,
                    "Skipping relation between unknown concepts"
                ),
            }
        }
        inner.relations = relations;

        LoadStats {
            concepts: inner.concepts.len(),
            relations: inner.relations.len(),
        }
    }

    fn node(inner: &Inner, i: usize) -> GraphNode {
        GraphNode {
            id: i.to_string(),
            labels: vec!["Concept".to_string()],
            name: Some(inner.concepts[i].0.clone()),
        }
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn fetch_triples(&self) -> Result<Vec<GraphTriple>> {
        let inner = self.inner.read();
        Ok(inner
            .relations
            .iter()
            .map(|(a, rel, b)| GraphTriple {
                source: Self::node(&inner, *a),
                relation: rel.clone(),
                target: Self::node(&inner, *b),
            })
            .collect())
    }

    async fn search_concepts(&self, query: &ConceptQuery) -> Result<Vec<ConceptHit>> {
        let inner = self.inner.read();

        let mut hits: Vec<ConceptHit> = inner
            .concepts
            .iter()
            .enumerate()
            .filter(|(_, (name, text))| concept_matches(name, text, query))
            .map(|(i, (name, text))| {
                let mut related: Vec<String> = Vec::new();
                for (a, rel, b) in &inner.relations {
                    if !query.related_types.iter().any(|t| t == rel) {
                        continue;
                    }
                    let other = if *a == i {
                        *b
                    } else if *b == i {
                        *a
                    } else {
                        continue;
                    };
                    let other_name = &inner.concepts[other].0;
                    if !related.contains(other_name) {
                        related.push(other_name.clone());
                    }
                }

                ConceptHit {
                    passage: format_passage(name, text, &related),
                    relevance: concept_relevance(name, text, query),
                }
            })
            .collect();

        hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        hits.truncate(query.limit);
        Ok(hits)
    }

    async fn search_concepts_by_words(
        &self,
        words: &[String],
        limit: usize,
    ) -> Result<Vec<String>> {
        let words: Vec<String> = words
            .iter()
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.inner.read();
        Ok(inner
            .concepts
            .iter()
            .filter(|(name, text)| {
                let name = name.to_lowercase();
                let text = text.to_lowercase();
                words
                    .iter()
                    .any(|w| name.contains(w.as_str()) || text.contains(w.as_str()))
            })
            .map(|(name, text)| format_passage(name, text, &[]))
            .take(limit)
            .collect())
    }

    async fn load_knowledge_graph(&self, graph: &KnowledgeGraph) -> Result<LoadStats> {
        let stats = self.replace(graph);
        tracing::info!(
            concepts = stats.concepts,
            relations = stats.relations,
            "Loaded knowledge graph into memory"
        );
        Ok(stats)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
