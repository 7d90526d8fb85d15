use crate::graph::{ConceptQuery, GraphStore};
use crate::types::Result;
use std::sync::Arc;

/// Default number of passages retrieved per question
pub const DEFAULT_K: usize = 3;

/// Lowercase the query, drop common question openers and `?`, trim.
pub fn clean_query(query: &str) -> String {
    query
        .to_lowercase()
        .replace("what is", "")
        .replace("what are", "")
        .replace("how does", "")
        .replace('?', "")
        .trim()
        .to_string()
}

/// Keyword retriever over `Concept` nodes
#[derive(Clone)]
pub struct GraphRetriever {
    store: Arc<dyn GraphStore>,
    k: usize,
    boost_keywords: Vec<String>,
    related_types: Vec<String>,
}

impl GraphRetriever {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            store,
            k: DEFAULT_K,
            boost_keywords: vec!["dspy".to_string(), "rag".to_string()],
            related_types: ["DIFFERS_FROM", "IMPROVES_UPON", "PROVIDES", "IMPLEMENTS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Passages for `question`, best first. Falls back to a per-word search
    /// over the cleaned query when the main search finds nothing.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<String>> {
        let cleaned = clean_query(question);
        tracing::info!(query = %question, "Starting retrieval");
        tracing::debug!(clean_query = %cleaned, "Cleaned query");

        let query = ConceptQuery {
            query_text: question.to_string(),
            clean_query: cleaned.clone(),
            boost_keywords: self.boost_keywords.clone(),
            related_types: self.related_types.clone(),
            limit: self.k,
        };

        let hits = self.store.search_concepts(&query).await?;
        if !hits.is_empty() {
            for (i, hit) in hits.iter().enumerate() {
                tracing::debug!(rank = i + 1, relevance = hit.relevance, passage = %hit.passage);
            }
            return Ok(hits.into_iter().map(|h| h.passage).collect());
        }

        tracing::warn!(query = %question, "No results found, trying word fallback");
        let words: Vec<String> = cleaned.split(' ').map(str::to_string).collect();
        let passages = self.store.search_concepts_by_words(&words, self.k).await?;
        tracing::info!(count = passages.len(), "Retrieval complete");
        Ok(passages)
    }
}
