use crate::graph::{
    ConceptHit, ConceptQuery, GraphNode, GraphStore, GraphTriple, KnowledgeGraph, LoadStats,
};
use crate::types::{AppError, Result};
use crate::utils::config::Neo4jConfig;
use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Node, Query, Relation};

const TRIPLES_QUERY: &str = "MATCH (n)-[r]->(m) RETURN n, r, m";

const CONCEPT_SEARCH_QUERY: &str = r#"
MATCH (c:Concept)
WHERE
    toLower(c.name) CONTAINS toLower($query_text)
    OR toLower(c.text) CONTAINS toLower($query_text)
    OR ($clean_query <> '' AND (
        toLower(c.name) CONTAINS toLower($clean_query)
        OR toLower(c.text) CONTAINS toLower($clean_query)))
    OR ANY(kw IN $keywords WHERE
        toLower($query_text) CONTAINS kw
        AND (toLower(c.name) CONTAINS kw OR toLower(c.text) CONTAINS kw))
WITH c,
    CASE
        WHEN toLower(c.name) CONTAINS toLower($query_text) THEN 3
        WHEN toLower(c.text) CONTAINS toLower($query_text) THEN 2
        WHEN $clean_query <> '' AND toLower(c.name) CONTAINS toLower($clean_query) THEN 2
        WHEN $clean_query <> '' AND toLower(c.text) CONTAINS toLower($clean_query) THEN 1
        ELSE 0
    END AS relevance
OPTIONAL MATCH (c)-[r]-(related:Concept)
WHERE type(r) IN $related_types
WITH c, relevance, collect(DISTINCT related.name) AS related_concepts
RETURN
    CASE
        WHEN size(related_concepts) > 0
        THEN c.name + ' (related: ' + substring(reduce(s = '', n IN related_concepts | s + ', ' + n), 2) + '): ' + c.text
        ELSE c.name + ': ' + c.text
    END AS result,
    relevance
ORDER BY relevance DESC
LIMIT $limit
"#;

const WORD_SEARCH_QUERY: &str = r#"
MATCH (c:Concept)
WHERE ANY(word IN $words
    WHERE toLower(c.name) CONTAINS word
    OR toLower(c.text) CONTAINS word)
RETURN c.name + ': ' + c.text AS result
LIMIT $limit
"#;

fn db_error(context: &str) -> impl Fn(neo4rs::Error) -> AppError + '_ {
    move |e| AppError::Database(format!("{}: {}", context, e))
}

fn decode_error(context: &str) -> impl Fn(neo4rs::DeError) -> AppError + '_ {
    move |e| AppError::Database(format!("{}: {}", context, e))
}

/// Relationship types are spliced into Cypher text, so only upper snake case
/// identifiers are accepted.
fn validate_relation_type(relation: &str) -> Result<()> {
    let valid = !relation.is_empty()
        && relation
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && !relation.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Invalid relationship type: {}",
            relation
        )))
    }
}

/// Graph store backed by a Neo4j server
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let bolt = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()
            .map_err(db_error("Invalid Neo4j configuration"))?;

        let graph = Graph::connect(bolt)
            .await
            .map_err(db_error("Failed to connect to Neo4j"))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    async fn strings(&self, q: Query, column: &str) -> Result<Vec<String>> {
        let mut rows = self
            .graph
            .execute(q)
            .await
            .map_err(db_error("Neo4j query failed"))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error("Neo4j stream failed"))? {
            out.push(
                row.get::<String>(column)
                    .map_err(decode_error("Unexpected Neo4j row"))?,
            );
        }
        Ok(out)
    }

    async fn count(&self, cypher: &str) -> Result<usize> {
        let mut rows = self
            .graph
            .execute(query(cypher))
            .await
            .map_err(db_error("Neo4j count failed"))?;

        match rows.next().await.map_err(db_error("Neo4j stream failed"))? {
            Some(row) => {
                let n = row
                    .get::<i64>("count")
                    .map_err(decode_error("Unexpected Neo4j row"))?;
                Ok(n.max(0) as usize)
            }
            None => Ok(0),
        }
    }

    fn node(node: &Node) -> GraphNode {
        GraphNode {
            id: node.id().to_string(),
            labels: node.labels().into_iter().map(|l| l.to_string()).collect(),
            name: node.get::<String>("name").ok(),
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn fetch_triples(&self) -> Result<Vec<GraphTriple>> {
        let mut rows = self
            .graph
            .execute(query(TRIPLES_QUERY))
            .await
            .map_err(db_error("Failed to fetch graph data"))?;

        let mut triples = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error("Neo4j stream failed"))? {
            let n: Node = row.get("n").map_err(decode_error("Unexpected node"))?;
            let r: Relation = row.get("r").map_err(decode_error("Unexpected relation"))?;
            let m: Node = row.get("m").map_err(decode_error("Unexpected node"))?;
            triples.push(GraphTriple {
                source: Self::node(&n),
                relation: r.typ().to_string(),
                target: Self::node(&m),
            });
        }

        tracing::debug!(count = triples.len(), "Fetched triples from Neo4j");
        Ok(triples)
    }

    async fn search_concepts(&self, q: &ConceptQuery) -> Result<Vec<ConceptHit>> {
        let keywords: Vec<String> = q.boost_keywords.iter().map(|k| k.to_lowercase()).collect();
        let cypher = query(CONCEPT_SEARCH_QUERY)
            .param("query_text", q.query_text.as_str())
            .param("clean_query", q.clean_query.as_str())
            .param("keywords", keywords)
            .param("related_types", q.related_types.clone())
            .param("limit", q.limit as i64);

        let mut rows = self
            .graph
            .execute(cypher)
            .await
            .map_err(db_error("Concept search failed"))?;

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error("Neo4j stream failed"))? {
            let passage: String = row
                .get("result")
                .map_err(decode_error("Unexpected Neo4j row"))?;
            let relevance: i64 = row
                .get("relevance")
                .map_err(decode_error("Unexpected Neo4j row"))?;
            hits.push(ConceptHit {
                passage,
                relevance: relevance.clamp(0, 3) as u8,
            });
        }
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

        let cypher = query(WORD_SEARCH_QUERY)
            .param("words", words)
            .param("limit", limit as i64);
        self.strings(cypher, "result").await
    }

    async fn load_knowledge_graph(&self, kg: &KnowledgeGraph) -> Result<LoadStats> {
        for rel in &kg.relations {
            validate_relation_type(&rel.relation)?;
        }

        tracing::info!("Clearing existing Neo4j data");
        self.graph
            .run(query("MATCH (n) DETACH DELETE n"))
            .await
            .map_err(db_error("Failed to clear graph"))?;

        for concept in &kg.concepts {
            self.graph
                .run(
                    query("CREATE (c:Concept {name: $name, text: $text})")
                        .param("name", concept.name.as_str())
                        .param("text", concept.text.as_str()),
                )
                .await
                .map_err(db_error("Failed to create concept"))?;
        }

        for rel in &kg.relations {
            let cypher = format!(
                "MATCH (a:Concept {{name: $from}}), (b:Concept {{name: $to}}) MERGE (a)-[:{}]->(b)",
                rel.relation
            );
            self.graph
                .run(
                    query(&cypher)
                        .param("from", rel.from.as_str())
                        .param("to", rel.to.as_str()),
                )
                .await
                .map_err(db_error("Failed to create relationship"))?;
        }

        let stats = LoadStats {
            concepts: self.count("MATCH (n:Concept) RETURN count(n) AS count").await?,
            relations: self.count("MATCH ()-[r]->() RETURN count(r) AS count").await?,
        };
        tracing::info!(
            concepts = stats.concepts,
            relations = stats.relations,
            "Loaded knowledge graph into Neo4j"
        );
        Ok(stats)
    }

    fn backend(&self) -> &'static str {
        "neo4j"
    }
}
