//! Graph RAG integration tests over the in-memory store.

mod common;

use agentlab::cli::commands::answer_question;
use agentlab::cli::output::Output;
use agentlab::graph::sample::dspy_knowledge_graph;
use agentlab::graph::{GraphStore, InMemoryGraphStore};
use agentlab::rag::{GraphRag, GraphRetriever, DEFAULT_QUESTION, NO_CONTEXT_ANSWER};
use common::mocks::MockLLMClient;
use std::sync::Arc;

fn sample_store() -> Arc<InMemoryGraphStore> {
    Arc::new(InMemoryGraphStore::with_graph(&dspy_knowledge_graph()))
}

#[tokio::test]
async fn test_default_question_uses_three_passages() {
    let llm = MockLLMClient::new(
        "Reasoning: DSPy compiles prompts while traditional RAG hand-writes them.\nAnswer: DSPy optimizes the pipeline automatically.",
    )
    .into_arc();
    let rag = GraphRag::new(GraphRetriever::new(sample_store()), llm.clone());

    let answer = rag.answer(DEFAULT_QUESTION).await.unwrap();

    assert_eq!(answer.context.len(), 3);
    assert_eq!(answer.answer, "DSPy optimizes the pipeline automatically.");
    assert!(answer.reasoning.starts_with("DSPy compiles prompts"));

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    let prompt = calls[0].first_user().unwrap();
    assert!(prompt.starts_with("Context:\n[1] "));
    assert!(prompt.contains("\n[3] "));
    assert!(!prompt.contains("\n[4] "));
    assert!(prompt.contains(&format!("Question: {}", DEFAULT_QUESTION)));
}

#[tokio::test]
async fn test_exact_concept_ranks_first() {
    let llm = MockLLMClient::new("Answer: ok").into_arc();
    let rag = GraphRag::new(GraphRetriever::new(sample_store()).with_k(1), llm);

    let answer = rag.answer("What is Teleprompter?").await.unwrap();

    assert_eq!(answer.context.len(), 1);
    assert!(answer.context[0].starts_with("Teleprompter"));
}

#[tokio::test]
async fn test_empty_graph_returns_apology_without_model_call() {
    let llm = MockLLMClient::new("should not be used").into_arc();
    let store: Arc<dyn GraphStore> = Arc::new(InMemoryGraphStore::new());

    let answer = answer_question(&Output::no_color(), store, llm.clone(), "What is DSPy?", false)
        .await
        .unwrap();

    assert_eq!(answer.answer, NO_CONTEXT_ANSWER);
    assert!(answer.context.is_empty());
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_load_data_populates_empty_store() {
    let llm = MockLLMClient::new("Answer: loaded").into_arc();
    let store = Arc::new(InMemoryGraphStore::new());

    let answer = answer_question(
        &Output::no_color(),
        store.clone(),
        llm.clone(),
        "What is DSPy?",
        true,
    )
    .await
    .unwrap();

    assert_eq!(answer.answer, "loaded");
    assert!(!answer.context.is_empty());
    assert_eq!(store.fetch_triples().await.unwrap().len(), 19);
}

#[tokio::test]
async fn test_model_error_is_returned() {
    let llm = MockLLMClient::failing().into_arc();
    let rag = GraphRag::new(GraphRetriever::new(sample_store()), llm);

    let err = rag.answer("What is DSPy?").await.unwrap_err();
    assert!(err.to_string().contains("Mock LLM failure"));
}
