use crate::llm::LLMClient;
use crate::rag::retriever::GraphRetriever;
use crate::types::Result;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_QUESTION: &str =
    "What are the key differences between DSPy RAG and traditional RAG approaches?";

/// Returned without calling the model when retrieval finds nothing
pub const NO_CONTEXT_ANSWER: &str = "I apologize, but I couldn't find any relevant information in the knowledge graph to answer your question. Please make sure the knowledge graph has been loaded with data (use --load-data flag) and try asking about DSPy, traditional RAG approaches, or their comparisons.";

const SYSTEM_PROMPT: &str = "Answer questions based on retrieved context from a knowledge graph. \
Give a detailed, graph-informed response based on the provided context.";

const ANSWER_MARKER: &str = "Answer:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RagAnswer {
    pub question: String,
    pub context: Vec<String>,
    /// Step-by-step reasoning preceding the answer, empty if the model gave none
    pub reasoning: String,
    pub answer: String,
}

/// Retrieve passages from the graph, then answer with chain-of-thought prompting
pub struct GraphRag {
    retriever: GraphRetriever,
    llm: Arc<dyn LLMClient>,
}

impl GraphRag {
    pub fn new(retriever: GraphRetriever, llm: Arc<dyn LLMClient>) -> Self {
        tracing::info!(k = retriever.k(), "Initializing GraphRag");
        Self { retriever, llm }
    }

    pub async fn answer(&self, question: &str) -> Result<RagAnswer> {
        tracing::info!(question = %question, "Processing question");

        let context = self.retriever.retrieve(question).await?;
        tracing::debug!(passages = context.len(), "Retrieved context");

        if context.is_empty() {
            tracing::warn!("No context found in knowledge graph");
            return Ok(RagAnswer {
                question: question.to_string(),
                context,
                reasoning: String::new(),
                answer: NO_CONTEXT_ANSWER.to_string(),
            });
        }

        let prompt = build_prompt(&context, question);
        let output = self
            .llm
            .generate_with_system(SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| tracing::error!("Error during answer generation: {}", e))?;

        let (reasoning, answer) = split_answer(&output);
        tracing::info!("Successfully generated answer");
        tracing::debug!(answer = %answer);

        Ok(RagAnswer {
            question: question.to_string(),
            context,
            reasoning,
            answer,
        })
    }
}

/// Numbered context passages, the question, and the output format
pub fn build_prompt(context: &[String], question: &str) -> String {
    let mut prompt = String::from("Context:\n");
    for (i, passage) in context.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\n", i + 1, passage));
    }
    prompt.push_str(&format!("\nQuestion: {}\n\n", question));
    prompt.push_str(
        "Think step by step about how the context answers the question, \
then give the final answer on a new line starting with \"Answer:\".\n\n\
Reasoning: Let's think step by step.",
    );
    prompt
}

/// Split model output at the last `Answer:` marker. Without a marker the
/// whole output is the answer.
pub fn split_answer(output: &str) -> (String, String) {
    match output.rfind(ANSWER_MARKER) {
        Some(pos) => {
            let reasoning = output[..pos].trim();
            let reasoning = reasoning
                .strip_prefix("Reasoning:")
                .unwrap_or(reasoning)
                .trim();
            let answer = output[pos + ANSWER_MARKER.len()..].trim();
            (reasoning.to_string(), answer.to_string())
        }
        None => (String::new(), output.trim().to_string()),
    }
}
