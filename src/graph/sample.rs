//! DSPy and RAG concept graph used by the RAG demo.

use crate::graph::KnowledgeGraph;

pub fn dspy_knowledge_graph() -> KnowledgeGraph {
    let mut kg = KnowledgeGraph::default();

    // Core DSPy concepts
    kg.concept(
        "DSPy",
        "A framework for programming with language models (LMs) that separates model prompting from execution, enabling systematic prompt development and optimization.",
    )
    .concept(
        "DSPy Signature",
        "A class that defines the expected inputs and outputs of a language model operation, making the interface explicit and type-safe.",
    )
    .concept(
        "DSPy Module",
        "A composable unit in DSPy that encapsulates a specific LM operation, can be chained with other modules to create complex workflows.",
    )
    .concept(
        "Teleprompter",
        "DSPy's optimization system that automatically improves prompts based on training data and metric optimization.",
    );

    // DSPy RAG components
    kg.concept(
        "DSPy Retriever",
        "A DSPy module that handles document retrieval, can be customized with different backends like vector stores or knowledge graphs.",
    )
    .concept(
        "ChainOfThought",
        "A DSPy pattern that implements step-by-step reasoning, making the model's thought process explicit and more reliable.",
    )
    .concept(
        "DSPy Predictor",
        "Base class for modules that make predictions, can be extended for specific tasks like question answering or summarization.",
    );

    // Traditional RAG
    kg.concept(
        "Traditional RAG",
        "Classic Retrieval-Augmented Generation approach using direct prompting with retrieved context, typically implemented with string templates.",
    )
    .concept(
        "Prompt Engineering",
        "Manual process of crafting and refining prompts to improve LM performance, often requiring significant trial and error.",
    )
    .concept(
        "Context Window",
        "The maximum amount of text that can be processed by an LM at once, affecting how much retrieved content can be included.",
    );

    // Comparison points
    kg.concept(
        "Modularity",
        "DSPy's approach of breaking down complex LM tasks into composable modules, versus traditional monolithic prompts.",
    )
    .concept(
        "Optimization Approach",
        "DSPy uses systematic optimization with Teleprompter, while traditional RAG relies more on manual prompt tuning.",
    )
    .concept(
        "Retrieval Strategy",
        "DSPy allows for sophisticated retrieval patterns with custom retrievers, while traditional RAG often uses simpler vector similarity.",
    )
    .concept(
        "Maintenance",
        "DSPy's modular approach makes systems easier to maintain and modify, compared to traditional RAG's intertwined prompts and logic.",
    )
    .concept(
        "Debugging Capability",
        "DSPy provides better debugging tools and transparency through its module system, making it easier to identify and fix issues.",
    );

    kg.relate("DSPy", "PROVIDES", "DSPy Signature")
        .relate("DSPy", "PROVIDES", "DSPy Module")
        .relate("DSPy", "INCLUDES", "Teleprompter")
        .relate("DSPy Module", "IMPLEMENTS", "DSPy Retriever")
        .relate("DSPy Module", "IMPLEMENTS", "ChainOfThought")
        .relate("DSPy Module", "EXTENDS", "DSPy Predictor")
        .relate("DSPy Retriever", "IMPROVES", "Retrieval Strategy")
        .relate("ChainOfThought", "ENHANCES", "Debugging Capability")
        .relate("Traditional RAG", "USES", "Prompt Engineering")
        .relate("Traditional RAG", "CONSTRAINED_BY", "Context Window")
        .relate("DSPy", "ENABLES", "Modularity")
        .relate("Teleprompter", "ENABLES", "Optimization Approach")
        .relate("Modularity", "IMPROVES", "Maintenance")
        .relate("Modularity", "FACILITATES", "Debugging Capability")
        .relate("Prompt Engineering", "AFFECTS", "Maintenance")
        .relate("Prompt Engineering", "COMPLICATES", "Debugging Capability")
        .relate("DSPy", "DIFFERS_FROM", "Traditional RAG")
        .relate("DSPy Retriever", "DIFFERS_FROM", "Retrieval Strategy")
        .relate("Teleprompter", "IMPROVES_UPON", "Prompt Engineering");

    kg
}
