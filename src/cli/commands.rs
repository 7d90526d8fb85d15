//! Subcommand implementations
//!
//! Each `run_*` entry point takes the loaded [`Config`] and builds its own
//! clients. The inner helpers take ready-made clients and stores so they can
//! be driven directly with test doubles.

use crate::agents::demos::build_agent;
use crate::agents::{AgentEventKind, AgentKind, RunOutput, Runner, TranscriptEntry};
use crate::api::{create_router, AppState};
use crate::cli::output::{Output, RULE_WIDTH};
use crate::fetch::{run_fetch, FetchOptions, FetchSummary};
use crate::graph::sample::dspy_knowledge_graph;
use crate::graph::{GraphStore, InMemoryGraphStore};
use crate::llm::{GenerationParams, LLMClient, LLMClientFactory, Provider, ProviderFactory};
use crate::rag::{GraphRag, GraphRetriever, RagAnswer};
use crate::summarize::{generation_params, MetaQuestionGenerator, SummaryReport};
use crate::tools::WeatherApiClient;
use crate::types::{AppError, Result};
use crate::utils::config::Config;
use crate::workflows::demos::{parse_choice, CONDITIONAL_TASKS};
use crate::workflows::{build_flow, render, DemoFlow, FlowEvent, FlowKind, FlowResult, Termination};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;

/// LLM client for the configured provider
pub fn llm_client(config: &Config, params: GenerationParams) -> Result<Arc<dyn LLMClient>> {
    let factory = ProviderFactory::new(Provider::from_config(&config.llm)?);
    tracing::debug!(
        provider = factory.provider().name(),
        model = %config.llm.model,
        "Creating LLM client"
    );
    factory.create(params)
}

/// Neo4j, or the sample graph held in memory
pub async fn open_graph_store(config: &Config, in_memory: bool) -> Result<Arc<dyn GraphStore>> {
    if in_memory {
        tracing::info!("Using in-memory graph store seeded with the sample knowledge graph");
        return Ok(Arc::new(InMemoryGraphStore::with_graph(
            &dspy_knowledge_graph(),
        )));
    }

    #[cfg(feature = "neo4j")]
    {
        let store = crate::graph::Neo4jStore::connect(config.require_neo4j()?).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "neo4j"))]
    {
        let _ = config;
        Err(AppError::Configuration(
            "Neo4j support not compiled in; rebuild with the `neo4j` feature or pass --in-memory"
                .to_string(),
        ))
    }
}

// ============= agent =============

pub async fn run_agent_command(
    config: &Config,
    output: &Output,
    kind: AgentKind,
    query: Option<String>,
) -> Result<Vec<RunOutput>> {
    let llm = llm_client(config, GenerationParams::default())?;
    if config.weather.api_key.is_none() && kind.expand().contains(&AgentKind::Weather) {
        tracing::warn!("WEATHERAPI_KEY is not set; weather and time lookups will fail");
    }
    let weather = WeatherApiClient::new(
        config.weather.api_key.clone().unwrap_or_default(),
        config.weather.base_url.clone(),
    );
    run_agents(output, llm, weather, kind, query.as_deref()).await
}

/// Run each agent the selection expands to, printing every final response.
pub async fn run_agents(
    output: &Output,
    llm: Arc<dyn LLMClient>,
    weather: WeatherApiClient,
    kind: AgentKind,
    query: Option<&str>,
) -> Result<Vec<RunOutput>> {
    let mut runs = Vec::new();
    for kind in kind.expand() {
        let Some(agent) = build_agent(kind, llm.clone(), weather.clone()) else {
            continue;
        };
        let query = query.unwrap_or_else(|| kind.default_query());

        output.text(&format!(
            "Running {} agent with query: '{}'",
            kind.label(),
            query
        ));
        let run = Runner::new(agent).run(query).await?;
        for event in &run.events {
            if let AgentEventKind::Response { content } = &event.kind {
                output.text(&format!("Agent response: {}", content));
            }
        }
        runs.push(run);
    }
    Ok(runs)
}

// ============= workflow =============

pub async fn run_workflow_command(
    config: &Config,
    output: &Output,
    kind: FlowKind,
    choice: Option<String>,
    html: Option<&Path>,
    dot: Option<&Path>,
) -> Result<FlowResult> {
    let llm = llm_client(config, GenerationParams::default())?;
    let choice = resolve_choice(output, kind, choice);
    let demo = build_flow(kind, llm, choice)?;
    run_demo_flow(output, &demo, html, dot).await
}

/// Task index for the conditional flow, asking on stdin when no choice was given
fn resolve_choice(output: &Output, kind: FlowKind, choice: Option<String>) -> usize {
    if kind != FlowKind::Conditional {
        return 0;
    }

    let input = match choice {
        Some(choice) => choice,
        None => {
            output.text("Choose a task:");
            for (i, task) in CONDITIONAL_TASKS.iter().enumerate() {
                output.text(&format!("[{}] {}", i + 1, task));
            }
            output
                .prompt("\nEnter your choice (1-3): ")
                .unwrap_or_default()
        }
    };

    let (index, notice) = parse_choice(&input);
    if let Some(notice) = notice {
        output.text(notice);
    }
    index
}

/// Print the graph, stream the run with progress lines, then the report
pub async fn run_demo_flow(
    output: &Output,
    demo: &DemoFlow,
    html: Option<&Path>,
    dot: Option<&Path>,
) -> Result<FlowResult> {
    output.banner(demo.start_banner);
    if demo.kind == FlowKind::Conditional {
        output.text(&format!("Selected task: {}\n", demo.task));
    } else {
        output.text(&format!("Task: {}\n", demo.task));
    }

    show_graph(output, demo, html, dot)?;

    let stream = demo.flow.run_stream(&demo.task);
    futures::pin_mut!(stream);

    let mut messages = Vec::new();
    let mut termination = Termination::Completed;
    while let Some(event) = stream.next().await {
        match event? {
            FlowEvent::AgentCompleted { source, content } => {
                output.agent_completed(&source);
                messages.push(TranscriptEntry::new(source, content));
            }
            FlowEvent::Stopped { termination: t } => termination = t,
            FlowEvent::TaskStarted { .. } => {}
        }
    }
    let result = FlowResult {
        messages,
        termination,
    };

    if result.termination == Termination::MaxTurns {
        output.warning("Workflow stopped after reaching the maximum number of agent turns.");
    }

    let last = result.last_by_source();
    for section in demo.sections(&last) {
        output.section(section.title);
        if let Some(content) = last.get(section.source) {
            output.text(content);
        }
    }
    output.banner(demo.end_banner);

    Ok(result)
}

fn show_graph(
    output: &Output,
    demo: &DemoFlow,
    html: Option<&Path>,
    dot: Option<&Path>,
) -> Result<()> {
    let graph = demo.flow.graph();

    output.section("GRAPHFLOW VISUALIZATION");
    output.text(&render::describe(graph));
    output.text("ASCII Visualization:");
    output.text(&render::ascii(graph));

    if let Some(path) = html {
        std::fs::write(path, render::to_html(graph))?;
        output.text(&format!("\nGraph visualization saved to: {}", path.display()));
    }
    if let Some(path) = dot {
        std::fs::write(path, render::to_dot(graph))?;
        output.text(&format!("Graphviz description saved to: {}", path.display()));
    }

    output.text(&format!("\n{}\n", "=".repeat(RULE_WIDTH)));
    Ok(())
}

// ============= rag =============

pub async fn run_rag_command(
    config: &Config,
    output: &Output,
    question: &str,
    load_data: bool,
    in_memory: bool,
) -> Result<RagAnswer> {
    let llm = llm_client(config, GenerationParams::default())?;
    let store = open_graph_store(config, in_memory).await?;
    answer_question(output, store, llm, question, load_data).await
}

/// Optionally (re)load the sample graph, then answer and print
pub async fn answer_question(
    output: &Output,
    store: Arc<dyn GraphStore>,
    llm: Arc<dyn LLMClient>,
    question: &str,
    load_data: bool,
) -> Result<RagAnswer> {
    if load_data {
        tracing::info!("Loading sample data into the {} graph store", store.backend());
        match store.load_knowledge_graph(&dspy_knowledge_graph()).await {
            Ok(stats) => {
                tracing::info!(
                    "Sample data loaded: {} concepts, {} relationships",
                    stats.concepts,
                    stats.relations
                );
                output.info(
                    "Knowledge graph data loaded successfully. Ready to answer questions about DSPy and RAG approaches.",
                );
            }
            Err(e) => tracing::error!("Error loading sample data: {}", e),
        }
    } else {
        tracing::info!(
            "Running without loading data (use --load-data flag to load/refresh knowledge graph data)"
        );
        output.warning(
            "Running without loading data. If you get no results, try running with --load-data flag.",
        );
    }

    let rag = GraphRag::new(GraphRetriever::new(store), llm);
    tracing::info!("Processing question: {}", question);
    let answer = rag.answer(question).await?;
    tracing::debug!(reasoning = %answer.reasoning, context = answer.context.len(), "Generated response");

    output.text(&format!("\nQuestion: {}", answer.question));
    output.text(&format!("\nAnswer:\n{}", answer.answer));
    Ok(answer)
}

// ============= fetch =============

pub async fn run_fetch_command(options: &FetchOptions) -> Result<FetchSummary> {
    run_fetch(options).await
}

// ============= meta-questions =============

pub async fn run_meta_questions_command(
    config: &Config,
    output: &Output,
    input_dir: &Path,
    report: &Path,
) -> Result<SummaryReport> {
    let llm = llm_client(config, generation_params())?;
    let summary = MetaQuestionGenerator::new(llm).run(input_dir, report).await?;

    match &summary.output {
        Some(path) => output.success(&format!(
            "Meta-questions for {} of {} documents saved to {}",
            summary.processed,
            summary.files_found,
            path.display()
        )),
        None => output.warning(&format!(
            "No meta-questions written; check that {} contains .md files",
            input_dir.display()
        )),
    }
    Ok(summary)
}

// ============= serve =============

pub async fn run_serve_command(
    config: &Config,
    output: &Output,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> Result<()> {
    let store = open_graph_store(config, in_memory).await?;
    let app = create_router(AppState::new(store));

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Configuration(format!("Cannot bind {}: {}", addr, e)))?;

    tracing::info!("Graph visualization server listening on {}", addr);
    output.success(&format!("Serving graph visualization on http://{}", addr));
    axum::serve(listener, app).await?;
    Ok(())
}
