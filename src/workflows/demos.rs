//! Ready-made multi-agent flows for the `workflow` command.

use crate::agents::LlmAgent;
use crate::llm::LLMClient;
use crate::types::Result;
use crate::workflows::engine::GraphFlow;
use crate::workflows::graph::{Activation, DiGraphBuilder, EdgeCondition};
use std::collections::HashMap;
use std::sync::Arc;

pub const TENNIS_TASK: &str =
    "Write a short paragraph about changing arm-lead to core-lead in tennis stroke.";

pub const LOOP_TASK: &str =
    "Write a short paragraph about changing from arm-lead to core-lead in tennis strokes.";

/// Tasks offered by the conditional flow, in menu order
pub const CONDITIONAL_TASKS: [&str; 3] = [
    TENNIS_TASK,
    "Solve the quadratic equation: 2x^2 + 5x - 3 = 0",
    "Research the history and impact of the Internet.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlowKind {
    /// writer -> reviewer
    Sequence,
    /// classifier routes to a specialist, then reviewer
    Conditional,
    /// writer fans out to two editors, then a final reviewer
    Parallel,
    /// writer and reviewer loop until approval
    Loop,
}

/// A titled block of the final report, filled from one agent's last message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub source: &'static str,
}

const fn section(title: &'static str, source: &'static str) -> Section {
    Section { title, source }
}

/// A built demo flow plus what to print around it
pub struct DemoFlow {
    pub kind: FlowKind,
    pub flow: GraphFlow,
    pub task: String,
    pub start_banner: &'static str,
    pub end_banner: &'static str,
}

impl DemoFlow {
    /// Result sections for the messages a run produced
    pub fn sections(&self, last_by_source: &HashMap<String, String>) -> Vec<Section> {
        match self.kind {
            FlowKind::Sequence => vec![
                section("WRITER'S DRAFT", "writer"),
                section("REVIEWER'S IMPROVED VERSION", "reviewer"),
            ],
            FlowKind::Parallel => vec![
                section("WRITER'S DRAFT", "writer"),
                section("GRAMMAR EDITOR'S REVISIONS", "editor1"),
                section("STYLE EDITOR'S REVISIONS", "editor2"),
                section("FINAL CONSOLIDATED VERSION", "final_reviewer"),
            ],
            FlowKind::Loop => vec![
                section("WRITER'S FINAL DRAFT", "writer"),
                section("REVIEWER'S FINAL FEEDBACK", "reviewer"),
            ],
            FlowKind::Conditional => {
                let mut sections = vec![section("CLASSIFICATION", "classifier")];
                let specialist = last_by_source
                    .get("classifier")
                    .and_then(|c| specialist_section(c));
                sections.extend(specialist);
                sections.push(section("REVIEWER'S ASSESSMENT", "reviewer"));
                sections
            }
        }
    }
}

/// Section for the specialist the classifier picked: writing, then math,
/// then research.
pub fn specialist_section(classification: &str) -> Option<Section> {
    let lowered = classification.to_lowercase();
    if lowered.contains("writing") {
        Some(section("WRITER'S CONTENT", "writer"))
    } else if lowered.contains("math") {
        Some(section("MATHEMATICIAN'S SOLUTION", "mathematician"))
    } else if lowered.contains("research") {
        Some(section("RESEARCHER'S FINDINGS", "researcher"))
    } else {
        None
    }
}

/// Resolve a menu answer to a task index (0-based), with the notice to print
/// when the answer is unusable.
pub fn parse_choice(input: &str) -> (usize, Option<&'static str>) {
    match input.trim().parse::<i64>() {
        Ok(n) if (1..=3).contains(&n) => ((n - 1) as usize, None),
        Ok(_) => (0, Some("Invalid choice. Using default task 1.")),
        Err(_) => (0, Some("Invalid input. Using default task 1.")),
    }
}

fn agent(name: &str, llm: &Arc<dyn LLMClient>, instruction: &str) -> Arc<LlmAgent> {
    Arc::new(
        LlmAgent::new(name, llm.clone())
            .with_description(format!("{} agent", name))
            .with_instruction(instruction),
    )
}

pub fn sequence_flow(llm: Arc<dyn LLMClient>) -> Result<DemoFlow> {
    let mut builder = DiGraphBuilder::new();
    builder
        .add_node(agent("writer", &llm, "Draft a short paragraph on climate change."))
        .add_node(agent(
            "reviewer",
            &llm,
            "Review the draft and suggest improvements.",
        ))
        .add_edge("writer", "reviewer");

    Ok(DemoFlow {
        kind: FlowKind::Sequence,
        flow: GraphFlow::new(builder.build()?),
        task: TENNIS_TASK.to_string(),
        start_banner: "STARTING GRAPHFLOW SEQUENCE",
        end_banner: "SEQUENCE COMPLETED",
    })
}

pub fn parallel_flow(llm: Arc<dyn LLMClient>) -> Result<DemoFlow> {
    let mut builder = DiGraphBuilder::new();
    builder
        .add_node(agent(
            "writer",
            &llm,
            "Draft a short paragraph about changing arm-lead to core-lead in tennis stroke.",
        ))
        .add_node(agent("editor1", &llm, "Edit the paragraph for grammar."))
        .add_node(agent("editor2", &llm, "Edit the paragraph for style."))
        .add_node(agent(
            "final_reviewer",
            &llm,
            "Consolidate the grammar and style edits into a final version.",
        ))
        .add_edge("writer", "editor1")
        .add_edge("writer", "editor2")
        .add_edge("editor1", "final_reviewer")
        .add_edge("editor2", "final_reviewer");

    Ok(DemoFlow {
        kind: FlowKind::Parallel,
        flow: GraphFlow::new(builder.build()?),
        task: TENNIS_TASK.to_string(),
        start_banner: "STARTING PARALLEL GRAPHFLOW SEQUENCE",
        end_banner: "PARALLEL WORKFLOW COMPLETED",
    })
}

/// `choice` is a 0-based index into [`CONDITIONAL_TASKS`]
pub fn conditional_flow(llm: Arc<dyn LLMClient>, choice: usize) -> Result<DemoFlow> {
    let mut builder = DiGraphBuilder::new();
    builder
        .add_node(agent(
            "classifier",
            &llm,
            "You are a task classifier. Determine if the task is about 'writing', 'math', or 'research'. \
             Topics like tennis or sports techniques are 'writing' tasks. \
             Respond with ONLY one word: 'writing', 'math', or 'research'.",
        ))
        .add_node(agent(
            "writer",
            &llm,
            "You are an expert writer. Create high-quality content on the given topic.",
        ))
        .add_node(agent(
            "mathematician",
            &llm,
            "You are a math expert. Solve mathematical problems clearly showing your work.",
        ))
        .add_node(agent(
            "researcher",
            &llm,
            "You are a thorough researcher. Provide detailed, factual information on the given topic.",
        ))
        .add_node(agent(
            "reviewer",
            &llm,
            "Review the previous work critically and suggest specific improvements.",
        ))
        .add_conditional_edge(
            "classifier",
            "writer",
            EdgeCondition::keywords(["writing", "tennis", "paragraph"]),
        )
        .add_conditional_edge(
            "classifier",
            "mathematician",
            EdgeCondition::keywords(["math", "equation"]),
        )
        .add_conditional_edge(
            "classifier",
            "researcher",
            EdgeCondition::keywords(["research", "history", "impact"]),
        )
        .add_edge("writer", "reviewer")
        .add_edge("mathematician", "reviewer")
        .add_edge("researcher", "reviewer")
        .set_activation("reviewer", Activation::Any);

    let task = CONDITIONAL_TASKS
        .get(choice)
        .copied()
        .unwrap_or(CONDITIONAL_TASKS[0]);

    Ok(DemoFlow {
        kind: FlowKind::Conditional,
        flow: GraphFlow::new(builder.build()?),
        task: task.to_string(),
        start_banner: "STARTING CONDITIONAL GRAPHFLOW SEQUENCE",
        end_banner: "CONDITIONAL WORKFLOW COMPLETED",
    })
}

pub fn loop_flow(llm: Arc<dyn LLMClient>) -> Result<DemoFlow> {
    let mut builder = DiGraphBuilder::new();
    builder
        .add_node(agent(
            "writer",
            &llm,
            "You are a tennis expert who creates clear, helpful content about tennis techniques. \
             Your task is to write a short paragraph (150-200 words) on changing from arm-lead to core-lead in tennis strokes. \
             Focus on explaining the concept, benefits, and practical tips for implementation. \
             Be precise, practical, and engaging.",
        ))
        .add_node(agent(
            "reviewer",
            &llm,
            "You are a tennis publication editor who reviews content for clarity, accuracy, and helpfulness. \
             Review the paragraph about changing from arm-lead to core-lead in tennis strokes. \
             If the content needs improvement, respond with: 'REVISE: [your specific feedback for improvements]'. \
             If the content is ready for publication, respond with: 'APPROVE: [brief positive feedback on the content]'. \
             Your feedback should be specific and actionable when revisions are needed.",
        ))
        .add_node(agent("done", &llm, "This is the end of the workflow."))
        .add_node(agent("start", &llm, LOOP_TASK))
        .add_edge("start", "writer")
        .add_edge("writer", "reviewer")
        .add_conditional_edge(
            "reviewer",
            "writer",
            EdgeCondition::Contains("REVISE".to_string()),
        )
        .add_conditional_edge(
            "reviewer",
            "done",
            EdgeCondition::Contains("APPROVE".to_string()),
        );

    Ok(DemoFlow {
        kind: FlowKind::Loop,
        flow: GraphFlow::new(builder.build()?),
        task: LOOP_TASK.to_string(),
        start_banner: "STARTING GRAPHFLOW LOOP (APPROVAL/REVISION)",
        end_banner: "WORKFLOW COMPLETED",
    })
}

/// Build a demo flow. `choice` only applies to the conditional flow.
pub fn build_flow(kind: FlowKind, llm: Arc<dyn LLMClient>, choice: usize) -> Result<DemoFlow> {
    match kind {
        FlowKind::Sequence => sequence_flow(llm),
        FlowKind::Conditional => conditional_flow(llm, choice),
        FlowKind::Parallel => parallel_flow(llm),
        FlowKind::Loop => loop_flow(llm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMResponse;
    use crate::types::{Message, ToolDefinition};
    use async_trait::async_trait;
    use rstest::rstest;

    struct Silent;

    #[async_trait]
    impl LLMClient for Silent {
        async fn chat(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            Ok(LLMResponse::default())
        }

        fn model_name(&self) -> &str {
            "silent"
        }
    }

    #[rstest]
    #[case(FlowKind::Sequence, vec!["writer"])]
    #[case(FlowKind::Parallel, vec!["writer"])]
    #[case(FlowKind::Conditional, vec!["classifier"])]
    #[case(FlowKind::Loop, vec!["start"])]
    fn test_demo_flows_build(#[case] kind: FlowKind, #[case] starts: Vec<&str>) {
        let demo = build_flow(kind, Arc::new(Silent), 0).unwrap();
        assert_eq!(demo.flow.graph().start_nodes(), starts);
    }

    #[rstest]
    #[case("2", 1, None)]
    #[case(" 3 ", 2, None)]
    #[case("0", 0, Some("Invalid choice. Using default task 1."))]
    #[case("7", 0, Some("Invalid choice. Using default task 1."))]
    #[case("two", 0, Some("Invalid input. Using default task 1."))]
    #[case("", 0, Some("Invalid input. Using default task 1."))]
    fn test_parse_choice(
        #[case] input: &str,
        #[case] index: usize,
        #[case] notice: Option<&str>,
    ) {
        assert_eq!(parse_choice(input), (index, notice));
    }

    #[test]
    fn test_conditional_sections_follow_classification() {
        let demo = conditional_flow(Arc::new(Silent), 1).unwrap();
        assert_eq!(demo.task, CONDITIONAL_TASKS[1]);

        let mut messages = HashMap::new();
        messages.insert("classifier".to_string(), "Math".to_string());
        let titles: Vec<&str> = demo.sections(&messages).iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["CLASSIFICATION", "MATHEMATICIAN'S SOLUTION", "REVIEWER'S ASSESSMENT"]
        );

        messages.insert("classifier".to_string(), "unclear".to_string());
        assert_eq!(demo.sections(&messages).len(), 2);
    }

    #[test]
    fn test_specialist_priority() {
        let s = specialist_section("writing or math").unwrap();
        assert_eq!(s.source, "writer");
    }
}
