//! Ready-made agents for the `agent` command.

use crate::agents::{Agent, LlmAgent, SequentialAgent};
use crate::llm::LLMClient;
use crate::tools::{ToolRegistry, WeatherApiClient};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentKind {
    Simple,
    Weather,
    Code,
    /// Run simple, weather and code in that order
    All,
}

impl AgentKind {
    /// Concrete kinds this selection expands to
    pub fn expand(self) -> Vec<AgentKind> {
        match self {
            AgentKind::All => vec![AgentKind::Simple, AgentKind::Weather, AgentKind::Code],
            kind => vec![kind],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgentKind::Simple => "simple",
            AgentKind::Weather => "weather",
            AgentKind::Code => "code",
            AgentKind::All => "all",
        }
    }

    pub fn default_query(self) -> &'static str {
        match self {
            AgentKind::Simple => {
                "What are the key features of Google's Agent Development Kit (ADK)?"
            }
            AgentKind::Weather => "What's the current weather in New York?",
            AgentKind::Code => {
                "Optimize this code: import urllib.request\ncontents = urllib.request.urlopen('https://www.aivi.fyi/').read()"
            }
            AgentKind::All => "Hello, how can you help me?",
        }
    }
}

pub fn simple_assistant(llm: Arc<dyn LLMClient>) -> LlmAgent {
    LlmAgent::new("simple_assistant", llm)
        .with_description("A helpful assistant.")
        .with_instruction("You are a helpful assistant.")
}

pub fn weather_time_agent(llm: Arc<dyn LLMClient>, weather: WeatherApiClient) -> LlmAgent {
    LlmAgent::new("weather_time_agent", llm)
        .with_description(
            "Smart assistant that can answer questions about weather and time in various cities.",
        )
        .with_instruction(
            "I'm a smart assistant that can provide weather and time information for cities. \
             When a user asks about the weather in a city, use the get_weather tool to get the latest weather data. \
             When a user asks about the current time in a city, use the get_current_time tool to get the accurate time. \
             Please respond to user inquiries in a friendly manner and provide complete weather or time information. \
             I can understand Chinese city names and automatically convert them to corresponding English names.",
        )
        .with_tools(Arc::new(ToolRegistry::with_weather_tools(weather)))
}

/// Writer, reviewer and refactorer sharing session state.
pub fn code_pipeline(llm: Arc<dyn LLMClient>) -> SequentialAgent {
    let writer = LlmAgent::new("CodeWriterAgent", llm.clone())
        .with_description("Write initial code based on specifications.")
        .with_instruction(
            "You are a code writing AI.\n\
             Write initial Python code based on user's request.\n\
             Output only the raw code block.",
        )
        .with_output_key("generated_code");

    let reviewer = LlmAgent::new("CodeReviewerAgent", llm.clone())
        .with_description("Review code and provide feedback.")
        .with_instruction(
            "You are a code review AI.\n\
             Review the following Python code:\n\n{generated_code}\n\n\
             Provide constructive feedback about potential errors, style issues, or improvements.\n\
             Focus on clarity and correctness.\n\
             Output only the review comments.",
        )
        .with_output_key("review_comments");

    let refactorer = LlmAgent::new("CodeRefactorerAgent", llm)
        .with_description("Refactor code based on review comments.")
        .with_instruction(
            "You are a code refactoring AI.\n\
             Original code:\n\n{generated_code}\n\n\
             Review comments:\n\n{review_comments}\n\n\
             Refactor the original code to address the feedback and improve its quality.\n\
             Output only the final, refactored code block.",
        )
        .with_output_key("refactored_code");

    SequentialAgent::new(
        "CodePipelineAgent",
        vec![Arc::new(writer), Arc::new(reviewer), Arc::new(refactorer)],
    )
    .with_description("Assistant that improves code through a write-review-refactor pipeline.")
}

/// Root agent for a demo kind. `All` has no single agent and yields `None`.
pub fn build_agent(
    kind: AgentKind,
    llm: Arc<dyn LLMClient>,
    weather: WeatherApiClient,
) -> Option<Arc<dyn Agent>> {
    match kind {
        AgentKind::Simple => Some(Arc::new(simple_assistant(llm))),
        AgentKind::Weather => Some(Arc::new(weather_time_agent(llm, weather))),
        AgentKind::Code => Some(Arc::new(code_pipeline(llm))),
        AgentKind::All => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_expands_in_order() {
        assert_eq!(
            AgentKind::All.expand(),
            vec![AgentKind::Simple, AgentKind::Weather, AgentKind::Code]
        );
        assert_eq!(AgentKind::Code.expand(), vec![AgentKind::Code]);
    }

    #[test]
    fn test_default_queries() {
        assert!(AgentKind::Weather.default_query().contains("New York"));
        assert!(AgentKind::Code.default_query().starts_with("Optimize this code"));
    }
}
