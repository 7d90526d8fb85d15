//! CLI module for agentlab
//!
//! Provides command-line interface parsing for the agentlab binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use crate::agents::AgentKind;
use crate::fetch::{DEFAULT_CONFIG, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::summarize::meta_questions::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT};
use crate::utils::logging::LogLevel;
use crate::workflows::FlowKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// agentlab - LLM agent, workflow and graph RAG demos
#[derive(Parser, Debug)]
#[command(
    name = "agentlab",
    version,
    about = "agentlab - LLM agent, workflow and graph RAG demos",
    long_about = "Small demonstrations built on one OpenAI-compatible LLM stack:\n\
                  tool-calling agents, multi-agent graph workflows, graph RAG over Neo4j,\n\
                  a webpage fetcher, a document summarizer and a graph visualization server.\n\n\
                  Settings are read from the environment and an optional .env file.",
    after_help = "EXAMPLES:\n    \
                  agentlab agent --kind weather            # Ask the weather/time agent\n    \
                  agentlab workflow conditional --choice 2 # Route a math task\n    \
                  agentlab rag --load-data                 # Load the DSPy graph and ask\n    \
                  agentlab fetch -c weblinks.yml           # Fetch queued pages\n    \
                  agentlab serve --in-memory               # Browse the sample graph"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one of the ready-made agents
    Agent {
        /// Which agent to run
        #[arg(short, long, value_enum, default_value_t = AgentKind::Simple)]
        kind: AgentKind,

        /// Query to send (each agent has its own default)
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Run a multi-agent graph workflow
    Workflow {
        /// Which workflow to run
        #[arg(value_enum)]
        kind: FlowKind,

        /// Task number for the conditional workflow (1-3); prompts when omitted
        #[arg(long)]
        choice: Option<String>,

        /// Write an interactive HTML rendering of the graph
        #[arg(long)]
        html: Option<PathBuf>,

        /// Write a Graphviz DOT rendering of the graph
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Answer a question from the knowledge graph
    Rag {
        /// Question to answer
        #[arg(short, long, default_value = crate::rag::DEFAULT_QUESTION)]
        question: String,

        /// Clear the graph and load the DSPy / RAG sample data first
        #[arg(long)]
        load_data: bool,

        /// Use an in-memory graph seeded with the sample data instead of Neo4j
        #[arg(long)]
        in_memory: bool,
    },

    /// Fetch queued webpages and save their main text as Markdown
    Fetch {
        /// YAML worklist with `to_be_fetched` and `fetched` lists
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Log file (in addition to the console)
        #[arg(short, long, default_value = DEFAULT_LOG_FILE)]
        log_file: PathBuf,

        /// Logging level
        #[arg(long, value_enum, default_value_t = LogLevel::Info)]
        log_level: LogLevel,

        /// Request timeout in seconds
        #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// User-Agent header for requests
        #[arg(short, long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Directory for the Markdown files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },

    /// Generate high-level questions for each Markdown document in a directory
    MetaQuestions {
        /// Directory with the `.md` files
        #[arg(long, default_value = DEFAULT_INPUT_DIR)]
        input_dir: PathBuf,

        /// Markdown report to write
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Serve the graph visualization web page
    Serve {
        /// Address to bind (defaults to HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to PORT or 5001)
        #[arg(long)]
        port: Option<u16>,

        /// Serve an in-memory graph seeded with the sample data instead of Neo4j
        #[arg(long)]
        in_memory: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["agentlab", "fetch"]).unwrap();
        match cli.command {
            Commands::Fetch {
                config,
                log_file,
                log_level,
                timeout,
                user_agent,
                output_dir,
            } => {
                assert_eq!(config, PathBuf::from("weblinks.yml"));
                assert_eq!(log_file, PathBuf::from("logs/fetch_webpage.log"));
                assert_eq!(log_level, LogLevel::Info);
                assert_eq!(timeout, 20);
                assert_eq!(user_agent, DEFAULT_USER_AGENT);
                assert_eq!(output_dir, PathBuf::from("output/fetched_pages"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_log_level_is_uppercase() {
        let cli =
            Cli::try_parse_from(["agentlab", "fetch", "--log-level", "WARNING"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Fetch {
                log_level: LogLevel::Warning,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["agentlab", "fetch", "--log-level", "verbose"]).is_err());
    }

    #[test]
    fn test_workflow_args() {
        let cli = Cli::try_parse_from([
            "agentlab",
            "--no-color",
            "workflow",
            "conditional",
            "--choice",
            "2",
        ])
        .unwrap();
        assert!(cli.no_color);
        match cli.command {
            Commands::Workflow { kind, choice, .. } => {
                assert_eq!(kind, FlowKind::Conditional);
                assert_eq!(choice.as_deref(), Some("2"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rag_default_question() {
        let cli = Cli::try_parse_from(["agentlab", "rag", "--in-memory"]).unwrap();
        match cli.command {
            Commands::Rag {
                question,
                load_data,
                in_memory,
            } => {
                assert_eq!(question, crate::rag::DEFAULT_QUESTION);
                assert!(!load_data);
                assert!(in_memory);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_agent_kind_values() {
        let cli = Cli::try_parse_from(["agentlab", "agent", "--kind", "code"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Agent {
                kind: AgentKind::Code,
                query: None
            }
        ));
    }
}
