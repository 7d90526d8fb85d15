use agentlab::cli::commands;
use agentlab::cli::output::Output;
use agentlab::cli::{Cli, Commands};
use agentlab::fetch::FetchOptions;
use agentlab::utils::config::Config;
use agentlab::utils::logging::init_tracing;
use anyhow::Context;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::from_flag(cli.no_color);

    let console_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    match &cli.command {
        Commands::Fetch {
            log_file,
            log_level,
            ..
        } => init_tracing(log_level.as_filter(), Some(log_file.as_path())),
        _ => init_tracing(console_level, None),
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    if let Err(e) = run(cli.command, &config, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, config: &Config, output: &Output) -> anyhow::Result<()> {
    match command {
        Commands::Agent { kind, query } => {
            commands::run_agent_command(config, output, kind, query)
                .await
                .context("Agent run failed")?;
        }
        Commands::Workflow {
            kind,
            choice,
            html,
            dot,
        } => {
            commands::run_workflow_command(
                config,
                output,
                kind,
                choice,
                html.as_deref(),
                dot.as_deref(),
            )
            .await
            .context("Workflow run failed")?;
        }
        Commands::Rag {
            question,
            load_data,
            in_memory,
        } => {
            commands::run_rag_command(config, output, &question, load_data, in_memory)
                .await
                .context("RAG pipeline failed")?;
        }
        Commands::Fetch {
            config: worklist,
            timeout,
            user_agent,
            output_dir,
            ..
        } => {
            let options = FetchOptions {
                config: worklist,
                output_dir,
                timeout: Duration::from_secs(timeout),
                user_agent,
            };
            commands::run_fetch_command(&options)
                .await
                .context("Webpage fetch failed")?;
        }
        Commands::MetaQuestions {
            input_dir,
            output: report,
        } => {
            commands::run_meta_questions_command(config, output, &input_dir, &report)
                .await
                .context("Meta-question generation failed")?;
        }
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            commands::run_serve_command(config, output, host, port, in_memory)
                .await
                .context("Server failed")?;
        }
    }
    Ok(())
}
