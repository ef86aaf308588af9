use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cadre::config::Config;
use cadre::llm::{AnthropicClient, AnthropicConfig};
use cadre::pipeline::AnalysisWorkflow;
use cadre::review::ReviewCrew;
use cli::{Cli, Commands, ConsoleSink};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cadre")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("cadre.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, mut config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let client = AnthropicClient::new(AnthropicConfig {
        model: config.llm.model.clone(),
        max_tokens: config.llm.max_tokens,
        timeout: std::time::Duration::from_millis(config.llm.timeout_ms),
    })
    .context("Failed to create model client")?;

    let sink = ConsoleSink::new(cli.is_verbose());

    match &cli.command {
        Commands::Analyze { dataset, cycles, output_dir } => {
            if let Some(cycles) = cycles {
                config.workflow.cycles = *cycles;
            }
            if let Some(dir) = output_dir {
                config.workflow.output_dir = dir.clone();
            }

            let dataset = dataset.to_string_lossy().replace('\\', "/");
            println!("{} {}", "Analyzing:".cyan().bold(), dataset);

            let workflow = AnalysisWorkflow::new(&client, &config);
            let path = workflow
                .run(&dataset, &sink)
                .await
                .context("Analysis workflow failed")?;
            println!("{} {}", "Complete:".green().bold(), path.display());
        }
        Commands::Review { paper, figures } => {
            println!("{} {}", "Reviewing:".cyan().bold(), paper.display());

            let crew = ReviewCrew::new(&client, &config.review);
            let outcome = crew
                .run(paper, figures, &sink)
                .await
                .context("Review workflow failed")?;
            println!(
                "{} reports in {}",
                "Complete:".green().bold(),
                outcome.reports_dir.display()
            );
        }
    }

    let usage = client.total_usage();
    info!(
        "Model usage: {} input tokens, {} output tokens",
        usage.input_tokens, usage.output_tokens
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
