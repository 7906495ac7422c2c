//! PromptCraft CLI
//!
//! Assembles structured LLM prompts from code context, git state, and
//! saved sessions.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    ContextCommand, ExtractCommand, InitCommand, QuickCommand, RunCommand, SessionCommand,
    TemplateCommand,
};
use promptcraft_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// PromptCraft - build better prompts from your actual code
#[derive(Parser, Debug)]
#[command(name = "promptcraft")]
#[command(about = "Assemble structured LLM prompts from code and git context", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory (default: current directory)
    #[arg(short = 'C', long, global = true, env = "PROMPTCRAFT_PROJECT")]
    project: Option<PathBuf>,

    /// Path to config file (default: <project>/.promptcraft.yml)
    #[arg(long, global = true, env = "PROMPTCRAFT_CONFIG")]
    config: Option<PathBuf>,

    /// LLM provider (ollama, openai)
    #[arg(short, long, global = true, env = "PROMPTCRAFT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "PROMPTCRAFT_MODEL")]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract a context summary from a source file
    Extract(ExtractCommand),

    /// Collect git context from the project repository
    Context(ContextCommand),

    /// List, inspect, or instantiate prompt templates
    Template(TemplateCommand),

    /// Manage saved prompt sessions
    Session(SessionCommand),

    /// One-shot prompt assembly without a session
    Quick(QuickCommand),

    /// Render a session and send it to the configured LLM
    Run(RunCommand),

    /// Write a starter .promptcraft.yml for this project
    Init(InitCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.project, cli.config)?;
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Project: {:?}", config.project_dir);
    tracing::debug!("Provider: {} / {}", config.provider, config.model);

    let command_name = match &cli.command {
        Commands::Extract(_) => "extract",
        Commands::Context(_) => "context",
        Commands::Template(_) => "template",
        Commands::Session(_) => "session",
        Commands::Quick(_) => "quick",
        Commands::Run(_) => "run",
        Commands::Init(_) => "init",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Extract(cmd) => cmd.execute(&config),
        Commands::Context(cmd) => cmd.execute(&config),
        Commands::Template(cmd) => cmd.execute(&config),
        Commands::Session(cmd) => cmd.execute(&config),
        Commands::Quick(cmd) => cmd.execute(&config),
        Commands::Run(cmd) => cmd.execute(&config).await,
        Commands::Init(cmd) => cmd.execute(&config),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
