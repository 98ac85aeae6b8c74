//! learnpath - Computer Science Learning Path Advisor
//!
//! CLI entry point for the advisor wizard and its helper commands.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{info, warn};

use learnpath::catalog::Catalog;
use learnpath::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use learnpath::config::{self, Config};
use learnpath::console::{self, views};
use learnpath::wizard::parse_questions;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("learnpath")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file so the console stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("learnpath.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Malformed .env files are logged and skipped
    if let Err(e) = config::load_env_file(None) {
        warn!("Ignoring .env file: {:#}", e);
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "learnpath loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command.unwrap_or(Command::Start) {
        Command::Start => console::run_interactive(&config).await,
        Command::Fields { format } => cmd_fields(&config, &format),
        Command::Parse { file, format } => cmd_parse(&file, &format),
        Command::Logs { lines } => cmd_logs(lines),
    }
}

/// List the catalog
fn cmd_fields(config: &Config, format: &OutputFormat) -> Result<()> {
    let catalog = Catalog::load(config.catalog.as_deref())?;

    if *format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(catalog.fields())?);
        return Ok(());
    }

    for (idx, field) in catalog.fields().iter().enumerate() {
        println!("{}. {}", idx + 1, field.name.bright_cyan().bold());
        println!("   {}", field.description);
        println!("   {} {}", "Topics:".dimmed(), field.topics.join(", "));
        println!("   {} {}", "Prerequisites:".dimmed(), field.prerequisites.join(", "));
    }
    Ok(())
}

/// Run the question parser over a saved response
fn cmd_parse(file: &Path, format: &OutputFormat) -> Result<()> {
    let text = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let questions = parse_questions(&text);
    info!(file = %file.display(), count = questions.len(), "Parsed questions");

    if *format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    if questions.is_empty() {
        println!("No questions found in {}", file.display());
        return Ok(());
    }

    print!("{}", views::render_questions(&questions));
    let answerable = questions.iter().filter(|q| q.is_answerable()).count();
    println!("{} questions ({} answerable)", questions.len(), answerable);
    Ok(())
}

fn cmd_logs(lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }

    Ok(())
}
