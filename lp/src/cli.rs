//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// learnpath - Computer Science Learning Path Advisor
#[derive(Parser)]
#[command(
    name = "lp",
    about = "Computer science learning path advisor backed by a hosted LLM",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/learnpath/logs/learnpath.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `start`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the interactive advisor wizard
    Start,

    /// List the fields in the catalog
    Fields {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a saved model response into assessment questions
    Parse {
        /// File holding the raw response text
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the log file
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
}

/// Output format for listing commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Location of the log file written by `lp`
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("learnpath")
        .join("logs")
        .join("learnpath.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Known provider credentials, as (provider, env var)
const CREDENTIALS: [(&str, &str); 3] = [
    ("gemini", "GOOGLE_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
];

/// Generate the after_help text with credential status and the log path
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Credentials:\n");
    for (provider, env) in CREDENTIALS {
        let set = std::env::var(env).is_ok_and(|v| !v.trim().is_empty());
        let icon = if set { "\u{2705}" } else { "\u{274C}" };
        let status = if set { "set" } else { "not set" };
        help.push_str(&format!("  {} {:<10} {} {}\n", icon, provider, env, status));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
