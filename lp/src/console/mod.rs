//! Interactive console for the advisor wizard
//!
//! Holds the session, reads input for the current stage, feeds events to the
//! wizard and re-renders.

mod input;
mod session;
pub mod views;

pub use input::{Input, LineSource, RustylineSource, ScriptedSource};
pub use session::ConsoleSession;

use std::io;

use eyre::{Context, Result};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm;
use crate::prompts::PromptLoader;
use crate::wizard::StageGenerator;

/// Build the collaborators from config and run the wizard on the terminal
///
/// Fails before anything is shown when no API key is available.
pub async fn run_interactive(config: &Config) -> Result<()> {
    debug!(provider = %config.llm.provider, "run_interactive: called");
    config.validate()?;

    let llm = llm::create_client(&config.llm).context("Failed to create LLM client")?;
    let catalog = Catalog::load(config.catalog.as_deref())?;
    let prompts = PromptLoader::new(config.prompts_dir());
    let generator = StageGenerator::new(llm, prompts, config.assessment.clone());

    info!(fields = catalog.len(), model = %config.llm.model, "Starting advisor session");
    let mut console = ConsoleSession::new(
        catalog,
        generator,
        config.export_dir.clone(),
        RustylineSource::new()?,
        io::stdout(),
    );
    console.run().await
}
