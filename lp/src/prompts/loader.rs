//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with session data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::catalog::{Catalog, KnowledgeLevel};
use crate::wizard::Session;

/// The three prompts the wizard sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Questions,
    Roadmap,
    Courses,
}

impl PromptKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Roadmap => "roadmap",
            Self::Courses => "courses",
        }
    }
}

/// A named level, e.g. topic "Databases" at "Basic"
#[derive(Debug, Clone, Serialize)]
pub struct LevelEntry {
    pub name: String,
    pub level: String,
}

/// A question with the option the user picked
#[derive(Debug, Clone, Serialize)]
pub struct AnswerEntry {
    pub question: String,
    pub choice: String,
}

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    pub field: String,
    pub description: String,
    pub overall_level: String,
    pub topics: Vec<LevelEntry>,
    pub prerequisites: Vec<LevelEntry>,
    pub additional_info: String,
    pub question_count: u32,
    pub answers: Vec<AnswerEntry>,
}

impl PromptContext {
    /// Template data for the session's chosen field and knowledge
    ///
    /// Topics and prerequisites follow catalog order. Fails when the session
    /// has not reached the knowledge stage yet.
    pub fn from_session(session: &Session, catalog: &Catalog, question_count: u32) -> Result<Self> {
        debug!(stage = %session.stage(), %question_count, "PromptContext::from_session: called");
        let field = session
            .field(catalog)
            .ok_or_else(|| eyre!("No field chosen for this session"))?;
        let knowledge = session
            .current_knowledge()
            .ok_or_else(|| eyre!("No knowledge recorded for this session"))?;

        Ok(Self {
            field: field.name.clone(),
            description: field.description.clone(),
            overall_level: knowledge.overall_level.to_string(),
            topics: level_entries(&field.topics, &knowledge.topic_knowledge),
            prerequisites: level_entries(&field.prerequisites, &knowledge.prereq_knowledge),
            additional_info: knowledge.additional_info.trim().to_string(),
            question_count,
            answers: session
                .answers()
                .values()
                .map(|a| AnswerEntry {
                    question: a.question.clone(),
                    choice: a.choice.clone(),
                })
                .collect(),
        })
    }
}

fn level_entries(names: &[String], levels: &BTreeMap<String, KnowledgeLevel>) -> Vec<LevelEntry> {
    names
        .iter()
        .map(|name| LevelEntry {
            name: name.clone(),
            level: levels.get(name).copied().unwrap_or_default().to_string(),
        })
        .collect()
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `override_dir`
    pub fn new(override_dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = override_dir
            .map(|d| d.as_ref().to_path_buf())
            .filter(|d| d.is_dir());
        debug!(?override_dir, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name (without extension)
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");

        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render one of the wizard prompts
    pub fn render(&self, kind: PromptKind, context: &PromptContext) -> Result<String> {
        let name = kind.template_name();
        let template = self.load_template(name)?;
        info!("Rendering template '{}' for field '{}'", name, context.field);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }
}
