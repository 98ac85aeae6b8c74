//! Stage population steps
//!
//! DetailedAssessment and GenerateRoadmap fill their session fields lazily
//! from the generation collaborator. A failure leaves the session exactly
//! as it was; partial results are never committed.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::questions::parse_questions;
use super::session::{Session, Stage};
use crate::catalog::Catalog;
use crate::config::AssessmentConfig;
use crate::llm::{self, LlmClient, LlmError};
use crate::prompts::{PromptContext, PromptKind, PromptLoader};

/// Failure while populating a stage from the generation collaborator
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to build prompt: {0}")]
    Prompt(String),

    #[error("The response contained no answerable questions")]
    NoQuestions,
}

impl GenerationError {
    /// Whether re-triggering the same stage could help
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            Self::Prompt(_) => false,
            Self::NoQuestions => true,
        }
    }
}

/// Fills generated session fields for the current stage
pub struct StageGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    settings: AssessmentConfig,
}

impl StageGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, settings: AssessmentConfig) -> Self {
        Self { llm, prompts, settings }
    }

    /// Whether the current stage still has generated content to fetch
    pub fn needs_population(session: &Session) -> bool {
        match session.stage {
            Stage::DetailedAssessment => session.assessment_questions.is_empty(),
            Stage::GenerateRoadmap => session.roadmap.is_none() || session.additional_courses.is_none(),
            Stage::ChooseField | Stage::AssessKnowledge => false,
        }
    }

    /// Populate whatever the current stage needs; returns true if anything was generated
    pub async fn populate(&self, session: &mut Session, catalog: &Catalog) -> Result<bool, GenerationError> {
        match session.stage {
            Stage::DetailedAssessment => self.populate_questions(session, catalog).await,
            Stage::GenerateRoadmap => self.populate_roadmap(session, catalog).await,
            Stage::ChooseField | Stage::AssessKnowledge => Ok(false),
        }
    }

    fn render(&self, kind: PromptKind, session: &Session, catalog: &Catalog) -> Result<String, GenerationError> {
        let context = PromptContext::from_session(session, catalog, self.settings.question_count)
            .map_err(|e| GenerationError::Prompt(e.to_string()))?;
        self.prompts
            .render(kind, &context)
            .map_err(|e| GenerationError::Prompt(e.to_string()))
    }

    /// Generate and parse assessment questions on first entry to DetailedAssessment
    pub async fn populate_questions(&self, session: &mut Session, catalog: &Catalog) -> Result<bool, GenerationError> {
        debug!(stage = %session.stage, "populate_questions: called");
        if session.stage != Stage::DetailedAssessment || !session.assessment_questions.is_empty() {
            debug!("populate_questions: nothing to do");
            return Ok(false);
        }

        let prompt = self.render(PromptKind::Questions, session, catalog)?;
        let text = llm::generate(self.llm.as_ref(), &prompt, self.settings.question_max_tokens).await?;

        let questions = parse_questions(&text);
        if !questions.iter().any(|q| q.is_answerable()) {
            warn!(response_len = text.len(), "populate_questions: no answerable questions parsed");
            return Err(GenerationError::NoQuestions);
        }

        info!(count = questions.len(), "populate_questions: questions generated");
        session.assessment_questions = questions;
        Ok(true)
    }

    /// Generate the roadmap and course recommendations on entry to GenerateRoadmap
    ///
    /// The two calls run one after the other and are committed together.
    pub async fn populate_roadmap(&self, session: &mut Session, catalog: &Catalog) -> Result<bool, GenerationError> {
        debug!(stage = %session.stage, "populate_roadmap: called");
        if session.stage != Stage::GenerateRoadmap || (session.roadmap.is_some() && session.additional_courses.is_some())
        {
            debug!("populate_roadmap: nothing to do");
            return Ok(false);
        }

        let max_tokens = self.settings.roadmap_max_tokens;
        let roadmap_prompt = self.render(PromptKind::Roadmap, session, catalog)?;
        let courses_prompt = self.render(PromptKind::Courses, session, catalog)?;

        let roadmap = llm::generate(self.llm.as_ref(), &roadmap_prompt, max_tokens).await?;
        let courses = llm::generate(self.llm.as_ref(), &courses_prompt, max_tokens).await?;

        info!(
            roadmap_len = roadmap.len(),
            courses_len = courses.len(),
            "populate_roadmap: roadmap generated"
        );
        session.roadmap = Some(roadmap);
        session.additional_courses = Some(courses);
        Ok(true)
    }
}
