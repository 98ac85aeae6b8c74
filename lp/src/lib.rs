//! learnpath - Computer Science Learning Path Advisor
//!
//! A four-step wizard that helps a learner pick a computer-science field,
//! self-assess, answer generated multiple-choice questions and receive a
//! personalized learning roadmap from a hosted LLM.
//!
//! # Core Concepts
//!
//! - **Explicit state machine**: the session only changes through
//!   [`wizard::advance`] or stage population, never through the UI
//! - **Commit on success**: a failed generation call leaves the session as it was
//! - **Plain-text structure**: assessment questions are parsed from free text
//!
//! # Modules
//!
//! - [`catalog`] - Fields, topics and knowledge levels
//! - [`wizard`] - Session, transitions, question parser, readiness, population
//! - [`llm`] - LLM client trait with Gemini and Anthropic implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`console`] - Interactive terminal front end
//! - [`export`] - Markdown roadmap export
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod catalog;
pub mod cli;
pub mod config;
pub mod console;
pub mod export;
pub mod llm;
pub mod prompts;
pub mod wizard;

// Re-export commonly used types
pub use catalog::{Catalog, Field, KnowledgeLevel, OverallLevel};
pub use config::{AssessmentConfig, Config, ConfigError, LlmConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use wizard::{
    Answer, CurrentKnowledge, Event, GenerationError, QuestionBlock, Session, Stage, StageGenerator, TransitionError,
    advance, evaluate_readiness, parse_questions,
};
