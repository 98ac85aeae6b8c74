//! Prompt Template System
//!
//! Renders the three `.pmt` prompt templates (questions, roadmap, courses)
//! from session data.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (user override)
//! 2. Embedded default compiled from `lp/prompts/`
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{AnswerEntry, LevelEntry, PromptContext, PromptKind, PromptLoader};
