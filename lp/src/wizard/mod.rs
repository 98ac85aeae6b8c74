//! Advisor wizard state machine
//!
//! Four linear stages, each with a completion predicate:
//!
//! ```text
//! ChooseField -> AssessKnowledge -> DetailedAssessment -> GenerateRoadmap
//!      ^                                   ^      |               |
//!      |                                   +------+---(retake)----+
//!      +--------------------------(switch field)------------------+
//! ```
//!
//! The caller owns the [`Session`], feeds [`Event`]s through [`advance`]
//! (or [`Session::apply`]), lets [`StageGenerator`] fill in generated content
//! for the new stage, and re-renders.

mod populate;
mod questions;
mod readiness;
mod session;
mod transition;

pub use populate::{GenerationError, StageGenerator};
pub use questions::{MAX_OPTIONS, QuestionBlock, parse_questions};
pub use readiness::{PrerequisiteReadiness, Readiness, evaluate_readiness};
pub use session::{Answer, CurrentKnowledge, Session, Stage};
pub use transition::{Event, TransitionError, advance};
