//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Multiple-choice assessment question prompt
pub const QUESTIONS: &str = include_str!("../../prompts/questions.pmt");

/// Learning roadmap prompt
pub const ROADMAP: &str = include_str!("../../prompts/roadmap.pmt");

/// Course recommendation prompt
pub const COURSES: &str = include_str!("../../prompts/courses.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "questions" => Some(QUESTIONS),
        "roadmap" => Some(ROADMAP),
        "courses" => Some(COURSES),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_questions() {
        let questions = get_embedded("questions").unwrap();
        assert!(questions.contains("multiple-choice"));
        assert!(questions.contains("Q1:"));
        assert!(questions.contains("{{question_count}}"));
    }

    #[test]
    fn test_get_embedded_roadmap() {
        let roadmap = get_embedded("roadmap").unwrap();
        assert!(roadmap.contains("Foundation Phase"));
        assert!(roadmap.contains("{{#each answers}}"));
    }

    #[test]
    fn test_get_embedded_courses() {
        assert!(get_embedded("courses").unwrap().contains("recommend 4-6 specific courses"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
