//! Question-block parser
//!
//! Imposes structure on the free text the model returns for the assessment
//! prompt. Expected shape:
//!
//! ```text
//! Q1: What is X?
//! A) one
//! B) two
//! ```
//!
//! Markdown decoration such as `**Q1:**` or `- A)` is tolerated.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum options kept per question (labels A-D)
pub const MAX_OPTIONS: usize = 4;

/// `Q1`, `Question 2`, or an unnumbered `Q:` / `Q.`
static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q(?:uestion)?(?:\s*\d+|\s*[:.])").expect("question marker regex is valid"));

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBlock {
    pub text: String,
    pub options: Vec<String>,
}

impl QuestionBlock {
    pub fn new(text: impl Into<String>, options: &[&str]) -> Self {
        Self {
            text: text.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    /// Questions without options are shown but cannot be answered
    pub fn is_answerable(&self) -> bool {
        !self.options.is_empty()
    }

    /// Option for a letter label (`'a'`/`'A'` is the first option)
    pub fn option_for_label(&self, label: char) -> Option<&str> {
        let idx = (label.to_ascii_uppercase() as usize).checked_sub('A' as usize)?;
        self.options.get(idx).map(String::as_str)
    }
}

/// Strip list bullets and heading markers, plus emphasis wrapping the whole line
fn undecorate(line: &str) -> &str {
    let line = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '>' | '-') || c.is_whitespace());
    let body = line.trim_start_matches(['*', '_']);
    let marker = &line[..line.len() - body.len()];
    let body = body.trim_start();
    match body.strip_suffix(marker) {
        Some(inner) if !marker.is_empty() => inner.trim_end(),
        _ => body.trim_end(),
    }
}

/// Drop an emphasis run left over from `**Q1:**` or `**A)**`
///
/// Only a run followed by whitespace counts, so `__init__` stays intact.
fn skip_closing_emphasis(rest: &str) -> &str {
    let after = rest.trim_start_matches(['*', '_']);
    if after.is_empty() || after.starts_with(char::is_whitespace) {
        after.trim()
    } else {
        rest.trim()
    }
}

/// Text of a question line, or None when the line does not start a question
fn question_text(line: &str) -> Option<String> {
    if !QUESTION_MARKER.is_match(line) {
        return None;
    }
    let text = match line.split_once(':') {
        Some((_, rest)) => skip_closing_emphasis(rest),
        None => line,
    };
    Some(text.trim().to_string())
}

/// Text of an option line labelled A-D, or None
fn option_text(line: &str) -> Option<String> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('A'..='D'), Some(')')) => Some(skip_closing_emphasis(chars.as_str()).to_string()),
        _ => None,
    }
}

/// Parse model output into question blocks
///
/// Pure and deterministic. Content before the first question marker is
/// dropped, as are unrecognized lines; blocks keep at most four options and
/// may have none.
pub fn parse_questions(text: &str) -> Vec<QuestionBlock> {
    debug!(text_len = text.len(), "parse_questions: called");
    let mut blocks = Vec::new();
    let mut current: Option<QuestionBlock> = None;

    for raw in text.lines() {
        let line = undecorate(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(text) = question_text(line) {
            if let Some(done) = current.take() {
                blocks.push(done);
            }
            current = Some(QuestionBlock {
                text,
                options: Vec::new(),
            });
        } else if let Some(option) = option_text(line)
            && let Some(block) = current.as_mut()
            && block.options.len() < MAX_OPTIONS
        {
            block.options.push(option);
        }
    }

    if let Some(done) = current {
        blocks.push(done);
    }

    debug!(block_count = blocks.len(), "parse_questions: done");
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_two_questions() {
        let text = "Q1: What is X?\nA) one\nB) two\nC) three\nD) four\nQ2: What is Y?\nA) five\nB) six";
        let blocks = parse_questions(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "What is X?");
        assert_eq!(blocks[0].options, vec!["one", "two", "three", "four"]);
        assert_eq!(blocks[1].text, "What is Y?");
        assert_eq!(blocks[1].options, vec!["five", "six"]);
    }

    #[test]
    fn test_no_question_marker_yields_nothing() {
        assert!(parse_questions("Here are some thoughts.\nA) stray option\nNothing else").is_empty());
        assert!(parse_questions("").is_empty());
    }

    #[test]
    fn test_preamble_is_discarded() {
        let text = "Sure! Here are your questions:\n\nA) not an option yet\n\nQ1: Pick one\nA) yes\nB) no";
        let blocks = parse_questions(text);
        assert_eq!(blocks, vec![QuestionBlock::new("Pick one", &["yes", "no"])]);
    }

    #[test]
    fn test_missing_colon_keeps_whole_line() {
        let blocks = parse_questions("Q1 What does a load balancer do?\nA) Balance loads");
        assert_eq!(blocks[0].text, "Q1 What does a load balancer do?");
        assert_eq!(blocks[0].options, vec!["Balance loads"]);
    }

    #[test]
    fn test_markdown_decoration() {
        let text = "**Q1:** Which HTTP verb is idempotent?\n- A) POST\n- B) PUT\n\n### Question 2: Which is a NoSQL store?\nA) MongoDB\nB) PostgreSQL";
        let blocks = parse_questions(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Which HTTP verb is idempotent?");
        assert_eq!(blocks[0].options, vec!["POST", "PUT"]);
        assert_eq!(blocks[1].text, "Which is a NoSQL store?");
    }

    #[test]
    fn test_unnumbered_question_markers() {
        let blocks = parse_questions("Q: What is X?\nA) one\nB) two\nQ: What is Y?\nA) three");
        assert_eq!(
            blocks,
            vec![
                QuestionBlock::new("What is X?", &["one", "two"]),
                QuestionBlock::new("What is Y?", &["three"]),
            ]
        );

        let blocks = parse_questions("Q. Which layer routes packets?\nA) Network");
        assert_eq!(blocks[0].text, "Q. Which layer routes packets?");
        assert_eq!(blocks[0].options, vec!["Network"]);
    }

    #[test]
    fn test_words_starting_with_q_are_not_markers() {
        assert!(parse_questions("Quick note: answer carefully\nA) ok").is_empty());
        assert!(parse_questions("Qualifications: none\nA) ok").is_empty());
    }

    #[test]
    fn test_trailing_underscores_and_asterisks_are_kept() {
        let blocks = parse_questions("Q1: Which method runs first in __init__\nA) __init__\nB) __new__\nC) a*\nD) **");
        assert_eq!(blocks[0].text, "Which method runs first in __init__");
        assert_eq!(blocks[0].options, vec!["__init__", "__new__", "a*", "**"]);
    }

    #[test]
    fn test_wrapping_emphasis_is_removed() {
        let blocks = parse_questions("**Q1: What is a closure?**\n- **A)** A function with captured state\n_B) A loop_");
        assert_eq!(blocks[0].text, "What is a closure?");
        assert_eq!(blocks[0].options, vec!["A function with captured state", "A loop"]);
    }

    #[test]
    fn test_block_without_options_is_kept_but_not_answerable() {
        let blocks = parse_questions("Q1: Describe REST.\nQ2: Pick\nA) x");
        assert_eq!(blocks.len(), 2);
        assert!(!blocks[0].is_answerable());
        assert!(blocks[1].is_answerable());
    }

    #[test]
    fn test_options_capped_and_labels_outside_a_to_d_ignored() {
        let blocks = parse_questions("Q1: Many\nA) a\nB) b\nE) e\nC) c\nD) d\nA) again");
        assert_eq!(blocks[0].options, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_option_for_label() {
        let block = QuestionBlock::new("q", &["one", "two"]);
        assert_eq!(block.option_for_label('a'), Some("one"));
        assert_eq!(block.option_for_label('B'), Some("two"));
        assert_eq!(block.option_for_label('C'), None);
        assert_eq!(block.option_for_label('!'), None);
    }

    proptest! {
        #[test]
        fn prop_parse_is_deterministic(text in "(Q[0-9]: [a-z ]{0,10}\n|[A-F]\\) [a-z]{0,6}\n|[a-z ]{0,12}\n){0,20}") {
            let first = parse_questions(&text);
            prop_assert_eq!(&first, &parse_questions(&text));
            for block in &first {
                prop_assert!(block.options.len() <= MAX_OPTIONS);
            }
        }
    }
}
