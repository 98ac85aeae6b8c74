//! Stage views
//!
//! Pure functions of the session and catalog that return the text to show.

use std::fmt::Write as _;

use crate::catalog::{Catalog, Field, KnowledgeLevel, OverallLevel};
use crate::wizard::{QuestionBlock, Session, Stage, evaluate_readiness};

/// "Step 2/4: Assess Knowledge  [##..]"
pub fn render_progress(stage: Stage) -> String {
    let total = Stage::ALL.len();
    let done = stage.number();
    let bar: String = (1..=total).map(|n| if n <= done { '#' } else { '.' }).collect();
    format!("Step {}/{}: {}  [{}]", done, total, stage.label(), bar)
}

/// Numbered list of every field in the catalog
pub fn render_field_list(catalog: &Catalog) -> String {
    let mut out = String::from("Choose the field you want to learn:\n\n");
    for (idx, field) in catalog.fields().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, field.name);
        let _ = writeln!(out, "     {}", field.description);
    }
    out.push_str("\nEnter a number or a field name.\n");
    out
}

/// Description, topic badges and prerequisites of a field
pub fn render_field_summary(field: &Field) -> String {
    let badges: Vec<String> = field.topics.iter().map(|t| format!("[{}]", t)).collect();
    let mut out = String::new();
    let _ = writeln!(out, "{}", field.name);
    let _ = writeln!(out, "{}", field.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Key topics: {}", badges.join(" "));
    let _ = writeln!(out, "Prerequisites: {}", field.prerequisites.join(", "));
    out
}

/// Numbered scale of per-topic knowledge levels
pub fn render_level_scale() -> String {
    let entries: Vec<String> = KnowledgeLevel::ALL
        .iter()
        .enumerate()
        .map(|(idx, level)| format!("{}) {}", idx + 1, level))
        .collect();
    format!("Levels: {}   (Enter = {})\n", entries.join("  "), KnowledgeLevel::default())
}

/// Numbered scale of overall experience levels
pub fn render_overall_scale() -> String {
    let entries: Vec<String> = OverallLevel::ALL
        .iter()
        .enumerate()
        .map(|(idx, level)| format!("{}) {}", idx + 1, level))
        .collect();
    format!("Experience: {}   (Enter = {})\n", entries.join("  "), OverallLevel::default())
}

/// Assessment questions with lettered options
pub fn render_questions(questions: &[QuestionBlock]) -> String {
    let mut out = String::new();
    for (idx, question) in questions.iter().enumerate() {
        let _ = writeln!(out, "Q{}. {}", idx + 1, question.text);
        if question.is_answerable() {
            for (label, option) in ('A'..='D').zip(&question.options) {
                let _ = writeln!(out, "   {}) {}", label, option);
            }
        } else {
            let _ = writeln!(out, "   (no options given, skipped)");
        }
        let _ = writeln!(out);
    }
    out
}

/// Line shown while a generation call is in flight
pub fn render_working(stage: Stage) -> &'static str {
    match stage {
        Stage::DetailedAssessment => "Generating assessment questions...",
        Stage::GenerateRoadmap => "Generating your personalized learning roadmap...",
        Stage::ChooseField | Stage::AssessKnowledge => "Working...",
    }
}

/// Roadmap, course recommendations and prerequisite readiness
pub fn render_roadmap(session: &Session, catalog: &Catalog) -> String {
    let mut out = String::new();
    let Some(field) = session.field(catalog) else {
        return out;
    };

    let _ = writeln!(out, "Your Learning Roadmap for {}", field.name);
    let _ = writeln!(out);
    match session.roadmap() {
        Some(roadmap) => {
            let _ = writeln!(out, "{}", roadmap.trim_end());
        }
        None => {
            let _ = writeln!(out, "(no roadmap yet)");
        }
    }

    if let Some(courses) = session.additional_courses() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommended Courses");
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", courses.trim_end());
    }

    if let Some(knowledge) = session.current_knowledge() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Prerequisites Readiness");
        for item in evaluate_readiness(&knowledge.prereq_knowledge, &field.prerequisites) {
            if item.readiness.is_ready() {
                let _ = writeln!(out, "  ✓ {} ({}): ready", item.prerequisite, item.level);
            } else {
                let _ = writeln!(
                    out,
                    "  ✗ {} ({}): consider strengthening this first",
                    item.prerequisite, item.level
                );
            }
        }
    }
    out
}

/// Commands available under the roadmap
pub fn render_roadmap_actions() -> &'static str {
    "/save [path]  save this roadmap as Markdown\n\
     /retake       retake the assessment\n\
     /switch       pick a different field\n"
}
