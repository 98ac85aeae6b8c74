//! Roadmap export ("Save Progress")
//!
//! Writes the finished roadmap, course list and readiness check to a
//! Markdown file the user can keep.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::wizard::{Session, evaluate_readiness};

/// Lowercase, hyphen-separated form of a field name ("Web Development" -> "web-development")
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Default file name for an export made at `now`
pub fn default_file_name(field: &str, now: DateTime<Local>) -> String {
    format!("learnpath-{}-{}.md", slugify(field), now.format("%Y%m%d-%H%M%S"))
}

/// Render the session as a Markdown document
///
/// Fails unless the session holds a generated roadmap.
pub fn render_markdown(session: &Session, catalog: &Catalog, now: DateTime<Local>) -> Result<String> {
    debug!(stage = %session.stage(), "render_markdown: called");
    let field = session.field(catalog).ok_or_else(|| eyre!("No field chosen"))?;
    let knowledge = session
        .current_knowledge()
        .ok_or_else(|| eyre!("No knowledge assessment recorded"))?;
    let roadmap = session.roadmap().ok_or_else(|| eyre!("No roadmap generated yet"))?;

    let mut out = String::new();
    writeln!(out, "# Learning Roadmap: {}", field.name)?;
    writeln!(out)?;
    writeln!(out, "_Generated {}_", now.format("%Y-%m-%d %H:%M"))?;
    writeln!(out)?;
    writeln!(out, "{}", field.description)?;
    writeln!(out)?;

    writeln!(out, "## Profile")?;
    writeln!(out)?;
    writeln!(out, "- **Experience Level:** {}", knowledge.overall_level)?;
    for topic in &field.topics {
        let level = knowledge.topic_knowledge.get(topic).copied().unwrap_or_default();
        writeln!(out, "- {}: {}", topic, level)?;
    }
    if !knowledge.additional_info.trim().is_empty() {
        writeln!(out, "- **Background:** {}", knowledge.additional_info.trim())?;
    }
    writeln!(out)?;

    writeln!(out, "## Assessment")?;
    writeln!(out)?;
    for (idx, answer) in session.answers() {
        writeln!(out, "{}. {}", idx + 1, answer.question)?;
        writeln!(out, "   - {}", answer.choice)?;
    }
    writeln!(out)?;

    writeln!(out, "## Roadmap")?;
    writeln!(out)?;
    writeln!(out, "{}", roadmap.trim_end())?;
    writeln!(out)?;

    if let Some(courses) = session.additional_courses() {
        writeln!(out, "## Recommended Courses")?;
        writeln!(out)?;
        writeln!(out, "{}", courses.trim_end())?;
        writeln!(out)?;
    }

    writeln!(out, "## Prerequisites Readiness")?;
    writeln!(out)?;
    for item in evaluate_readiness(&knowledge.prereq_knowledge, &field.prerequisites) {
        let (mark, verdict) = if item.readiness.is_ready() {
            ("x", "ready")
        } else {
            (" ", "strengthen this first")
        };
        writeln!(out, "- [{}] {} ({}): {}", mark, item.prerequisite, item.level, verdict)?;
    }

    Ok(out)
}

/// Write the session's roadmap to `target`, or to a timestamped file in `dir`
pub fn export_roadmap(session: &Session, catalog: &Catalog, dir: &Path, target: Option<&Path>) -> Result<PathBuf> {
    let now = Local::now();
    let content = render_markdown(session, catalog, now)?;

    let path = match target {
        Some(t) => t.to_path_buf(),
        None => {
            let field = session.chosen_field().unwrap_or("roadmap");
            dir.join(default_file_name(field, now))
        }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;

    info!("Exported roadmap to: {}", path.display());
    Ok(path)
}
