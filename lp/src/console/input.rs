//! Line input for the console

use std::collections::VecDeque;

use eyre::{Result, eyre};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// One read from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl+C
    Interrupted,
    /// Ctrl+D or end of script
    Eof,
}

/// Where the console reads its lines from
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;
}

/// Interactive terminal input with line editing and history
pub struct RustylineSource {
    editor: DefaultEditor,
}

impl RustylineSource {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if let Some(entry) = history_entry(&line)
                    && let Err(e) = self.editor.add_history_entry(entry)
                {
                    debug!(error = %e, "read_line: failed to add history entry");
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(err) => Err(eyre!("Readline error: {}", err)),
        }
    }
}

/// The part of a line worth keeping in history, if any
fn history_entry(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Pre-recorded input, ending in Eof once exhausted
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        debug!(%prompt, "ScriptedSource::read_line: called");
        Ok(self.lines.pop_front().map(Input::Line).unwrap_or(Input::Eof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_ends_with_eof() {
        let mut source = ScriptedSource::new(["1", "/quit"]);
        assert_eq!(source.read_line("> ").unwrap(), Input::Line("1".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Input::Line("/quit".to_string()));
        assert_eq!(source.read_line("> ").unwrap(), Input::Eof);
        assert_eq!(source.read_line("> ").unwrap(), Input::Eof);
    }

    #[test]
    fn test_history_entry_skips_blank_lines() {
        assert_eq!(history_entry("  /save my plan.md \n"), Some("/save my plan.md"));
        assert_eq!(history_entry("   "), None);
        assert_eq!(history_entry(""), None);
    }
}
