//! Console session: the wizard's explicit event loop

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use colored::Colorize;
use eyre::{Result, eyre};
use tracing::{debug, info, warn};

use super::input::{Input, LineSource};
use super::views;
use crate::catalog::{Catalog, KnowledgeLevel, OverallLevel};
use crate::export;
use crate::wizard::{Answer, CurrentKnowledge, Event, Session, Stage, StageGenerator};

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Ask the same question again
    Again,
    /// Leave the current stage handler and re-render
    Next,
    Quit,
}

/// A value read from the user, or a request to leave the current prompt
enum Reply<T> {
    Value(T),
    Leave(Flow),
}

/// Interactive advisor session
pub struct ConsoleSession<S, W> {
    catalog: Catalog,
    generator: StageGenerator,
    export_dir: PathBuf,
    session: Session,
    input: S,
    out: W,
}

impl<S: LineSource, W: Write> ConsoleSession<S, W> {
    pub fn new(catalog: Catalog, generator: StageGenerator, export_dir: PathBuf, input: S, out: W) -> Self {
        Self {
            catalog,
            generator,
            export_dir,
            session: Session::new(),
            input,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consume the console, returning the input and output it used
    pub fn into_parts(self) -> (S, W) {
        (self.input, self.out)
    }

    /// Run the wizard until the user quits or input ends
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome()?;

        loop {
            let stage = self.session.stage();
            debug!(%stage, "ConsoleSession::run: rendering stage");
            writeln!(self.out)?;
            writeln!(self.out, "{}", views::render_progress(stage).bright_cyan().bold())?;

            let flow = match stage {
                Stage::ChooseField => self.choose_field()?,
                Stage::AssessKnowledge => self.assess_knowledge()?,
                Stage::DetailedAssessment => self.detailed_assessment().await?,
                Stage::GenerateRoadmap => self.generate_roadmap().await?,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        writeln!(self.out, "Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", "CS Learning Path Advisor".bright_cyan().bold())?;
        writeln!(
            self.out,
            "Type {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        )?;
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        let stage = self.session.stage();
        writeln!(self.out)?;
        writeln!(self.out, "{}", "Available Commands:".bright_cyan())?;
        writeln!(self.out, "  {:14} Show this help", "/help".yellow())?;
        writeln!(self.out, "  {:14} Start over from field selection", "/reset".yellow())?;
        writeln!(self.out, "  {:14} Exit the advisor", "/quit".yellow())?;
        if matches!(stage, Stage::DetailedAssessment | Stage::GenerateRoadmap) {
            writeln!(self.out, "  {:14} Retake the assessment with new questions", "/retake".yellow())?;
        }
        if stage == Stage::GenerateRoadmap {
            writeln!(self.out, "  {:14} Pick a different field", "/switch".yellow())?;
            writeln!(self.out, "  {:14} Save the roadmap as Markdown", "/save [path]".yellow())?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn hint(&mut self, message: impl fmt::Display) -> Result<()> {
        writeln!(self.out, "  {} {}", "?".yellow(), message)?;
        Ok(())
    }

    /// Read one line, handling slash commands and interrupts
    fn ask(&mut self, prompt: &str) -> Result<Reply<String>> {
        loop {
            self.out.flush()?;
            match self.input.read_line(&format!("{} ", prompt.bright_green()))? {
                Input::Eof => {
                    writeln!(self.out)?;
                    return Ok(Reply::Leave(Flow::Quit));
                }
                Input::Interrupted => {
                    writeln!(self.out, "^C")?;
                }
                Input::Line(line) => {
                    let line = line.trim();
                    if line.starts_with('/') {
                        match self.handle_slash_command(line)? {
                            Flow::Again => continue,
                            flow => return Ok(Reply::Leave(flow)),
                        }
                    }
                    return Ok(Reply::Value(line.to_string()));
                }
            }
        }
    }

    /// Ask for a level from a numbered scale; Enter takes the default
    fn ask_level<T: Copy + FromStr>(&mut self, prompt: &str, options: &[T], default: T) -> Result<Reply<T>> {
        loop {
            let line = match self.ask(prompt)? {
                Reply::Value(line) => line,
                Reply::Leave(flow) => return Ok(Reply::Leave(flow)),
            };
            match parse_level_choice(&line, options, default) {
                Some(level) => return Ok(Reply::Value(level)),
                None => self.hint(format!("Enter a number from 1 to {}", options.len()))?,
            }
        }
    }

    fn handle_slash_command(&mut self, input: &str) -> Result<Flow> {
        let (cmd, arg) = match input.trim().split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (input.trim(), None),
        };
        debug!(%cmd, stage = %self.session.stage(), "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => {
                self.print_help()?;
                Ok(Flow::Again)
            }
            "/quit" | "/q" | "/exit" => Ok(Flow::Quit),
            "/reset" => self.dispatch(Event::Reset),
            "/retake" => self.dispatch(Event::RequestRegenerateQuestions),
            "/switch" => self.dispatch(Event::RequestNewRoadmap),
            "/save" => {
                self.save(arg.map(Path::new))?;
                Ok(Flow::Again)
            }
            _ => {
                writeln!(self.out, "{} Unknown command: {}", "?".yellow(), cmd)?;
                writeln!(self.out, "Type {} for available commands", "/help".yellow())?;
                Ok(Flow::Again)
            }
        }
    }

    /// Apply an event from a command; rejected events become a hint
    fn dispatch(&mut self, event: Event) -> Result<Flow> {
        match self.session.apply(&self.catalog, event) {
            Ok(_) => Ok(Flow::Next),
            Err(e) => {
                self.hint(e)?;
                Ok(Flow::Again)
            }
        }
    }

    fn save(&mut self, target: Option<&Path>) -> Result<()> {
        if self.session.stage() != Stage::GenerateRoadmap {
            return self.hint("/save is available once your roadmap has been generated");
        }
        match export::export_roadmap(&self.session, &self.catalog, &self.export_dir, target) {
            Ok(path) => writeln!(self.out, "{} {}", "Saved roadmap to".green(), path.display())?,
            Err(e) => {
                warn!(error = %e, "save: export failed");
                writeln!(self.out, "{} {:#}", "Error:".red(), e)?;
            }
        }
        Ok(())
    }

    /// Fetch generated content for the current stage, offering retries on failure
    async fn populate(&mut self) -> Result<Reply<()>> {
        while StageGenerator::needs_population(&self.session) {
            writeln!(self.out, "{}", views::render_working(self.session.stage()).dimmed())?;
            self.out.flush()?;

            if let Err(e) = self.generator.populate(&mut self.session, &self.catalog).await {
                warn!(error = %e, stage = %self.session.stage(), "populate: generation failed");
                writeln!(self.out, "{} {}", "Error:".red(), e)?;
                if !e.is_retryable() {
                    self.hint("Retrying may not help; /reset starts over")?;
                }
                if let Reply::Leave(flow) = self.ask("Press Enter to try again")? {
                    return Ok(Reply::Leave(flow));
                }
            }
        }
        Ok(Reply::Value(()))
    }

    fn choose_field(&mut self) -> Result<Flow> {
        write!(self.out, "{}", views::render_field_list(&self.catalog))?;

        loop {
            let line = match self.ask("Field>")? {
                Reply::Value(line) => line,
                Reply::Leave(flow) => return Ok(flow),
            };
            if line.is_empty() {
                continue;
            }

            let Some(name) = resolve_field(&self.catalog, &line) else {
                self.hint(format!("Unknown field: {}", line))?;
                continue;
            };
            match self.session.apply(&self.catalog, Event::FieldChosen(name)) {
                Ok(_) => return Ok(Flow::Next),
                Err(e) => self.hint(e)?,
            }
        }
    }

    fn assess_knowledge(&mut self) -> Result<Flow> {
        let field = self
            .session
            .field(&self.catalog)
            .cloned()
            .ok_or_else(|| eyre!("No field chosen"))?;

        writeln!(self.out)?;
        write!(self.out, "{}", views::render_field_summary(&field))?;
        writeln!(self.out)?;
        write!(self.out, "{}", views::render_overall_scale())?;

        let overall = match self.ask_level("Overall experience>", &OverallLevel::ALL, OverallLevel::default())? {
            Reply::Value(level) => level,
            Reply::Leave(flow) => return Ok(flow),
        };
        let mut knowledge = CurrentKnowledge::for_field(&field).with_overall_level(overall);

        writeln!(self.out)?;
        write!(self.out, "{}", views::render_level_scale())?;
        for topic in &field.topics {
            match self.ask_level(&format!("{}>", topic), &KnowledgeLevel::ALL, KnowledgeLevel::default())? {
                Reply::Value(level) => knowledge.set_topic(topic.as_str(), level),
                Reply::Leave(flow) => return Ok(flow),
            }
        }

        writeln!(self.out, "{}", "Prerequisites".bright_cyan())?;
        for prereq in &field.prerequisites {
            match self.ask_level(&format!("{}>", prereq), &KnowledgeLevel::ALL, KnowledgeLevel::default())? {
                Reply::Value(level) => knowledge.set_prerequisite(prereq.as_str(), level),
                Reply::Leave(flow) => return Ok(flow),
            }
        }

        let info = match self.ask("Anything else about your background? (Enter to skip)>")? {
            Reply::Value(line) => line,
            Reply::Leave(flow) => return Ok(flow),
        };
        knowledge = knowledge.with_additional_info(info);

        if let Err(e) = self.session.apply(&self.catalog, Event::KnowledgeSubmitted(knowledge)) {
            self.hint(e)?;
        }
        Ok(Flow::Next)
    }

    async fn detailed_assessment(&mut self) -> Result<Flow> {
        if let Reply::Leave(flow) = self.populate().await? {
            return Ok(flow);
        }

        let questions = self.session.assessment_questions().to_vec();
        writeln!(self.out)?;
        write!(self.out, "{}", views::render_questions(&questions))?;

        let mut answers = BTreeMap::new();
        for (idx, question) in questions.iter().enumerate() {
            if !question.is_answerable() {
                continue;
            }
            let last = (b'A' + question.options.len() as u8 - 1) as char;
            loop {
                let line = match self.ask(&format!("Q{} answer [A-{}]>", idx + 1, last))? {
                    Reply::Value(line) => line,
                    Reply::Leave(flow) => return Ok(flow),
                };
                match parse_option_label(&line).and_then(|label| question.option_for_label(label)) {
                    Some(choice) => {
                        answers.insert(
                            idx,
                            Answer {
                                question: question.text.clone(),
                                choice: choice.to_string(),
                            },
                        );
                        break;
                    }
                    None => self.hint(format!("Enter a letter from A to {}", last))?,
                }
            }
        }

        info!(answered = answers.len(), "detailed_assessment: submitting answers");
        if let Err(e) = self.session.apply(&self.catalog, Event::AssessmentSubmitted(answers)) {
            self.hint(e)?;
        }
        Ok(Flow::Next)
    }

    async fn generate_roadmap(&mut self) -> Result<Flow> {
        if let Reply::Leave(flow) = self.populate().await? {
            return Ok(flow);
        }

        writeln!(self.out)?;
        write!(self.out, "{}", views::render_roadmap(&self.session, &self.catalog))?;
        writeln!(self.out)?;
        write!(self.out, "{}", views::render_roadmap_actions())?;

        loop {
            match self.ask(">")? {
                Reply::Value(line) if line.is_empty() => continue,
                Reply::Value(_) => self.hint("Use /save, /retake, /switch, /reset or /quit")?,
                Reply::Leave(flow) => return Ok(flow),
            }
        }
    }
}

/// Field name for a 1-based number or a case-insensitive name
fn resolve_field(catalog: &Catalog, input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|idx| catalog.fields().get(idx))
            .map(|f| f.name.clone());
    }
    catalog
        .fields()
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(input))
        .map(|f| f.name.clone())
}

/// Level for a 1-based number or a label; empty input takes the default
fn parse_level_choice<T: Copy + FromStr>(input: &str, options: &[T], default: T) -> Option<T> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|idx| options.get(idx)).copied();
    }
    input.parse::<T>().ok()
}

/// Single letter answer, with or without a trailing ')'
fn parse_option_label(input: &str) -> Option<char> {
    let input = input.trim().trim_end_matches(')');
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}
