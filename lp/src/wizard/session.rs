//! Session record and stage definitions

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::questions::QuestionBlock;
use super::transition::{Event, TransitionError, advance};
use crate::catalog::{Catalog, Field, KnowledgeLevel, OverallLevel};

/// The four linear steps of the advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    ChooseField,
    AssessKnowledge,
    DetailedAssessment,
    GenerateRoadmap,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::ChooseField,
        Stage::AssessKnowledge,
        Stage::DetailedAssessment,
        Stage::GenerateRoadmap,
    ];

    /// 1-based position for the progress indicator
    pub fn number(&self) -> usize {
        match self {
            Self::ChooseField => 1,
            Self::AssessKnowledge => 2,
            Self::DetailedAssessment => 3,
            Self::GenerateRoadmap => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ChooseField => "Choose Field",
            Self::AssessKnowledge => "Assess Knowledge",
            Self::DetailedAssessment => "Detailed Assessment",
            Self::GenerateRoadmap => "Generate Roadmap",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Self-reported knowledge collected in the AssessKnowledge stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentKnowledge {
    pub overall_level: OverallLevel,
    pub topic_knowledge: BTreeMap<String, KnowledgeLevel>,
    pub prereq_knowledge: BTreeMap<String, KnowledgeLevel>,
    pub additional_info: String,
}

impl CurrentKnowledge {
    /// Every topic and prerequisite of `field` at "No Knowledge"
    pub fn for_field(field: &Field) -> Self {
        Self::uniform(field, KnowledgeLevel::NoKnowledge)
    }

    /// Every topic and prerequisite of `field` at the same level
    pub fn uniform(field: &Field, level: KnowledgeLevel) -> Self {
        Self {
            overall_level: OverallLevel::default(),
            topic_knowledge: field.topics.iter().map(|t| (t.clone(), level)).collect(),
            prereq_knowledge: field.prerequisites.iter().map(|p| (p.clone(), level)).collect(),
            additional_info: String::new(),
        }
    }

    pub fn with_overall_level(mut self, level: OverallLevel) -> Self {
        self.overall_level = level;
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = info.into();
        self
    }

    pub fn set_topic(&mut self, topic: impl Into<String>, level: KnowledgeLevel) {
        self.topic_knowledge.insert(topic.into(), level);
    }

    pub fn set_prerequisite(&mut self, prereq: impl Into<String>, level: KnowledgeLevel) {
        self.prereq_knowledge.insert(prereq.into(), level);
    }

    /// Topics and prerequisites of `field` that have no level assigned
    pub fn missing_levels(&self, field: &Field) -> Vec<String> {
        let topics = field
            .topics
            .iter()
            .filter(|t| !self.topic_knowledge.contains_key(*t))
            .map(|t| format!("topic '{}'", t));
        let prereqs = field
            .prerequisites
            .iter()
            .filter(|p| !self.prereq_knowledge.contains_key(*p))
            .map(|p| format!("prerequisite '{}'", p));
        topics.chain(prereqs).collect()
    }
}

/// A selected option for one assessment question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub choice: String,
}

/// Per-user wizard progress
///
/// Mutated only through [`advance`] (or [`Session::apply`]) and the
/// population steps in [`super::populate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) stage: Stage,
    pub(crate) chosen_field: Option<String>,
    pub(crate) current_knowledge: Option<CurrentKnowledge>,
    pub(crate) assessment_questions: Vec<QuestionBlock>,
    pub(crate) answers: BTreeMap<usize, Answer>,
    pub(crate) roadmap: Option<String>,
    pub(crate) additional_courses: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn chosen_field(&self) -> Option<&str> {
        self.chosen_field.as_deref()
    }

    /// Catalog entry of the chosen field
    pub fn field<'a>(&self, catalog: &'a Catalog) -> Option<&'a Field> {
        self.chosen_field.as_deref().and_then(|name| catalog.get(name))
    }

    pub fn current_knowledge(&self) -> Option<&CurrentKnowledge> {
        self.current_knowledge.as_ref()
    }

    pub fn assessment_questions(&self) -> &[QuestionBlock] {
        &self.assessment_questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, Answer> {
        &self.answers
    }

    pub fn roadmap(&self) -> Option<&str> {
        self.roadmap.as_deref()
    }

    pub fn additional_courses(&self) -> Option<&str> {
        self.additional_courses.as_deref()
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    /// Apply an event in place; a rejected event leaves the session unchanged
    pub fn apply(&mut self, catalog: &Catalog, event: Event) -> Result<Stage, TransitionError> {
        let name = event.name();
        match advance(self, catalog, event) {
            Ok(next) => {
                debug!(event = name, from = %self.stage, to = %next.stage, "Session::apply: transition");
                *self = next;
                Ok(self.stage)
            }
            Err(e) => {
                debug!(event = name, stage = %self.stage, error = %e, "Session::apply: rejected");
                Err(e)
            }
        }
    }
}
