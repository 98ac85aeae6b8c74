//! Stage transition controller
//!
//! `advance` is a pure function from (session, event) to the next session.
//! Events that the current stage does not accept, or whose inputs are
//! incomplete, are rejected and the caller keeps the session it had.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::session::{Answer, CurrentKnowledge, Session, Stage};
use crate::catalog::Catalog;

/// User actions that drive the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FieldChosen(String),
    KnowledgeSubmitted(CurrentKnowledge),
    AssessmentSubmitted(BTreeMap<usize, Answer>),
    Reset,
    RequestRegenerateQuestions,
    /// Switch to a different field from the roadmap view
    RequestNewRoadmap,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FieldChosen(_) => "FieldChosen",
            Self::KnowledgeSubmitted(_) => "KnowledgeSubmitted",
            Self::AssessmentSubmitted(_) => "AssessmentSubmitted",
            Self::Reset => "Reset",
            Self::RequestRegenerateQuestions => "RequestRegenerateQuestions",
            Self::RequestNewRoadmap => "RequestNewRoadmap",
        }
    }
}

/// Why an event was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{event} is not allowed during {stage}")]
    InvalidTransition { stage: Stage, event: &'static str },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Incomplete input: {0}")]
    IncompleteInput(String),
}

/// Compute the session that results from applying `event`
pub fn advance(session: &Session, catalog: &Catalog, event: Event) -> Result<Session, TransitionError> {
    debug!(stage = %session.stage, event = event.name(), "advance: called");
    let invalid = |event: &Event| TransitionError::InvalidTransition {
        stage: session.stage,
        event: event.name(),
    };

    match (session.stage, event) {
        (_, Event::Reset) => Ok(Session::default()),

        (Stage::ChooseField, Event::FieldChosen(field)) => {
            if !catalog.contains(&field) {
                return Err(TransitionError::UnknownField(field));
            }
            Ok(Session {
                stage: Stage::AssessKnowledge,
                chosen_field: Some(field),
                ..Session::default()
            })
        }

        (Stage::AssessKnowledge, Event::KnowledgeSubmitted(knowledge)) => {
            let field = session
                .field(catalog)
                .ok_or_else(|| TransitionError::IncompleteInput("no field chosen".to_string()))?;
            let missing = knowledge.missing_levels(field);
            if !missing.is_empty() {
                return Err(TransitionError::IncompleteInput(format!(
                    "no level for {}",
                    missing.join(", ")
                )));
            }
            Ok(Session {
                stage: Stage::DetailedAssessment,
                current_knowledge: Some(knowledge),
                assessment_questions: Vec::new(),
                answers: BTreeMap::new(),
                ..session.clone()
            })
        }

        (Stage::DetailedAssessment, Event::AssessmentSubmitted(answers)) => {
            if answers.is_empty() {
                return Err(TransitionError::IncompleteInput("no question answered".to_string()));
            }
            for (idx, answer) in &answers {
                let block = session
                    .assessment_questions
                    .get(*idx)
                    .ok_or_else(|| TransitionError::IncompleteInput(format!("no question {}", idx + 1)))?;
                if !block.options.is_empty() && !block.options.contains(&answer.choice) {
                    return Err(TransitionError::IncompleteInput(format!(
                        "'{}' is not an option of question {}",
                        answer.choice,
                        idx + 1
                    )));
                }
            }
            // New answers invalidate any roadmap generated from earlier ones
            Ok(Session {
                stage: Stage::GenerateRoadmap,
                answers,
                roadmap: None,
                additional_courses: None,
                ..session.clone()
            })
        }

        (Stage::DetailedAssessment | Stage::GenerateRoadmap, Event::RequestRegenerateQuestions) => Ok(Session {
            stage: Stage::DetailedAssessment,
            assessment_questions: Vec::new(),
            answers: BTreeMap::new(),
            ..session.clone()
        }),

        (Stage::GenerateRoadmap, Event::RequestNewRoadmap) => Ok(Session {
            stage: Stage::ChooseField,
            assessment_questions: Vec::new(),
            answers: BTreeMap::new(),
            roadmap: None,
            additional_courses: None,
            ..session.clone()
        }),

        (_, event) => Err(invalid(&event)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::KnowledgeLevel;
    use crate::wizard::questions::QuestionBlock;
    use proptest::prelude::*;

    const FIELD: &str = "Web Development";

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    fn with_questions(mut session: Session) -> Session {
        session.assessment_questions = vec![
            QuestionBlock::new("What is X?", &["one", "two", "three", "four"]),
            QuestionBlock::new("What is Y?", &["five", "six"]),
        ];
        session
    }

    fn at_assess_knowledge() -> Session {
        advance(&Session::new(), &catalog(), Event::FieldChosen(FIELD.to_string())).unwrap()
    }

    fn at_detailed_assessment() -> Session {
        let catalog = catalog();
        let field = catalog.get(FIELD).unwrap();
        let knowledge = CurrentKnowledge::uniform(field, KnowledgeLevel::Basic);
        let session = advance(&at_assess_knowledge(), &catalog, Event::KnowledgeSubmitted(knowledge)).unwrap();
        with_questions(session)
    }

    fn one_answer() -> BTreeMap<usize, Answer> {
        BTreeMap::from([(
            0,
            Answer {
                question: "What is X?".to_string(),
                choice: "two".to_string(),
            },
        )])
    }

    fn at_generate_roadmap() -> Session {
        let mut session =
            advance(&at_detailed_assessment(), &catalog(), Event::AssessmentSubmitted(one_answer())).unwrap();
        session.roadmap = Some("roadmap".to_string());
        session.additional_courses = Some("courses".to_string());
        session
    }

    #[test]
    fn test_field_chosen() {
        let session = at_assess_knowledge();
        assert_eq!(session.stage(), Stage::AssessKnowledge);
        assert_eq!(session.chosen_field(), Some(FIELD));
    }

    #[test]
    fn test_field_chosen_unknown_field() {
        let result = advance(&Session::new(), &catalog(), Event::FieldChosen("Alchemy".to_string()));
        assert_eq!(result, Err(TransitionError::UnknownField("Alchemy".to_string())));
    }

    #[test]
    fn test_field_chosen_outside_choose_field() {
        let result = advance(&at_assess_knowledge(), &catalog(), Event::FieldChosen("DevOps".to_string()));
        assert!(matches!(result, Err(TransitionError::InvalidTransition { .. })));
    }

    #[test]
    fn test_knowledge_submitted_missing_level_is_rejected() {
        let catalog = catalog();
        let field = catalog.get(FIELD).unwrap();
        let mut knowledge = CurrentKnowledge::for_field(field);
        knowledge.prereq_knowledge.remove("CSS");

        let mut session = at_assess_knowledge();
        let before = session.clone();
        let result = session.apply(&catalog, Event::KnowledgeSubmitted(knowledge));

        assert!(matches!(result, Err(TransitionError::IncompleteInput(ref m)) if m.contains("CSS")));
        assert_eq!(session, before);
    }

    #[test]
    fn test_knowledge_submitted_clears_cached_questions() {
        let catalog = catalog();
        let field = catalog.get(FIELD).unwrap();
        let mut session = with_questions(at_assess_knowledge());

        session
            .apply(&catalog, Event::KnowledgeSubmitted(CurrentKnowledge::for_field(field)))
            .unwrap();

        assert_eq!(session.stage(), Stage::DetailedAssessment);
        assert!(session.current_knowledge().is_some());
        assert!(session.assessment_questions().is_empty());
    }

    #[test]
    fn test_assessment_submitted() {
        let session = at_generate_roadmap();
        assert_eq!(session.stage(), Stage::GenerateRoadmap);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn test_assessment_submitted_requires_an_answer() {
        let result = advance(
            &at_detailed_assessment(),
            &catalog(),
            Event::AssessmentSubmitted(BTreeMap::new()),
        );
        assert!(matches!(result, Err(TransitionError::IncompleteInput(_))));
    }

    #[test]
    fn test_assessment_submitted_rejects_foreign_choice() {
        let answers = BTreeMap::from([(
            1,
            Answer {
                question: "What is Y?".to_string(),
                choice: "seven".to_string(),
            },
        )]);
        let result = advance(&at_detailed_assessment(), &catalog(), Event::AssessmentSubmitted(answers));
        assert!(matches!(result, Err(TransitionError::IncompleteInput(_))));
    }

    #[test]
    fn test_assessment_submitted_rejects_unknown_index() {
        let answers = BTreeMap::from([(
            9,
            Answer {
                question: "?".to_string(),
                choice: "one".to_string(),
            },
        )]);
        let result = advance(&at_detailed_assessment(), &catalog(), Event::AssessmentSubmitted(answers));
        assert!(matches!(result, Err(TransitionError::IncompleteInput(_))));
    }

    #[test]
    fn test_regenerate_questions_from_roadmap() {
        let session = advance(&at_generate_roadmap(), &catalog(), Event::RequestRegenerateQuestions).unwrap();
        assert_eq!(session.stage(), Stage::DetailedAssessment);
        assert!(session.assessment_questions().is_empty());
        assert!(session.answers().is_empty());
        assert_eq!(session.chosen_field(), Some(FIELD));
        assert!(session.current_knowledge().is_some());
    }

    #[test]
    fn test_regenerate_questions_not_allowed_before_assessment() {
        let result = advance(&at_assess_knowledge(), &catalog(), Event::RequestRegenerateQuestions);
        assert!(matches!(result, Err(TransitionError::InvalidTransition { .. })));
    }

    #[test]
    fn test_new_roadmap_switches_field() {
        let session = advance(&at_generate_roadmap(), &catalog(), Event::RequestNewRoadmap).unwrap();
        assert_eq!(session.stage(), Stage::ChooseField);
        assert!(session.assessment_questions().is_empty());
        assert!(session.answers().is_empty());
        assert!(session.roadmap().is_none());
        assert!(session.additional_courses().is_none());

        let session = advance(&session, &catalog(), Event::FieldChosen("DevOps".to_string())).unwrap();
        assert_eq!(session.chosen_field(), Some("DevOps"));
        assert!(session.current_knowledge().is_none());
    }

    #[test]
    fn test_new_roadmap_only_from_roadmap_stage() {
        let result = advance(&at_detailed_assessment(), &catalog(), Event::RequestNewRoadmap);
        assert!(matches!(result, Err(TransitionError::InvalidTransition { .. })));
    }

    #[test]
    fn test_reset_from_every_stage() {
        for session in [
            Session::new(),
            at_assess_knowledge(),
            at_detailed_assessment(),
            at_generate_roadmap(),
        ] {
            let reset = advance(&session, &catalog(), Event::Reset).unwrap();
            assert!(reset.is_initial());
        }
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        let catalog = Catalog::builtin();
        let web = catalog.get(FIELD).unwrap().clone();
        prop_oneof![
            prop::sample::select(vec![
                "Web Development".to_string(),
                "DevOps".to_string(),
                "Alchemy".to_string()
            ])
            .prop_map(Event::FieldChosen),
            prop::sample::select(KnowledgeLevel::ALL.to_vec())
                .prop_map(move |level| Event::KnowledgeSubmitted(CurrentKnowledge::uniform(&web, level))),
            Just(Event::AssessmentSubmitted(one_answer())),
            Just(Event::AssessmentSubmitted(BTreeMap::new())),
            Just(Event::Reset),
            Just(Event::RequestRegenerateQuestions),
            Just(Event::RequestNewRoadmap),
        ]
    }

    proptest! {
        #[test]
        fn prop_event_sequences_stay_well_formed(events in prop::collection::vec(arb_event(), 0..40)) {
            let catalog = Catalog::builtin();
            let mut session = Session::new();
            for event in events {
                let is_reset = event == Event::Reset;
                let before = session.clone();
                match session.apply(&catalog, event) {
                    Ok(_) => {
                        if is_reset {
                            prop_assert!(session.is_initial());
                        }
                    }
                    Err(_) => prop_assert_eq!(&session, &before),
                }
                prop_assert!(Stage::ALL.contains(&session.stage()));
                // Later-stage fields never appear before their producing stage
                match session.stage() {
                    Stage::ChooseField => prop_assert!(session.answers().is_empty() && session.roadmap().is_none()),
                    Stage::AssessKnowledge => prop_assert!(session.chosen_field().is_some() && session.answers().is_empty()),
                    Stage::DetailedAssessment => prop_assert!(session.current_knowledge().is_some()),
                    Stage::GenerateRoadmap => prop_assert!(!session.answers().is_empty()),
                }
                // Keep question-dependent events reachable
                if session.stage() == Stage::DetailedAssessment && session.assessment_questions().is_empty() {
                    session = with_questions(session);
                }
            }
        }
    }
}
