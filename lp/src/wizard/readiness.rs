//! Prerequisite readiness evaluation

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::KnowledgeLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Readiness {
    Ready,
    NotReady,
}

impl Readiness {
    /// No Knowledge and Basic are not enough to build on
    pub fn from_level(level: KnowledgeLevel) -> Self {
        match level {
            KnowledgeLevel::NoKnowledge | KnowledgeLevel::Basic => Readiness::NotReady,
            KnowledgeLevel::Intermediate | KnowledgeLevel::Advanced | KnowledgeLevel::Expert => Readiness::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        *self == Readiness::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrerequisiteReadiness {
    pub prerequisite: String,
    pub level: KnowledgeLevel,
    pub readiness: Readiness,
}

/// Classify each prerequisite, in catalog order
///
/// A prerequisite without a recorded level counts as "No Knowledge".
pub fn evaluate_readiness(
    prereq_knowledge: &BTreeMap<String, KnowledgeLevel>,
    prerequisites: &[String],
) -> Vec<PrerequisiteReadiness> {
    prerequisites
        .iter()
        .map(|prereq| {
            let level = prereq_knowledge.get(prereq).copied().unwrap_or_default();
            PrerequisiteReadiness {
                prerequisite: prereq.clone(),
                level,
                readiness: Readiness::from_level(level),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_thresholds() {
        assert_eq!(Readiness::from_level(KnowledgeLevel::Basic), Readiness::NotReady);
        assert_eq!(Readiness::from_level(KnowledgeLevel::Intermediate), Readiness::Ready);
        assert_eq!(Readiness::from_level(KnowledgeLevel::NoKnowledge), Readiness::NotReady);
        assert_eq!(Readiness::from_level(KnowledgeLevel::Advanced), Readiness::Ready);
        assert_eq!(Readiness::from_level(KnowledgeLevel::Expert), Readiness::Ready);
    }

    #[test]
    fn test_evaluate_keeps_prerequisite_order_and_defaults_missing() {
        let prerequisites = vec!["HTML".to_string(), "CSS".to_string(), "JavaScript".to_string()];
        let knowledge = BTreeMap::from([
            ("HTML".to_string(), KnowledgeLevel::Expert),
            ("JavaScript".to_string(), KnowledgeLevel::Basic),
        ]);

        let result = evaluate_readiness(&knowledge, &prerequisites);

        let names: Vec<&str> = result.iter().map(|r| r.prerequisite.as_str()).collect();
        assert_eq!(names, vec!["HTML", "CSS", "JavaScript"]);
        assert!(result[0].readiness.is_ready());
        assert_eq!(result[1].level, KnowledgeLevel::NoKnowledge);
        assert!(!result[1].readiness.is_ready());
        assert!(!result[2].readiness.is_ready());
    }
}
