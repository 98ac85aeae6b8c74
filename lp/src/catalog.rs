//! Subfield catalog and knowledge-level scales
//!
//! The catalog is fixed, read-only configuration data: each computer-science
//! field has a description, an ordered topic list and an ordered prerequisite
//! list. A YAML file can replace the built-in table.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Self-assessed level for a single topic or prerequisite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    #[default]
    #[serde(rename = "No Knowledge")]
    NoKnowledge,
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl KnowledgeLevel {
    pub const ALL: [KnowledgeLevel; 5] = [
        KnowledgeLevel::NoKnowledge,
        KnowledgeLevel::Basic,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
        KnowledgeLevel::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoKnowledge => "No Knowledge",
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown knowledge level: {}", s))
    }
}

/// Overall experience in the chosen field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum OverallLevel {
    #[default]
    #[serde(rename = "Complete Beginner")]
    CompleteBeginner,
    Beginner,
    Intermediate,
    Advanced,
}

impl OverallLevel {
    pub const ALL: [OverallLevel; 4] = [
        OverallLevel::CompleteBeginner,
        OverallLevel::Beginner,
        OverallLevel::Intermediate,
        OverallLevel::Advanced,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CompleteBeginner => "Complete Beginner",
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for OverallLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for OverallLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown experience level: {}", s))
    }
}

/// A computer-science subfield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub description: String,
    pub topics: Vec<String>,
    pub prerequisites: Vec<String>,
}

impl Field {
    fn new(name: &str, description: &str, topics: &[&str], prerequisites: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered, read-only table of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    fields: Vec<Field>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The eight fields the advisor ships with
    pub fn builtin() -> Self {
        let fields = vec![
            Field::new(
                "Artificial Intelligence",
                "Learn to build intelligent systems that can perform tasks that typically require human intelligence",
                &[
                    "Neural Networks",
                    "Natural Language Processing",
                    "Computer Vision",
                    "Reinforcement Learning",
                    "Expert Systems",
                    "AI Ethics",
                ],
                &["Python", "Mathematics", "Statistics"],
            ),
            Field::new(
                "Data Science",
                "Extract insights and knowledge from structured and unstructured data",
                &[
                    "Data Analysis",
                    "Statistical Modeling",
                    "Data Visualization",
                    "Big Data",
                    "Business Intelligence",
                    "Predictive Analytics",
                ],
                &["Python/R", "Statistics", "SQL", "Mathematics"],
            ),
            Field::new(
                "Machine Learning",
                "Build systems that automatically learn and improve from experience",
                &[
                    "Supervised Learning",
                    "Unsupervised Learning",
                    "Deep Learning",
                    "Feature Engineering",
                    "Model Deployment",
                    "MLOps",
                ],
                &["Python", "Mathematics", "Statistics", "Linear Algebra"],
            ),
            Field::new(
                "Web Development",
                "Create dynamic websites and web applications",
                &[
                    "Frontend Development",
                    "Backend Development",
                    "Databases",
                    "API Development",
                    "Web Security",
                    "Cloud Deployment",
                ],
                &["HTML", "CSS", "JavaScript"],
            ),
            Field::new(
                "Mobile Development",
                "Build applications for mobile devices",
                &[
                    "iOS Development",
                    "Android Development",
                    "Cross-platform Development",
                    "UI/UX Design",
                    "Mobile Security",
                    "App Store Optimization",
                ],
                &["Programming Fundamentals", "Object-Oriented Programming"],
            ),
            Field::new(
                "Cybersecurity",
                "Protect systems, networks, and data from digital attacks",
                &[
                    "Network Security",
                    "Ethical Hacking",
                    "Cryptography",
                    "Incident Response",
                    "Security Compliance",
                    "Risk Assessment",
                ],
                &["Networking", "Operating Systems", "Programming"],
            ),
            Field::new(
                "Cloud Computing",
                "Design and manage scalable cloud-based solutions",
                &[
                    "AWS/Azure/GCP",
                    "Containerization",
                    "Microservices",
                    "Serverless Computing",
                    "Cloud Security",
                    "Cost Optimization",
                ],
                &["Networking", "Operating Systems", "Programming"],
            ),
            Field::new(
                "DevOps",
                "Bridge development and operations for faster software delivery",
                &[
                    "CI/CD Pipelines",
                    "Infrastructure as Code",
                    "Monitoring",
                    "Containerization",
                    "Automation",
                    "Cloud Platforms",
                ],
                &["Programming", "Linux", "Networking"],
            ),
        ];
        Self { fields }
    }

    /// Load a catalog from a YAML file (a list of fields under `fields:`)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(?path, "Catalog::load_from_file: called");
        let content = std::fs::read_to_string(path).context("Failed to read catalog file")?;
        let catalog: Self = serde_yaml::from_str(&content).context("Failed to parse catalog file")?;
        if catalog.fields.is_empty() {
            return Err(eyre::eyre!("Catalog {} defines no fields", path.display()));
        }
        info!("Loaded catalog with {} fields from: {}", catalog.fields.len(), path.display());
        Ok(catalog)
    }

    /// Use the file when given, the built-in table otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
