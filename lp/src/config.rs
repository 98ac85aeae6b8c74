//! learnpath configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration problems detected before the wizard starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LLM API key not found. Set {} or llm.api-key-file.", .envs.join(" or "))]
    MissingCredential { envs: Vec<String> },

    #[error("Failed to read API key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main learnpath configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Assessment question generation
    pub assessment: AssessmentConfig,

    /// Optional YAML catalog replacing the built-in fields
    pub catalog: Option<PathBuf>,

    /// Directory with `.pmt` prompt overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,

    /// Directory for exported roadmaps
    #[serde(rename = "export-dir")]
    pub export_dir: PathBuf,
}

impl Config {
    /// Validate configuration before use
    ///
    /// A missing credential is fatal: the wizard must not start without one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.llm.get_api_key().map(|_| ())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .learnpath.yml
        let local_config = PathBuf::from(".learnpath.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/learnpath/learnpath.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("learnpath").join("learnpath.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Prompt override directory, explicit or `~/.config/learnpath/prompts`
    pub fn prompts_dir(&self) -> Option<PathBuf> {
        self.prompts_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|d| d.join("learnpath").join("prompts")))
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("gemini" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variables tried in order for the API key (a single name or a list)
    #[serde(rename = "api-key-env", deserialize_with = "one_or_many")]
    pub api_key_envs: Vec<String>,

    /// File containing the API key, used when the env var is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_envs: vec!["GOOGLE_API_KEY".to_string(), "GEMINI_API_KEY".to_string()],
            api_key_file: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the environment, then from the key file
    pub fn get_api_key(&self) -> Result<String, ConfigError> {
        for env in &self.api_key_envs {
            if let Ok(key) = std::env::var(env)
                && !key.trim().is_empty()
            {
                tracing::debug!(%env, "get_api_key: found key in environment");
                return Ok(key.trim().to_string());
            }
        }

        if let Some(path) = &self.api_key_file {
            let key = fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
                path: path.clone(),
                source,
            })?;
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        Err(ConfigError::MissingCredential {
            envs: self.api_key_envs.clone(),
        })
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// Load `KEY=value` lines from a dotenv file into the environment
///
/// Variables that are already set win. Without a path, `.env` is searched
/// for from the current directory upwards. Returns the file that was loaded.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|_| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(file) => {
            tracing::info!("Loaded environment from: {}", file.display());
            Ok(Some(file))
        }
        Err(e) if e.not_found() => {
            tracing::debug!("load_env_file: no .env file found");
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

/// Assessment question generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Number of multiple-choice questions requested from the model
    #[serde(rename = "question-count")]
    pub question_count: u32,

    /// Token budget for the question prompt
    #[serde(rename = "question-max-tokens")]
    pub question_max_tokens: u32,

    /// Token budget for roadmap and course prompts
    #[serde(rename = "roadmap-max-tokens")]
    pub roadmap_max_tokens: u32,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            question_max_tokens: 2048,
            roadmap_max_tokens: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.assessment.question_count, 5);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-sonnet-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

assessment:
  question-count: 8

catalog: /etc/learnpath/catalog.yml
export-dir: /tmp/roadmaps
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_envs, vec!["MY_API_KEY"]);
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.assessment.question_count, 8);
        assert_eq!(config.assessment.question_max_tokens, 2048);
        assert_eq!(config.catalog, Some(PathBuf::from("/etc/learnpath/catalog.yml")));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/roadmaps"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-1.5-pro
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_envs, vec!["GOOGLE_API_KEY", "GEMINI_API_KEY"]);
        assert_eq!(config.assessment.question_count, 5);
    }

    #[test]
    #[serial]
    fn test_validate_missing_credential() {
        let mut config = Config::default();
        config.llm.api_key_envs = vec!["LEARNPATH_TEST_MISSING_KEY".to_string()];
        unsafe { std::env::remove_var("LEARNPATH_TEST_MISSING_KEY") };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { ref envs } if envs == &["LEARNPATH_TEST_MISSING_KEY"]));
        assert!(err.to_string().contains("Set LEARNPATH_TEST_MISSING_KEY or llm.api-key-file"));
    }

    #[test]
    #[serial]
    fn test_validate_with_env_key() {
        let mut config = Config::default();
        config.llm.api_key_envs = vec!["LEARNPATH_TEST_PRESENT_KEY".to_string()];
        unsafe { std::env::set_var("LEARNPATH_TEST_PRESENT_KEY", "secret") };

        assert!(config.validate().is_ok());
        assert_eq!(config.llm.get_api_key().unwrap(), "secret");

        unsafe { std::env::remove_var("LEARNPATH_TEST_PRESENT_KEY") };
    }

    #[test]
    #[serial]
    fn test_api_key_file_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("key");
        std::fs::write(&key_path, "file-secret\n").unwrap();

        let mut config = LlmConfig::default();
        config.api_key_envs = vec!["LEARNPATH_TEST_FILE_KEY".to_string()];
        config.api_key_file = Some(key_path);
        unsafe { std::env::remove_var("LEARNPATH_TEST_FILE_KEY") };

        assert_eq!(config.get_api_key().unwrap(), "file-secret");
    }

    #[test]
    fn test_api_key_env_accepts_a_list() {
        let yaml = "llm:\n  api-key-env: [FIRST_KEY, SECOND_KEY]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.llm.api_key_envs, vec!["FIRST_KEY", "SECOND_KEY"]);
    }

    #[test]
    #[serial]
    fn test_api_key_falls_back_to_later_env_var() {
        let mut config = LlmConfig::default();
        config.api_key_envs = vec![
            "LEARNPATH_TEST_GOOGLE_KEY".to_string(),
            "LEARNPATH_TEST_GEMINI_KEY".to_string(),
        ];
        unsafe {
            std::env::remove_var("LEARNPATH_TEST_GOOGLE_KEY");
            std::env::set_var("LEARNPATH_TEST_GEMINI_KEY", "gemini-secret");
        }
        assert_eq!(config.get_api_key().unwrap(), "gemini-secret");

        unsafe { std::env::set_var("LEARNPATH_TEST_GOOGLE_KEY", "google-secret") };
        assert_eq!(config.get_api_key().unwrap(), "google-secret");

        unsafe {
            std::env::remove_var("LEARNPATH_TEST_GOOGLE_KEY");
            std::env::remove_var("LEARNPATH_TEST_GEMINI_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_load_env_file_supplies_key() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "LEARNPATH_TEST_DOTENV_KEY=dotenv-secret\n").unwrap();
        unsafe { std::env::remove_var("LEARNPATH_TEST_DOTENV_KEY") };

        let loaded = load_env_file(Some(&env_path)).unwrap();
        assert_eq!(loaded, Some(env_path));

        let mut config = LlmConfig::default();
        config.api_key_envs = vec!["LEARNPATH_TEST_DOTENV_KEY".to_string()];
        assert_eq!(config.get_api_key().unwrap(), "dotenv-secret");

        unsafe { std::env::remove_var("LEARNPATH_TEST_DOTENV_KEY") };
    }

    #[test]
    fn test_load_env_file_missing_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file(Some(&dir.path().join(".env"))).unwrap(), None);
    }
}
