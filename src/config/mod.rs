//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{MatchRecord, MatchResult, VectorMode};
use crate::storage::{JsonlReader, StorageError};
use crate::transforms::match_simulator::DEFAULT_SIMULATIONS;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to load corpus: {0}")]
    CorpusError(#[from] StorageError),
}

/// Match simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Samples drawn per simulation
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,

    /// Fixed seed for reproducible runs; unseeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_simulations() -> usize {
    DEFAULT_SIMULATIONS
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_simulations: default_num_simulations(),
            seed: None,
        }
    }
}

/// Similarity retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Results returned when a request does not say
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// How bag-of-words vectors are compared
    #[serde(default)]
    pub vector_mode: VectorMode,

    /// JSONL file holding the historical corpus; built-in corpus when absent
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            vector_mode: VectorMode::default(),
            corpus_path: None,
        }
    }
}

impl RetrievalConfig {
    /// Load the configured corpus, or the built-in one.
    pub fn load_corpus(&self) -> Result<Vec<MatchRecord>, ConfigError> {
        match &self.corpus_path {
            Some(path) => {
                let reader = JsonlReader::<MatchRecord>::new(path.clone());
                if !reader.exists() {
                    return Err(StorageError::PathNotFound(path.clone()).into());
                }
                let corpus = reader.read_all()?;
                tracing::info!("Loaded {} corpus records from {:?}", corpus.len(), path);
                Ok(corpus)
            }
            None => Ok(default_corpus()),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Attach skipped-record diagnostics to feature responses
    #[serde(default)]
    pub include_diagnostics: bool,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            include_diagnostics: false,
            simulation: SimulationConfig::default(),
            retrieval: RetrievalConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.num_simulations == 0 {
            return Err(ConfigError::ValidationError(
                "num_simulations must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Built-in historical corpus used when no corpus is configured.
pub fn default_corpus() -> Vec<MatchRecord> {
    vec![
        MatchRecord::new("C9", MatchResult::Win, "13-5", "T1"),
        MatchRecord::new("C9", MatchResult::Loss, "11-13", "G2"),
        MatchRecord::new("C9", MatchResult::Win, "13-3", "NAVI"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert!(!config.include_diagnostics);
        assert_eq!(config.simulation.num_simulations, 1000);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.vector_mode, VectorMode::Positional);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_simulations() {
        let mut config = AppConfig::default();
        config.simulation.num_simulations = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.retrieval.top_k, parsed.retrieval.top_k);
        assert_eq!(config.server.host, parsed.server.host);
    }

    #[test]
    fn test_config_partial_file() {
        let parsed: AppConfig = toml::from_str(
            r#"
            include_diagnostics = true

            [simulation]
            seed = 42

            [retrieval]
            vector_mode = "shared_vocabulary"
            "#,
        )
        .unwrap();

        assert!(parsed.include_diagnostics);
        assert_eq!(parsed.simulation.seed, Some(42));
        assert_eq!(parsed.simulation.num_simulations, 1000);
        assert_eq!(parsed.retrieval.vector_mode, VectorMode::SharedVocabulary);
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nnum_simulations = 0").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_default_corpus() {
        let corpus = default_corpus();
        assert_eq!(corpus.len(), 3);
        assert!(corpus.iter().all(|m| m.team_name == "C9"));
    }

    #[test]
    fn test_load_corpus_from_jsonl() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"teamName":"FNC","result":"win","score":"13-7","opponent":"VIT"}}"#
        )
        .unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(
            file,
            r#"{{"teamName":"FNC","result":"loss","score":"9-13","opponent":"KC"}}"#
        )
        .unwrap();

        let retrieval = RetrievalConfig {
            corpus_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let corpus = retrieval.load_corpus().unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[1].opponent, "KC");
    }

    #[test]
    fn test_load_corpus_missing_file() {
        let retrieval = RetrievalConfig {
            corpus_path: Some(PathBuf::from("/nonexistent/corpus.jsonl")),
            ..Default::default()
        };
        assert!(matches!(
            retrieval.load_corpus(),
            Err(ConfigError::CorpusError(StorageError::PathNotFound(_)))
        ));
    }
}
