//! CityGuide configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

pub use venuestore::EmbeddingConfig;

/// Main CityGuide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service configuration
    pub llm: LlmConfig,

    /// Retrieval configuration
    pub retrieval: RetrievalConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Trigger phrase configuration
    pub triggers: TriggersConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .cityguide.yml
        let local_config = PathBuf::from(".cityguide.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/cityguide/cityguide.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cityguide").join("cityguide.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Directory of the venue knowledge base
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// Number of passages to retrieve per turn
    #[serde(rename = "top-k")]
    pub top_k: usize,

    /// Minimum top-result relevance score for a usable match
    #[serde(rename = "score-threshold")]
    pub score_threshold: f32,

    /// Embedding service configuration (shared with the ks tool)
    pub embedding: EmbeddingConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cityguide")
                .join("venuestore"),
            top_k: 4,
            score_threshold: 0.7,
            embedding: EmbeddingConfig::default(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for persisted preferences and plan
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("cityguide"),
        }
    }
}

impl StorageConfig {
    /// Path of the persisted preferences file
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }

    /// Path of the persisted plan file
    pub fn plan_path(&self) -> PathBuf {
        self.data_dir.join("plan.json")
    }
}

/// Trigger phrase configuration
///
/// Phrases checked before classification; any case-insensitive substring
/// match short-circuits the turn into a plan add. A deliberate bypass of
/// the general classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggersConfig {
    /// Phrases that trigger adding the last venue to the plan
    #[serde(rename = "plan-add")]
    pub plan_add: Vec<String>,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            plan_add: vec![
                "add to plan".to_string(),
                "add it to".to_string(),
                "save this".to_string(),
                "adding it".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k, 4);
        assert!((config.retrieval.score_threshold - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.triggers.plan_add.len(), 4);
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/tmp/cg-test"),
        };
        assert_eq!(storage.preferences_path(), PathBuf::from("/tmp/cg-test/preferences.json"));
        assert_eq!(storage.plan_path(), PathBuf::from("/tmp/cg-test/plan.json"));
    }

    #[test]
    fn test_load_explicit_config_partial() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("cityguide.yml");
        std::fs::write(&path, "retrieval:\n  top-k: 8\n  score-threshold: 0.5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.retrieval.top_k, 8);
        assert!((config.retrieval.score_threshold - 0.5).abs() < f32::EPSILON);
        // Unspecified sections fall back to defaults
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }
}
