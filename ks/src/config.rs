//! Configuration for venuestore

use std::path::{Path, PathBuf};

use eyre::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the venue store directory
    #[serde(rename = "store-path")]
    pub store_path: PathBuf,

    /// Default chunk size in characters
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Default overlap between chunks in characters
    pub overlap: usize,

    /// Embedding service configuration
    pub embedding: EmbeddingConfig,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cityguide")
        .join("venuestore")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            chunk_size: crate::DEFAULT_CHUNK_SIZE,
            overlap: crate::DEFAULT_OVERLAP,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("cityguide").join("venuestore.yml")),
            Some(PathBuf::from("venuestore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunk_size, crate::DEFAULT_CHUNK_SIZE);
        assert_eq!(config.overlap, crate::DEFAULT_OVERLAP);
        assert_eq!(config.embedding.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_load_explicit_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("venuestore.yml");
        std::fs::write(&path, "chunk-size: 250\noverlap: 25\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.chunk_size, 250);
        assert_eq!(config.overlap, 25);
        // Unspecified sections fall back to defaults
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }
}
