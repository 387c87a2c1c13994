/// Configuration system for funcsearch
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, FuncSearchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Vector database configuration
    pub vector_db: VectorDbConfig,

    /// Embedding model configuration
    pub embedding: EmbeddingConfig,

    /// Chat-completion model used to explain functions
    pub explainer: ExplainerConfig,

    /// What to index
    pub indexing: IndexingConfig,

    /// Default query issued after indexing
    pub search: SearchConfig,
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// LanceDB data directory path
    #[serde(default = "default_lancedb_path")]
    pub lancedb_path: PathBuf,

    /// Name of the collection (LanceDB table) holding function records
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Drop and recreate the collection before each indexing run
    #[serde(default)]
    pub reset_on_index: bool,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2", "BAAI/bge-small-en-v1.5")
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainerConfig {
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key. Prefer the OPENAI_API_KEY environment variable over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Language named in the prompt ("You are an expert {language} programmer").
    /// When unset, the language of the indexed files is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Optional completion length cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Project root walked by `run` and `index` when no path is given
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// File extension to index, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query issued by `run` after indexing
    #[serde(default = "default_query")]
    pub query: String,

    /// Number of results to return
    #[serde(default = "default_result_limit")]
    pub limit: usize,
}

fn default_lancedb_path() -> PathBuf {
    crate::paths::PlatformPaths::default_lancedb_path()
}

fn default_collection_name() -> String {
    "codebase_functions".to_string()
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_project_path() -> PathBuf {
    PathBuf::from("temp").join("pyGameMath")
}

fn default_extension() -> String {
    "py".to_string()
}

fn default_query() -> String {
    "Your query here ...".to_string()
}

fn default_result_limit() -> usize {
    5
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            lancedb_path: default_lancedb_path(),
            collection_name: default_collection_name(),
            reset_on_index: false,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
        }
    }
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_llm_model(),
            api_key: None,
            language: None,
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            project_path: default_project_path(),
            extension: default_extension(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            limit: default_result_limit(),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> FuncSearchError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
    .into()
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, FuncSearchError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, or defaults if there is none
    pub fn load_or_default() -> Result<Self, FuncSearchError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), FuncSearchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), FuncSearchError> {
        if self.vector_db.collection_name.trim().is_empty() {
            return Err(invalid("vector_db.collection_name", "must not be empty"));
        }

        if self.embedding.model_name.trim().is_empty() {
            return Err(invalid("embedding.model_name", "must not be empty"));
        }

        if !(self.explainer.base_url.starts_with("http://")
            || self.explainer.base_url.starts_with("https://"))
        {
            return Err(invalid(
                "explainer.base_url",
                format!("must be an http(s) URL, got '{}'", self.explainer.base_url),
            ));
        }

        if self.explainer.model.trim().is_empty() {
            return Err(invalid("explainer.model", "must not be empty"));
        }

        if self.explainer.timeout_secs == 0 {
            return Err(invalid("explainer.timeout_secs", "must be greater than 0"));
        }

        if self.indexing.extension.trim_start_matches('.').is_empty() {
            return Err(invalid("indexing.extension", "must not be empty"));
        }

        if self.search.limit == 0 {
            return Err(invalid("search.limit", "must be greater than 0"));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    pub(crate) fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("FUNCSEARCH_LANCEDB_PATH") {
            self.vector_db.lancedb_path = PathBuf::from(path);
        }

        if let Some(name) = lookup("FUNCSEARCH_COLLECTION") {
            self.vector_db.collection_name = name;
        }

        if let Some(model) = lookup("FUNCSEARCH_MODEL") {
            self.embedding.model_name = model;
        }

        if let Some(url) = lookup("FUNCSEARCH_LLM_BASE_URL") {
            self.explainer.base_url = url;
        }

        if let Some(model) = lookup("FUNCSEARCH_LLM_MODEL") {
            self.explainer.model = model;
        }

        if let Some(key) = lookup("OPENAI_API_KEY")
            && !key.is_empty()
        {
            self.explainer.api_key = Some(key);
        }

        if let Some(path) = lookup("FUNCSEARCH_PROJECT_PATH") {
            self.indexing.project_path = PathBuf::from(path);
        }

        if let Some(ext) = lookup("FUNCSEARCH_EXTENSION") {
            self.indexing.extension = ext;
        }

        if let Some(value) = lookup("FUNCSEARCH_LIMIT") {
            match value.trim().parse() {
                Ok(limit) => self.search.limit = limit,
                Err(e) => tracing::warn!(
                    "Ignoring FUNCSEARCH_LIMIT={:?}: {}; keeping search.limit = {}",
                    value,
                    e,
                    self.search.limit
                ),
            }
        }
    }

    /// Load from `path` (or the default location), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, FuncSearchError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests;
