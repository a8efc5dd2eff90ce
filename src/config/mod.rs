//! Configuration management for Docent
//!
//! Loads the TOML configuration file, applies profile and environment
//! overrides, and validates the result.

use crate::error::{DocentError, Result};
use crate::pipeline::PipelineConfig;
use crate::prompt::ReportType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    /// Default pipeline settings; CLI flags override them per run
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Hosted OpenAI-compatible `/embeddings` endpoint
    OpenAi,
    /// Local ONNX model via fastembed
    FastEmbed,
    /// Deterministic feature hashing, no model required
    Hashing,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "fastembed" => Ok(Self::FastEmbed),
            "hashing" => Ok(Self::Hashing),
            other => Err(format!(
                "Unknown embedding provider '{}' (expected openai, fastembed or hashing)",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAi => "openai",
            Self::FastEmbed => "fastembed",
            Self::Hashing => "hashing",
        };
        f.write_str(name)
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingBackend,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Which generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    OpenAi,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmBackend,
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    /// Response length cap in tokens
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

/// Where generated reports are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report_dir: PathBuf,
}

/// Profile-specific overrides of the pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<ReportType>,
}

impl ProfileOverrides {
    /// Apply the overrides to a pipeline configuration
    pub fn apply(&self, pipeline: &mut PipelineConfig) {
        if let Some(chunk_size) = self.chunk_size {
            pipeline.chunk_size = chunk_size;
        }
        if let Some(chunk_overlap) = self.chunk_overlap {
            pipeline.chunk_overlap = chunk_overlap;
        }
        if let Some(top_k) = self.top_k {
            pipeline.top_k = top_k;
        }
        if let Some(temperature) = self.temperature {
            pipeline.temperature = temperature;
        }
        if let Some(report_type) = &self.report_type {
            pipeline.report_type = report_type.clone();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DocentError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DocentError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let config: Config = toml::from_str(&content)?;
        config.finish()
    }

    /// Load `path`, or start from the defaults when it does not exist
    ///
    /// Defaults pass through the same env overrides and validation as a file.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!(
            "Config file not found, using defaults. Run 'docent config init' to create one."
        );
        Self::default().finish()
    }

    /// Apply environment variable overrides, then validate
    fn finish(mut self) -> Result<Self> {
        self.apply_env_overrides();
        ConfigValidator::validate(&self)?;
        Ok(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| DocentError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the pipeline defaults
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self.profiles.get(profile).cloned().ok_or_else(|| {
            DocentError::Config(format!("Unknown profile: {}", profile))
        })?;
        overrides.apply(&mut self.pipeline);
        ConfigValidator::validate(self)
    }

    /// Apply environment variable overrides
    /// Environment variables in format: DOCENT_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("DOCENT_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        fn parse<T: FromStr>(path: &str, value: &str) -> Result<T> {
            value.trim().parse().map_err(|_| DocentError::InvalidConfigValue {
                path: path.to_string(),
                message: format!("Cannot parse '{}'", value),
            })
        }

        match path {
            "EMBEDDING__PROVIDER" => {
                self.embedding.provider =
                    value
                        .parse()
                        .map_err(|message| DocentError::InvalidConfigValue {
                            path: path.to_string(),
                            message,
                        })?;
            }
            "EMBEDDING__MODEL" => self.embedding.model = value.to_string(),
            "EMBEDDING__DIMENSION" => self.embedding.dimension = parse(path, value)?,
            "EMBEDDING__BASE_URL" => self.embedding.base_url = value.to_string(),
            "LLM__MODEL" => self.llm.model = value.to_string(),
            "LLM__BASE_URL" => self.llm.base_url = value.to_string(),
            "LLM__MAX_TOKENS" => self.llm.max_tokens = parse(path, value)?,
            "PIPELINE__CHUNK_SIZE" => self.pipeline.chunk_size = parse(path, value)?,
            "PIPELINE__CHUNK_OVERLAP" => self.pipeline.chunk_overlap = parse(path, value)?,
            "PIPELINE__TOP_K" => self.pipeline.top_k = parse(path, value)?,
            "PIPELINE__TEMPERATURE" => self.pipeline.temperature = parse(path, value)?,
            "PIPELINE__REPORT_TYPE" => self.pipeline.report_type = ReportType::from_label(value),
            "OUTPUT__REPORT_DIR" => self.output.report_dir = PathBuf::from(value),
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DocentError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("docent").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "precise".to_string(),
            ProfileOverrides {
                chunk_size: Some(300),
                chunk_overlap: Some(60),
                top_k: Some(5),
                temperature: Some(0.0),
                report_type: None,
            },
        );
        profiles.insert(
            "broad".to_string(),
            ProfileOverrides {
                chunk_size: Some(1000),
                chunk_overlap: Some(200),
                top_k: Some(8),
                temperature: Some(0.3),
                report_type: None,
            },
        );

        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            embedding: EmbeddingConfig {
                provider: EmbeddingBackend::OpenAi,
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
                batch_size: 64,
                api_key_env: "OPENAI_API_KEY".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                timeout_secs: 60,
            },
            llm: LlmConfig {
                provider: LlmBackend::OpenAi,
                model: "gpt-4o".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                max_tokens: 2000,
                timeout_secs: 120,
            },
            pipeline: PipelineConfig::default(),
            output: OutputConfig {
                report_dir: PathBuf::from("reports"),
            },
            profiles,
        }
    }
}
