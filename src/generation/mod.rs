//! Language model generation

mod openai;

pub use openai::OpenAiChatGenerator;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::{DocentError, Result};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Client initialization failed: {0}")]
    InitializationError(String),

    #[error("Request failed: {0}")]
    RequestError(String),

    #[error("Model service returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// 0.0 (precise) to 1.0 (creative)
    pub temperature: f32,
    /// Response length cap in tokens
    pub max_tokens: usize,
}

/// Generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// The response hit `max_tokens` before completing; `text` is partial
    pub truncated: bool,
}

/// Trait for text generation backends
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str, params: &GenerationParams)
        -> std::result::Result<Generation, GenerationError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Build the configured generator
pub fn generator_from_config(config: &LlmConfig) -> Result<Arc<dyn Generator>> {
    match config.provider {
        LlmBackend::OpenAi => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                DocentError::Config(format!(
                    "Environment variable {} is not set",
                    config.api_key_env
                ))
            })?;
            let generator = OpenAiChatGenerator::new(
                &api_key,
                &config.base_url,
                &config.model,
                Duration::from_secs(config.timeout_secs),
            )?;
            tracing::info!("Generator: {}", generator.model_name());
            Ok(Arc::new(generator))
        }
    }
}
