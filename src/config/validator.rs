use crate::config::{Config, EmbeddingBackend};
use crate::error::{DocentError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every violation
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_llm(config, &mut errors);

        // Pipeline defaults and every profile must yield a usable pipeline
        for (field, message) in config.pipeline.violations() {
            errors.push(ValidationError::new(format!("pipeline.{}", field), message));
        }
        Self::validate_profiles(config, &mut errors);

        if config.output.report_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "output.report_dir",
                "Report directory cannot be empty",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DocentError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != "1.0.0" {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        let embedding = &config.embedding;

        if embedding.batch_size == 0 {
            errors.push(ValidationError::new(
                "embedding.batch_size",
                "Batch size must be greater than 0",
            ));
        }

        if embedding.dimension == 0 {
            errors.push(ValidationError::new(
                "embedding.dimension",
                "Dimension must be greater than 0",
            ));
        }

        if embedding.provider != EmbeddingBackend::Hashing && embedding.model.trim().is_empty() {
            errors.push(ValidationError::new(
                "embedding.model",
                "Model name cannot be empty",
            ));
        }

        if embedding.provider == EmbeddingBackend::OpenAi {
            if embedding.api_key_env.trim().is_empty() {
                errors.push(ValidationError::new(
                    "embedding.api_key_env",
                    "API key variable name cannot be empty",
                ));
            }
            if !is_http_url(&embedding.base_url) {
                errors.push(ValidationError::new(
                    "embedding.base_url",
                    format!("Not an http(s) URL: {}", embedding.base_url),
                ));
            }
            if embedding.timeout_secs == 0 {
                errors.push(ValidationError::new(
                    "embedding.timeout_secs",
                    "Timeout must be greater than 0",
                ));
            }
        }
    }

    fn validate_llm(config: &Config, errors: &mut Vec<ValidationError>) {
        let llm = &config.llm;

        if llm.model.trim().is_empty() {
            errors.push(ValidationError::new("llm.model", "Model name cannot be empty"));
        }

        if llm.api_key_env.trim().is_empty() {
            errors.push(ValidationError::new(
                "llm.api_key_env",
                "API key variable name cannot be empty",
            ));
        }

        if !is_http_url(&llm.base_url) {
            errors.push(ValidationError::new(
                "llm.base_url",
                format!("Not an http(s) URL: {}", llm.base_url),
            ));
        }

        if llm.max_tokens == 0 {
            errors.push(ValidationError::new(
                "llm.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if llm.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "llm.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_profiles(config: &Config, errors: &mut Vec<ValidationError>) {
        let mut names: Vec<&String> = config.profiles.keys().collect();
        names.sort();

        for name in names {
            let mut pipeline = config.pipeline.clone();
            config.profiles[name].apply(&mut pipeline);
            for (field, message) in pipeline.violations() {
                errors.push(ValidationError::new(
                    format!("profiles.{}.{}", name, field),
                    message,
                ));
            }
        }
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
