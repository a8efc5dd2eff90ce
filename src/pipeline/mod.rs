//! Question-answering pipeline over one document
//!
//! Building runs split → embed → index once; every question then runs
//! retrieve → compose → generate against the immutable result. A changed
//! configuration means building a new pipeline.

use crate::config::Config;
use crate::embedding::{self, EmbeddingProvider, VectorIndex};
use crate::error::{DocentError, Result};
use crate::generation::{self, GenerationParams, Generator};
use crate::ingest::{Chunk, Document, TextSplitter};
use crate::prompt::{self, ReportType};
use crate::retrieval::Retriever;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Settings that shape one pipeline build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
    /// Chunks retrieved per question
    pub top_k: usize,
    pub temperature: f32,
    pub report_type: ReportType,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 3,
            temperature: 0.0,
            report_type: ReportType::BusinessReport,
        }
    }
}

impl PipelineConfig {
    /// Every constraint violation as `(field, message)`
    pub fn violations(&self) -> Vec<(&'static str, String)> {
        let mut violations = Vec::new();

        if self.chunk_size == 0 {
            violations.push(("chunk_size", "Chunk size must be greater than 0".to_string()));
        }
        if self.chunk_size > 0 && self.chunk_overlap >= self.chunk_size {
            violations.push((
                "chunk_overlap",
                format!(
                    "Overlap ({}) must be smaller than chunk size ({})",
                    self.chunk_overlap, self.chunk_size
                ),
            ));
        }
        if self.top_k == 0 {
            violations.push(("top_k", "top_k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            violations.push((
                "temperature",
                format!("Temperature must be within [0, 1], got {}", self.temperature),
            ));
        }

        violations
    }

    pub fn validate(&self) -> Result<()> {
        let violations = self.violations();
        if violations.is_empty() {
            return Ok(());
        }

        let message = violations
            .into_iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(DocentError::Config(message))
    }
}

/// Shared backends a pipeline is built with
#[derive(Clone)]
pub struct Services {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub generator: Arc<dyn Generator>,
    /// Response length cap passed to every generation
    pub max_tokens: usize,
    /// Texts per embedding request during a build
    pub embed_batch_size: usize,
}

impl Services {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, generator: Arc<dyn Generator>) -> Self {
        Self {
            embedder,
            generator,
            max_tokens: 2000,
            embed_batch_size: 64,
        }
    }

    /// Construct the configured embedding and generation backends
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            embedder: embedding::provider_from_config(&config.embedding)?,
            generator: generation::generator_from_config(&config.llm)?,
            max_tokens: config.llm.max_tokens,
            embed_batch_size: config.embedding.batch_size,
        })
    }
}

/// A generated answer and the chunks it was grounded on
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Generation stopped at `max_tokens`; `text` is partial
    pub truncated: bool,
    pub sources: Vec<Chunk>,
}

/// The exact prompt a question would send, without sending it
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub prompt: String,
    pub sources: Vec<Chunk>,
}

/// Built pipeline for one document and configuration
pub struct Pipeline {
    config: PipelineConfig,
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    params: GenerationParams,
}

impl Pipeline {
    /// Split, embed and index `document`
    ///
    /// Any failure aborts the build; nothing partial is kept.
    pub fn build(document: &Document, config: PipelineConfig, services: &Services) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap)?;
        let chunks = splitter.split_document(document);
        if chunks.is_empty() {
            return Err(DocentError::document_parse(
                &document.name,
                "no text chunks after splitting",
            ));
        }

        let vectors = embed_chunks(services, &chunks)?;
        info!(
            "Embedded {} chunks with {}",
            vectors.len(),
            services.embedder.model_name()
        );

        let index = VectorIndex::build(chunks.into_iter().zip(vectors).collect())?;
        let retriever = Retriever::new(Arc::clone(&services.embedder), index, config.top_k)?;

        info!(
            "Pipeline ready for {} in {:.2?} ({} chunks, {}D)",
            document.name,
            started.elapsed(),
            retriever.index().len(),
            retriever.index().dimension()
        );

        Ok(Self {
            params: GenerationParams {
                temperature: config.temperature,
                max_tokens: services.max_tokens,
            },
            config,
            retriever,
            generator: Arc::clone(&services.generator),
        })
    }

    /// Answer `question` from the retrieved context
    pub fn invoke(&self, question: &str) -> Result<Answer> {
        let PreparedPrompt { prompt, sources } = self.prepare(question)?;

        info!(
            "Generating with {} ({} sources)",
            self.generator.model_name(),
            sources.len()
        );
        let generation = self.generator.generate(&prompt, &self.params)?;

        Ok(Answer {
            text: generation.text,
            truncated: generation.truncated,
            sources,
        })
    }

    /// Retrieve and compose without calling the generator
    pub fn prepare(&self, question: &str) -> Result<PreparedPrompt> {
        let sources = self.retriever.retrieve(question)?;
        let prompt = prompt::compose(&self.config.report_type, &sources, question);
        debug!("Composed prompt: {} chars", prompt.chars().count());
        Ok(PreparedPrompt { prompt, sources })
    }

    /// Compose the report instruction for the configured type
    pub fn report_prompt(&self, extra_instructions: Option<&str>) -> Result<PreparedPrompt> {
        self.prepare(&self.report_instruction(extra_instructions))
    }

    /// Write a report of the configured type
    pub fn generate_report(&self, extra_instructions: Option<&str>) -> Result<Answer> {
        self.invoke(&self.report_instruction(extra_instructions))
    }

    fn report_instruction(&self, extra_instructions: Option<&str>) -> String {
        prompt::report_instruction(&self.config.report_type, extra_instructions)
    }

    pub fn chunk_count(&self) -> usize {
        self.retriever.index().len()
    }

    /// Indexed chunks in document order
    pub fn chunks(&self) -> &[Chunk] {
        self.retriever.index().chunks()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

fn embed_chunks(services: &Services, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let batch_size = services.embed_batch_size.max(1);
    let mut vectors = Vec::with_capacity(texts.len());

    for (i, batch) in texts.chunks(batch_size).enumerate() {
        debug!("Embedding batch {} ({} texts)", i + 1, batch.len());
        let embedded = services.embedder.embed_batch(batch)?;
        if embedded.len() != batch.len() {
            return Err(DocentError::EmbeddingService(
                embedding::EmbeddingError::InvalidResponse(format!(
                    "expected {} vectors, got {}",
                    batch.len(),
                    embedded.len()
                )),
            ));
        }
        vectors.extend(embedded);
    }

    Ok(vectors)
}
