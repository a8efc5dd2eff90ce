//! Local-model embedding through the full pipeline
//!
//! Requires a model download (~90MB) - run with: cargo test -- --ignored

mod common;

use common::RecordingGenerator;
use docent::embedding::{CachedEmbedder, EmbeddingProvider, FastEmbedProvider};
use docent::ingest::Document;
use docent::{Pipeline, PipelineConfig, Services};
use std::sync::Arc;

#[test]
#[ignore] // Requires model download
fn test_fastembed_retrieves_semantic_match() {
    let provider = FastEmbedProvider::new("all-MiniLM-L6-v2")
        .expect("Failed to initialize embedding provider");
    assert_eq!(provider.dimension(), 384);

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(CachedEmbedder::new(Arc::new(provider)));
    let generator = Arc::new(RecordingGenerator::new("ok"));
    let services = Services::new(Arc::clone(&embedder), generator);

    let document = Document::from_texts(
        "ops.pdf",
        [
            "The quarterly budget was approved by the finance committee.\n\n\
             Travel expenses must be filed within thirty days.",
            "The new office opens in Seoul next spring.\n\n\
             Staff onboarding starts with a two-day orientation.",
        ],
    );

    let config = PipelineConfig {
        chunk_size: 80,
        chunk_overlap: 10,
        top_k: 1,
        ..Default::default()
    };
    let pipeline = Pipeline::build(&document, config, &services).unwrap();
    assert_eq!(pipeline.chunk_count(), 4);

    let prepared = pipeline.prepare("When will the new branch location open?").unwrap();
    assert_eq!(prepared.sources.len(), 1);
    assert!(prepared.sources[0].text.contains("Seoul"));

    // Second build reuses cached vectors
    let again = Pipeline::build(&document, PipelineConfig::default(), &services).unwrap();
    assert!(again.chunk_count() >= 2);
}
