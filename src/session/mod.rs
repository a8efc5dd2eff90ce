//! Session management
//!
//! A `Session` owns the open document, the pipeline built for it, the
//! configuration that pipeline was built with, and the conversation so far.
//! The pipeline is rebuilt only when the applied configuration changes.

mod conversation;
mod report;

pub use conversation::{Conversation, Role, Turn};
pub use report::Report;

use crate::error::{DocentError, Result};
use crate::ingest::{Document, PdfLoader};
use crate::pipeline::{Answer, Pipeline, PipelineConfig, Services};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Interactive state for one user working with one document at a time
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    services: Services,
    document: Option<Document>,
    pipeline: Option<Pipeline>,
    /// Configuration the current pipeline was built with
    last_config: Option<PipelineConfig>,
    conversation: Conversation,
}

impl Session {
    pub fn new(services: Services) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            services,
            document: None,
            pipeline: None,
            last_config: None,
            conversation: Conversation::new(),
        };
        info!("Session {} started", session.id);
        session
    }

    /// Load a PDF as the current document, dropping any built pipeline
    pub fn open_document(&mut self, path: &Path) -> Result<&Document> {
        let document = PdfLoader::load_path(path)?;
        Ok(self.set_document(document))
    }

    /// Use an already loaded document
    pub fn set_document(&mut self, document: Document) -> &Document {
        self.pipeline = None;
        self.last_config = None;
        self.document.insert(document)
    }

    /// Make sure a pipeline built with `config` is ready
    ///
    /// Returns whether a rebuild happened. A failed build leaves the session
    /// without a pipeline.
    pub fn configure(&mut self, config: PipelineConfig) -> Result<bool> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| DocentError::Session("No document loaded".to_string()))?;

        if self.pipeline.is_some() && self.last_config.as_ref() == Some(&config) {
            return Ok(false);
        }

        self.pipeline = None;
        self.last_config = None;

        let pipeline = Pipeline::build(document, config.clone(), &self.services)?;
        self.pipeline = Some(pipeline);
        self.last_config = Some(config);
        Ok(true)
    }

    /// Ask a question about the current document
    ///
    /// The question is recorded before invoking; the answer only on success.
    pub fn ask(&mut self, question: &str) -> Result<Answer> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| DocentError::Session("Pipeline not configured".to_string()))?;

        self.conversation.push(Role::User, question);
        let answer = pipeline.invoke(question)?;
        self.conversation.push(Role::Assistant, answer.text.as_str());
        Ok(answer)
    }

    /// Generate a report of the configured type
    pub fn generate_report(&self, extra_instructions: Option<&str>) -> Result<Report> {
        let (document, pipeline) = match (&self.document, &self.pipeline) {
            (Some(document), Some(pipeline)) => (document, pipeline),
            _ => return Err(DocentError::Session("Pipeline not configured".to_string())),
        };

        let answer = pipeline.generate_report(extra_instructions)?;
        Ok(Report::new(
            pipeline.config().report_type.clone(),
            &document.name,
            &answer.text,
            answer.truncated,
        ))
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Release the document, pipeline and conversation
    pub fn close(mut self) {
        self.pipeline = None;
        self.document = None;
        self.conversation.clear();
        info!(
            "Session {} closed after {}s",
            self.id,
            (Utc::now() - self.started_at).num_seconds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::generation::{Generation, GenerationError, GenerationParams, Generator};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Echoes the prompt length; fails while `failing` is set
    #[derive(Default)]
    struct FlakyGenerator {
        failing: AtomicBool,
    }

    impl Generator for FlakyGenerator {
        fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> std::result::Result<Generation, GenerationError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(GenerationError::ApiError {
                    status: 429,
                    body: "quota exceeded".to_string(),
                });
            }
            Ok(Generation {
                text: format!("{} chars", prompt.chars().count()),
                truncated: false,
            })
        }

        fn model_name(&self) -> &str {
            "flaky"
        }
    }

    fn session(generator: Arc<FlakyGenerator>) -> Session {
        let services = Services::new(Arc::new(HashingEmbedder::default()), generator);
        let mut session = Session::new(services);
        session.set_document(Document::from_texts(
            "minutes.pdf",
            ["Budget approved for Q3.", "Hiring freeze lifted in October."],
        ));
        session
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            chunk_size: 20,
            chunk_overlap: 5,
            top_k: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_rebuilds_only_on_change() {
        let mut session = session(Arc::default());

        assert!(session.configure(config()).unwrap());
        assert!(!session.configure(config()).unwrap());

        let changed = PipelineConfig {
            top_k: 1,
            ..config()
        };
        assert!(session.configure(changed).unwrap());
        assert_eq!(session.pipeline().unwrap().config().top_k, 1);
    }

    #[test]
    fn test_new_document_forces_rebuild() {
        let mut session = session(Arc::default());
        assert!(session.configure(config()).unwrap());

        session.set_document(Document::from_texts("other.pdf", ["Completely new text."]));
        assert!(session.pipeline().is_none());
        assert!(session.configure(config()).unwrap());
    }

    #[test]
    fn test_failed_configure_leaves_no_pipeline() {
        let mut session = session(Arc::default());
        assert!(session.configure(config()).unwrap());

        let invalid = PipelineConfig {
            chunk_overlap: 20,
            ..config()
        };
        assert!(session.configure(invalid).is_err());
        assert!(session.pipeline().is_none());
        assert!(session.ask("Budget?").is_err());
    }

    #[test]
    fn test_ask_records_turns() {
        let mut session = session(Arc::default());
        session.configure(config()).unwrap();

        session.ask("Budget?").unwrap();
        let roles: Vec<Role> = session.conversation().turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[test]
    fn test_failed_ask_keeps_only_question() {
        let generator = Arc::new(FlakyGenerator::default());
        let mut session = session(Arc::clone(&generator));
        session.configure(config()).unwrap();

        generator.failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            session.ask("Budget?"),
            Err(DocentError::Generation(_))
        ));

        let conversation = session.conversation();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.turns()[0].role, Role::User);
    }

    #[test]
    fn test_configure_without_document() {
        let services = Services::new(
            Arc::new(HashingEmbedder::default()),
            Arc::new(FlakyGenerator::default()),
        );
        let mut session = Session::new(services);
        assert!(matches!(
            session.configure(config()),
            Err(DocentError::Session(_))
        ));
    }

    #[test]
    fn test_report_carries_document_and_type() {
        let mut session = session(Arc::default());
        session
            .configure(PipelineConfig {
                report_type: crate::prompt::ReportType::ProjectStatus,
                ..config()
            })
            .unwrap();

        let report = session.generate_report(None).unwrap();
        assert_eq!(report.file_name(), "project_status_minutes.txt");
        assert!(!report.truncated);
    }
}
