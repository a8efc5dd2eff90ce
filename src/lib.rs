//! Docent - Document-grounded Report Agent
//!
//! Loads a PDF, splits it into overlapping chunks, embeds and indexes them in
//! memory, then answers questions or writes structured business reports using
//! only the retrieved passages as context.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ingest;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod session;

pub use error::{DocentError, Result};
pub use pipeline::{Answer, Pipeline, PipelineConfig, PreparedPrompt, Services};
pub use prompt::ReportType;
pub use session::{Conversation, Report, Session};
