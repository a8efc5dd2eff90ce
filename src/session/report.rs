use crate::error::{DocentError, Result};
use crate::ingest::file_stem;
use crate::prompt::ReportType;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Placeholder the report template asks the model to leave in the footer
const TIMESTAMP_PLACEHOLDER: &str = "[자동 기입]";

/// A generated report ready to be shown or saved
#[derive(Debug, Clone)]
pub struct Report {
    pub report_type: ReportType,
    /// File name of the source document
    pub document_name: String,
    pub text: String,
    pub generated_at: DateTime<Local>,
    /// Generation hit the token cap; `text` is partial
    pub truncated: bool,
}

impl Report {
    /// Create a report, filling the footer timestamp placeholder
    pub fn new(
        report_type: ReportType,
        document_name: impl Into<String>,
        text: &str,
        truncated: bool,
    ) -> Self {
        let generated_at = Local::now();
        let stamp = generated_at.format("%Y-%m-%d %H:%M").to_string();

        Self {
            report_type,
            document_name: document_name.into(),
            text: text.replace(TIMESTAMP_PLACEHOLDER, &stamp),
            generated_at,
            truncated,
        }
    }

    /// `{type_tag}_{document_stem}.txt`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.txt",
            self.report_type.file_tag(),
            file_stem(&self.document_name)
        )
    }

    /// Write the report text into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| DocentError::Io {
            source: e,
            context: format!("Failed to create report directory: {}", dir.display()),
        })?;

        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.text).map_err(|e| DocentError::Io {
            source: e,
            context: format!("Failed to write report: {}", path.display()),
        })?;

        tracing::info!("Saved report to {}", path.display());
        Ok(path)
    }
}
