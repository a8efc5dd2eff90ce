/// PDF text extraction using lopdf
use super::{Document, Page};
use crate::error::{DocentError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Loads PDF files into ordered page texts
pub struct PdfLoader;

impl PdfLoader {
    /// Read a PDF from disk
    pub fn load_path(path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path).map_err(|e| DocentError::Io {
            source: e,
            context: format!("Failed to read document: {}", path.display()),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::load_bytes(name, &bytes)
    }

    /// Parse PDF bytes; `name` is used for error messages and report file names
    pub fn load_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Document> {
        let name = name.into();

        let pdf = lopdf::Document::load_mem(bytes)
            .map_err(|e| DocentError::document_parse(&name, format!("Failed to load PDF: {}", e)))?;

        let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(DocentError::document_parse(&name, "PDF has no pages"));
        }

        let mut pages = Vec::with_capacity(page_numbers.len());
        for (index, page_number) in page_numbers.into_iter().enumerate() {
            let text = match pdf.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not extract text from page {} of {}: {}", page_number, name, e);
                    String::new()
                }
            };
            debug!("Page {}: {} characters", page_number, text.chars().count());
            pages.push(Page::new(index, text));
        }

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(DocentError::document_parse(
                &name,
                "No text content could be extracted (image-only or encrypted PDF?)",
            ));
        }

        info!("Loaded {}: {} pages", name, pages.len());

        Ok(Document::new(name, pages))
    }
}
