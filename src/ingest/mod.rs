//! Document ingestion: PDF loading and chunking

mod loader;
mod splitter;

pub use loader::PdfLoader;
pub use splitter::{TextSplitter, SEPARATORS};

use serde::{Deserialize, Serialize};

/// Strip any directory and a case-insensitive `.pdf` extension
pub fn file_stem(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(dot) if dot > 0 && base[dot + 1..].eq_ignore_ascii_case("pdf") => &base[..dot],
        _ => base,
    }
}

/// A loaded source document with its pages in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name of the source (e.g. "minutes.pdf")
    pub name: String,
    /// Pages in document order
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Build a document from raw page texts, indexing pages from zero
    pub fn from_texts<I, S>(name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page::new(index, text))
            .collect();
        Self::new(name, pages)
    }

    /// Name without directory or `.pdf` extension
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Extracted text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index
    pub index: usize,
    pub text: String,
}

impl Page {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// A contiguous span of text from one page; the unit of retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Zero-based index of the source page
    pub page: usize,
    /// Position of the chunk across the whole document
    pub ordinal: usize,
}

impl Chunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_strips_pdf_extension() {
        let doc = Document::from_texts("reports/minutes.PDF", ["x"]);
        assert_eq!(doc.stem(), "minutes");

        let doc = Document::from_texts("notes.v2", ["x"]);
        assert_eq!(doc.stem(), "notes.v2");

        let doc = Document::from_texts(".pdf", ["x"]);
        assert_eq!(doc.stem(), ".pdf");
    }

    #[test]
    fn test_from_texts_indexes_pages() {
        let doc = Document::from_texts("a.pdf", ["one", "two"]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1], Page::new(1, "two"));
    }
}
