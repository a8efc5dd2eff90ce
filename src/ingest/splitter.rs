/// Recursive character text splitter with overlap
use super::{Chunk, Document};
use crate::error::{DocentError, Result};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Separators tried in priority order: paragraph, line, sentence, word, character
pub const SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Splits text into chunks of at most `chunk_size` characters
///
/// Pieces are produced on the highest-priority separator present in the
/// text, then merged greedily. The trailing pieces of an emitted chunk (up to
/// `chunk_overlap` characters) are carried into the next one. A whitespace-free
/// token longer than `chunk_size` is emitted whole.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DocentError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(DocentError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split every page independently, numbering chunks across the document
    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in &document.pages {
            let pieces = self.split_text(&page.text);
            debug!("Page {}: {} chunks", page.index + 1, pieces.len());

            for text in pieces {
                let ordinal = chunks.len();
                chunks.push(Chunk {
                    text,
                    page: page.index,
                    ordinal,
                });
            }
        }

        info!(
            "Split {} into {} chunks (size={}, overlap={})",
            document.name,
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        chunks
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // A lone unsplittable token is never cut into characters
        let token = text.trim();
        if is_single_token(token) && char_len(token) > self.chunk_size {
            return vec![token.to_string()];
        }

        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() || text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge_pieces(&fitting));
                fitting.clear();
            }

            if remaining.is_empty() || is_single_token(piece) {
                let token = piece.trim();
                if !token.is_empty() {
                    chunks.push(token.to_string());
                }
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge_pieces(&fitting));
        }

        chunks
    }

    /// Greedily join pieces into windows of at most `chunk_size` characters
    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(text) = join_window(&window) {
                    merged.push(text);
                }

                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        if let Some(text) = join_window(&window) {
            merged.push(text);
        }

        merged
    }
}

/// Split on `separator`, attaching it to the start of the following piece
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_single_token(piece: &str) -> bool {
    !piece.trim().chars().any(char::is_whitespace)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Document;

    #[test]
    fn test_rejects_overlap_not_below_size() {
        assert!(matches!(
            TextSplitter::new(10, 10),
            Err(DocentError::Config(_))
        ));
        assert!(matches!(
            TextSplitter::new(10, 25),
            Err(DocentError::Config(_))
        ));
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(10, 9).is_ok());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = TextSplitter::new(500, 100).unwrap();
        assert_eq!(splitter.split_text("  Hello world.  "), vec!["Hello world."]);
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        let splitter = TextSplitter::new(20, 5).unwrap();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn test_words_split_with_overlap() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let chunks = splitter.split_text("Alpha Beta Gamma.");
        assert_eq!(chunks, vec!["Alpha Beta", "Gamma."]);
    }

    #[test]
    fn test_overlap_carries_trailing_words() {
        let splitter = TextSplitter::new(10, 5).unwrap();
        let chunks = splitter.split_text("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);
    }

    #[test]
    fn test_paragraphs_preferred_over_words() {
        let splitter = TextSplitter::new(30, 0).unwrap();
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = splitter.split_text(text);
        assert_eq!(chunks, vec!["First paragraph here.", "Second paragraph here."]);
    }

    #[test]
    fn test_oversized_token_passes_through_whole() {
        let splitter = TextSplitter::new(8, 2).unwrap();
        let chunks = splitter.split_text("tiny Supercalifragilistic end");
        assert_eq!(chunks, vec!["tiny", "Supercalifragilistic", "end"]);
    }

    #[test]
    fn test_lone_oversized_token_is_not_cut() {
        let splitter = TextSplitter::new(8, 2).unwrap();
        assert_eq!(
            splitter.split_text("Supercalifragilistic"),
            vec!["Supercalifragilistic"]
        );
        assert_eq!(
            splitter.split_text("\n  Supercalifragilistic \n"),
            vec!["Supercalifragilistic"]
        );
        // Short tokens still go through the normal path
        assert_eq!(splitter.split_text("abcdefgh"), vec!["abcdefgh"]);
    }

    #[test]
    fn test_lengths_counted_in_characters() {
        // 4 hangul syllables per word = 12 bytes, but 4 characters
        let splitter = TextSplitter::new(9, 0).unwrap();
        let chunks = splitter.split_text("회의록요 주요논의 액션아이");
        assert_eq!(chunks, vec!["회의록요 주요논의", "액션아이"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn test_split_document_tags_pages_and_ordinals() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let doc = Document::from_texts("sample.pdf", ["Alpha Beta Gamma.", "Delta Epsilon."]);
        let chunks = splitter.split_document(&doc);

        let page_one: Vec<_> = chunks.iter().filter(|c| c.page == 0).collect();
        assert!(page_one.len() >= 2);
        assert!(page_one.iter().all(|c| c.char_len() <= 10));
        assert!(chunks.iter().any(|c| c.page == 1 && c.text.contains("Delta")));

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.ordinal, i);
        }
    }
}
