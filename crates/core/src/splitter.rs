use crate::error::IngestError;
use crate::models::{make_chunk_id, Chunk, Document};

pub const DEFAULT_MAX_CHARS: usize = 1_000;
pub const DEFAULT_OVERLAP_CHARS: usize = 250;

/// Splits documents into overlapping fixed-stride character windows.
/// Pure transformation, no I/O.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSplitter {
    max_chars: usize,
    overlap_chars: usize,
}

impl ChunkSplitter {
    pub fn new(max_chars: usize, overlap_chars: usize) -> Result<Self, IngestError> {
        if max_chars == 0 {
            return Err(IngestError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap_chars >= max_chars {
            return Err(IngestError::Configuration(format!(
                "chunk overlap {overlap_chars} must be smaller than chunk size {max_chars}"
            )));
        }
        Ok(Self {
            max_chars,
            overlap_chars,
        })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Distance between the start offsets of consecutive chunks.
    pub fn stride(&self) -> usize {
        self.max_chars - self.overlap_chars
    }

    /// Lazy window iterator over one document's content. Restartable:
    /// calling again yields the same sequence.
    pub fn windows(&self, document: &Document) -> ChunkWindows {
        ChunkWindows {
            chars: document.content.chars().collect(),
            start: 0,
            max_chars: self.max_chars,
            stride: self.stride(),
        }
    }

    /// Split every document into chunks, threading one run-wide position
    /// counter through the whole batch. Whitespace-only documents
    /// contribute nothing.
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut position = 0u64;

        for document in documents {
            if document.content.trim().is_empty() {
                continue;
            }

            for text in self.windows(document) {
                let chunk_id = make_chunk_id(document.source(), position, &text);
                chunks.push(Chunk {
                    chunk_id,
                    text,
                    position,
                    metadata: document.metadata.clone(),
                });
                position = position.saturating_add(1);
            }
        }

        chunks
    }
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
        }
    }
}

pub struct ChunkWindows {
    chars: Vec<char>,
    start: usize,
    max_chars: usize,
    stride: usize,
}

impl Iterator for ChunkWindows {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.start >= self.chars.len() {
            return None;
        }
        let end = (self.start + self.max_chars).min(self.chars.len());
        let piece: String = self.chars[self.start..end].iter().collect();
        self.start += self.stride;
        Some(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc(content: &str) -> Document {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), "/tmp/test.pdf".to_string());
        metadata.insert("page".to_string(), "1".to_string());
        Document::new(content, metadata)
    }

    #[test]
    fn overlap_equal_to_size_is_rejected() {
        let result = ChunkSplitter::new(1000, 1000);
        assert!(matches!(result, Err(IngestError::Configuration(_))));
    }

    #[test]
    fn overlap_above_size_is_rejected() {
        let result = ChunkSplitter::new(100, 250);
        assert!(matches!(result, Err(IngestError::Configuration(_))));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let result = ChunkSplitter::new(0, 0);
        assert!(matches!(result, Err(IngestError::Configuration(_))));
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let splitter = ChunkSplitter::default();
        assert!(splitter.split(&[]).is_empty());
    }

    #[test]
    fn whitespace_only_document_yields_no_chunks() {
        let splitter = ChunkSplitter::default();
        assert!(splitter.split(&[doc("  \n\t  \n")]).is_empty());
    }

    #[test]
    fn short_document_becomes_one_chunk() {
        let splitter = ChunkSplitter::default();
        let chunks = splitter.split(&[doc("a short page")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "a short page");
        assert_eq!(chunks[0].position, 0);
        assert_eq!(chunks[0].metadata.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn long_document_splits_at_fixed_stride_offsets() {
        let content: String = "abcdefghij".chars().cycle().take(2400).collect();
        let splitter = ChunkSplitter::new(1000, 250).expect("valid config");
        let chunks = splitter.split(&[doc(&content)]);

        assert_eq!(chunks.len(), 4);
        let lengths: Vec<usize> = chunks.iter().map(|chunk| chunk.text.chars().count()).collect();
        assert_eq!(lengths, vec![1000, 1000, 900, 150]);

        let source: Vec<char> = content.chars().collect();
        for (index, chunk) in chunks.iter().enumerate() {
            let start = index * splitter.stride();
            let expected: String = source[start..(start + lengths[index])].iter().collect();
            assert_eq!(chunk.text, expected, "chunk {index} starts at offset {start}");
        }
    }

    #[test]
    fn every_chunk_respects_the_maximum_length() {
        let content: String = "x".repeat(5_321);
        let splitter = ChunkSplitter::new(400, 100).expect("valid config");
        for chunk in splitter.split(&[doc(&content)]) {
            assert!(chunk.text.chars().count() <= splitter.max_chars());
        }
    }

    #[test]
    fn consecutive_chunks_overlap_by_the_configured_amount() {
        let content: String = ('a'..='z').cycle().take(3000).collect();
        let splitter = ChunkSplitter::new(500, 125).expect("valid config");
        let chunks = splitter.split(&[doc(&content)]);

        for pair in chunks.windows(2) {
            let head: Vec<char> = pair[0].text.chars().collect();
            if head.len() < 500 {
                continue;
            }
            let tail: String = head[375..].iter().collect();
            assert!(pair[1].text.starts_with(&tail));
        }
    }

    #[test]
    fn chunks_reconstruct_the_original_content() {
        let content: String = "0123456789".chars().cycle().take(2_700).collect();
        let splitter = ChunkSplitter::new(800, 200).expect("valid config");
        let chunks = splitter.split(&[doc(&content)]);

        let mut rebuilt = String::new();
        for chunk in &chunks {
            let taken = rebuilt.chars().count();
            let start = (chunk.position as usize) * splitter.stride();
            let fresh: String = chunk.text.chars().skip(taken - start).collect();
            rebuilt.push_str(&fresh);
        }
        assert_eq!(rebuilt, content);
    }

    #[test]
    fn positions_are_contiguous_across_documents() {
        let splitter = ChunkSplitter::new(10, 2).expect("valid config");
        let chunks = splitter.split(&[doc("first page text"), doc("second page text")]);
        let positions: Vec<u64> = chunks.iter().map(|chunk| chunk.position).collect();
        let expected: Vec<u64> = (0..chunks.len() as u64).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn window_iterator_is_restartable() {
        let splitter = ChunkSplitter::new(10, 2).expect("valid config");
        let document = doc("a document long enough to window twice");
        let first: Vec<String> = splitter.windows(&document).collect();
        let second: Vec<String> = splitter.windows(&document).collect();
        assert_eq!(first, second);
    }
}
