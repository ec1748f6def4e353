use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// One unit of loaded source text, typically a single PDF page. Immutable
/// once produced by the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: BTreeMap<String, String>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Source path recorded by the loader, empty if absent.
    pub fn source(&self) -> &str {
        self.metadata.get("source").map(String::as_str).unwrap_or("")
    }
}

/// Bounded-length window over a document's content, carrying the parent
/// document's metadata and its position in the run-wide chunk sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub text: String,
    pub position: u64,
    pub metadata: BTreeMap<String, String>,
}

pub fn make_chunk_id(source: &str, position: u64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(position.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Machine-readable outcome of a successful ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub collection: String,
    pub chunk_count: usize,
    pub dimensions: usize,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Display for IngestionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} chunks embedded ({} dimensions) and stored in collection \"{}\" at {}",
            self.chunk_count,
            self.dimensions,
            self.collection,
            self.finished_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_id_is_reproducible() {
        let first = make_chunk_id("/tmp/a.pdf", 3, "some text");
        let second = make_chunk_id("/tmp/a.pdf", 3, "some text");
        assert_eq!(first, second);
    }

    #[test]
    fn chunk_id_changes_with_position() {
        let first = make_chunk_id("/tmp/a.pdf", 0, "some text");
        let second = make_chunk_id("/tmp/a.pdf", 1, "some text");
        assert_ne!(first, second);
    }

    #[test]
    fn summary_renders_collection_and_count() {
        let summary = IngestionSummary {
            collection: "manuals".to_string(),
            chunk_count: 4,
            dimensions: 384,
            finished_at: Utc::now(),
        };
        let rendered = summary.to_string();
        assert!(rendered.contains("4 chunks"));
        assert!(rendered.contains("\"manuals\""));
    }
}
