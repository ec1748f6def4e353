pub mod config;
pub mod embedder;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod splitter;
pub mod store;

pub use config::{EmbedderConfig, StoreConfig};
pub use embedder::{EmbeddingProvider, HashEmbedder, HttpEmbedder};
pub use error::{EmbeddingError, IngestError, LoadError, StoreError, StoreErrorKind};
pub use loader::{DocumentLoader, LopdfLoader};
pub use models::{Chunk, Document, IngestionSummary};
pub use pipeline::IngestionPipeline;
pub use splitter::{ChunkSplitter, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP_CHARS};
pub use store::{QdrantStore, VectorStore};
