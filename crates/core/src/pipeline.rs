use crate::config::StoreConfig;
use crate::embedder::EmbeddingProvider;
use crate::error::{EmbeddingError, IngestError};
use crate::loader::DocumentLoader;
use crate::models::IngestionSummary;
use crate::splitter::ChunkSplitter;
use crate::store::VectorStore;
use chrono::Utc;
use std::path::Path;

/// Drives one end-to-end ingestion of a single source file into one vector
/// collection: load, split, embed, upsert, in that order. Collaborators and
/// configuration are fixed at construction.
///
/// Not safe for concurrent invocation against the same collection while
/// `recreate` is enabled; callers serialize ingestion per collection.
pub struct IngestionPipeline<L, E, S>
where
    L: DocumentLoader,
    E: EmbeddingProvider,
    S: VectorStore,
{
    loader: L,
    embedder: E,
    store: S,
    splitter: ChunkSplitter,
    config: StoreConfig,
}

impl<L, E, S> IngestionPipeline<L, E, S>
where
    L: DocumentLoader + Send + Sync,
    E: EmbeddingProvider,
    S: VectorStore,
{
    pub fn new(loader: L, embedder: E, store: S, splitter: ChunkSplitter, config: StoreConfig) -> Self {
        Self {
            loader,
            embedder,
            store,
            splitter,
            config,
        }
    }

    /// Ingest one source file. Every failure is terminal for this call and
    /// nothing is retried; either the full batch reaches the store or the
    /// collection is left untouched by the upsert step.
    pub async fn ingest(&self, source_path: &Path) -> Result<IngestionSummary, IngestError> {
        let path = source_path.to_string_lossy().to_string();

        if !source_path.is_file() {
            return Err(IngestError::SourceNotFound { path });
        }

        let documents = self
            .loader
            .load(source_path)
            .map_err(|source| IngestError::Load {
                path: path.clone(),
                source,
            })?;

        if documents.is_empty() {
            return Err(IngestError::EmptySource { path });
        }

        let chunks = self.splitter.split(&documents);
        if chunks.is_empty() {
            return Err(IngestError::EmptyContent { path });
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IngestError::Embedding(EmbeddingError::BackendResponse {
                details: format!(
                    "provider returned {} vectors for {} chunks",
                    embeddings.len(),
                    chunks.len()
                ),
            }));
        }

        let dimensions = self.embedder.dimensions();
        for embedding in &embeddings {
            if embedding.len() != dimensions {
                return Err(IngestError::Embedding(EmbeddingError::DimensionMismatch {
                    expected: dimensions,
                    actual: embedding.len(),
                }));
            }
        }

        if self.config.recreate {
            self.store.recreate_collection(dimensions).await?;
        }
        self.store.upsert(&chunks, &embeddings).await?;

        Ok(IngestionSummary {
            collection: self.config.collection.clone(),
            chunk_count: chunks.len(),
            dimensions,
            finished_at: Utc::now(),
        })
    }
}
