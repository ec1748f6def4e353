use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::Chunk;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

/// Durable vector index. `recreate_collection` is destructive; `upsert`
/// indexes the whole batch or fails.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn recreate_collection(&self, dimensions: usize) -> Result<(), StoreError>;

    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), StoreError>;
}

/// Qdrant REST client. Every request carries the configured api-key header.
pub struct QdrantStore {
    endpoint: String,
    collection: String,
    api_key: String,
    client: Client,
}

impl QdrantStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            endpoint: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.endpoint, self.collection, suffix)
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn recreate_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        let delete = self
            .client
            .delete(self.collection_url(""))
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(StoreError::network)?;

        // A missing collection is fine on the first run.
        if !delete.status().is_success() && delete.status() != reqwest::StatusCode::NOT_FOUND {
            let status = delete.status();
            let body = delete.text().await.unwrap_or_default();
            return Err(StoreError::from_status(status, body));
        }

        let create = self
            .client
            .put(self.collection_url(""))
            .header("api-key", &self.api_key)
            .json(&json!({
                "vectors": {
                    "size": dimensions,
                    "distance": "Cosine",
                }
            }))
            .send()
            .await
            .map_err(StoreError::network)?;

        if !create.status().is_success() {
            let status = create.status();
            let body = create.text().await.unwrap_or_default();
            return Err(StoreError::from_status(status, body));
        }

        Ok(())
    }

    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<(), StoreError> {
        if chunks.len() != embeddings.len() {
            return Err(StoreError::rejected(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }

        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                json!({
                    "id": Uuid::new_v4().to_string(),
                    "vector": embedding,
                    "payload": {
                        "chunk_id": chunk.chunk_id,
                        "text": chunk.text,
                        "position": chunk.position,
                        "metadata": chunk.metadata,
                    },
                })
            })
            .collect::<Vec<_>>();

        let response = self
            .client
            .put(self.collection_url("/points?wait=true"))
            .header("api-key", &self.api_key)
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(StoreError::network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::from_status(status, body));
        }

        Ok(())
    }
}
