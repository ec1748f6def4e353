use crate::config::EmbedderConfig;
use crate::error::EmbeddingError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Maps chunk text to fixed-dimension vectors. The dimension must stay
/// constant for the lifetime of the provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch in order. The default delegates to `embed` one text at
    /// a time; remote providers override it with a single request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for Box<dyn EmbeddingProvider> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts).await
    }
}

#[derive(Debug, Clone, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    device: &'a str,
    normalize: bool,
    inputs: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for a remote embedding service speaking a JSON batch contract.
pub struct HttpEmbedder {
    endpoint: String,
    api_key: Option<String>,
    config: EmbedderConfig,
    client: Client,
}

impl HttpEmbedder {
    pub fn new(endpoint: impl Into<String>, config: EmbedderConfig) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: None,
            config,
            client: Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::BackendResponse {
            details: "backend returned no embedding".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = EmbedRequest {
            model: &self.config.model_name,
            device: &self.config.device,
            normalize: self.config.normalize,
            inputs: texts,
        };

        let mut request = self
            .client
            .post(format!("{}/embed", self.endpoint))
            .json(&payload);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(EmbeddingError::BackendResponse {
                details: format!("embedding request returned {}", response.status()),
            });
        }

        let parsed: EmbedResponse = response.json().await?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::BackendResponse {
                details: format!(
                    "backend returned {} embeddings for {} inputs",
                    parsed.embeddings.len(),
                    texts.len()
                ),
            });
        }

        Ok(parsed.embeddings)
    }
}

/// Deterministic character-trigram provider for offline runs and tests.
/// Trigrams are FNV-hashed into buckets, optionally scaled to unit length.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
    normalize: bool,
}

impl HashEmbedder {
    pub fn new(dimensions: usize, normalize: bool) -> Self {
        Self {
            dimensions: dimensions.max(1),
            normalize,
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        let config = EmbedderConfig::default();
        Self::new(config.dimensions, config.normalize)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return Ok(vector);
        }

        for window in chars.windows(3) {
            let token = window.iter().collect::<String>();
            let mut hash = 1469598103934665603u64;
            for byte in token.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(1099511628211);
            }
            let bucket = (hash % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        if self.normalize {
            let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
            if magnitude > 0.0 {
                for value in &mut vector {
                    *value /= magnitude;
                }
            }
        }

        Ok(vector)
    }
}
