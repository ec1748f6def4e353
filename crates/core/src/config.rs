use crate::error::IngestError;
use serde::{Deserialize, Serialize};
use url::Url;

pub const STORE_URL_VAR: &str = "STORE_URL";
pub const STORE_API_KEY_VAR: &str = "STORE_API_KEY";
pub const COLLECTION_NAME_VAR: &str = "COLLECTION_NAME";

/// Connection settings for the vector store, validated at construction.
/// Read once, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub collection: String,
    /// Drop and re-create the collection before upserting. Destructive:
    /// prior contents of the collection are discarded.
    pub recreate: bool,
}

impl StoreConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, IngestError> {
        let url = require_value(url.into(), "store url")?;
        let api_key = require_value(api_key.into(), "store api key")?;
        let collection = require_value(collection.into(), "collection name")?;

        Url::parse(&url)
            .map_err(|error| IngestError::Configuration(format!("invalid store url: {error}")))?;

        Ok(Self {
            url,
            api_key,
            collection,
            recreate: true,
        })
    }

    /// Read `STORE_URL`, `STORE_API_KEY` and `COLLECTION_NAME`. Any missing
    /// or blank variable fails before a single byte of I/O happens.
    pub fn from_env() -> Result<Self, IngestError> {
        Self::new(
            require_env(STORE_URL_VAR)?,
            require_env(STORE_API_KEY_VAR)?,
            require_env(COLLECTION_NAME_VAR)?,
        )
    }

    pub fn with_recreate(mut self, recreate: bool) -> Self {
        self.recreate = recreate;
        self
    }
}

/// Settings forwarded to the embedding provider. Fixed for the lifetime of
/// one pipeline, so every vector in a run shares one dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    pub model_name: String,
    pub device: String,
    /// Scale each embedding to unit length. Changes downstream
    /// similarity-score semantics, so it is part of the config, not a
    /// per-call knob.
    pub normalize: bool,
    pub dimensions: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_name: "BAAI/bge-small-en".to_string(),
            device: "cpu".to_string(),
            normalize: true,
            dimensions: 384,
        }
    }
}

fn require_value(value: String, label: &str) -> Result<String, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestError::Configuration(format!("{label} is not set")));
    }
    Ok(trimmed.to_string())
}

fn require_env(name: &str) -> Result<String, IngestError> {
    std::env::var(name)
        .map_err(|_| IngestError::Configuration(format!("environment variable {name} is not set")))
}
