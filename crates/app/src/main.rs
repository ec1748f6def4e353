use clap::{Parser, Subcommand};
use pdf_ingest_core::{
    ChunkSplitter, EmbedderConfig, EmbeddingProvider, HashEmbedder, HttpEmbedder,
    IngestionPipeline, LopdfLoader, QdrantStore, StoreConfig, DEFAULT_MAX_CHARS,
    DEFAULT_OVERLAP_CHARS,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-ingest", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk a PDF, embed the chunks, and upsert the vectors into the store.
    Ingest {
        /// Path to the source PDF.
        pdf: PathBuf,

        /// Vector store base URL.
        #[arg(long, env = "STORE_URL")]
        store_url: Option<String>,

        /// Vector store API key.
        #[arg(long, env = "STORE_API_KEY", hide_env_values = true)]
        store_api_key: Option<String>,

        /// Target collection name.
        #[arg(long, env = "COLLECTION_NAME")]
        collection: Option<String>,

        /// Remote embedding service URL. Falls back to the built-in
        /// deterministic embedder when absent.
        #[arg(long, env = "EMBEDDING_URL")]
        embedding_url: Option<String>,

        /// Embedding service API key.
        #[arg(long, env = "EMBEDDING_API_KEY", hide_env_values = true)]
        embedding_api_key: Option<String>,

        /// Embedding model identifier.
        #[arg(long, default_value = "BAAI/bge-small-en")]
        model_name: String,

        /// Compute device for the embedding model.
        #[arg(long, default_value = "cpu")]
        device: String,

        /// Embedding vector dimensions.
        #[arg(long, default_value_t = 384)]
        dimensions: usize,

        /// Keep raw embedding magnitudes instead of unit-length vectors.
        #[arg(long, default_value_t = false)]
        no_normalize: bool,

        /// Append to the collection instead of recreating it.
        #[arg(long, default_value_t = false)]
        append: bool,

        /// Maximum characters per chunk.
        #[arg(long, default_value_t = DEFAULT_MAX_CHARS)]
        chunk_size: usize,

        /// Characters shared between consecutive chunks.
        #[arg(long, default_value_t = DEFAULT_OVERLAP_CHARS)]
        chunk_overlap: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ingest {
            pdf,
            store_url,
            store_api_key,
            collection,
            embedding_url,
            embedding_api_key,
            model_name,
            device,
            dimensions,
            no_normalize,
            append,
            chunk_size,
            chunk_overlap,
        } => {
            let store_config = StoreConfig::new(
                store_url.unwrap_or_default(),
                store_api_key.unwrap_or_default(),
                collection.unwrap_or_default(),
            )?
            .with_recreate(!append);

            let embedder_config = EmbedderConfig {
                model_name,
                device,
                normalize: !no_normalize,
                dimensions,
            };

            let splitter = ChunkSplitter::new(chunk_size, chunk_overlap)?;

            let embedder: Box<dyn EmbeddingProvider> = match embedding_url {
                Some(url) => {
                    let mut remote = HttpEmbedder::new(url, embedder_config.clone());
                    if let Some(api_key) = embedding_api_key {
                        remote = remote.with_api_key(api_key);
                    }
                    Box::new(remote)
                }
                None => Box::new(HashEmbedder::new(
                    embedder_config.dimensions,
                    embedder_config.normalize,
                )),
            };

            info!(
                pdf = %pdf.display(),
                collection = %store_config.collection,
                model = %embedder_config.model_name,
                device = %embedder_config.device,
                recreate = store_config.recreate,
                "starting ingestion"
            );

            let store = QdrantStore::new(&store_config);
            let pipeline = IngestionPipeline::new(
                LopdfLoader::default(),
                embedder,
                store,
                splitter,
                store_config,
            );

            let summary = pipeline.ingest(&pdf).await?;

            info!(
                chunk_count = summary.chunk_count,
                dimensions = summary.dimensions,
                "ingestion finished"
            );
            println!("{summary}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pdf_ingest_core::{IngestError, StoreError};

    #[test]
    fn anyhow_conversion_keeps_the_typed_cause_chain() {
        let error = IngestError::Store(StoreError::rejected("collection vanished"));
        let wrapped = anyhow::Error::from(error);

        let chain: Vec<String> = wrapped.chain().map(|cause| cause.to_string()).collect();
        assert!(chain.len() >= 2, "source chain was flattened: {chain:?}");
        assert!(chain
            .iter()
            .any(|cause| cause.contains("collection vanished")));
    }
}
