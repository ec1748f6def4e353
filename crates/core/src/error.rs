use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from embedding backend: {details}")]
    BackendResponse { details: String },

    #[error("embedding dimension {actual} does not match configured {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Failure class reported by the vector store layer. The REST surface only
/// exposes status codes, so authentication is inferred from 401/403 and
/// any other non-success status becomes a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Auth,
    Network,
    Rejected,
}

impl std::fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreErrorKind::Auth => write!(f, "authentication"),
            StoreErrorKind::Network => write!(f, "network"),
            StoreErrorKind::Rejected => write!(f, "rejection"),
        }
    }
}

#[derive(Debug, Error)]
#[error("vector store {kind} failure: {details}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub details: String,
    #[source]
    pub cause: Option<reqwest::Error>,
}

impl StoreError {
    pub fn network(cause: reqwest::Error) -> Self {
        Self {
            kind: StoreErrorKind::Network,
            details: cause.to_string(),
            cause: Some(cause),
        }
    }

    pub fn rejected(details: impl Into<String>) -> Self {
        Self {
            kind: StoreErrorKind::Rejected,
            details: details.into(),
            cause: None,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, details: impl Into<String>) -> Self {
        let kind = match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                StoreErrorKind::Auth
            }
            _ => StoreErrorKind::Rejected,
        };
        Self {
            kind,
            details: format!("{}: {}", status, details.into()),
            cause: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source file not found or not readable: {path}")]
    SourceNotFound { path: String },

    #[error("no documents were loaded from {path}")]
    EmptySource { path: String },

    #[error("documents from {path} produced no text chunks")]
    EmptyContent { path: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: LoadError,
    },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
