/// Error types for funcsearch, built on thiserror
///
/// Each pipeline stage has its own enum; `FuncSearchError` wraps them all so the
/// binary can report any failure with one type.
use thiserror::Error;

/// Top-level error for the indexing and search pipeline
#[derive(Error, Debug)]
pub enum FuncSearchError {
    #[error("Indexing error: {0}")]
    Indexing(#[from] IndexingError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Explainer error: {0}")]
    Explain(#[from] ExplainError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while walking the project directory
#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to walk directory: {0}")]
    WalkFailed(String),
}

/// Errors raised while pulling functions out of a single source file
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read file '{file}': {reason}")]
    FileReadFailed { file: String, reason: String },

    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to parse '{file}': {reason}")]
    ParseFailed { file: String, reason: String },
}

/// Errors from the hosted language model
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("No API key configured (set OPENAI_API_KEY or explainer.api_key)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Chat completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid chat completion response: {0}")]
    InvalidResponse(String),

    #[error("Chat completion returned no content")]
    EmptyResponse,
}

/// Errors related to embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to initialize embedding model: {0}")]
    InitializationFailed(String),

    #[error("Failed to generate embeddings: {0}")]
    GenerationFailed(String),

    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),

    #[error("Model lock was poisoned: {0}")]
    LockPoisoned(String),
}

/// Errors related to vector database operations
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Failed to initialize vector database: {0}")]
    InitializationFailed(String),

    #[error("Mismatched add arguments: {documents} documents, {metadatas} metadatas, {ids} ids")]
    LengthMismatch {
        documents: usize,
        metadatas: usize,
        ids: usize,
    },

    #[error("Failed to store records: {0}")]
    StoreFailed(String),

    #[error("Failed to query collection: {0}")]
    QueryFailed(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Recover a typed error of kind `E` from anywhere in an anyhow context chain
fn peel<E>(err: anyhow::Error) -> Result<FuncSearchError, anyhow::Error>
where
    E: Into<FuncSearchError> + std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
{
    err.downcast::<E>().map(Into::into)
}

impl From<anyhow::Error> for FuncSearchError {
    fn from(err: anyhow::Error) -> Self {
        peel::<FuncSearchError>(err)
            .or_else(peel::<IndexingError>)
            .or_else(peel::<ExtractionError>)
            .or_else(peel::<ExplainError>)
            .or_else(peel::<EmbeddingError>)
            .or_else(peel::<VectorDbError>)
            .or_else(peel::<ConfigError>)
            .or_else(peel::<std::io::Error>)
            .unwrap_or_else(|err| FuncSearchError::Other(format!("{:#}", err)))
    }
}

impl FuncSearchError {
    pub fn other(msg: impl Into<String>) -> Self {
        FuncSearchError::Other(msg.into())
    }

    /// Errors caused by bad input or configuration rather than a failing service
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FuncSearchError::Config(_)
                | FuncSearchError::Indexing(IndexingError::DirectoryNotFound(_))
                | FuncSearchError::Indexing(IndexingError::NotADirectory(_))
                | FuncSearchError::Explain(ExplainError::MissingApiKey)
                | FuncSearchError::Extraction(ExtractionError::UnsupportedLanguage(_))
        )
    }

    /// Whether re-running the same operation could plausibly succeed.
    /// Nothing in the pipeline retries; this only informs the exit message.
    pub fn is_retryable(&self) -> bool {
        match self {
            FuncSearchError::Explain(ExplainError::Http(_))
            | FuncSearchError::Explain(ExplainError::Timeout(_))
            | FuncSearchError::Io(_) => true,
            FuncSearchError::Explain(ExplainError::Status { status, .. }) => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}
