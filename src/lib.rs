//! # funcsearch - Semantic Function Search
//!
//! Indexes a codebase one function at a time so it can be searched in plain
//! language. Each top-level function is explained by a chat-completion model,
//! the explanation is embedded locally, and the result is stored in an
//! embedded LanceDB table together with the function's name, source text and
//! file path.
//!
//! ## Pipeline
//!
//! ```text
//! FileWalker ──> FunctionExtractor ──> Explainer ──> FunctionIndexer ──> VectorCollection
//!  (walkdir)       (tree-sitter)      (OpenAI API)    (SHA-256 id)     (FastEmbed + LanceDB)
//! ```
//!
//! Everything runs sequentially: one file, one function, one request at a time.
//!
//! ## Modules
//!
//! - [`client`]: `FuncSearchClient`, which drives indexing and search
//! - [`indexer`]: file walking, function extraction and per-function indexing
//! - [`explainer`]: language-model explanations of function source
//! - [`embedding`]: embedding generation using FastEmbed
//! - [`vector_db`]: the vector collection abstraction and its LanceDB backend
//! - [`config`]: configuration management with environment variable support
//! - [`types`]: records and results passed between components
//! - [`error`]: error types
//! - [`paths`]: platform-specific default locations
//!
//! ## Usage Example
//!
//! ```no_run
//! use funcsearch::{Config, FuncSearchClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::default();
//!     config.apply_env_overrides();
//!
//!     let client = FuncSearchClient::with_config(config).await?;
//!     let (summary, hits) = client.run().await?;
//!
//!     println!("{} functions indexed", summary.functions_indexed);
//!     for hit in hits {
//!         println!("{:.3} {}", hit.score, hit.metadata.func_name);
//!     }
//!     Ok(())
//! }
//! ```

/// High-level client that runs the indexing pipeline and queries
pub mod client;

/// Configuration management with environment variable overrides
pub mod config;

/// Embedding generation using FastEmbed
pub mod embedding;

/// Error types and utilities
pub mod error;

/// Natural-language explanations from a chat-completion API
pub mod explainer;

/// File walking, tree-sitter extraction and per-function indexing
pub mod indexer;

/// Platform-specific default paths
pub mod paths;

/// Function records, search hits and run summaries
pub mod types;

/// Vector collection abstraction backed by LanceDB
pub mod vector_db;

#[cfg(test)]
pub(crate) mod testing;

pub use client::FuncSearchClient;
pub use config::Config;
pub use error::FuncSearchError;
pub use types::{FunctionMetadata, FunctionRecord, IndexSummary, SearchHit};
