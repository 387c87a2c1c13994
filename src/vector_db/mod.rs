// LanceDB is the embedded backend; no server required
pub mod lance_client;
pub use lance_client::LanceCollection;

use crate::types::{FunctionMetadata, SearchHit};
use anyhow::Result;

/// A named collection of embedded documents with attached function metadata.
///
/// Embedding happens inside the collection, so callers deal in text only.
#[async_trait::async_trait]
pub trait VectorCollection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Embed `documents` and store them with their metadata under `ids`.
    /// The three vectors must have equal length. Existing ids are not checked.
    async fn add(
        &self,
        documents: Vec<String>,
        metadatas: Vec<FunctionMetadata>,
        ids: Vec<String>,
    ) -> Result<usize>;

    /// Nearest-neighbour lookup. Returns one list per query text, each
    /// holding at most `n_results` hits ordered from closest to farthest.
    async fn query(&self, query_texts: Vec<String>, n_results: usize) -> Result<Vec<Vec<SearchHit>>>;

    /// Number of stored records
    async fn count(&self) -> Result<usize>;

    /// Drop every record, leaving an empty collection behind
    async fn reset(&self) -> Result<()>;
}
