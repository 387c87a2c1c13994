//! Library client that drives the whole pipeline
//!
//! `FuncSearchClient` owns the explainer and the vector collection and
//! exposes indexing and search as plain async methods. The binary is a thin
//! wrapper around it.

use crate::config::Config;
use crate::embedding::{EmbeddingProvider, FastEmbedManager};
use crate::error::ExplainError;
use crate::explainer::{Explainer, OpenAiExplainer};
use crate::indexer::{FileWalker, FunctionExtractor, FunctionIndexer};
use crate::types::{CollectionStats, IndexSummary, SearchHit};
use crate::vector_db::{LanceCollection, VectorCollection};

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main client for indexing a codebase and searching it
///
/// # Example
///
/// ```no_run
/// use funcsearch::FuncSearchClient;
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = FuncSearchClient::new().await?;
///
///     let summary = client.index_project(Path::new("temp/pyGameMath"), "py", false).await?;
///     println!("Indexed {} functions", summary.functions_indexed);
///
///     for hit in client.query("rotate a vector", 5).await? {
///         println!("{} ({})", hit.metadata.func_name, hit.metadata.file_path);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct FuncSearchClient {
    pub(crate) config: Arc<Config>,
    // None for clients opened only to search
    pub(crate) explainer: Option<Arc<dyn Explainer>>,
    pub(crate) collection: Arc<dyn VectorCollection>,
}

impl FuncSearchClient {
    /// Create a client from the default config file (if any) plus environment overrides
    pub async fn new() -> Result<Self> {
        let config = Config::load(None)?;
        Self::with_config(config).await
    }

    /// Create a client from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - No API key is configured for the explainer
    /// - The embedding model cannot be initialized
    /// - The vector database cannot be opened
    pub async fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        // Fail on a missing API key before downloading any model
        let explainer = OpenAiExplainer::new(&config.explainer)
            .context("Failed to initialize explainer")?;
        tracing::info!("Explainer model: {}", explainer.model_name());

        let collection =
            Self::open_collection(&config, config.vector_db.reset_on_index).await?;
        Ok(Self::with_components(
            config,
            Arc::new(explainer),
            Arc::new(collection),
        ))
    }

    /// Create a client that can query and count but not index.
    ///
    /// No API key is needed; `index_project` fails with `MissingApiKey`.
    pub async fn search_only(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let collection = Self::open_collection(&config, false).await?;
        Ok(Self {
            config: Arc::new(config),
            explainer: None,
            collection: Arc::new(collection),
        })
    }

    /// Open the configured collection. With `recreate` an existing collection
    /// is dropped first, which also clears a vector-width mismatch.
    async fn open_collection(config: &Config, recreate: bool) -> Result<LanceCollection> {
        let embedder = FastEmbedManager::from_model_name(&config.embedding.model_name)?;
        tracing::info!(
            "Embedding model: {} ({} dimensions)",
            embedder.model_name(),
            embedder.dimension()
        );

        let db_path = config.vector_db.lancedb_path.to_string_lossy().to_string();
        let collection = &config.vector_db.collection_name;
        if recreate {
            LanceCollection::recreate(&db_path, collection, Arc::new(embedder)).await
        } else {
            LanceCollection::open(&db_path, collection, Arc::new(embedder)).await
        }
    }

    /// Assemble a client from already-built parts
    pub fn with_components(
        config: Config,
        explainer: Arc<dyn Explainer>,
        collection: Arc<dyn VectorCollection>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            explainer: Some(explainer),
            collection,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collection(&self) -> &Arc<dyn VectorCollection> {
        &self.collection
    }

    /// Index every top-level function in files under `path` with the given extension.
    ///
    /// Files and functions are processed one at a time. The first failure
    /// aborts the run; records stored before it remain in the collection.
    pub async fn index_project(
        &self,
        path: &Path,
        extension: &str,
        reset: bool,
    ) -> Result<IndexSummary> {
        let start = Instant::now();
        let explainer = self.explainer.clone().ok_or(ExplainError::MissingApiKey)?;

        let walker = FileWalker::new(path, extension);
        let files = walker.walk()?;
        let mut extractor = FunctionExtractor::for_extension(walker.extension())?;

        if reset {
            self.collection
                .reset()
                .await
                .context("Failed to reset collection")?;
        }

        tracing::info!(
            "Indexing {} files under {} into '{}'",
            extractor.language(),
            path.display(),
            self.collection.name()
        );

        let indexer = FunctionIndexer::new(
            explainer,
            self.collection.clone(),
            extractor.language(),
        );
        let mut summary = IndexSummary::default();

        for file in files {
            let file = file?;
            let file_path = file.to_string_lossy().to_string();
            summary.files_visited += 1;

            let functions = extractor.extract_file(&file)?;
            tracing::info!("{}: {} top-level functions", file_path, functions.len());

            for function in functions {
                tracing::debug!(
                    "Explaining {} (lines {}-{})",
                    function.name,
                    function.start_line,
                    function.end_line
                );
                indexer
                    .index_function(&function.name, &function.text, &file_path)
                    .await?;
                summary.functions_indexed += 1;
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed {} functions from {} files in {} ms",
            summary.functions_indexed,
            summary.files_visited,
            summary.duration_ms
        );
        Ok(summary)
    }

    /// Return the `limit` stored functions whose explanations are closest to `text`
    pub async fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!("Querying '{}' for top {}", text, limit);

        let mut results = self
            .collection
            .query(vec![text.to_string()], limit)
            .await
            .context("Failed to query collection")?;

        Ok(results.pop().unwrap_or_default())
    }

    /// Index the configured project, then issue the configured query
    pub async fn run(&self) -> Result<(IndexSummary, Vec<SearchHit>)> {
        let summary = self
            .index_project(
                &self.config.indexing.project_path,
                &self.config.indexing.extension,
                self.config.vector_db.reset_on_index,
            )
            .await?;

        let hits = self
            .query(&self.config.search.query, self.config.search.limit)
            .await?;
        Ok((summary, hits))
    }

    pub async fn stats(&self) -> Result<CollectionStats> {
        Ok(CollectionStats {
            collection: self.collection.name().to_string(),
            total_records: self.collection.count().await?,
        })
    }
}
