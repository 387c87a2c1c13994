//! LanceDB-backed function collection

use crate::embedding::EmbeddingProvider;
use crate::error::VectorDbError;
use crate::indexer::SourceLanguage;
use crate::types::{FunctionMetadata, SearchHit};
use crate::vector_db::VectorCollection;
use anyhow::{Context, Result};
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator,
    StringArray, types::Float32Type,
};
use arrow_schema::{DataType, Field, Schema};
use futures::stream::TryStreamExt;
use lancedb::Table;
use lancedb::connection::Connection;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::path::Path;
use std::sync::Arc;

/// A vector collection stored as one LanceDB table (embedded, no server required)
pub struct LanceCollection {
    connection: Connection,
    table_name: String,
    db_path: String,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl LanceCollection {
    /// Connect to the database at `db_path` and create the collection if it
    /// does not exist yet.
    ///
    /// Fails if an existing collection was built with a different vector
    /// width than `embedder` produces.
    pub async fn open(
        db_path: &str,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let this = Self::connect(db_path, collection, embedder).await?;
        this.ensure_table().await?;
        Ok(this)
    }

    /// Like [`open`](Self::open), but drops any existing collection first
    pub async fn recreate(
        db_path: &str,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let this = Self::connect(db_path, collection, embedder).await?;
        this.reset().await?;
        Ok(this)
    }

    async fn connect(
        db_path: &str,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        tracing::info!("Connecting to LanceDB at: {}", db_path);

        let connection = lancedb::connect(db_path)
            .execute()
            .await
            .map_err(|e| VectorDbError::InitializationFailed(e.to_string()))
            .context("Failed to connect to LanceDB")?;

        Ok(Self {
            connection,
            table_name: collection.to_string(),
            db_path: db_path.to_string(),
            embedder,
        })
    }

    /// Create schema for the function table
    fn create_schema(dimension: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    dimension as i32,
                ),
                false,
            ),
            Field::new("id", DataType::Utf8, false),
            Field::new("document", DataType::Utf8, false),
            Field::new("func_name", DataType::Utf8, false),
            Field::new("func_text", DataType::Utf8, false),
            Field::new("file_path", DataType::Utf8, false),
            Field::new("language", DataType::Utf8, false),
            Field::new("indexed_at", DataType::Int64, false),
        ]))
    }

    async fn ensure_table(&self) -> Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .context("Failed to list tables")?;

        if table_names.contains(&self.table_name) {
            tracing::debug!("Collection '{}' already exists", self.table_name);
            return self.check_dimension().await;
        }

        let schema = Self::create_schema(self.embedder.dimension());
        let empty_batch = RecordBatch::new_empty(schema.clone());
        let batches = RecordBatchIterator::new(vec![empty_batch].into_iter().map(Ok), schema);

        self.connection
            .create_table(&self.table_name, Box::new(batches))
            .execute()
            .await
            .map_err(|e| VectorDbError::InitializationFailed(e.to_string()))
            .with_context(|| format!("Failed to create collection '{}'", self.table_name))?;

        tracing::info!(
            "Created collection '{}' in {}",
            self.table_name,
            self.db_path
        );
        Ok(())
    }

    /// The stored vector width must match the embedder's
    async fn check_dimension(&self) -> Result<()> {
        let schema = self
            .get_table()
            .await?
            .schema()
            .await
            .context("Failed to read collection schema")?;

        let stored = match schema.field_with_name("vector").map(|f| f.data_type()) {
            Ok(DataType::FixedSizeList(_, width)) => *width as usize,
            _ => {
                return Err(VectorDbError::InitializationFailed(format!(
                    "collection '{}' has no fixed-size vector column; re-index with --reset to rebuild it",
                    self.table_name
                ))
                .into());
            }
        };

        let expected = self.embedder.dimension();
        if stored != expected {
            return Err(VectorDbError::InitializationFailed(format!(
                "collection '{}' stores {}-dimensional vectors but embedding model '{}' produces {}; \
                 re-index with --reset (or set vector_db.reset_on_index) to rebuild it",
                self.table_name,
                stored,
                self.embedder.model_name(),
                expected
            ))
            .into());
        }
        Ok(())
    }

    async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .with_context(|| format!("Failed to open collection '{}'", self.table_name))
    }

    /// Convert embeddings, documents and metadata to a RecordBatch
    fn create_record_batch(
        embeddings: Vec<Vec<f32>>,
        documents: &[String],
        metadatas: &[FunctionMetadata],
        ids: &[String],
        indexed_at: i64,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let dimension = embeddings[0].len();

        let vector_array = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            embeddings
                .into_iter()
                .map(|v| Some(v.into_iter().map(Some))),
            dimension as i32,
        );

        let column = |values: Vec<&str>| Arc::new(StringArray::from(values));

        let languages: Vec<&str> = metadatas
            .iter()
            .map(|m| {
                Path::new(&m.file_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(SourceLanguage::from_extension)
                    .map(|l| l.name())
                    .unwrap_or("Unknown")
            })
            .collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(vector_array),
                column(ids.iter().map(String::as_str).collect()),
                column(documents.iter().map(String::as_str).collect()),
                column(metadatas.iter().map(|m| m.func_name.as_str()).collect()),
                column(metadatas.iter().map(|m| m.func_text.as_str()).collect()),
                column(metadatas.iter().map(|m| m.file_path.as_str()).collect()),
                column(languages),
                Arc::new(Int64Array::from(vec![indexed_at; ids.len()])),
            ],
        )
        .context("Failed to create RecordBatch")
    }

    /// Turn one result batch into hits
    fn hits_from_batch(batch: &RecordBatch, hits: &mut Vec<SearchHit>) -> Result<()> {
        let ids = string_column(batch, "id")?;
        let documents = string_column(batch, "document")?;
        let func_names = string_column(batch, "func_name")?;
        let func_texts = string_column(batch, "func_text")?;
        let file_paths = string_column(batch, "file_path")?;
        let distances = batch
            .column_by_name("_distance")
            .context("Missing _distance column")?
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("Invalid _distance type")?;

        for i in 0..batch.num_rows() {
            let distance = if distances.is_null(i) {
                f32::MAX
            } else {
                distances.value(i)
            };
            hits.push(SearchHit {
                id: ids.value(i).to_string(),
                document: documents.value(i).to_string(),
                metadata: FunctionMetadata {
                    func_name: func_names.value(i).to_string(),
                    func_text: func_texts.value(i).to_string(),
                    file_path: file_paths.value(i).to_string(),
                },
                distance,
                score: 1.0 / (1.0 + distance),
            });
        }
        Ok(())
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Missing {} column", name))?
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("Invalid {} type", name))
}

#[async_trait::async_trait]
impl VectorCollection for LanceCollection {
    fn name(&self) -> &str {
        &self.table_name
    }

    async fn add(
        &self,
        documents: Vec<String>,
        metadatas: Vec<FunctionMetadata>,
        ids: Vec<String>,
    ) -> Result<usize> {
        if documents.len() != metadatas.len() || documents.len() != ids.len() {
            return Err(VectorDbError::LengthMismatch {
                documents: documents.len(),
                metadatas: metadatas.len(),
                ids: ids.len(),
            }
            .into());
        }
        if documents.is_empty() {
            return Ok(0);
        }

        let embeddings = self
            .embedder
            .embed_batch(documents.clone())
            .context("Failed to embed documents")?;
        if embeddings.len() != documents.len() {
            return Err(VectorDbError::StoreFailed(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            ))
            .into());
        }

        let schema = Self::create_schema(self.embedder.dimension());
        let batch = Self::create_record_batch(
            embeddings,
            &documents,
            &metadatas,
            &ids,
            chrono::Utc::now().timestamp(),
            schema.clone(),
        )?;
        let count = batch.num_rows();

        let table = self.get_table().await?;
        let batches = RecordBatchIterator::new(vec![batch].into_iter().map(Ok), schema);
        table
            .add(Box::new(batches))
            .execute()
            .await
            .map_err(|e| VectorDbError::StoreFailed(e.to_string()))
            .context("Failed to add records to collection")?;

        tracing::debug!("Stored {} records in '{}'", count, self.table_name);
        Ok(count)
    }

    async fn query(&self, query_texts: Vec<String>, n_results: usize) -> Result<Vec<Vec<SearchHit>>> {
        if query_texts.is_empty() {
            return Ok(vec![]);
        }

        let table = self.get_table().await?;
        let total = table
            .count_rows(None)
            .await
            .context("Failed to count rows")?;
        if total == 0 || n_results == 0 {
            tracing::debug!(
                "Collection '{}' has {} rows; returning empty results",
                self.table_name,
                total
            );
            return Ok(vec![Vec::new(); query_texts.len()]);
        }

        let query_vectors = self
            .embedder
            .embed_batch(query_texts.clone())
            .context("Failed to embed query")?;

        let mut all_hits = Vec::with_capacity(query_vectors.len());
        for query_vector in query_vectors {
            let stream = table
                .vector_search(query_vector)
                .context("Failed to create vector search")?
                .limit(n_results)
                .execute()
                .await
                .map_err(|e| VectorDbError::QueryFailed(e.to_string()))
                .context("Failed to execute search")?;

            let batches: Vec<RecordBatch> = stream
                .try_collect()
                .await
                .context("Failed to collect search results")?;

            let mut hits = Vec::new();
            for batch in &batches {
                Self::hits_from_batch(batch, &mut hits)?;
            }
            hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            hits.truncate(n_results);
            all_hits.push(hits);
        }

        Ok(all_hits)
    }

    async fn count(&self) -> Result<usize> {
        let table = self.get_table().await?;
        table
            .count_rows(None)
            .await
            .context("Failed to count rows")
    }

    async fn reset(&self) -> Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .context("Failed to list tables")?;
        if table_names.contains(&self.table_name) {
            self.connection
                .drop_table(&self.table_name, &[])
                .await
                .with_context(|| format!("Failed to drop collection '{}'", self.table_name))?;
        }
        self.ensure_table().await?;

        tracing::info!("Reset collection '{}'", self.table_name);
        Ok(())
    }
}
