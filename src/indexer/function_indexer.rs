use super::SourceLanguage;
use crate::explainer::Explainer;
use crate::types::{FunctionMetadata, FunctionRecord};
use crate::vector_db::VectorCollection;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Stable storage identifier for a function: hex SHA-256 of the file path
/// and the function name joined by a NUL byte
pub fn function_id(file_path: &str, func_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update([0u8]);
    hasher.update(func_name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Explains one function and writes it to a collection
pub struct FunctionIndexer {
    explainer: Arc<dyn Explainer>,
    collection: Arc<dyn VectorCollection>,
    // Language of the functions handed to `index_function`
    language: SourceLanguage,
}

impl FunctionIndexer {
    pub fn new(
        explainer: Arc<dyn Explainer>,
        collection: Arc<dyn VectorCollection>,
        language: SourceLanguage,
    ) -> Self {
        Self {
            explainer,
            collection,
            language,
        }
    }

    /// Explain `func_text` and store it with its metadata.
    ///
    /// No duplicate check is made; indexing the same function twice adds it twice.
    pub async fn index_function(
        &self,
        func_name: &str,
        func_text: &str,
        file_path: &str,
    ) -> Result<FunctionRecord> {
        let explanation = self
            .explainer
            .explain(func_text, self.language)
            .await
            .with_context(|| format!("Failed to explain '{}' in {}", func_name, file_path))?;

        let record = FunctionRecord {
            id: function_id(file_path, func_name),
            explanation,
            metadata: FunctionMetadata {
                func_name: func_name.to_string(),
                func_text: func_text.to_string(),
                file_path: file_path.to_string(),
            },
        };

        self.collection
            .add(
                vec![record.explanation.clone()],
                vec![record.metadata.clone()],
                vec![record.id.clone()],
            )
            .await
            .with_context(|| format!("Failed to store '{}' from {}", func_name, file_path))?;

        tracing::debug!("Indexed {}::{} as {}", file_path, func_name, record.id);
        Ok(record)
    }
}
