use super::EmbeddingProvider;
use crate::error::EmbeddingError;
use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;

/// FastEmbed-based embedding provider, all-MiniLM-L6-v2 by default
pub struct FastEmbedManager {
    // `TextEmbedding::embed` needs `&mut self`
    model: Mutex<TextEmbedding>,
    dimension: usize,
    model_name: &'static str,
}

/// Map a configured model name onto a fastembed model, its dimension and canonical name
pub(crate) fn resolve_model(
    name: &str,
) -> Result<(EmbeddingModel, usize, &'static str), EmbeddingError> {
    let resolved = match name.trim().to_lowercase().as_str() {
        "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
            (EmbeddingModel::AllMiniLML6V2, 384, "all-MiniLM-L6-v2")
        }
        "all-minilm-l12-v2" | "sentence-transformers/all-minilm-l12-v2" => {
            (EmbeddingModel::AllMiniLML12V2, 384, "all-MiniLM-L12-v2")
        }
        "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => {
            (EmbeddingModel::BGESmallENV15, 384, "BAAI/bge-small-en-v1.5")
        }
        "bge-base-en-v1.5" | "baai/bge-base-en-v1.5" => {
            (EmbeddingModel::BGEBaseENV15, 768, "BAAI/bge-base-en-v1.5")
        }
        _ => return Err(EmbeddingError::UnknownModel(name.to_string())),
    };
    Ok(resolved)
}

impl FastEmbedManager {
    /// Create a new FastEmbedManager with the default model (all-MiniLM-L6-v2)
    pub fn new() -> Result<Self> {
        Self::from_model_name("all-MiniLM-L6-v2")
    }

    /// Create a FastEmbedManager from a configured model name
    pub fn from_model_name(name: &str) -> Result<Self> {
        let (model, dimension, model_name) = resolve_model(name)?;
        tracing::info!("Initializing FastEmbed model: {}", model_name);

        let options = InitOptions::new(model).with_show_download_progress(true);
        let embedding_model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitializationFailed(e.to_string()))
            .context("Failed to initialize FastEmbed model")?;

        Ok(Self {
            model: Mutex::new(embedding_model),
            dimension,
            model_name,
        })
    }
}

impl EmbeddingProvider for FastEmbedManager {
    fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!("Generating embeddings for {} texts", texts.len());

        let mut model = self
            .model
            .lock()
            .map_err(|e| EmbeddingError::LockPoisoned(e.to_string()))?;
        let embeddings = model
            .embed(texts, None)
            .map_err(|e| EmbeddingError::GenerationFailed(e.to_string()))?;

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        self.model_name
    }
}
