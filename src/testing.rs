//! Offline stand-ins for the embedding model and the language model

use crate::embedding::EmbeddingProvider;
use crate::error::ExplainError;
use crate::explainer::Explainer;
use crate::indexer::SourceLanguage;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bag-of-words embedder: each lowercase token is hashed into a bucket,
/// then the vector is L2-normalized. Texts sharing words land close together.
pub(crate) struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub(crate) fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            // FNV-1a
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in token.to_lowercase().bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % self.dimension as u64) as usize] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        } else {
            vector[0] = 1.0;
        }
        vector
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed_batch(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash-embedder"
    }
}

/// Explainer that echoes the function text back with a fixed prefix and
/// records every call
pub(crate) struct CannedExplainer {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    seen: Mutex<Vec<String>>,
    languages: Mutex<Vec<SourceLanguage>>,
}

impl CannedExplainer {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on_call: None,
            seen: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        }
    }

    /// Fail the `n`th call (1-based) with a 500 status
    pub(crate) fn failing_on(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub(crate) fn languages(&self) -> Vec<SourceLanguage> {
        self.languages.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Explainer for CannedExplainer {
    async fn explain(
        &self,
        func_text: &str,
        language: SourceLanguage,
    ) -> Result<String, ExplainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(ExplainError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(func_text.to_string());
        }
        if let Ok(mut languages) = self.languages.lock() {
            languages.push(language);
        }
        Ok(format!("This function does: {}", func_text))
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}
