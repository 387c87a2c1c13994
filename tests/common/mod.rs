//! Shared helpers for integration tests

#![allow(dead_code)]

use funcsearch::embedding::EmbeddingProvider;
use funcsearch::vector_db::LanceCollection;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{Request, Respond, ResponseTemplate};

/// Bag-of-words embedder so tests run without downloading a model.
/// Same hashing as the crate's unit-test embedder, which integration tests cannot reach.
pub struct HashEmbedder {
    pub dimension: usize,
}

impl EmbeddingProvider for HashEmbedder {
    fn embed_batch(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
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
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash-embedder"
    }
}

/// Chat-completion responder that explains a function by echoing its source
pub struct EchoExplanation;

impl Respond for EchoExplanation {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
        let code = prompt.split_once('\n').map(|(_, code)| code).unwrap_or(prompt);

        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": format!("Explains: {}", code) }
            }]
        }))
    }
}

/// The explanation `EchoExplanation` produces for `func_text`
pub fn echoed(func_text: &str) -> String {
    format!("Explains: {}", func_text)
}

pub async fn open_collection(dir: &TempDir, name: &str) -> LanceCollection {
    let db_path = dir.path().join("lancedb").to_string_lossy().to_string();
    LanceCollection::open(&db_path, name, Arc::new(HashEmbedder { dimension: 64 }))
        .await
        .unwrap()
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
