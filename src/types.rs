use serde::{Deserialize, Serialize};

/// Metadata attached to every stored function document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Declared name of the function
    pub func_name: String,
    /// Full source text of the function definition
    pub func_text: String,
    /// Path of the file the function was found in, as walked
    pub file_path: String,
}

/// One indexed function, as written to the vector collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Deterministic identifier derived from file path and function name
    pub id: String,
    /// Natural-language explanation; this is the text that gets embedded
    pub explanation: String,
    pub metadata: FunctionMetadata,
}

/// A single ranked hit returned by a collection query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// The stored explanation
    pub document: String,
    pub metadata: FunctionMetadata,
    /// Raw vector distance reported by the store (lower is closer)
    pub distance: f32,
    /// Similarity derived from the distance, in (0.0, 1.0]
    pub score: f32,
}

/// Outcome of one indexing pass over a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Number of matching files visited
    pub files_visited: usize,
    /// Number of functions explained and stored
    pub functions_indexed: usize,
    /// Time taken in milliseconds
    pub duration_ms: u64,
}

/// Number of records currently held by a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection: String,
    pub total_records: usize,
}
