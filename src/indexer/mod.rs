//! File walking, function extraction and per-function indexing
//!
//! Walks a project for files with one extension, parses each file with
//! tree-sitter to find its top-level functions, and stores an explained
//! record for each of them.

mod file_walker;
mod function_extractor;
mod function_indexer;
mod language;

pub use file_walker::{FileWalker, MatchingFiles};
pub use function_extractor::{ExtractedFunction, FunctionExtractor};
pub use function_indexer::{FunctionIndexer, function_id};
pub use language::SourceLanguage;
