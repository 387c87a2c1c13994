use super::language::SourceLanguage;
use crate::error::ExtractionError;
use std::path::Path;
use tree_sitter::{Node, Parser, Point};

/// A top-level function pulled out of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFunction {
    /// Declared function name
    pub name: String,
    /// Full source text of the definition, including decorators or `export`
    pub text: String,
    /// 1-based first line of the definition
    pub start_line: usize,
    /// 1-based last line of the definition
    pub end_line: usize,
}

/// Extracts root-level function definitions using tree-sitter.
///
/// Only direct children of the syntax tree root are considered, so nested
/// functions, closures and methods inside classes or impl blocks are never
/// returned.
pub struct FunctionExtractor {
    parser: Parser,
    language: SourceLanguage,
}

impl FunctionExtractor {
    pub fn new(language: SourceLanguage) -> Result<Self, ExtractionError> {
        let mut parser = Parser::new();
        parser.set_language(&language.grammar()).map_err(|e| {
            ExtractionError::UnsupportedLanguage(format!("{}: {}", language, e))
        })?;

        Ok(Self { parser, language })
    }

    /// Create an extractor for the language matching a file extension
    pub fn for_extension(extension: &str) -> Result<Self, ExtractionError> {
        let extension = extension.trim_start_matches('.');
        let language = SourceLanguage::from_extension(extension)
            .ok_or_else(|| ExtractionError::UnsupportedLanguage(extension.to_string()))?;
        Self::new(language)
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Read a file and extract its top-level functions in source order
    pub fn extract_file(&mut self, path: &Path) -> Result<Vec<ExtractedFunction>, ExtractionError> {
        let file = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::FileReadFailed {
            file: file.clone(),
            reason: e.to_string(),
        })?;
        let source = String::from_utf8(bytes).map_err(|_| ExtractionError::InvalidUtf8(file.clone()))?;

        self.extract_source(&source, &file)
    }

    /// Extract top-level functions from in-memory source. `file` is only used
    /// in errors and log messages.
    pub fn extract_source(
        &mut self,
        source: &str,
        file: &str,
    ) -> Result<Vec<ExtractedFunction>, ExtractionError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ExtractionError::ParseFailed {
                file: file.to_string(),
                reason: "parser produced no syntax tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error()
            && let Some(point) = first_error_position(root)
        {
            tracing::warn!(
                "Syntax error in {} at line {}, column {}; extracting what parsed",
                file,
                point.row + 1,
                point.column + 1
            );
        }

        let bytes = source.as_bytes();
        let mut functions = Vec::new();
        let mut cursor = root.walk();

        for node in root.named_children(&mut cursor) {
            let Some(definition) = self.top_level_definition(node) else {
                continue;
            };

            let Some(name) = self.language.function_name(definition, bytes) else {
                tracing::debug!(
                    "Skipping unnamed {} at {}:{}",
                    definition.kind(),
                    file,
                    node.start_position().row + 1
                );
                continue;
            };

            functions.push(ExtractedFunction {
                name: name.to_string(),
                text: source[node.byte_range()].to_string(),
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
            });
        }

        tracing::debug!("Extracted {} functions from {}", functions.len(), file);
        Ok(functions)
    }

    /// The function definition represented by a root child, unwrapping
    /// decorators and exports
    fn top_level_definition<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let kinds = self.language.function_kinds();
        if kinds.contains(&node.kind()) {
            return Some(node);
        }

        self.language
            .wrapper_kinds()
            .iter()
            .find(|(kind, _)| *kind == node.kind())
            .and_then(|(_, field)| node.child_by_field_name(*field))
            .filter(|inner| kinds.contains(&inner.kind()))
    }
}

fn first_error_position(node: Node) -> Option<Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error()
            && let Some(point) = first_error_position(child)
        {
            return Some(point);
        }
    }
    None
}
