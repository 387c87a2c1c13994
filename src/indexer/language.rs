//! Source languages the extractor understands, keyed by file extension

use std::fmt;
use tree_sitter::Node;

/// A language with a tree-sitter grammar and a notion of top-level functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    Python,
    Rust,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    C,
    Cpp,
    Ruby,
    Php,
    Swift,
}

impl SourceLanguage {
    /// Detect the language from a file extension (without the dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let language = match extension.to_lowercase().as_str() {
            "py" => Self::Python,
            "rs" => Self::Rust,
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "go" => Self::Go,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Self::Cpp,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "swift" => Self::Swift,
            _ => return None,
        };
        Some(language)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TypeScript (TSX)",
            Self::Go => "Go",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Ruby => "Ruby",
            Self::Php => "PHP",
            Self::Swift => "Swift",
        }
    }

    /// Lowercase name used in the explanation prompt
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Rust => "rust",
            Self::JavaScript => "javascript",
            Self::TypeScript | Self::Tsx => "typescript",
            Self::Go => "go",
            Self::C => "c",
            Self::Cpp => "c++",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
        }
    }

    pub(crate) fn grammar(&self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::C => tree_sitter_c::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Self::Swift => tree_sitter_swift::LANGUAGE.into(),
        }
    }

    /// Node kinds that define a free function when they appear at the root
    pub(crate) fn function_kinds(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["function_definition"],
            Self::Rust => &["function_item"],
            Self::JavaScript | Self::TypeScript | Self::Tsx => {
                &["function_declaration", "generator_function_declaration"]
            }
            Self::Go => &["function_declaration"],
            Self::C | Self::Cpp | Self::Php => &["function_definition"],
            Self::Ruby => &["method"],
            Self::Swift => &["function_declaration"],
        }
    }

    /// Root-level wrapper nodes and the field holding the wrapped definition
    pub(crate) fn wrapper_kinds(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Python => &[("decorated_definition", "definition")],
            Self::JavaScript | Self::TypeScript | Self::Tsx => {
                &[("export_statement", "declaration")]
            }
            _ => &[],
        }
    }

    /// Declared name of a function definition node
    pub(crate) fn function_name<'s>(
        &self,
        definition: Node<'_>,
        source: &'s [u8],
    ) -> Option<&'s str> {
        let name_node = match self {
            // C declarators nest: `int *(*f)(void)` is pointer → function → identifier
            Self::C | Self::Cpp => {
                let mut node = definition.child_by_field_name("declarator")?;
                loop {
                    match node.kind() {
                        "identifier" | "field_identifier" | "qualified_identifier"
                        | "operator_name" | "destructor_name" => break node,
                        _ => node = node.child_by_field_name("declarator")?,
                    }
                }
            }
            _ => definition.child_by_field_name("name")?,
        };
        name_node.utf8_text(source).ok()
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
