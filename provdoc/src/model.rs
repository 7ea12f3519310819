//! Data model for normalized provider documentation: format-agnostic.

use indexmap::IndexMap;
use serde::Serialize;

/// Argument name → docs, in the order names were first seen.
pub type Arguments = IndexMap<String, ArgumentDocs>;

/// Documentation recovered from one argument bullet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArgumentDocs {
    pub description: String,
    /// Set when the entry was found inside a "`x` supports the following" block.
    pub is_nested: bool,
    /// Fields of the nested block this entry introduces, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<IndexMap<String, String>>,
}

/// Everything the parser extracts from one resource or data source page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityDocs {
    /// Text of the first `# ` heading, without a `Resource:` style label.
    pub title: Option<String>,
    /// Preamble body below the title.
    pub description: String,
    pub arguments: Arguments,
    pub attributes: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
    /// Verbatim Example Usage section, empty when absent or ambiguous.
    pub examples: String,
}

/// Non-fatal problem met while converting an example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub example: String,
    pub language: String,
    pub message: String,
}

/// Output of the pipeline for a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedDoc {
    pub docs: EntityDocs,
    /// Normalized markdown body.
    pub markdown: String,
    pub diagnostics: Vec<Diagnostic>,
}
