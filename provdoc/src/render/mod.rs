//! Output formats for a normalized page.
//!
//! Markdown is the page body ready for publication; JSON carries the parsed
//! model and conversion diagnostics for downstream tooling.

pub mod json;
pub mod markdown;
pub mod snippets;

use crate::model::NormalizedDoc;
use anyhow::{anyhow, Result};

/// Turns a [`NormalizedDoc`] into the text of one output file.
pub trait Renderer: Send + Sync {
    fn render(&self, doc: &NormalizedDoc) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Renderer for a `--format` value.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown or json",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("markdown").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
    }

    #[test]
    fn unknown_format() {
        let err = create_renderer("html").err().unwrap();
        assert!(err.to_string().contains("unknown format"));
    }
}
