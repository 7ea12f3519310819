//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the normalized document model directly. Argument maps keep
//! document order.

use crate::model::NormalizedDoc;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &NormalizedDoc) -> Result<String> {
        let mut out = serde_json::to_string_pretty(doc).context("failed to serialize document")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
