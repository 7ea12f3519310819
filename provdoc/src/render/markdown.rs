//! Markdown renderer: the normalized page body.

use crate::model::NormalizedDoc;
use crate::render::Renderer;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &NormalizedDoc) -> Result<String> {
        let mut output = doc.markdown.trim_end_matches('\n').to_string();
        output.push('\n');
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_with_single_newline() {
        let doc = NormalizedDoc {
            markdown: "# Title\n\nbody\n\n".to_string(),
            ..Default::default()
        };
        assert_eq!(MarkdownRenderer.render(&doc).unwrap(), "# Title\n\nbody\n");
    }
}
