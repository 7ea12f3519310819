//! End-to-end normalization of one documentation page.
//!
//! 1. **Links**: resolve footer links, drop their definitions, rewrite relative links
//! 2. **Split**: group lines by `## ` heading
//! 3. **Examples**: repair example title depth, collapse Example Usage groups
//! 4. **Convert** (optional): replace source-language examples with multi-language snippets
//! 5. **Parse**: build the documentation model from the normalized body

use crate::config::Config;
use crate::convert::{convert_example, Converter};
use crate::error::ConfigError;
use crate::model::{Diagnostic, NormalizedDoc};
use crate::naming::format_entity_name;
use crate::parser::examples::{fix_example_titles, is_code_fence, is_example_group, reformat_examples};
use crate::parser::footer::{
    extract_footer_links, resolve_footer_links, rewrite_links, strip_footer_definitions,
};
use crate::parser::sections::{join_groups, split_group_lines};
use crate::parser::{parse_document, strip_front_matter, SECTION_MARKER};
use crate::render::snippets::assemble_snippets;

/// A validated pipeline. Holds no per-document state and can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize `markdown`, the page of entity `name`.
    ///
    /// Without a converter, examples are kept in their source language.
    /// Conversion problems end up in [`NormalizedDoc::diagnostics`].
    pub fn normalize(
        &self,
        markdown: &str,
        name: &str,
        converter: Option<&dyn Converter>,
    ) -> NormalizedDoc {
        let body = strip_front_matter(markdown);

        let links = extract_footer_links(body);
        let text = resolve_footer_links(body, &links);
        let text = strip_footer_definitions(&text, &links);
        let text = rewrite_links(&text, &self.config.base_url);

        let mut groups = split_group_lines(&text, SECTION_MARKER);
        for group in &mut groups {
            fix_example_titles(group);
        }
        let mut groups = reformat_examples(groups);

        let mut diagnostics = Vec::new();
        if let Some(converter) = converter {
            for group in groups.iter_mut().filter(|g| is_example_group(g)) {
                *group = self.convert_group(group, name, converter, &mut diagnostics);
            }
        }

        let markdown = join_groups(&groups);
        let docs = parse_document(&markdown);
        NormalizedDoc {
            docs,
            markdown,
            diagnostics,
        }
    }

    /// Replace each source-language code block in `group` with its snippets.
    fn convert_group(
        &self,
        group: &[String],
        name: &str,
        converter: &dyn Converter,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<String> {
        let mut out = Vec::with_capacity(group.len());
        let mut index = 0;
        let mut i = 0;

        while i < group.len() {
            let line = &group[i];
            if !self.is_source_fence(line) {
                out.push(line.clone());
                // Skip over other fenced blocks so their content is never
                // mistaken for an opening fence.
                if is_code_fence(line) {
                    let close = find_closing_fence(group, i + 1).unwrap_or(group.len() - 1);
                    out.extend(group[i + 1..=close].iter().cloned());
                    i = close;
                }
                i += 1;
                continue;
            }

            let Some(close) = find_closing_fence(group, i + 1) else {
                tracing::debug!(entity = name, "unterminated code fence, leaving it as is");
                out.extend(group[i..].iter().cloned());
                break;
            };

            let source = group[i + 1..close].join("\n");
            let example_id = format!("{}#{}", name, index);
            index += 1;

            let conversion = convert_example(converter, &source, &example_id, &self.config.languages);
            diagnostics.extend(conversion.diagnostics);

            let rendered = assemble_snippets(&conversion.snippets);
            if rendered.is_empty() {
                tracing::warn!(
                    example = %example_id,
                    "no language rendered an example of {}",
                    format_entity_name(name)
                );
            } else {
                out.extend(rendered.split('\n').map(str::to_string));
            }
            i = close + 1;
        }

        out
    }

    fn is_source_fence(&self, line: &str) -> bool {
        let Some(info) = line.trim_start().strip_prefix("```") else {
            return false;
        };
        let tag = info.split_whitespace().next().unwrap_or("");
        self.config
            .source_languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(tag))
    }
}

fn find_closing_fence(lines: &[String], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| lines[i].trim() == "```")
}
