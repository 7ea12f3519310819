//! Parser module: heuristic recognizers for provider doc conventions.
//!
//! Each convention gets its own independent matcher so that one drifting
//! convention cannot break the others.

pub mod arguments;
pub mod examples;
pub mod footer;
pub mod sections;

use crate::model::EntityDocs;
use regex::Regex;
use std::sync::LazyLock;

/// Marker of the top-level sections of a page.
pub const SECTION_MARKER: &str = "## ";

static RE_TITLE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:resource|data\s+source):\s*").unwrap());

static RE_ARGUMENTS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+arguments?\s+reference\b").unwrap());

static RE_ATTRIBUTES_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+attributes?\s+reference\b").unwrap());

static RE_IMPORT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+import\b").unwrap());

/// Which model field a `## ` group feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Preamble,
    Arguments,
    Attributes,
    Import,
    Other,
}

fn classify(group: &[String]) -> SectionKind {
    match group.first() {
        None => SectionKind::Preamble,
        Some(heading) if !heading.starts_with(SECTION_MARKER) => SectionKind::Preamble,
        Some(heading) if RE_ARGUMENTS_HEADING.is_match(heading) => SectionKind::Arguments,
        Some(heading) if RE_ATTRIBUTES_HEADING.is_match(heading) => SectionKind::Attributes,
        Some(heading) if RE_IMPORT_HEADING.is_match(heading) => SectionKind::Import,
        Some(_) => SectionKind::Other,
    }
}

/// Parse a (normalized) page into the documentation model.
pub fn parse_document(markdown: &str) -> EntityDocs {
    let body = strip_front_matter(markdown);
    let groups = sections::split_group_lines(body, SECTION_MARKER);
    let mut docs = EntityDocs::default();

    for group in &groups {
        match classify(group) {
            SectionKind::Preamble => parse_preamble(group, &mut docs),
            SectionKind::Arguments => {
                for (name, entry) in arguments::parse_argument_reference(&group[1..]) {
                    docs.arguments.insert(name, entry);
                }
            }
            SectionKind::Attributes => {
                docs.attributes
                    .extend(arguments::parse_attribute_reference(&group[1..]));
            }
            SectionKind::Import => {
                let text = group[1..].join("\n").trim().to_string();
                if !text.is_empty() {
                    docs.import = Some(text);
                }
            }
            SectionKind::Other => {}
        }
    }

    docs.examples = examples::extract_examples(body);
    docs
}

/// Remove a leading YAML front-matter block.
pub fn strip_front_matter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---\n") else {
        return markdown;
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "---" {
            return rest[offset..].trim_start_matches('\n');
        }
    }
    markdown
}

fn parse_preamble(group: &[String], docs: &mut EntityDocs) {
    let mut description = Vec::new();
    for line in group {
        match line.strip_prefix("# ") {
            Some(title) if docs.title.is_none() => {
                let title = RE_TITLE_LABEL.replace(title.trim(), "");
                docs.title = Some(title.into_owned());
            }
            _ => description.push(line.as_str()),
        }
    }
    docs.description = description.join("\n").trim().to_string();
}
