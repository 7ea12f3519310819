//! Example Usage normalization.
//!
//! Provider docs disagree on how to lay out examples. Some use one
//! `## Example Usage` section, some a series of `## Example Usage - Case`
//! sections, some both, and per-example titles show up at random depths.
//! Everything here rewrites that into one canonical `## Example Usage`
//! group with `### Case` subsections.

use super::sections::heading_level;
use regex::Regex;
use std::sync::LazyLock;

/// Heading of the canonical example section.
pub const EXAMPLE_USAGE_HEADING: &str = "## Example Usage";

static RE_EXAMPLE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+Example\s+Usage\b(.*)$").unwrap());

/// Depth of per-example title headings that get promoted.
const EXAMPLE_TITLE_PREFIX: &str = "#### ";
const EXAMPLE_TITLE_LEVEL: usize = 4;

/// Classify a group heading.
///
/// `None` for anything that is not an Example Usage heading, `Some(None)`
/// for the canonical heading and `Some(Some(title))` for a suffixed one.
pub fn example_title(heading: &str) -> Option<Option<String>> {
    let caps = RE_EXAMPLE_HEADING.captures(heading.trim_end())?;
    let title = caps[1]
        .trim()
        .trim_start_matches(['-', '–', '—', ':'])
        .trim();
    if title.is_empty() {
        Some(None)
    } else {
        Some(Some(title.to_string()))
    }
}

/// Whether a group starts with any Example Usage heading.
pub fn is_example_group(group: &[String]) -> bool {
    group.first().is_some_and(|h| example_title(h).is_some())
}

pub fn is_code_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Promote `####` example titles to `###` when a code block follows them.
///
/// The fence has to appear before the next heading of equal or shallower
/// depth. A title with no code under it is prose and stays as written.
pub fn fix_example_titles(lines: &mut [String]) {
    let mut in_fence = false;
    for i in 0..lines.len() {
        if is_code_fence(&lines[i]) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || !lines[i].starts_with(EXAMPLE_TITLE_PREFIX) {
            continue;
        }
        if fence_follows(&lines[i + 1..]) {
            lines[i] = lines[i].replacen(EXAMPLE_TITLE_PREFIX, "### ", 1);
        }
    }
}

fn fence_follows(rest: &[String]) -> bool {
    for line in rest {
        if is_code_fence(line) {
            return true;
        }
        if heading_level(line).is_some_and(|level| level <= EXAMPLE_TITLE_LEVEL) {
            return false;
        }
    }
    false
}

/// Collapse every Example Usage group into one canonical group.
///
/// The merged group takes the place of the first example group. Its head is
/// the un-suffixed group when there is one, otherwise a bare synthesized
/// heading. Suffixed groups follow in document order as `### <suffix>`
/// subsections; extra un-suffixed groups contribute their bodies only.
pub fn reformat_examples(groups: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let examples: Vec<(usize, Option<String>)> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, group)| {
            group
                .first()
                .and_then(|heading| example_title(heading))
                .map(|title| (i, title))
        })
        .collect();

    match examples.as_slice() {
        [] => return groups,
        [(_, None)] => return groups,
        _ => {}
    }

    let first_index = examples[0].0;
    let canonical_index = examples
        .iter()
        .find(|(_, title)| title.is_none())
        .map(|(i, _)| *i);

    let mut merged: Vec<String> = match canonical_index {
        Some(i) => groups[i].clone(),
        None => vec![EXAMPLE_USAGE_HEADING.to_string()],
    };

    for (i, title) in &examples {
        if Some(*i) == canonical_index {
            continue;
        }
        if merged.len() > 1 && merged.last().is_some_and(|l| !l.trim().is_empty()) {
            merged.push(String::new());
        }
        if let Some(title) = title {
            merged.push(format!("### {}", title));
        }
        merged.extend(groups[*i].iter().skip(1).cloned());
    }

    let mut result = Vec::with_capacity(groups.len() - examples.len() + 1);
    let mut merged = Some(merged);
    for (i, group) in groups.into_iter().enumerate() {
        if i == first_index {
            if let Some(merged) = merged.take() {
                result.push(merged);
            }
        } else if !examples.iter().any(|(e, _)| *e == i) {
            result.push(group);
        }
    }

    result
}

/// Return the verbatim Example Usage section of `markdown`.
///
/// Only answers when exactly one Example Usage heading exists; zero or
/// several headings give an empty string.
pub fn extract_examples(markdown: &str) -> String {
    let mut offset = 0;
    let mut headings = Vec::new();
    let mut line_starts = Vec::new();

    for line in markdown.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if line.trim_start().starts_with(EXAMPLE_USAGE_HEADING) {
            headings.push(offset + indent);
        }
        line_starts.push((offset, line));
        offset += line.len();
    }

    let start = match headings.as_slice() {
        [start] => *start,
        [] => return String::new(),
        _ => {
            tracing::debug!(
                count = headings.len(),
                "multiple Example Usage headings, not extracting examples"
            );
            return String::new();
        }
    };

    let end = line_starts
        .iter()
        .filter(|(line_offset, _)| *line_offset > start)
        .find(|(_, line)| line.trim_start().starts_with("## "))
        .map(|(line_offset, _)| line_offset - 1)
        .unwrap_or(markdown.len());

    markdown[start..end].to_string()
}
