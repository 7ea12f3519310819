//! Heading-based line grouping.
//!
//! A group is a heading line plus every line up to the next heading with
//! the same marker. The first group holds whatever precedes the first
//! heading and may be empty. Trailing blank lines stay with their group
//! because later stages treat them as block separators.

/// Split `lines` into groups starting at each line that begins with `marker`.
///
/// Always returns at least one group (the preamble).
pub fn group_lines<S: AsRef<str>>(lines: &[S], marker: &str) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with(marker) {
            groups.push(std::mem::take(&mut buffer));
        }
        buffer.push(line.to_string());
    }
    groups.push(buffer);

    groups
}

/// Split raw text on `\n` and group it by `marker`.
pub fn split_group_lines(text: &str, marker: &str) -> Vec<Vec<String>> {
    let lines: Vec<&str> = text.split('\n').collect();
    group_lines(&lines, marker)
}

/// Join groups back into text, the inverse of [`split_group_lines`].
pub fn join_groups(groups: &[Vec<String>]) -> String {
    groups
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heading depth of a markdown ATX heading line, if it is one.
pub fn heading_level(line: &str) -> Option<usize> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        Some(hashes)
    } else {
        None
    }
}
