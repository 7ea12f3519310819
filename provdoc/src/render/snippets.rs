//! Multi-language code example assembly.
//!
//! Turns language → rendered code into a run of fenced blocks. Order comes
//! from a fixed precedence table, never from map iteration order.

use indexmap::IndexMap;

pub const CODE_FENCE: &str = "```";

/// Output order of recognized target languages.
pub const LANGUAGE_PRIORITY: &[&str] = &[
    "typescript",
    "python",
    "csharp",
    "go",
    "java",
    "pcl",
    "yaml",
];

/// Languages with usable output, in emission order.
///
/// Known languages follow [`LANGUAGE_PRIORITY`]; the rest follow, sorted by
/// name. Empty or whitespace-only renderings are dropped.
pub fn ordered_languages(snippets: &IndexMap<String, String>) -> Vec<&str> {
    let usable = |lang: &str| snippets.get(lang).is_some_and(|code| !code.trim().is_empty());

    let mut ordered: Vec<&str> = LANGUAGE_PRIORITY
        .iter()
        .copied()
        .filter(|&lang| usable(lang))
        .collect();

    let mut others: Vec<&str> = snippets
        .keys()
        .map(String::as_str)
        .filter(|&lang| !LANGUAGE_PRIORITY.contains(&lang) && usable(lang))
        .collect();
    others.sort_unstable();

    ordered.extend(others);
    ordered
}

/// Serialize the usable snippets as adjacent fenced code blocks.
pub fn assemble_snippets(snippets: &IndexMap<String, String>) -> String {
    ordered_languages(snippets)
        .into_iter()
        .map(|lang| {
            let code = snippets[lang].trim_end_matches(['\n', '\r']);
            format!("{CODE_FENCE}{lang}\n{code}\n{CODE_FENCE}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
