//! Footer (reference-style) links and inline link rewriting.
//!
//! Provider docs often end with definitions like `[1]: https://...` and
//! refer to them inline as `[label][1]`. These are turned into direct
//! `[label](https://...)` links so the text survives being cut into pieces.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Bracketed token (`[1]`) → URL, in definition order.
pub type FooterLinks = IndexMap<String, String>;

static RE_FOOTER_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[[^\]]+\]):\s*(\S.*?)\s*$").unwrap());

static RE_REFERENCE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\](\[[^\]]+\])").unwrap());

static RE_INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").unwrap());

static RE_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Collect `[token]: url` definitions that start a line outside fenced code.
pub fn extract_footer_links(markdown: &str) -> FooterLinks {
    prose_lines(markdown)
        .into_iter()
        .filter(|(_, in_code)| !in_code)
        .filter_map(|(line, _)| RE_FOOTER_DEFINITION.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Rewrite `[label][token]` into `[label](url)` for every known token.
///
/// Unknown tokens are left as written, and so is fenced code, where
/// `m[0][1]` is an index expression. An empty table returns the input
/// unchanged.
pub fn resolve_footer_links(text: &str, links: &FooterLinks) -> String {
    if links.is_empty() {
        return text.to_string();
    }
    map_prose(text, |line| {
        RE_REFERENCE_LINK
            .replace_all(line, |caps: &Captures| match links.get(&caps[2]) {
                Some(url) => format!("[{}]({})", &caps[1], url),
                None => caps[0].to_string(),
            })
            .into_owned()
    })
}

/// Drop the definition lines of tokens present in `links`.
pub fn strip_footer_definitions(text: &str, links: &FooterLinks) -> String {
    if links.is_empty() {
        return text.to_string();
    }
    prose_lines(text)
        .into_iter()
        .filter(|(line, in_code)| {
            *in_code
                || RE_FOOTER_DEFINITION
                    .captures(line)
                    .map_or(true, |caps| !links.contains_key(&caps[1]))
        })
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Make site-relative links absolute and unwrap links to bare relative pages.
///
/// `[x](/docs/a.html)` → `[x](<base_url>/docs/a.html)`,
/// `[x](a.html)` → `x`. Fenced code is not touched.
pub fn rewrite_links(text: &str, base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    map_prose(text, |line| {
        RE_INLINE_LINK
            .replace_all(line, |caps: &Captures| {
                rewrite_link(&caps[0], &caps[1], &caps[2], base_url)
            })
            .into_owned()
    })
}

/// Lines of `text`, each flagged when it is a fence line or inside fenced code.
fn prose_lines(text: &str) -> Vec<(&str, bool)> {
    let mut in_fence = false;
    text.split('\n')
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return (line, true);
            }
            (line, in_fence)
        })
        .collect()
}

/// Apply `rewrite` to every line outside fenced code.
fn map_prose(text: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    prose_lines(text)
        .into_iter()
        .map(|(line, in_code)| if in_code { line.to_string() } else { rewrite(line) })
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_link(original: &str, label: &str, url: &str, base_url: &str) -> String {
    if url.starts_with("//") || RE_SCHEME.is_match(url) || url.starts_with('#') {
        return original.to_string();
    }
    if url.starts_with('/') {
        return format!("[{}]({}{})", label, base_url, url);
    }
    let page = url.split('#').next().unwrap_or(url);
    if page.ends_with(".html") {
        return label.to_string();
    }
    original.to_string()
}
