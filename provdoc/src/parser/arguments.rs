//! Argument and attribute reference parser: line-by-line state machine.
//!
//! Recognizes the bullet convention used by provider docs:
//!
//! ```text
//! * `name` - (Optional) Description that may continue
//! on the following lines.
//!
//! The `name` object supports the following:
//!
//! * `child` - (Required) Nested field.
//! ```
//!
//! Lines that fit no convention are skipped.

use super::sections::heading_level;
use crate::model::{ArgumentDocs, Arguments};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// * `name` [(Type)] [-|–] [(Optional, ...)] description
static RE_ARGUMENT_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*[*+-]\s*`([a-zA-Z0-9_]+)`\s*",
        r"(?:\([a-zA-Z]*\)\s*)?",
        r"[–-]?\s*",
        r"(?:\([^)]*\)[-\s]*)?",
        r"(.*)$"
    ))
    .unwrap()
});

// The `name` object supports the following:
// * `name` supports the following:
static RE_NESTED_SUPPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:[*+-]\s*)?(?:(?:the|an?)\s+)?`([a-z0-9_]+)`\s+",
        r"(?:(?:block|object|configuration)s?\s+)?(?:also\s+)?",
        r"supports?\s+the\s+following"
    ))
    .unwrap()
});

// Nested `name` blocks have the following structure:
static RE_NESTED_STRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:a\s+)?(?:nested\s+)?`([a-z0-9_]+)`\s+(?:block|object)s?\s+",
        r"(?:has|have|contains?)\s+the\s+following"
    ))
    .unwrap()
});

static RE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());

// Any list item, including ones the argument pattern rejects
static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[*+-]\s").unwrap());

// -- Public API ---------------------------------------------------------------

/// Parse the body of an "Argument Reference" section.
///
/// Bullets after a nested-object marker are recorded twice: under the
/// owning entry's `arguments` and as top-level entries with `is_nested`.
/// A name defined more than once keeps its first position and the last
/// description in document order, so a field shared by two nested blocks
/// collapses into one flat entry.
pub fn parse_argument_reference<S: AsRef<str>>(lines: &[S]) -> Arguments {
    let mut state = ArgumentState::default();
    for line in lines {
        state.process_line(line.as_ref());
    }
    state.arguments
}

/// Parse the body of an "Attributes Reference" section into name → description.
pub fn parse_attribute_reference<S: AsRef<str>>(lines: &[S]) -> IndexMap<String, String> {
    let mut attributes: IndexMap<String, String> = IndexMap::new();
    let mut last: Option<String> = None;

    for line in lines {
        let line = line.as_ref();
        if let Some(caps) = RE_ARGUMENT_BULLET.captures(line) {
            let name = caps[1].to_string();
            attributes.insert(name.clone(), caps[2].trim_end().to_string());
            last = Some(name);
        } else if is_continuation(line) {
            if let Some(desc) = last.as_ref().and_then(|name| attributes.get_mut(name)) {
                append_line(desc, line);
            }
        } else {
            last = None;
        }
    }

    attributes
}

// -- Parser state -------------------------------------------------------------

#[derive(Default)]
struct ArgumentState {
    arguments: Arguments,
    /// Owner of the nested block we are inside, if any.
    nested: Option<String>,
    /// Last bullet name, target of continuation lines.
    last: Option<String>,
}

impl ArgumentState {
    fn process_line(&mut self, line: &str) {
        // 1. Nested-object marker, also in its bullet form
        if let Some(owner) = match_nested_marker(line) {
            self.nested = Some(self.resolve_owner(owner));
            self.last = None;
            return;
        }

        // 2. Argument bullet
        if let Some(caps) = RE_ARGUMENT_BULLET.captures(line) {
            let name = caps[1].to_string();
            let description = caps[2].trim_end().to_string();
            match self.nested.clone() {
                Some(owner) => self.record_nested(&owner, &name, description),
                None => self.record_top_level(&name, description),
            }
            self.last = Some(name);
            return;
        }

        // 3. Continuation of the previous bullet
        if is_continuation(line) {
            if let Some(name) = self.last.clone() {
                self.append_continuation(&name, line);
            }
            return;
        }

        // Blank line, heading, rule or unparseable list item ends the bullet
        self.last = None;
    }

    /// Existing entry the marker refers to, matched without regard to case.
    fn resolve_owner(&self, owner: String) -> String {
        if self.arguments.contains_key(&owner) {
            return owner;
        }
        self.arguments
            .keys()
            .find(|key| key.eq_ignore_ascii_case(&owner))
            .cloned()
            .unwrap_or(owner)
    }

    fn record_top_level(&mut self, name: &str, description: String) {
        match self.arguments.get_mut(name) {
            Some(existing) => {
                existing.description = description;
                existing.is_nested = false;
            }
            None => {
                self.arguments.insert(
                    name.to_string(),
                    ArgumentDocs {
                        description,
                        ..Default::default()
                    },
                );
            }
        }
    }

    fn record_nested(&mut self, owner: &str, name: &str, description: String) {
        self.arguments
            .entry(owner.to_string())
            .or_default()
            .arguments
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), description.clone());

        let entry = self.arguments.entry(name.to_string()).or_default();
        entry.description = description;
        entry.is_nested = true;
    }

    fn append_continuation(&mut self, name: &str, line: &str) {
        if let Some(owner) = self.nested.clone() {
            let nested_desc = self
                .arguments
                .get_mut(&owner)
                .and_then(|parent| parent.arguments.as_mut())
                .and_then(|children| children.get_mut(name));
            if let Some(desc) = nested_desc {
                append_line(desc, line);
            }
            if let Some(entry) = self.arguments.get_mut(name) {
                if entry.is_nested {
                    append_line(&mut entry.description, line);
                }
            }
        } else if let Some(entry) = self.arguments.get_mut(name) {
            append_line(&mut entry.description, line);
        }
    }
}

// -- Helper functions ---------------------------------------------------------

/// Owner name of a nested-object marker line, as written.
fn match_nested_marker(line: &str) -> Option<String> {
    RE_NESTED_SUPPORTS
        .captures(line)
        .or_else(|| RE_NESTED_STRUCTURE.captures(line))
        .map(|caps| caps[1].to_string())
}

/// A line that extends the previous bullet's description.
fn is_continuation(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && heading_level(trimmed).is_none()
        && !RE_RULE.is_match(line)
        && !RE_LIST_ITEM.is_match(line)
}

fn append_line(dest: &mut String, line: &str) {
    dest.push('\n');
    dest.push_str(line.trim());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(pairs: &[(&str, &str)]) -> Option<IndexMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn plain_bullets_with_continuation() {
        let input = [
            "* `iam_instance_profile` - (Optional) The IAM Instance Profile to",
            "launch the instance with.",
            "* `ipv6_address_count`- (Optional) A number of IPv6 addresses.",
            "* `tags` - (Optional) A mapping of tags to assign to the resource.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 3);
        assert_eq!(
            args["iam_instance_profile"].description,
            "The IAM Instance Profile to\nlaunch the instance with."
        );
        assert_eq!(args["ipv6_address_count"].description, "A number of IPv6 addresses.");
        assert!(!args["tags"].is_nested);
        assert_eq!(args["tags"].arguments, None);
    }

    #[test]
    fn nested_object_block() {
        let input = [
            "* `jwt_configuration` - (Optional) The configuration of a JWT authorizer.",
            "Supported only for HTTP APIs.",
            "",
            "The `jwt_configuration` object supports the following:",
            "",
            "* `audience` - (Optional) A list of the intended recipients of the JWT.",
            "* `issuer` - (Optional) The base domain of the identity provider.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 3);

        let parent = &args["jwt_configuration"];
        assert_eq!(
            parent.description,
            "The configuration of a JWT authorizer.\nSupported only for HTTP APIs."
        );
        assert!(!parent.is_nested);
        assert_eq!(
            parent.arguments,
            nested(&[
                ("audience", "A list of the intended recipients of the JWT."),
                ("issuer", "The base domain of the identity provider."),
            ])
        );

        assert!(args["audience"].is_nested);
        assert_eq!(args["issuer"].description, "The base domain of the identity provider.");
        assert_eq!(args["issuer"].arguments, None);
    }

    #[test]
    fn nested_continuation_updates_both_copies() {
        let input = [
            "* `website` - (Optional) A website object (documented below).",
            "~> **NOTE:** You cannot use `acceleration_status` in `cn-north-1`",
            "",
            "The `website` object supports the following:",
            "",
            "* `index_document` - (Required, unless using `redirect_all_requests_to`) Amazon S3 returns this index document.",
            "* `routing_rules` - (Optional) A json array containing routing rules",
            "describing redirect behavior.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(
            args["website"].description,
            "A website object (documented below).\n~> **NOTE:** You cannot use `acceleration_status` in `cn-north-1`"
        );
        let children = args["website"].arguments.as_ref().unwrap();
        assert_eq!(children["index_document"], "Amazon S3 returns this index document.");
        assert_eq!(
            children["routing_rules"],
            "A json array containing routing rules\ndescribing redirect behavior."
        );
        assert_eq!(
            args["routing_rules"].description,
            "A json array containing routing rules\ndescribing redirect behavior."
        );
        assert!(args["routing_rules"].is_nested);
    }

    #[test]
    fn indented_bullets_collapse_into_one_flat_entry() {
        // `type` belongs to both parents but is recorded once at top level.
        let input = [
            "* `action` - (Optional) The action to take. Not used if `type` is `GROUP`.",
            "  * `type` - (Required) valid values are: `BLOCK`, `ALLOW`, or `COUNT`",
            "* `override_action` - (Optional) Override the action. Only used if `type` is `GROUP`.",
            "  * `type` - (Required) valid values are: `BLOCK`, `ALLOW`, or `COUNT`",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 3);
        assert_eq!(
            args["type"].description,
            "valid values are: `BLOCK`, `ALLOW`, or `COUNT`"
        );
        assert_eq!(args["action"].arguments, None);
        assert_eq!(args["override_action"].arguments, None);
    }

    #[test]
    fn later_definition_wins() {
        let input = [
            "* `priority` - (Optional) The priority associated with the rule.",
            "",
            "* `priority` is optional (with a default value of `0`) but must be unique between multiple rules",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 1);
        assert_eq!(
            args["priority"].description,
            "is optional (with a default value of `0`) but must be unique between multiple rules"
        );
    }

    #[test]
    fn nested_redefinition_overwrites_top_level() {
        let input = [
            "* `name` - (Required) Name of the bucket.",
            "* `rule` - (Optional) A rule block.",
            "",
            "The `rule` object supports the following:",
            "",
            "* `name` - (Required) Name of the rule.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args["name"].description, "Name of the rule.");
        assert!(args["name"].is_nested);
        assert_eq!(args.get_index_of("name"), Some(0));
        assert_eq!(
            args["rule"].arguments,
            nested(&[("name", "Name of the rule.")])
        );
    }

    #[test]
    fn bullet_form_marker_after_rule() {
        let input = [
            "* `allowed_audiences` (Optional) Allowed audience values.",
            "* `retention_policy` - (Required) A `retention_policy` block as documented below.",
            "",
            "---",
            "* `retention_policy` supports the following:",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 2);
        assert_eq!(args["allowed_audiences"].description, "Allowed audience values.");
        assert_eq!(
            args["retention_policy"].description,
            "A `retention_policy` block as documented below."
        );
        assert_eq!(args["retention_policy"].arguments, None);
    }

    #[test]
    fn marker_creates_missing_parent() {
        let input = [
            "A `timeouts` block supports the following:",
            "* `create` - (Defaults to 30 minutes) Used when creating.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args["timeouts"].description, "");
        assert_eq!(
            args["timeouts"].arguments,
            nested(&[("create", "Used when creating.")])
        );
        assert!(args["create"].is_nested);
    }

    #[test]
    fn marker_without_bullets_adds_nothing() {
        let input = [
            "* `filter` - (Optional) One or more filters.",
            "",
            "The `filter` object supports the following:",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 1);
        assert_eq!(args["filter"].arguments, None);
    }

    #[test]
    fn marker_phrasing_is_tolerant() {
        assert_eq!(
            match_nested_marker("The `website` object supports the following:").as_deref(),
            Some("website")
        );
        assert_eq!(
            match_nested_marker("`cors_rule` supports the following:").as_deref(),
            Some("cors_rule")
        );
        assert_eq!(
            match_nested_marker("the `Lifecycle_Rule` block also supports the following arguments:")
                .as_deref(),
            Some("Lifecycle_Rule")
        );
        assert_eq!(
            match_nested_marker("Nested `rule` blocks have the following structure:").as_deref(),
            Some("rule")
        );
        assert_eq!(match_nested_marker("* `tags` - (Optional) Tags."), None);
    }

    #[test]
    fn unmatched_lines_are_skipped() {
        let input = [
            "## Argument Reference",
            "",
            "The following arguments are supported:",
            "",
            "* not a bullet",
            "* `name` - The name.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 1);
        assert_eq!(args["name"].description, "The name.");
    }

    #[test]
    fn unparseable_list_item_ends_description() {
        let input = [
            "* `mode` - (Optional) The mode.",
            "* not a bullet",
            "more text that belongs to nothing",
            "* `size` - (Optional) The size.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args.len(), 2);
        assert_eq!(args["mode"].description, "The mode.");
        assert_eq!(args["size"].description, "The size.");

        let attrs = parse_attribute_reference(&input[..2]);
        assert_eq!(attrs["mode"], "The mode.");
    }

    #[test]
    fn marker_owner_matches_existing_entry_case_insensitively() {
        let input = [
            "* `Settings` - (Optional) Settings block.",
            "",
            "The `settings` object supports the following:",
            "",
            "* `level` - (Optional) Log level.",
        ];
        let args = parse_argument_reference(&input);
        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Settings", "level"]);
        assert_eq!(args["Settings"].arguments, nested(&[("level", "Log level.")]));
    }

    #[test]
    fn marker_keeps_owner_case() {
        let input = [
            "The `Settings` object supports the following:",
            "* `level` - (Optional) Log level.",
        ];
        let args = parse_argument_reference(&input);
        assert_eq!(args["Settings"].arguments, nested(&[("level", "Log level.")]));
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = [
            "* `a` - first",
            "The `a` object supports the following:",
            "* `b` - second",
            "* `a` - third",
        ];
        assert_eq!(parse_argument_reference(&input), parse_argument_reference(&input));
    }

    #[test]
    fn attributes() {
        let input = [
            "## Attributes Reference",
            "",
            "* `id` - The ID of the bucket.",
            "* `arn` - The ARN of the bucket. Will be of format",
            "`arn:aws:s3:::bucketname`.",
            "",
            "Some trailing prose.",
        ];
        let attrs = parse_attribute_reference(&input);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["id"], "The ID of the bucket.");
        assert_eq!(
            attrs["arn"],
            "The ARN of the bucket. Will be of format\n`arn:aws:s3:::bucketname`."
        );
    }
}
