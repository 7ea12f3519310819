//! Display names for provider entities in generated prose.

/// Marker providers append to the old name of a renamed entity.
const LEGACY_MARKER: &str = "_legacy";

/// Quote an entity name, flagging names known to be aliases.
///
/// `prov_entity` → `'prov_entity'`,
/// `prov_entity_legacy` → `'prov_entity' (aliased or renamed)`.
pub fn format_entity_name(raw: &str) -> String {
    if raw.contains(LEGACY_MARKER) {
        format!("'{}' (aliased or renamed)", raw.replace(LEGACY_MARKER, ""))
    } else {
        format!("'{}'", raw)
    }
}
