//! Flag and command naming rules.

const ATTRIBUTES_PREFIX: &str = "data-attributes-";
const RELATIONSHIPS_PREFIX: &str = "data-relationships-";
const PAYLOAD_PREFIX: &str = "data-";

/// Shortens a dash-joined body path into the flag name users type
///
/// - `data-attributes-name` becomes `name`
/// - `data-relationships-owner-data-id` becomes `owner-id`
/// - any other `data-` prefix is dropped
#[must_use]
pub fn shorten_flag_name(path: &str) -> String {
    let name = path.strip_prefix(ATTRIBUTES_PREFIX).unwrap_or(path);

    let name = match name.strip_prefix(RELATIONSHIPS_PREFIX) {
        Some(relationship) => relationship.replacen("-data-id", "-id", 1),
        None => name.to_string(),
    };

    match name.strip_prefix(PAYLOAD_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Makes a declared parameter name shell-safe: `[` becomes `-`, `]` is removed
#[must_use]
pub fn sanitize_parameter_name(name: &str) -> String {
    name.replace('[', "-").replace(']', "")
}

/// Normalizes an `operationId` into a command name
#[must_use]
pub fn normalize_operation_id(operation_id: &str) -> String {
    operation_id.replace('_', "-")
}
