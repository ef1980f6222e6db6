use crate::constants;
use crate::spec::model::{SchemaKind, SchemaNode};
use std::collections::BTreeSet;

/// Computes the dash-joined paths of every mandatory body field
///
/// The payload property (`data`) is always descended into, even when the
/// envelope does not list it as required. Below it, only properties named in
/// a `required` list are recorded and followed into nested objects and arrays
/// of objects.
#[must_use]
pub fn collect_required(root: &SchemaNode) -> BTreeSet<String> {
    let mut required = BTreeSet::new();
    let mut visited = BTreeSet::new();

    if let Some(payload) = root.properties.get(constants::FIELD_DATA) {
        let prefix = format!("{}-", constants::FIELD_DATA);
        walk(object_of(payload), &prefix, &mut required, &mut visited);
    }
    walk(root, "", &mut required, &mut visited);

    required
}

fn walk(
    node: &SchemaNode,
    prefix: &str,
    required: &mut BTreeSet<String>,
    visited: &mut BTreeSet<String>,
) {
    // re-entry means the subtree is already accounted for
    if !visited.insert(prefix.to_string()) {
        return;
    }

    for name in &node.required {
        let path = format!("{prefix}{name}");
        required.insert(path.clone());

        let Some(property) = node.properties.get(name) else {
            continue;
        };
        match property.kind {
            SchemaKind::Object | SchemaKind::RelationshipArray => {
                walk(object_of(property), &format!("{path}-"), required, visited);
            }
            _ => {}
        }
    }
}

/// The node itself, or its item schema for array kinds
fn object_of(node: &SchemaNode) -> &SchemaNode {
    match node.kind {
        SchemaKind::Array | SchemaKind::RelationshipArray => node.items.as_deref().unwrap_or(node),
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_payload_is_descended_without_being_required() {
        let root = SchemaNode::object().property(
            "data",
            SchemaNode::object()
                .require("type")
                .property("type", SchemaNode::string())
                .property(
                    "attributes",
                    SchemaNode::object()
                        .require("name")
                        .property("name", SchemaNode::string()),
                ),
        );

        assert_eq!(collect_required(&root), set(&["data-type"]));
    }

    #[test]
    fn test_required_spine_is_followed() {
        let root = SchemaNode::object().require("data").property(
            "data",
            SchemaNode::object()
                .require("attributes")
                .require("relationships")
                .property(
                    "attributes",
                    SchemaNode::object()
                        .require("name")
                        .property("name", SchemaNode::string())
                        .property("note", SchemaNode::string()),
                )
                .property(
                    "relationships",
                    SchemaNode::object().require("tags").property(
                        "tags",
                        SchemaNode::object().require("data").property(
                            "data",
                            SchemaNode::array(
                                SchemaNode::object()
                                    .require("id")
                                    .property("id", SchemaNode::string()),
                            ),
                        ),
                    ),
                ),
        );

        assert_eq!(
            collect_required(&root),
            set(&[
                "data",
                "data-attributes",
                "data-attributes-name",
                "data-relationships",
                "data-relationships-tags",
                "data-relationships-tags-data",
                "data-relationships-tags-data-id",
            ])
        );
    }

    #[test]
    fn test_payload_array_uses_item_schema() {
        let root = SchemaNode::object().property(
            "data",
            SchemaNode::array(
                SchemaNode::object()
                    .require("id")
                    .property("id", SchemaNode::string()),
            ),
        );

        assert_eq!(collect_required(&root), set(&["data-id"]));
    }

    #[test]
    fn test_required_name_without_property_is_recorded() {
        let root = SchemaNode::object().property("data", SchemaNode::object().require("ghost"));
        assert_eq!(collect_required(&root), set(&["data-ghost"]));
    }

    #[test]
    fn test_envelope_without_payload() {
        let root = SchemaNode::object()
            .require("name")
            .property("name", SchemaNode::string());
        assert_eq!(collect_required(&root), set(&["name"]));
    }
}
