//! Inlining of related resources into flat, self-contained records.

use crate::constants;
use crate::response::wire::{Linkage, Resource, ResourceRef};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A flattened resource: attributes merged with `id`, `type` and relationships
pub type Record = Map<String, Value>;

/// Lookup of `included` resources by `(type, id)`
pub struct IncludedIndex<'a> {
    entries: HashMap<(String, String), &'a Resource>,
}

impl<'a> IncludedIndex<'a> {
    #[must_use]
    pub fn new(included: &'a [Resource]) -> Self {
        let entries = included
            .iter()
            .map(|resource| (resource.key(), resource))
            .collect();
        Self { entries }
    }

    fn get(&self, reference: &ResourceRef) -> Option<&'a Resource> {
        self.entries.get(&reference.key()).copied()
    }
}

/// Normalizes every resource of a page against the page's side-table
#[must_use]
pub fn normalize_resources(resources: &[Resource], included: &[Resource]) -> Vec<Record> {
    let index = IncludedIndex::new(included);
    resources
        .iter()
        .map(|resource| normalize_resource(resource, &index))
        .collect()
}

/// Builds one record: attributes first, then `id` and `type`, then one entry
/// per non-null relationship
#[must_use]
pub fn normalize_resource(resource: &Resource, index: &IncludedIndex<'_>) -> Record {
    let mut record = resource.attributes.clone().unwrap_or_default();
    record.insert(constants::FIELD_ID.to_string(), resource.id.clone());
    record.insert(
        constants::FIELD_TYPE.to_string(),
        Value::String(resource.kind.clone()),
    );

    for (name, relationship) in &resource.relationships {
        let Some(linkage) = relationship.as_ref().and_then(|r| r.data.as_ref()) else {
            continue;
        };

        let value = match linkage {
            Linkage::One(reference) => Value::Object(resolve_reference(reference, index)),
            Linkage::Many(references) => Value::Array(
                references
                    .iter()
                    .map(|reference| Value::Object(resolve_reference(reference, index)))
                    .collect(),
            ),
        };
        record.insert(name.clone(), value);
    }

    record
}

/// Merges a reference with its included resource, or keeps it bare
fn resolve_reference(reference: &ResourceRef, index: &IncludedIndex<'_>) -> Record {
    let mut resolved = Record::new();

    let Some(target) = index.get(reference) else {
        resolved.insert(constants::FIELD_ID.to_string(), reference.id.clone());
        resolved.insert(
            constants::FIELD_TYPE.to_string(),
            Value::String(reference.kind.clone()),
        );
        return resolved;
    };

    if let Some(attributes) = &target.attributes {
        resolved.extend(attributes.clone());
    }
    resolved.insert(constants::FIELD_ID.to_string(), reference.id.clone());
    resolved.insert(
        constants::FIELD_TYPE.to_string(),
        Value::String(reference.kind.clone()),
    );

    // one level deep: nested relationships contribute identifiers only
    for (name, relationship) in &target.relationships {
        let Some(linkage) = relationship.as_ref().and_then(|r| r.data.as_ref()) else {
            continue;
        };
        let ids = match linkage {
            Linkage::One(nested) => nested.id.clone(),
            Linkage::Many(nested) => Value::Array(nested.iter().map(|r| r.id.clone()).collect()),
        };
        resolved.insert(format!("{name}-{}", constants::FIELD_ID), ids);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resources(value: Value) -> Vec<Resource> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_included_owner_is_inlined() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "attributes": {"name": "Foo"},
            "relationships": {"owner": {"data": {"id": "u1", "type": "users"}}}
        }]));
        let included = resources(json!([{
            "id": "u1",
            "type": "users",
            "attributes": {"name": "Al"}
        }]));

        let records = normalize_resources(&data, &included);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({
                "name": "Foo",
                "id": "w1",
                "type": "widgets",
                "owner": {"name": "Al", "id": "u1", "type": "users"}
            })
        );
    }

    #[test]
    fn test_field_order_is_attributes_id_type_relationships() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "attributes": {"b": 1, "a": 2},
            "relationships": {"owner": {"data": {"id": "u1", "type": "users"}}}
        }]));

        let records = normalize_resources(&data, &[]);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "id", "type", "owner"]);
    }

    #[test]
    fn test_missing_include_keeps_bare_reference() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "relationships": {"owner": {"data": {"id": "u9", "type": "users"}}}
        }]));

        let records = normalize_resources(&data, &[]);
        assert_eq!(records[0]["owner"], json!({"id": "u9", "type": "users"}));
    }

    #[test]
    fn test_null_relationship_is_omitted() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "attributes": {},
            "relationships": {"owner": {"data": null}, "parent": null}
        }]));

        let records = normalize_resources(&data, &[]);
        assert_eq!(Value::Object(records[0].clone()), json!({"id": "w1", "type": "widgets"}));
    }

    #[test]
    fn test_relationship_array_keeps_order() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "relationships": {"tags": {"data": [
                {"id": "t2", "type": "tags"},
                {"id": "t1", "type": "tags"}
            ]}}
        }]));
        let included = resources(json!([{
            "id": "t1",
            "type": "tags",
            "attributes": {"name": "one"}
        }]));

        let records = normalize_resources(&data, &included);
        assert_eq!(
            records[0]["tags"],
            json!([
                {"id": "t2", "type": "tags"},
                {"name": "one", "id": "t1", "type": "tags"}
            ])
        );
    }

    #[test]
    fn test_nested_relationship_ids_one_level() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "relationships": {"workspace": {"data": {"id": "ws1", "type": "workspaces"}}}
        }]));
        let included = resources(json!([{
            "id": "ws1",
            "type": "workspaces",
            "attributes": {"name": "prod"},
            "relationships": {
                "environment": {"data": {"id": "env1", "type": "environments"}},
                "tags": {"data": [{"id": "t1", "type": "tags"}, {"id": "t2", "type": "tags"}]},
                "owner": {"data": null}
            }
        }]));

        let records = normalize_resources(&data, &included);
        assert_eq!(
            records[0]["workspace"],
            json!({
                "name": "prod",
                "id": "ws1",
                "type": "workspaces",
                "environment-id": "env1",
                "tags-id": ["t1", "t2"]
            })
        );
    }

    #[test]
    fn test_numeric_ids_match_string_includes() {
        let data = resources(json!([{
            "id": "w1",
            "type": "widgets",
            "relationships": {"owner": {"data": {"id": 5, "type": "users"}}}
        }]));
        let included = resources(json!([{"id": "5", "type": "users", "attributes": {"name": "N"}}]));

        let records = normalize_resources(&data, &included);
        assert_eq!(records[0]["owner"]["name"], json!("N"));
    }
}
