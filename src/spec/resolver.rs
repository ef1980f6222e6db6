//! Conversion of `openapiv3` schemas into reference-free [`SchemaNode`] trees.

use crate::spec::model::{Literal, SchemaKind, SchemaNode};
use openapiv3::{OpenAPI, ReferenceOr, Schema, Type};
use serde_json::Value;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Resolves `#/components/schemas` references while converting schemas
///
/// The resolver tracks the chain of components currently being expanded. A
/// reference back into that chain is loaded as an untyped node so that
/// self-referential schemas terminate.
pub struct SchemaResolver<'a> {
    spec: &'a OpenAPI,
    visiting: Vec<String>,
}

impl<'a> SchemaResolver<'a> {
    #[must_use]
    pub const fn new(spec: &'a OpenAPI) -> Self {
        Self {
            spec,
            visiting: Vec::new(),
        }
    }

    pub fn resolve(&mut self, schema: &ReferenceOr<Schema>) -> SchemaNode {
        match schema {
            ReferenceOr::Item(schema) => self.convert(schema),
            ReferenceOr::Reference { reference } => self.resolve_reference(reference),
        }
    }

    pub fn resolve_boxed(&mut self, schema: &ReferenceOr<Box<Schema>>) -> SchemaNode {
        match schema {
            ReferenceOr::Item(schema) => self.convert(schema),
            ReferenceOr::Reference { reference } => self.resolve_reference(reference),
        }
    }

    fn resolve_reference(&mut self, reference: &str) -> SchemaNode {
        let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) else {
            tracing::warn!(reference, "unsupported schema reference, loading as untyped");
            return SchemaNode::new(SchemaKind::Untyped);
        };

        if self.visiting.iter().any(|visited| visited == name) {
            tracing::debug!(reference, "cyclic schema reference, loading as untyped");
            return SchemaNode::new(SchemaKind::Untyped);
        }

        let Some(target) = self
            .spec
            .components
            .as_ref()
            .and_then(|components| components.schemas.get(name))
        else {
            tracing::warn!(reference, "schema reference not found, loading as untyped");
            return SchemaNode::new(SchemaKind::Untyped);
        };

        self.visiting.push(name.to_string());
        let node = self.resolve(target);
        self.visiting.pop();
        node
    }

    fn convert(&mut self, schema: &Schema) -> SchemaNode {
        let mut node = match &schema.schema_kind {
            openapiv3::SchemaKind::Type(type_val) => self.convert_type(type_val),
            openapiv3::SchemaKind::AllOf { all_of } => self.merge_all_of(all_of),
            openapiv3::SchemaKind::OneOf { one_of } => self.first_variant(one_of),
            openapiv3::SchemaKind::AnyOf { any_of } => self.first_variant(any_of),
            openapiv3::SchemaKind::Not { .. } => SchemaNode::new(SchemaKind::Untyped),
            openapiv3::SchemaKind::Any(any) => serde_json::to_value(any)
                .map_or_else(|_| SchemaNode::new(SchemaKind::Untyped), |value| {
                    self.convert_json(&value)
                }),
        };

        node.read_only |= schema.schema_data.read_only;
        if node.description.is_none() {
            node.description.clone_from(&schema.schema_data.description);
        }
        node
    }

    fn convert_type(&mut self, type_val: &Type) -> SchemaNode {
        match type_val {
            Type::String(string_type) => {
                let values = string_type
                    .enumeration
                    .iter()
                    .map(|v| v.clone().map_or(Literal::Null, Literal::String))
                    .collect();
                with_enumeration(SchemaNode::string(), values)
            }
            Type::Integer(integer_type) => {
                let values = integer_type
                    .enumeration
                    .iter()
                    .map(|v| v.map_or(Literal::Null, Literal::Int))
                    .collect();
                with_enumeration(SchemaNode::new(SchemaKind::Integer), values)
            }
            Type::Number(_) => SchemaNode::new(SchemaKind::Number),
            Type::Boolean(_) => SchemaNode::new(SchemaKind::Boolean),
            Type::Object(object_type) => {
                let mut node = SchemaNode::object();
                for (name, property) in &object_type.properties {
                    let child = self.resolve_boxed(property);
                    node.properties.insert(name.clone(), child);
                }
                node.required.extend(object_type.required.iter().cloned());
                node
            }
            Type::Array(array_type) => {
                let items = array_type.items.as_ref().map_or_else(
                    || SchemaNode::new(SchemaKind::Untyped),
                    |items| self.resolve_boxed(items),
                );
                SchemaNode::array(items)
            }
        }
    }

    /// Merges the object parts of an `allOf`; a lone part is returned as is.
    fn merge_all_of(&mut self, parts: &[ReferenceOr<Schema>]) -> SchemaNode {
        let mut resolved = parts.iter().map(|part| self.resolve(part)).collect::<Vec<_>>();
        if resolved.len() == 1 {
            return resolved.remove(0);
        }

        let mut merged = SchemaNode::object();
        for part in resolved {
            if part.kind != SchemaKind::Object {
                continue;
            }
            merged.properties.extend(part.properties);
            merged.required.extend(part.required);
            merged.read_only |= part.read_only;
            if merged.description.is_none() {
                merged.description = part.description;
            }
        }
        merged
    }

    fn first_variant(&mut self, variants: &[ReferenceOr<Schema>]) -> SchemaNode {
        variants.first().map_or_else(
            || SchemaNode::new(SchemaKind::Untyped),
            |variant| self.resolve(variant),
        )
    }

    /// Converts a schema that `openapiv3` could not classify, from its JSON form.
    fn convert_json(&mut self, value: &Value) -> SchemaNode {
        if let Some(parts) = sub_schemas(value, "allOf") {
            return self.merge_all_of(&parts);
        }
        if let Some(parts) = sub_schemas(value, "oneOf").or_else(|| sub_schemas(value, "anyOf")) {
            return self.first_variant(&parts);
        }

        let properties = value.get("properties").and_then(Value::as_object);
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(name) => SchemaKind::from_type_name(name),
            None if properties.is_some() => SchemaKind::Object,
            None => SchemaKind::Untyped,
        };

        let mut node = if kind == SchemaKind::Array {
            let items = value
                .get("items")
                .and_then(|items| serde_json::from_value::<ReferenceOr<Schema>>(items.clone()).ok())
                .map_or_else(|| SchemaNode::new(SchemaKind::Untyped), |items| self.resolve(&items));
            SchemaNode::array(items)
        } else {
            SchemaNode::new(kind)
        };

        for (name, property) in properties.into_iter().flatten() {
            let child = serde_json::from_value::<ReferenceOr<Schema>>(property.clone())
                .map_or_else(|_| SchemaNode::new(SchemaKind::Untyped), |p| self.resolve(&p));
            node.properties.insert(name.clone(), child);
        }

        if let Some(required) = value.get("required").and_then(Value::as_array) {
            node.required
                .extend(required.iter().filter_map(Value::as_str).map(str::to_string));
        }

        if let Some(values) = value.get("enum").and_then(Value::as_array) {
            node = with_enumeration(node, values.iter().map(Literal::from_json).collect());
        }

        node
    }
}

fn with_enumeration(node: SchemaNode, values: Vec<Literal>) -> SchemaNode {
    if values.is_empty() {
        node
    } else {
        node.with_enum(values)
    }
}

fn sub_schemas(value: &Value, keyword: &str) -> Option<Vec<ReferenceOr<Schema>>> {
    value
        .get(keyword)
        .and_then(|parts| serde_json::from_value(parts.clone()).ok())
        .filter(|parts: &Vec<ReferenceOr<Schema>>| !parts.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_components(components: &str) -> OpenAPI {
        let document = format!(
            "openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths: {{}}\ncomponents:\n  schemas:\n{components}"
        );
        serde_yaml::from_str(&document).unwrap()
    }

    fn schema(yaml: &str) -> ReferenceOr<Schema> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_resolves_component_reference() {
        let spec = spec_with_components(
            "    Widget:\n      type: object\n      required: [name]\n      properties:\n        name:\n          type: string\n",
        );
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema("$ref: '#/components/schemas/Widget'"));

        assert_eq!(node.kind, SchemaKind::Object);
        assert!(node.is_required("name"));
        assert_eq!(node.properties["name"].kind, SchemaKind::String);
    }

    #[test]
    fn test_cyclic_reference_becomes_untyped() {
        let spec = spec_with_components(
            "    Node:\n      type: object\n      properties:\n        parent:\n          $ref: '#/components/schemas/Node'\n",
        );
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema("$ref: '#/components/schemas/Node'"));

        assert_eq!(node.properties["parent"].kind, SchemaKind::Untyped);
    }

    #[test]
    fn test_missing_reference_becomes_untyped() {
        let spec = spec_with_components("    Other:\n      type: string\n");
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema("$ref: '#/components/schemas/Nope'"));
        assert_eq!(node.kind, SchemaKind::Untyped);
    }

    #[test]
    fn test_array_of_objects_loads_as_relationship_array() {
        let spec = spec_with_components("    Other:\n      type: string\n");
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema(
            "type: array\nitems:\n  type: object\n  properties:\n    id:\n      type: string\n",
        ));
        assert_eq!(node.kind, SchemaKind::RelationshipArray);
    }

    #[test]
    fn test_enum_and_read_only_are_kept() {
        let spec = spec_with_components("    Other:\n      type: string\n");
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema("type: string\nreadOnly: true\nenum: [workspaces]\n"));

        assert!(node.read_only);
        assert_eq!(
            node.single_enum_value(),
            Some(&Literal::String("workspaces".to_string()))
        );
    }

    #[test]
    fn test_all_of_merges_object_parts() {
        let spec = spec_with_components(
            "    Base:\n      type: object\n      required: [id]\n      properties:\n        id:\n          type: string\n",
        );
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema(
            "allOf:\n  - $ref: '#/components/schemas/Base'\n  - type: object\n    properties:\n      name:\n        type: string\n",
        ));

        assert_eq!(node.kind, SchemaKind::Object);
        assert!(node.is_required("id"));
        assert_eq!(
            node.properties.keys().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
    }

    #[test]
    fn test_untyped_schema_with_properties_is_object() {
        let spec = spec_with_components("    Other:\n      type: string\n");
        let mut resolver = SchemaResolver::new(&spec);
        let node = resolver.resolve(&schema(
            "properties:\n  name:\n    type: string\nrequired: [name]\n",
        ));

        assert_eq!(node.kind, SchemaKind::Object);
        assert!(node.is_required("name"));
    }
}
