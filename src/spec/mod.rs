//! Schema document loading
//!
//! The document is parsed with `openapiv3`, then every operation is converted
//! into a reference-free [`model::Operation`] held by [`index::SchemaIndex`].

use crate::constants;

pub mod index;
pub mod model;
pub mod parser;
pub mod resolver;

pub use index::SchemaIndex;
pub use model::{Literal, Operation, ParameterLocation, ParameterSpec, SchemaKind, SchemaNode};
pub use parser::parse_openapi;

use crate::error::Error;
use openapiv3::{OpenAPI, Parameter, PathItem, ReferenceOr};
use std::collections::HashSet;

/// A helper type to iterate over all HTTP methods in a `PathItem`
pub type HttpMethodsIter<'a> = [(&'static str, &'a Option<openapiv3::Operation>); 8];

/// Creates an iterator over all HTTP methods and their operations in a `PathItem`
#[must_use]
pub const fn http_methods_iter(item: &PathItem) -> HttpMethodsIter<'_> {
    [
        (constants::HTTP_METHOD_GET, &item.get),
        (constants::HTTP_METHOD_POST, &item.post),
        (constants::HTTP_METHOD_PUT, &item.put),
        (constants::HTTP_METHOD_DELETE, &item.delete),
        (constants::HTTP_METHOD_PATCH, &item.patch),
        (constants::HTTP_METHOD_HEAD, &item.head),
        (constants::HTTP_METHOD_OPTIONS, &item.options),
        ("TRACE", &item.trace),
    ]
}

/// Maximum depth for resolving parameter references to prevent stack overflow
pub const MAX_REFERENCE_DEPTH: usize = 10;

const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// Resolves a parameter reference to its actual parameter definition
///
/// # Errors
/// Returns `SchemaInvalid` if:
/// - The reference format is invalid
/// - The referenced parameter doesn't exist
/// - Circular references are detected
/// - Maximum reference depth is exceeded
pub fn resolve_parameter_reference(spec: &OpenAPI, reference: &str) -> Result<Parameter, Error> {
    let mut visited = HashSet::new();
    resolve_parameter_reference_with_visited(spec, reference, &mut visited, 0)
}

fn resolve_parameter_reference_with_visited(
    spec: &OpenAPI,
    reference: &str,
    visited: &mut HashSet<String>,
    depth: usize,
) -> Result<Parameter, Error> {
    let invalid = |reason: String| Error::SchemaInvalid {
        operation: reference.to_string(),
        reason,
    };

    if depth >= MAX_REFERENCE_DEPTH {
        return Err(invalid(format!(
            "maximum reference depth ({MAX_REFERENCE_DEPTH}) exceeded"
        )));
    }

    if !visited.insert(reference.to_string()) {
        return Err(invalid("circular parameter reference".to_string()));
    }

    let param_name = reference
        .strip_prefix(PARAMETER_REF_PREFIX)
        .ok_or_else(|| invalid(format!("expected {PARAMETER_REF_PREFIX}{{name}}")))?;

    let param_ref = spec
        .components
        .as_ref()
        .and_then(|components| components.parameters.get(param_name))
        .ok_or_else(|| invalid(format!("parameter '{param_name}' not found in components")))?;

    match param_ref {
        ReferenceOr::Item(param) => Ok(param.clone()),
        ReferenceOr::Reference {
            reference: nested_ref,
        } => resolve_parameter_reference_with_visited(spec, nested_ref, visited, depth + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(parameters: &str) -> OpenAPI {
        let document = format!(
            "openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths: {{}}\ncomponents:\n  parameters:\n{parameters}"
        );
        serde_yaml::from_str(&document).unwrap()
    }

    #[test]
    fn test_resolves_nested_parameter_reference() {
        let spec = spec(
            "    Alias:\n      $ref: '#/components/parameters/Account'\n    Account:\n      name: account\n      in: query\n      schema:\n        type: string\n",
        );
        let parameter =
            resolve_parameter_reference(&spec, "#/components/parameters/Alias").unwrap();
        assert!(matches!(parameter, Parameter::Query { parameter_data, .. } if parameter_data.name == "account"));
    }

    #[test]
    fn test_circular_parameter_reference_fails() {
        let spec = spec(
            "    A:\n      $ref: '#/components/parameters/B'\n    B:\n      $ref: '#/components/parameters/A'\n",
        );
        let result = resolve_parameter_reference(&spec, "#/components/parameters/A");
        assert!(matches!(result, Err(Error::SchemaInvalid { reason, .. }) if reason.contains("circular")));
    }

    #[test]
    fn test_invalid_parameter_reference_format() {
        let spec = spec("    A:\n      name: a\n      in: query\n      schema:\n        type: string\n");
        assert!(resolve_parameter_reference(&spec, "#/components/schemas/A").is_err());
    }
}
