use crate::constants;
use crate::engine::naming::normalize_operation_id;
use crate::error::Error;
use crate::spec::model::{Operation, ParameterLocation, ParameterSpec, RequestBodySpec};
use crate::spec::resolver::SchemaResolver;
use crate::spec::{http_methods_iter, parse_openapi, resolve_parameter_reference};
use openapiv3::{OpenAPI, Parameter, ParameterSchemaOrContent, PathItem, ReferenceOr, RequestBody};
use std::collections::BTreeMap;

const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";

/// Every operation of a schema document, keyed by normalized identifier
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    operations: BTreeMap<String, Operation>,
}

impl SchemaIndex {
    /// Parses a schema document and indexes its operations
    ///
    /// # Errors
    /// Returns `SchemaUnavailable` when the document cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let spec = parse_openapi(content)?;
        Ok(Self::from_openapi(&spec))
    }

    /// Indexes the operations of an already parsed document
    ///
    /// Operations without an `operationId` are skipped. When two operations
    /// normalize to the same identifier, the first one in document order wins.
    #[must_use]
    pub fn from_openapi(spec: &OpenAPI) -> Self {
        let mut operations = BTreeMap::new();
        let mut resolver = SchemaResolver::new(spec);

        for (path, path_item) in &spec.paths.paths {
            let ReferenceOr::Item(item) = path_item else {
                tracing::debug!(path, "skipping referenced path item");
                continue;
            };

            for (method, operation) in http_methods_iter(item) {
                let Some(operation) = operation else {
                    continue;
                };
                let Some(raw_id) = operation.operation_id.as_deref() else {
                    tracing::debug!(method, path, "skipping operation without operationId");
                    continue;
                };

                let id = normalize_operation_id(raw_id);
                if operations.contains_key(&id) {
                    tracing::warn!(operation = %id, "duplicate operation id, keeping the first");
                    continue;
                }

                let loaded = Operation {
                    id: id.clone(),
                    method: method.to_string(),
                    uri_template: path.clone(),
                    parameters: collect_parameters(spec, item, operation, &mut resolver),
                    request_body: operation
                        .request_body
                        .as_ref()
                        .and_then(|body| resolve_request_body(spec, body))
                        .and_then(|body| select_body(&body, &mut resolver)),
                    summary: operation.summary.clone(),
                    description: operation.description.clone(),
                    group: operation_group(operation),
                };
                operations.insert(id, loaded);
            }
        }

        tracing::debug!(count = operations.len(), "indexed operations");
        Self { operations }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.operations.get(id)
    }

    /// Looks up an operation by identifier
    ///
    /// # Errors
    /// Returns `UnknownCommand` when no operation has that identifier.
    pub fn operation(&self, id: &str) -> Result<&Operation, Error> {
        self.get(id).ok_or_else(|| Error::UnknownCommand {
            name: id.to_string(),
        })
    }

    /// Operations sorted by identifier
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Operations grouped by resource, both levels sorted by name
    #[must_use]
    pub fn groups(&self) -> BTreeMap<&str, Vec<&Operation>> {
        let mut groups: BTreeMap<&str, Vec<&Operation>> = BTreeMap::new();
        for operation in self.operations.values() {
            groups
                .entry(operation.group.as_str())
                .or_default()
                .push(operation);
        }
        groups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Merges path-level and operation-level parameters; the operation wins on conflicts.
fn collect_parameters(
    spec: &OpenAPI,
    item: &PathItem,
    operation: &openapiv3::Operation,
    resolver: &mut SchemaResolver<'_>,
) -> Vec<ParameterSpec> {
    let mut parameters: Vec<ParameterSpec> = Vec::new();

    for parameter_ref in item.parameters.iter().chain(&operation.parameters) {
        let parameter = match parameter_ref {
            ReferenceOr::Item(parameter) => parameter.clone(),
            ReferenceOr::Reference { reference } => {
                match resolve_parameter_reference(spec, reference) {
                    Ok(parameter) => parameter,
                    Err(e) => {
                        tracing::warn!(reference, error = %e, "skipping unresolved parameter");
                        continue;
                    }
                }
            }
        };

        let Some(spec_parameter) = convert_parameter(&parameter, resolver) else {
            continue;
        };

        if let Some(existing) = parameters.iter_mut().find(|p| {
            p.name == spec_parameter.name && p.location == spec_parameter.location
        }) {
            *existing = spec_parameter;
        } else {
            parameters.push(spec_parameter);
        }
    }

    parameters
}

fn convert_parameter(
    parameter: &Parameter,
    resolver: &mut SchemaResolver<'_>,
) -> Option<ParameterSpec> {
    let (data, location) = match parameter {
        Parameter::Query { parameter_data, .. } => (parameter_data, ParameterLocation::Query),
        Parameter::Path { parameter_data, .. } => (parameter_data, ParameterLocation::Path),
        Parameter::Header { .. } | Parameter::Cookie { .. } => return None,
    };

    let schema = match &data.format {
        ParameterSchemaOrContent::Schema(schema) => Some(resolver.resolve(schema)),
        ParameterSchemaOrContent::Content(_) => None,
    };

    Some(ParameterSpec {
        name: data.name.clone(),
        location,
        required: data.required || location == ParameterLocation::Path,
        schema,
        description: data.description.clone(),
    })
}

fn resolve_request_body(spec: &OpenAPI, body: &ReferenceOr<RequestBody>) -> Option<RequestBody> {
    match body {
        ReferenceOr::Item(body) => Some(body.clone()),
        ReferenceOr::Reference { reference } => {
            let resolved = reference
                .strip_prefix(REQUEST_BODY_REF_PREFIX)
                .and_then(|name| spec.components.as_ref()?.request_bodies.get(name));
            match resolved {
                Some(ReferenceOr::Item(body)) => Some(body.clone()),
                _ => {
                    tracing::warn!(reference, "request body reference not resolved");
                    None
                }
            }
        }
    }
}

/// Picks the body content: the normalized wire format first, then plain JSON,
/// then whatever is listed first.
fn select_body(body: &RequestBody, resolver: &mut SchemaResolver<'_>) -> Option<RequestBodySpec> {
    let (content_type, media) = body
        .content
        .get_key_value(constants::CONTENT_TYPE_JSON_API)
        .or_else(|| body.content.get_key_value(constants::CONTENT_TYPE_JSON))
        .or_else(|| body.content.first())?;

    Some(RequestBodySpec {
        content_type: content_type.clone(),
        schema: media.schema.as_ref().map(|schema| resolver.resolve(schema)),
    })
}

/// Resource group from the `x-resource` extension, else the title-cased first tag
fn operation_group(operation: &openapiv3::Operation) -> String {
    operation
        .extensions
        .get(constants::EXT_RESOURCE)
        .and_then(serde_json::Value::as_str)
        .filter(|resource| !resource.trim().is_empty())
        .map(str::to_string)
        .or_else(|| operation.tags.first().map(|tag| title_case(tag)))
        .unwrap_or_else(|| constants::DEFAULT_GROUP.to_string())
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
