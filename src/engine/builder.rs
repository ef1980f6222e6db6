//! Derivation of a flat, typed flag set from an operation.
//!
//! The builder also emits the body plan: one entry per value that ends up in
//! the JSON body, in the order the schema declares them. The assembler
//! consumes that plan verbatim, so the two can never disagree about where a
//! flag goes.

use crate::constants;
use crate::engine::naming::{sanitize_parameter_name, shorten_flag_name};
use crate::engine::required::collect_required;
use crate::error::Error;
use crate::spec::model::{Literal, Operation, ParameterLocation, SchemaKind, SchemaNode};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

/// Value type accepted by a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Boolean,
    Integer,
    /// Comma-separated list of plain values
    List,
    /// Comma-separated list of related resource identifiers
    RelationshipList,
}

impl FlagKind {
    /// Placeholder shown in help output
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::List | Self::RelationshipList => "LIST",
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List | Self::RelationshipList)
    }

    const fn from_leaf(kind: SchemaKind) -> Option<Self> {
        match kind {
            SchemaKind::String => Some(Self::String),
            SchemaKind::Boolean => Some(Self::Boolean),
            SchemaKind::Integer => Some(Self::Integer),
            SchemaKind::Array => Some(Self::List),
            SchemaKind::RelationshipArray => Some(Self::RelationshipList),
            SchemaKind::Object | SchemaKind::Number | SchemaKind::Untyped => None,
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Where the value of a flag is placed in the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Query parameter, by its declared wire name
    Query(String),
    /// URI template slot, by its declared wire name
    Path(String),
    /// JSON body path
    Body(Vec<String>),
}

impl SourceLocation {
    #[must_use]
    pub const fn is_body(&self) -> bool {
        matches!(self, Self::Body(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: String,
    pub kind: FlagKind,
    pub required: bool,
    pub enumeration: Option<Vec<Literal>>,
    pub source: SourceLocation,
    pub description: Option<String>,
}

/// When a constant body value is emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Only once the named flag has a non-empty value
    FlagSet(String),
}

/// One entry of the body plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyField {
    /// A flag value written at `path`, coerced according to `kind`
    Value {
        flag: String,
        path: Vec<String>,
        kind: FlagKind,
    },
    /// A comma-separated flag expanded into `[{id, type}]` at `path`
    Relationship {
        flag: String,
        path: Vec<String>,
        type_literal: Option<Literal>,
    },
    /// A literal fixed by the schema
    Constant {
        path: Vec<String>,
        value: Literal,
        when: Condition,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Body flags are never enforced as required
    pub relax_required: bool,
}

/// Everything needed to parse flags for, and assemble a request of, one operation
#[derive(Debug)]
pub struct CommandSchema {
    pub operation_id: String,
    pub method: String,
    pub uri_template: String,
    pub content_type: Option<String>,
    /// Flags keyed by name, sorted by name
    pub flags: IndexMap<String, FlagSpec>,
    pub body_plan: Vec<BodyField>,
    pub has_body: bool,
    /// Per-field and per-operation anomalies that were tolerated
    pub diagnostics: Vec<Error>,
}

impl CommandSchema {
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.get(name)
    }

    pub fn required_flags(&self) -> impl Iterator<Item = &FlagSpec> {
        self.flags.values().filter(|flag| flag.required)
    }
}

/// Builds the command schema of an operation
///
/// # Errors
/// Returns `DuplicateFlag` when two parameters or body fields map onto the
/// same flag name.
pub fn build_command_schema(
    operation: &Operation,
    options: &BuildOptions,
) -> Result<CommandSchema, Error> {
    let mut builder = Builder {
        operation_id: &operation.id,
        options: *options,
        required: BTreeSet::new(),
        flags: IndexMap::new(),
        body_plan: Vec::new(),
        diagnostics: Vec::new(),
    };

    builder.add_parameters(operation)?;

    if let Some(body) = &operation.request_body {
        match &body.schema {
            Some(schema) if schema.kind == SchemaKind::Object => {
                builder.required = collect_required(schema);
                builder.walk_body(schema, &[])?;
            }
            Some(schema) => builder.diagnostics.push(Error::SchemaInvalid {
                operation: operation.id.clone(),
                reason: format!("request body schema is '{}', expected an object", schema.kind),
            }),
            None => builder.diagnostics.push(Error::SchemaInvalid {
                operation: operation.id.clone(),
                reason: format!("content type '{}' declares no schema", body.content_type),
            }),
        }
    }

    let Builder {
        mut flags,
        body_plan,
        diagnostics,
        ..
    } = builder;
    flags.sort_keys();

    Ok(CommandSchema {
        operation_id: operation.id.clone(),
        method: operation.method.clone(),
        uri_template: operation.uri_template.clone(),
        content_type: operation
            .request_body
            .as_ref()
            .map(|body| body.content_type.clone()),
        flags,
        body_plan,
        has_body: operation.request_body.is_some(),
        diagnostics,
    })
}

struct Builder<'a> {
    operation_id: &'a str,
    options: BuildOptions,
    required: BTreeSet<String>,
    flags: IndexMap<String, FlagSpec>,
    body_plan: Vec<BodyField>,
    diagnostics: Vec<Error>,
}

impl Builder<'_> {
    fn insert_flag(&mut self, flag: FlagSpec) -> Result<(), Error> {
        if self.flags.contains_key(&flag.name) {
            return Err(Error::DuplicateFlag {
                operation: self.operation_id.to_string(),
                name: flag.name,
            });
        }
        self.flags.insert(flag.name.clone(), flag);
        Ok(())
    }

    fn add_parameters(&mut self, operation: &Operation) -> Result<(), Error> {
        for parameter in &operation.parameters {
            if constants::IGNORED_PARAMETERS.contains(&parameter.name.as_str()) {
                continue;
            }

            let kind = parameter
                .schema
                .as_ref()
                .and_then(|schema| FlagKind::from_leaf(schema.kind))
                .map(|kind| {
                    if kind == FlagKind::RelationshipList {
                        FlagKind::List
                    } else {
                        kind
                    }
                });
            let Some(kind) = kind else {
                let schema_kind = parameter
                    .schema
                    .as_ref()
                    .map_or(SchemaKind::Untyped, |schema| schema.kind);
                self.diagnostics.push(Error::UnsupportedFieldType {
                    field: parameter.name.clone(),
                    kind: schema_kind.to_string(),
                });
                continue;
            };

            let source = match parameter.location {
                ParameterLocation::Query => SourceLocation::Query(parameter.name.clone()),
                ParameterLocation::Path => SourceLocation::Path(parameter.name.clone()),
            };

            self.insert_flag(FlagSpec {
                name: sanitize_parameter_name(&parameter.name),
                kind,
                required: parameter.required,
                enumeration: parameter
                    .schema
                    .as_ref()
                    .and_then(SchemaNode::effective_enum)
                    .map(<[Literal]>::to_vec),
                source,
                description: parameter.description.clone(),
            })?;
        }
        Ok(())
    }

    fn is_required(&self, dashed: &str) -> bool {
        self.required.contains(dashed)
    }

    fn walk_body(&mut self, node: &SchemaNode, prefix: &[String]) -> Result<(), Error> {
        for (name, property) in &node.properties {
            if property.read_only {
                continue;
            }

            let mut path = prefix.to_vec();
            path.push(name.clone());
            let dashed = path.join("-");

            // the payload identifier is assigned by the server
            if dashed == "data-id" {
                continue;
            }

            match property.kind {
                SchemaKind::Object => self.walk_body(property, &path)?,
                SchemaKind::RelationshipArray => self.add_relationship_list(property, path, &dashed)?,
                SchemaKind::Number | SchemaKind::Untyped => {
                    self.diagnostics.push(Error::UnsupportedFieldType {
                        field: dashed,
                        kind: property.kind.to_string(),
                    });
                }
                SchemaKind::String | SchemaKind::Boolean | SchemaKind::Integer | SchemaKind::Array => {
                    if dashed.starts_with("data-relationships-") {
                        self.add_relationship_leaf(name, property, path, &dashed)?;
                    } else {
                        self.add_leaf(property, path, &dashed)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn add_leaf(&mut self, node: &SchemaNode, path: Vec<String>, dashed: &str) -> Result<(), Error> {
        let required = self.is_required(dashed);

        if required {
            if let Some(value) = node.single_enum_value() {
                self.body_plan.push(BodyField::Constant {
                    path,
                    value: value.clone(),
                    when: Condition::Always,
                });
                return Ok(());
            }
        }

        let Some(kind) = FlagKind::from_leaf(node.kind) else {
            return Ok(());
        };
        let name = shorten_flag_name(dashed);

        self.insert_flag(FlagSpec {
            name: name.clone(),
            kind,
            required: required && !self.options.relax_required,
            enumeration: node.effective_enum().map(<[Literal]>::to_vec),
            source: SourceLocation::Body(path.clone()),
            description: node.description.clone(),
        })?;
        self.body_plan.push(BodyField::Value {
            flag: name,
            path,
            kind,
        });
        Ok(())
    }

    /// Leaves below the relationships container: identifiers become flags and
    /// a single-valued `type` is injected alongside its identifier. An optional
    /// identifier, or any identifier under relaxed enforcement, only carries its
    /// `type` once the identifier flag is given.
    fn add_relationship_leaf(
        &mut self,
        name: &str,
        node: &SchemaNode,
        path: Vec<String>,
        dashed: &str,
    ) -> Result<(), Error> {
        if name == constants::FIELD_ID {
            return self.add_leaf(node, path, dashed);
        }

        if name == constants::FIELD_TYPE {
            if let Some(value) = node.single_enum_value() {
                let when = if self.is_required(dashed) && !self.options.relax_required {
                    Condition::Always
                } else {
                    let parent = &path[..path.len() - 1];
                    let sibling = format!("{}-{}", parent.join("-"), constants::FIELD_ID);
                    Condition::FlagSet(shorten_flag_name(&sibling))
                };
                self.body_plan.push(BodyField::Constant {
                    path,
                    value: value.clone(),
                    when,
                });
                return Ok(());
            }
        }

        tracing::trace!(field = dashed, "ignoring relationship field");
        Ok(())
    }

    fn add_relationship_list(
        &mut self,
        node: &SchemaNode,
        path: Vec<String>,
        dashed: &str,
    ) -> Result<(), Error> {
        let id_path = format!("{dashed}-{}", constants::FIELD_ID);
        let name = shorten_flag_name(&id_path);
        let required = self.is_required(&id_path);
        let type_literal = node
            .items
            .as_deref()
            .and_then(|items| items.properties.get(constants::FIELD_TYPE))
            .and_then(SchemaNode::single_enum_value)
            .cloned();

        self.insert_flag(FlagSpec {
            name: name.clone(),
            kind: FlagKind::RelationshipList,
            required: required && !self.options.relax_required,
            enumeration: None,
            source: SourceLocation::Body(path.clone()),
            description: node.description.clone(),
        })?;
        self.body_plan.push(BodyField::Relationship {
            flag: name,
            path,
            type_literal,
        });
        Ok(())
    }
}
