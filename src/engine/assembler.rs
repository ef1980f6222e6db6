use crate::constants;
use crate::engine::builder::{BodyField, CommandSchema, Condition, FlagKind, SourceLocation};
use crate::error::Error;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw flag values as typed by the user, keyed by flag name
pub type FlagValues = BTreeMap<String, String>;

/// Where the request body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// Built from flag values following the body plan
    Flags,
    /// Sent verbatim, bypassing body flags
    Raw(String),
}

/// A request ready for the paging driver
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: String,
    /// URI template with path parameters substituted
    pub path: String,
    /// Query parameters with their declared wire names
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

/// Assembles the outbound request from flag values
///
/// Empty values count as unset. Required flags are checked before anything
/// else so no request is ever built with a missing value.
///
/// # Errors
/// - `MissingRequiredFlags` with the sorted names of every missing flag
/// - `InvalidFlagValue` when a boolean or integer flag cannot be parsed
pub fn assemble(
    schema: &CommandSchema,
    values: &FlagValues,
    body_source: BodySource,
) -> Result<PreparedRequest, Error> {
    let value_of = |name: &str| values.get(name).map(String::as_str).filter(|v| !v.is_empty());

    let raw_body = matches!(body_source, BodySource::Raw(_));
    let mut missing: Vec<String> = schema
        .required_flags()
        .filter(|flag| !(raw_body && flag.source.is_body()))
        .filter(|flag| value_of(flag.name.as_str()).is_none())
        .map(|flag| flag.name.clone())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(Error::MissingRequiredFlags { names: missing });
    }

    let mut path = schema.uri_template.clone();
    let mut query = Vec::new();
    for flag in schema.flags.values() {
        let Some(value) = value_of(flag.name.as_str()) else {
            continue;
        };
        match &flag.source {
            SourceLocation::Query(wire_name) => query.push((wire_name.clone(), value.to_string())),
            SourceLocation::Path(wire_name) => {
                path = path.replacen(
                    &format!("{{{wire_name}}}"),
                    &urlencoding::encode(value),
                    1,
                );
            }
            SourceLocation::Body(_) => {}
        }
    }

    let body = match body_source {
        BodySource::Raw(payload) => Some(payload),
        BodySource::Flags if schema.has_body && !schema.body_plan.is_empty() => {
            let document = build_body(&schema.body_plan, &value_of)?;
            Some(serde_json::to_string(&document)?)
        }
        BodySource::Flags => None,
    };

    Ok(PreparedRequest {
        method: schema.method.clone(),
        path,
        query,
        body,
        content_type: schema.content_type.clone(),
    })
}

fn build_body<'v>(
    plan: &[BodyField],
    value_of: &impl Fn(&str) -> Option<&'v str>,
) -> Result<Value, Error> {
    let mut document = Value::Object(Map::new());

    for field in plan {
        match field {
            BodyField::Constant { path, value, when } => {
                let emit = match when {
                    Condition::Always => true,
                    Condition::FlagSet(flag) => value_of(flag.as_str()).is_some(),
                };
                if emit {
                    set_path(&mut document, path, value.to_json());
                }
            }
            BodyField::Value { flag, path, kind } => {
                if let Some(raw) = value_of(flag.as_str()) {
                    set_path(&mut document, path, coerce(flag, raw, *kind)?);
                }
            }
            BodyField::Relationship {
                flag,
                path,
                type_literal,
            } => {
                if let Some(raw) = value_of(flag.as_str()) {
                    let references = split_list(raw)
                        .map(|id| {
                            let mut reference = Map::new();
                            reference.insert(constants::FIELD_ID.to_string(), Value::from(id));
                            if let Some(literal) = type_literal {
                                reference.insert(constants::FIELD_TYPE.to_string(), literal.to_json());
                            }
                            Value::Object(reference)
                        })
                        .collect();
                    set_path(&mut document, path, Value::Array(references));
                }
            }
        }
    }

    Ok(document)
}

/// Converts a raw flag value into its JSON form
fn coerce(flag: &str, raw: &str, kind: FlagKind) -> Result<Value, Error> {
    let invalid = |expected: &str| Error::InvalidFlagValue {
        flag: flag.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    };

    match kind {
        FlagKind::String => Ok(Value::from(raw)),
        FlagKind::Boolean => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| invalid("a boolean (true/false)")),
        FlagKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("an integer")),
        FlagKind::List | FlagKind::RelationshipList => {
            Ok(Value::Array(split_list(raw).map(Value::from).collect()))
        }
    }
}

/// Accepts the spellings commonly used on command lines
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Writes `value` at `path`, creating intermediate objects as needed
fn set_path(document: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = document;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(last.clone(), value);
    }
}

/// Fills empty `account` / `account-id` flags with the configured account
pub fn apply_default_account(schema: &CommandSchema, values: &mut FlagValues, account: Option<&str>) {
    let Some(account) = account.filter(|a| !a.is_empty()) else {
        return;
    };

    for name in [constants::FLAG_ACCOUNT, constants::FLAG_ACCOUNT_ID] {
        if schema.flags.contains_key(name) {
            let value = values.entry(name.to_string()).or_default();
            if value.is_empty() {
                value.push_str(account);
            }
        }
    }
}
