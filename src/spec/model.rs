//! Loaded, reference-free view of the operations in a schema document.

use crate::constants;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// A literal value from a schema `enum`, decided once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<Literal>),
    Null,
}

impl Literal {
    /// Converts a raw JSON value into a literal.
    ///
    /// Numbers that do not fit an `i64` and objects are kept in their
    /// textual JSON form.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::String(n.to_string()), Self::Int),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => Self::String(value.to_string()),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Null => Value::Null,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            Self::Null => write!(f, "null"),
        }
    }
}

/// Type tag of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    /// An array whose items are objects; treated as a list of references.
    RelationshipArray,
    String,
    Boolean,
    Integer,
    Number,
    Untyped,
}

impl SchemaKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object => constants::SCHEMA_TYPE_OBJECT,
            Self::Array => constants::SCHEMA_TYPE_ARRAY,
            Self::RelationshipArray => "relationship",
            Self::String => constants::SCHEMA_TYPE_STRING,
            Self::Boolean => constants::SCHEMA_TYPE_BOOLEAN,
            Self::Integer => constants::SCHEMA_TYPE_INTEGER,
            Self::Number => constants::SCHEMA_TYPE_NUMBER,
            Self::Untyped => "untyped",
        }
    }

    /// Parses an `OpenAPI` `type` keyword.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            constants::SCHEMA_TYPE_OBJECT => Self::Object,
            constants::SCHEMA_TYPE_ARRAY => Self::Array,
            constants::SCHEMA_TYPE_STRING => Self::String,
            constants::SCHEMA_TYPE_BOOLEAN => Self::Boolean,
            constants::SCHEMA_TYPE_INTEGER => Self::Integer,
            constants::SCHEMA_TYPE_NUMBER => Self::Number,
            _ => Self::Untyped,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema fragment with all references already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub properties: IndexMap<String, SchemaNode>,
    pub items: Option<Box<SchemaNode>>,
    pub required: BTreeSet<String>,
    pub enumeration: Option<Vec<Literal>>,
    pub read_only: bool,
    pub description: Option<String>,
}

impl SchemaNode {
    #[must_use]
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            properties: IndexMap::new(),
            items: None,
            required: BTreeSet::new(),
            enumeration: None,
            read_only: false,
            description: None,
        }
    }

    #[must_use]
    pub fn object() -> Self {
        Self::new(SchemaKind::Object)
    }

    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    /// Builds an array node, classifying arrays of objects as relationship arrays.
    #[must_use]
    pub fn array(items: Self) -> Self {
        let kind = if items.kind == SchemaKind::Object {
            SchemaKind::RelationshipArray
        } else {
            SchemaKind::Array
        };
        Self {
            items: Some(Box::new(items)),
            ..Self::new(kind)
        }
    }

    #[must_use]
    pub fn property(mut self, name: &str, node: Self) -> Self {
        self.properties.insert(name.to_string(), node);
        self
    }

    #[must_use]
    pub fn require(mut self, name: &str) -> Self {
        self.required.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn with_enum(mut self, values: Vec<Literal>) -> Self {
        self.enumeration = Some(values);
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns the only enum value when exactly one is declared.
    #[must_use]
    pub fn single_enum_value(&self) -> Option<&Literal> {
        match self.enumeration.as_deref() {
            Some([only]) => Some(only),
            _ => None,
        }
    }

    /// Enum values of this node, or of its items for arrays.
    #[must_use]
    pub fn effective_enum(&self) -> Option<&[Literal]> {
        self.enumeration.as_deref().or_else(|| {
            self.items
                .as_deref()
                .and_then(|items| items.enumeration.as_deref())
        })
    }
}

/// Where a declared parameter is placed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// `None` when the parameter declares content instead of a schema
    pub schema: Option<SchemaNode>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodySpec {
    pub content_type: String,
    /// `None` when the content type declares no schema
    pub schema: Option<SchemaNode>,
}

/// One callable action of the schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Normalized identifier (underscores replaced by hyphens)
    pub id: String,
    pub method: String,
    pub uri_template: String,
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBodySpec>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub group: String,
}

impl Operation {
    /// Summary or description, whichever is available.
    #[must_use]
    pub fn about(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or(self.summary.as_deref())
            .unwrap_or_default()
    }
}
