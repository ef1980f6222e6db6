//! Serde model of the normalized (`application/vnd.api+json`) wire format.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One response page
#[derive(Debug, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub included: Vec<Resource>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(rename = "next-page", default)]
    pub next_page: Option<Value>,
}

/// Primary data of a page, classified by shape
#[derive(Debug)]
pub enum PrimaryData {
    Empty,
    One(Resource),
    Many(Vec<Resource>),
}

impl Document {
    /// Classifies `data`; null, `[]` and `{}` are all empty.
    ///
    /// # Errors
    /// Returns the deserialization error when an entry is not a resource object.
    pub fn primary_data(&self) -> Result<PrimaryData, serde_json::Error> {
        match &self.data {
            Value::Array(items) if items.is_empty() => Ok(PrimaryData::Empty),
            Value::Object(map) if map.is_empty() => Ok(PrimaryData::Empty),
            Value::Null => Ok(PrimaryData::Empty),
            Value::Array(_) => Vec::<Resource>::deserialize(&self.data).map(PrimaryData::Many),
            _ => Resource::deserialize(&self.data).map(PrimaryData::One),
        }
    }

    /// Whether `meta.pagination.next-page` announces another page
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.meta
            .as_ref()
            .and_then(|meta| meta.pagination.as_ref())
            .and_then(|pagination| pagination.next_page.as_ref())
            .is_some_and(|next| !next.is_null())
    }
}

/// A resource object, either primary or from the `included` side-table
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default)]
    pub relationships: IndexMap<String, Option<Relationship>>,
}

impl Resource {
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.kind.clone(), id_key(&self.id))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default, deserialize_with = "lenient_linkage")]
    pub data: Option<Linkage>,
}

/// Resource linkage of a relationship
#[derive(Debug, Clone)]
pub enum Linkage {
    Many(Vec<ResourceRef>),
    One(ResourceRef),
}

/// A `{type, id}` reference to another resource
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    pub id: Value,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResourceRef {
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.kind.clone(), id_key(&self.id))
    }
}

/// Reads linkage without failing the page: references lacking `id` or `type`
/// are dropped, and a malformed to-one linkage counts as absent.
fn lenient_linkage<'de, D>(deserializer: D) -> Result<Option<Linkage>, D::Error>
where
    D: Deserializer<'de>,
{
    let linkage = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(Linkage::Many(
            items
                .into_iter()
                .filter_map(|item| ResourceRef::deserialize(item).ok())
                .collect(),
        )),
        Some(item @ Value::Object(_)) => ResourceRef::deserialize(item).ok().map(Linkage::One),
        _ => None,
    };
    Ok(linkage)
}

/// Identifiers are compared by their string form, whether sent as strings or numbers
fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
