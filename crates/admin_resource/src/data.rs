//! The data-mapping layer seam and link targets.
//!
//! Entities reach the view layer as `serde_json::Value` records: a single
//! entity is a JSON object, a list of entities is a JSON array. The
//! [`DataLayer`] trait is the only way the view layer introspects them.

use serde::Serialize;
use serde_json::Value;

use crate::errors::Error;
use crate::resource::{KIND_KEY, RESOURCE_KIND};

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;

/// Marker stored under [`KIND_KEY`] in the admin registry's template view.
pub const ADMIN_KIND: &str = "admin";

/// Introspection of entity records provided by the data-mapping layer.
pub trait DataLayer: Send + Sync {
    /// The primary key of a single entity, if it has one.
    fn primary_key(&self, entity: &Value) -> Option<Value>;

    /// The entity's type name as declared by the mapping layer.
    fn type_name(&self, entity: &Value) -> Option<String>;

    fn field_value(&self, entity: &Value, field: &str) -> Value {
        entity.get(field).cloned().unwrap_or(Value::Null)
    }

    /// Primary keys of one entity or of every entity in a list.
    fn primary_keys(&self, entity_or_list: &Value) -> Vec<Value> {
        match entity_or_list {
            Value::Array(entities) => entities
                .iter()
                .filter_map(|entity| self.primary_key(entity))
                .collect(),
            Value::Object(_) => self.primary_key(entity_or_list).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Data layer reading records laid out by naming convention.
///
/// The primary key lives in the `id` field and the type name in `_type`,
/// unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionDataLayer {
    primary_key_field: String,
    type_field: String,
}

impl Default for ConventionDataLayer {
    fn default() -> Self {
        Self {
            primary_key_field: "id".to_string(),
            type_field: "_type".to_string(),
        }
    }
}

impl ConventionDataLayer {
    pub fn new(primary_key_field: impl Into<String>, type_field: impl Into<String>) -> Self {
        Self {
            primary_key_field: primary_key_field.into(),
            type_field: type_field.into(),
        }
    }

    /// Serializes `record` and stamps it with `type_name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the record cannot be serialized into
    /// a JSON object.
    pub fn to_entity<T: Serialize>(&self, type_name: &str, record: &T) -> Result<Value, Error> {
        let mut value = serde_json::to_value(record)?;
        match value.as_object_mut() {
            Some(map) => {
                map.insert(
                    self.type_field.clone(),
                    Value::String(type_name.to_string()),
                );
                Ok(value)
            }
            None => Err(Error::Serialization(serde::ser::Error::custom(format!(
                "entity {} must serialize to an object",
                type_name
            )))),
        }
    }
}

impl DataLayer for ConventionDataLayer {
    fn primary_key(&self, entity: &Value) -> Option<Value> {
        entity
            .get(&self.primary_key_field)
            .filter(|key| !key.is_null())
            .cloned()
    }

    fn type_name(&self, entity: &Value) -> Option<String> {
        entity
            .get(&self.type_field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Renders a key the way it appears in URLs and form values.
pub fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Something a URL can be built for.
#[derive(Debug, Clone, PartialEq)]
pub enum Linkable {
    /// The admin mount point itself.
    AdminRoot,
    /// A resource's index page.
    Resource(String),
    /// A single entity's page.
    Entity {
        type_name: String,
        primary_key: Value,
    },
    /// A literal URL used verbatim.
    Url(String),
}

impl Linkable {
    /// Classifies a template value.
    ///
    /// Strings are literal URLs, the admin and resource views are recognised
    /// by their kind marker, and any other object is treated as an entity.
    pub fn from_value(value: &Value, data: &dyn DataLayer) -> Option<Self> {
        match value {
            Value::String(url) => Some(Linkable::Url(url.clone())),
            Value::Object(map) => match map.get(KIND_KEY).and_then(Value::as_str) {
                Some(ADMIN_KIND) => Some(Linkable::AdminRoot),
                Some(RESOURCE_KIND) => map
                    .get("Name")
                    .and_then(Value::as_str)
                    .map(|name| Linkable::Resource(name.to_string())),
                _ => Linkable::entity(value, data),
            },
            _ => None,
        }
    }

    pub fn entity(entity: &Value, data: &dyn DataLayer) -> Option<Self> {
        Some(Linkable::Entity {
            type_name: data.type_name(entity)?,
            primary_key: data.primary_key(entity)?,
        })
    }

    /// The URL of this target under the admin mount `prefix`.
    pub fn url(&self, prefix: &str) -> String {
        match self {
            Linkable::AdminRoot => prefix.to_string(),
            Linkable::Resource(name) => join_path(prefix, &[name.as_str()]),
            Linkable::Entity {
                type_name,
                primary_key,
            } => {
                let type_segment = type_name.to_lowercase();
                let key_segment = display_key(primary_key);
                join_path(prefix, &[type_segment.as_str(), key_segment.as_str()])
            }
            Linkable::Url(url) => url.clone(),
        }
    }
}

/// Joins URL path segments under `prefix`, dropping empty segments and
/// duplicate slashes. The result is absolute when `prefix` is.
pub fn join_path(prefix: &str, segments: &[&str]) -> String {
    let joined = std::iter::once(prefix)
        .chain(segments.iter().copied())
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if prefix.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}
