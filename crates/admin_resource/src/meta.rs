//! Field descriptors.
//!
//! A [`Meta`] describes how one field of a resource is labelled, how its value
//! is read from an entity, which form widget renders it and who may see or
//! edit it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::DataLayer;
use crate::permission::Permission;
use crate::resource::Resource;

#[cfg(test)]
#[path = "meta_tests.rs"]
mod tests;

/// Extracts a field value from an entity.
pub type ValueFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Extracts the selectable options of a multi-valued field from an entity.
pub type CollectionFn = Arc<dyn Fn(&Value) -> Vec<SelectOption> + Send + Sync>;

/// The widget kind of a field.
///
/// Every kind has a stable tag which names its form sub-template
/// (`forms/<tag>.tmpl`) and is used when kinds are read from a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Text,
    Number,
    Checkbox,
    Password,
    Hidden,
    Date,
    Select,
    Collection,
    /// A nested struct rendered with its own resource's fields.
    Single,
    /// A repeated nested struct; each element is rendered with an index.
    Many,
    /// Any other tag, rendered only if a sub-template or renderer exists.
    Custom(String),
}

impl FieldKind {
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Password => "password",
            FieldKind::Hidden => "hidden",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Collection => "collection",
            FieldKind::Single => "single",
            FieldKind::Many => "many",
            FieldKind::Custom(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => FieldKind::String,
            "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "checkbox" => FieldKind::Checkbox,
            "password" => FieldKind::Password,
            "hidden" => FieldKind::Hidden,
            "date" => FieldKind::Date,
            "select" => FieldKind::Select,
            "collection" => FieldKind::Collection,
            "single" => FieldKind::Single,
            "many" => FieldKind::Many,
            other => FieldKind::Custom(other.to_string()),
        }
    }

    /// Whether fields of this kind carry a nested resource.
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldKind::Single | FieldKind::Many)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        FieldKind::from_tag(&tag)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.tag().to_string()
    }
}

/// One selectable option of a select or collection field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Rendering and access descriptor of a single field.
#[derive(Clone)]
pub struct Meta {
    owner: String,
    name: String,
    kind: FieldKind,
    label: String,
    value: Option<ValueFn>,
    collection: Option<CollectionFn>,
    resource: Option<Arc<Resource>>,
    permission: Option<Permission>,
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("value", &self.value.as_ref().map(|_| "Fn(&Value) -> Value"))
            .field(
                "collection",
                &self.collection.as_ref().map(|_| "Fn(&Value) -> Vec<SelectOption>"),
            )
            .field("resource", &self.resource.as_ref().map(|r| r.name()))
            .field("permission", &self.permission)
            .finish()
    }
}

impl Meta {
    /// Creates a field descriptor with a label derived from the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            owner: String::new(),
            label: humanize(&name),
            name,
            kind,
            value: None,
            collection: None,
            resource: None,
            permission: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replaces the default field lookup with a custom extraction function.
    pub fn with_value<F>(mut self, value: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(value));
        self
    }

    pub fn with_collection<F>(mut self, collection: F) -> Self
    where
        F: Fn(&Value) -> Vec<SelectOption> + Send + Sync + 'static,
    {
        self.collection = Some(Arc::new(collection));
        self
    }

    /// Uses a fixed option list as the field's collection.
    pub fn with_options(self, options: Vec<SelectOption>) -> Self {
        self.with_collection(move |_| options.clone())
    }

    pub fn with_resource(mut self, resource: Arc<Resource>) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub(crate) fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_string();
    }

    /// Name of the resource this field belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn resource(&self) -> Option<&Arc<Resource>> {
        self.resource.as_ref()
    }

    pub fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    pub fn has_collection(&self) -> bool {
        self.collection.is_some()
    }

    /// Reads this field from `entity`, through the custom extraction function
    /// when one is set and through the data layer otherwise.
    pub fn value(&self, entity: &Value, data: &dyn DataLayer) -> Value {
        match &self.value {
            Some(value) => value(entity),
            None => data.field_value(entity, &self.name),
        }
    }

    pub fn collection(&self, entity: &Value) -> Option<Vec<SelectOption>> {
        self.collection.as_ref().map(|collection| collection(entity))
    }

    /// The template-facing view of this field.
    ///
    /// Templates hand these views back to helpers such as `render_form`,
    /// which map them to the registered field through `Owner` and `Name`.
    pub fn view(&self) -> Value {
        let mut view = json!({
            "Owner": self.owner,
            "Name": self.name,
            "Type": self.kind.tag(),
            "Label": self.label,
        });
        if let (Some(resource), Some(map)) = (&self.resource, view.as_object_mut()) {
            map.insert("Resource".to_string(), resource.view());
        }
        view
    }
}

/// Turns `created_at` into `Created At`.
pub fn humanize(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
