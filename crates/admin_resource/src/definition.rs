//! Declarative resource schemas.
//!
//! Resources can be declared in TOML instead of code. Nested resources are
//! referenced by name and may be declared in any order.
//!
//! ```toml
//! prefix = "/admin"
//!
//! [[resources]]
//! name = "order"
//!
//! [[resources.metas]]
//! name = "state"
//! type = "select"
//! options = [{ value = "draft", label = "Draft" }, { value = "paid", label = "Paid" }]
//! permission = { update = ["admin"] }
//!
//! [[resources.metas]]
//! name = "items"
//! type = "many"
//! resource = "order_item"
//!
//! [[resources]]
//! name = "order_item"
//! embedded = true
//!
//! [[resources.metas]]
//! name = "sku"
//! type = "string"
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::admin::Admin;
use crate::errors::Error;
use crate::meta::{FieldKind, Meta, SelectOption};
use crate::permission::Permission;
use crate::resource::Resource;

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;

fn default_prefix() -> String {
    "/admin".to_string()
}

/// A complete admin schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// URL mount prefix of the admin UI.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

/// One resource in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub name: String,

    /// Embedded resources are only reachable through the fields that nest
    /// them and are not registered as top-level resources.
    #[serde(default)]
    pub embedded: bool,

    #[serde(default)]
    pub metas: Vec<MetaDefinition>,
}

/// One field of a resource definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDefinition {
    pub name: String,

    #[serde(rename = "type", default = "default_kind")]
    pub kind: FieldKind,

    pub label: Option<String>,

    /// Name of the nested resource for `single` and `many` fields.
    pub resource: Option<String>,

    /// Fixed options for `select` and `collection` fields.
    pub options: Option<Vec<SelectOption>>,

    pub permission: Option<Permission>,
}

fn default_kind() -> FieldKind {
    FieldKind::String
}

impl SchemaDefinition {
    /// Loads a schema from a TOML file.
    ///
    /// # Errors
    ///
    /// * `Error::Io` - The file cannot be read
    /// * `Error::SchemaParse` - The file is not a valid schema
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading resource schema from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::SchemaParse(e.to_string()))
    }
}

impl Admin {
    /// Builds a registry from a schema, resolving nested resource references.
    ///
    /// # Errors
    ///
    /// * `Error::DuplicateResource` - Two definitions share a name
    /// * `Error::UnknownResource` - A field references an undefined resource
    /// * `Error::MissingNestedResource` - A `single` or `many` field names no resource
    /// * `Error::CyclicResource` - Nested references form a cycle
    pub fn from_schema(schema: &SchemaDefinition) -> Result<Self, Error> {
        let mut definitions = HashMap::new();
        for definition in &schema.resources {
            if definitions
                .insert(definition.name.as_str(), definition)
                .is_some()
            {
                return Err(Error::DuplicateResource(definition.name.clone()));
            }
        }

        let mut builder = SchemaBuilder {
            definitions,
            built: HashMap::new(),
            visiting: HashSet::new(),
        };

        let mut admin = Admin::new(schema.prefix.clone());
        for definition in schema.resources.iter().filter(|d| !d.embedded) {
            let resource = builder.build(&definition.name)?;
            admin.register(resource)?;
        }

        info!(
            "Admin schema loaded: {} resources under {}",
            admin.resources().len(),
            admin.prefix()
        );
        Ok(admin)
    }
}

struct SchemaBuilder<'a> {
    definitions: HashMap<&'a str, &'a ResourceDefinition>,
    built: HashMap<String, Arc<Resource>>,
    visiting: HashSet<String>,
}

impl SchemaBuilder<'_> {
    fn build(&mut self, name: &str) -> Result<Arc<Resource>, Error> {
        if let Some(resource) = self.built.get(name) {
            return Ok(Arc::clone(resource));
        }
        if !self.visiting.insert(name.to_string()) {
            return Err(Error::CyclicResource(name.to_string()));
        }

        let definition = *self
            .definitions
            .get(name)
            .ok_or_else(|| Error::UnknownResource {
                field: String::new(),
                resource: name.to_string(),
            })?;

        let mut resource = Resource::new(definition.name.clone());
        for meta_definition in &definition.metas {
            let meta = self.build_meta(&definition.name, meta_definition)?;
            resource = resource.with_meta(meta);
        }

        self.visiting.remove(name);
        let resource = Arc::new(resource);
        self.built.insert(name.to_string(), Arc::clone(&resource));
        Ok(resource)
    }

    fn build_meta(&mut self, owner: &str, definition: &MetaDefinition) -> Result<Meta, Error> {
        let mut meta = Meta::new(definition.name.clone(), definition.kind.clone());

        if let Some(label) = &definition.label {
            meta = meta.with_label(label.clone());
        }
        if let Some(options) = &definition.options {
            meta = meta.with_options(options.clone());
        }
        if let Some(permission) = &definition.permission {
            meta = meta.with_permission(permission.clone());
        }
        if definition.kind.is_nested() && definition.resource.is_none() {
            return Err(Error::MissingNestedResource(format!(
                "{}.{}",
                owner, definition.name
            )));
        }
        if let Some(nested) = &definition.resource {
            if !self.definitions.contains_key(nested.as_str()) {
                return Err(Error::UnknownResource {
                    field: format!("{}.{}", owner, definition.name),
                    resource: nested.clone(),
                });
            }
            meta = meta.with_resource(self.build(nested)?);
        }

        Ok(meta)
    }
}
