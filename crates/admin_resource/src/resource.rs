use std::sync::Arc;

use serde_json::{json, Value};

use crate::meta::Meta;
use crate::permission::{PermissionChecker, PermissionMode, Principal};

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;

/// Marker stored under [`KIND_KEY`] in a resource's template view.
pub const RESOURCE_KIND: &str = "resource";

/// Key carrying the kind marker in the template views of admin objects.
pub const KIND_KEY: &str = "_kind";

/// An administrable entity type and its ordered field metadata.
///
/// Resources are registered once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    metas: Vec<Arc<Meta>>,
}

impl Resource {
    /// Creates a resource without fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metas: Vec::new(),
        }
    }

    /// Appends a field; fields keep the order in which they are added.
    pub fn with_meta(mut self, mut meta: Meta) -> Self {
        meta.set_owner(&self.name);
        self.metas.push(Arc::new(meta));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields shown on the index and form views, in declaration order.
    pub fn index_metas(&self) -> &[Arc<Meta>] {
        &self.metas
    }

    /// The field `name` of this resource.
    pub fn meta(&self, name: &str) -> Option<&Arc<Meta>> {
        self.metas.iter().find(|meta| meta.name() == name)
    }

    /// Keeps the `metas` the principal may access under any of `modes`,
    /// preserving their order.
    pub fn allowed_metas(
        &self,
        metas: &[Arc<Meta>],
        principal: &Principal,
        checker: &dyn PermissionChecker,
        modes: &[PermissionMode],
    ) -> Vec<Arc<Meta>> {
        metas
            .iter()
            .filter(|meta| {
                modes
                    .iter()
                    .any(|mode| checker.is_allowed(meta, *mode, principal))
            })
            .cloned()
            .collect()
    }

    /// Finds a resource by name among this resource and the resources nested
    /// in its fields, depth first.
    pub fn find_resource(self: &Arc<Self>, name: &str) -> Option<Arc<Resource>> {
        if self.name == name {
            return Some(Arc::clone(self));
        }
        self.metas
            .iter()
            .filter_map(|meta| meta.resource())
            .find_map(|nested| nested.find_resource(name))
    }

    /// Finds the field `name` of resource `owner` in this resource tree.
    pub fn find_meta(self: &Arc<Self>, owner: &str, name: &str) -> Option<Arc<Meta>> {
        self.find_resource(owner)
            .and_then(|resource| resource.meta(name).cloned())
    }

    /// The template-facing view of this resource.
    pub fn view(&self) -> Value {
        json!({
            KIND_KEY: RESOURCE_KIND,
            "Name": self.name,
        })
    }
}
