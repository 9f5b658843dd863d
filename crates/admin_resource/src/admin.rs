use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::data::{ConventionDataLayer, DataLayer, ADMIN_KIND};
use crate::errors::Error;
use crate::meta::Meta;
use crate::permission::{PermissionChecker, RolePermissionChecker};
use crate::resource::{Resource, KIND_KEY};

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;

/// Application-wide registry of administrable resources.
///
/// Built once at startup and shared between requests as `Arc<Admin>`. It owns
/// the URL mount prefix and the data layer and permission checker the view
/// layer consults.
pub struct Admin {
    prefix: String,
    resources: Vec<Arc<Resource>>,
    data: Arc<dyn DataLayer>,
    permissions: Arc<dyn PermissionChecker>,
}

impl fmt::Debug for Admin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admin")
            .field("prefix", &self.prefix)
            .field("resources", &self.resources)
            .field("data", &"Arc<dyn DataLayer>")
            .field("permissions", &"Arc<dyn PermissionChecker>")
            .finish()
    }
}

impl Admin {
    /// Creates an empty registry mounted at `prefix`, using the
    /// [`ConventionDataLayer`] and the [`RolePermissionChecker`].
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            resources: Vec::new(),
            data: Arc::new(ConventionDataLayer::default()),
            permissions: Arc::new(RolePermissionChecker),
        }
    }

    /// Replaces the data layer used to read records.
    pub fn with_data_layer(mut self, data: Arc<dyn DataLayer>) -> Self {
        self.data = data;
        self
    }

    /// Replaces the checker deciding field access.
    pub fn with_permission_checker(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// * `Error::DuplicateResource` - A resource with the same name is already
    ///   registered
    /// * `Error::ConflictingResource` - The resource or one nested in it shares
    ///   a name with a different resource anywhere in the registry
    pub fn add_resource(&mut self, resource: Resource) -> Result<Arc<Resource>, Error> {
        self.register(Arc::new(resource))
    }

    pub(crate) fn register(&mut self, resource: Arc<Resource>) -> Result<Arc<Resource>, Error> {
        if self.get_resource(resource.name()).is_some() {
            return Err(Error::DuplicateResource(resource.name().to_string()));
        }

        let mut seen = HashMap::new();
        for registered in &self.resources {
            check_resource_names(&mut seen, registered)?;
        }
        check_resource_names(&mut seen, &resource)?;

        debug!("Registered admin resource: {}", resource.name());
        self.resources.push(Arc::clone(&resource));
        Ok(resource)
    }

    /// URL mount prefix of the admin UI.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registered resources in registration order.
    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }

    /// The registered resource `name`.
    pub fn get_resource(&self, name: &str) -> Option<Arc<Resource>> {
        self.resources
            .iter()
            .find(|resource| resource.name() == name)
            .cloned()
    }

    /// Like [`Admin::get_resource`], but also finds resources only reachable
    /// as the nested resource of a field.
    pub fn find_resource(&self, name: &str) -> Option<Arc<Resource>> {
        self.get_resource(name).or_else(|| {
            self.resources
                .iter()
                .find_map(|resource| resource.find_resource(name))
        })
    }

    /// Finds the field `name` of resource `owner`, nested resources included.
    pub fn find_meta(&self, owner: &str, name: &str) -> Option<Arc<Meta>> {
        self.find_resource(owner)
            .and_then(|resource| resource.meta(name).cloned())
    }

    pub fn data_layer(&self) -> &dyn DataLayer {
        self.data.as_ref()
    }

    pub fn permissions(&self) -> &dyn PermissionChecker {
        self.permissions.as_ref()
    }

    /// The template-facing view of the registry.
    pub fn view(&self) -> Value {
        json!({
            KIND_KEY: ADMIN_KIND,
            "Prefix": self.prefix,
            "Resources": self.resources.iter().map(|r| r.view()).collect::<Vec<_>>(),
        })
    }
}

/// Records `resource` and the resources nested in it by name, failing when a
/// name already belongs to a different resource.
fn check_resource_names<'a>(
    seen: &mut HashMap<&'a str, &'a Arc<Resource>>,
    resource: &'a Arc<Resource>,
) -> Result<(), Error> {
    match seen.get(resource.name()) {
        Some(known) if Arc::ptr_eq(*known, resource) => return Ok(()),
        Some(_) => return Err(Error::ConflictingResource(resource.name().to_string())),
        None => {
            seen.insert(resource.name(), resource);
        }
    }

    for nested in resource.index_metas().iter().filter_map(|meta| meta.resource()) {
        check_resource_names(seen, nested)?;
    }
    Ok(())
}
