//! # Rendering context
//!
//! A [`ViewContext`] carries everything one request renders with: the active
//! resource, the principal, the admin registry, and the engine holding the
//! view roots and the layout cache.
//!
//! ## Template data
//!
//! Page, partial and layout templates are rendered against:
//!
//! | key         | content                                             |
//! |-------------|-----------------------------------------------------|
//! | `Admin`     | the admin view (`Prefix`, `Resources`)              |
//! | `Resource`  | the active resource's view, `null` without one      |
//! | `Result`    | the record or list being rendered                   |
//! | `Content`   | the rendered page body, for the layout              |
//! | `Principal` | the principal (`id`, `roles`)                       |
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use admin_resource::{Admin, Principal};
//! use admin_views::{ViewConfig, ViewEngine};
//! use serde_json::json;
//!
//! let engine = Arc::new(ViewEngine::new(ViewConfig::default()));
//! let admin = Arc::new(Admin::new("/admin"));
//!
//! let mut ctx = engine.context(admin, Principal::new("alice"));
//! ctx.use_resource("order");
//! ctx.execute("show", json!({"_type": "Order", "id": 42}), std::io::stdout());
//! ```

use std::io::Write;
use std::sync::Arc;

use admin_resource::{
    display_key, join_path, Admin, Linkable, Meta, PermissionMode, Principal, Resource,
};
use handlebars::{html_escape, Handlebars};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::engine::{ViewEngine, LAYOUT};
use crate::errors::Error;
use crate::form::{FormRenderer, NamePath};
use crate::helpers::{register_helpers, HelperScope};
use crate::resolver::{TemplateSet, TEMPLATE_EXTENSION};

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// Path segment of a resource's creation page.
pub const NEW_PAGE: &str = "new";

/// Per-request rendering state. Not shared between requests.
#[derive(Debug)]
pub struct ViewContext {
    engine: Arc<ViewEngine>,
    admin: Arc<Admin>,
    principal: Principal,
    resource: Option<Arc<Resource>>,
    result: Value,
    content: String,
}

impl ViewContext {
    /// Creates a context without an active resource, result or content.
    /// Usually obtained from [`ViewEngine::context`].
    pub fn new(engine: Arc<ViewEngine>, admin: Arc<Admin>, principal: Principal) -> Self {
        Self {
            engine,
            admin,
            principal,
            resource: None,
            result: Value::Null,
            content: String::new(),
        }
    }

    /// Makes `resource` the active resource.
    pub fn set_resource(&mut self, resource: Arc<Resource>) {
        debug!("Active resource: {}", resource.name());
        self.resource = Some(resource);
    }

    pub fn clear_resource(&mut self) {
        self.resource = None;
    }

    /// Activates the registered resource `name`. An unknown name clears the
    /// active resource and returns `false`.
    pub fn use_resource(&mut self, name: &str) -> bool {
        match self.admin.find_resource(name) {
            Some(resource) => {
                self.set_resource(resource);
                true
            }
            None => {
                warn!("Unknown resource '{}', rendering without one", name);
                self.resource = None;
                false
            }
        }
    }

    pub fn resource(&self) -> Option<&Arc<Resource>> {
        self.resource.as_ref()
    }

    /// Name of the active resource, empty without one.
    pub fn resource_name(&self) -> &str {
        self.resource.as_ref().map_or("", |resource| resource.name())
    }

    /// The admin registry.
    pub fn admin(&self) -> &Admin {
        &self.admin
    }

    pub fn engine(&self) -> &ViewEngine {
        &self.engine
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// The record or list being rendered.
    pub fn result(&self) -> &Value {
        &self.result
    }

    pub fn set_result(&mut self, result: Value) {
        self.result = result;
    }

    /// The page body rendered by the last [`ViewContext::execute`].
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The data page, partial and layout templates are rendered against.
    pub fn template_data(&self) -> Value {
        json!({
            "Admin": self.admin.view(),
            "Resource": self.resource.as_ref().map_or(Value::Null, |resource| resource.view()),
            "Result": self.result,
            "Content": self.content,
            "Principal": self.principal,
        })
    }

    /// A fresh registry with the helper set bound to this context.
    pub(crate) fn registry(&self, scope: HelperScope) -> Handlebars<'_> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(self.engine.config().strict_mode);
        register_helpers(&mut registry, self, scope);
        registry
    }

    /// Renders the template `name` without a layout.
    ///
    /// Returns an empty string when the template cannot be found or fails to
    /// render; both are logged.
    pub fn render(&self, name: &str) -> String {
        match self.try_render(name) {
            Ok(html) => html,
            Err(e) => {
                warn!("{}", e);
                String::new()
            }
        }
    }

    /// Like [`ViewContext::render`], reporting failures instead of logging them.
    pub fn try_render(&self, name: &str) -> Result<String, Error> {
        let file_name = format!("{}{}", name, TEMPLATE_EXTENSION);
        let mut set = TemplateSet::new();
        if !self
            .engine
            .resolver()
            .find_template(&mut set, &file_name, self.resource_name())
        {
            return Err(Error::TemplateNotFound(file_name));
        }

        let mut registry = self.registry(HelperScope::page());
        set.install(&mut registry);
        registry
            .render(name, &self.template_data())
            .map_err(|e| Error::Render {
                template: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Renders the page `name` for `result` inside its layout and writes it to
    /// `sink`.
    ///
    /// The page body is rendered first and exposed to the layout as `Content`.
    /// Nothing is written when no layout exists. A failure while rendering the
    /// layout is logged and may leave a partial page in `sink`.
    pub fn execute<W: Write>(&mut self, name: &str, result: Value, sink: W) {
        self.result = result;
        self.content = self.render(name);

        let layout = self.engine.layout_for(self.resource_name(), name);
        if !layout.contains(LAYOUT) {
            warn!(
                "No layout for page {} of resource '{}', nothing written",
                name,
                self.resource_name()
            );
            return;
        }

        let mut registry = self.registry(HelperScope::page());
        layout.install(&mut registry);
        if let Err(e) = registry.render_to_write(LAYOUT, &self.template_data(), sink) {
            error!("Failed to render layout for page {}: {}", name, e);
        }
    }

    /// Fields of `resource` (the active resource by default) the principal
    /// may access under any of `modes`, in declaration order. No modes means
    /// read access.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveResource` when no resource is given or active.
    pub fn allowed_metas(
        &self,
        resource: Option<&Resource>,
        modes: &[PermissionMode],
    ) -> Result<Vec<Arc<Meta>>, Error> {
        let resource = resource
            .or(self.resource.as_deref())
            .ok_or(Error::NoActiveResource)?;
        let modes = if modes.is_empty() {
            &[PermissionMode::Read][..]
        } else {
            modes
        };

        Ok(resource.allowed_metas(
            resource.index_metas(),
            &self.principal,
            self.admin.permissions(),
            modes,
        ))
    }

    /// The value of the field `meta` read from `entity`.
    pub fn value_of(&self, entity: &Value, meta: &Meta) -> Value {
        meta.value(entity, self.admin.data_layer())
    }

    /// Classifies a template value as a link target.
    pub fn linkable(&self, value: &Value) -> Option<Linkable> {
        Linkable::from_value(value, self.admin.data_layer())
    }

    /// The URL of `target` under the admin prefix.
    pub fn url_for(&self, target: &Linkable) -> String {
        target.url(self.admin.prefix())
    }

    /// URL of the creation page of `resource`, or of the active resource.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveResource` when no resource is given or active.
    pub fn new_resource_path(&self, resource: Option<&Resource>) -> Result<String, Error> {
        let resource = resource
            .or(self.resource.as_deref())
            .ok_or(Error::NoActiveResource)?;
        Ok(join_path(self.admin.prefix(), &[resource.name(), NEW_PAGE]))
    }

    /// An anchor to `target` with escaped `text`.
    pub fn link_to(&self, text: &str, target: &Linkable) -> String {
        format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(&self.url_for(target)),
            html_escape(text)
        )
    }

    /// Renders the form for `metas` of `entity` at the top level.
    pub fn render_form(&self, entity: &Value, metas: &[Arc<Meta>]) -> String {
        FormRenderer::new(self).render_form(entity, metas, &NamePath::root())
    }

    /// Whether `key` is the primary key of `entity_or_list` or of one of its
    /// elements. Keys are compared in their displayed form, so `42` matches
    /// `"42"`.
    pub fn has_primary_key(&self, entity_or_list: &Value, key: &Value) -> bool {
        let key = display_key(key);
        self.admin
            .data_layer()
            .primary_keys(entity_or_list)
            .iter()
            .any(|candidate| display_key(candidate) == key)
    }

    /// Maps a resource view handed back by a template to the resource. The
    /// active resource tree is searched before the registry.
    pub fn resource_from_view(&self, view: &Value) -> Option<Arc<Resource>> {
        let name = view.get("Name")?.as_str()?;
        self.resource
            .as_ref()
            .and_then(|active| active.find_resource(name))
            .or_else(|| self.admin.find_resource(name))
    }

    /// Maps a field view handed back by a template to the field.
    pub fn meta_from_view(&self, view: &Value) -> Option<Arc<Meta>> {
        let owner = view.get("Owner")?.as_str()?;
        let name = view.get("Name")?.as_str()?;
        self.resource
            .as_ref()
            .and_then(|active| active.find_meta(owner, name))
            .or_else(|| self.admin.find_meta(owner, name))
    }
}
