//! # Form rendering
//!
//! Forms are rendered field by field. Each field is rendered by a function
//! registered for its [`FieldKind`] in the [`FieldRegistry`], or else by the
//! kind's sub-template `forms/<tag>.tmpl`. The sub-template receives a
//! [`FieldPayload`]:
//!
//! | key               | content                                           |
//! |-------------------|---------------------------------------------------|
//! | `InputId`         | name path segments joined without separator       |
//! | `InputName`       | name path segments joined with `.`                |
//! | `Label`           | the field label                                   |
//! | `Value`           | the field value read from the entity              |
//! | `CollectionValue` | selectable options, only for fields that have them|
//! | `Meta`            | the field's template view                         |
//!
//! Nested fields recurse through the `render_form` helper, which inside a
//! field sub-template continues from that field's name path:
//!
//! ```handlebars
//! {{#each Value}}
//!   {{{render_form this (allowed_metas @root.Meta.Resource) @index}}}
//! {{/each}}
//! ```
//!
//! renders the third element's `title` as `QorResource.items[2].title`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use admin_resource::{FieldKind, Meta, SelectOption};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ViewContext;
use crate::helpers::HelperScope;
use crate::resolver::{logical_name, TemplateSet, TEMPLATE_EXTENSION};

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;

/// First segment of every input name path.
pub const ROOT_SEGMENT: &str = "QorResource";

/// Directory of the per-kind field sub-templates.
pub const FORMS_DIR: &str = "forms";

/// The sub-template file rendering fields of `kind`.
pub fn form_template_name(kind: &FieldKind) -> String {
    format!("{}/{}{}", FORMS_DIR, kind.tag(), TEMPLATE_EXTENSION)
}

/// The segments naming an input within a nested form.
///
/// Paths are values: deriving a child path copies the segments, so sibling
/// fields never see each other's names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePath {
    segments: Vec<String>,
}

impl Default for NamePath {
    fn default() -> Self {
        Self::root()
    }
}

impl NamePath {
    /// The path of the top-level form, `QorResource`.
    pub fn root() -> Self {
        Self::from_segments([ROOT_SEGMENT])
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The path of the field `name` below this one.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Rewrites the last segment `name` to `name[index]`.
    pub fn indexed(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            *last = format!("{}[{}]", last, index);
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The HTML id: segments joined without separator.
    pub fn input_id(&self) -> String {
        self.segments.concat()
    }

    /// The HTML input name: segments joined with `.`.
    pub fn input_name(&self) -> String {
        self.segments.join(".")
    }
}

/// Data handed to a field renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldPayload {
    pub input_id: String,
    pub input_name: String,
    pub label: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_value: Option<Vec<SelectOption>>,
    pub meta: Value,
}

/// Renders one field to HTML.
pub type FieldRenderFn = Arc<dyn Fn(&FieldPayload) -> String + Send + Sync>;

/// Field renderers implemented in code, keyed by field kind.
///
/// Kinds without a registered renderer fall back to their sub-template.
#[derive(Clone, Default)]
pub struct FieldRegistry {
    renderers: HashMap<FieldKind, FieldRenderFn>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("kinds", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer<F>(mut self, kind: FieldKind, render: F) -> Self
    where
        F: Fn(&FieldPayload) -> String + Send + Sync + 'static,
    {
        self.register(kind, render);
        self
    }

    /// Registers `render` for fields of `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: FieldKind, render: F)
    where
        F: Fn(&FieldPayload) -> String + Send + Sync + 'static,
    {
        self.renderers.insert(kind, Arc::new(render));
    }

    pub fn get(&self, kind: &FieldKind) -> Option<&FieldRenderFn> {
        self.renderers.get(kind)
    }
}

/// Recursive, permission-aware form renderer bound to a request context.
pub struct FormRenderer<'a> {
    ctx: &'a ViewContext,
}

impl<'a> FormRenderer<'a> {
    pub fn new(ctx: &'a ViewContext) -> Self {
        Self { ctx }
    }

    /// Renders `metas` of `entity` in order under `prefix`.
    pub fn render_form(&self, entity: &Value, metas: &[Arc<Meta>], prefix: &NamePath) -> String {
        let mut out = String::new();
        for meta in metas {
            self.render_meta(&mut out, meta, entity, prefix);
        }
        out
    }

    /// Appends one field to `out`. Fields without a renderer or sub-template
    /// are logged and left out, as are nested fields without a resource.
    pub fn render_meta(&self, out: &mut String, meta: &Meta, entity: &Value, prefix: &NamePath) {
        if meta.kind().is_nested() && meta.resource().is_none() {
            warn!(
                "{}.{}: {} field has no nested resource, skipping",
                meta.owner(),
                meta.name(),
                meta.kind()
            );
            return;
        }

        let path = prefix.child(meta.name());
        let engine = self.ctx.engine();

        if let Some(render) = engine.fields().get(meta.kind()) {
            out.push_str(&render(&self.payload(meta, entity, &path)));
            return;
        }

        let template_name = form_template_name(meta.kind());
        let mut set = TemplateSet::new();
        if !engine
            .resolver()
            .find_template(&mut set, &template_name, self.ctx.resource_name())
        {
            warn!("{}: form type {} not supported", meta.name(), meta.kind());
            return;
        }

        let payload = self.payload(meta, entity, &path);
        let mut registry = self.ctx.registry(HelperScope::field(path));
        set.install(&mut registry);

        match registry.render(logical_name(&template_name), &payload) {
            Ok(html) => {
                debug!("Rendered field {} as {}", payload.input_name, meta.kind());
                out.push_str(&html);
            }
            Err(e) => warn!("Failed to render field {}: {}", meta.name(), e),
        }
    }

    fn payload(&self, meta: &Meta, entity: &Value, path: &NamePath) -> FieldPayload {
        FieldPayload {
            input_id: path.input_id(),
            input_name: path.input_name(),
            label: meta.label().to_string(),
            value: self.ctx.value_of(entity, meta),
            collection_value: meta.collection(entity),
            meta: meta.view(),
        }
    }
}
