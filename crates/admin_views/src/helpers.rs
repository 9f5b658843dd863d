//! # Template helpers
//!
//! Helpers registered into every registry built for a [`ViewContext`]:
//!
//! - `allowed_metas [resource] [mode...]`: fields the principal may access
//!   under any of the modes; a `null` resource is an error
//! - `value_of entity meta`: a field's value
//! - `url_for target`: URL of the admin root, a resource or an entity
//! - `new_resource_path [resource]`: URL of a resource's creation page
//! - `link_to text target`: an HTML anchor
//! - `render_form entity metas [index]`: the HTML of a (nested) form; the
//!   index only applies inside field sub-templates
//! - `has_primary_key entity_or_list key`: primary key membership
//!
//! Helpers returning HTML must be used with triple braces
//! (`{{{render_form Result (allowed_metas)}}}`) to skip escaping.

use admin_resource::{Linkable, PermissionMode};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ViewContext;
use crate::form::{FormRenderer, NamePath};

#[cfg(test)]
#[path = "helpers_tests.rs"]
mod tests;

pub const ALLOWED_METAS: &str = "allowed_metas";
pub const VALUE_OF: &str = "value_of";
pub const URL_FOR: &str = "url_for";
pub const NEW_RESOURCE_PATH: &str = "new_resource_path";
pub const LINK_TO: &str = "link_to";
pub const RENDER_FORM: &str = "render_form";
pub const HAS_PRIMARY_KEY: &str = "has_primary_key";

/// What a set of helpers is bound to besides the context.
#[derive(Debug, Clone)]
pub(crate) struct HelperScope {
    /// Modes `allowed_metas` filters by when the template names none.
    modes: Vec<PermissionMode>,
    /// Name path `render_form` continues from.
    prefix: NamePath,
}

impl HelperScope {
    /// Scope of page and partial templates.
    pub(crate) fn page() -> Self {
        Self {
            modes: vec![PermissionMode::Read],
            prefix: NamePath::root(),
        }
    }

    /// Scope of a field sub-template rendering the field at `prefix`.
    pub(crate) fn field(prefix: NamePath) -> Self {
        Self {
            modes: vec![PermissionMode::Read, PermissionMode::Update],
            prefix,
        }
    }
}

pub(crate) fn register_helpers<'a>(
    registry: &mut Handlebars<'a>,
    ctx: &'a ViewContext,
    scope: HelperScope,
) {
    registry.register_helper(
        ALLOWED_METAS,
        Box::new(AllowedMetasHelper {
            ctx,
            modes: scope.modes,
        }),
    );
    registry.register_helper(VALUE_OF, Box::new(ValueOfHelper { ctx }));
    registry.register_helper(URL_FOR, Box::new(UrlForHelper { ctx }));
    registry.register_helper(NEW_RESOURCE_PATH, Box::new(NewResourcePathHelper { ctx }));
    registry.register_helper(LINK_TO, Box::new(LinkToHelper { ctx }));
    registry.register_helper(
        RENDER_FORM,
        Box::new(RenderFormHelper {
            ctx,
            prefix: scope.prefix,
        }),
    );
    registry.register_helper(HAS_PRIMARY_KEY, Box::new(HasPrimaryKeyHelper { ctx }));
}

fn helper_error(message: String) -> RenderError {
    RenderErrorReason::Other(message).into()
}

fn required_param<'h>(h: &'h Helper<'_>, index: usize, helper: &str) -> Result<&'h Value, RenderError> {
    h.param(index)
        .map(|param| param.value())
        .ok_or_else(|| helper_error(format!("{} helper requires parameter {}", helper, index)))
}

fn optional_param<'h>(h: &'h Helper<'_>, index: usize) -> Option<&'h Value> {
    h.param(index)
        .map(|param| param.value())
        .filter(|value| !value.is_null())
}

fn linkable(ctx: &ViewContext, target: &Value, helper: &str) -> Result<Linkable, RenderError> {
    ctx.linkable(target)
        .ok_or_else(|| helper_error(format!("{} helper cannot link to {}", helper, target)))
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

struct AllowedMetasHelper<'a> {
    ctx: &'a ViewContext,
    modes: Vec<PermissionMode>,
}

impl HelperDef for AllowedMetasHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let mut resource = None;
        let mut modes = Vec::new();

        for param in h.params() {
            match param.value() {
                Value::String(mode) => modes.push(
                    mode.parse::<PermissionMode>()
                        .map_err(|e| helper_error(e.to_string()))?,
                ),
                Value::Null => {
                    return Err(helper_error(format!(
                        "{} helper: resource argument is missing",
                        ALLOWED_METAS
                    )))
                }
                view => {
                    let found = self.ctx.resource_from_view(view).ok_or_else(|| {
                        helper_error(format!("{} helper: unknown resource {}", ALLOWED_METAS, view))
                    })?;
                    resource = Some(found);
                }
            }
        }
        if modes.is_empty() {
            modes = self.modes.clone();
        }

        let metas = self
            .ctx
            .allowed_metas(resource.as_deref(), &modes)
            .map_err(|e| helper_error(e.to_string()))?;

        Ok(ScopedJson::Derived(Value::Array(
            metas.iter().map(|meta| meta.view()).collect(),
        )))
    }
}

struct ValueOfHelper<'a> {
    ctx: &'a ViewContext,
}

impl HelperDef for ValueOfHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let entity = required_param(h, 0, VALUE_OF)?;
        let view = required_param(h, 1, VALUE_OF)?;
        let meta = self
            .ctx
            .meta_from_view(view)
            .ok_or_else(|| helper_error(format!("{} helper: unknown field {}", VALUE_OF, view)))?;

        Ok(ScopedJson::Derived(self.ctx.value_of(entity, &meta)))
    }
}

/// Extra parameters after the target are accepted and ignored.
struct UrlForHelper<'a> {
    ctx: &'a ViewContext,
}

impl HelperDef for UrlForHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let target = linkable(self.ctx, required_param(h, 0, URL_FOR)?, URL_FOR)?;
        Ok(ScopedJson::Derived(Value::String(self.ctx.url_for(&target))))
    }
}

struct NewResourcePathHelper<'a> {
    ctx: &'a ViewContext,
}

impl HelperDef for NewResourcePathHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let resource = match optional_param(h, 0) {
            Some(view) => Some(self.ctx.resource_from_view(view).ok_or_else(|| {
                helper_error(format!("{} helper: unknown resource {}", NEW_RESOURCE_PATH, view))
            })?),
            None => None,
        };

        let path = self
            .ctx
            .new_resource_path(resource.as_deref())
            .map_err(|e| helper_error(e.to_string()))?;
        Ok(ScopedJson::Derived(Value::String(path)))
    }
}

struct LinkToHelper<'a> {
    ctx: &'a ViewContext,
}

impl HelperDef for LinkToHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let text = display_text(required_param(h, 0, LINK_TO)?);
        let target = linkable(self.ctx, required_param(h, 1, LINK_TO)?, LINK_TO)?;
        Ok(ScopedJson::Derived(Value::String(
            self.ctx.link_to(&text, &target),
        )))
    }
}

struct RenderFormHelper<'a> {
    ctx: &'a ViewContext,
    prefix: NamePath,
}

impl HelperDef for RenderFormHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let entity = required_param(h, 0, RENDER_FORM)?;
        let views = match optional_param(h, 1) {
            Some(Value::Array(views)) => views.as_slice(),
            Some(other) => {
                return Err(helper_error(format!(
                    "{} helper expects a list of fields, got {}",
                    RENDER_FORM, other
                )))
            }
            None => &[],
        };

        let metas: Vec<_> = views
            .iter()
            .filter_map(|view| {
                let meta = self.ctx.meta_from_view(view);
                if meta.is_none() {
                    warn!("{} helper: skipping unknown field {}", RENDER_FORM, view);
                }
                meta
            })
            .collect();

        // Only element forms of a field are indexed; the page form is not.
        let prefix = match optional_param(h, 2).and_then(Value::as_u64) {
            Some(index) if self.prefix != NamePath::root() => self.prefix.indexed(index as usize),
            Some(index) => {
                debug!("{} helper: ignoring index {} on the page form", RENDER_FORM, index);
                self.prefix.clone()
            }
            None => self.prefix.clone(),
        };

        let html = FormRenderer::new(self.ctx).render_form(entity, &metas, &prefix);
        Ok(ScopedJson::Derived(Value::String(html)))
    }
}

struct HasPrimaryKeyHelper<'a> {
    ctx: &'a ViewContext,
}

impl HelperDef for HasPrimaryKeyHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let entities = required_param(h, 0, HAS_PRIMARY_KEY)?;
        let key = required_param(h, 1, HAS_PRIMARY_KEY)?;
        Ok(ScopedJson::Derived(Value::Bool(
            self.ctx.has_primary_key(entities, key),
        )))
    }
}
