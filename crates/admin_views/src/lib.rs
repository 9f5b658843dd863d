//! HTML view rendering for administrative resources.
//!
//! The crate resolves Handlebars templates across layered view roots
//! (resource overrides, then the theme, then the defaults), memoizes merged
//! page layouts, and renders permission-filtered, recursively nested forms
//! for the records of a resource.
//!
//! The main entry points are:
//!
//! - [`ViewEngine`]: process-wide state built from a [`ViewConfig`]
//! - [`ViewContext`]: per-request rendering with `render` and `execute`
//! - [`TemplateResolver`]: template lookup across the view roots
//! - [`FieldRegistry`]: field renderers implemented in code
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use admin_resource::{Admin, FieldKind, Meta, Principal, Resource};
//! use admin_views::{ViewConfig, ViewEngine};
//! use serde_json::json;
//!
//! let mut admin = Admin::new("/admin");
//! admin
//!     .add_resource(Resource::new("order").with_meta(Meta::new("number", FieldKind::String)))
//!     .unwrap();
//!
//! let engine = Arc::new(ViewEngine::new(ViewConfig::new(vec![PathBuf::from("views")])));
//! let mut ctx = engine.context(Arc::new(admin), Principal::new("alice").with_role("admin"));
//! ctx.use_resource("order");
//!
//! let mut page = Vec::new();
//! ctx.execute("edit", json!({"_type": "Order", "id": 42, "number": "A-1"}), &mut page);
//! ```

mod cache;
mod config;
mod context;
mod engine;
mod errors;
mod form;
mod helpers;
mod resolver;

pub use cache::{cache_key, CacheStatistics, TemplateCache};
pub use config::{ViewConfig, DEFAULT_THEME};
pub use context::{ViewContext, NEW_PAGE};
pub use engine::{ViewEngine, FOOTER, HEADER, LAYOUT};
pub use errors::Error;
pub use form::{
    form_template_name, FieldPayload, FieldRegistry, FieldRenderFn, FormRenderer, NamePath,
    FORMS_DIR, ROOT_SEGMENT,
};
pub use helpers::{
    ALLOWED_METAS, HAS_PRIMARY_KEY, LINK_TO, NEW_RESOURCE_PATH, RENDER_FORM, URL_FOR, VALUE_OF,
};
pub use resolver::{logical_name, TemplateResolver, TemplateSet, TEMPLATE_EXTENSION, THEMES_DIR};
