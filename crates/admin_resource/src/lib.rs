//! Resource model for the admin view layer.
//!
//! This crate holds everything the view layer needs to know about the data it
//! renders: the [`Admin`] registry, [`Resource`]s and their field descriptors
//! ([`Meta`]), permission modes and the [`PermissionChecker`] seam, and the
//! [`DataLayer`] seam through which entity records are introspected.
//!
//! # Examples
//!
//! ```rust
//! use admin_resource::{Admin, FieldKind, Linkable, Meta, Resource};
//! use serde_json::json;
//!
//! let mut admin = Admin::new("/admin");
//! admin
//!     .add_resource(
//!         Resource::new("order")
//!             .with_meta(Meta::new("number", FieldKind::String))
//!             .with_meta(Meta::new("state", FieldKind::Select)),
//!     )
//!     .unwrap();
//!
//! let order = json!({"_type": "Order", "id": 42, "number": "A-1"});
//! let link = Linkable::entity(&order, admin.data_layer()).unwrap();
//! assert_eq!(link.url(admin.prefix()), "/admin/order/42");
//! ```

mod admin;
mod data;
mod definition;
mod errors;
mod meta;
mod permission;
mod resource;

pub use admin::Admin;
pub use data::{display_key, join_path, ConventionDataLayer, DataLayer, Linkable, ADMIN_KIND};
pub use definition::{MetaDefinition, ResourceDefinition, SchemaDefinition};
pub use errors::Error;
pub use meta::{humanize, CollectionFn, FieldKind, Meta, SelectOption, ValueFn};
pub use permission::{
    Permission, PermissionChecker, PermissionMode, Principal, RolePermissionChecker, ANY_ROLE,
};
pub use resource::{Resource, KIND_KEY, RESOURCE_KIND};
