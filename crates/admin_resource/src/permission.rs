//! Permission modes, principals and the permission checking seam.
//!
//! The admin UI never decides on its own whether a field is visible or
//! editable. It asks a [`PermissionChecker`] whether the current
//! [`Principal`] holds a [`PermissionMode`] on a field. The default
//! [`RolePermissionChecker`] honours the role lists attached to each
//! [`Meta`] through a [`Permission`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::meta::Meta;

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;

/// Role name that grants a mode to every principal.
pub const ANY_ROLE: &str = "*";

/// The access modes a principal can hold on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    Create,
    Read,
    Update,
    Delete,
}

impl PermissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Create => "create",
            PermissionMode::Read => "read",
            PermissionMode::Update => "update",
            PermissionMode::Delete => "delete",
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(PermissionMode::Create),
            "read" => Ok(PermissionMode::Read),
            "update" => Ok(PermissionMode::Update),
            "delete" => Ok(PermissionMode::Delete),
            _ => Err(Error::UnknownPermissionMode(s.to_string())),
        }
    }
}

/// The authenticated actor a page is rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Role lists per permission mode for a single field.
///
/// A mode without an entry is unrestricted. A mode with an entry is granted
/// only to principals holding one of the listed roles, or to everyone when
/// the list contains [`ANY_ROLE`].
///
/// ```toml
/// [permission]
/// read = ["*"]
/// update = ["admin", "editor"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission {
    allow: BTreeMap<PermissionMode, Vec<String>>,
}

impl Permission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `mode` to the given roles, adding to any roles already
    /// allowed for it.
    pub fn allow<I, S>(mut self, mode: PermissionMode, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow
            .entry(mode)
            .or_default()
            .extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn allows(&self, mode: PermissionMode, principal: &Principal) -> bool {
        match self.allow.get(&mode) {
            None => true,
            Some(roles) => roles
                .iter()
                .any(|role| role == ANY_ROLE || principal.has_role(role)),
        }
    }
}

/// Decides whether a principal holds a permission mode on a field.
///
/// Implementations must be thread-safe (`Send + Sync`); one checker is shared
/// by every request through the admin registry.
pub trait PermissionChecker: Send + Sync {
    fn is_allowed(&self, meta: &Meta, mode: PermissionMode, principal: &Principal) -> bool;
}

/// Checker backed by the [`Permission`] attached to each field.
///
/// Fields without a permission are open to every principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePermissionChecker;

impl PermissionChecker for RolePermissionChecker {
    fn is_allowed(&self, meta: &Meta, mode: PermissionMode, principal: &Principal) -> bool {
        meta.permission()
            .map_or(true, |permission| permission.allows(mode, principal))
    }
}
