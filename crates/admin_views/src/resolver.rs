//! # Template path resolution
//!
//! Templates are looked up across the configured view roots in three
//! specificity tiers:
//!
//! 1. `<root>/<resource name>/` - overrides for one resource
//! 2. `<root>/themes/<theme>/` - the active theme
//! 3. `<root>/` - the defaults
//!
//! Tiers are searched in that order, and within a tier the view roots are
//! searched in configuration order. The first existing file wins.
//!
//! ```rust,no_run
//! use admin_views::{TemplateResolver, TemplateSet};
//! use std::path::PathBuf;
//!
//! let resolver = TemplateResolver::new(vec![PathBuf::from("views")], "default");
//! let mut set = TemplateSet::new();
//! if resolver.find_template(&mut set, "show.tmpl", "order") {
//!     assert!(set.contains("show"));
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use handlebars::{Handlebars, Template};
use tracing::{debug, warn};

use crate::errors::Error;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// File suffix of template files.
pub const TEMPLATE_EXTENSION: &str = ".tmpl";

/// Directory holding the theme directories inside a view root.
pub const THEMES_DIR: &str = "themes";

/// The logical name a template file is registered under: its path relative to
/// the candidate directory, without the `.tmpl` suffix.
pub fn logical_name(template_name: &str) -> &str {
    template_name
        .strip_suffix(TEMPLATE_EXTENSION)
        .unwrap_or(template_name)
}

/// A mergeable collection of compiled templates keyed by logical name.
///
/// Merging never drops definitions: adding a template only replaces an
/// existing one of the same name.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a compiled template, replacing one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, template: Template) {
        self.templates.insert(name.into(), template);
    }

    /// Compiles `source` and adds it under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Compilation` if the source is not a valid template.
    pub fn insert_source(&mut self, name: &str, source: &str) -> Result<(), Error> {
        let template = Template::compile(source).map_err(|e| Error::Compilation {
            template: name.to_string(),
            message: e.to_string(),
        })?;
        self.insert(name, template);
        Ok(())
    }

    /// Adds every template of `other`, replacing those of the same name and
    /// keeping the rest.
    pub fn merge(&mut self, other: &TemplateSet) {
        for (name, template) in &other.templates {
            self.templates.insert(name.clone(), template.clone());
        }
    }

    /// Whether a template is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Logical names in the set, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of templates in the set.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registers every template of the set in `registry`, where they can be
    /// rendered by name and included as partials.
    pub fn install(&self, registry: &mut Handlebars<'_>) {
        for (name, template) in &self.templates {
            registry.register_template(name, template.clone());
        }
    }
}

/// Finds template files across the view roots.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    view_paths: Vec<PathBuf>,
    theme: String,
}

impl TemplateResolver {
    /// Creates a resolver over `view_paths`, searched in order, using the
    /// theme directory `themes/<theme>`.
    pub fn new(view_paths: Vec<PathBuf>, theme: impl Into<String>) -> Self {
        Self {
            view_paths,
            theme: theme.into(),
        }
    }

    /// The view roots, in search order.
    pub fn view_paths(&self) -> &[PathBuf] {
        &self.view_paths
    }

    /// Existing directories to search for `resource_name`, most specific
    /// first. An empty resource name skips the resource tier.
    pub fn candidate_dirs(&self, resource_name: &str) -> Vec<PathBuf> {
        let theme_dir = Path::new(THEMES_DIR).join(&self.theme);
        let mut tiers: Vec<&Path> = Vec::with_capacity(3);
        if !resource_name.is_empty() {
            tiers.push(Path::new(resource_name));
        }
        tiers.push(&theme_dir);
        tiers.push(Path::new("."));

        tiers
            .iter()
            .flat_map(|tier| self.view_paths.iter().map(move |root| root.join(tier)))
            .filter(|dir| dir.is_dir())
            .collect()
    }

    /// The file `template_name` resolves to, without reading it.
    pub fn locate(&self, template_name: &str, resource_name: &str) -> Option<PathBuf> {
        self.candidate_dirs(resource_name)
            .into_iter()
            .map(|dir| dir.join(template_name))
            .find(|path| path.is_file())
    }

    /// Resolves `template_name` and merges the compiled template into `set`.
    ///
    /// Returns `false` when no candidate directory holds a usable file. A
    /// file that cannot be read or compiled is logged and skipped, so the
    /// search falls through to less specific tiers.
    pub fn find_template(&self, set: &mut TemplateSet, template_name: &str, resource_name: &str) -> bool {
        for dir in self.candidate_dirs(resource_name) {
            let path = dir.join(template_name);
            if !path.is_file() {
                continue;
            }

            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    warn!("Failed to read template {:?}: {}", path, e);
                    continue;
                }
            };

            match set.insert_source(logical_name(template_name), &source) {
                Ok(()) => {
                    debug!("Resolved template {} to {:?}", template_name, path);
                    return true;
                }
                Err(e) => warn!("Skipping template {:?}: {}", path, e),
            }
        }

        debug!(
            "Template {} not found for resource '{}'",
            template_name, resource_name
        );
        false
    }
}
