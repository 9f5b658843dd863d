//! The process-wide view engine.
//!
//! A [`ViewEngine`] is built once from a [`ViewConfig`] and shared between
//! requests as `Arc<ViewEngine>`. It owns the resolver over the configured
//! view roots, the layout cache and the field renderer registry. Each request
//! gets its own [`ViewContext`] from [`ViewEngine::context`].

use std::sync::Arc;

use admin_resource::{Admin, Principal};
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheStatistics, TemplateCache};
use crate::config::ViewConfig;
use crate::context::ViewContext;
use crate::form::FieldRegistry;
use crate::resolver::{TemplateResolver, TemplateSet, TEMPLATE_EXTENSION};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Logical name of the outer page template.
pub const LAYOUT: &str = "layout";
/// Logical name of the header partial included by layouts.
pub const HEADER: &str = "header";
/// Logical name of the footer partial included by layouts.
pub const FOOTER: &str = "footer";

/// Shared rendering state: configuration, resolver, layout cache and field
/// renderers.
#[derive(Debug)]
pub struct ViewEngine {
    config: ViewConfig,
    resolver: TemplateResolver,
    cache: TemplateCache,
    fields: FieldRegistry,
}

impl ViewEngine {
    /// Creates an engine over the view roots of `config`, with an empty cache
    /// and no field renderers.
    pub fn new(config: ViewConfig) -> Self {
        info!(
            "Creating view engine over {} view root(s), theme '{}'",
            config.view_paths.len(),
            config.theme
        );

        let resolver = TemplateResolver::new(config.view_paths.clone(), config.theme.clone());
        Self {
            config,
            resolver,
            cache: TemplateCache::new(),
            fields: FieldRegistry::new(),
        }
    }

    /// Replaces the field renderers consulted before the `forms/` templates.
    pub fn with_field_registry(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The resolver over the configured view roots.
    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Field renderers consulted before the `forms/` sub-templates.
    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Layout cache counters.
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }

    /// Drops the cached layout of one page. Returns `true` if it was cached.
    pub fn invalidate(&self, resource_name: &str, page_name: &str) -> bool {
        self.cache.invalidate(&cache_key(resource_name, page_name))
    }

    /// Drops every cached layout.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// The layout set for a page of a resource: `layout` plus the `header` and
    /// `footer` partials it includes.
    ///
    /// The set is memoized per page unless template caching is disabled.
    pub fn layout_for(&self, resource_name: &str, page_name: &str) -> Arc<TemplateSet> {
        if !self.config.cache_templates {
            debug!("Template caching disabled, rebuilding layout for {}", page_name);
            return Arc::new(self.build_layout(resource_name));
        }

        self.cache
            .get_or_build(&cache_key(resource_name, page_name), || {
                self.build_layout(resource_name)
            })
    }

    fn build_layout(&self, resource_name: &str) -> TemplateSet {
        let mut set = TemplateSet::new();
        if !self.find(&mut set, LAYOUT, resource_name) {
            warn!("No layout template found for resource '{}'", resource_name);
            return set;
        }

        for partial in [HEADER, FOOTER] {
            if set.contains(partial) || self.find(&mut set, partial, resource_name) {
                continue;
            }
            debug!("No {} template found, using an empty one", partial);
            if let Err(e) = set.insert_source(partial, "") {
                warn!("Failed to register empty {}: {}", partial, e);
            }
        }

        set
    }

    fn find(&self, set: &mut TemplateSet, name: &str, resource_name: &str) -> bool {
        let file_name = format!("{}{}", name, TEMPLATE_EXTENSION);
        self.resolver.find_template(set, &file_name, resource_name)
    }

    /// Creates the rendering context of one request.
    pub fn context(self: &Arc<Self>, admin: Arc<Admin>, principal: Principal) -> ViewContext {
        ViewContext::new(Arc::clone(self), admin, principal)
    }
}
