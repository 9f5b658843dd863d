//! Template resolution command.
//!
//! Prints the file a template name resolves to for a resource, which shows
//! whether a resource or theme override is in effect:
//!
//! ```bash
//! admin-views resolve show.tmpl --resource order
//! ```

use std::io::Write;
use std::path::PathBuf;

use admin_views::{TemplateResolver, TEMPLATE_EXTENSION};
use clap::Args;
use tracing::instrument;

use super::load_view_config;
use crate::errors::Error;

#[cfg(test)]
#[path = "resolve_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Template name, with or without the `.tmpl` suffix
    pub name: String,

    /// View configuration file (TOML); defaults to `./views`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resource whose overrides are searched first
    #[arg(long, default_value = "")]
    pub resource: String,
}

/// Writes the resolved path followed by a newline to `out`.
///
/// # Errors
///
/// Returns `Error::TemplateNotFound` when no view root holds the template.
#[instrument(skip(out))]
pub fn execute<W: Write>(args: &ResolveArgs, mut out: W) -> Result<PathBuf, Error> {
    let config = load_view_config(args.config.as_deref())?;
    let resolver = TemplateResolver::new(config.view_paths, config.theme);

    let file_name = if args.name.ends_with(TEMPLATE_EXTENSION) {
        args.name.clone()
    } else {
        format!("{}{}", args.name, TEMPLATE_EXTENSION)
    };

    let path = resolver
        .locate(&file_name, &args.resource)
        .ok_or_else(|| Error::TemplateNotFound(file_name.clone()))?;

    writeln!(out, "{}", path.display()).map_err(Error::WriteOutput)?;
    Ok(path)
}
