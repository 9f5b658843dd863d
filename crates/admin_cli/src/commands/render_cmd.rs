//! Page rendering command.
//!
//! ```bash
//! # Full edit page of order 42, with layout
//! admin-views render --config views.toml --schema schema.toml \
//!     --resource order --view edit --data order-42.json --role clerk
//!
//! # Only the page body
//! admin-views render --schema schema.toml --resource order --view show \
//!     --data order-42.json --partial
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use admin_resource::{Admin, Principal, SchemaDefinition};
use admin_views::{ViewEngine, LAYOUT, TEMPLATE_EXTENSION};
use clap::Args;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::load_view_config;
use crate::errors::Error;

#[cfg(test)]
#[path = "render_cmd_tests.rs"]
mod tests;

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// View configuration file (TOML); defaults to `./views`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resource schema file (TOML)
    #[arg(long)]
    pub schema: PathBuf,

    /// Template to render, e.g. `show`
    #[arg(long)]
    pub view: String,

    /// Resource the page belongs to
    #[arg(long)]
    pub resource: Option<String>,

    /// JSON file with the record or list to render
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Render the page body without the layout
    #[arg(long)]
    pub partial: bool,

    /// Identifier of the principal rendering the page
    #[arg(long, default_value = "cli")]
    pub user: String,

    /// Role of the principal, may be repeated
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

impl RenderArgs {
    fn principal(&self) -> Principal {
        self.roles
            .iter()
            .fold(Principal::new(self.user.clone()), |principal, role| {
                principal.with_role(role.clone())
            })
    }
}

fn load_record(path: Option<&Path>) -> Result<Value, Error> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };

    let content = fs::read_to_string(path).map_err(|source| Error::LoadFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Renders `args.view` into `out`.
///
/// # Errors
///
/// Fails when an input file cannot be loaded, the resource is unknown, or the
/// template (or the layout of a full page) does not exist.
#[instrument(skip(out))]
pub fn execute<W: Write>(args: &RenderArgs, mut out: W) -> Result<(), Error> {
    let config = load_view_config(args.config.as_deref())?;
    let schema = SchemaDefinition::load(&args.schema)?;
    let admin = Arc::new(Admin::from_schema(&schema)?);
    let record = load_record(args.data.as_deref())?;

    let engine = Arc::new(ViewEngine::new(config));
    let mut ctx = engine.context(admin, args.principal());
    if let Some(resource) = &args.resource {
        if !ctx.use_resource(resource) {
            return Err(Error::InvalidArguments(format!("Unknown resource: {}", resource)));
        }
    }

    if args.partial {
        ctx.set_result(record);
        let html = ctx.try_render(&args.view)?;
        out.write_all(html.as_bytes()).map_err(Error::WriteOutput)?;
    } else {
        let layout = format!("{}{}", LAYOUT, TEMPLATE_EXTENSION);
        if engine.resolver().locate(&layout, ctx.resource_name()).is_none() {
            return Err(Error::TemplateNotFound(layout));
        }
        debug!("Rendering page {} with layout", args.view);
        ctx.execute(&args.view, record, &mut out);
    }

    out.flush().map_err(Error::WriteOutput)?;
    info!("Rendered {} for '{}'", args.view, ctx.resource_name());
    Ok(())
}
