//! Command modules for the admin-views CLI.
//!
//! - `render_cmd`: renders a page or partial of a resource to standard output
//! - `resolve_cmd`: shows which file a template name resolves to

pub mod render_cmd;
pub mod resolve_cmd;

use std::path::Path;

use admin_views::ViewConfig;
use tracing::debug;

use crate::errors::Error;

/// Loads the view configuration, or the defaults when no file is given.
pub(crate) fn load_view_config(path: Option<&Path>) -> Result<ViewConfig, Error> {
    match path {
        Some(path) => Ok(ViewConfig::load(path)?),
        None => {
            debug!("No view configuration given, using defaults");
            Ok(ViewConfig::default())
        }
    }
}
