//! Configuration of the view engine.
//!
//! The configuration is stored in TOML format:
//!
//! ```toml
//! view_paths = ["app/views", "vendor/admin/views"]
//! theme = "default"
//! cache_templates = true
//! strict_mode = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Default theme directory name under `themes/`.
pub const DEFAULT_THEME: &str = "default";

/// Settings fixed when the view engine is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// View roots, searched in order within each specificity tier.
    pub view_paths: Vec<PathBuf>,

    /// Theme directory searched after the resource directory.
    pub theme: String,

    /// Whether merged layouts are memoized. When `false` every page render
    /// resolves and compiles its layout again, which picks up template edits
    /// without a restart.
    pub cache_templates: bool,

    /// Whether templates fail on missing variables instead of rendering them
    /// as empty.
    pub strict_mode: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_paths: vec![PathBuf::from("views")],
            theme: DEFAULT_THEME.to_string(),
            cache_templates: true,
            strict_mode: false,
        }
    }
}

impl ViewConfig {
    pub fn new(view_paths: Vec<PathBuf>) -> Self {
        Self {
            view_paths,
            ..Self::default()
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// Relative view paths are taken relative to the directory holding the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading view configuration from {:?}", path);

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent() {
            config.view_paths = config
                .view_paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))
    }
}
