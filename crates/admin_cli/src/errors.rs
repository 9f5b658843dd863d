use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the admin-views CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid command-line arguments were provided.
    ///
    /// Returned for arguments that parse but name something that does not
    /// exist, such as an unknown resource.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to load a file from the filesystem.
    #[error("Failed to load file {path}: {source}")]
    LoadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The record file does not hold valid JSON.
    #[error("Failed to parse JSON record: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// A template the command needs could not be resolved.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Failed to write the rendered output.
    #[error("Failed to write output: {0}")]
    WriteOutput(io::Error),

    /// The resource schema could not be loaded.
    #[error(transparent)]
    Resource(#[from] admin_resource::Error),

    /// The view configuration could not be loaded or a template failed.
    #[error(transparent)]
    View(#[from] admin_views::Error),
}
