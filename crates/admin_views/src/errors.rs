use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur in the view layer.
///
/// Rendering itself degrades to partial output and logs its failures, so most
/// of these variants surface only from the typed helper API and from
/// configuration loading.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed while reading configuration or templates.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The view configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation needed a resource but none was selected or given.
    #[error("No resource selected")]
    NoActiveResource,

    /// A template name could not be resolved in any view root.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A template failed to compile.
    #[error("Template compilation failed: {template} - {message}")]
    Compilation {
        /// The file that failed to compile
        template: String,
        /// Message from the template parser
        message: String,
    },

    /// A resolved template failed while executing.
    #[error("Template rendering failed: {template} - {message}")]
    Render {
        /// Logical name of the template being rendered
        template: String,
        /// Message from the template renderer
        message: String,
    },

    /// A resource model operation failed.
    #[error(transparent)]
    Resource(#[from] admin_resource::Error),
}
