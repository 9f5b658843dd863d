use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while registering resources or loading a
/// resource schema.
///
/// Rendering never produces these errors; they surface at process setup when
/// the admin registry is being built.
///
/// # Examples
///
/// ```rust
/// use admin_resource::{Error, SchemaDefinition};
///
/// match SchemaDefinition::from_toml_str("prefix = 42") {
///     Ok(_) => unreachable!(),
///     Err(Error::SchemaParse(message)) => eprintln!("bad schema: {}", message),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed while reading a schema file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A resource schema could not be parsed.
    ///
    /// Wraps the TOML parser message, which includes the offending line.
    #[error("Failed to parse resource schema: {0}")]
    SchemaParse(String),

    /// A permission mode name was not one of `create`, `read`, `update`
    /// or `delete`.
    #[error("Unknown permission mode: {0}")]
    UnknownPermissionMode(String),

    /// Two resources were registered under the same name.
    #[error("Resource already registered: {0}")]
    DuplicateResource(String),

    /// A field referenced a nested resource that is not defined.
    #[error("Field {field} references unknown resource {resource}")]
    UnknownResource {
        /// The `owner.field` path of the referencing field
        field: String,
        /// The resource name that could not be found
        resource: String,
    },

    /// A `single` or `many` field does not name the resource it nests.
    #[error("Field {0} nests a resource but does not name one")]
    MissingNestedResource(String),

    /// Two different resources in the registered tree share a name, so
    /// template views naming one of them would be ambiguous.
    #[error("Conflicting resources named {0}")]
    ConflictingResource(String),

    /// Nested resource references form a cycle.
    #[error("Cyclic nested resource reference through {0}")]
    CyclicResource(String),

    /// A record could not be converted into an entity value.
    #[error("Failed to serialize entity: {0}")]
    Serialization(#[from] serde_json::Error),
}
