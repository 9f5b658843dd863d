use super::*;
use std::io;

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}

#[test]
fn test_io_error_display() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error = Error::Io(io_error);
    assert_eq!(error.to_string(), "IO error: File not found");
}

#[test]
fn test_unknown_resource_error_display() {
    let error = Error::UnknownResource {
        field: "order.items".to_string(),
        resource: "order_item".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Field order.items references unknown resource order_item"
    );
}

#[test]
fn test_unknown_permission_mode_display() {
    let error = Error::UnknownPermissionMode("publish".to_string());
    assert_eq!(error.to_string(), "Unknown permission mode: publish");
}

#[test]
fn test_duplicate_resource_debug_format() {
    let error = Error::DuplicateResource("order".to_string());
    let debug_output = format!("{error:?}");
    assert!(debug_output.contains("DuplicateResource"));
    assert!(debug_output.contains("order"));
}

#[test]
fn test_missing_nested_resource_display() {
    let error = Error::MissingNestedResource("order.address".to_string());
    assert_eq!(
        error.to_string(),
        "Field order.address nests a resource but does not name one"
    );
}
