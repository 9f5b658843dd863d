use super::*;
use crate::meta::FieldKind;
use crate::permission::{Permission, RolePermissionChecker};

fn order_resource() -> Arc<Resource> {
    let item = Arc::new(
        Resource::new("order_item")
            .with_meta(Meta::new("sku", FieldKind::String))
            .with_meta(Meta::new("quantity", FieldKind::Number)),
    );

    Arc::new(
        Resource::new("order")
            .with_meta(Meta::new("number", FieldKind::String))
            .with_meta(
                Meta::new("cost", FieldKind::Number)
                    .with_permission(Permission::new().allow(PermissionMode::Read, ["finance"])),
            )
            .with_meta(Meta::new("state", FieldKind::Select).with_permission(
                Permission::new().allow(PermissionMode::Update, ["admin"]),
            ))
            .with_meta(Meta::new("items", FieldKind::Many).with_resource(item)),
    )
}

#[test]
fn test_with_meta_sets_owner_and_keeps_order() {
    let order = order_resource();
    let names: Vec<_> = order.index_metas().iter().map(|m| m.name()).collect();

    assert_eq!(names, vec!["number", "cost", "state", "items"]);
    assert!(order.index_metas().iter().all(|m| m.owner() == "order"));
}

#[test]
fn test_allowed_metas_excludes_forbidden_and_preserves_order() {
    let order = order_resource();
    let clerk = Principal::new("clerk");

    let allowed = order.allowed_metas(
        order.index_metas(),
        &clerk,
        &RolePermissionChecker,
        &[PermissionMode::Read],
    );
    let names: Vec<_> = allowed.iter().map(|m| m.name()).collect();

    assert_eq!(names, vec!["number", "state", "items"]);
}

#[test]
fn test_allowed_metas_accepts_any_of_the_modes() {
    let order = Arc::new(
        Resource::new("order")
            .with_meta(Meta::new("note", FieldKind::Text).with_permission(
                Permission::new()
                    .allow(PermissionMode::Read, ["nobody"])
                    .allow(PermissionMode::Update, ["editor"]),
            )),
    );
    let editor = Principal::new("ed").with_role("editor");

    let read_only = order.allowed_metas(
        order.index_metas(),
        &editor,
        &RolePermissionChecker,
        &[PermissionMode::Read],
    );
    assert!(read_only.is_empty());

    let read_or_update = order.allowed_metas(
        order.index_metas(),
        &editor,
        &RolePermissionChecker,
        &[PermissionMode::Read, PermissionMode::Update],
    );
    assert_eq!(read_or_update.len(), 1);
}

#[test]
fn test_allowed_metas_without_modes_is_empty() {
    let order = order_resource();
    let allowed = order.allowed_metas(
        order.index_metas(),
        &Principal::new("p"),
        &RolePermissionChecker,
        &[],
    );
    assert!(allowed.is_empty());
}

#[test]
fn test_find_resource_searches_nested_fields() {
    let order = order_resource();

    assert_eq!(order.find_resource("order").unwrap().name(), "order");
    assert_eq!(order.find_resource("order_item").unwrap().name(), "order_item");
    assert!(order.find_resource("customer").is_none());
}

#[test]
fn test_find_meta_by_owner_and_name() {
    let order = order_resource();

    let sku = order.find_meta("order_item", "sku").unwrap();
    assert_eq!(sku.owner(), "order_item");
    assert!(order.find_meta("order", "sku").is_none());
}

#[test]
fn test_resource_view() {
    let view = Resource::new("order").view();
    assert_eq!(view[KIND_KEY], RESOURCE_KIND);
    assert_eq!(view["Name"], "order");
}
