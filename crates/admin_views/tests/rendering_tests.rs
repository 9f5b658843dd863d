//! End-to-end rendering tests over the shipped default views.
//!
//! The engine searches `tests/fixtures/views` before the workspace `views/`
//! directory, so the fixtures act as application overrides of the defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use admin_resource::{
    Admin, FieldKind, Meta, Permission, PermissionMode, Principal, Resource, SelectOption,
};
use admin_views::{ViewConfig, ViewContext, ViewEngine};
use serde_json::{json, Value};
use tracing::info;

fn view_roots() -> Vec<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    vec![
        manifest_dir.join("tests/fixtures/views"),
        manifest_dir.join("../../views"),
    ]
}

fn order_admin() -> Arc<Admin> {
    let item = Arc::new(
        Resource::new("order_item")
            .with_meta(Meta::new("title", FieldKind::String))
            .with_meta(Meta::new("quantity", FieldKind::Number)),
    );

    let mut admin = Admin::new("/admin");
    admin
        .add_resource(
            Resource::new("order")
                .with_meta(Meta::new("number", FieldKind::String))
                .with_meta(Meta::new("state", FieldKind::Select).with_options(vec![
                    SelectOption::new("open", "Open"),
                    SelectOption::new("shipped", "Shipped"),
                ]))
                .with_meta(
                    Meta::new("note", FieldKind::Text).with_permission(
                        Permission::new()
                            .allow(PermissionMode::Read, ["manager"])
                            .allow(PermissionMode::Update, ["manager"]),
                    ),
                )
                .with_meta(Meta::new("items", FieldKind::Many).with_resource(item)),
        )
        .unwrap();
    admin
        .add_resource(Resource::new("customer").with_meta(Meta::new("name", FieldKind::String)))
        .unwrap();
    Arc::new(admin)
}

fn order() -> Value {
    json!({
        "_type": "Order",
        "id": 42,
        "number": "A-1",
        "state": "open",
        "note": "fragile",
        "items": [
            {"title": "first", "quantity": 1},
            {"title": "second", "quantity": 2},
        ],
    })
}

fn order_context(engine: &Arc<ViewEngine>, principal: Principal) -> ViewContext {
    let mut ctx = engine.context(order_admin(), principal);
    assert!(ctx.use_resource("order"));
    ctx
}

fn execute(ctx: &mut ViewContext, page: &str, result: Value) -> String {
    let mut out = Vec::new();
    ctx.execute(page, result, &mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_edit_page_renders_nested_form() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));
    let mut ctx = order_context(&engine, Principal::new("alice").with_role("clerk"));

    let page = execute(&mut ctx, "edit", order());
    info!("Rendered edit page of {} bytes", page.len());

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(r#"<form action="/admin/order/42" method="post">"#));
    assert!(page.contains(r#"name="QorResource.number" value="A-1""#));
    assert!(page.contains(r#"<option value="open" selected>Open</option>"#));
    assert!(page.contains(r#"<option value="shipped">Shipped</option>"#));
    assert!(page.contains(r#"id="QorResourceitems[1]title" name="QorResource.items[1].title" value="second""#));
    assert!(page.contains(r#"name="QorResource.items[0].quantity" value="1""#));
    assert!(!page.contains("QorResource.note"));
    assert!(page.contains(r#"<a href="/admin/customer">customer</a>"#));
    assert!(page.contains("Signed in as alice"));
}

#[test]
fn test_restricted_field_is_shown_to_permitted_role() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));
    let mut ctx = order_context(&engine, Principal::new("mia").with_role("manager"));

    let page = execute(&mut ctx, "edit", order());
    assert!(page.contains(r#"<textarea id="QorResourcenote" name="QorResource.note">fragile</textarea>"#));
}

#[test]
fn test_index_page_links_every_record() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));
    let mut ctx = order_context(&engine, Principal::new("alice"));

    let orders = json!([
        {"_type": "Order", "id": 42, "number": "A-1"},
        {"_type": "Order", "id": 43, "number": "A-2"},
    ]);
    let page = execute(&mut ctx, "index", orders);

    assert!(page.contains(r#"<a href="/admin/order/new">New</a>"#));
    assert!(page.contains(r#"<a href="/admin/order/42">Show</a>"#));
    assert!(page.contains(r#"<a href="/admin/order/43">Show</a>"#));
    assert!(page.contains("<td>A-2</td>"));
}

#[test]
fn test_resource_override_replaces_default_page() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));
    let mut ctx = order_context(&engine, Principal::new("alice"));

    let page = execute(&mut ctx, "show", order());

    assert!(page.contains("<h1>Order A-1</h1>"));
    assert!(page.contains(r#"<a href="/admin/order">All orders</a>"#));
    assert!(page.contains("</html>"));
}

#[test]
fn test_default_show_page_for_other_resource() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));
    let mut ctx = engine.context(order_admin(), Principal::new("alice"));
    assert!(ctx.use_resource("customer"));

    let page = execute(&mut ctx, "show", json!({"_type": "Customer", "id": "c-7", "name": "Ada"}));

    assert!(page.contains("<dd>Ada</dd>"));
    assert!(page.contains(r#"<a href="/admin/customer/c-7/edit">Edit</a>"#));
}

#[test]
fn test_second_execute_reuses_cached_layout() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(view_roots())));

    let first = execute(&mut order_context(&engine, Principal::new("alice")), "show", order());
    let second = execute(&mut order_context(&engine, Principal::new("alice")), "show", order());

    assert_eq!(first, second);
    let stats = engine.cache_statistics();
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);
}

#[test]
fn test_empty_search_path_renders_nothing() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(Vec::new())));
    let mut ctx = order_context(&engine, Principal::new("alice"));

    assert_eq!(ctx.render("show"), "");
    assert_eq!(execute(&mut ctx, "show", order()), "");
}

#[test]
fn test_url_for_entity() {
    let engine = Arc::new(ViewEngine::new(ViewConfig::new(Vec::new())));
    let ctx = order_context(&engine, Principal::new("alice"));

    let target = ctx.linkable(&order()).unwrap();
    assert_eq!(ctx.url_for(&target), "/admin/order/42");
}
