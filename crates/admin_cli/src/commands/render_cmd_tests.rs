use super::*;
use tempfile::TempDir;

const SCHEMA: &str = r#"
prefix = "/admin"

[[resources]]
name = "order"

[[resources.metas]]
name = "number"

[[resources.metas]]
name = "cost"
type = "number"
permission = { read = ["finance"] }
"#;

fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Workspace with a schema, a view configuration and one order record.
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "schema.toml", SCHEMA);
    write(dir.path(), "views.toml", "view_paths = [\"views\"]\n");
    write(dir.path(), "views/layout.tmpl", "<body>{{{Content}}}</body>");
    write(
        dir.path(),
        "views/show.tmpl",
        "{{#each (allowed_metas)}}{{Name}}={{value_of @root.Result this}};{{/each}}",
    );
    write(
        dir.path(),
        "order.json",
        r#"{"_type": "Order", "id": 42, "number": "A-1", "cost": 10}"#,
    );
    dir
}

fn args(dir: &Path) -> RenderArgs {
    RenderArgs {
        config: Some(dir.join("views.toml")),
        schema: dir.join("schema.toml"),
        view: "show".to_string(),
        resource: Some("order".to_string()),
        data: Some(dir.join("order.json")),
        partial: false,
        user: "cli".to_string(),
        roles: Vec::new(),
    }
}

fn run(args: &RenderArgs) -> Result<String, Error> {
    let mut out = Vec::new();
    execute(args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_render_full_page() {
    let dir = workspace();
    assert_eq!(run(&args(dir.path())).unwrap(), "<body>number=A-1;</body>");
}

#[test]
fn test_render_partial_with_role() {
    let dir = workspace();
    let mut args = args(dir.path());
    args.partial = true;
    args.roles = vec!["finance".to_string()];

    assert_eq!(run(&args).unwrap(), "number=A-1;cost=10;");
}

#[test]
fn test_principal_collects_roles() {
    let dir = workspace();
    let mut args = args(dir.path());
    args.user = "carol".to_string();
    args.roles = vec!["finance".to_string(), "clerk".to_string()];

    let principal = args.principal();
    assert_eq!(principal.id, "carol");
    assert!(principal.has_role("finance"));
    assert!(principal.has_role("clerk"));
}

#[test]
fn test_unknown_resource_is_rejected() {
    let dir = workspace();
    let mut args = args(dir.path());
    args.resource = Some("invoice".to_string());

    assert!(matches!(run(&args), Err(Error::InvalidArguments(_))));
}

#[test]
fn test_missing_layout_is_reported() {
    let dir = workspace();
    fs::remove_file(dir.path().join("views/layout.tmpl")).unwrap();

    assert!(matches!(
        run(&args(dir.path())),
        Err(Error::TemplateNotFound(name)) if name == "layout.tmpl"
    ));
}

#[test]
fn test_missing_partial_is_reported() {
    let dir = workspace();
    let mut args = args(dir.path());
    args.partial = true;
    args.view = "edit".to_string();

    assert!(matches!(
        run(&args),
        Err(Error::View(admin_views::Error::TemplateNotFound(_)))
    ));
}

#[test]
fn test_invalid_record_is_reported() {
    let dir = workspace();
    write(dir.path(), "order.json", "{not json");

    assert!(matches!(run(&args(dir.path())), Err(Error::ParseJson(_))));
}

#[test]
fn test_missing_record_file_is_reported() {
    let dir = workspace();
    let mut args = args(dir.path());
    args.data = Some(dir.path().join("missing.json"));

    assert!(matches!(run(&args), Err(Error::LoadFile { .. })));
}
