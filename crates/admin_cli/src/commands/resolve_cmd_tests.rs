use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn views() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("views.toml"), "view_paths = [\"views\"]\ntheme = \"dark\"\n").unwrap();
    write(dir.path(), "views/show.tmpl");
    write(dir.path(), "views/themes/dark/show.tmpl");
    write(dir.path(), "views/order/show.tmpl");
    dir
}

fn resolve(dir: &Path, name: &str, resource: &str) -> Result<(PathBuf, String), Error> {
    let args = ResolveArgs {
        name: name.to_string(),
        config: Some(dir.join("views.toml")),
        resource: resource.to_string(),
    };
    let mut out = Vec::new();
    let path = execute(&args, &mut out)?;
    Ok((path, String::from_utf8(out).unwrap()))
}

#[test]
fn test_resolve_prefers_resource_override() {
    let dir = views();
    let (path, printed) = resolve(dir.path(), "show", "order").unwrap();

    assert_eq!(path, dir.path().join("views").join("order").join("show.tmpl"));
    assert_eq!(printed, format!("{}\n", path.display()));
}

#[test]
fn test_resolve_falls_back_to_theme() {
    let dir = views();
    let (path, _) = resolve(dir.path(), "show.tmpl", "customer").unwrap();

    assert_eq!(
        path,
        dir.path().join("views").join("themes/dark").join("show.tmpl")
    );
}

#[test]
fn test_resolve_unknown_template() {
    let dir = views();
    assert!(matches!(
        resolve(dir.path(), "edit", ""),
        Err(Error::TemplateNotFound(name)) if name == "edit.tmpl"
    ));
}
