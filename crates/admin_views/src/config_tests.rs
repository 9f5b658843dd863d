use super::*;

#[test]
fn test_default_config() {
    let config = ViewConfig::default();
    assert_eq!(config.view_paths, vec![PathBuf::from("views")]);
    assert_eq!(config.theme, "default");
    assert!(config.cache_templates);
    assert!(!config.strict_mode);
}

#[test]
fn test_from_toml_str_fills_defaults() {
    let config = ViewConfig::from_toml_str("view_paths = [\"a\", \"b\"]").unwrap();
    assert_eq!(
        config.view_paths,
        vec![PathBuf::from("a"), PathBuf::from("b")]
    );
    assert_eq!(config.theme, "default");
    assert!(config.cache_templates);
}

#[test]
fn test_from_toml_str_reads_all_fields() {
    let config = ViewConfig::from_toml_str(
        "view_paths = []\ntheme = \"dark\"\ncache_templates = false\nstrict_mode = true",
    )
    .unwrap();
    assert!(config.view_paths.is_empty());
    assert_eq!(config.theme, "dark");
    assert!(!config.cache_templates);
    assert!(config.strict_mode);
}

#[test]
fn test_from_toml_str_invalid() {
    let result = ViewConfig::from_toml_str("theme = [");
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Failed to parse")));
}

#[test]
fn test_load_resolves_relative_paths_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("views.toml");
    fs::write(&path, "view_paths = [\"views\", \"/opt/shared/views\"]").unwrap();

    let config = ViewConfig::load(&path).unwrap();
    assert_eq!(config.view_paths[0], dir.path().join("views"));
    assert_eq!(config.view_paths[1], PathBuf::from("/opt/shared/views"));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ViewConfig::load(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Failed to read")));
}
