use super::*;
use std::path::PathBuf;

#[test]
fn test_cli_definition_is_valid() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn test_parse_render_with_repeated_roles() {
    let cli = Cli::try_parse_from([
        "admin-views",
        "render",
        "--schema",
        "schema.toml",
        "--view",
        "edit",
        "--resource",
        "order",
        "--role",
        "clerk",
        "--role",
        "finance",
        "--partial",
    ])
    .unwrap();

    match cli.command {
        Commands::Render(args) => {
            assert_eq!(args.schema, PathBuf::from("schema.toml"));
            assert_eq!(args.view, "edit");
            assert_eq!(args.resource.as_deref(), Some("order"));
            assert_eq!(args.roles, vec!["clerk", "finance"]);
            assert_eq!(args.user, "cli");
            assert!(args.partial);
            assert!(args.config.is_none());
        }
        _ => panic!("expected the render command"),
    }
}

#[test]
fn test_parse_resolve_defaults_to_no_resource() {
    let cli = Cli::try_parse_from(["admin-views", "resolve", "show"]).unwrap();

    match cli.command {
        Commands::Resolve(args) => {
            assert_eq!(args.name, "show");
            assert_eq!(args.resource, "");
        }
        _ => panic!("expected the resolve command"),
    }
}

#[test]
fn test_render_requires_schema() {
    assert!(Cli::try_parse_from(["admin-views", "render", "--view", "show"]).is_err());
}
