use super::*;
use crate::meta::FieldKind;

#[test]
fn test_permission_mode_from_str() {
    assert_eq!("read".parse::<PermissionMode>().unwrap(), PermissionMode::Read);
    assert_eq!(
        " Update ".parse::<PermissionMode>().unwrap(),
        PermissionMode::Update
    );
    assert!(matches!(
        "publish".parse::<PermissionMode>(),
        Err(Error::UnknownPermissionMode(mode)) if mode == "publish"
    ));
}

#[test]
fn test_permission_mode_display_round_trips_through_from_str() {
    for mode in [
        PermissionMode::Create,
        PermissionMode::Read,
        PermissionMode::Update,
        PermissionMode::Delete,
    ] {
        assert_eq!(mode.to_string().parse::<PermissionMode>().unwrap(), mode);
    }
}

#[test]
fn test_permission_without_entry_is_unrestricted() {
    let permission = Permission::new().allow(PermissionMode::Update, ["admin"]);
    let guest = Principal::new("guest");

    assert!(permission.allows(PermissionMode::Read, &guest));
    assert!(!permission.allows(PermissionMode::Update, &guest));
}

#[test]
fn test_permission_matches_any_listed_role() {
    let permission = Permission::new().allow(PermissionMode::Update, ["admin", "editor"]);
    let editor = Principal::new("ed").with_role("editor");

    assert!(permission.allows(PermissionMode::Update, &editor));
}

#[test]
fn test_permission_wildcard_role_grants_everyone() {
    let permission = Permission::new().allow(PermissionMode::Read, [ANY_ROLE]);

    assert!(permission.allows(PermissionMode::Read, &Principal::new("anyone")));
}

#[test]
fn test_permission_deserializes_from_toml_table() {
    let permission: Permission = toml::from_str("read = [\"*\"]\nupdate = [\"admin\"]").unwrap();

    assert_eq!(
        permission,
        Permission::new()
            .allow(PermissionMode::Read, ["*"])
            .allow(PermissionMode::Update, ["admin"])
    );
}

#[test]
fn test_role_permission_checker_uses_meta_permission() {
    let checker = RolePermissionChecker;
    let open = Meta::new("title", FieldKind::String);
    let restricted = Meta::new("cost", FieldKind::Number)
        .with_permission(Permission::new().allow(PermissionMode::Read, ["finance"]));

    let clerk = Principal::new("clerk");
    let accountant = Principal::new("acc").with_role("finance");

    assert!(checker.is_allowed(&open, PermissionMode::Read, &clerk));
    assert!(!checker.is_allowed(&restricted, PermissionMode::Read, &clerk));
    assert!(checker.is_allowed(&restricted, PermissionMode::Read, &accountant));
}
