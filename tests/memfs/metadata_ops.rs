use std::collections::BTreeSet;

use memfs::{AttrValue, Config, FsError, PosixPermission, UserPrincipal};

use super::common::Fixture;

fn full_view_fixture() -> Fixture {
    Fixture::with_config(Config::unix().block_size(8).attribute_views(["unix", "user"]))
}

#[test]
fn wildcard_read_returns_exactly_the_basic_attributes() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/d").unwrap();

    let attrs = fixture.fs.read_attributes("/work/d", "basic:*").unwrap();
    assert_eq!(attrs.len(), 9);
    assert_eq!(attrs.get("isDirectory"), Some(&AttrValue::Bool(true)));
    assert_eq!(attrs.get("isRegularFile"), Some(&AttrValue::Bool(false)));
    assert_eq!(attrs.get("size"), Some(&AttrValue::Long(0)));
    for name in [
        "lastModifiedTime",
        "lastAccessTime",
        "creationTime",
        "isSymbolicLink",
        "isOther",
        "fileKey",
    ] {
        assert!(attrs.contains_key(name), "missing {name}");
    }
}

#[test]
fn wildcard_read_of_an_inherited_view_includes_parents() {
    let fixture = full_view_fixture();
    fixture.fs.create_file("/work/f").unwrap();

    let attrs = fixture.fs.read_attributes("/work/f", "posix:*").unwrap();
    // Inherited views contribute transitively: basic + owner + posix.
    assert!(attrs.contains_key("size"));
    assert!(attrs.contains_key("owner"));
    assert!(attrs.contains_key("permissions"));
    assert!(attrs.contains_key("group"));
}

#[test]
fn named_list_read_preserves_request_order() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/f", b"abc").unwrap();

    let attrs = fixture.fs.read_attributes("/work/f", "basic:size,fileKey,isDirectory").unwrap();
    let keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["size", "fileKey", "isDirectory"]);
    assert_eq!(attrs.get("size"), Some(&AttrValue::Long(3)));
}

#[test]
fn invalid_specs_are_rejected() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/f").unwrap();

    assert!(matches!(
        fixture.fs.get_attribute("/work/f", "basic:size:extra"),
        Err(FsError::InvalidFormat(_))
    ));
    assert!(matches!(
        fixture.fs.get_attribute("/work/f", ":size"),
        Err(FsError::InvalidFormat(_))
    ));
    assert!(matches!(
        fixture.fs.get_attribute("/work/f", "basic:nonsense"),
        Err(FsError::InvalidAttribute(_))
    ));
    assert!(matches!(
        fixture.fs.read_attributes("/work/f", "basic:size,*"),
        Err(FsError::InvalidAttribute(_))
    ));
    assert!(matches!(
        fixture.fs.get_attribute("/work/f", "acl:owner"),
        Err(FsError::Unsupported(_))
    ));
}

#[test]
fn default_view_is_basic() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/f", b"1234").unwrap();
    assert_eq!(fixture.fs.get_attribute("/work/f", "size").unwrap(), AttrValue::Long(4));
}

#[test]
fn posix_permissions_round_trip() {
    let fixture = full_view_fixture();
    fixture.fs.create_file("/work/f").unwrap();

    let perms = PosixPermission::from_mode(0o750);
    fixture
        .fs
        .set_attribute("/work/f", "posix:permissions", AttrValue::Permissions(perms.clone()))
        .unwrap();

    assert_eq!(
        fixture.fs.get_attribute("/work/f", "posix:permissions").unwrap(),
        AttrValue::Permissions(perms)
    );
    assert_eq!(fixture.fs.get_attribute("/work/f", "unix:mode").unwrap(), AttrValue::Int(0o750));

    // String form is coerced.
    fixture
        .fs
        .set_attribute("/work/f", "posix:permissions", AttrValue::String("rw-------".to_owned()))
        .unwrap();
    assert_eq!(fixture.fs.get_attribute("/work/f", "unix:mode").unwrap(), AttrValue::Int(0o600));
}

#[test]
fn owner_and_unix_ids_are_stable_per_principal() {
    let fixture = full_view_fixture();
    fixture.fs.create_file("/work/a").unwrap();
    fixture.fs.create_file("/work/b").unwrap();

    let uid_a = fixture.fs.get_attribute("/work/a", "unix:uid").unwrap();
    let uid_b = fixture.fs.get_attribute("/work/b", "unix:uid").unwrap();
    assert_eq!(uid_a, uid_b);

    fixture
        .fs
        .set_attribute("/work/b", "owner:owner", AttrValue::User(UserPrincipal("root".into())))
        .unwrap();
    let uid_b2 = fixture.fs.get_attribute("/work/b", "unix:uid").unwrap();
    assert_ne!(uid_a, uid_b2);
    assert_eq!(
        fixture.fs.get_attribute("/work/b", "owner:owner").unwrap(),
        AttrValue::User(UserPrincipal("root".into()))
    );
}

#[test]
fn unix_view_is_read_only() {
    let fixture = full_view_fixture();
    fixture.fs.create_file("/work/f").unwrap();
    assert!(matches!(
        fixture.fs.set_attribute("/work/f", "unix:uid", AttrValue::Int(42)),
        Err(FsError::Unsupported(_))
    ));
}

#[test]
fn dos_flags_default_false_and_toggle() {
    let fixture = Fixture::with_config(Config::windows().block_size(8).attribute_views(["dos"]));
    fixture.fs.create_file("C:\\work\\f").unwrap();

    assert_eq!(
        fixture.fs.get_attribute("C:\\work\\f", "dos:hidden").unwrap(),
        AttrValue::Bool(false)
    );
    fixture.fs.set_attribute("C:\\work\\f", "dos:hidden", AttrValue::Bool(true)).unwrap();
    assert_eq!(
        fixture.fs.get_attribute("C:\\work\\f", "dos:hidden").unwrap(),
        AttrValue::Bool(true)
    );
    assert!(matches!(
        fixture.fs.set_attribute("C:\\work\\f", "dos:hidden", AttrValue::Int(1)),
        Err(FsError::InvalidArgument(_))
    ));
}

#[test]
fn user_attributes_store_bytes() {
    let fixture = full_view_fixture();
    fixture.fs.create_file("/work/f").unwrap();

    fixture
        .fs
        .set_attribute("/work/f", "user:checksum", AttrValue::Bytes(vec![1, 2, 3]))
        .unwrap();
    assert_eq!(
        fixture.fs.get_attribute("/work/f", "user:checksum").unwrap(),
        AttrValue::Bytes(vec![1, 2, 3])
    );

    // Strings are stored as their UTF-8 bytes.
    fixture
        .fs
        .set_attribute("/work/f", "user:note", AttrValue::String("hi".to_owned()))
        .unwrap();
    assert_eq!(
        fixture.fs.get_attribute("/work/f", "user:note").unwrap(),
        AttrValue::Bytes(b"hi".to_vec())
    );

    let attrs = fixture.fs.read_attributes("/work/f", "user:*").unwrap();
    let keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["checksum", "note"]);
}

#[test]
fn initial_attributes_apply_on_create() {
    let fixture = full_view_fixture();
    let perms = AttrValue::String("rwx------".to_owned());
    fixture.fs.create_file_with("/work/f", &[("posix:permissions", perms)]).unwrap();
    assert_eq!(fixture.fs.get_attribute("/work/f", "unix:mode").unwrap(), AttrValue::Int(0o700));

    // Times are not settable at creation.
    let t = AttrValue::Time(filetime_now());
    assert!(matches!(
        fixture.fs.create_file_with("/work/g", &[("basic:lastModifiedTime", t)]),
        Err(FsError::Unsupported(_))
    ));
}

#[test]
fn configured_defaults_reach_new_files() {
    let fixture = Fixture::with_config(
        Config::unix()
            .block_size(8)
            .attribute_views(["posix"])
            .default_attribute_value("posix:permissions", AttrValue::String("r--r--r--".to_owned()))
            .default_attribute_value("owner:owner", AttrValue::String("auditor".to_owned())),
    );
    fixture.fs.create_file("/work/f").unwrap();

    let posix = fixture.fs.posix_attributes("/work/f").unwrap();
    assert_eq!(posix.owner, UserPrincipal("auditor".into()));
    assert_eq!(posix.permissions, PosixPermission::from_mode(0o444));
}

#[test]
fn posix_snapshot_requires_the_view() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/f").unwrap();
    assert!(matches!(fixture.fs.posix_attributes("/work/f"), Err(FsError::Unsupported(_))));
}

#[test]
fn write_bumps_modified_time() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/f").unwrap();
    let before = fixture.fs.metadata("/work/f").unwrap().modified;
    fixture.fs.write("/work/f", b"x").unwrap();
    let after = fixture.fs.metadata("/work/f").unwrap().modified;
    assert!(after > before);
}

#[test]
fn set_time_attribute_is_visible_in_metadata() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/f").unwrap();
    let stamp = filetime_now();
    fixture
        .fs
        .set_attribute("/work/f", "basic:lastModifiedTime", AttrValue::Time(stamp))
        .unwrap();
    assert_eq!(fixture.fs.metadata("/work/f").unwrap().modified, stamp);
}

#[test]
fn permission_sets_compare_by_content() {
    let a: BTreeSet<PosixPermission> = PosixPermission::from_mode(0o644);
    let b = PosixPermission::from_string("rw-r--r--").unwrap();
    assert_eq!(a, b);
}

fn filetime_now() -> filetime::FileTime {
    filetime::FileTime::from_unix_time(1_700_000_000, 42)
}
