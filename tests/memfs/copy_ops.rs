use memfs::{AttrValue, Config, CopyOptions, FsError};

use super::common::{file_key, Fixture};

#[test]
fn copy_clones_content_under_a_new_file_key() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/src", b"copy me across blocks").unwrap();

    fixture.fs.copy("/work/src", "/work/dst", &CopyOptions::default()).unwrap();

    assert_eq!(fixture.fs.read("/work/dst").unwrap(), b"copy me across blocks");
    assert_eq!(fixture.fs.read("/work/src").unwrap(), b"copy me across blocks");
    assert_ne!(file_key(&fixture, "/work/src"), file_key(&fixture, "/work/dst"));

    // The copies are independent.
    fixture.fs.write("/work/src", b"changed").unwrap();
    assert_eq!(fixture.fs.read("/work/dst").unwrap(), b"copy me across blocks");
}

#[test]
fn copy_requires_absent_target_without_replace() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/src", b"s").unwrap();
    fixture.fs.write("/work/dst", b"d").unwrap();

    assert_eq!(
        fixture.fs.copy("/work/src", "/work/dst", &CopyOptions::default()),
        Err(FsError::AlreadyExists("/work/dst".to_owned()))
    );

    let options = CopyOptions { replace_existing: true, ..CopyOptions::default() };
    fixture.fs.copy("/work/src", "/work/dst", &options).unwrap();
    assert_eq!(fixture.fs.read("/work/dst").unwrap(), b"s");
}

#[test]
fn copy_of_a_directory_creates_an_empty_directory() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/d").unwrap();
    fixture.fs.create_file("/work/d/inner").unwrap();

    fixture.fs.copy("/work/d", "/work/d2", &CopyOptions::default()).unwrap();

    assert!(fixture.fs.is_directory("/work/d2"));
    assert_eq!(fixture.fs.list("/work/d2").unwrap(), Vec::<String>::new());
}

#[test]
fn copy_follows_or_keeps_symlinks_per_options() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/target", b"bytes").unwrap();
    fixture.fs.create_symlink("/work/link", "/work/target").unwrap();

    // Following: the copy is a regular file with the target's bytes.
    fixture.fs.copy("/work/link", "/work/followed", &CopyOptions::default()).unwrap();
    assert!(fixture.fs.symlink_metadata("/work/followed").unwrap().is_regular_file);
    assert_eq!(fixture.fs.read("/work/followed").unwrap(), b"bytes");

    // No-follow: the link itself is copied.
    let options = CopyOptions { nofollow_links: true, ..CopyOptions::default() };
    fixture.fs.copy("/work/link", "/work/kept", &options).unwrap();
    assert!(fixture.fs.symlink_metadata("/work/kept").unwrap().is_symbolic_link);
    assert_eq!(fixture.fs.read_symlink("/work/kept").unwrap().to_string(), "/work/target");
}

#[test]
fn copy_attributes_carries_times_and_the_attribute_bag() {
    let fixture = Fixture::with_config(Config::unix().block_size(8).attribute_views(["user"]));
    fixture.fs.write("/work/src", b"x").unwrap();
    fixture
        .fs
        .set_attribute("/work/src", "user:tag", AttrValue::Bytes(b"v1".to_vec()))
        .unwrap();
    let src_meta = fixture.fs.metadata("/work/src").unwrap();

    let options = CopyOptions { copy_attributes: true, ..CopyOptions::default() };
    fixture.fs.copy("/work/src", "/work/with", &options).unwrap();
    fixture.fs.copy("/work/src", "/work/without", &CopyOptions::default()).unwrap();

    let with = fixture.fs.metadata("/work/with").unwrap();
    assert_eq!(with.created, src_meta.created);
    assert_eq!(with.modified, src_meta.modified);
    assert_eq!(
        fixture.fs.get_attribute("/work/with", "user:tag").unwrap(),
        AttrValue::Bytes(b"v1".to_vec())
    );

    let without = fixture.fs.metadata("/work/without").unwrap();
    assert!(without.created > src_meta.created);
    assert!(matches!(
        fixture.fs.get_attribute("/work/without", "user:tag"),
        Err(FsError::InvalidAttribute(_))
    ));
}

#[test]
fn copy_onto_non_empty_directory_is_refused() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/src").unwrap();
    fixture.fs.create_dir("/work/dst").unwrap();
    fixture.fs.create_file("/work/dst/occupied").unwrap();

    let options = CopyOptions { replace_existing: true, ..CopyOptions::default() };
    assert_eq!(
        fixture.fs.copy("/work/src", "/work/dst", &options),
        Err(FsError::DirectoryNotEmpty("/work/dst".to_owned()))
    );
}

#[test]
fn copy_to_itself_is_a_no_op() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/same", b"stay").unwrap();
    fixture.fs.copy("/work/same", "/work/same", &CopyOptions::default()).unwrap();
    assert_eq!(fixture.fs.read("/work/same").unwrap(), b"stay");
}
