use memfs::{FsError, MoveOptions};

use super::common::{file_key, Fixture};

#[test]
fn move_is_atomic_and_preserves_file_keys() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/x").unwrap();
    fixture.fs.create_file("/work/x/f").unwrap();
    let key = file_key(&fixture, "/work/x/f");

    fixture.fs.rename("/work/x", "/work/y", &MoveOptions::default()).unwrap();

    assert_eq!(file_key(&fixture, "/work/y/f"), key);
    assert_eq!(
        fixture.fs.read("/work/x/f"),
        Err(FsError::NotFound("/work/x/f".to_owned()))
    );
}

#[test]
fn move_updates_the_parent_sentinel() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/a").unwrap();
    fixture.fs.create_dir("/work/b").unwrap();
    fixture.fs.create_dir("/work/a/sub").unwrap();

    fixture.fs.rename("/work/a/sub", "/work/b/sub", &MoveOptions::default()).unwrap();

    // `..` inside the moved directory now names the new parent.
    assert_eq!(
        file_key(&fixture, "/work/b/sub/.."),
        file_key(&fixture, "/work/b")
    );
}

#[test]
fn move_requires_absent_target_without_replace() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/src", b"s").unwrap();
    fixture.fs.write("/work/dst", b"d").unwrap();

    assert_eq!(
        fixture.fs.rename("/work/src", "/work/dst", &MoveOptions::default()),
        Err(FsError::AlreadyExists("/work/dst".to_owned()))
    );

    let options = MoveOptions { replace_existing: true, ..MoveOptions::default() };
    fixture.fs.rename("/work/src", "/work/dst", &options).unwrap();
    assert_eq!(fixture.fs.read("/work/dst").unwrap(), b"s");
    assert!(!fixture.fs.exists("/work/src"));
}

#[test]
fn replace_target_directory_must_be_empty() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/src").unwrap();
    fixture.fs.create_dir("/work/dst").unwrap();
    fixture.fs.create_file("/work/dst/occupied").unwrap();

    let options = MoveOptions { replace_existing: true, ..MoveOptions::default() };
    assert_eq!(
        fixture.fs.rename("/work/src", "/work/dst", &options),
        Err(FsError::DirectoryNotEmpty("/work/dst".to_owned()))
    );

    fixture.fs.delete("/work/dst/occupied").unwrap();
    fixture.fs.rename("/work/src", "/work/dst", &options).unwrap();
}

#[test]
fn directory_cannot_move_into_its_own_subtree() {
    let fixture = Fixture::new();
    fixture.fs.create_dir_all("/work/d/inner").unwrap();
    assert!(matches!(
        fixture.fs.rename("/work/d", "/work/d/inner/moved", &MoveOptions::default()),
        Err(FsError::InvalidArgument(_))
    ));
}

#[test]
fn atomic_move_with_replace_is_a_violation() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/a").unwrap();
    let options = MoveOptions { replace_existing: true, atomic_move: true };
    assert_eq!(
        fixture.fs.rename("/work/a", "/work/b", &options),
        Err(FsError::AtomicViolation("/work/a".to_owned(), "/work/b".to_owned()))
    );

    let options = MoveOptions { atomic_move: true, ..MoveOptions::default() };
    fixture.fs.rename("/work/a", "/work/b", &options).unwrap();
    assert!(fixture.fs.exists("/work/b"));
}

#[test]
fn rename_to_itself_is_a_no_op() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/same", b"content").unwrap();
    fixture.fs.rename("/work/same", "/work/same", &MoveOptions::default()).unwrap();
    assert_eq!(fixture.fs.read("/work/same").unwrap(), b"content");
}

#[test]
fn open_handle_follows_a_moved_file() {
    let fixture = Fixture::new();
    let channel = fixture
        .fs
        .open(
            "/work/before",
            memfs::OpenOptions::new().read(true).write(true).create(true),
        )
        .unwrap();
    channel.write_at(0, b"movable").unwrap();

    fixture.fs.rename("/work/before", "/work/after", &MoveOptions::default()).unwrap();

    let mut buf = [0u8; 7];
    channel.read_at(0, &mut buf).unwrap();
    assert_eq!(&buf, b"movable");
    assert_eq!(channel.file_key(), file_key(&fixture, "/work/after"));
}
