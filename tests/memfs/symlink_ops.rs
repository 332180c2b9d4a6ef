use memfs::{Config, Feature, FsError, OpenOptions};

use super::common::{file_key, Fixture};

#[test]
fn create_and_read_symlink() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/target.txt", b"payload").unwrap();
    fixture.fs.create_symlink("/work/link", "target.txt").unwrap();

    assert_eq!(fixture.fs.read_symlink("/work/link").unwrap().to_string(), "target.txt");
    assert!(fixture.fs.is_symlink("/work/link"));
    // Reading through the link reaches the target bytes.
    assert_eq!(fixture.fs.read("/work/link").unwrap(), b"payload");
    assert_eq!(file_key(&fixture, "/work/link"), file_key(&fixture, "/work/target.txt"));
}

#[test]
fn read_symlink_on_other_kinds_is_invalid() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/plain").unwrap();
    assert!(matches!(fixture.fs.read_symlink("/work/plain"), Err(FsError::InvalidArgument(_))));
}

#[test]
fn symlink_loop_fails_resolution() {
    let fixture = Fixture::new();
    fixture.fs.create_symlink("/work/l1", "/work/l2").unwrap();
    fixture.fs.create_symlink("/work/l2", "/work/l1").unwrap();

    assert_eq!(
        fixture.fs.read("/work/l1"),
        Err(FsError::SymlinkLoop("/work/l1".to_owned()))
    );
}

#[test]
fn deep_chains_resolve_within_the_limit() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/end", b"deep").unwrap();
    fixture.fs.create_symlink("/work/chain0", "/work/end").unwrap();
    for i in 1..10 {
        fixture
            .fs
            .create_symlink(&format!("/work/chain{i}"), &format!("/work/chain{}", i - 1))
            .unwrap();
    }
    assert_eq!(fixture.fs.read("/work/chain9").unwrap(), b"deep");
}

#[test]
fn tight_symlink_budget_fails_with_loop() {
    let fixture = Fixture::with_config(Config::unix().block_size(8).max_symlink_depth(3));
    fixture.fs.write("/work/end", b"x").unwrap();
    fixture.fs.create_symlink("/work/c0", "/work/end").unwrap();
    for i in 1..6 {
        fixture
            .fs
            .create_symlink(&format!("/work/c{i}"), &format!("/work/c{}", i - 1))
            .unwrap();
    }
    assert!(matches!(fixture.fs.read("/work/c5"), Err(FsError::SymlinkLoop(_))));
}

#[test]
fn dangling_link_distinguishes_follow_from_nofollow() {
    let fixture = Fixture::new();
    fixture.fs.create_symlink("/work/dangling", "/work/nowhere").unwrap();

    assert!(fixture.fs.symlink_metadata("/work/dangling").unwrap().is_symbolic_link);
    assert!(matches!(fixture.fs.metadata("/work/dangling"), Err(FsError::NotFound(_))));
    assert!(!fixture.fs.exists("/work/dangling"));
    assert!(fixture.fs.is_symlink("/work/dangling"));
}

#[test]
fn create_through_a_dangling_link_lands_at_the_target() {
    let fixture = Fixture::new();
    fixture.fs.create_symlink("/work/alias", "/work/real").unwrap();

    // Opening the link with create resolves to the missing target's
    // parent and creates the target there.
    let channel = fixture
        .fs
        .open("/work/alias", OpenOptions::new().write(true).create(true))
        .unwrap();
    channel.write_at(0, b"via link").unwrap();
    drop(channel);

    assert_eq!(fixture.fs.read("/work/real").unwrap(), b"via link");
}

#[test]
fn intermediate_links_are_always_followed() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/real_dir").unwrap();
    fixture.fs.write("/work/real_dir/f", b"x").unwrap();
    fixture.fs.create_symlink("/work/dir_link", "/work/real_dir").unwrap();

    assert_eq!(fixture.fs.read("/work/dir_link/f").unwrap(), b"x");
    // Even when the terminal policy is no-follow.
    assert!(fixture.fs.symlink_metadata("/work/dir_link/f").unwrap().is_regular_file);
}

#[test]
fn symlinks_can_be_disabled_by_configuration() {
    let fixture = Fixture::with_config(
        Config::unix().block_size(8).features([Feature::Links, Feature::FileChannel]),
    );
    assert!(matches!(
        fixture.fs.create_symlink("/work/l", "/work/t"),
        Err(FsError::Unsupported(_))
    ));
}

#[test]
fn hard_links_can_be_disabled_by_configuration() {
    let fixture = Fixture::with_config(
        Config::unix().block_size(8).features([Feature::SymbolicLinks]),
    );
    fixture.fs.create_file("/work/t").unwrap();
    assert!(matches!(
        fixture.fs.create_link("/work/l", "/work/t"),
        Err(FsError::Unsupported(_))
    ));
}

#[test]
fn hard_link_to_directory_is_rejected() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/d").unwrap();
    assert_eq!(
        fixture.fs.create_link("/work/l", "/work/d"),
        Err(FsError::IsADirectory("/work/d".to_owned()))
    );
}
