use memfs::FsError;

use super::common::{file_key, Fixture};

#[test]
fn relative_paths_resolve_against_working_directory() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/notes.txt", b"text").unwrap();

    assert_eq!(fixture.fs.read("notes.txt").unwrap(), b"text");
    assert_eq!(file_key(&fixture, "notes.txt"), file_key(&fixture, "/work/notes.txt"));
}

#[test]
fn dot_and_dot_dot_walk_the_tree() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/sub").unwrap();
    fixture.fs.write("/work/sub/f", b"x").unwrap();

    assert_eq!(fixture.fs.read("/work/./sub/f").unwrap(), b"x");
    assert_eq!(fixture.fs.read("/work/sub/../sub/f").unwrap(), b"x");
    assert_eq!(fixture.fs.read("sub/f").unwrap(), b"x");
    // The root is its own parent.
    assert_eq!(fixture.fs.read("/../work/sub/f").unwrap(), b"x");
}

#[test]
fn normalized_path_resolves_to_the_same_file() {
    let fixture = Fixture::new();
    fixture.fs.create_dir("/work/d").unwrap();
    fixture.fs.write("/work/d/f", b"x").unwrap();

    let path = fixture.fs.path("/work/./d/../d/f").unwrap();
    let normalized = path.normalize();
    assert_eq!(normalized.to_string(), "/work/d/f");
    assert_eq!(
        fixture.fs.metadata(&path.to_string()).unwrap().file_key,
        fixture.fs.metadata(&normalized.to_string()).unwrap().file_key
    );
}

#[test]
fn missing_intermediate_component_is_not_found() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.fs.read("/work/no/such/file"),
        Err(FsError::NotFound("/work/no/such/file".to_owned()))
    );
}

#[test]
fn file_used_as_directory_is_not_a_directory() {
    let fixture = Fixture::new();
    fixture.fs.create_file("/work/plain").unwrap();
    assert_eq!(
        fixture.fs.read("/work/plain/inner"),
        Err(FsError::NotADirectory("/work/plain/inner".to_owned()))
    );
}

#[test]
fn deleted_working_directory_fails_relative_lookups() {
    let fixture = Fixture::new();
    fixture.fs.write("/stray", b"x").unwrap();
    fixture.fs.delete("/work").unwrap();

    // Absolute resolution still works; relative resolution has lost its
    // base node.
    assert_eq!(fixture.fs.read("/stray").unwrap(), b"x");
    assert!(matches!(fixture.fs.read("stray"), Err(FsError::NotFound(_))));
    assert!(matches!(fixture.fs.create_file("orphan"), Err(FsError::NotFound(_))));
}

#[test]
fn windows_style_string_is_a_plain_name_under_unix() {
    let fixture = Fixture::new();
    let path = fixture.fs.path("C:\\x").unwrap();
    assert!(!path.is_absolute());
    assert_eq!(path.name_count(), 1);
    assert!(!fixture.fs.exists("C:\\x"));
}
