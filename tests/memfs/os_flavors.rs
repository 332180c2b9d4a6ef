use memfs::{Config, FsError};

use super::common::{file_key, Fixture};

#[test]
fn windows_paths_render_with_backslashes() {
    let fixture = Fixture::with_config(Config::windows().block_size(8));
    fixture.fs.create_dir("C:\\Users").unwrap();
    fixture.fs.write("C:\\Users\\readme.txt", b"hi").unwrap();

    // Forward slashes are accepted on input.
    assert_eq!(fixture.fs.read("C:/Users/readme.txt").unwrap(), b"hi");
    let path = fixture.fs.path("C:/Users/readme.txt").unwrap();
    assert_eq!(path.to_string(), "C:\\Users\\readme.txt");
}

#[test]
fn windows_lookup_is_case_insensitive_but_preserves_display() {
    let fixture = Fixture::with_config(Config::windows().block_size(8));
    fixture.fs.write("C:\\work\\ReadMe.TXT", b"case").unwrap();

    assert_eq!(fixture.fs.read("c:\\WORK\\readme.txt").unwrap(), b"case");
    assert_eq!(
        fixture.fs.create_file("C:\\work\\README.txt"),
        Err(FsError::AlreadyExists("C:\\work\\README.txt".to_owned()))
    );
    // Listing shows the display form used at creation.
    assert_eq!(fixture.fs.list("C:\\work").unwrap(), vec!["ReadMe.TXT"]);
}

#[test]
fn windows_relative_paths_use_the_working_directory() {
    let fixture = Fixture::with_config(Config::windows().block_size(8));
    fixture.fs.write("notes", b"n").unwrap();
    assert_eq!(fixture.fs.read("C:\\work\\notes").unwrap(), b"n");
}

#[test]
fn osx_names_match_across_normalization_forms() {
    let fixture = Fixture::with_config(Config::osx().block_size(8));
    // Composed e-acute at creation, decomposed on lookup.
    fixture.fs.write("/work/caf\u{e9}", b"espresso").unwrap();
    assert_eq!(fixture.fs.read("/work/cafe\u{301}").unwrap(), b"espresso");
    assert_eq!(
        file_key(&fixture, "/work/caf\u{e9}"),
        file_key(&fixture, "/work/cafe\u{301}")
    );
}

#[test]
fn osx_lookup_is_case_insensitive() {
    let fixture = Fixture::with_config(Config::osx().block_size(8));
    fixture.fs.write("/work/Cafe", b"x").unwrap();
    assert_eq!(fixture.fs.read("/work/cafe").unwrap(), b"x");
}

#[test]
fn unix_lookup_is_case_sensitive() {
    let fixture = Fixture::new();
    fixture.fs.write("/work/Cafe", b"x").unwrap();
    assert!(matches!(fixture.fs.read("/work/cafe"), Err(FsError::NotFound(_))));
}

#[test]
fn multiple_roots_resolve_independently() {
    let fixture = Fixture::with_config(
        Config::windows().block_size(8).roots(["C:\\", "D:\\"]).working_directory("C:\\work"),
    );
    fixture.fs.write("D:\\data", b"other drive").unwrap();
    assert_eq!(fixture.fs.read("D:\\data").unwrap(), b"other drive");
    assert!(!fixture.fs.exists("C:\\data"));
}

#[test]
fn config_can_come_from_toml() {
    let config = Config::from_toml(
        r#"
        os = "unix"
        working_directory = "/srv"
        block_size = 8
        "#,
    )
    .unwrap();
    let fixture = Fixture::with_config(config);
    fixture.fs.write("hello", b"from toml").unwrap();
    assert_eq!(fixture.fs.read("/srv/hello").unwrap(), b"from toml");
}
