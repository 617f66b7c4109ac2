use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

pub fn organizer_cmd() -> Command {
    Command::cargo_bin("photo-organizer").unwrap()
}

/// A source folder holding the given files, each written with its own name as content.
pub fn setup_source(temp_dir: &TempDir, files: &[&str]) -> ChildPath {
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();
    for name in files {
        source.child(name).write_str(name).unwrap();
    }
    source
}
