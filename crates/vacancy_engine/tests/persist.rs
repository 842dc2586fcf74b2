use std::fs;

use tempfile::TempDir;
use vacancy_engine::{ensure_output_dir, write_atomically, PersistError};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_must_be_a_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("plain_file");
    fs::write(&file_path, "x").unwrap();
    assert!(matches!(
        ensure_output_dir(&file_path),
        Err(PersistError::NotADirectory(_))
    ));
}

#[test]
fn write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();

    let first = write_atomically(temp.path(), "rust.json", b"[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "rust.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = write_atomically(temp.path(), "rust.json", b"[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
    // No staged temp files left behind.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn nothing_is_written_next_to_a_file_posing_as_dir() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(write_atomically(&file_path, "rust.json", b"[]").is_err());
    assert!(!file_path.with_file_name("rust.json").exists());
}
