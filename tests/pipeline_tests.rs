//! File-level phase tests: the same entry points the CLI drives, with
//! real files on disk.

use std::fs;

use bminor::compile::{
    encode_file, parse_file, resolve_file, scan_file, typecheck_file, CompileError,
};

fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn encode_accepts_a_valid_literal() {
    let (_dir, path) = write_temp("lit.txt", "\"hello\\n\"\n");
    assert!(encode_file(&path).is_ok());
}

#[test]
fn encode_rejects_a_bare_word() {
    let (_dir, path) = write_temp("lit.txt", "hello\n");
    assert!(matches!(encode_file(&path), Err(CompileError::Encode(_))));
}

#[test]
fn encode_rejects_an_empty_file() {
    let (_dir, path) = write_temp("lit.txt", "");
    assert!(matches!(encode_file(&path), Err(CompileError::Encode(_))));
}

#[test]
fn scan_succeeds_on_clean_input() {
    let (_dir, path) = write_temp("ok.bminor", "x: integer = 5;\n");
    assert!(scan_file(&path).is_ok());
}

#[test]
fn scan_fails_on_invalid_tokens() {
    let (_dir, path) = write_temp("bad.bminor", "x = @;\n");
    assert!(matches!(scan_file(&path), Err(CompileError::Scan(1))));
}

#[test]
fn parse_succeeds_on_a_program() {
    let (_dir, path) = write_temp(
        "ok.bminor",
        "main: function void () = { print \"hi\\n\"; }\n",
    );
    assert!(parse_file(&path).is_ok());
}

#[test]
fn resolve_failure_carries_the_error_count() {
    let (_dir, path) = write_temp("bad.bminor", "x: integer = 5;\nx: integer = 6;\n");
    assert!(matches!(resolve_file(&path), Err(CompileError::Resolve(1))));
}

#[test]
fn typecheck_runs_the_earlier_phases_first() {
    let (_dir, path) = write_temp(
        "ok.bminor",
        "square: function integer (x: integer) = { return x^2; }\n",
    );
    assert!(typecheck_file(&path).is_ok());
}

#[test]
fn typecheck_failure_carries_the_error_count() {
    let (_dir, path) = write_temp(
        "bad.bminor",
        "f: function integer () = { return \"hi\"; }\n",
    );
    assert!(matches!(
        typecheck_file(&path),
        Err(CompileError::Typecheck(1))
    ));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bminor");
    assert!(matches!(scan_file(&path), Err(CompileError::Io(_))));
}
