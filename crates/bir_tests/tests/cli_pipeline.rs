//! Exercises `bir_cli::pipeline::compile_files` across multiple source files,
//! the one thing the CLI driver does that the single-module helpers in
//! `support` cannot: lexing/parsing several files against one shared
//! interner before checking them together.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use bir_cli::linker::fake::FakeLinker;
use bir_cli::pipeline::{compile_files, CompileOptions};
use bir_cli::CompileError;

fn write_module(dir: &std::path::Path, file_name: &str, source: &str) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = fs::File::create(&path).expect("create");
    file.write_all(source.as_bytes()).expect("write");
    path
}

#[test]
fn compiles_two_modules_and_writes_one_ir_file_per_module() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = write_module(dir.path(), "a.bir", "module a\nfunction one(): int { return 1 }\n");
    let b = write_module(dir.path(), "b.bir", "module b\nfunction two(): int { return 2 }\n");

    let out_dir = dir.path().join("out");
    let options = CompileOptions { output: dir.path().join("a.out"), out_dir: out_dir.clone(), emit_ir_only: true };
    let linker = FakeLinker::default();

    compile_files(&[a, b], &options, &linker).expect("compiles");

    assert!(out_dir.join("a.ll").exists());
    assert!(out_dir.join("b.ll").exists());
    assert!(linker.calls.borrow().is_empty());
}

#[test]
fn linker_failure_surfaces_as_a_link_compile_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_module(dir.path(), "m.bir", "module m\nfunction main(): int { return 0 }\n");

    let out_dir = dir.path().join("out");
    let options = CompileOptions { output: dir.path().join("a.out"), out_dir, emit_ir_only: false };
    let linker = FakeLinker { fail_with: Some("cc not found".to_string()), ..Default::default() };

    let err = compile_files(&[path], &options, &linker).expect_err("link should fail");
    assert!(matches!(err, CompileError::Link { .. }));
}
