//! Wires lex -> parse -> check -> emit -> (optional) link across every input
//! file, in that order, aborting on the first error from any stage (§7's
//! propagation policy: no partial output unless emission fully completes).

use std::fs;
use std::path::{Path, PathBuf};

use bir_base::Interner;
use bir_ir::emit_program;
use bir_lang::parser::AstArenas;
use bir_lang::{sema, Lexer, Parser};
use tracing::{debug, info};

use crate::error::CompileError;
use crate::linker::Linker;

pub struct CompileOptions {
    pub output: PathBuf,
    pub out_dir: PathBuf,
    pub emit_ir_only: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            output: PathBuf::from("a.out"),
            out_dir: PathBuf::from("."),
            emit_ir_only: false,
        }
    }
}

/// Reads, lexes, parses, checks, and emits every file in `paths`, writing one
/// `<module_name>.ll` per input module to `options.out_dir`, then links them
/// into `options.output` unless `options.emit_ir_only` is set.
pub fn compile_files(paths: &[PathBuf], options: &CompileOptions, linker: &dyn Linker) -> Result<(), CompileError> {
    let sources = read_sources(paths)?;

    // Lexing mutates the shared interner; parsing only reads it. Running
    // every file's lexer to completion before any parser borrows the
    // interner immutably keeps the two phases from fighting over it.
    let mut interner = Interner::new();
    let mut token_streams = Vec::with_capacity(sources.len());
    for (path, source) in &sources {
        debug!(file = %path.display(), "lexing");
        let mut lexer = Lexer::new(source, &mut interner);
        token_streams.push((path, lexer.tokenize()?));
    }

    let arenas = AstArenas::new();
    let mut programs = Vec::with_capacity(token_streams.len());
    for (path, tokens) in token_streams {
        debug!(file = %path.display(), "parsing");
        let mut parser = Parser::new(tokens, &interner, &arenas);
        programs.push(parser.parse_program()?);
    }

    debug!("checking");
    let checked = sema::check(&programs, &interner)?;

    fs::create_dir_all(&options.out_dir).map_err(|e| CompileError::Io { path: options.out_dir.clone(), source: e })?;

    let mut ir_files = Vec::with_capacity(programs.len());
    for (index, program) in programs.iter().enumerate() {
        let name = sema::module_name(&program.module.path, &interner);
        debug!(module = %name, "emitting IR");
        let module = emit_program(&programs, index, &checked, &interner)?;

        let ir_path = options.out_dir.join(format!("{name}.ll"));
        fs::write(&ir_path, module.to_string()).map_err(|e| CompileError::Io { path: ir_path.clone(), source: e })?;
        info!(module = %name, path = %ir_path.display(), "wrote IR module");
        ir_files.push(ir_path);
    }

    if !options.emit_ir_only {
        debug!("linking");
        linker.link(&ir_files, &options.output)?;
        info!(output = %options.output.display(), "linked executable");
    }

    Ok(())
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, CompileError> {
    paths
        .iter()
        .map(|path| {
            let source = fs::read_to_string(path).map_err(|e| CompileError::Io { path: path.clone(), source: e })?;
            Ok((path.clone(), source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::fake::FakeLinker;
    use std::io::Write;

    fn write_temp(source: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("m.bir");
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(source.as_bytes()).expect("write");
        (dir, path)
    }

    #[test]
    fn emits_ir_only_and_skips_the_linker() {
        let (dir, path) = write_temp("module m\nfunction main(): int {\n  return 42\n}\n");
        let out_dir = dir.path().join("out");
        let options = CompileOptions { output: dir.path().join("a.out"), out_dir: out_dir.clone(), emit_ir_only: true };
        let linker = FakeLinker::default();

        compile_files(&[path], &options, &linker).expect("compiles");

        assert!(out_dir.join("m.ll").exists());
        assert!(linker.calls.borrow().is_empty());
    }

    #[test]
    fn links_when_not_emit_ir_only() {
        let (dir, path) = write_temp("module m\nfunction main(): int {\n  return 42\n}\n");
        let out_dir = dir.path().join("out");
        let output = dir.path().join("a.out");
        let options = CompileOptions { output: output.clone(), out_dir, emit_ir_only: false };
        let linker = FakeLinker::default();

        compile_files(&[path], &options, &linker).expect("compiles");

        let calls = linker.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, output);
    }

    #[test]
    fn first_error_aborts_the_pipeline() {
        let (_dir, path) = write_temp("module m\nfunction bad(): int {\n  return true\n}\n");
        let out_dir = tempfile::tempdir().expect("tempdir");
        let options = CompileOptions { output: PathBuf::from("a.out"), out_dir: out_dir.path().to_path_buf(), emit_ir_only: true };
        let linker = FakeLinker::default();

        let err = compile_files(&[path], &options, &linker).expect_err("type error");
        assert!(matches!(err, CompileError::Sem(_)));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let options = CompileOptions::default();
        let linker = FakeLinker::default();
        let err = compile_files(&[PathBuf::from("/no/such/file.bir")], &options, &linker).expect_err("missing file");
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
