//! Downstream assembler/linker seam. Actually invoking a system toolchain is
//! out of scope for this crate (§1); `Linker` exists so the driver's
//! orchestration is testable without one installed.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CompileError;

pub trait Linker {
    fn link(&self, objects: &[PathBuf], output: &Path) -> Result<(), CompileError>;
}

/// Shells out to the system `cc` to assemble and link the emitted `.ll`
/// files into a final executable. This is the "downstream system compiler
/// driver" spec.md §1 places out of scope for the checker/emitter proper.
pub struct SystemLinker;

impl Linker for SystemLinker {
    fn link(&self, objects: &[PathBuf], output: &Path) -> Result<(), CompileError> {
        let status = Command::new("cc")
            .arg("-o")
            .arg(output)
            .args(objects)
            .status()
            .map_err(|e| CompileError::Link { message: e.to_string() })?;

        if !status.success() {
            return Err(CompileError::Link {
                message: format!("cc exited with status {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "tests"))]
pub mod fake {
    use super::{CompileError, Linker, Path, PathBuf};
    use std::cell::RefCell;

    /// Records link invocations instead of spawning a process, so
    /// `pipeline::compile_files` can be exercised end to end without a
    /// system toolchain installed.
    #[derive(Default)]
    pub struct FakeLinker {
        pub calls: RefCell<Vec<(Vec<PathBuf>, PathBuf)>>,
        pub fail_with: Option<String>,
    }

    impl Linker for FakeLinker {
        fn link(&self, objects: &[PathBuf], output: &Path) -> Result<(), CompileError> {
            self.calls.borrow_mut().push((objects.to_vec(), output.to_path_buf()));
            if let Some(message) = &self.fail_with {
                return Err(CompileError::Link { message: message.clone() });
            }
            Ok(())
        }
    }
}
