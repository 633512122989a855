//! bir compiler driver (birc) - standalone binary
//!
//! This is the entry point for the `birc` command-line tool.
//!
//! The binary is a thin wrapper around [`bir_cli::run_cli`], handling error
//! display and exit codes. All command logic is implemented in the library
//! crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (diagnostic printed to stderr)

use bir_base::Diagnostic;

fn main() {
    if let Err(e) = bir_cli::run_cli() {
        eprintln!("{}", e.render());
        std::process::exit(1);
    }
}
