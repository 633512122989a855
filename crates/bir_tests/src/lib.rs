//! Integration test suite for the `bir` compiler front end.
//!
//! This crate exists only to run integration tests from the `tests/`
//! directory. All actual test code lives in `tests/*.rs` files, exercising
//! `bir-lang`, `bir-ir`, and `bir-cli` together the way a real consumer of
//! the compiler would, rather than through each crate's own unit tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bir-tests
//! ```
