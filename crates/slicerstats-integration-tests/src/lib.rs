//! Integration test crate for the statistics pipeline.
//!
//! This crate has no library code. It only contains tests that run the
//! full database → document → JSON file flow across workspace crates.
//!
//! ```sh
//! cargo test -p slicerstats-integration-tests
//! ```
