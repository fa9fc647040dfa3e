//! Fuzzing library for aminer-index.
//!
//! This crate provides fuzzing targets for the AMiner record parsers and
//! the decoding of stored index entries.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_edge_parse -- -max_total_time=60
//! ```

pub use aminer_index::{models, parser};
