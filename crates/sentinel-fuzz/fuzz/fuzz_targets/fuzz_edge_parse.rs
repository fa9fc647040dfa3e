#![no_main]

use std::io::Cursor;

use aminer_index::parser::{LossyLines, parse_edges};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Every line yields an edge or a warning, never a panic
    let mut lines = LossyLines::new(Cursor::new(data));
    for record in parse_edges(lines.by_ref()) {
        if let Err(warning) = record {
            assert!(warning.line > 0);
        }
    }
    let _ = lines.finish();
});
