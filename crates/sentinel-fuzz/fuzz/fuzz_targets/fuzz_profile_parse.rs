#![no_main]

use std::io::Cursor;

use aminer_index::parser::{LossyLines, parse_profiles};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut lines = LossyLines::new(Cursor::new(data));
    for profile in parse_profiles(lines.by_ref()).flatten() {
        // Parsed p-index values are always finite and non-negative
        for value in [profile.p_index_equal, profile.p_index_unequal] {
            assert!(value.is_finite() && value >= 0.0);
        }
    }
    let _ = lines.finish();
});
