#![no_main]

use aminer_index::IngestManifest;
use aminer_index::models::{Adjacency, AuthorProfile};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Stored entries may be corrupt; decoding must fail cleanly
    let _ = serde_json::from_slice::<AuthorProfile>(data);
    let _ = serde_json::from_slice::<Adjacency>(data);
    let _ = serde_json::from_slice::<IngestManifest>(data);
});
