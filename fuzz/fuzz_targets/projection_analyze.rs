//! Fuzz target for projection and overlap detection.
//!
//! Arbitrary bytes are decoded into records (including reversed boxes and
//! non-finite angles) and run through the analysis pipeline.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panomark::ir::Record;
use panomark::scene::analyze;

const RECORD_BYTES: usize = 32;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * RECORD_BYTES {
        return;
    }

    let records: Vec<Record> = data
        .chunks_exact(RECORD_BYTES)
        .map(|chunk| {
            let int = |i: usize| i32::from_le_bytes([chunk[i], chunk[i + 1], chunk[i + 2], chunk[i + 3]]);
            let float = |i: usize| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&chunk[i..i + 8]);
                f64::from_le_bytes(bytes)
            };
            Record::new(int(0), int(4), int(8), int(12)).with_offset(float(16), float(24))
        })
        .collect();

    let analysis = analyze(&records);
    assert_eq!(analysis.shapes.len(), records.len());
});
