//! Fuzz target for panorama CSV parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the document parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panomark::ir::io_pano_csv::from_pano_csv_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_pano_csv_slice(data);
});
