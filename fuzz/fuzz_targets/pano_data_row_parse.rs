//! Fuzz target for single data-row parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 lines to the data-row parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use panomark::ir::io_pano_csv::fuzz_parse_data_row;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_data_row(line);
});
