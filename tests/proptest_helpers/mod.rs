#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use panomark::ir::{Document, Header, Record, PANORAMA_HEIGHT, PANORAMA_WIDTH};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Angles survive a save/load cycle to two decimals.
pub const EPS_ANGLE: f64 = 5e-3;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Angle in hundredths of a degree, so it formats exactly with two decimals.
pub fn arb_angle() -> BoxedStrategy<f64> {
    (-36_000i32..=36_000)
        .prop_map(|hundredths| hundredths as f64 / 100.0)
        .boxed()
}

/// A record that both the loader and the strict validator accept.
pub fn arb_savable_record() -> BoxedStrategy<Record> {
    (
        0..PANORAMA_WIDTH - 1,
        0..PANORAMA_HEIGHT - 1,
        1..PANORAMA_WIDTH,
        1..PANORAMA_HEIGHT,
        arb_angle(),
        arb_angle(),
    )
        .prop_map(|(x1, y1, w, h, az, el)| {
            let x2 = (x1 + w).min(PANORAMA_WIDTH - 1);
            let y2 = (y1 + h).min(PANORAMA_HEIGHT - 1);
            Record::new(x1, y1, x2, y2).with_offset(az, el)
        })
        .boxed()
}

/// Any ordered record inside the panorama, including points and lines.
pub fn arb_loadable_record() -> BoxedStrategy<Record> {
    (
        0..PANORAMA_WIDTH,
        0..PANORAMA_HEIGHT,
        0..PANORAMA_WIDTH,
        0..PANORAMA_HEIGHT,
        arb_angle(),
        arb_angle(),
    )
        .prop_map(|(a, b, c, d, az, el)| {
            Record::new(a.min(c), b.min(d), a.max(c), b.max(d)).with_offset(az, el)
        })
        .boxed()
}

/// Comment text without line breaks and without outer whitespace.
pub fn arb_comment() -> BoxedStrategy<String> {
    "[A-Za-z0-9 ;,.:_-]{0,24}"
        .prop_map(|s| s.trim().to_string())
        .boxed()
}

pub fn arb_header() -> BoxedStrategy<Header> {
    (
        -1000i32..100_000,
        (1970i32..2100, 1u32..=12, 1u32..=28),
        (0u32..24, 0u32..60, 0u32..60, 0u32..1000),
        prop::collection::vec(arb_comment(), 0..4),
    )
        .prop_map(|(machine, (y, m, d), (hh, mm, ss, ms), comments)| {
            let date = NaiveDate::from_ymd_opt(y, m, d);
            let time = NaiveTime::from_hms_milli_opt(hh, mm, ss, ms);
            Header {
                machine_number: machine,
                date,
                time,
                comments,
                ..Default::default()
            }
        })
        .boxed()
}

pub fn arb_savable_document(max_records: usize) -> BoxedStrategy<Document> {
    (
        arb_header(),
        prop::collection::vec(arb_savable_record(), 0..=max_records),
    )
        .prop_map(|(header, records)| Document::new(header, records))
        .boxed()
}

pub fn assert_records_equivalent(a: &[Record], b: &[Record], eps: f64) -> Result<(), String> {
    if a.len() != b.len() {
        return Err(format!("record count differs: {} vs {}", a.len(), b.len()));
    }
    for (i, (ra, rb)) in a.iter().zip(b).enumerate() {
        if (ra.x1, ra.y1, ra.x2, ra.y2) != (rb.x1, rb.y1, rb.x2, rb.y2) {
            return Err(format!("row {}: box differs: {:?} vs {:?}", i + 1, ra, rb));
        }
        if (ra.azimuth - rb.azimuth).abs() > eps || (ra.elevation - rb.elevation).abs() > eps {
            return Err(format!("row {}: angles differ: {:?} vs {:?}", i + 1, ra, rb));
        }
    }
    Ok(())
}
