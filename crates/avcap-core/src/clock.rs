//! Monotonic timestamp source for PTS accounting.
//!
//! The origin is arbitrary (process start) — only deltas between calls
//! matter, which is exactly what [`std::time::Instant`] guarantees and what
//! `CLOCK_MONOTONIC` guaranteed in the original implementation.

use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Microseconds since an arbitrary, process-lifetime-stable epoch.
pub fn monotonic_now_us() -> u64 {
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_micros() as u64
}
