//! Scan cadence and debounce/ghost countdown constants (§4.1).

/// Scanner self-rate-limit: one real matrix sweep per this many microseconds.
pub const SCAN_INTERVAL_US: u64 = 200;

/// Column-active-settle delay before sampling row lines.
pub const CAS_US: u64 = 6;

/// Minimum time a closure must survive ghost arbitration before promoting.
pub const GHOST_US: u64 = 2000;

/// Minimum time a release is suppressed after a closure.
pub const DEBOUNCE_US: u64 = 5000;

const fn ceil_div(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

pub const GHOST_TICKS: u8 = ceil_div(GHOST_US, SCAN_INTERVAL_US) as u8;
pub const DEBOUNCE_TICKS: u8 = ceil_div(DEBOUNCE_US, SCAN_INTERVAL_US) as u8;
