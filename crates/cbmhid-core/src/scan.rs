//! Matrix scan timing discipline (§4.1). Grounded on `original_source/src/
//! kb6.c`'s `kb_task` column-drive/settle/read loop, generalized over the
//! injected `MatrixIO`/`Clock` capabilities instead of direct register
//! access.

use cbmhid_common::time::Clock;
use cbmhid_peripheral::matrix_io::MatrixIO;

use crate::timing::{CAS_US, SCAN_INTERVAL_US};

/// One sweep's worth of raw electrical state, before debounce or ghost
/// classification. `true` means open (matching `MatrixIO::read_rows`'s bit
/// convention: bit set = row open).
pub struct RawScan {
    pub matrix_open: [bool; 64],
    pub restore_open: bool,
}

/// Rate-gates matrix sweeps to one per `SCAN_INTERVAL_US`, driving columns
/// one at a time and sampling rows after the column-active-settle delay.
pub struct Scanner {
    last_scan_us: u64,
    primed: bool,
}

impl Scanner {
    pub const fn new() -> Self {
        Self {
            last_scan_us: 0,
            primed: false,
        }
    }

    /// Performs a full matrix sweep if at least `SCAN_INTERVAL_US` has
    /// elapsed since the last one, else returns `None` without touching the
    /// matrix.
    pub fn try_scan<M: MatrixIO, C: Clock>(&mut self, io: &mut M, clock: &C) -> Option<RawScan> {
        let now = clock.now_us();
        if self.primed && now.wrapping_sub(self.last_scan_us) < SCAN_INTERVAL_US {
            return None;
        }
        self.last_scan_us = now;
        self.primed = true;

        let mut matrix_open = [false; 64];
        for col in 0..8u8 {
            io.drive_column(col);
            clock.delay_us(CAS_US);
            let rows = io.read_rows();
            for row in 0..8usize {
                matrix_open[row * 8 + col as usize] = rows & (1 << row) != 0;
            }
            io.release_column(col);
        }
        let restore_open = io.read_restore();

        Some(RawScan {
            matrix_open,
            restore_open,
        })
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
