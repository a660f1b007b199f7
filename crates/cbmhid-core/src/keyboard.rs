//! Top-level pipeline bundling: Scanner → debounce/ghost pass → shared
//! key-state table → Reporter (§2, §9). Grounded on `original_source/src/
//! kb6.c`'s single global `cbm_scan` table driven from `kb_task`/`kb_report`,
//! generalized here over injected `MatrixIO`/`Clock` capabilities so the
//! whole pipeline is a plain value with no hardware dependence.

use cbmhid_common::time::Clock;
use cbmhid_peripheral::matrix_io::MatrixIO;

use crate::debounce::{self, KeyState};
use crate::keys::POSITION_COUNT;
use crate::report::Reporter;
use crate::scan::Scanner;

/// Owns the entire keyboard pipeline: the 65-entry key-state table, the
/// rate-gated Scanner, and the Reporter (which in turn owns the active
/// translation profile). One value of this type is all a firmware main loop
/// needs (§9 "global state bundled into one value").
pub struct Keyboard {
    keys: [KeyState; POSITION_COUNT],
    scanner: Scanner,
    reporter: Reporter,
}

impl Keyboard {
    pub const fn new() -> Self {
        Self {
            keys: [KeyState::new(); POSITION_COUNT],
            scanner: Scanner::new(),
            reporter: Reporter::new(),
        }
    }

    /// Resets the pipeline to its power-on state. No state survives this
    /// call (§1 Non-goals: no persistence across power cycles).
    pub fn kb_init(&mut self) {
        *self = Self::new();
    }

    /// Drives one iteration of the scan/debounce/ghost stage. A no-op when
    /// the Scanner's rate gate hasn't elapsed yet.
    pub fn kb_task<M: MatrixIO, C: Clock>(&mut self, io: &mut M, clock: &C) {
        if let Some(raw) = self.scanner.try_scan(io, clock) {
            debounce::apply(&mut self.keys, &raw, self.reporter.is_mister());
        }
    }

    /// Assembles the next HID boot-keyboard report. Writes six keycode
    /// bytes into `out` and returns the modifier byte.
    pub fn kb_report(&mut self, out: &mut [u8; 6]) -> u8 {
        self.reporter.report(&mut self.keys, out)
    }

    /// The translation profile currently in effect (false = ASCII, true =
    /// MiSTer/positional mirror).
    pub fn is_mister(&self) -> bool {
        self.reporter.is_mister()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::keys::{
        POS_ARROW_UP, POS_CONTROL_LEFT, POS_KEY_0, POS_SHIFT_LEFT, POS_SHIFT_RIGHT, POS_STERLING,
    };
    use crate::timing::SCAN_INTERVAL_US;
    use cbmhid_common::time::ManualClock;
    use usbd_hid::descriptor::KeyboardUsage;

    /// A matrix backed by a plain open/closed grid plus a RESTORE line,
    /// closed purely under test control (no timing of its own — the
    /// Scanner's `Clock`-driven rate gate is what's under test elsewhere).
    struct FakeMatrixIO {
        closed: [[bool; 8]; 8],
        restore_closed: bool,
        driven_col: Option<u8>,
    }

    impl FakeMatrixIO {
        fn new() -> Self {
            Self {
                closed: [[false; 8]; 8],
                restore_closed: false,
                driven_col: None,
            }
        }

        fn close(&mut self, pos: u8) {
            let (row, col) = (pos as usize / 8, pos as usize % 8);
            self.closed[row][col] = true;
        }
    }

    impl MatrixIO for FakeMatrixIO {
        fn drive_column(&mut self, col: u8) {
            self.driven_col = Some(col);
        }

        fn release_column(&mut self, _col: u8) {
            self.driven_col = None;
        }

        fn read_rows(&mut self) -> u8 {
            let col = self.driven_col.expect("read without a driven column") as usize;
            let mut bits = 0u8;
            for row in 0..8usize {
                if !self.closed[row][col] {
                    bits |= 1 << row;
                }
            }
            bits
        }

        fn read_restore(&mut self) -> bool {
            !self.restore_closed
        }
    }

    /// Drives `kb_task` for `ticks` scan intervals, enough to settle any
    /// closure made in `io` past ghost-pending or debounce.
    fn settle(kb: &mut Keyboard, io: &mut FakeMatrixIO, clock: &mut ManualClock, ticks: u32) {
        for _ in 0..ticks {
            clock.advance(SCAN_INTERVAL_US);
            kb.kb_task(io, clock);
        }
    }

    #[test]
    fn single_isolated_key_produces_a_single_keycode_report() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.close(10); // 'A'
        settle(&mut kb, &mut io, &mut clock, 40);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        assert_eq!(out[0], KeyboardUsage::KeyboardAa as u8);
    }

    #[test]
    fn ghost_box_corner_never_reaches_a_report() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.close(0); // row0,col0
        io.close(7); // row0,col7
        io.close(56); // row7,col0
        // (7,7) ghost-appears but was never physically closed.
        settle(&mut kb, &mut io, &mut clock, 200);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        let reported: std::vec::Vec<u8> = out.iter().copied().filter(|&b| b != 0).collect();
        assert!(!reported.contains(&(KeyboardUsage::KeyboardPeriodGreater as u8)));
    }

    #[test]
    fn restore_key_maps_to_backslash_under_ascii_profile() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.restore_closed = true;
        settle(&mut kb, &mut io, &mut clock, 2);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        assert_eq!(out[0], KeyboardUsage::KeyboardBackslashBar as u8);
    }

    #[test]
    fn mode_toggle_chord_flips_is_mister_end_to_end() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        assert!(!kb.is_mister());

        io.close(POS_CONTROL_LEFT);
        io.close(POS_SHIFT_LEFT);
        io.close(POS_SHIFT_RIGHT);
        io.close(POS_STERLING);
        settle(&mut kb, &mut io, &mut clock, 40);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        assert!(kb.is_mister());
    }

    #[test]
    fn shifted_arrow_up_produces_a_tilde_in_ascii_profile() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.close(POS_SHIFT_LEFT);
        io.close(POS_ARROW_UP);
        settle(&mut kb, &mut io, &mut clock, 40);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        let reported: std::vec::Vec<u8> = out.iter().copied().filter(|&b| b != 0).collect();
        assert!(reported.contains(&(KeyboardUsage::KeyboardBacktickTilde as u8)));
    }

    #[test]
    fn kb_init_clears_all_pipeline_state() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.close(10);
        settle(&mut kb, &mut io, &mut clock, 40);

        kb.kb_init();
        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        assert_eq!(out, [0u8; 6]);
        assert!(!kb.is_mister());
    }

    #[test]
    fn unshifted_zero_key_stays_zero_under_ascii_profile() {
        let mut kb = Keyboard::new();
        let mut io = FakeMatrixIO::new();
        let mut clock = ManualClock::new();
        io.close(POS_KEY_0);
        settle(&mut kb, &mut io, &mut clock, 40);

        let mut out = [0u8; 6];
        kb.kb_report(&mut out);
        assert_eq!(out[0], KeyboardUsage::Keyboard0CloseParens as u8);
    }
}
