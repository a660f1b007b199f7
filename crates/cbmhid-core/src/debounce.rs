//! Per-key debounce and electrical-ghost classification (§4.2, §3).
//!
//! Grounded on `original_source/src/kb6.c`'s `set_cbm_scan` and the
//! population-count ghost pass in `kb_task`. Pure state-machine code with no
//! I/O, so it is exercised directly by the tests below instead of through a
//! simulated `MatrixIO`.

use cbmhid_common::dev_trace;

use crate::keys::{Modifier, POSITION_COUNT, position_to_modifier};
use crate::scan::RawScan;
use crate::timing::{DEBOUNCE_TICKS, GHOST_TICKS};

/// One entry of the positional key-state table (§3).
#[derive(Debug, Clone, Copy)]
pub struct KeyState {
    /// 0 = open, 1 = pressed, 2..=255 = ghost-pending countdown.
    pub status: u8,
    /// Ticks remaining during which a release is suppressed.
    pub debounce_ticks: u8,
    /// Whether the current press has already been placed in a report slot.
    pub sent: bool,
    /// Modifier bitmap latched at the instant this key promoted to pressed.
    pub captured_modifier: Modifier,
}

impl KeyState {
    pub const OPEN: u8 = 0;
    pub const PRESSED: u8 = 1;

    pub const fn new() -> Self {
        Self {
            status: Self::OPEN,
            debounce_ticks: 0,
            sent: false,
            captured_modifier: Modifier::empty(),
        }
    }

    pub const fn is_pressed(&self) -> bool {
        self.status == Self::PRESSED
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies one scan tick's raw closures to the key-state table: debounce,
/// RESTORE's ghost bypass, and the row/column ghost pass (§4.2).
pub fn apply(keys: &mut [KeyState; POSITION_COUNT], raw: &RawScan, is_mister: bool) {
    let mut col_pop = [0u8; 8];
    let mut row_pop = [0u8; 8];
    let mut scan_modifier = Modifier::empty();

    for row in 0..8usize {
        for col in 0..8usize {
            let idx = row * 8 + col;
            set_debounce(&mut keys[idx], raw.matrix_open[idx]);

            // Current modifier ignores ghosted/bouncing keys.
            if keys[idx].is_pressed() {
                scan_modifier |= position_to_modifier(is_mister, idx as u8);
            }

            // Population count includes ghosted and bouncing keys.
            if keys[idx].status != KeyState::OPEN {
                col_pop[col] += 1;
                row_pop[row] += 1;
            }
        }
    }

    // RESTORE is not part of the matrix and bypasses ghost analysis
    // entirely: it promotes on the same scan it would otherwise still be
    // pending.
    let restore = &mut keys[64];
    set_debounce(restore, raw.restore_open);
    if restore.status > KeyState::PRESSED {
        restore.status = KeyState::PRESSED;
        restore.captured_modifier = scan_modifier;
    }

    // Use population counts to find ghosted keys among those still pending.
    for row in 0..8usize {
        for col in 0..8usize {
            let idx = row * 8 + col;
            if keys[idx].status > KeyState::PRESSED {
                if row_pop[row] > 1 && col_pop[col] > 1 {
                    if keys[idx].debounce_ticks > 0 {
                        keys[idx].status = 1 + GHOST_TICKS;
                        dev_trace!(
                            "ghost box at row {} col {}: held position {} pending refreshed",
                            row,
                            col,
                            idx
                        );
                    } else if keys[idx].status > 2 {
                        keys[idx].status -= 1;
                    }
                } else {
                    keys[idx].status -= 1;
                    if keys[idx].status == KeyState::PRESSED {
                        keys[idx].captured_modifier = scan_modifier;
                    }
                }
            }
        }
    }
}

/// Advances debounce and, on a confirmed electrical open, clears the key.
/// On a confirmed close from the open state, starts the ghost-pending
/// countdown. Shared by the scan sweep and by the Reporter's forced-release
/// path (§4.4 Step 3).
pub fn set_debounce(state: &mut KeyState, is_open: bool) {
    if state.debounce_ticks > 0 {
        state.debounce_ticks -= 1;
    }
    if is_open {
        if state.debounce_ticks == 0 {
            state.status = KeyState::OPEN;
            state.sent = false;
        }
    } else if state.status == KeyState::OPEN {
        state.status = 1 + GHOST_TICKS;
        state.debounce_ticks = DEBOUNCE_TICKS;
    }
}

/// Forces an immediate release, as if the key had opened electrically.
/// Used when the Reporter needs to manufacture an intervening release
/// (§4.4 Step 3's cursor-key shift-change case).
pub fn force_release(state: &mut KeyState) {
    set_debounce(state, true);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn raw_all_open() -> RawScan {
        RawScan {
            matrix_open: [true; 64],
            restore_open: true,
        }
    }

    #[test]
    fn fresh_closure_enters_ghost_pending() {
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        raw.matrix_open[0] = false;
        apply(&mut keys, &raw, false);
        assert_eq!(keys[0].status, 1 + GHOST_TICKS - 1); // one ghost-pass decrement already happened
        assert!(keys[0].debounce_ticks > 0);
    }

    #[test]
    fn isolated_key_promotes_after_ghost_ticks() {
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        raw.matrix_open[10] = false; // position 10, isolated single key
        for _ in 0..40 {
            apply(&mut keys, &raw, false);
            if keys[10].is_pressed() {
                break;
            }
        }
        assert!(keys[10].is_pressed());
    }

    #[test]
    fn debounce_blocks_release_while_ticks_remain() {
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        raw.matrix_open[10] = false;
        for _ in 0..40 {
            apply(&mut keys, &raw, false);
        }
        assert!(keys[10].is_pressed());

        raw.matrix_open[10] = true;
        apply(&mut keys, &raw, false);
        // debounce_ticks was DEBOUNCE_TICKS on promotion tick's last refresh;
        // a single release tick must not be enough to open it.
        assert!(keys[10].status != KeyState::OPEN);
    }

    #[test]
    fn ghost_box_never_promotes_the_phantom_corner() {
        // Close (0,0), (0,7), (7,0); matrix electrically reports (7,7) too.
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        let idx = |r: usize, c: usize| r * 8 + c;
        for &(r, c) in &[(0, 0), (0, 7), (7, 0), (7, 7)] {
            raw.matrix_open[idx(r, c)] = false;
        }
        for _ in 0..200 {
            apply(&mut keys, &raw, false);
        }
        assert!(keys[idx(0, 0)].is_pressed());
        assert!(keys[idx(0, 7)].is_pressed());
        assert!(keys[idx(7, 0)].is_pressed());
        assert!(!keys[idx(7, 7)].is_pressed());
    }

    #[test]
    fn restore_bypasses_ghost_and_promotes_immediately_after_debounce() {
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        raw.restore_open = false;
        apply(&mut keys, &raw, false);
        // Same scan it would otherwise still be ghost-pending: promotes now.
        assert!(keys[64].is_pressed());
    }

    #[test]
    fn captured_modifier_is_the_snapshot_at_promotion() {
        let mut keys = [KeyState::new(); POSITION_COUNT];
        let mut raw = raw_all_open();
        raw.matrix_open[crate::keys::POS_SHIFT_LEFT as usize] = false;
        raw.matrix_open[10] = false;
        for _ in 0..40 {
            apply(&mut keys, &raw, false);
        }
        assert!(keys[10].captured_modifier.contains(Modifier::LEFTSHIFT));
    }
}
