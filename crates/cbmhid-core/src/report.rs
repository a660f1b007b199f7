//! USB HID boot-keyboard report assembly (§4.4). Grounded on
//! `original_source/src/kb6.c`'s `kb_report`: prunes released slots, admits
//! new presses under a per-report modifier lock, resolves same-key
//! collisions, and falls back to the phantom rollover sentinel once six
//! slots are full.

use cbmhid_common::{dev_info, dev_warn};
use heapless::Vec;

use crate::debounce::{KeyState, force_release};
use crate::keys::{
    HID_A, Modifier, PHANTOM_SENTINEL, POS_CBM, POS_CRSR_DOWN, POS_CRSR_RIGHT, POSITION_COUNT,
    position_to_modifier,
};
use crate::translate::translate;

/// One occupied report slot: the positional code that is currently
/// asserting this HID keycode, kept so a later release can find it again.
#[derive(Debug, Clone, Copy)]
struct Slot {
    position: u8,
    hid_code: u8,
}

/// Assembles the 6-keycode + modifier report across successive scans,
/// owning the active translation profile (§4.4, §9).
pub struct Reporter {
    slots: Vec<Slot, 6>,
    current_modifier: Modifier,
    previous_modifier: Modifier,
    is_mister: bool,
}

impl Reporter {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            current_modifier: Modifier::empty(),
            previous_modifier: Modifier::empty(),
            is_mister: false,
        }
    }

    pub const fn is_mister(&self) -> bool {
        self.is_mister
    }

    /// Builds the next report from the current key-state table. Writes six
    /// keycode bytes into `out` and returns the modifier byte.
    pub fn report(&mut self, keys: &mut [KeyState; POSITION_COUNT], out: &mut [u8; 6]) -> u8 {
        self.prune_released(keys);

        let mut modifier_locked = false;
        for pos in 0..POSITION_COUNT as u8 {
            let idx = pos as usize;
            if !keys[idx].is_pressed() || keys[idx].sent {
                continue;
            }
            if position_to_modifier(self.is_mister, pos) != Modifier::empty() {
                continue;
            }
            if self.slots.len() >= self.slots.capacity() {
                dev_warn!(
                    "rollover: position {} pressed with all 6 slots full, reporting phantom",
                    pos
                );
                out.fill(PHANTOM_SENTINEL);
                return self.current_modifier.bits();
            }

            let mut candidate_modifier = keys[idx].captured_modifier;
            if modifier_locked && self.current_modifier != candidate_modifier {
                continue;
            }

            let (hid_code, toggle) = translate(self.is_mister, pos, &mut candidate_modifier);
            if let Some(new_mister) = toggle {
                dev_info!(
                    "mode toggle chord: switching to {}",
                    if new_mister { "mister" } else { "ascii" }
                );
                self.is_mister = new_mister;
            }

            if let Some(existing) = self.slots.iter().position(|s| s.hid_code == hid_code) {
                // Same HID code from a different position (opposite shift
                // state): release the existing slot but leave this position
                // unsent so it is re-admitted cleanly on the next report,
                // once the host has seen the intervening release.
                self.slots.remove(existing);
                continue;
            }

            // Capacity already checked above; push cannot fail.
            let _ = self.slots.push(Slot {
                position: pos,
                hid_code,
            });
            self.current_modifier = candidate_modifier;
            modifier_locked = true;
            keys[idx].sent = true;
        }

        if !modifier_locked {
            self.recompute_modifier_when_idle(keys);
        }

        out.fill(0);
        for (i, slot) in self.slots.iter().enumerate() {
            out[i] = slot.hid_code;
        }
        self.current_modifier.bits()
    }

    /// Drops slots whose originating position is no longer pressed. A slot
    /// counts as released only once its HID code is a "real" key (at or
    /// above `HID_A`) — modifiers never occupy a slot and are excluded by
    /// construction.
    fn prune_released(&mut self, keys: &[KeyState; POSITION_COUNT]) {
        let mut i = 0;
        while i < self.slots.len() {
            let slot = self.slots[i];
            if slot.hid_code >= HID_A && !keys[slot.position as usize].is_pressed() {
                self.slots.remove(i);
                continue;
            }
            i += 1;
        }
    }

    /// When no new key locked the modifier this report, recomputes it from
    /// the live scan and handles the two shift-change-under-held-key special
    /// cases: the Commodore key (shift passes through live) and the cursor
    /// keys (forced release, since their HID identity depends on shift).
    fn recompute_modifier_when_idle(&mut self, keys: &mut [KeyState; POSITION_COUNT]) {
        let mut scan_modifier = Modifier::empty();
        for pos in 0..POSITION_COUNT as u8 {
            if keys[pos as usize].is_pressed() {
                scan_modifier |= position_to_modifier(self.is_mister, pos);
            }
        }

        if self.slots.is_empty() {
            self.current_modifier = scan_modifier;
        }

        if self.slots.len() == 1 && scan_modifier != self.previous_modifier {
            let held_pos = self.slots[0].position;
            if held_pos == POS_CBM {
                self.current_modifier = scan_modifier;
            } else if held_pos == POS_CRSR_RIGHT || held_pos == POS_CRSR_DOWN {
                let slot = self.slots.pop().unwrap();
                force_release(&mut keys[slot.position as usize]);
            }
        }

        self.previous_modifier = scan_modifier;
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
