//! Positional code space (§3) and the default positional→HID table (§4.3,
//! §6). Grounded on `original_source/src/kb6.c`'s `CBM_TO_HID` table and
//! `CBM_KEY_*` defines, which this module reproduces verbatim in HID-usage
//! terms instead of raw bytes.

use bitflags::bitflags;
use usbd_hid::descriptor::KeyboardUsage;

/// Number of positional codes: the 8x8 matrix (0..64) plus RESTORE (64).
pub const POSITION_COUNT: usize = 65;

/// Keycode a Reporter slot emits when rollover is indeterminate (§7, §8.8).
pub const PHANTOM_SENTINEL: u8 = 1;

/// The Reporter's proxy threshold for "non-reserved, non-phantom" slots
/// (§4.4 Step 1; Open Question in §9 — kept structural per spec).
pub const HID_A: u8 = KeyboardUsage::KeyboardAa as u8;

bitflags! {
    /// The boot keyboard report modifier byte (§6).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Modifier: u8 {
        const LEFTCTRL   = 0b0000_0001;
        const LEFTSHIFT  = 0b0000_0010;
        const LEFTALT    = 0b0000_0100;
        const LEFTGUI    = 0b0000_1000;
        const RIGHTCTRL  = 0b0001_0000;
        const RIGHTSHIFT = 0b0010_0000;
        const RIGHTALT   = 0b0100_0000;
        const RIGHTGUI   = 0b1000_0000;
    }
}

impl Modifier {
    /// Both shift keys, used pervasively by the translator's shifted/
    /// unshifted rewrite tables.
    pub const SHIFT: Modifier = Modifier::LEFTSHIFT.union(Modifier::RIGHTSHIFT);

    /// The triple-modifier escape chord that gates mode toggle and deletion
    /// rewrites (§4.3.1, §4.3.2).
    pub const ESCAPE_CHORD: Modifier = Modifier::LEFTCTRL
        .union(Modifier::LEFTSHIFT)
        .union(Modifier::RIGHTSHIFT);
}

// Named positional codes, mirroring kb6.c's CBM_KEY_* defines. Not every
// position needs a name (the letter block is only ever addressed through
// POS_TO_HID by numeric index); only the ones the translator and reporter
// branch on by identity are named here.
pub const POS_ARROW_LEFT: u8 = 1;
pub const POS_CONTROL_LEFT: u8 = 2;
pub const POS_CBM: u8 = 5;
pub const POS_KEY_2: u8 = 7;
pub const POS_SHIFT_LEFT: u8 = 11;
pub const POS_KEY_6: u8 = 23;
pub const POS_KEY_7: u8 = 24;
pub const POS_KEY_8: u8 = 31;
pub const POS_KEY_9: u8 = 32;
pub const POS_KEY_0: u8 = 39;
pub const POS_PLUS: u8 = 40;
pub const POS_COLON: u8 = 45;
pub const POS_COMMERCIAL_AT: u8 = 46;
pub const POS_MINUS: u8 = 47;
pub const POS_STERLING: u8 = 48;
pub const POS_ASTERISK: u8 = 49;
pub const POS_SEMICOLON: u8 = 50;
pub const POS_SHIFT_RIGHT: u8 = 52;
pub const POS_EQUAL: u8 = 53;
pub const POS_ARROW_UP: u8 = 54;
pub const POS_HOME: u8 = 55;
pub const POS_DEL: u8 = 56;
pub const POS_CRSR_RIGHT: u8 = 58;
pub const POS_CRSR_DOWN: u8 = 59;
pub const POS_F1: u8 = 60;
pub const POS_F3: u8 = 61;
pub const POS_F5: u8 = 62;
pub const POS_F7: u8 = 63;
pub const POS_RESTORE: u8 = 64;

/// Default positional→HID mapping (identity under the MiSTer profile).
#[rustfmt::skip]
pub const POS_TO_HID: [u8; POSITION_COUNT] = [
    KeyboardUsage::Keyboard1Exclamation as u8, KeyboardUsage::KeyboardBacktickTilde as u8, KeyboardUsage::KeyboardLeftControl as u8, KeyboardUsage::KeyboardEscape as u8,
    KeyboardUsage::KeyboardSpacebar as u8, KeyboardUsage::KeyboardLeftAlt as u8, KeyboardUsage::KeyboardQq as u8, KeyboardUsage::Keyboard2At as u8,
    KeyboardUsage::Keyboard3Hash as u8, KeyboardUsage::KeyboardWw as u8, KeyboardUsage::KeyboardAa as u8, KeyboardUsage::KeyboardLeftShift as u8,
    KeyboardUsage::KeyboardZz as u8, KeyboardUsage::KeyboardSs as u8, KeyboardUsage::KeyboardEe as u8, KeyboardUsage::Keyboard4Dollar as u8,
    KeyboardUsage::Keyboard5Percent as u8, KeyboardUsage::KeyboardRr as u8, KeyboardUsage::KeyboardDd as u8, KeyboardUsage::KeyboardXx as u8,
    KeyboardUsage::KeyboardCc as u8, KeyboardUsage::KeyboardFf as u8, KeyboardUsage::KeyboardTt as u8, KeyboardUsage::Keyboard6Caret as u8,
    KeyboardUsage::Keyboard7Ampersand as u8, KeyboardUsage::KeyboardYy as u8, KeyboardUsage::KeyboardGg as u8, KeyboardUsage::KeyboardVv as u8,
    KeyboardUsage::KeyboardBb as u8, KeyboardUsage::KeyboardHh as u8, KeyboardUsage::KeyboardUu as u8, KeyboardUsage::Keyboard8Asterisk as u8,
    KeyboardUsage::Keyboard9OpenParens as u8, KeyboardUsage::KeyboardIi as u8, KeyboardUsage::KeyboardJj as u8, KeyboardUsage::KeyboardNn as u8,
    KeyboardUsage::KeyboardMm as u8, KeyboardUsage::KeyboardKk as u8, KeyboardUsage::KeyboardOo as u8, KeyboardUsage::Keyboard0CloseParens as u8,
    KeyboardUsage::KeyboardEqualPlus as u8, KeyboardUsage::KeyboardPp as u8, KeyboardUsage::KeyboardLl as u8, KeyboardUsage::KeyboardCommaLess as u8,
    KeyboardUsage::KeyboardPeriodGreater as u8, KeyboardUsage::KeyboardSemiColon as u8, KeyboardUsage::KeyboardOpenBracketBrace as u8, KeyboardUsage::KeyboardDashUnderscore as u8,
    KeyboardUsage::KeyboardBackslashBar as u8, KeyboardUsage::KeyboardCloseBracketBrace as u8, KeyboardUsage::KeyboardSingleDoubleQuote as u8, KeyboardUsage::KeyboardSlashQuestion as u8,
    KeyboardUsage::KeyboardRightShift as u8, KeyboardUsage::KeyboardEnd as u8, KeyboardUsage::KeyboardPageDown as u8, KeyboardUsage::KeyboardHome as u8,
    KeyboardUsage::KeyboardDeleteForward as u8, KeyboardUsage::KeyboardEnter as u8, KeyboardUsage::KeyboardRightArrow as u8, KeyboardUsage::KeyboardDownArrow as u8,
    KeyboardUsage::KeyboardF1 as u8, KeyboardUsage::KeyboardF3 as u8, KeyboardUsage::KeyboardF5 as u8, KeyboardUsage::KeyboardF7 as u8,
    KeyboardUsage::KeyboardF11 as u8,
];

/// The modifier bit a position contributes while pressed, or empty if the
/// position isn't a modifier under the active profile (§4.3).
///
/// In ASCII mode the Commodore key (position 5) is repurposed as TAB rather
/// than left-alt, so it must not be treated as a held modifier.
pub fn position_to_modifier(is_mister: bool, pos: u8) -> Modifier {
    let hid = POS_TO_HID[pos as usize];
    if !is_mister && hid == KeyboardUsage::KeyboardLeftAlt as u8 {
        return Modifier::empty();
    }
    let lo = KeyboardUsage::KeyboardLeftControl as u8;
    let hi = KeyboardUsage::KeyboardRightGUI as u8;
    if hid >= lo && hid <= hi {
        Modifier::from_bits_truncate(1 << (hid & 7))
    } else {
        Modifier::empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn modifier_positions_match_hid_bit_order() {
        assert_eq!(
            position_to_modifier(true, POS_CONTROL_LEFT),
            Modifier::LEFTCTRL
        );
        assert_eq!(
            position_to_modifier(true, POS_SHIFT_LEFT),
            Modifier::LEFTSHIFT
        );
        assert_eq!(
            position_to_modifier(true, POS_SHIFT_RIGHT),
            Modifier::RIGHTSHIFT
        );
    }

    #[test]
    fn cbm_key_is_alt_under_mister_but_not_ascii() {
        assert_eq!(position_to_modifier(true, POS_CBM), Modifier::LEFTALT);
        assert_eq!(position_to_modifier(false, POS_CBM), Modifier::empty());
    }

    #[test]
    fn non_modifier_position_has_no_modifier_bit() {
        // Position 0 is the "1" key, a plain unshifted digit.
        assert_eq!(position_to_modifier(false, 0), Modifier::empty());
    }
}
