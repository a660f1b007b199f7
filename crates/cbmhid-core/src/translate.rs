//! Positional-code → HID-code translation under the ASCII and MiSTer
//! profiles (§4.3). Grounded on `original_source/src/kb6.c`'s
//! `cbm_translate_ascii` and `cbm_translate_mister`.
//!
//! Each translator is a pure function of a position and the modifier bitmap
//! captured at promotion time; it may rewrite the modifier in place (e.g.
//! clearing shift when a shifted key maps to an unrelated HID key) and may
//! return a new mode flag when the escape chord is held over the STERLING or
//! DEL position.

use usbd_hid::descriptor::KeyboardUsage;

use crate::keys::{
    Modifier, POS_ARROW_LEFT, POS_ARROW_UP, POS_ASTERISK, POS_CBM, POS_COLON,
    POS_COMMERCIAL_AT, POS_CRSR_DOWN, POS_CRSR_RIGHT, POS_DEL, POS_EQUAL, POS_F1, POS_F3, POS_F5,
    POS_F7, POS_HOME, POS_KEY_0, POS_KEY_2, POS_KEY_6, POS_KEY_7, POS_KEY_8, POS_KEY_9, POS_MINUS,
    POS_PLUS, POS_RESTORE, POS_SEMICOLON, POS_STERLING, POS_TO_HID,
};

/// Translates one positional code into an HID usage under the given
/// profile, possibly adjusting `modifier` in place and possibly requesting a
/// profile flip (§4.3.1, §4.3.2).
pub fn translate(is_mister: bool, pos: u8, modifier: &mut Modifier) -> (u8, Option<bool>) {
    if is_mister {
        translate_mister(pos, modifier)
    } else {
        translate_ascii(pos, modifier)
    }
}

fn translate_ascii(pos: u8, modifier: &mut Modifier) -> (u8, Option<bool>) {
    let mut hid = POS_TO_HID[pos as usize];

    if *modifier == Modifier::ESCAPE_CHORD {
        match pos {
            POS_STERLING => return (KeyboardUsage::KeyboardRightShift as u8, Some(true)),
            POS_DEL => {
                *modifier = Modifier::LEFTCTRL | Modifier::LEFTALT;
                return (KeyboardUsage::KeyboardDeleteForward as u8, None);
            }
            POS_F1 => {
                hid = KeyboardUsage::KeyboardF9 as u8;
                *modifier = Modifier::empty();
            }
            POS_F3 => {
                hid = KeyboardUsage::KeyboardF10 as u8;
                *modifier = Modifier::empty();
            }
            POS_F5 => {
                hid = KeyboardUsage::KeyboardF11 as u8;
                *modifier = Modifier::empty();
            }
            POS_F7 => {
                hid = KeyboardUsage::KeyboardF12 as u8;
                *modifier = Modifier::empty();
            }
            _ => {}
        }
    }

    if modifier.intersects(Modifier::SHIFT) {
        match pos {
            POS_KEY_2 => hid = KeyboardUsage::KeyboardSingleDoubleQuote as u8,
            POS_KEY_6 => hid = KeyboardUsage::Keyboard7Ampersand as u8,
            POS_KEY_7 => {
                hid = KeyboardUsage::KeyboardSingleDoubleQuote as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_KEY_8 => hid = KeyboardUsage::Keyboard9OpenParens as u8,
            POS_KEY_9 => hid = KeyboardUsage::Keyboard0CloseParens as u8,
            POS_KEY_0 => {
                hid = KeyboardUsage::KeyboardF12 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_PLUS => {
                hid = KeyboardUsage::KeyboardPageUp as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_MINUS => {
                hid = KeyboardUsage::KeyboardPageDown as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_COLON => {
                hid = KeyboardUsage::KeyboardOpenBracketBrace as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_STERLING => hid = KeyboardUsage::KeyboardDashUnderscore as u8,
            POS_SEMICOLON => {
                hid = KeyboardUsage::KeyboardCloseBracketBrace as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_ARROW_UP => hid = KeyboardUsage::KeyboardBacktickTilde as u8,
            POS_HOME => {
                hid = KeyboardUsage::KeyboardEnd as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_DEL => {
                hid = KeyboardUsage::KeyboardInsert as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_CRSR_RIGHT => {
                hid = KeyboardUsage::KeyboardLeftArrow as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_CRSR_DOWN => {
                hid = KeyboardUsage::KeyboardUpArrow as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_F1 => {
                hid = KeyboardUsage::KeyboardF2 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_F3 => {
                hid = KeyboardUsage::KeyboardF4 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_F5 => {
                hid = KeyboardUsage::KeyboardF6 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_F7 => {
                hid = KeyboardUsage::KeyboardF8 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            _ => {}
        }
    } else {
        match pos {
            POS_PLUS => {
                hid = KeyboardUsage::KeyboardEqualPlus as u8;
                modifier.insert(Modifier::LEFTSHIFT);
            }
            POS_MINUS => hid = KeyboardUsage::KeyboardDashUnderscore as u8,
            POS_COLON => {
                hid = KeyboardUsage::KeyboardSemiColon as u8;
                modifier.insert(Modifier::LEFTSHIFT);
            }
            POS_COMMERCIAL_AT => {
                hid = KeyboardUsage::Keyboard2At as u8;
                modifier.insert(Modifier::LEFTSHIFT);
            }
            POS_STERLING => hid = KeyboardUsage::KeyboardBacktickTilde as u8,
            POS_ASTERISK => {
                hid = KeyboardUsage::Keyboard8Asterisk as u8;
                modifier.insert(Modifier::LEFTSHIFT);
            }
            POS_SEMICOLON => hid = KeyboardUsage::KeyboardSemiColon as u8,
            POS_ARROW_UP => {
                hid = KeyboardUsage::Keyboard6Caret as u8;
                modifier.insert(Modifier::LEFTSHIFT);
            }
            POS_DEL => hid = KeyboardUsage::KeyboardBackspace as u8,
            _ => {}
        }
    }

    // Unconditional rewrites, applied last regardless of shift state or
    // whether the escape-chord branch above fell through.
    match pos {
        POS_ARROW_LEFT => hid = KeyboardUsage::KeyboardDeleteForward as u8,
        POS_CBM => hid = KeyboardUsage::KeyboardTab as u8,
        POS_RESTORE => hid = KeyboardUsage::KeyboardBackslashBar as u8,
        POS_EQUAL => {
            hid = KeyboardUsage::KeyboardEqualPlus as u8;
            modifier.remove(Modifier::SHIFT);
        }
        _ => {}
    }

    (hid, None)
}

fn translate_mister(pos: u8, modifier: &mut Modifier) -> (u8, Option<bool>) {
    let mut hid = POS_TO_HID[pos as usize];

    if *modifier == Modifier::ESCAPE_CHORD {
        match pos {
            POS_STERLING => return (KeyboardUsage::KeyboardRightShift as u8, Some(false)),
            POS_DEL => {
                *modifier = Modifier::LEFTCTRL | Modifier::LEFTALT | Modifier::RIGHTALT;
                return (KeyboardUsage::KeyboardRightAlt as u8, None);
            }
            _ => {}
        }
    }

    if modifier.intersects(Modifier::SHIFT) {
        match pos {
            POS_KEY_6 => hid = KeyboardUsage::Keyboard7Ampersand as u8,
            POS_KEY_7 => hid = KeyboardUsage::Keyboard6Caret as u8,
            POS_KEY_8 => hid = KeyboardUsage::Keyboard9OpenParens as u8,
            POS_KEY_9 => hid = KeyboardUsage::Keyboard0CloseParens as u8,
            POS_KEY_0 => {
                hid = KeyboardUsage::KeyboardF12 as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_CRSR_RIGHT => {
                hid = KeyboardUsage::KeyboardLeftArrow as u8;
                modifier.remove(Modifier::SHIFT);
            }
            POS_CRSR_DOWN => {
                hid = KeyboardUsage::KeyboardUpArrow as u8;
                modifier.remove(Modifier::SHIFT);
            }
            _ => {}
        }
    }

    (hid, None)
}
