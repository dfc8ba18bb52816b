//! ET-3400 hexadecimal keypad
//!
//! The 16 data keys sit in a 3-row scan matrix read through `0xC000-0xC0FF`. The low three
//! bits of the read address select rows, active low: a row participates when its bit is 0.
//! Each key pulls its column bit low while held.
//!
//! ```text
//! row select   bit0 bit1 bit2 bit3 bit4 bit5
//! bit 0 (C006)  D    A    7    4    1    0
//! bit 1 (C005)  E    B    8    5    2    -
//! bit 2 (C003)  F    C    9    6    3    -
//! ```
//!
//! Bits 6 and 7 always read 1. RESET is wired to the CPU reset line, not the matrix.

use emu_core::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the 17 keys on the trainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Key {
    Hex(HexDigit),
    Reset,
}

/// A hex digit key value, always in `0..=0xF`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexDigit(u8);

impl HexDigit {
    pub fn new(value: u8) -> Option<Self> {
        (value < 16).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key code: {0:?}")]
pub struct KeyParseError(pub String);

impl Key {
    /// All keys, data keys in hex order then RESET
    pub fn all() -> impl Iterator<Item = Key> {
        (0..16u8)
            .map(|v| Key::Hex(HexDigit(v)))
            .chain(std::iter::once(Key::Reset))
    }

    pub fn hex(value: u8) -> Option<Self> {
        HexDigit::new(value).map(Key::Hex)
    }

    /// Row index and column bit in the scan matrix, or `None` for RESET
    pub fn matrix_position(self) -> Option<(u8, u8)> {
        let Key::Hex(HexDigit(v)) = self else {
            return None;
        };
        let pos = match v {
            0xD => (0, 0),
            0xA => (0, 1),
            0x7 => (0, 2),
            0x4 => (0, 3),
            0x1 => (0, 4),
            0x0 => (0, 5),
            0xE => (1, 0),
            0xB => (1, 1),
            0x8 => (1, 2),
            0x5 => (1, 3),
            0x2 => (1, 4),
            0xF => (2, 0),
            0xC => (2, 1),
            0x9 => (2, 2),
            0x6 => (2, 3),
            _ => (2, 4), // 3
        };
        Some(pos)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Hex(d) => write!(f, "{:X}", d.0),
            Key::Reset => f.write_str("RESET"),
        }
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.eq_ignore_ascii_case("reset") {
            return Ok(Key::Reset);
        }
        let mut chars = code.chars();
        match (chars.next().and_then(|c| c.to_digit(16)), chars.next()) {
            (Some(v), None) => Ok(Key::Hex(HexDigit(v as u8))),
            _ => Err(KeyParseError(s.to_string())),
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for Key {
    type Error = KeyParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// How held keys are presented to the scan matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyPolicy {
    /// Only the most recently pressed held key is encoded
    #[default]
    SingleKey,
    /// Every held key is encoded
    MultiKey,
}

/// Logical key state, oldest press first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keypad {
    held: Vec<Key>,
    policy: KeyPolicy,
}

impl Keypad {
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            held: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: KeyPolicy) {
        self.policy = policy;
    }

    /// Mark `key` held. Returns false if it already was.
    pub fn press(&mut self, key: Key) -> bool {
        if self.held.contains(&key) {
            return false;
        }
        self.held.push(key);
        log(LogCategory::Keypad, LogLevel::Debug, || {
            format!("key {} down", key)
        });
        true
    }

    /// Mark `key` released. Returns false if it was not held.
    pub fn release(&mut self, key: Key) -> bool {
        let Some(pos) = self.held.iter().position(|&k| k == key) else {
            return false;
        };
        self.held.remove(pos);
        log(LogCategory::Keypad, LogLevel::Debug, || {
            format!("key {} up", key)
        });
        true
    }

    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            log(LogCategory::Keypad, LogLevel::Debug, || {
                format!("releasing {} held keys", self.held.len())
            });
        }
        self.held.clear();
    }

    /// Drop repeated entries, keeping each key's first press
    pub(crate) fn dedup_held(&mut self) {
        let mut seen = Vec::with_capacity(self.held.len());
        self.held.retain(|k| {
            if seen.contains(k) {
                false
            } else {
                seen.push(*k);
                true
            }
        });
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Held keys in press order
    pub fn held(&self) -> &[Key] {
        &self.held
    }

    /// Keys visible to the scan matrix under the current policy
    pub fn active(&self) -> &[Key] {
        match self.policy {
            // RESET sits outside the matrix and never shadows a data key
            KeyPolicy::SingleKey => self
                .held
                .iter()
                .rev()
                .find(|k| k.matrix_position().is_some())
                .map(std::slice::from_ref)
                .unwrap_or(&[]),
            KeyPolicy::MultiKey => &self.held,
        }
    }

    /// Byte the CPU reads from the scan window with `select` as the low address bits
    pub fn scan_state(&self, select: u8) -> u8 {
        let mut value = 0xFF;
        for key in self.active() {
            if let Some((row, bit)) = key.matrix_position() {
                if select & (1 << row) == 0 {
                    value &= !(1 << bit);
                }
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Key {
        s.parse().unwrap()
    }

    #[test]
    fn parses_codes() {
        assert_eq!(key("0"), Key::hex(0).unwrap());
        assert_eq!(key("a"), Key::hex(0xA).unwrap());
        assert_eq!(key("F"), Key::hex(0xF).unwrap());
        assert_eq!(key("Reset"), Key::Reset);
        assert!("G".parse::<Key>().is_err());
        assert!("10".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for k in Key::all() {
            assert_eq!(k.to_string().parse::<Key>(), Ok(k));
        }
    }

    #[test]
    fn every_data_key_has_a_unique_cell() {
        let mut cells: Vec<_> = Key::all().filter_map(Key::matrix_position).collect();
        assert_eq!(cells.len(), 16);
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 16);
        assert_eq!(Key::Reset.matrix_position(), None);
    }

    #[test]
    fn idle_scan_reads_all_ones() {
        let pad = Keypad::default();
        for select in 0..8 {
            assert_eq!(pad.scan_state(select), 0xFF);
        }
    }

    #[test]
    fn scan_encodes_documented_rows() {
        let mut pad = Keypad::default();
        pad.press(key("0"));
        assert_eq!(pad.scan_state(0x06), 0xDF);
        assert_eq!(pad.scan_state(0x05), 0xFF);
        assert_eq!(pad.scan_state(0x03), 0xFF);

        pad.release(key("0"));
        pad.press(key("2"));
        assert_eq!(pad.scan_state(0x05), 0xEF);
        assert_eq!(pad.scan_state(0x06), 0xFF);

        pad.release(key("2"));
        pad.press(key("F"));
        assert_eq!(pad.scan_state(0x03), 0xFE);
        // all rows selected at once
        assert_eq!(pad.scan_state(0x00), 0xFE);
    }

    #[test]
    fn single_key_policy_tracks_latest_press() {
        let mut pad = Keypad::new(KeyPolicy::SingleKey);
        pad.press(key("D"));
        pad.press(key("A"));
        assert_eq!(pad.scan_state(0x06), 0xFD);
        pad.release(key("A"));
        assert_eq!(pad.scan_state(0x06), 0xFE);
    }

    #[test]
    fn multi_key_policy_encodes_all() {
        let mut pad = Keypad::new(KeyPolicy::MultiKey);
        pad.press(key("D"));
        pad.press(key("A"));
        assert_eq!(pad.scan_state(0x06), 0xFC);
    }

    #[test]
    fn press_and_release_are_idempotent() {
        let mut pad = Keypad::default();
        assert!(pad.press(key("5")));
        assert!(!pad.press(key("5")));
        assert_eq!(pad.held().len(), 1);
        assert!(pad.release(key("5")));
        assert!(!pad.release(key("5")));
        assert!(!pad.is_pressed(key("5")));
    }

    #[test]
    fn key_serializes_as_code() {
        let json = serde_json::to_string(&vec![key("B"), Key::Reset]).unwrap();
        assert_eq!(json, r#"["B","RESET"]"#);
        let back: Vec<Key> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![key("B"), Key::Reset]);
    }

    #[test]
    fn reset_does_not_shadow_held_key() {
        let mut pad = Keypad::default();
        pad.press(key("5"));
        assert_eq!(pad.scan_state(0x05), 0xF7);
        pad.press(Key::Reset);
        assert_eq!(pad.active(), &[key("5")]);
        assert_eq!(pad.scan_state(0x05), 0xF7);
        pad.release(key("5"));
        assert!(pad.active().is_empty());
        assert_eq!(pad.scan_state(0x00), 0xFF);
    }

    #[test]
    fn dedup_keeps_first_press() {
        let mut pad: Keypad =
            serde_json::from_str(r#"{"held": ["1", "RESET", "1", "A"], "policy": "MultiKey"}"#)
                .unwrap();
        pad.dedup_held();
        assert_eq!(pad.held(), &[key("1"), Key::Reset, key("A")]);
        pad.release(key("1"));
        assert!(!pad.is_pressed(key("1")));
    }
}
