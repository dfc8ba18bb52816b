//! Six-digit LED display driven through the latch window at `0xC100-0xC1FF`
//!
//! Each write sets or clears a single segment. The low byte of the address picks the target:
//!
//! - bits 4-6: digit slot, 6 = leftmost (H) down to 1 = rightmost (C); 0 and 7 are unwired
//! - bits 0-2: segment, 0=g 1=f 2=e 3=d 4=c 5=b 6=a 7=dp
//!
//! Bit 0 of the data lights the segment when 1 and clears it when 0.
//!
//! Observers subscribe with [`DisplayLatch::subscribe`] and receive a full snapshot followed
//! by every digit change. Receivers that have been dropped are pruned on the next send.

use emu_core::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

pub const DIGIT_COUNT: usize = 6;

// Segment bits in a digit's pattern
pub const SEG_A: u8 = 0x01;
pub const SEG_B: u8 = 0x02;
pub const SEG_C: u8 = 0x04;
pub const SEG_D: u8 = 0x08;
pub const SEG_E: u8 = 0x10;
pub const SEG_F: u8 = 0x20;
pub const SEG_G: u8 = 0x40;
pub const SEG_DP: u8 = 0x80;

/// Segment selected by address bits 0-2
const LATCH_SEGMENTS: [u8; 8] = [SEG_G, SEG_F, SEG_E, SEG_D, SEG_C, SEG_B, SEG_A, SEG_DP];

/// Known glyphs for text rendering
const GLYPHS: [(u8, char); 24] = [
    (0x00, ' '),
    (0x3F, '0'),
    (0x06, '1'),
    (0x5B, '2'),
    (0x4F, '3'),
    (0x66, '4'),
    (0x6D, '5'),
    (0x7D, '6'),
    (0x07, '7'),
    (0x7F, '8'),
    (0x6F, '9'),
    (0x77, 'A'),
    (0x7C, 'b'),
    (0x39, 'C'),
    (0x5E, 'd'),
    (0x79, 'E'),
    (0x71, 'F'),
    (0x76, 'H'),
    (0x38, 'L'),
    (0x73, 'P'),
    (0x3E, 'U'),
    (0x50, 'r'),
    (0x5C, 'o'),
    (0x40, '-'),
];

/// Lit segments of every digit, index 0 = leftmost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub digits: [u8; DIGIT_COUNT],
}

impl DisplaySnapshot {
    pub fn is_blank(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    /// Best-effort text rendering; unknown patterns show as `?`, lit decimal points as `.`
    pub fn render(&self) -> String {
        let mut text = String::with_capacity(DIGIT_COUNT * 2);
        for &segments in &self.digits {
            let shape = segments & !SEG_DP;
            let ch = GLYPHS
                .iter()
                .find(|(pattern, _)| *pattern == shape)
                .map(|&(_, c)| c)
                .unwrap_or('?');
            text.push(ch);
            if segments & SEG_DP != 0 {
                text.push('.');
            }
        }
        text
    }
}

/// Message delivered to display subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayEvent {
    /// Full state, sent first to every new subscriber and after a state load
    Snapshot(DisplaySnapshot),
    /// One digit changed
    Digit { index: usize, segments: u8 },
}

#[derive(Debug, Default)]
pub struct DisplayLatch {
    digits: [u8; DIGIT_COUNT],
    subscribers: Vec<Sender<DisplayEvent>>,
}

impl DisplayLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            digits: self.digits,
        }
    }

    /// Apply a write of `value` at latch offset `offset` (address low byte)
    pub fn write(&mut self, offset: u8, value: u8) {
        let slot = ((offset >> 4) & 0x07) as usize;
        if !(1..=DIGIT_COUNT).contains(&slot) {
            log(LogCategory::Display, LogLevel::Trace, || {
                format!("latch write to unwired slot {} ignored", slot)
            });
            return;
        }
        let index = DIGIT_COUNT - slot;
        let mask = LATCH_SEGMENTS[(offset & 0x07) as usize];
        let old = self.digits[index];
        let new = if value & 0x01 != 0 {
            old | mask
        } else {
            old & !mask
        };
        if new != old {
            self.set_digit(index, new);
        }
    }

    fn set_digit(&mut self, index: usize, segments: u8) {
        self.digits[index] = segments;
        log(LogCategory::Display, LogLevel::Trace, || {
            format!("digit {} = {:02X}", index, segments)
        });
        self.broadcast(DisplayEvent::Digit { index, segments });
    }

    /// Turn every segment off, notifying observers of each digit that changes
    pub fn blank(&mut self) {
        for index in 0..DIGIT_COUNT {
            if self.digits[index] != 0 {
                self.set_digit(index, 0);
            }
        }
    }

    /// Replace the whole display, as when loading saved state
    pub fn restore(&mut self, snapshot: DisplaySnapshot) {
        self.digits = snapshot.digits;
        self.broadcast(DisplayEvent::Snapshot(snapshot));
    }

    /// Register an observer; the current snapshot is queued immediately
    pub fn subscribe(&mut self) -> Receiver<DisplayEvent> {
        let (tx, rx) = mpsc::channel();
        // The receiver is still in hand, so this cannot fail
        let _ = tx.send(DisplayEvent::Snapshot(self.snapshot()));
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn broadcast(&mut self, event: DisplayEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            log(LogCategory::Display, LogLevel::Debug, || {
                format!("pruned {} closed display subscribers", pruned)
            });
        }
    }
}
