//! Range-checked memory blocks.
//!
//! A [`MemoryBlock`] is a fixed-size byte array with an [`Access`] capability chosen at
//! construction:
//!
//! - `Plain`: ordinary read/write storage (RAM)
//! - `ReadOnly`: content fixed from an image; writes and clears are dropped with a warning (ROM)
//!
//! A block occupies `[base, base + size)` of the CPU address space; addresses passed to it
//! are absolute. Systems compose blocks into an address-space router and implement the
//! CPU's memory trait on top of that.

use crate::logging::{log, LogCategory, LogLevel};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("address 0x{address:04X} out of range for {size}-byte memory")]
    OutOfRange { address: u16, size: usize },
}

/// What a block allows callers to do with its contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Plain,
    ReadOnly,
}

#[derive(Debug, Clone)]
pub struct MemoryBlock {
    content: Vec<u8>,
    base: u16,
    access: Access,
    rejected_writes: u64,
}

impl MemoryBlock {
    /// Zero-filled read/write memory of `size` bytes
    pub fn plain(size: usize) -> Self {
        Self {
            content: vec![0; size],
            base: 0,
            access: Access::Plain,
            rejected_writes: 0,
        }
    }

    /// Read-only memory of exactly `size` bytes built from `image`.
    ///
    /// A short image is zero-padded at the high end; a long one is truncated.
    pub fn read_only(size: usize, image: &[u8]) -> Self {
        let mut content = image.to_vec();
        if content.len() > size {
            log(LogCategory::Memory, LogLevel::Warn, || {
                format!(
                    "ROM image of {} bytes truncated to {} bytes",
                    image.len(),
                    size
                )
            });
        }
        content.resize(size, 0);
        Self {
            content,
            base: 0,
            access: Access::ReadOnly,
            rejected_writes: 0,
        }
    }

    /// Place the block at `base` in the address space
    pub fn at(mut self, base: u16) -> Self {
        self.base = base;
        self
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn contains(&self, address: u16) -> bool {
        self.check(address).is_ok()
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.content
    }

    /// Number of writes and clears dropped because the block is read-only
    pub fn rejected_writes(&self) -> u64 {
        self.rejected_writes
    }

    fn check(&self, address: u16) -> Result<usize, MemoryError> {
        match address.checked_sub(self.base) {
            Some(offset) if (offset as usize) < self.content.len() => Ok(offset as usize),
            _ => Err(MemoryError::OutOfRange {
                address,
                size: self.content.len(),
            }),
        }
    }

    pub fn read_byte(&self, address: u16) -> Result<u8, MemoryError> {
        self.check(address).map(|i| self.content[i])
    }

    /// Store `value` at `address`. On a read-only block this is a logged no-op, but an
    /// out-of-range address is still an error.
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), MemoryError> {
        let index = self.check(address)?;
        match self.access {
            Access::Plain => self.content[index] = value,
            Access::ReadOnly => {
                self.rejected_writes += 1;
                log(LogCategory::Memory, LogLevel::Warn, || {
                    format!(
                        "Attempt to write {:02X} to ROM at address {:04X}, nothing written",
                        value, address
                    )
                });
            }
        }
        Ok(())
    }

    /// Copy `bytes` starting at `offset`; nothing is written if any byte would fall outside.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let start = self.check(offset)?;
        let end = start + bytes.len();
        if end > self.content.len() {
            return Err(MemoryError::OutOfRange {
                address: (self.base as usize + end - 1).min(u16::MAX as usize) as u16,
                size: self.content.len(),
            });
        }
        match self.access {
            Access::Plain => self.content[start..end].copy_from_slice(bytes),
            Access::ReadOnly => {
                self.rejected_writes += 1;
                log(LogCategory::Memory, LogLevel::Warn, || {
                    format!(
                        "Attempt to load {} bytes into ROM at address {:04X}, nothing written",
                        bytes.len(),
                        offset
                    )
                });
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        match self.access {
            Access::Plain => self.content.fill(0),
            Access::ReadOnly => {
                self.rejected_writes += 1;
                log(LogCategory::Memory, LogLevel::Warn, || {
                    "Attempt to clear ROM, nothing cleared".to_string()
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_write_then_read_every_address() {
        let mut ram = MemoryBlock::plain(0x200);
        for a in 0..0x200u16 {
            ram.write_byte(a, (a as u8).wrapping_mul(7)).unwrap();
        }
        for a in 0..0x200u16 {
            assert_eq!(ram.read_byte(a), Ok((a as u8).wrapping_mul(7)));
        }
    }

    #[test]
    fn plain_clear_zeroes_content() {
        let mut ram = MemoryBlock::plain(16);
        ram.write_byte(3, 0xAA).unwrap();
        ram.clear();
        assert!(ram.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn out_of_range_is_reported_not_clamped() {
        let mut ram = MemoryBlock::plain(4);
        assert_eq!(
            ram.read_byte(4),
            Err(MemoryError::OutOfRange { address: 4, size: 4 })
        );
        assert!(ram.write_byte(0xFFFF, 1).is_err());
        assert_eq!(ram.as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn rom_pads_short_image() {
        let rom = MemoryBlock::read_only(4, &[9]);
        assert_eq!(rom.as_slice(), &[9, 0, 0, 0]);
        assert_eq!(rom.access(), Access::ReadOnly);
    }

    #[test]
    fn rom_truncates_long_image() {
        let rom = MemoryBlock::read_only(2, &[1, 2, 3]);
        assert_eq!(rom.as_slice(), &[1, 2]);
    }

    #[test]
    fn rom_ignores_writes_and_clears() {
        let mut rom = MemoryBlock::read_only(8, &[0x10, 0x20, 0x30]);
        for a in 0..8u16 {
            let before = rom.read_byte(a).unwrap();
            rom.write_byte(a, 0xFF).unwrap();
            assert_eq!(rom.read_byte(a).unwrap(), before);
        }
        rom.clear();
        assert_eq!(&rom.as_slice()[..3], &[0x10, 0x20, 0x30]);
        assert_eq!(rom.rejected_writes(), 9);
    }

    #[test]
    fn rom_write_out_of_range_still_errors() {
        let mut rom = MemoryBlock::read_only(2, &[]);
        assert!(rom.write_byte(2, 0).is_err());
        assert_eq!(rom.rejected_writes(), 0);
    }

    #[test]
    fn based_block_uses_absolute_addresses() {
        let mut rom = MemoryBlock::read_only(0x400, &[0xAB]).at(0xFC00);
        assert_eq!(rom.read_byte(0xFC00), Ok(0xAB));
        assert!(rom.contains(0xFFFF));
        assert!(!rom.contains(0xFBFF));
        assert_eq!(
            rom.read_byte(0x0000),
            Err(MemoryError::OutOfRange {
                address: 0x0000,
                size: 0x400
            })
        );
        rom.write_byte(0xFC00, 0).unwrap();
        assert_eq!(rom.read_byte(0xFC00), Ok(0xAB));
    }

    #[test]
    fn load_is_all_or_nothing() {
        let mut ram = MemoryBlock::plain(8);
        ram.load(2, &[1, 2, 3]).unwrap();
        assert_eq!(ram.as_slice(), &[0, 0, 1, 2, 3, 0, 0, 0]);

        assert_eq!(
            ram.load(6, &[9, 9, 9]),
            Err(MemoryError::OutOfRange { address: 8, size: 8 })
        );
        assert_eq!(&ram.as_slice()[6..], &[0, 0]);
    }
}
