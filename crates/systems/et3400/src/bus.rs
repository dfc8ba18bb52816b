//! ET-3400 memory bus
//!
//! $0000-$FBFF: RAM
//!   $C000-$C0FF: keypad scan window (reads come from the keypad, writes land in RAM only)
//!   $C100-$C1FF: display latch window (writes land in RAM and drive the latch)
//! $FC00-$FFFF: monitor ROM (1 KiB, vectors at the top)

use emu_core::cpu_6800::Memory6800;
use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::memory::{MemoryBlock, MemoryError};

use crate::display::DisplayLatch;
use crate::keypad::Keypad;

pub const RAM_SIZE: usize = 0xFC00;
pub const ROM_BASE: u16 = 0xFC00;
pub const ROM_SIZE: usize = 0x400;
pub const KEYPAD_BASE: u16 = 0xC000;
pub const DISPLAY_BASE: u16 = 0xC100;

/// Value seen on the data bus when a read cannot be resolved
const OPEN_BUS: u8 = 0xFF;

#[derive(Debug)]
pub struct Et3400Bus {
    pub ram: MemoryBlock,
    pub rom: MemoryBlock,
    pub keypad: Keypad,
    pub display: DisplayLatch,
    /// Most recent write fault seen through the CPU's infallible interface. Read faults
    /// are only logged, since `Memory6800::read` borrows the bus immutably.
    pub fault: Option<MemoryError>,
}

impl Et3400Bus {
    pub fn new(rom_image: &[u8], keypad: Keypad) -> Self {
        Self {
            ram: MemoryBlock::plain(RAM_SIZE),
            rom: MemoryBlock::read_only(ROM_SIZE, rom_image).at(ROM_BASE),
            keypad,
            display: DisplayLatch::new(),
            fault: None,
        }
    }

    /// Swap in a new monitor image
    pub fn load_rom(&mut self, image: &[u8]) {
        self.rom = MemoryBlock::read_only(ROM_SIZE, image).at(ROM_BASE);
    }

    /// Read through the address map
    pub fn read_checked(&self, addr: u16) -> Result<u8, MemoryError> {
        match addr {
            0xC000..=0xC0FF => Ok(self.keypad.scan_state((addr & 0x07) as u8)),
            _ if self.rom.contains(addr) => self.rom.read_byte(addr),
            _ => self.ram.read_byte(addr),
        }
    }

    /// Write through the address map. ROM writes are dropped and counted by the ROM block.
    pub fn write_checked(&mut self, addr: u16, val: u8) -> Result<(), MemoryError> {
        if self.rom.contains(addr) {
            return self.rom.write_byte(addr, val);
        }
        self.ram.write_byte(addr, val)?;
        if let 0xC100..=0xC1FF = addr {
            self.display.write(addr as u8, val);
        }
        Ok(())
    }
}

impl Memory6800 for Et3400Bus {
    fn read(&self, addr: u16) -> u8 {
        match self.read_checked(addr) {
            Ok(val) => val,
            Err(e) => {
                log(LogCategory::Memory, LogLevel::Error, || {
                    format!("bus read failed: {}", e)
                });
                OPEN_BUS
            }
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        if let Err(e) = self.write_checked(addr, val) {
            log(LogCategory::Memory, LogLevel::Error, || {
                format!("bus write failed: {}", e)
            });
            self.fault = Some(e);
        }
    }
}
