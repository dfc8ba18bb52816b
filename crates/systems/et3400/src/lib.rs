//! Heathkit ET-3400 microprocessor trainer
//!
//! A Motorola 6800 with a 1 KiB monitor ROM, RAM, a 17-key hex keypad and six 7-segment
//! digits. The machine starts powered off; nothing runs and key input is ignored until
//! [`Et3400System::power_button`] turns it on.

mod bus;
pub mod config;
pub mod display;
pub mod keypad;
pub mod loader;

pub use bus::{Et3400Bus, DISPLAY_BASE, KEYPAD_BASE, RAM_SIZE, ROM_BASE, ROM_SIZE};
pub use config::{ConfigError, MachineConfig};
pub use display::{DisplayEvent, DisplaySnapshot};
pub use keypad::{Key, KeyParseError, KeyPolicy};
pub use loader::{LoadReport, ProgramImage};

use emu_core::cpu_6800::{self, Cpu6800, CpuError, ExecState, Registers};
use emu_core::logging::{log, LogCategory, LogLevel};
use emu_core::memory::MemoryError;
use emu_core::types::{RunSummary, StopReason};
use emu_core::{MountPointInfo, System};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};
use std::sync::mpsc::Receiver;
use thiserror::Error;

const STATE_VERSION: u64 = 1;
const SYSTEM_TAG: &str = "et3400";
const MONITOR_MOUNT: &str = "Monitor";

#[derive(Debug, Error)]
pub enum Et3400Error {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("CPU error: {0}")]
    Cpu(#[from] CpuError),
    #[error("Invalid mount point: {0}")]
    InvalidMountPoint(String),
    #[error("Program image of {len} bytes at 0x{start:04X} runs past 0xFFFF")]
    ImageOverflow { start: u16, len: usize },
    #[error("Invalid key: {0}")]
    InvalidKey(#[from] KeyParseError),
}

/// Most recent recoverable fault, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error(transparent)]
    Cpu(CpuError),
    #[error(transparent)]
    Memory(MemoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerState {
    #[default]
    Off,
    Running,
}

/// Logical key transition fed through the input queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Press(Key),
    Release(Key),
}

#[derive(Serialize, Deserialize)]
struct CpuState {
    registers: Registers,
    state: ExecState,
    cycles: u64,
}

/// ET-3400 trainer
#[derive(Debug)]
pub struct Et3400System {
    cpu: Cpu6800<Et3400Bus>,
    power: PowerState,
    config: MachineConfig,
    breakpoints: BTreeSet<u16>,
    key_queue: VecDeque<KeyEvent>,
    last_fault: Option<Fault>,
    monitor_mounted: bool,
}

impl Default for Et3400System {
    fn default() -> Self {
        let mut sys = Self::new(&[], MachineConfig::default());
        sys.monitor_mounted = false;
        sys
    }
}

impl Et3400System {
    /// Create a powered-off trainer with `monitor` as its ROM image
    pub fn new(monitor: &[u8], config: MachineConfig) -> Self {
        let bus = Et3400Bus::new(monitor, keypad::Keypad::new(config.key_policy));
        Self {
            cpu: Cpu6800::new(bus),
            power: PowerState::Off,
            breakpoints: config.breakpoints.iter().copied().collect(),
            config,
            key_queue: VecDeque::new(),
            last_fault: None,
            monitor_mounted: true,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn is_powered(&self) -> bool {
        self.power == PowerState::Running
    }

    /// Toggle power
    pub fn power_button(&mut self) {
        match self.power {
            PowerState::Off => self.power_on(),
            PowerState::Running => self.power_off(),
        }
    }

    fn power_on(&mut self) {
        let bus = &mut self.cpu.memory;
        if self.config.clear_ram_on_power_on {
            bus.ram.clear();
        }
        bus.display.blank();
        bus.fault = None;
        self.key_queue.clear();
        self.last_fault = None;
        self.cpu.power_on_reset();
        self.power = PowerState::Running;
        log(LogCategory::Power, LogLevel::Info, || {
            format!("power on, PC={:04X}", self.cpu.pc)
        });
    }

    /// Turn the machine off; safe to call when already off
    pub fn power_off(&mut self) {
        let was_on = self.is_powered();
        self.power = PowerState::Off;
        let bus = &mut self.cpu.memory;
        bus.keypad.release_all();
        bus.display.blank();
        self.key_queue.clear();
        if was_on {
            log(LogCategory::Power, LogLevel::Info, || "power off".to_string());
        }
    }

    /// Reset the CPU through the reset vector, keeping RAM. Ignored while off.
    pub fn reset(&mut self) {
        if !self.is_powered() {
            return;
        }
        self.cpu.reset();
        log(LogCategory::Power, LogLevel::Info, || {
            format!("reset, PC={:04X}", self.cpu.pc)
        });
    }

    /// Zero all of RAM
    pub fn clear_ram(&mut self) {
        self.cpu.memory.ram.clear();
    }

    pub fn press_key(&mut self, key: Key) {
        if !self.is_powered() {
            log(LogCategory::Keypad, LogLevel::Trace, || {
                format!("key {} ignored while off", key)
            });
            return;
        }
        if self.cpu.memory.keypad.press(key) && key == Key::Reset {
            self.reset();
        }
    }

    pub fn release_key(&mut self, key: Key) {
        if !self.is_powered() {
            return;
        }
        self.cpu.memory.keypad.release(key);
    }

    /// Press by textual key code ("0"-"F", "RESET")
    pub fn press_key_code(&mut self, code: &str) -> Result<(), Et3400Error> {
        self.press_key(code.parse()?);
        Ok(())
    }

    /// Release by textual key code ("0"-"F", "RESET")
    pub fn release_key_code(&mut self, code: &str) -> Result<(), Et3400Error> {
        self.release_key(code.parse()?);
        Ok(())
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.cpu.memory.keypad.is_pressed(key)
    }

    /// Queue a key transition for the start of the next tick. Dropped while off.
    pub fn queue_key_event(&mut self, event: KeyEvent) {
        if self.is_powered() {
            self.key_queue.push_back(event);
        }
    }

    fn drain_key_events(&mut self) {
        while let Some(event) = self.key_queue.pop_front() {
            match event {
                KeyEvent::Press(key) => self.press_key(key),
                KeyEvent::Release(key) => self.release_key(key),
            }
        }
    }

    pub fn add_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.remove(&addr)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    /// Execute one instruction. Returns 0 cycles while off or halted.
    pub fn step(&mut self) -> Result<u32, Et3400Error> {
        if !self.is_powered() {
            return Ok(0);
        }
        let result = self.cpu.step();
        if let Some(e) = self.cpu.memory.fault.take() {
            self.last_fault = Some(Fault::Memory(e));
        }
        match result {
            Ok(cycles) => Ok(cycles),
            Err(e) => {
                self.last_fault = Some(Fault::Cpu(e));
                Err(e.into())
            }
        }
    }

    /// Run until `budget` cycles are spent, a breakpoint is reached, or the CPU halts.
    ///
    /// A breakpoint on the first instruction of the call is not honored, so a machine stopped
    /// at one can be resumed. An invalid opcode ends the run with [`StopReason::Halted`] and
    /// is recorded in [`Et3400System::last_fault`].
    pub fn run(&mut self, budget: u64) -> RunSummary {
        if !self.is_powered() {
            return RunSummary::new(StopReason::PoweredOff);
        }
        let mut summary = RunSummary::new(StopReason::BudgetExhausted);
        while summary.cycles < budget {
            match self.cpu.state() {
                ExecState::Halted => {
                    summary.stop = StopReason::Halted;
                    break;
                }
                ExecState::Waiting => {
                    // Nothing can interrupt within a slice; idle out the rest
                    let rest = budget - summary.cycles;
                    self.cpu.cycles += rest;
                    summary.cycles = budget;
                    summary.stop = StopReason::Waiting;
                    break;
                }
                ExecState::Running => {}
            }
            let pc = self.cpu.pc;
            if summary.instructions > 0 && self.breakpoints.contains(&pc) {
                log(LogCategory::Cpu, LogLevel::Debug, || {
                    format!("breakpoint at {:04X}", pc)
                });
                summary.stop = StopReason::Breakpoint(pc);
                break;
            }
            match self.step() {
                Ok(cycles) => {
                    summary.cycles += cycles as u64;
                    summary.instructions += 1;
                }
                Err(_) => {
                    summary.stop = StopReason::Halted;
                    break;
                }
            }
        }
        summary
    }

    /// Apply queued key events, then run one tick's worth of cycles
    pub fn tick(&mut self) -> RunSummary {
        self.drain_key_events();
        self.run(self.config.cycles_per_tick())
    }

    /// Write a program image into memory without involving the CPU
    pub fn load_program(&mut self, image: &ProgramImage) -> Result<LoadReport, Et3400Error> {
        loader::load(&mut self.cpu.memory, image)
    }

    /// Point the CPU at `addr`, waking it if halted or waiting
    pub fn set_pc(&mut self, addr: u16) {
        self.cpu.pc = addr;
        self.cpu.set_state(ExecState::Running);
    }

    /// Raise IRQ. Returns false when off or masked by I.
    pub fn irq(&mut self) -> bool {
        self.is_powered() && self.cpu.irq()
    }

    /// Raise NMI. Ignored while off.
    pub fn nmi(&mut self) {
        if self.is_powered() {
            self.cpu.nmi();
        }
    }

    pub fn display(&self) -> DisplaySnapshot {
        self.cpu.memory.display.snapshot()
    }

    /// Receive a snapshot now and every digit change after it
    pub fn subscribe_display(&mut self) -> Receiver<DisplayEvent> {
        self.cpu.memory.display.subscribe()
    }

    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }

    pub fn cpu_state(&self) -> ExecState {
        self.cpu.state()
    }

    pub fn cycles(&self) -> u64 {
        self.cpu.cycles
    }

    /// Read a byte through the address map without side effects
    pub fn peek(&self, addr: u16) -> u8 {
        use cpu_6800::Memory6800;
        self.cpu.memory.read(addr)
    }

    pub fn disassemble(&self, addr: u16) -> (String, u16) {
        cpu_6800::disassemble(&self.cpu.memory, addr)
    }

    pub fn last_fault(&self) -> Option<&Fault> {
        self.last_fault.as_ref()
    }

    /// Writes and clears the monitor ROM has refused
    pub fn rom_rejected_writes(&self) -> u64 {
        self.cpu.memory.rom.rejected_writes()
    }

    fn invalid_state(msg: &str) -> serde_json::Error {
        <serde_json::Error as serde::de::Error>::custom(msg)
    }
}

impl System for Et3400System {
    type Error = Et3400Error;

    fn reset(&mut self) {
        Et3400System::reset(self);
    }

    fn run_tick(&mut self) -> Result<RunSummary, Self::Error> {
        Ok(self.tick())
    }

    fn save_state(&self) -> Value {
        let bus = &self.cpu.memory;
        serde_json::json!({
            "version": STATE_VERSION,
            "system": SYSTEM_TAG,
            "power": self.power,
            "cpu": CpuState {
                registers: self.cpu.registers(),
                state: self.cpu.state(),
                cycles: self.cpu.cycles,
            },
            "ram": bus.ram.as_slice(),
            "display": bus.display.snapshot(),
            "keypad": bus.keypad,
        })
    }

    fn load_state(&mut self, v: &Value) -> Result<(), serde_json::Error> {
        if v["version"].as_u64() != Some(STATE_VERSION) {
            return Err(Self::invalid_state("unsupported save state version"));
        }
        if v["system"].as_str() != Some(SYSTEM_TAG) {
            return Err(Self::invalid_state("save state is not for the ET-3400"));
        }

        let power: PowerState = serde_json::from_value(v["power"].clone())?;
        let cpu: CpuState = serde_json::from_value(v["cpu"].clone())?;
        let ram: Vec<u8> = serde_json::from_value(v["ram"].clone())?;
        let display: DisplaySnapshot = serde_json::from_value(v["display"].clone())?;
        let mut keypad: keypad::Keypad = serde_json::from_value(v["keypad"].clone())?;
        if ram.len() != RAM_SIZE {
            return Err(Self::invalid_state("save state RAM size mismatch"));
        }

        keypad.set_policy(self.config.key_policy);
        keypad.dedup_held();
        let bus = &mut self.cpu.memory;
        bus.ram
            .load(0, &ram)
            .map_err(|e| Self::invalid_state(&e.to_string()))?;
        bus.keypad = keypad;
        bus.display.restore(display);
        self.cpu.set_registers(&cpu.registers);
        self.cpu.set_state(cpu.state);
        self.cpu.cycles = cpu.cycles;
        self.power = power;
        self.key_queue.clear();
        log(LogCategory::Power, LogLevel::Info, || {
            format!("state loaded, PC={:04X}", self.cpu.pc)
        });
        Ok(())
    }

    fn supports_save_states(&self) -> bool {
        true
    }

    fn mount_points(&self) -> Vec<MountPointInfo> {
        vec![MountPointInfo {
            id: MONITOR_MOUNT.to_string(),
            name: "Monitor ROM".to_string(),
            extensions: vec!["bin".to_string(), "rom".to_string()],
            required: true,
        }]
    }

    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error> {
        if mount_point_id != MONITOR_MOUNT {
            return Err(Et3400Error::InvalidMountPoint(mount_point_id.to_string()));
        }
        self.power_off();
        self.cpu.memory.load_rom(data);
        self.monitor_mounted = true;
        log(LogCategory::Memory, LogLevel::Info, || {
            format!("monitor ROM mounted ({} bytes)", data.len())
        });
        Ok(())
    }

    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error> {
        if mount_point_id != MONITOR_MOUNT {
            return Err(Et3400Error::InvalidMountPoint(mount_point_id.to_string()));
        }
        self.power_off();
        self.cpu.memory.load_rom(&[]);
        self.monitor_mounted = false;
        Ok(())
    }

    fn is_mounted(&self, mount_point_id: &str) -> bool {
        mount_point_id == MONITOR_MOUNT && self.monitor_mounted
    }
}
