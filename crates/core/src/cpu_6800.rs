//! Motorola 6800 CPU core implementation
//!
//! This module provides a reusable 6800 implementation that any system (ET-3400 trainer,
//! SWTPC 6800, etc.) can drive by implementing the `Memory6800` trait.
//!
//! Each `step()` runs one instruction in three phases:
//!
//! 1. **Fetch/decode**: the opcode byte at PC is looked up in [`decode::OPCODE_TABLE`].
//!    Undefined opcodes halt the CPU without touching any register.
//! 2. **Resolve**: the operand (immediate value, effective address or branch target) is
//!    computed from memory and registers without modifying either.
//! 3. **Execute**: PC is committed past the instruction, then the operation runs and
//!    updates only the flags it is documented to affect.
//!
//! The 6800 is big-endian: 16-bit values are stored high byte first.

pub mod decode;


use crate::logging::{log, LogCategory, LogLevel};
use decode::{Acc, AddressingMode, Condition, Instruction, Op, Rmw};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory interface trait for the 6800 CPU
///
/// The 6800 has no separate I/O space; peripherals are memory-mapped.
pub trait Memory6800 {
    /// Read a byte from memory at the given address
    fn read(&self, addr: u16) -> u8;

    /// Write a byte to memory at the given address
    fn write(&mut self, addr: u16, val: u8);
}

pub const IRQ_VECTOR: u16 = 0xFFF8;
pub const SWI_VECTOR: u16 = 0xFFFA;
pub const NMI_VECTOR: u16 = 0xFFFC;
pub const RESET_VECTOR: u16 = 0xFFFE;

// Condition code bits (11HINZVC)
pub const FLAG_H: u8 = 0x20;
pub const FLAG_I: u8 = 0x10;
pub const FLAG_N: u8 = 0x08;
pub const FLAG_Z: u8 = 0x04;
pub const FLAG_V: u8 = 0x02;
pub const FLAG_C: u8 = 0x01;
/// Bits 6 and 7 of the condition code register always read as 1
const CCR_FIXED: u8 = 0xC0;

/// Cycles taken to stack the machine state and fetch a vector for IRQ/NMI
const INTERRUPT_CYCLES: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("invalid opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    InvalidOpcode { opcode: u8, pc: u16 },
}

/// Whether the CPU is fetching instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecState {
    Running,
    /// Parked by WAI with the machine state already stacked
    Waiting,
    /// Stopped on an undefined opcode; only a reset resumes execution
    Halted,
}

/// Programmer-visible register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub x: u16,
    pub sp: u16,
    pub pc: u16,
    pub ccr: u8,
}

/// Operand produced by the resolve phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    None,
    Value(u8),
    Value16(u16),
    /// Effective address (direct, indexed, extended) or branch target (relative)
    Address(u16),
}

/// Motorola 6800 CPU state and execution engine
#[derive(Debug)]
pub struct Cpu6800<M: Memory6800> {
    /// Accumulator A
    pub a: u8,
    /// Accumulator B
    pub b: u8,
    /// Index register
    pub x: u16,
    /// Stack pointer (points at the next free byte)
    pub sp: u16,
    /// Program counter
    pub pc: u16,
    /// Condition codes (11HINZVC)
    pub ccr: u8,
    /// Total cycles executed
    pub cycles: u64,
    /// Memory interface
    pub memory: M,
    state: ExecState,
}

impl<M: Memory6800> Cpu6800<M> {
    /// Create a CPU with zeroed registers. PC is not loaded until `reset`.
    pub fn new(memory: M) -> Self {
        Self {
            a: 0,
            b: 0,
            x: 0,
            sp: 0,
            pc: 0,
            ccr: CCR_FIXED | FLAG_I,
            cycles: 0,
            memory,
            state: ExecState::Running,
        }
    }

    /// Hardware reset: mask interrupts and load PC from the reset vector.
    ///
    /// Like the real part, A, B, X and SP keep whatever they held.
    pub fn reset(&mut self) {
        self.ccr |= CCR_FIXED | FLAG_I;
        self.state = ExecState::Running;
        self.pc = self.read_u16(RESET_VECTOR);
        log(LogCategory::Cpu, LogLevel::Debug, || {
            format!("reset, PC={:04X}", self.pc)
        });
    }

    /// Reset with every register cleared first, as on power-up.
    pub fn power_on_reset(&mut self) {
        self.a = 0;
        self.b = 0;
        self.x = 0;
        self.sp = 0;
        self.ccr = CCR_FIXED;
        self.cycles = 0;
        self.reset();
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn set_state(&mut self, state: ExecState) {
        self.state = state;
    }

    pub fn is_halted(&self) -> bool {
        self.state == ExecState::Halted
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            b: self.b,
            x: self.x,
            sp: self.sp,
            pc: self.pc,
            ccr: self.ccr,
        }
    }

    pub fn set_registers(&mut self, regs: &Registers) {
        self.a = regs.a;
        self.b = regs.b;
        self.x = regs.x;
        self.sp = regs.sp;
        self.pc = regs.pc;
        self.ccr = regs.ccr | CCR_FIXED;
    }

    /// Check a single condition code bit
    pub fn flag(&self, flag: u8) -> bool {
        self.ccr & flag != 0
    }

    /// Execute one instruction and return cycles consumed.
    ///
    /// A halted CPU returns `Ok(0)`; a waiting CPU idles for one cycle.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        match self.state {
            ExecState::Halted => return Ok(0),
            ExecState::Waiting => {
                self.cycles += 1;
                return Ok(1);
            }
            ExecState::Running => {}
        }

        let opcode = self.memory.read(self.pc);
        let Some(instr) = decode::decode(opcode) else {
            self.state = ExecState::Halted;
            let pc = self.pc;
            log(LogCategory::Cpu, LogLevel::Error, || {
                format!("invalid opcode {:02X} at PC={:04X}, halting", opcode, pc)
            });
            return Err(CpuError::InvalidOpcode { opcode, pc });
        };

        let operand = self.resolve(&instr);
        self.pc = self.pc.wrapping_add(instr.len());
        self.execute(&instr, operand);

        let cycles = instr.cycles as u32;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Request a maskable interrupt. Returns false when masked by I.
    pub fn irq(&mut self) -> bool {
        if self.flag(FLAG_I) || self.is_halted() {
            return false;
        }
        self.interrupt(IRQ_VECTOR);
        true
    }

    /// Non-maskable interrupt
    pub fn nmi(&mut self) {
        if self.is_halted() {
            return;
        }
        self.interrupt(NMI_VECTOR);
    }

    fn interrupt(&mut self, vector: u16) {
        // WAI already stacked everything
        if self.state != ExecState::Waiting {
            self.push_machine_state();
        }
        self.state = ExecState::Running;
        self.ccr |= FLAG_I;
        self.pc = self.read_u16(vector);
        self.cycles += INTERRUPT_CYCLES as u64;
        log(LogCategory::Cpu, LogLevel::Debug, || {
            format!("interrupt via {:04X} to {:04X}", vector, self.pc)
        });
    }

    fn read_u16(&self, addr: u16) -> u16 {
        let hi = self.memory.read(addr) as u16;
        let lo = self.memory.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn write_u16(&mut self, addr: u16, val: u16) {
        self.memory.write(addr, (val >> 8) as u8);
        self.memory.write(addr.wrapping_add(1), val as u8);
    }

    /// Compute the operand for `instr` located at PC. Reads memory, mutates nothing.
    fn resolve(&self, instr: &Instruction) -> Operand {
        let arg = self.pc.wrapping_add(1);
        match instr.mode {
            AddressingMode::Inherent => Operand::None,
            AddressingMode::Immediate => Operand::Value(self.memory.read(arg)),
            AddressingMode::Immediate16 => Operand::Value16(self.read_u16(arg)),
            AddressingMode::Direct => Operand::Address(self.memory.read(arg) as u16),
            AddressingMode::Indexed => {
                Operand::Address(self.x.wrapping_add(self.memory.read(arg) as u16))
            }
            AddressingMode::Extended => Operand::Address(self.read_u16(arg)),
            AddressingMode::Relative => {
                let offset = self.memory.read(arg) as i8;
                let next = self.pc.wrapping_add(instr.len());
                Operand::Address(next.wrapping_add(offset as i16 as u16))
            }
        }
    }

    fn load8(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Value(v) => v,
            Operand::Address(addr) => self.memory.read(addr),
            Operand::Value16(v) => (v >> 8) as u8,
            Operand::None => 0,
        }
    }

    fn load16(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Value16(v) => v,
            Operand::Address(addr) => self.read_u16(addr),
            Operand::Value(v) => v as u16,
            Operand::None => 0,
        }
    }

    fn address(operand: Operand) -> u16 {
        match operand {
            Operand::Address(addr) => addr,
            _ => 0,
        }
    }

    fn acc(&self, acc: Acc) -> u8 {
        match acc {
            Acc::A => self.a,
            Acc::B => self.b,
        }
    }

    fn set_acc(&mut self, acc: Acc, val: u8) {
        match acc {
            Acc::A => self.a = val,
            Acc::B => self.b = val,
        }
    }

    // Stack: push stores then decrements, pull increments then loads
    fn push8(&mut self, val: u8) {
        self.memory.write(self.sp, val);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull8(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.memory.read(self.sp)
    }

    fn push16(&mut self, val: u16) {
        self.push8(val as u8);
        self.push8((val >> 8) as u8);
    }

    fn pull16(&mut self) -> u16 {
        let hi = self.pull8() as u16;
        let lo = self.pull8() as u16;
        (hi << 8) | lo
    }

    /// Stack PC, X, A, B, CCR (in that order, growing downwards)
    fn push_machine_state(&mut self) {
        self.push16(self.pc);
        self.push16(self.x);
        self.push8(self.a);
        self.push8(self.b);
        self.push8(self.ccr);
    }

    // Flag operations
    fn set_flag(&mut self, flag: u8, val: bool) {
        if val {
            self.ccr |= flag;
        } else {
            self.ccr &= !flag;
        }
    }

    fn set_nz(&mut self, val: u8) {
        self.set_flag(FLAG_N, val & 0x80 != 0);
        self.set_flag(FLAG_Z, val == 0);
    }

    fn set_nz16(&mut self, val: u16) {
        self.set_flag(FLAG_N, val & 0x8000 != 0);
        self.set_flag(FLAG_Z, val == 0);
    }

    /// N, Z set from the result; V cleared (loads, stores, logic ops)
    fn set_logic(&mut self, val: u8) {
        self.set_nz(val);
        self.set_flag(FLAG_V, false);
    }

    /// Shifts and rotates: V = N xor C after the operation
    fn set_shift(&mut self, result: u8, carry: bool) {
        self.set_flag(FLAG_C, carry);
        self.set_nz(result);
        self.set_flag(FLAG_V, (result & 0x80 != 0) != carry);
    }

    fn add8(&mut self, a: u8, m: u8, carry: bool) -> u8 {
        let c = carry as u8;
        let sum = a as u16 + m as u16 + c as u16;
        let r = sum as u8;
        self.set_flag(FLAG_H, (a & 0x0F) + (m & 0x0F) + c > 0x0F);
        self.set_flag(FLAG_V, (a ^ r) & (m ^ r) & 0x80 != 0);
        self.set_flag(FLAG_C, sum > 0xFF);
        self.set_nz(r);
        r
    }

    fn sub8(&mut self, a: u8, m: u8, borrow: bool) -> u8 {
        let c = borrow as u16;
        let r = (a as u16).wrapping_sub(m as u16).wrapping_sub(c) as u8;
        self.set_flag(FLAG_V, (a ^ m) & (a ^ r) & 0x80 != 0);
        self.set_flag(FLAG_C, m as u16 + c > a as u16);
        self.set_nz(r);
        r
    }

    fn read_rmw(&self, target: Rmw, operand: Operand) -> u8 {
        match target {
            Rmw::A => self.a,
            Rmw::B => self.b,
            Rmw::Memory => self.memory.read(Self::address(operand)),
        }
    }

    fn write_rmw(&mut self, target: Rmw, operand: Operand, val: u8) {
        match target {
            Rmw::A => self.a = val,
            Rmw::B => self.b = val,
            Rmw::Memory => self.memory.write(Self::address(operand), val),
        }
    }

    fn condition(&self, cond: Condition) -> bool {
        let n = self.flag(FLAG_N);
        let z = self.flag(FLAG_Z);
        let v = self.flag(FLAG_V);
        let c = self.flag(FLAG_C);
        match cond {
            Condition::Always => true,
            Condition::Higher => !(c || z),
            Condition::LowerOrSame => c || z,
            Condition::CarryClear => !c,
            Condition::CarrySet => c,
            Condition::NotEqual => !z,
            Condition::Equal => z,
            Condition::OverflowClear => !v,
            Condition::OverflowSet => v,
            Condition::Plus => !n,
            Condition::Minus => n,
            Condition::GreaterOrEqual => n == v,
            Condition::Less => n != v,
            Condition::Greater => !z && n == v,
            Condition::LessOrEqual => z || n != v,
        }
    }

    fn decimal_adjust(&mut self) {
        let a = self.a;
        let lsn = a & 0x0F;
        let msn = a >> 4;
        let mut correction = 0u8;
        if self.flag(FLAG_H) || lsn > 9 {
            correction |= 0x06;
        }
        if self.flag(FLAG_C) || msn > 9 || (msn > 8 && lsn > 9) {
            correction |= 0x60;
        }
        self.a = a.wrapping_add(correction);
        self.set_nz(self.a);
        // V is undefined after DAA; C is only ever set, never cleared
        self.set_flag(FLAG_V, false);
        if correction & 0x60 != 0 {
            self.ccr |= FLAG_C;
        }
    }

    fn execute(&mut self, instr: &Instruction, operand: Operand) {
        match instr.op {
            Op::Nop => {}
            Op::Tap => self.ccr = self.a | CCR_FIXED,
            Op::Tpa => self.a = self.ccr | CCR_FIXED,
            Op::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_flag(FLAG_Z, self.x == 0);
            }
            Op::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_flag(FLAG_Z, self.x == 0);
            }
            Op::Clv => self.set_flag(FLAG_V, false),
            Op::Sev => self.set_flag(FLAG_V, true),
            Op::Clc => self.set_flag(FLAG_C, false),
            Op::Sec => self.set_flag(FLAG_C, true),
            Op::Cli => self.set_flag(FLAG_I, false),
            Op::Sei => self.set_flag(FLAG_I, true),
            Op::Sba => self.a = self.sub8(self.a, self.b, false),
            Op::Cba => {
                self.sub8(self.a, self.b, false);
            }
            Op::Tab => {
                self.b = self.a;
                self.set_logic(self.b);
            }
            Op::Tba => {
                self.a = self.b;
                self.set_logic(self.a);
            }
            Op::Daa => self.decimal_adjust(),
            Op::Aba => self.a = self.add8(self.a, self.b, false),

            Op::Branch(cond) => {
                if self.condition(cond) {
                    self.pc = Self::address(operand);
                }
            }

            Op::Tsx => self.x = self.sp.wrapping_add(1),
            Op::Txs => self.sp = self.x.wrapping_sub(1),
            Op::Ins => self.sp = self.sp.wrapping_add(1),
            Op::Des => self.sp = self.sp.wrapping_sub(1),
            Op::Psh(acc) => self.push8(self.acc(acc)),
            Op::Pul(acc) => {
                let val = self.pull8();
                self.set_acc(acc, val);
            }
            Op::Rts => self.pc = self.pull16(),
            Op::Rti => {
                self.ccr = self.pull8() | CCR_FIXED;
                self.b = self.pull8();
                self.a = self.pull8();
                self.x = self.pull16();
                self.pc = self.pull16();
            }
            Op::Wai => {
                self.push_machine_state();
                self.state = ExecState::Waiting;
            }
            Op::Swi => {
                self.push_machine_state();
                self.ccr |= FLAG_I;
                self.pc = self.read_u16(SWI_VECTOR);
                log(LogCategory::Cpu, LogLevel::Debug, || {
                    format!("SWI to {:04X}", self.pc)
                });
            }

            Op::Neg(t) => {
                let m = self.read_rmw(t, operand);
                let r = self.sub8(0, m, false);
                self.write_rmw(t, operand, r);
            }
            Op::Com(t) => {
                let r = !self.read_rmw(t, operand);
                self.set_logic(r);
                self.set_flag(FLAG_C, true);
                self.write_rmw(t, operand, r);
            }
            Op::Lsr(t) => {
                let m = self.read_rmw(t, operand);
                let r = m >> 1;
                self.set_shift(r, m & 0x01 != 0);
                self.write_rmw(t, operand, r);
            }
            Op::Ror(t) => {
                let m = self.read_rmw(t, operand);
                let r = (m >> 1) | ((self.flag(FLAG_C) as u8) << 7);
                self.set_shift(r, m & 0x01 != 0);
                self.write_rmw(t, operand, r);
            }
            Op::Asr(t) => {
                let m = self.read_rmw(t, operand);
                let r = (m >> 1) | (m & 0x80);
                self.set_shift(r, m & 0x01 != 0);
                self.write_rmw(t, operand, r);
            }
            Op::Asl(t) => {
                let m = self.read_rmw(t, operand);
                let r = m << 1;
                self.set_shift(r, m & 0x80 != 0);
                self.write_rmw(t, operand, r);
            }
            Op::Rol(t) => {
                let m = self.read_rmw(t, operand);
                let r = (m << 1) | self.flag(FLAG_C) as u8;
                self.set_shift(r, m & 0x80 != 0);
                self.write_rmw(t, operand, r);
            }
            Op::Dec(t) => {
                let m = self.read_rmw(t, operand);
                let r = m.wrapping_sub(1);
                self.set_nz(r);
                self.set_flag(FLAG_V, m == 0x80);
                self.write_rmw(t, operand, r);
            }
            Op::Inc(t) => {
                let m = self.read_rmw(t, operand);
                let r = m.wrapping_add(1);
                self.set_nz(r);
                self.set_flag(FLAG_V, m == 0x7F);
                self.write_rmw(t, operand, r);
            }
            Op::Tst(t) => {
                let m = self.read_rmw(t, operand);
                self.set_logic(m);
                self.set_flag(FLAG_C, false);
            }
            Op::Clr(t) => {
                self.write_rmw(t, operand, 0);
                self.ccr = (self.ccr & !(FLAG_N | FLAG_V | FLAG_C)) | FLAG_Z;
            }
            Op::Jmp => self.pc = Self::address(operand),

            Op::Sub(acc) => {
                let r = self.sub8(self.acc(acc), self.load8(operand), false);
                self.set_acc(acc, r);
            }
            Op::Cmp(acc) => {
                self.sub8(self.acc(acc), self.load8(operand), false);
            }
            Op::Sbc(acc) => {
                let borrow = self.flag(FLAG_C);
                let r = self.sub8(self.acc(acc), self.load8(operand), borrow);
                self.set_acc(acc, r);
            }
            Op::And(acc) => {
                let r = self.acc(acc) & self.load8(operand);
                self.set_logic(r);
                self.set_acc(acc, r);
            }
            Op::Bit(acc) => {
                let r = self.acc(acc) & self.load8(operand);
                self.set_logic(r);
            }
            Op::Lda(acc) => {
                let r = self.load8(operand);
                self.set_logic(r);
                self.set_acc(acc, r);
            }
            Op::Sta(acc) => {
                let val = self.acc(acc);
                self.set_logic(val);
                self.memory.write(Self::address(operand), val);
            }
            Op::Eor(acc) => {
                let r = self.acc(acc) ^ self.load8(operand);
                self.set_logic(r);
                self.set_acc(acc, r);
            }
            Op::Adc(acc) => {
                let carry = self.flag(FLAG_C);
                let r = self.add8(self.acc(acc), self.load8(operand), carry);
                self.set_acc(acc, r);
            }
            Op::Ora(acc) => {
                let r = self.acc(acc) | self.load8(operand);
                self.set_logic(r);
                self.set_acc(acc, r);
            }
            Op::Add(acc) => {
                let r = self.add8(self.acc(acc), self.load8(operand), false);
                self.set_acc(acc, r);
            }

            Op::Cpx => {
                // N and V come from the high-byte subtraction only; C is unaffected
                let m = self.load16(operand);
                let (xh, mh) = ((self.x >> 8) as u8, (m >> 8) as u8);
                let rh = xh.wrapping_sub(mh);
                self.set_flag(FLAG_N, rh & 0x80 != 0);
                self.set_flag(FLAG_V, (xh ^ mh) & (xh ^ rh) & 0x80 != 0);
                self.set_flag(FLAG_Z, self.x == m);
            }
            Op::Bsr | Op::Jsr => {
                self.push16(self.pc);
                self.pc = Self::address(operand);
            }
            Op::Lds => {
                self.sp = self.load16(operand);
                self.set_nz16(self.sp);
                self.set_flag(FLAG_V, false);
            }
            Op::Ldx => {
                self.x = self.load16(operand);
                self.set_nz16(self.x);
                self.set_flag(FLAG_V, false);
            }
            Op::Sts => {
                self.write_u16(Self::address(operand), self.sp);
                self.set_nz16(self.sp);
                self.set_flag(FLAG_V, false);
            }
            Op::Stx => {
                self.write_u16(Self::address(operand), self.x);
                self.set_nz16(self.x);
                self.set_flag(FLAG_V, false);
            }
        }
    }
}

impl<M: Memory6800> crate::Cpu for Cpu6800<M> {
    type Error = CpuError;

    fn reset(&mut self) {
        self.reset();
    }

    fn step(&mut self) -> Result<u32, CpuError> {
        self.step()
    }
}

/// Disassemble the instruction at `addr`, returning its text and length in bytes.
///
/// Undefined opcodes come back as an `FCB` data byte of length 1.
pub fn disassemble<M: Memory6800 + ?Sized>(memory: &M, addr: u16) -> (String, u16) {
    let opcode = memory.read(addr);
    let Some(instr) = decode::decode(opcode) else {
        return (format!("FCB ${:02X}", opcode), 1);
    };
    let byte = |n: u16| memory.read(addr.wrapping_add(n));
    let word = || ((byte(1) as u16) << 8) | byte(2) as u16;

    let text = match instr.mode {
        AddressingMode::Inherent => instr.mnemonic.to_string(),
        AddressingMode::Immediate => format!("{} #${:02X}", instr.mnemonic, byte(1)),
        AddressingMode::Immediate16 => format!("{} #${:04X}", instr.mnemonic, word()),
        AddressingMode::Direct => format!("{} ${:02X}", instr.mnemonic, byte(1)),
        AddressingMode::Indexed => format!("{} ${:02X},X", instr.mnemonic, byte(1)),
        AddressingMode::Extended => format!("{} ${:04X}", instr.mnemonic, word()),
        AddressingMode::Relative => {
            let target = addr
                .wrapping_add(instr.len())
                .wrapping_add(byte(1) as i8 as i16 as u16);
            format!("{} ${:04X}", instr.mnemonic, target)
        }
    };
    (text, instr.len())
}

/// Simple array-based memory implementation for testing
#[derive(Debug)]
pub struct ArrayMemory {
    pub data: Vec<u8>,
}

impl ArrayMemory {
    pub fn new() -> Self {
        Self {
            data: vec![0; 0x10000],
        }
    }

    /// Load a program into memory and point the reset vector at it
    pub fn load_program(&mut self, offset: u16, program: &[u8]) {
        let off = offset as usize;
        self.data[off..off + program.len()].copy_from_slice(program);
        self.data[RESET_VECTOR as usize] = (offset >> 8) as u8;
        self.data[RESET_VECTOR as usize + 1] = offset as u8;
    }
}

impl Default for ArrayMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory6800 for ArrayMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, val: u8) {
        self.data[addr as usize] = val;
    }
}
