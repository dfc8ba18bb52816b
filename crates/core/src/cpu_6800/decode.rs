//! Opcode table for the Motorola 6800.
//!
//! The table is built at compile time from the regular structure of the opcode map:
//!
//! - `0x00-0x3F`: inherent register ops, branches, stack and interrupt ops
//! - `0x40-0x7F`: read-modify-write ops on A (`4x`), B (`5x`), indexed (`6x`), extended (`7x`)
//! - `0x80-0xFF`: accumulator ops; bit 6 picks A/B, bits 4-5 pick the addressing mode
//!
//! 197 of the 256 opcodes are defined; the rest decode to `None`.

/// Operand addressing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Inherent,
    /// 8-bit immediate operand
    Immediate,
    /// 16-bit immediate operand (CPX, LDS, LDX)
    Immediate16,
    /// 8-bit address in page zero
    Direct,
    /// Unsigned 8-bit offset added to X
    Indexed,
    /// Full 16-bit address
    Extended,
    /// Signed 8-bit offset from the next instruction
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode
    pub const fn operand_len(self) -> u16 {
        match self {
            AddressingMode::Inherent => 0,
            AddressingMode::Immediate16 | AddressingMode::Extended => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acc {
    A,
    B,
}

/// Destination of a read-modify-write op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rmw {
    A,
    B,
    Memory,
}

/// Branch conditions, in opcode order starting at 0x20
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Higher,
    LowerOrSame,
    CarryClear,
    CarrySet,
    NotEqual,
    Equal,
    OverflowClear,
    OverflowSet,
    Plus,
    Minus,
    GreaterOrEqual,
    Less,
    Greater,
    LessOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Nop,
    Tap,
    Tpa,
    Inx,
    Dex,
    Clv,
    Sev,
    Clc,
    Sec,
    Cli,
    Sei,
    Sba,
    Cba,
    Tab,
    Tba,
    Daa,
    Aba,
    Branch(Condition),
    Tsx,
    Ins,
    Pul(Acc),
    Des,
    Txs,
    Psh(Acc),
    Rts,
    Rti,
    Wai,
    Swi,
    Neg(Rmw),
    Com(Rmw),
    Lsr(Rmw),
    Ror(Rmw),
    Asr(Rmw),
    Asl(Rmw),
    Rol(Rmw),
    Dec(Rmw),
    Inc(Rmw),
    Tst(Rmw),
    Clr(Rmw),
    Jmp,
    Sub(Acc),
    Cmp(Acc),
    Sbc(Acc),
    And(Acc),
    Bit(Acc),
    Lda(Acc),
    Sta(Acc),
    Eor(Acc),
    Adc(Acc),
    Ora(Acc),
    Add(Acc),
    Cpx,
    Bsr,
    Jsr,
    Lds,
    Sts,
    Ldx,
    Stx,
}

/// One decoded opcode: what it does, how its operand is found, and what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub op: Op,
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub cycles: u8,
}

impl Instruction {
    /// Total encoded length in bytes
    pub const fn len(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

pub static OPCODE_TABLE: [Option<Instruction>; 256] = build_table();

/// Look up the instruction for an opcode byte
#[inline]
pub fn decode(opcode: u8) -> Option<Instruction> {
    OPCODE_TABLE[opcode as usize]
}

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = define(i as u8);
        i += 1;
    }
    table
}

const fn define(opcode: u8) -> Option<Instruction> {
    match opcode {
        0x00..=0x3F => low_page(opcode),
        0x40..=0x7F => read_modify_write(opcode),
        _ => accumulator_group(opcode),
    }
}

const fn low_page(opcode: u8) -> Option<Instruction> {
    use AddressingMode::{Inherent, Relative};
    use Condition::*;

    let (op, mnemonic, mode, cycles) = match opcode {
        0x01 => (Op::Nop, "NOP", Inherent, 2),
        0x06 => (Op::Tap, "TAP", Inherent, 2),
        0x07 => (Op::Tpa, "TPA", Inherent, 2),
        0x08 => (Op::Inx, "INX", Inherent, 4),
        0x09 => (Op::Dex, "DEX", Inherent, 4),
        0x0A => (Op::Clv, "CLV", Inherent, 2),
        0x0B => (Op::Sev, "SEV", Inherent, 2),
        0x0C => (Op::Clc, "CLC", Inherent, 2),
        0x0D => (Op::Sec, "SEC", Inherent, 2),
        0x0E => (Op::Cli, "CLI", Inherent, 2),
        0x0F => (Op::Sei, "SEI", Inherent, 2),
        0x10 => (Op::Sba, "SBA", Inherent, 2),
        0x11 => (Op::Cba, "CBA", Inherent, 2),
        0x16 => (Op::Tab, "TAB", Inherent, 2),
        0x17 => (Op::Tba, "TBA", Inherent, 2),
        0x19 => (Op::Daa, "DAA", Inherent, 2),
        0x1B => (Op::Aba, "ABA", Inherent, 2),
        0x20 => (Op::Branch(Always), "BRA", Relative, 4),
        0x22 => (Op::Branch(Higher), "BHI", Relative, 4),
        0x23 => (Op::Branch(LowerOrSame), "BLS", Relative, 4),
        0x24 => (Op::Branch(CarryClear), "BCC", Relative, 4),
        0x25 => (Op::Branch(CarrySet), "BCS", Relative, 4),
        0x26 => (Op::Branch(NotEqual), "BNE", Relative, 4),
        0x27 => (Op::Branch(Equal), "BEQ", Relative, 4),
        0x28 => (Op::Branch(OverflowClear), "BVC", Relative, 4),
        0x29 => (Op::Branch(OverflowSet), "BVS", Relative, 4),
        0x2A => (Op::Branch(Plus), "BPL", Relative, 4),
        0x2B => (Op::Branch(Minus), "BMI", Relative, 4),
        0x2C => (Op::Branch(GreaterOrEqual), "BGE", Relative, 4),
        0x2D => (Op::Branch(Less), "BLT", Relative, 4),
        0x2E => (Op::Branch(Greater), "BGT", Relative, 4),
        0x2F => (Op::Branch(LessOrEqual), "BLE", Relative, 4),
        0x30 => (Op::Tsx, "TSX", Inherent, 4),
        0x31 => (Op::Ins, "INS", Inherent, 4),
        0x32 => (Op::Pul(Acc::A), "PULA", Inherent, 4),
        0x33 => (Op::Pul(Acc::B), "PULB", Inherent, 4),
        0x34 => (Op::Des, "DES", Inherent, 4),
        0x35 => (Op::Txs, "TXS", Inherent, 4),
        0x36 => (Op::Psh(Acc::A), "PSHA", Inherent, 4),
        0x37 => (Op::Psh(Acc::B), "PSHB", Inherent, 4),
        0x39 => (Op::Rts, "RTS", Inherent, 5),
        0x3B => (Op::Rti, "RTI", Inherent, 10),
        0x3E => (Op::Wai, "WAI", Inherent, 9),
        0x3F => (Op::Swi, "SWI", Inherent, 12),
        _ => return None,
    };
    Some(Instruction {
        opcode,
        op,
        mnemonic,
        mode,
        cycles,
    })
}

/// Names indexed by low nibble, then by [A, B, memory]
const RMW_NAMES: [[&str; 3]; 16] = [
    ["NEGA", "NEGB", "NEG"],
    ["", "", ""],
    ["", "", ""],
    ["COMA", "COMB", "COM"],
    ["LSRA", "LSRB", "LSR"],
    ["", "", ""],
    ["RORA", "RORB", "ROR"],
    ["ASRA", "ASRB", "ASR"],
    ["ASLA", "ASLB", "ASL"],
    ["ROLA", "ROLB", "ROL"],
    ["DECA", "DECB", "DEC"],
    ["", "", ""],
    ["INCA", "INCB", "INC"],
    ["TSTA", "TSTB", "TST"],
    ["", "", "JMP"],
    ["CLRA", "CLRB", "CLR"],
];

const fn read_modify_write(opcode: u8) -> Option<Instruction> {
    use AddressingMode::{Extended, Indexed, Inherent};

    let (target, column, mode, cycles) = match opcode >> 4 {
        0x4 => (Rmw::A, 0, Inherent, 2),
        0x5 => (Rmw::B, 1, Inherent, 2),
        0x6 => (Rmw::Memory, 2, Indexed, 7),
        _ => (Rmw::Memory, 2, Extended, 6),
    };
    let nibble = (opcode & 0x0F) as usize;
    let op = match nibble {
        0x0 => Op::Neg(target),
        0x3 => Op::Com(target),
        0x4 => Op::Lsr(target),
        0x6 => Op::Ror(target),
        0x7 => Op::Asr(target),
        0x8 => Op::Asl(target),
        0x9 => Op::Rol(target),
        0xA => Op::Dec(target),
        0xC => Op::Inc(target),
        0xD => Op::Tst(target),
        0xE => match target {
            Rmw::Memory => Op::Jmp,
            _ => return None,
        },
        0xF => Op::Clr(target),
        _ => return None,
    };
    // JMP only spends cycles on address calculation
    let cycles = match op {
        Op::Jmp => cycles - 3,
        _ => cycles,
    };
    Some(Instruction {
        opcode,
        op,
        mnemonic: RMW_NAMES[nibble][column],
        mode,
        cycles,
    })
}

/// Names indexed by low nibble, then by [A side, B side]
const ACC_NAMES: [[&str; 2]; 16] = [
    ["SUBA", "SUBB"],
    ["CMPA", "CMPB"],
    ["SBCA", "SBCB"],
    ["", ""],
    ["ANDA", "ANDB"],
    ["BITA", "BITB"],
    ["LDAA", "LDAB"],
    ["STAA", "STAB"],
    ["EORA", "EORB"],
    ["ADCA", "ADCB"],
    ["ORAA", "ORAB"],
    ["ADDA", "ADDB"],
    ["CPX", ""],
    ["JSR", ""],
    ["LDS", "LDX"],
    ["STS", "STX"],
];

const fn accumulator_group(opcode: u8) -> Option<Instruction> {
    use AddressingMode::*;

    let b_side = opcode & 0x40 != 0;
    let acc = if b_side { Acc::B } else { Acc::A };
    let mode_bits = (opcode >> 4) & 0x03;
    let nibble = (opcode & 0x0F) as usize;

    let mode = match mode_bits {
        0 => Immediate,
        1 => Direct,
        2 => Indexed,
        _ => Extended,
    };
    // Cycle costs by addressing mode: [immediate, direct, indexed, extended]
    const READ8: [u8; 4] = [2, 3, 5, 4];
    const STORE8: [u8; 4] = [0, 4, 6, 5];
    const READ16: [u8; 4] = [3, 4, 6, 5];
    const STORE16: [u8; 4] = [0, 5, 7, 6];

    let (op, costs) = match nibble {
        0x0 => (Op::Sub(acc), READ8),
        0x1 => (Op::Cmp(acc), READ8),
        0x2 => (Op::Sbc(acc), READ8),
        0x4 => (Op::And(acc), READ8),
        0x5 => (Op::Bit(acc), READ8),
        0x6 => (Op::Lda(acc), READ8),
        0x7 => (Op::Sta(acc), STORE8),
        0x8 => (Op::Eor(acc), READ8),
        0x9 => (Op::Adc(acc), READ8),
        0xA => (Op::Ora(acc), READ8),
        0xB => (Op::Add(acc), READ8),
        0xC if !b_side => (Op::Cpx, READ16),
        0xD if !b_side => (Op::Jsr, [8, 0, 8, 9]),
        0xE => (if b_side { Op::Ldx } else { Op::Lds }, READ16),
        0xF => (if b_side { Op::Stx } else { Op::Sts }, STORE16),
        _ => return None,
    };

    let cycles = costs[mode_bits as usize];
    if cycles == 0 {
        // Stores have no immediate form; JSR has no direct form on the 6800
        return None;
    }

    let (op, mnemonic, mode) = match (op, mode) {
        // 0x8D sits in the JSR column but is the relative subroutine call
        (Op::Jsr, Immediate) => (Op::Bsr, "BSR", Relative),
        (Op::Cpx | Op::Lds | Op::Ldx, Immediate) => {
            (op, ACC_NAMES[nibble][b_side as usize], Immediate16)
        }
        _ => (op, ACC_NAMES[nibble][b_side as usize], mode),
    };

    Some(Instruction {
        opcode,
        op,
        mnemonic,
        mode,
        cycles,
    })
}
