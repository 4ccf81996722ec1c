//! RV32I instruction decoder.
//!
//! This module maps a raw 32-bit instruction word to the [`ControlSignals`]
//! bundle the pipeline consumes. It performs:
//! 1. **Field Extraction:** Register indices, function codes, and the
//!    sign-extended immediate of every format (R, I, S, B, U, J).
//! 2. **Classification:** ALU/branch/load/store/terminator control flags.
//! 3. **Miss Handling:** Unrecognized encodings are logged and marked as
//!    terminators so the machine halts instead of silently misexecuting.

use crate::core::pipeline::signals::{AluOp, ControlSignals, MemExt};
use crate::isa::opcodes::{self, arith, branch, load, store, system};
use tracing::warn;

/// Extracts the major opcode (bits 6:0).
pub(crate) const fn opcode(word: u32) -> u32 {
    word & 0x7f
}

/// Extracts the destination register index (bits 11:7).
pub(crate) const fn rd(word: u32) -> usize {
    ((word >> 7) & 0x1f) as usize
}

/// Extracts funct3 (bits 14:12).
pub(crate) const fn funct3(word: u32) -> u32 {
    (word >> 12) & 0x7
}

/// Extracts the first source register index (bits 19:15).
pub(crate) const fn rs1(word: u32) -> usize {
    ((word >> 15) & 0x1f) as usize
}

/// Extracts the second source register index (bits 24:20).
pub(crate) const fn rs2(word: u32) -> usize {
    ((word >> 20) & 0x1f) as usize
}

/// Extracts funct7 (bits 31:25).
pub(crate) const fn funct7(word: u32) -> u32 {
    word >> 25
}

/// I-type immediate: bits 31:20, sign-extended.
pub(crate) const fn imm_i(word: u32) -> i32 {
    (word as i32) >> 20
}

/// S-type immediate: bits 31:25 and 11:7, sign-extended.
pub(crate) const fn imm_s(word: u32) -> i32 {
    (((word & 0xfe00_0000) as i32) >> 20) | (((word >> 7) & 0x1f) as i32)
}

/// B-type immediate: a 13-bit even branch offset, sign-extended.
pub(crate) const fn imm_b(word: u32) -> i32 {
    (((word as i32) >> 31) << 12)
        | ((((word >> 7) & 0x1) << 11) as i32)
        | ((((word >> 25) & 0x3f) << 5) as i32)
        | ((((word >> 8) & 0xf) << 1) as i32)
}

/// U-type immediate: bits 31:12 already in place, low bits zero.
pub(crate) const fn imm_u(word: u32) -> i32 {
    (word & 0xffff_f000) as i32
}

/// J-type immediate: a 21-bit even jump offset, sign-extended.
pub(crate) const fn imm_j(word: u32) -> i32 {
    (((word as i32) >> 31) << 20)
        | ((((word >> 12) & 0xff) << 12) as i32)
        | ((((word >> 20) & 0x1) << 11) as i32)
        | ((((word >> 21) & 0x3ff) << 1) as i32)
}

/// Base bundle for an R-type instruction.
fn r_type(word: u32, alu: AluOp) -> ControlSignals {
    ControlSignals {
        rd: rd(word),
        rd_valid: true,
        rs1: rs1(word),
        rs1_valid: true,
        rs2: rs2(word),
        rs2_valid: true,
        alu,
        is_reg_write: true,
        ..ControlSignals::default()
    }
}

/// Base bundle for an I-type instruction.
fn i_type(word: u32, alu: AluOp) -> ControlSignals {
    ControlSignals {
        rd: rd(word),
        rd_valid: true,
        rs1: rs1(word),
        rs1_valid: true,
        imm: imm_i(word),
        imm_valid: true,
        alu,
        is_reg_write: true,
        ..ControlSignals::default()
    }
}

/// Bundle for SW, the only store the word-wide memory port carries.
fn s_type(word: u32) -> ControlSignals {
    ControlSignals {
        rs1: rs1(word),
        rs1_valid: true,
        rs2: rs2(word),
        rs2_valid: true,
        imm: imm_s(word),
        imm_valid: true,
        alu: AluOp::Add,
        is_memory_write: true,
        is_load_or_store: true,
        ..ControlSignals::default()
    }
}

/// Base bundle for a U-type instruction (LUI; AUIPC adds `is_pc_calc`).
fn u_type(word: u32) -> ControlSignals {
    ControlSignals {
        rd: rd(word),
        rd_valid: true,
        imm: imm_u(word),
        imm_valid: true,
        alu: AluOp::Add,
        is_reg_write: true,
        ..ControlSignals::default()
    }
}

/// Bundle for JAL: an always-taken PC-relative branch that links.
fn j_type(word: u32) -> ControlSignals {
    ControlSignals {
        rd: rd(word),
        rd_valid: true,
        imm: imm_j(word),
        imm_valid: true,
        alu: AluOp::Add,
        cond: AluOp::True,
        is_branch: true,
        is_offset_br: true,
        link_pc: true,
        is_reg_write: true,
        ..ControlSignals::default()
    }
}

/// Bundle for a conditional branch with the given comparison and polarity.
fn b_type(word: u32, cond: AluOp, flip: bool) -> ControlSignals {
    ControlSignals {
        rs1: rs1(word),
        rs1_valid: true,
        rs2: rs2(word),
        rs2_valid: true,
        imm: imm_b(word),
        imm_valid: true,
        alu: AluOp::Add,
        cond,
        flip,
        is_branch: true,
        is_offset_br: true,
        ..ControlSignals::default()
    }
}

/// Bundle for an encoding the machine does not implement.
///
/// The entry is forced into a terminator so the halt surfaces at commit
/// rather than letting wrong results propagate.
fn unsupported(word: u32) -> ControlSignals {
    warn!(
        "unsupported instruction {:#010x} (opcode {:#09b}, funct3 {:#05b}, funct7 {:#09b})",
        word,
        opcode(word),
        funct3(word),
        funct7(word)
    );
    ControlSignals {
        alu: AluOp::None,
        cond: AluOp::True,
        is_final: true,
        ..ControlSignals::default()
    }
}

/// Decodes one instruction word into its control bundle.
pub fn decode(word: u32) -> ControlSignals {
    match opcode(word) {
        opcodes::OP_LUI => u_type(word),
        opcodes::OP_AUIPC => ControlSignals {
            is_pc_calc: true,
            ..u_type(word)
        },
        opcodes::OP_JAL => j_type(word),
        opcodes::OP_JALR if funct3(word) == 0 => ControlSignals {
            cond: AluOp::True,
            is_branch: true,
            is_jalr: true,
            link_pc: true,
            ..i_type(word, AluOp::Add)
        },
        opcodes::OP_BRANCH => match funct3(word) {
            branch::BEQ => b_type(word, AluOp::CmpEq, false),
            branch::BNE => b_type(word, AluOp::CmpEq, true),
            branch::BLT => b_type(word, AluOp::CmpLt, false),
            branch::BGE => b_type(word, AluOp::CmpLt, true),
            branch::BLTU => b_type(word, AluOp::CmpLtu, false),
            branch::BGEU => b_type(word, AluOp::CmpLtu, true),
            _ => unsupported(word),
        },
        opcodes::OP_LOAD => {
            let ext = match funct3(word) {
                load::LB => MemExt::Byte,
                load::LH => MemExt::Half,
                load::LW => MemExt::Word,
                load::LBU => MemExt::ByteUnsigned,
                load::LHU => MemExt::HalfUnsigned,
                _ => return unsupported(word),
            };
            ControlSignals {
                is_load: true,
                is_load_or_store: true,
                mem_ext: ext,
                ..i_type(word, AluOp::Add)
            }
        }
        opcodes::OP_STORE if funct3(word) == store::SW => s_type(word),
        opcodes::OP_IMM => match funct3(word) {
            arith::ADD_SUB => i_type(word, AluOp::Add),
            arith::XOR => i_type(word, AluOp::Xor),
            arith::OR => i_type(word, AluOp::Ori),
            arith::AND => i_type(word, AluOp::And),
            arith::SLL if funct7(word) == opcodes::funct7::BASE => i_type(word, AluOp::Sll),
            arith::SR if funct7(word) == opcodes::funct7::BASE => i_type(word, AluOp::SraU),
            arith::SR if funct7(word) == opcodes::funct7::ALT => i_type(word, AluOp::Sra),
            _ => unsupported(word),
        },
        opcodes::OP_REG => match (funct3(word), funct7(word)) {
            (arith::ADD_SUB, opcodes::funct7::BASE) => r_type(word, AluOp::Add),
            (arith::ADD_SUB, opcodes::funct7::ALT) => r_type(word, AluOp::Sub),
            (arith::SLL, opcodes::funct7::BASE) => r_type(word, AluOp::Sll),
            (arith::SLT, opcodes::funct7::BASE) => r_type(word, AluOp::CmpLt),
            (arith::SLTU, opcodes::funct7::BASE) => r_type(word, AluOp::CmpLtu),
            (arith::XOR, opcodes::funct7::BASE) => r_type(word, AluOp::Xor),
            (arith::SR, opcodes::funct7::BASE) => r_type(word, AluOp::SraU),
            (arith::SR, opcodes::funct7::ALT) => r_type(word, AluOp::Sra),
            (arith::OR, opcodes::funct7::BASE) => r_type(word, AluOp::Or),
            (arith::AND, opcodes::funct7::BASE) => r_type(word, AluOp::And),
            _ => unsupported(word),
        },
        // FENCE: a single hart with in-order memory commit has nothing to order.
        opcodes::OP_MISC_MEM if funct3(word) == 0 => i_type(word, AluOp::Add),
        opcodes::OP_SYSTEM => match funct3(word) {
            system::PRIV => match word {
                opcodes::ECALL | opcodes::EBREAK => ControlSignals {
                    cond: AluOp::True,
                    is_final: true,
                    ..i_type(word, AluOp::None)
                },
                opcodes::MRET => ControlSignals {
                    csr_read: true,
                    is_mepc: true,
                    ..r_type(word, AluOp::Add)
                },
                _ => unsupported(word),
            },
            system::CSRRW => ControlSignals {
                csr_write: true,
                ..i_type(word, AluOp::Add)
            },
            system::CSRRS => ControlSignals {
                csr_read: true,
                csr_calculate: true,
                ..i_type(word, AluOp::Or)
            },
            system::CSRRWI => ControlSignals {
                csr_write: true,
                is_zimm: true,
                ..i_type(word, AluOp::Add)
            },
            _ => unsupported(word),
        },
        _ => unsupported(word),
    }
}
