//! Mnemonic formatting for the recognized instruction set.
//!
//! Used by the commit trace and the CLI listing; anything the decoder does
//! not recognize prints as a raw word.

use crate::isa::decode::{funct3, funct7, imm_b, imm_i, imm_j, imm_s, imm_u, opcode, rd, rs1, rs2};
use crate::isa::opcodes::{self, arith, branch, load, store, system};

/// Formats one instruction word as assembly text.
pub fn disassemble(word: u32) -> String {
    let (rd, rs1, rs2) = (rd(word), rs1(word), rs2(word));
    match opcode(word) {
        opcodes::OP_LUI => format!("lui x{rd}, {:#x}", (imm_u(word) as u32) >> 12),
        opcodes::OP_AUIPC => format!("auipc x{rd}, {:#x}", (imm_u(word) as u32) >> 12),
        opcodes::OP_JAL => format!("jal x{rd}, {}", imm_j(word)),
        opcodes::OP_JALR if funct3(word) == 0 => {
            format!("jalr x{rd}, {}(x{rs1})", imm_i(word))
        }
        opcodes::OP_BRANCH => {
            let mn = match funct3(word) {
                branch::BEQ => "beq",
                branch::BNE => "bne",
                branch::BLT => "blt",
                branch::BGE => "bge",
                branch::BLTU => "bltu",
                branch::BGEU => "bgeu",
                _ => return unknown(word),
            };
            format!("{mn} x{rs1}, x{rs2}, {}", imm_b(word))
        }
        opcodes::OP_LOAD => {
            let mn = match funct3(word) {
                load::LB => "lb",
                load::LH => "lh",
                load::LW => "lw",
                load::LBU => "lbu",
                load::LHU => "lhu",
                _ => return unknown(word),
            };
            format!("{mn} x{rd}, {}(x{rs1})", imm_i(word))
        }
        opcodes::OP_STORE if funct3(word) == store::SW => {
            format!("sw x{rs2}, {}(x{rs1})", imm_s(word))
        }
        opcodes::OP_IMM => {
            let imm = imm_i(word);
            match funct3(word) {
                arith::ADD_SUB => format!("addi x{rd}, x{rs1}, {imm}"),
                arith::XOR => format!("xori x{rd}, x{rs1}, {imm}"),
                arith::OR => format!("ori x{rd}, x{rs1}, {imm}"),
                arith::AND => format!("andi x{rd}, x{rs1}, {imm}"),
                arith::SLL if funct7(word) == opcodes::funct7::BASE => {
                    format!("slli x{rd}, x{rs1}, {rs2}")
                }
                arith::SR if funct7(word) == opcodes::funct7::BASE => {
                    format!("srli x{rd}, x{rs1}, {rs2}")
                }
                arith::SR if funct7(word) == opcodes::funct7::ALT => {
                    format!("srai x{rd}, x{rs1}, {rs2}")
                }
                _ => unknown(word),
            }
        }
        opcodes::OP_REG => {
            let mn = match (funct3(word), funct7(word)) {
                (arith::ADD_SUB, opcodes::funct7::BASE) => "add",
                (arith::ADD_SUB, opcodes::funct7::ALT) => "sub",
                (arith::SLL, opcodes::funct7::BASE) => "sll",
                (arith::SLT, opcodes::funct7::BASE) => "slt",
                (arith::SLTU, opcodes::funct7::BASE) => "sltu",
                (arith::XOR, opcodes::funct7::BASE) => "xor",
                (arith::SR, opcodes::funct7::BASE) => "srl",
                (arith::SR, opcodes::funct7::ALT) => "sra",
                (arith::OR, opcodes::funct7::BASE) => "or",
                (arith::AND, opcodes::funct7::BASE) => "and",
                _ => return unknown(word),
            };
            format!("{mn} x{rd}, x{rs1}, x{rs2}")
        }
        opcodes::OP_MISC_MEM if funct3(word) == 0 => "fence".to_string(),
        opcodes::OP_SYSTEM => match word {
            opcodes::ECALL => "ecall".to_string(),
            opcodes::EBREAK => "ebreak".to_string(),
            opcodes::MRET => "mret".to_string(),
            _ => match funct3(word) {
                system::CSRRW => format!("csrrw x{rd}, {:#x}, x{rs1}", imm_i(word) & 0xfff),
                system::CSRRS => format!("csrrs x{rd}, {:#x}, x{rs1}", imm_i(word) & 0xfff),
                system::CSRRWI => format!("csrrwi x{rd}, {:#x}, {rs1}", imm_i(word) & 0xfff),
                _ => unknown(word),
            },
        },
        _ => unknown(word),
    }
}

fn unknown(word: u32) -> String {
    format!("unknown {word:#010x}")
}
