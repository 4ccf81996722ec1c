//! RV32I opcode and function-code constants.

/// LUI (load upper immediate), U-type.
pub const OP_LUI: u32 = 0b0110111;
/// AUIPC (add upper immediate to PC), U-type.
pub const OP_AUIPC: u32 = 0b0010111;
/// JAL, J-type.
pub const OP_JAL: u32 = 0b1101111;
/// JALR, I-type.
pub const OP_JALR: u32 = 0b1100111;
/// Conditional branches, B-type.
pub const OP_BRANCH: u32 = 0b1100011;
/// Loads, I-type.
pub const OP_LOAD: u32 = 0b0000011;
/// Stores, S-type.
pub const OP_STORE: u32 = 0b0100011;
/// Integer register-immediate operations, I-type.
pub const OP_IMM: u32 = 0b0010011;
/// Integer register-register operations, R-type.
pub const OP_REG: u32 = 0b0110011;
/// FENCE, I-type.
pub const OP_MISC_MEM: u32 = 0b0001111;
/// SYSTEM (ECALL/EBREAK/CSR/MRET), I-type.
pub const OP_SYSTEM: u32 = 0b1110011;

/// funct3 values for `OP_BRANCH`.
pub mod branch {
    /// BEQ.
    pub const BEQ: u32 = 0b000;
    /// BNE.
    pub const BNE: u32 = 0b001;
    /// BLT.
    pub const BLT: u32 = 0b100;
    /// BGE.
    pub const BGE: u32 = 0b101;
    /// BLTU.
    pub const BLTU: u32 = 0b110;
    /// BGEU.
    pub const BGEU: u32 = 0b111;
}

/// funct3 values for `OP_LOAD`.
pub mod load {
    /// LB.
    pub const LB: u32 = 0b000;
    /// LH.
    pub const LH: u32 = 0b001;
    /// LW.
    pub const LW: u32 = 0b010;
    /// LBU.
    pub const LBU: u32 = 0b100;
    /// LHU.
    pub const LHU: u32 = 0b101;
}

/// funct3 values for `OP_STORE`.
pub mod store {
    /// SW (the only store width the word-wide memory port supports).
    pub const SW: u32 = 0b010;
}

/// funct3 values shared by `OP_IMM` and `OP_REG`.
pub mod arith {
    /// ADD/SUB/ADDI.
    pub const ADD_SUB: u32 = 0b000;
    /// SLL/SLLI.
    pub const SLL: u32 = 0b001;
    /// SLT.
    pub const SLT: u32 = 0b010;
    /// SLTU.
    pub const SLTU: u32 = 0b011;
    /// XOR/XORI.
    pub const XOR: u32 = 0b100;
    /// SRL/SRA and their immediate forms.
    pub const SR: u32 = 0b101;
    /// OR/ORI.
    pub const OR: u32 = 0b110;
    /// AND/ANDI.
    pub const AND: u32 = 0b111;
}

/// funct7 values distinguishing R-type and shift-immediate variants.
pub mod funct7 {
    /// Base variant (ADD, SRL, ...).
    pub const BASE: u32 = 0b0000000;
    /// Alternate variant (SUB, SRA, ...).
    pub const ALT: u32 = 0b0100000;
}

/// funct3 values for `OP_SYSTEM`.
pub mod system {
    /// ECALL/EBREAK/MRET (distinguished by the immediate field).
    pub const PRIV: u32 = 0b000;
    /// CSRRW.
    pub const CSRRW: u32 = 0b001;
    /// CSRRS.
    pub const CSRRS: u32 = 0b010;
    /// CSRRWI.
    pub const CSRRWI: u32 = 0b101;
}

/// Full encoding of ECALL.
pub const ECALL: u32 = 0x0000_0073;
/// Full encoding of EBREAK.
pub const EBREAK: u32 = 0x0010_0073;
/// Full encoding of MRET.
pub const MRET: u32 = 0x3020_0073;
