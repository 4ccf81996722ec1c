//! Shared test infrastructure: RV32I instruction encoders and a harness
//! that loads a program, runs it to completion, and hands back the
//! simulator for inspection.

use tomasulo_core::{Config, ExitReason, Simulator};

/// Instruction encoders for the opcodes the machine implements.
///
/// Offsets are byte offsets relative to the instruction's own PC, exactly
/// as the ISA encodes them.
pub mod asm {
    fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
        opcode | (rd << 7) | (funct3 << 12) | (rs1 << 15) | (rs2 << 20) | (funct7 << 25)
    }

    fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
        opcode | (rd << 7) | (funct3 << 12) | (rs1 << 15) | ((imm as u32) << 20)
    }

    fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
        let imm = imm as u32;
        opcode
            | ((imm & 0x1f) << 7)
            | (funct3 << 12)
            | (rs1 << 15)
            | (rs2 << 20)
            | ((imm >> 5) << 25)
    }

    fn b_type(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
        let imm = imm as u32;
        0b1100011
            | (((imm >> 11) & 1) << 7)
            | (((imm >> 1) & 0xf) << 8)
            | (funct3 << 12)
            | (rs1 << 15)
            | (rs2 << 20)
            | (((imm >> 5) & 0x3f) << 25)
            | (((imm >> 12) & 1) << 31)
    }

    /// `addi rd, rs1, imm`
    pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0b0010011, rd, 0b000, rs1, imm)
    }

    /// `xori rd, rs1, imm`
    pub fn xori(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0b0010011, rd, 0b100, rs1, imm)
    }

    /// `add rd, rs1, rs2`
    pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0b0110011, rd, 0b000, rs1, rs2, 0)
    }

    /// `sub rd, rs1, rs2`
    pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0b0110011, rd, 0b000, rs1, rs2, 0b0100000)
    }

    /// `slt rd, rs1, rs2`
    pub fn slt(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0b0110011, rd, 0b010, rs1, rs2, 0)
    }

    /// `sltu rd, rs1, rs2`
    pub fn sltu(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0b0110011, rd, 0b011, rs1, rs2, 0)
    }

    /// `sll rd, rs1, rs2`
    pub fn sll(rd: u32, rs1: u32, rs2: u32) -> u32 {
        r_type(0b0110011, rd, 0b001, rs1, rs2, 0)
    }

    /// `lw rd, imm(rs1)`
    pub fn lw(rd: u32, imm: i32, rs1: u32) -> u32 {
        i_type(0b0000011, rd, 0b010, rs1, imm)
    }

    /// `lb rd, imm(rs1)`
    pub fn lb(rd: u32, imm: i32, rs1: u32) -> u32 {
        i_type(0b0000011, rd, 0b000, rs1, imm)
    }

    /// `lbu rd, imm(rs1)`
    pub fn lbu(rd: u32, imm: i32, rs1: u32) -> u32 {
        i_type(0b0000011, rd, 0b100, rs1, imm)
    }

    /// `lh rd, imm(rs1)`
    pub fn lh(rd: u32, imm: i32, rs1: u32) -> u32 {
        i_type(0b0000011, rd, 0b001, rs1, imm)
    }

    /// `lhu rd, imm(rs1)`
    pub fn lhu(rd: u32, imm: i32, rs1: u32) -> u32 {
        i_type(0b0000011, rd, 0b101, rs1, imm)
    }

    /// `sw rs2, imm(rs1)`
    pub fn sw(rs2: u32, imm: i32, rs1: u32) -> u32 {
        s_type(0b0100011, 0b010, rs1, rs2, imm)
    }

    /// `beq rs1, rs2, offset`
    pub fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
        b_type(0b000, rs1, rs2, offset)
    }

    /// `bne rs1, rs2, offset`
    pub fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
        b_type(0b001, rs1, rs2, offset)
    }

    /// `blt rs1, rs2, offset`
    pub fn blt(rs1: u32, rs2: u32, offset: i32) -> u32 {
        b_type(0b100, rs1, rs2, offset)
    }

    /// `bge rs1, rs2, offset`
    pub fn bge(rs1: u32, rs2: u32, offset: i32) -> u32 {
        b_type(0b101, rs1, rs2, offset)
    }

    /// `jal rd, offset`
    pub fn jal(rd: u32, offset: i32) -> u32 {
        let imm = offset as u32;
        0b1101111
            | (rd << 7)
            | (((imm >> 12) & 0xff) << 12)
            | (((imm >> 11) & 1) << 20)
            | (((imm >> 1) & 0x3ff) << 21)
            | (((imm >> 20) & 1) << 31)
    }

    /// `jalr rd, imm(rs1)`
    pub fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
        i_type(0b1100111, rd, 0b000, rs1, imm)
    }

    /// `lui rd, imm20`
    pub fn lui(rd: u32, imm20: u32) -> u32 {
        0b0110111 | (rd << 7) | (imm20 << 12)
    }

    /// `auipc rd, imm20`
    pub fn auipc(rd: u32, imm20: u32) -> u32 {
        0b0010111 | (rd << 7) | (imm20 << 12)
    }

    /// `ebreak`
    pub fn ebreak() -> u32 {
        0x0010_0073
    }
}

/// A simulator with the program and data images loaded, not yet run.
///
/// `RUST_LOG=tomasulo_core=trace cargo test <name>` traces the run.
pub fn sim_with(program: &[u32], data: &[u32]) -> Simulator {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let config = Config::default();
    let mut sim = Simulator::new(&config);
    sim.load_program(program);
    sim.load_data(data);
    sim
}

/// Runs a program to completion and asserts it halted normally.
pub fn run_program(program: &[u32]) -> Simulator {
    run_with(program, &[], |_| {})
}

/// Runs a program against a data image, with a setup hook for preloading
/// architectural registers.
pub fn run_with(
    program: &[u32],
    data: &[u32],
    setup: impl FnOnce(&mut Simulator),
) -> Simulator {
    let mut sim = sim_with(program, data);
    setup(&mut sim);
    let reason = sim.run();
    assert_eq!(
        reason,
        ExitReason::Halted,
        "program did not halt normally (after {} cycles)",
        sim.stats.cycles
    );
    sim
}
