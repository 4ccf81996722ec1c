//! Arithmetic Logic Unit.
//!
//! The single compute unit shared by the reservation station. It is
//! stateless: every cycle the issued request is evaluated combinationally
//! and the result is registered onto the ALU→ROB bus by the pipeline.
//!
//! The hardware computes all operations into a parallel array and one-hot
//! selects the result; here the selector is evaluated twice, once for the
//! data result and once for the branch condition, over the same table.
//! Comparisons always read the raw register operands `a`/`b` so branch
//! conditions see the registers even while the adder computes the
//! PC-relative target from the shaped operands.

use crate::core::pipeline::latches::{AluRequest, AluResult};
use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit for 32-bit integer operations.
pub struct Alu;

impl Alu {
    /// Evaluates one issued operation.
    ///
    /// Overrides applied on top of the selected result:
    /// - `is_jalr` remaps the first shaped operand back to raw rs1, so the
    ///   jump target is `rs1 + imm` instead of `pc + imm`.
    /// - `link_pc` replaces the data result with `pc + 4` after the branch
    ///   target has been captured (`jal`/`jalr` write the link address but
    ///   still redirect to the computed target).
    pub fn execute(req: &AluRequest) -> AluResult {
        let alu_a = if req.is_jalr { req.a } else { req.alu_a };
        let alu_b = req.alu_b;

        let select = |op: AluOp| -> u32 {
            match op {
                AluOp::Add => alu_a.wrapping_add(alu_b),
                AluOp::Sub => alu_a.wrapping_sub(alu_b),
                AluOp::Xor => alu_a ^ alu_b,
                AluOp::Or | AluOp::Ori => alu_a | alu_b,
                AluOp::And => alu_a & alu_b,
                AluOp::Sll => alu_a << (alu_b & 0x1f),
                AluOp::Srl | AluOp::SraU => alu_a >> (alu_b & 0x1f),
                AluOp::Sra => ((alu_a as i32) >> (alu_b & 0x1f)) as u32,
                AluOp::CmpEq => u32::from(req.a == req.b),
                AluOp::CmpLt => u32::from((req.a as i32) < (req.b as i32)),
                AluOp::CmpLtu => u32::from(req.a < req.b),
                AluOp::True => 1,
                AluOp::None => 0,
            }
        };

        let target = select(req.op);
        let result = if req.link_pc {
            req.pc.wrapping_add(4)
        } else {
            target
        };

        let condition = (select(req.cond) & 1) != 0;
        let taken = condition ^ req.flip;
        let new_pc = if req.is_branch && taken {
            target
        } else {
            req.pc.wrapping_add(4)
        };

        AluResult {
            rob_index: req.rob_index,
            result,
            new_pc,
        }
    }
}
