//! Property tests: ALU semantics against reference arithmetic, ROB ring
//! integrity under random traffic, and straight-line programs against a
//! sequential reference interpreter.

use crate::common::{asm, run_program};
use proptest::prelude::*;
use tomasulo_core::core::pipeline::latches::AluRequest;
use tomasulo_core::core::pipeline::rob::{Rob, RobIndex};
use tomasulo_core::core::pipeline::signals::{AluOp, ControlSignals};
use tomasulo_core::core::units::alu::Alu;

fn request(op: AluOp, a: u32, b: u32) -> AluRequest {
    AluRequest {
        rob_index: RobIndex(0),
        a,
        b,
        alu_a: a,
        alu_b: b,
        op,
        cond: AluOp::Add,
        flip: false,
        is_branch: false,
        is_jalr: false,
        link_pc: false,
        pc: 0,
    }
}

proptest! {
    #[test]
    fn prop_add_sub_match_wrapping_reference(a: u32, b: u32) {
        prop_assert_eq!(Alu::execute(&request(AluOp::Add, a, b)).result, a.wrapping_add(b));
        prop_assert_eq!(Alu::execute(&request(AluOp::Sub, a, b)).result, a.wrapping_sub(b));
    }

    #[test]
    fn prop_compares_match_widened_reference(a: u32, b: u32) {
        let signed = i64::from(a as i32) < i64::from(b as i32);
        let unsigned = u64::from(a) < u64::from(b);
        prop_assert_eq!(Alu::execute(&request(AluOp::CmpLt, a, b)).result, u32::from(signed));
        prop_assert_eq!(Alu::execute(&request(AluOp::CmpLtu, a, b)).result, u32::from(unsigned));
        prop_assert_eq!(Alu::execute(&request(AluOp::CmpEq, a, b)).result, u32::from(a == b));
    }

    #[test]
    fn prop_shifts_use_low_five_bits(a: u32, sh in 0u32..64) {
        let masked = sh & 0x1f;
        prop_assert_eq!(Alu::execute(&request(AluOp::Sll, a, sh)).result, a << masked);
        prop_assert_eq!(Alu::execute(&request(AluOp::SraU, a, sh)).result, a >> masked);
        prop_assert_eq!(
            Alu::execute(&request(AluOp::Sra, a, sh)).result,
            ((a as i32) >> masked) as u32
        );
    }

    #[test]
    fn prop_rob_ring_stays_consistent(ops in proptest::collection::vec(any::<bool>(), 1..200)) {
        let mut rob = Rob::new(8);
        let mut expected_len = 0usize;
        for allocate in ops {
            if allocate {
                if let Some(idx) = rob.allocate(0x100, false, ControlSignals::default()) {
                    // Complete immediately so commits can always drain.
                    rob.writeback_alu(&tomasulo_core::core::pipeline::latches::AluResult {
                        rob_index: idx,
                        result: 0,
                        new_pc: 0x104,
                    });
                    expected_len += 1;
                }
            } else if rob.take_committable().is_some() {
                expected_len -= 1;
            }
            prop_assert_eq!(rob.len(), expected_len);
            prop_assert!(rob.len() <= rob.capacity());
            prop_assert!(rob.head_index() < rob.capacity());
            prop_assert!(rob.tail_index() < rob.capacity());
        }
    }

    #[test]
    fn prop_straight_line_addi_matches_sequential_reference(
        ops in proptest::collection::vec((1usize..8, 0usize..8, -100i32..100), 1..15)
    ) {
        let mut program: Vec<u32> = ops
            .iter()
            .map(|&(rd, rs1, imm)| asm::addi(rd as u32, rs1 as u32, imm))
            .collect();
        program.push(asm::ebreak());

        let mut reference = [0i64; 8];
        for &(rd, rs1, imm) in &ops {
            reference[rd] = (reference[rs1] + i64::from(imm)) as u32 as i64;
        }

        let sim = run_program(&program);
        for (reg, &value) in reference.iter().enumerate().skip(1) {
            prop_assert_eq!(u64::from(sim.reg(reg)), value as u64, "x{}", reg);
        }
    }
}
