//! Registered buses between pipeline components.
//!
//! Every value here is written by one component during a cycle and observed
//! by its consumer on the following cycle, reproducing the one-cycle
//! visibility of the synchronous hardware. It defines:
//! 1. **Fetch latch:** The one-deep FIFO between fetch and decode.
//! 2. **Dispatch records:** Instruction + operand snapshots entering RS/LSQ.
//! 3. **Result buses:** ALU and LSQ writeback records consumed by the ROB.
//! 4. **Commit bus:** The (tag, value) broadcast that wakes waiting operands.

use crate::core::pipeline::rob::RobIndex;
use crate::core::pipeline::signals::{AluOp, ControlSignals, MemExt};

/// One fetched instruction waiting for decode.
///
/// The raw word travels separately on the icache output port; this latch
/// carries the PC it was fetched from and the direction the predictor chose.
#[derive(Clone, Copy, Debug)]
pub struct FetchedInst {
    /// PC the instruction was fetched from.
    pub pc: u32,
    /// Whether the predictor redirected fetch at this instruction.
    pub predicted_taken: bool,
}

/// One source operand captured at dispatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Operand {
    /// Architectural register index.
    pub reg: usize,
    /// Whether the instruction reads this operand at all.
    pub used: bool,
    /// Operand value; meaningful once `pending` is clear.
    pub value: u32,
    /// ROB index of the in-flight producer, if the value is not ready.
    pub pending: Option<RobIndex>,
}

impl Operand {
    /// An operand the instruction does not read; always resolved.
    pub fn unused() -> Self {
        Self::default()
    }

    /// True once the operand no longer waits on an in-flight producer.
    pub fn resolved(&self) -> bool {
        !self.used || self.pending.is_none()
    }

    /// Latches the broadcast value if this operand waits on the committing tag.
    pub fn snoop(&mut self, bus: &CommitBus) {
        if self.used && self.pending == Some(bus.tag) {
            self.value = bus.value;
            self.pending = None;
        }
    }
}

/// An instruction leaving allocation for the RS or the LSQ.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEntry {
    /// ROB index assigned at allocation.
    pub rob_index: RobIndex,
    /// PC of the instruction.
    pub pc: u32,
    /// Decoded control bundle.
    pub ctrl: ControlSignals,
    /// First source operand.
    pub rs1: Operand,
    /// Second source operand.
    pub rs2: Operand,
}

/// One operation issued from the RS to the ALU.
#[derive(Clone, Copy, Debug)]
pub struct AluRequest {
    /// ROB index of the owning instruction.
    pub rob_index: RobIndex,
    /// Raw rs1 value; comparisons and the jalr base read this.
    pub a: u32,
    /// Raw rs2 value.
    pub b: u32,
    /// Shaped first operand (PC for branches and `auipc`).
    pub alu_a: u32,
    /// Shaped second operand (immediate when one is present).
    pub alu_b: u32,
    /// Operation selector.
    pub op: AluOp,
    /// Branch-condition selector.
    pub cond: AluOp,
    /// Invert the selected condition.
    pub flip: bool,
    /// The instruction may redirect the PC.
    pub is_branch: bool,
    /// Register-indirect jump; the first operand reverts to raw rs1.
    pub is_jalr: bool,
    /// The data result is PC + 4 rather than the computed value.
    pub link_pc: bool,
    /// PC of the instruction.
    pub pc: u32,
}

/// ALU writeback record, registered on the ALU→ROB bus.
#[derive(Clone, Copy, Debug)]
pub struct AluResult {
    /// ROB index of the completing instruction.
    pub rob_index: RobIndex,
    /// Data result.
    pub result: u32,
    /// Resolved next PC (branch target or PC + 4).
    pub new_pc: u32,
}

/// LSQ writeback record; the load data arrives alongside on the dcache port.
#[derive(Clone, Copy, Debug)]
pub struct MemResult {
    /// ROB index of the completing memory operation.
    pub rob_index: RobIndex,
    /// PC + 4; memory operations never redirect.
    pub pc_result: u32,
    /// Whether a load result should be captured from the dcache output.
    pub is_load: bool,
    /// Extension applied to the fetched word.
    pub ext: MemExt,
    /// Low two address bits selecting the byte/half-word slice.
    pub byte_offset: u32,
}

/// Commit broadcast observed by every waiting RS and LSQ operand.
#[derive(Clone, Copy, Debug)]
pub struct CommitBus {
    /// ROB index of the committing instruction.
    pub tag: RobIndex,
    /// The architectural value it produced.
    pub value: u32,
}
