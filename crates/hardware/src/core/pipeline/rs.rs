//! Reservation Station (RS) for ALU operations.
//!
//! A fixed pool of slots holding dispatched arithmetic instructions until
//! their operands resolve. There is no ordering: dispatch places each
//! instruction in the slot addressed by the low bits of its ROB index
//! (collision-free because the pool mirrors the ROB one-to-one), wake-up
//! snoops the commit bus, and issue picks any ready slot.

use crate::core::pipeline::latches::{AluRequest, CommitBus, DispatchEntry};
use tracing::trace;

/// Unordered pool of waiting ALU operations.
pub struct ReservationStation {
    slots: Vec<Option<DispatchEntry>>,
}

impl ReservationStation {
    /// Creates a station with `size` slots (the ROB entry count).
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        Self {
            slots: vec![None; size],
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places a dispatched instruction in its slot.
    ///
    /// The slot is the low bits of the ROB index; with pool size equal to
    /// ROB size the slot is always free, but an occupied slot refuses the
    /// dispatch rather than overwriting an in-flight instruction.
    pub fn dispatch(&mut self, entry: DispatchEntry) -> bool {
        let slot = entry.rob_index.0 & (self.slots.len() - 1);
        if self.slots[slot].is_some() {
            return false;
        }
        trace!("RS slot {slot} allocated (rob {})", entry.rob_index.0);
        self.slots[slot] = Some(entry);
        true
    }

    /// Selects one ready instruction and frees its slot.
    ///
    /// A priority scan over all slots; the highest-index ready slot wins.
    /// The pool is small and selection is not fairness-critical, so any
    /// deterministic policy serves; this one matches the scan direction of
    /// the hardware description. Must be evaluated before the cycle's
    /// dispatch and snoop so entries become eligible one cycle after they
    /// arrive or wake.
    pub fn select_issue(&mut self) -> Option<AluRequest> {
        let mut pick = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(entry) = slot
                && entry.rs1.resolved()
                && entry.rs2.resolved()
            {
                pick = Some(i);
            }
        }
        let slot = pick?;
        let entry = self.slots[slot].take()?;
        trace!("RS slot {slot} issued (rob {})", entry.rob_index.0);

        let a = entry.rs1.value;
        let b = entry.rs2.value;
        let alu_a = if entry.ctrl.is_branch || entry.ctrl.is_pc_calc {
            entry.pc
        } else {
            a
        };
        let alu_b = if entry.ctrl.imm_valid {
            entry.ctrl.imm as u32
        } else {
            b
        };
        Some(AluRequest {
            rob_index: entry.rob_index,
            a,
            b,
            alu_a,
            alu_b,
            op: entry.ctrl.alu,
            cond: entry.ctrl.cond,
            flip: entry.ctrl.flip,
            is_branch: entry.ctrl.is_branch,
            is_jalr: entry.ctrl.is_jalr,
            link_pc: entry.ctrl.link_pc,
            pc: entry.pc,
        })
    }

    /// Wakes every operand waiting on the committing tag.
    pub fn snoop(&mut self, bus: &CommitBus) {
        for entry in self.slots.iter_mut().flatten() {
            entry.rs1.snoop(bus);
            entry.rs2.snoop(bus);
        }
    }

    /// Drops every slot. Used by misprediction recovery.
    pub fn flush(&mut self) {
        self.slots.fill(None);
    }
}
