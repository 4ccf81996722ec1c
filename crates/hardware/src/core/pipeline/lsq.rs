//! Load/Store Queue (LSQ).
//!
//! A ring buffer of memory operations in strict decode order. Only the head
//! entry may execute: when its operands are resolved it drives the single
//! dcache port for one cycle and retires from the queue, so stores reach
//! memory exactly in program order. A ready store is additionally held
//! while any *older* branch is still in flight: memory writes cannot be
//! undone by a flush, so they wait until no older control flow can squash
//! them.

use crate::core::pipeline::latches::{CommitBus, DispatchEntry, MemResult, Operand};
use crate::core::pipeline::rob::{Rob, RobIndex};
use crate::core::pipeline::signals::MemExt;
use crate::soc::Sram;
use tracing::trace;

/// One queued memory operation.
#[derive(Clone, Copy, Debug)]
pub struct LsqEntry {
    /// ROB index of the owning instruction.
    pub rob_index: RobIndex,
    /// PC of the instruction.
    pub pc: u32,
    /// Memory read.
    pub is_load: bool,
    /// Memory write.
    pub is_store: bool,
    /// Load extension hint.
    pub ext: MemExt,
    /// Address offset.
    pub imm: i32,
    /// Base address operand.
    pub rs1: Operand,
    /// Store data operand.
    pub rs2: Operand,
}

/// What the LSQ head did this cycle.
pub enum LsqAction {
    /// The head executed; the writeback record goes onto the LSQ→ROB bus.
    Executed(MemResult),
    /// A ready store is held behind an unresolved older branch.
    StoreStalled,
    /// Queue empty, or the head still waits on an operand.
    Idle,
}

/// Ordered queue of memory operations, executing from the head only.
pub struct LoadStoreQueue {
    entries: Vec<Option<LsqEntry>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl LoadStoreQueue {
    /// Creates a queue with the given capacity (a power of two).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            entries: vec![None; capacity],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.len == self.entries.len()
    }

    /// Current head slot index.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Appends a dispatched memory operation at the tail.
    pub fn dispatch(&mut self, entry: DispatchEntry) -> bool {
        if self.is_full() {
            return false;
        }
        let idx = self.tail;
        trace!("LSQ slot {idx} allocated (rob {})", entry.rob_index.0);
        self.entries[idx] = Some(LsqEntry {
            rob_index: entry.rob_index,
            pc: entry.pc,
            is_load: entry.ctrl.is_load,
            is_store: entry.ctrl.is_memory_write,
            ext: entry.ctrl.mem_ext,
            imm: entry.ctrl.imm,
            rs1: entry.rs1,
            rs2: entry.rs2,
        });
        self.tail = (self.tail + 1) & (self.entries.len() - 1);
        self.len += 1;
        true
    }

    /// Executes the head entry if it can proceed this cycle.
    ///
    /// Drives the dcache port (`we` for stores, `re` for loads, word
    /// address `(rs1 + imm) >> 2`) and pops the head. The returned record
    /// is registered by the pipeline; the ROB consumes it next cycle
    /// together with the dcache output word. Must be evaluated before the
    /// cycle's dispatch and snoop so a newly woken head executes one cycle
    /// after its operand arrives.
    pub fn execute_head(&mut self, rob: &Rob, dcache: &mut Sram) -> LsqAction {
        let Some(entry) = &self.entries[self.head] else {
            return LsqAction::Idle;
        };
        if !(entry.rs1.resolved() && entry.rs2.resolved()) {
            return LsqAction::Idle;
        }
        if entry.is_store && rob.has_unresolved_branch_before(entry.rob_index) {
            return LsqAction::StoreStalled;
        }

        let addr = entry.rs1.value.wrapping_add(entry.imm as u32);
        let word_addr = (addr >> 2) as usize;
        if entry.is_store {
            dcache.write(word_addr, entry.rs2.value);
        } else {
            dcache.read(word_addr);
        }
        trace!(
            "LSQ head {} executed (rob {}, addr {addr:#010x})",
            self.head, entry.rob_index.0
        );

        let result = MemResult {
            rob_index: entry.rob_index,
            pc_result: entry.pc.wrapping_add(4),
            is_load: entry.is_load,
            ext: entry.ext,
            byte_offset: addr & 3,
        };
        self.entries[self.head] = None;
        self.head = (self.head + 1) & (self.entries.len() - 1);
        self.len -= 1;
        LsqAction::Executed(result)
    }

    /// Wakes every operand waiting on the committing tag.
    pub fn snoop(&mut self, bus: &CommitBus) {
        for entry in self.entries.iter_mut().flatten() {
            entry.rs1.snoop(bus);
            entry.rs2.snoop(bus);
        }
    }

    /// Drops every entry and resets the ring. Used by misprediction recovery.
    pub fn flush(&mut self) {
        self.entries.fill(None);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}
