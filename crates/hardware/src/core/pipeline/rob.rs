//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer tracking every in-flight instruction from
//! allocation through commit. It provides:
//! 1. **Allocation:** Assigns each decoded instruction the tail slot; the slot
//!    index is the renaming tag (*recorder*) recorded in the register file.
//! 2. **Completion:** Collects ALU and LSQ results by index, marking entries
//!    committable.
//! 3. **In-order Commit:** Releases the head entry once it is ready; at most
//!    one instruction commits per cycle.
//! 4. **Back-pressure:** Two occupancy thresholds throttle decode and fetch.
//! 5. **Recovery:** A flush empties every slot after a misprediction.
//!
//! Commit-side architectural effects (register write-back, recorder release,
//! predictor training, misprediction detection) are orchestrated by the
//! pipeline around these operations.

use crate::core::pipeline::latches::{AluResult, MemResult};
use crate::core::pipeline::signals::{ControlSignals, MemExt};

/// Index of a ROB slot; doubles as the renaming tag for its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RobIndex(pub usize);

/// A single in-flight instruction.
#[derive(Clone, Debug, Default)]
pub struct RobEntry {
    /// Slot is in use.
    pub allocated: bool,
    /// Result written back; the entry may commit when it reaches the head.
    pub ready: bool,
    /// PC of the instruction.
    pub pc: u32,
    /// Direction the predictor chose when this instruction was fetched.
    pub predicted_taken: bool,
    /// ALU-produced data result.
    pub calc_result: u32,
    /// LSQ-produced data result (extended load value).
    pub load_result: u32,
    /// Next PC as resolved by execution (branch target or PC + 4).
    pub pc_result: u32,
    /// Decoded control bundle.
    pub ctrl: ControlSignals,
}

impl RobEntry {
    /// The architectural value this entry writes at commit.
    pub fn commit_value(&self) -> u32 {
        if self.ctrl.is_load_or_store {
            self.load_result
        } else {
            self.calc_result
        }
    }

    /// Whether execution resolved this instruction as a taken branch.
    pub fn actual_taken(&self) -> bool {
        self.pc_result != self.pc.wrapping_add(4)
    }
}

/// Reorder Buffer — circular buffer for in-order commit.
pub struct Rob {
    entries: Vec<RobEntry>,
    head: usize,
    tail: usize,
    len: usize,
}

impl Rob {
    /// Creates a ROB with the given capacity (a power of two).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, RobEntry::default);
        Self {
            entries,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of in-flight instructions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no instruction is in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.entries.len()
    }

    /// Conservative threshold that back-pressures decode (len ≥ N/2).
    ///
    /// Throttling the window early keeps the flush cost of a misprediction
    /// small at some cost in throughput.
    pub fn full_for_decode(&self) -> bool {
        self.len >= self.entries.len() / 2
    }

    /// Tighter threshold that back-pressures fetch (len ≥ N − 2), leaving
    /// room for the instructions already in flight between fetch and
    /// allocation.
    pub fn full_for_fetch(&self) -> bool {
        self.len >= self.entries.len() - 2
    }

    /// Current head slot index.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Current tail slot index.
    pub fn tail_index(&self) -> usize {
        self.tail
    }

    /// Read access to a slot, for introspection and tests.
    pub fn entry(&self, idx: RobIndex) -> &RobEntry {
        &self.entries[idx.0]
    }

    /// Allocates the tail slot for a decoded instruction.
    ///
    /// Returns `None` when physically full; the fetch threshold normally
    /// prevents that from ever being observed.
    pub fn allocate(
        &mut self,
        pc: u32,
        predicted_taken: bool,
        ctrl: ControlSignals,
    ) -> Option<RobIndex> {
        if self.is_full() {
            return None;
        }
        let idx = self.tail;
        self.entries[idx] = RobEntry {
            allocated: true,
            ready: false,
            pc,
            predicted_taken,
            calc_result: 0,
            load_result: 0,
            pc_result: 0,
            ctrl,
        };
        self.tail = (self.tail + 1) & (self.entries.len() - 1);
        self.len += 1;
        Some(RobIndex(idx))
    }

    /// Pops the head entry if it is ready to commit.
    ///
    /// Callers must evaluate this *before* applying the cycle's writebacks:
    /// a result arriving in cycle T becomes committable in cycle T + 1, as
    /// in the registered hardware.
    pub fn take_committable(&mut self) -> Option<(RobIndex, RobEntry)> {
        if self.len == 0 || !self.entries[self.head].ready {
            return None;
        }
        let idx = self.head;
        let entry = self.entries[idx].clone();
        self.entries[idx].allocated = false;
        self.entries[idx].ready = false;
        self.head = (self.head + 1) & (self.entries.len() - 1);
        self.len -= 1;
        Some((RobIndex(idx), entry))
    }

    /// Stores an ALU result, gated on the target slot still being in use
    /// (a flushed instruction's late result is silently dropped).
    pub fn writeback_alu(&mut self, res: &AluResult) {
        let entry = &mut self.entries[res.rob_index.0];
        if entry.allocated {
            entry.calc_result = res.result;
            entry.pc_result = res.new_pc;
            entry.ready = true;
        }
    }

    /// Stores a memory-operation result.
    ///
    /// For loads, the word on the dcache output port is sliced and extended
    /// per the instruction's `mem_ext` hint; stores just become committable.
    pub fn writeback_mem(&mut self, wb: &MemResult, dcache_word: u32) {
        let entry = &mut self.entries[wb.rob_index.0];
        if entry.allocated {
            if wb.is_load {
                entry.load_result = extract_load(dcache_word, wb.ext, wb.byte_offset);
            }
            entry.pc_result = wb.pc_result;
            entry.ready = true;
        }
    }

    /// True when an in-flight branch sits between the head and `idx`
    /// (exclusive), i.e. is older than the instruction at `idx`.
    ///
    /// The LSQ uses this to hold back stores: a store must not reach memory
    /// while an older branch can still flush it, and a branch can flush
    /// until the cycle it commits, even after its result is written back.
    /// Younger branches are deliberately ignored; they may depend on loads
    /// queued behind the store, and blocking on them would deadlock.
    pub fn has_unresolved_branch_before(&self, idx: RobIndex) -> bool {
        let mask = self.entries.len() - 1;
        let mut i = self.head;
        for _ in 0..self.len {
            if i == idx.0 {
                break;
            }
            let entry = &self.entries[i];
            if entry.allocated && entry.ctrl.is_branch {
                return true;
            }
            i = (i + 1) & mask;
        }
        false
    }

    /// Empties every slot. Recovery resets the pointers as well, so slot
    /// indices restart from zero on the corrected path.
    pub fn flush(&mut self) {
        for entry in &mut self.entries {
            entry.allocated = false;
            entry.ready = false;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// Slices and extends a load value out of the fetched memory word.
pub(crate) fn extract_load(word: u32, ext: MemExt, byte_offset: u32) -> u32 {
    match ext {
        MemExt::Word => word,
        MemExt::Byte => ((word >> (8 * byte_offset)) as u8 as i8 as i32) as u32,
        MemExt::ByteUnsigned => (word >> (8 * byte_offset)) & 0xff,
        MemExt::Half => ((word >> (8 * (byte_offset & 2))) as u16 as i16 as i32) as u32,
        MemExt::HalfUnsigned => (word >> (8 * (byte_offset & 2))) & 0xffff,
    }
}
