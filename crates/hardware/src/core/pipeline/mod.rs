//! The Tomasulo pipeline: components, registered buses, and the cycle loop.
//!
//! This module owns every pipeline structure and advances them one logical
//! clock cycle at a time. It contains:
//! 1. **Fetch:** PC register + predictor lookup.
//! 2. **ROB:** Allocation, renaming, writeback collection, in-order commit.
//! 3. **RS:** Waiting ALU operations with commit-bus wake-up.
//! 4. **LSQ:** Ordered memory operations executing from the head.
//! 5. **Latches:** The registered buses carrying values between cycles.
//!
//! Within a cycle every component computes from the state left by the
//! previous cycle; the evaluation order below makes that literal. All
//! registered buses are snapshotted first, selection (RS issue, LSQ head)
//! runs before anything inserted or woken this cycle becomes visible, the
//! commit decision precedes the cycle's writebacks, and dispatch reads the
//! register file after commit so the committing value forwards to new
//! consumers without a cycle of skew.

/// Fetch unit (PC register + predictor port).
pub mod fetch;
/// Registered inter-component buses.
pub mod latches;
/// Load/store queue.
pub mod lsq;
/// Architectural register file with renaming tags.
pub mod regfile;
/// Reorder buffer.
pub mod rob;
/// Reservation station.
pub mod rs;
/// Decoder output bundle and operation selectors.
pub mod signals;

use crate::config::Config;
use crate::core::pipeline::fetch::FetchUnit;
use crate::core::pipeline::latches::{
    AluResult, CommitBus, DispatchEntry, FetchedInst, MemResult, Operand,
};
use crate::core::pipeline::lsq::{LoadStoreQueue, LsqAction};
use crate::core::pipeline::regfile::RegisterFile;
use crate::core::pipeline::rob::{Rob, RobIndex};
use crate::core::pipeline::rs::ReservationStation;
use crate::core::pipeline::signals::ControlSignals;
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchPredictor;
use crate::isa::{decode, disassemble};
use crate::soc::Sram;
use crate::stats::SimStats;
use tracing::{debug, trace};

/// All pipeline state: components plus the registered buses between them.
pub struct Pipeline {
    /// Fetch unit.
    pub fetch: FetchUnit,
    /// Reorder buffer.
    pub rob: Rob,
    /// Reservation station.
    pub rs: ReservationStation,
    /// Load/store queue.
    pub lsq: LoadStoreQueue,
    /// Architectural register file + rename tags.
    pub rf: RegisterFile,
    /// Branch predictor (BHT + BTB).
    pub bp: BranchPredictor,

    // Registered buses: written in one cycle, observed the next.
    fetch_latch: Option<FetchedInst>,
    alu_bus: Option<AluResult>,
    mem_bus: Option<MemResult>,
    clear: Option<u32>,
    full_for_fetch: bool,
    full_for_decode: bool,
}

impl Pipeline {
    /// Builds an empty pipeline from the configured structure sizes.
    pub fn new(config: &Config) -> Self {
        Self {
            fetch: FetchUnit::new(),
            rob: Rob::new(config.core.rob_entries),
            rs: ReservationStation::new(config.core.rs_entries),
            lsq: LoadStoreQueue::new(config.core.lsq_entries),
            rf: RegisterFile::new(),
            bp: BranchPredictor::new(config.core.bht_index_bits),
            fetch_latch: None,
            alu_bus: None,
            mem_bus: None,
            clear: None,
            full_for_fetch: false,
            full_for_decode: false,
        }
    }

    /// True while a clear pulse is pending for the next cycle.
    pub fn clear_pending(&self) -> bool {
        self.clear.is_some()
    }

    /// Advances one clock cycle. Returns `true` when a terminator commits
    /// and the simulation must halt.
    pub fn tick(&mut self, icache: &mut Sram, dcache: &mut Sram, stats: &mut SimStats) -> bool {
        // Cycle-start snapshot of every registered value.
        let alu_bus = self.alu_bus.take();
        let mem_bus = self.mem_bus.take();
        let dcache_word = dcache.dout();
        let icache_word = icache.dout();
        let incoming = self.fetch_latch.take();
        let full_for_fetch = self.full_for_fetch;
        let full_for_decode = self.full_for_decode;

        // Global clear: the cycle after a mispredicted branch commits, every
        // speculative structure empties and fetch restarts at the resolved
        // target. The snapshots taken above die here, which is how in-flight
        // wrong-path results are discarded.
        if let Some(reset_pc) = self.clear.take() {
            debug!("pipeline clear, resuming at {reset_pc:#010x}");
            self.rob.flush();
            self.rs.flush();
            self.lsq.flush();
            self.fetch.redirect(reset_pc);
            self.full_for_fetch = false;
            self.full_for_decode = false;
            icache.latch();
            dcache.latch();
            return false;
        }

        // Decode the instruction latched last cycle; its word sits on the
        // icache output port. Back-pressure holds the pair in the latch
        // instead of dropping an architecturally-fetched instruction.
        let decoded = incoming.map(|fetched| (fetched, decode(icache_word)));
        let hold_decode = match &decoded {
            Some((_, ctrl)) => {
                full_for_decode
                    || self.rob.is_full()
                    || (ctrl.is_load_or_store && self.lsq.is_full())
            }
            None => false,
        };

        // Fetch, on pre-cycle predictor state and pre-cycle occupancy.
        let fetch_stalled = full_for_fetch || hold_decode;
        if let Some(fetched) = self.fetch.tick(fetch_stalled, &self.bp, icache) {
            self.fetch_latch = Some(fetched);
        } else {
            stats.fetch_stalls += 1;
        }

        // RS issue: one ready operation fires the ALU; the result is
        // registered for the ROB to collect next cycle.
        if let Some(request) = self.rs.select_issue() {
            stats.alu_issues += 1;
            self.alu_bus = Some(Alu::execute(&request));
        }

        // LSQ head: drives the dcache port and registers its writeback.
        match self.lsq.execute_head(&self.rob, dcache) {
            LsqAction::Executed(result) => {
                stats.lsq_executes += 1;
                self.mem_bus = Some(result);
            }
            LsqAction::StoreStalled => stats.store_guard_stalls += 1,
            LsqAction::Idle => {}
        }

        // Commit decision precedes the writebacks: a result arriving this
        // cycle makes its entry committable next cycle.
        let committed = self.rob.take_committable();

        if let Some(bus) = &alu_bus {
            self.rob.writeback_alu(bus);
        }
        if let Some(bus) = &mem_bus {
            self.rob.writeback_mem(bus, dcache_word);
        }

        // Commit effects.
        let mut commit_bus = None;
        let mut mispredicted = false;
        if let Some((idx, entry)) = committed {
            let value = entry.commit_value();
            trace!(
                "commit rob {} pc {:#010x} -> {value:#010x}",
                idx.0, entry.pc
            );

            if entry.ctrl.rd_valid && entry.ctrl.rd != 0 {
                self.rf.write(entry.ctrl.rd, value);
                self.rf.release(entry.ctrl.rd, idx);
            }
            commit_bus = Some(CommitBus { tag: idx, value });

            stats.instructions_committed += 1;
            if entry.ctrl.is_branch {
                stats.inst_branch += 1;
            } else if entry.ctrl.is_load {
                stats.inst_load += 1;
            } else if entry.ctrl.is_memory_write {
                stats.inst_store += 1;
            } else {
                stats.inst_alu += 1;
            }

            let actual_taken = entry.actual_taken();
            if entry.ctrl.is_branch {
                self.bp.update(entry.pc, actual_taken, entry.pc_result);
            }
            // Direction mismatch on a branch flushes. So does a non-branch
            // that fetch redirected (a BHT/BTB alias steered it down a bogus
            // target): its resolved next PC is PC + 4, and the wrong-path
            // instructions behind it must not commit.
            let wrong_path = if entry.ctrl.is_branch {
                actual_taken != entry.predicted_taken
            } else {
                entry.predicted_taken
            };
            if wrong_path {
                stats.branch_mispredictions += 1;
                debug!(
                    "misprediction at {:#010x}: taken={actual_taken}, predicted={}",
                    entry.pc, entry.predicted_taken
                );
                mispredicted = true;
                self.clear = Some(entry.pc_result);
                self.rf.clear_recorders();
            }

            if entry.ctrl.is_final {
                debug!("terminator committed at {:#010x}", entry.pc);
                icache.latch();
                dcache.latch();
                return true;
            }
        }

        // Allocation + dispatch. Operands are read before the destination is
        // renamed (an instruction must not wait on itself) but after commit,
        // so the committing value reaches new consumers without a bypass
        // cycle. On a misprediction the latched instruction is wrong-path
        // and is dropped with the rest of the speculative state.
        if let Some((fetched, ctrl)) = decoded {
            if hold_decode {
                stats.decode_stalls += 1;
                self.fetch_latch = Some(fetched);
            } else if !mispredicted {
                if let Some(idx) = self.rob.allocate(fetched.pc, fetched.predicted_taken, ctrl) {
                    trace!(
                        "allocate rob {} pc {:#010x}: {}",
                        idx.0,
                        fetched.pc,
                        disassemble(icache_word)
                    );
                    let entry = self.read_operands(idx, fetched.pc, ctrl);
                    if ctrl.rd_valid {
                        self.rf.set_recorder(ctrl.rd, idx);
                    }
                    let placed = if ctrl.is_load_or_store {
                        self.lsq.dispatch(entry)
                    } else {
                        self.rs.dispatch(entry)
                    };
                    debug_assert!(placed, "dispatch slot occupied");
                }
            }
        }

        // Commit-bus broadcast wakes operands already resident in RS/LSQ.
        if let Some(bus) = &commit_bus {
            self.rs.snoop(bus);
            self.lsq.snoop(bus);
        }

        // Registered back-pressure flags for the next cycle.
        self.full_for_decode = self.rob.full_for_decode();
        self.full_for_fetch = self.rob.full_for_fetch();

        icache.latch();
        dcache.latch();
        false
    }

    /// Captures source operands for dispatch: committed value plus the
    /// pending producer tag from the current renaming.
    fn read_operands(&self, idx: RobIndex, pc: u32, ctrl: ControlSignals) -> DispatchEntry {
        let operand = |reg: usize, used: bool| Operand {
            reg,
            used,
            value: self.rf.read(reg),
            pending: if used { self.rf.recorder(reg) } else { None },
        };
        DispatchEntry {
            rob_index: idx,
            pc,
            ctrl,
            rs1: operand(ctrl.rs1, ctrl.rs1_valid),
            rs2: operand(ctrl.rs2, ctrl.rs2_valid),
        }
    }
}
