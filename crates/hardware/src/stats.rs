//! Simulation statistics collection and reporting.
//!
//! Tracks performance counters for the pipeline:
//! 1. **Cycle and IPC:** Total cycles, committed instructions, derived IPC.
//! 2. **Instruction mix:** Commits by category (ALU, load, store, branch).
//! 3. **Branch prediction:** Committed branches, mispredictions (= flushes), accuracy.
//! 4. **Stalls:** Fetch, decode, and store-guard stall cycles.

use std::time::Instant;

/// Counter set for one simulation run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed.
    pub instructions_committed: u64,

    /// Committed ALU (non-memory, non-branch) instructions.
    pub inst_alu: u64,
    /// Committed loads.
    pub inst_load: u64,
    /// Committed stores.
    pub inst_store: u64,
    /// Committed branches and jumps.
    pub inst_branch: u64,

    /// Operations issued from the RS to the ALU (speculative included).
    pub alu_issues: u64,
    /// Memory operations executed at the LSQ head (speculative included).
    pub lsq_executes: u64,

    /// Committed branches whose predicted direction was wrong; each one
    /// costs a full pipeline flush.
    pub branch_mispredictions: u64,

    /// Cycles fetch could not issue (ROB threshold or occupied latch).
    pub fetch_stalls: u64,
    /// Cycles the decoded instruction was held by back-pressure.
    pub decode_stalls: u64,
    /// Cycles a ready store waited behind an in-flight older branch.
    pub store_guard_stalls: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_committed: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            alu_issues: 0,
            lsq_executes: 0,
            branch_mispredictions: 0,
            fetch_stalls: 0,
            decode_stalls: 0,
            store_guard_stalls: 0,
        }
    }
}

impl SimStats {
    /// Creates a zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_committed as f64 / self.cycles as f64
        }
    }

    /// Fraction of committed branches predicted correctly.
    pub fn branch_accuracy(&self) -> f64 {
        if self.inst_branch == 0 {
            1.0
        } else {
            1.0 - self.branch_mispredictions as f64 / self.inst_branch as f64
        }
    }

    /// Prints the counter summary to stdout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        println!("--- Simulation Statistics ---");
        println!("  Cycles:           {}", self.cycles);
        println!("  Committed:        {}", self.instructions_committed);
        println!("  IPC:              {:.3}", self.ipc());
        println!(
            "  Mix:              alu {} / load {} / store {} / branch {}",
            self.inst_alu, self.inst_load, self.inst_store, self.inst_branch
        );
        println!(
            "  Branches:         {} committed, {} mispredicted ({:.1}% accuracy)",
            self.inst_branch,
            self.branch_mispredictions,
            self.branch_accuracy() * 100.0
        );
        println!(
            "  Issue:            {} alu ops, {} memory ops",
            self.alu_issues, self.lsq_executes
        );
        println!(
            "  Stalls:           fetch {} / decode {} / store-guard {}",
            self.fetch_stalls, self.decode_stalls, self.store_guard_stalls
        );
        println!("  Wall time:        {elapsed:.3}s");
    }
}
