//! Simulator: owns the pipeline and both memories side-by-side.
//!
//! The driver contract is one reset cycle, then one fetch pulse per cycle
//! until the machine halts. A run ends when a terminator (`ebreak`,
//! `ecall`, or an unrecognized encoding) commits, when the idle threshold
//! passes without a commit, or at the configured cycle limit.

use crate::config::Config;
use crate::core::Pipeline;
use crate::sim::loader::Workload;
use crate::soc::Sram;
use crate::stats::SimStats;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// A terminator committed; the normal end of a program.
    Halted,
    /// No instruction committed for the configured idle threshold.
    IdleTimeout,
    /// The configured cycle limit was reached.
    CycleLimit,
}

/// Top-level simulator: pipeline state plus instruction and data memories.
pub struct Simulator {
    /// The processor pipeline.
    pub pipeline: Pipeline,
    /// Instruction memory.
    pub icache: Sram,
    /// Data memory.
    pub dcache: Sram,
    /// Run statistics.
    pub stats: SimStats,
    config: Config,
    started: bool,
    idle_cycles: u64,
    exit: Option<ExitReason>,
}

impl Simulator {
    /// Creates a simulator with empty memories.
    pub fn new(config: &Config) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            icache: Sram::new(config.memory.depth_log),
            dcache: Sram::new(config.memory.depth_log),
            stats: SimStats::new(),
            config: *config,
            started: false,
            idle_cycles: 0,
            exit: None,
        }
    }

    /// Creates a simulator with the workload images preloaded.
    pub fn from_workload(config: &Config, workload: &Workload) -> Self {
        let mut sim = Self::new(config);
        sim.load_program(&workload.program);
        sim.load_data(&workload.data);
        sim
    }

    /// Preloads instruction memory from word 0.
    pub fn load_program(&mut self, words: &[u32]) {
        self.icache.load_words(words);
    }

    /// Preloads data memory from word 0.
    pub fn load_data(&mut self, words: &[u32]) {
        self.dcache.load_words(words);
    }

    /// Reads an architectural register.
    pub fn reg(&self, reg: usize) -> u32 {
        self.pipeline.rf.read(reg)
    }

    /// Presets an architectural register before a run.
    pub fn set_reg(&mut self, reg: usize, value: u32) {
        self.pipeline.rf.write(reg, value);
    }

    /// Why the run stopped, once it has.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    /// Process exit code: 0 for a normal halt, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.exit {
            Some(ExitReason::Halted) => 0,
            _ => 1,
        }
    }

    /// Advances one clock cycle. Returns the exit reason once the run is
    /// over; further calls are no-ops.
    pub fn step(&mut self) -> Option<ExitReason> {
        if self.exit.is_some() {
            return self.exit;
        }
        self.stats.cycles += 1;

        // One-shot reset cycle before the first fetch pulse.
        if !self.started {
            self.started = true;
            self.icache.latch();
            self.dcache.latch();
            return None;
        }

        let committed_before = self.stats.instructions_committed;
        let halted = self
            .pipeline
            .tick(&mut self.icache, &mut self.dcache, &mut self.stats);
        if halted {
            self.exit = Some(ExitReason::Halted);
            return self.exit;
        }

        if self.stats.instructions_committed == committed_before {
            self.idle_cycles += 1;
            if self.idle_cycles >= self.config.sim.idle_threshold {
                self.exit = Some(ExitReason::IdleTimeout);
                return self.exit;
            }
        } else {
            self.idle_cycles = 0;
        }

        if self.stats.cycles >= self.config.sim.max_cycles {
            self.exit = Some(ExitReason::CycleLimit);
        }
        self.exit
    }

    /// Runs until the machine stops.
    pub fn run(&mut self) -> ExitReason {
        loop {
            if let Some(reason) = self.step() {
                return reason;
            }
        }
    }
}
