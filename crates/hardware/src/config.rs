//! Configuration system for the pipeline simulator.
//!
//! This module defines the structures used to parameterize the simulated
//! machine. It provides:
//! 1. **Defaults:** Baseline hardware constants (queue depths, predictor size, memory depth).
//! 2. **Structures:** Hierarchical config for the core, the memories, and the simulation loop.
//! 3. **Validation:** Structural constraints the model depends on (power-of-two sizes, RS = ROB).
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with
//! `Config::default()`.

use crate::common::SimError;
use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Reorder buffer entry count.
    ///
    /// Must be a power of two: pointer arithmetic indexes the entry array
    /// with the low bits of wider counters.
    pub const ROB_ENTRIES: usize = 8;

    /// Reservation station slot count.
    ///
    /// Must equal `ROB_ENTRIES`: dispatch places each instruction in the
    /// slot addressed by the low bits of its ROB index, which is
    /// collision-free only when the two sizes match.
    pub const RS_ENTRIES: usize = 8;

    /// Load/store queue entry count.
    pub const LSQ_ENTRIES: usize = 8;

    /// Branch history table index width in bits (2^6 = 64 counters).
    ///
    /// The BHT and BTB are both indexed by `pc[7:2]`.
    pub const BHT_INDEX_BITS: usize = 6;

    /// Instruction/data memory depth as log2 of the word count (2^16 words).
    pub const MEM_DEPTH_LOG: usize = 16;

    /// Cycles without a commit before the simulation gives up.
    pub const IDLE_THRESHOLD: u64 = 4000;

    /// Hard cycle limit for a run.
    pub const MAX_CYCLES: u64 = 200_000;
}

/// Core pipeline structure sizes.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Number of reorder buffer entries (power of two).
    pub rob_entries: usize,
    /// Number of reservation station slots (must equal `rob_entries`).
    pub rs_entries: usize,
    /// Number of load/store queue entries (power of two).
    pub lsq_entries: usize,
    /// Branch history table index width in bits.
    pub bht_index_bits: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rob_entries: defaults::ROB_ENTRIES,
            rs_entries: defaults::RS_ENTRIES,
            lsq_entries: defaults::LSQ_ENTRIES,
            bht_index_bits: defaults::BHT_INDEX_BITS,
        }
    }
}

/// Memory system parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Depth of each SRAM as log2 of the 32-bit word count.
    pub depth_log: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            depth_log: defaults::MEM_DEPTH_LOG,
        }
    }
}

/// Simulation loop limits.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hard cycle limit; the run stops when reached.
    pub max_cycles: u64,
    /// Cycles without a commit before the run is declared wedged.
    pub idle_threshold: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            idle_threshold: defaults::IDLE_THRESHOLD,
        }
    }
}

/// Root configuration type.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Core pipeline structure sizes.
    pub core: CoreConfig,
    /// Memory system parameters.
    pub memory: MemoryConfig,
    /// Simulation loop limits.
    pub sim: SimConfig,
}

impl Config {
    /// Deserializes a configuration from a JSON string.
    ///
    /// The result is validated before being returned.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the structural constraints the hardware model depends on.
    pub fn validate(&self) -> Result<(), SimError> {
        for (what, got) in [
            ("core.rob_entries", self.core.rob_entries),
            ("core.lsq_entries", self.core.lsq_entries),
        ] {
            if !got.is_power_of_two() {
                return Err(SimError::NotPowerOfTwo { what, got });
            }
        }
        if self.core.rs_entries != self.core.rob_entries {
            return Err(SimError::RsRobMismatch {
                rs: self.core.rs_entries,
                rob: self.core.rob_entries,
            });
        }
        if self.memory.depth_log == 0 || self.memory.depth_log > 24 {
            return Err(SimError::Config(format!(
                "memory.depth_log {} out of range (1..=24)",
                self.memory.depth_log
            )));
        }
        Ok(())
    }
}
