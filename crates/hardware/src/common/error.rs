//! Host-side error definitions.
//!
//! This module defines the errors that can abort a simulation before it starts.
//! It covers:
//! 1. **Workload errors:** Missing or malformed program/data/config files.
//! 2. **Configuration errors:** Structural constraints the hardware model requires.
//!
//! Runtime hardware events (misprediction, full queues, the ebreak halt) are
//! not errors; they are handled in place by the component that detects them
//! and never unwind through this type.

use thiserror::Error;

/// Errors raised while setting up a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A workload file could not be read from disk.
    #[error("cannot read '{path}': {source}")]
    WorkloadRead {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A workload file could not be written.
    #[error("cannot write '{path}': {source}")]
    WorkloadWrite {
        /// Path of the file that failed to write.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line of a memory image was not a bare hexadecimal word.
    #[error("{path}:{line}: invalid hex word `{word}`")]
    MalformedWord {
        /// Path of the offending file.
        path: String,
        /// 1-based line number.
        line: usize,
        /// The token that failed to parse.
        word: String,
    },

    /// The workload config line did not match `offset: <hex>, data_offset: <hex>`.
    #[error("workload config `{line}`: {reason}")]
    MalformedConfig {
        /// The raw config line.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A structure size that must be a power of two was not.
    #[error("{what} must be a power of two, got {got}")]
    NotPowerOfTwo {
        /// Name of the configuration field.
        what: &'static str,
        /// The rejected value.
        got: usize,
    },

    /// The reservation station must mirror the ROB one-to-one.
    ///
    /// Dispatch indexes RS slots by the low bits of the ROB index; unequal
    /// sizes would alias distinct in-flight instructions onto one slot.
    #[error("reservation station size {rs} must equal ROB size {rob}")]
    RsRobMismatch {
        /// Configured RS entry count.
        rs: usize,
        /// Configured ROB entry count.
        rob: usize,
    },

    /// A configuration file failed to deserialize.
    #[error("configuration: {0}")]
    Config(String),
}
