//! Memory system: the instruction and data SRAMs.

/// Single-port synchronous RAM model.
pub mod sram;

pub use sram::Sram;
