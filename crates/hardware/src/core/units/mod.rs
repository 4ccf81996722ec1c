//! Execution units: the ALU and the branch prediction unit.

/// Arithmetic logic unit.
pub mod alu;
/// Branch prediction (BHT + BTB).
pub mod bru;
