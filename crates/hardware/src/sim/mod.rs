//! Simulation: the `Simulator`, the workload loader, and exit reporting.

/// Workload file formats and loading.
pub mod loader;
/// Top-level simulator and run loop.
pub mod simulator;

pub use loader::Workload;
pub use simulator::{ExitReason, Simulator};
