//! Architectural register file with renaming tags.
//!
//! Each of the 32 registers carries its committed value plus a *recorder*:
//! the ROB index of the youngest in-flight instruction that will write it,
//! or `None` when the architectural value is current. Dispatch reads both;
//! commit writes the value and releases the recorder only while it still
//! owns it, so a younger in-flight writer to the same register is never
//! un-renamed (WAW handling).

use crate::core::pipeline::rob::RobIndex;
use tracing::trace;

/// Architectural register file plus per-register rename tags.
pub struct RegisterFile {
    values: [u32; 32],
    recorders: [Option<RobIndex>; 32],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with all values zero and no pending writers.
    pub fn new() -> Self {
        Self {
            values: [0; 32],
            recorders: [None; 32],
        }
    }

    /// Reads a register's committed value. x0 always reads zero.
    pub fn read(&self, reg: usize) -> u32 {
        self.values[reg]
    }

    /// Writes a committed value. Writes to x0 are ignored.
    pub fn write(&mut self, reg: usize, value: u32) {
        if reg != 0 {
            self.values[reg] = value;
        }
    }

    /// Marks `reg` as owned by the in-flight instruction at `tag`.
    /// No-op for x0, which never acquires a recorder.
    pub fn set_recorder(&mut self, reg: usize, tag: RobIndex) {
        if reg != 0 {
            self.recorders[reg] = Some(tag);
        }
    }

    /// The ROB index of the youngest pending writer, if any.
    pub fn recorder(&self, reg: usize) -> Option<RobIndex> {
        self.recorders[reg]
    }

    /// Releases a recorder, but only if `tag` still owns it.
    ///
    /// A committing instruction must not clear the tag of a younger
    /// instruction that renamed the same register after it.
    pub fn release(&mut self, reg: usize, tag: RobIndex) {
        if self.recorders[reg] == Some(tag) {
            self.recorders[reg] = None;
        }
    }

    /// Drops every pending writer. Used by misprediction recovery.
    pub fn clear_recorders(&mut self) {
        self.recorders = [None; 32];
    }

    /// Logs the non-zero registers at trace level.
    pub fn dump(&self) {
        for (i, value) in self.values.iter().enumerate() {
            if *value != 0 {
                trace!("x{i:02} = {value:#010x}");
            }
        }
    }
}
