//! Fetch unit: PC register, predictor lookup, icache read issue.
//!
//! Each cycle the unit looks up the branch predictor at the current PC,
//! issues the icache read for the current word, and hands `(pc,
//! predicted_taken)` to the one-deep fetch latch. The next PC is the
//! predicted target when the predictor says taken, PC + 4 otherwise; on a
//! pipeline clear the PC reloads from the resolved branch target instead.

use crate::core::pipeline::latches::FetchedInst;
use crate::core::units::bru::BranchPredictor;
use crate::soc::Sram;
use tracing::trace;

/// PC register plus the fetch-side predictor port.
pub struct FetchUnit {
    pc: u32,
}

impl Default for FetchUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchUnit {
    /// Creates a fetch unit with the PC at the reset vector (0).
    pub fn new() -> Self {
        Self { pc: 0 }
    }

    /// Current PC.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Reloads the PC after a misprediction flush.
    pub fn redirect(&mut self, pc: u32) {
        trace!("fetch redirected to {pc:#010x}");
        self.pc = pc;
    }

    /// Runs one fetch cycle.
    ///
    /// When `stalled` (ROB threshold reached or the fetch latch is still
    /// occupied) the PC holds and nothing is issued. Otherwise the icache
    /// read goes out, the fetched-instruction record is returned for the
    /// latch, and the PC advances along the predicted path.
    pub fn tick(
        &mut self,
        stalled: bool,
        bp: &BranchPredictor,
        icache: &mut Sram,
    ) -> Option<FetchedInst> {
        if stalled {
            return None;
        }
        let (predicted_taken, predicted_target) = bp.predict(self.pc);
        icache.read((self.pc >> 2) as usize);
        trace!(
            "fetch {:#010x} predicted_taken={predicted_taken}",
            self.pc
        );

        let fetched = FetchedInst {
            pc: self.pc,
            predicted_taken,
        };
        self.pc = if predicted_taken {
            predicted_target
        } else {
            self.pc.wrapping_add(4)
        };
        Some(fetched)
    }
}
