//! Branch prediction unit: BHT direction counters plus a BTB for targets.

/// Two-bit saturating direction counters.
pub mod bht;
/// Last-taken-target buffer.
pub mod btb;

use bht::Bht;
use btb::Btb;

/// Combined direction + target predictor read by fetch and trained at commit.
pub struct BranchPredictor {
    bht: Bht,
    btb: Btb,
}

impl BranchPredictor {
    /// Creates a predictor with `2^index_bits` entries in each table.
    pub fn new(index_bits: usize) -> Self {
        Self {
            bht: Bht::new(index_bits),
            btb: Btb::new(index_bits),
        }
    }

    /// Looks up the instruction at `pc`: predicted direction and target.
    pub fn predict(&self, pc: u32) -> (bool, u32) {
        (self.bht.predict_taken(pc), self.btb.target(pc))
    }

    /// Trains both tables with a committed branch outcome.
    ///
    /// The BTB only learns targets of taken branches; not-taken outcomes
    /// leave the stored target alone.
    pub fn update(&mut self, pc: u32, taken: bool, target: u32) {
        self.bht.train(pc, taken);
        if taken {
            self.btb.update(pc, target);
        }
    }
}
