//! Bimodal branch predictor.
//!
//! A table of 2-bit saturating counters indexed by PC, paired with a BTB for
//! target prediction. A branch is predicted taken when its counter is in one
//! of the two taken states and the BTB holds its target.

use super::{btb::Btb, BranchPredictor};
use crate::common::Addr;

/// Counter value at and above which a branch is predicted taken.
const TAKEN_THRESHOLD: u8 = 2;
/// Saturation ceiling of the 2-bit counters.
const COUNTER_MAX: u8 = 3;
/// Reset value: weakly not taken.
const COUNTER_INIT: u8 = 1;

/// 2-bit saturating counter predictor with a BTB.
pub struct BimodalPredictor {
    counters: Vec<u8>,
    btb: Btb,
}

impl BimodalPredictor {
    /// Creates a predictor with `size` counters and a same-sized BTB.
    pub fn new(size: usize) -> Self {
        Self {
            counters: vec![COUNTER_INIT; size.max(1)],
            btb: Btb::new(size),
        }
    }

    fn index(&self, pc: Addr) -> usize {
        ((pc >> 2) as usize) % self.counters.len()
    }
}

impl BranchPredictor for BimodalPredictor {
    fn predict(&self, pc: Addr) -> (bool, Addr) {
        if self.counters[self.index(pc)] >= TAKEN_THRESHOLD {
            if let Some(target) = self.btb.lookup(pc) {
                return (true, target);
            }
        }
        (false, pc.wrapping_add(4))
    }

    fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        let idx = self.index(pc);
        if taken {
            if self.counters[idx] < COUNTER_MAX {
                self.counters[idx] += 1;
            }
            self.btb.update(pc, target);
        } else if self.counters[idx] > 0 {
            self.counters[idx] -= 1;
        }
    }
}
