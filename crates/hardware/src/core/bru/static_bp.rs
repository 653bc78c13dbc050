//! Static branch predictor.
//!
//! Implements an "always not taken" policy: every prediction is the
//! fall-through address, so every taken jump or branch costs one flush.

use super::BranchPredictor;
use crate::common::Addr;

/// Always-not-taken predictor; keeps no state at all.
#[derive(Default)]
pub struct StaticPredictor;

impl StaticPredictor {
    /// Creates the predictor.
    pub fn new() -> Self {
        Self
    }
}

impl BranchPredictor for StaticPredictor {
    fn predict(&self, pc: Addr) -> (bool, Addr) {
        (false, pc.wrapping_add(4))
    }

    fn update(&mut self, _pc: Addr, _target: Addr, _taken: bool) {}
}
