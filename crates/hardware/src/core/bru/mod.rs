//! Branch prediction unit.
//!
//! This module contains the branch predictor interface, its policies, and
//! the branch target buffer shared between them. The policy is pluggable;
//! Fetch consults it and Mem trains it with resolved outcomes.

/// 2-bit saturating counter predictor.
pub mod bimodal;
/// Branch target buffer.
pub mod btb;
/// Always-not-taken predictor.
pub mod static_bp;

use crate::common::Addr;
use crate::config::BranchPredictorKind;

use self::bimodal::BimodalPredictor;
use self::static_bp::StaticPredictor;

/// The prediction interface.
pub trait BranchPredictor {
    /// Predicts the outcome of the instruction at `pc`.
    ///
    /// Returns `(predicted_taken, predicted_target)`; a not-taken prediction
    /// carries the fall-through address as its target.
    fn predict(&self, pc: Addr) -> (bool, Addr);

    /// Trains the predictor with a resolved jump or branch.
    fn update(&mut self, pc: Addr, target: Addr, taken: bool);
}

/// Resolved-branch record sent from Mem back to Fetch for training.
#[derive(Clone, Copy, Debug)]
pub struct BpUpdate {
    /// PC of the jump or branch.
    pub pc: Addr,
    /// Actual next PC.
    pub target: Addr,
    /// Actual direction.
    pub taken: bool,
}

/// Enum wrapper for static dispatch of branch predictors.
/// This avoids vtable lookups in the fetch loop.
pub enum BranchPredictorWrapper {
    /// Always-not-taken.
    Static(StaticPredictor),
    /// 2-bit saturating counters with a BTB.
    Bimodal(BimodalPredictor),
}

impl BranchPredictorWrapper {
    /// Creates the configured predictor.
    pub fn new(kind: BranchPredictorKind, btb_size: usize) -> Self {
        match kind {
            BranchPredictorKind::Static => Self::Static(StaticPredictor::new()),
            BranchPredictorKind::Bimodal => Self::Bimodal(BimodalPredictor::new(btb_size)),
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline]
    fn predict(&self, pc: Addr) -> (bool, Addr) {
        match self {
            Self::Static(bp) => bp.predict(pc),
            Self::Bimodal(bp) => bp.predict(pc),
        }
    }

    #[inline]
    fn update(&mut self, pc: Addr, target: Addr, taken: bool) {
        match self {
            Self::Static(bp) => bp.update(pc, target, taken),
            Self::Bimodal(bp) => bp.update(pc, target, taken),
        }
    }
}
