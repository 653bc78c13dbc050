//! Trap and simulator error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Trap Representation:** The architectural trap marker carried by instructions.
//! 2. **Simulator Errors:** Fatal conditions (wiring, deadlock, divergence) that abort a run.
//! 3. **Error Handling:** Integration with the standard Rust error traits.

use std::fmt;

use super::{Addr, Cycle};

/// Architectural trap state of an instruction.
///
/// The simulator raises only the explicit kind: trap-if instructions whose
/// predicate holds, and decodes of unknown encodings. Signed-overflow traps
/// are deliberately not modelled; add/sub/addi wrap silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Trap {
    /// No trap.
    #[default]
    None,
    /// An explicit trap (TEQ/TNE family or an unknown encoding).
    Explicit,
}

impl Trap {
    /// True when a trap has been raised.
    #[inline]
    pub fn is_set(self) -> bool {
        self != Trap::None
    }
}

/// Fatal simulator errors.
///
/// Everything here aborts the run. Recoverable pipeline events (data-hazard
/// stalls, branch mispredictions) are handled by the stall/flush protocols
/// and never surface as errors.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// The port wiring graph failed validation before cycle 0.
    ///
    /// Raised for a channel with no reader, no writer, more than one writer,
    /// or a fan-out declaration that does not match the reader count.
    PortWiring(String),

    /// No instruction retired for longer than the configured threshold.
    ///
    /// Carries a textual snapshot of the pipeline for diagnosis.
    Deadlock {
        /// Cycle at which the watchdog fired.
        cycle: Cycle,
        /// Cycle of the most recent writeback.
        last_writeback_cycle: Cycle,
        /// Pipeline state dump.
        snapshot: String,
    },

    /// The functional checker disagreed with a retired instruction.
    ///
    /// Carries the field that diverged and both sides' rendering, including
    /// disassembly and register dumps.
    CheckerMismatch {
        /// Which compared field diverged (PC, raw word, destination, ...).
        field: &'static str,
        /// The performance simulator's view.
        simulator: String,
        /// The functional checker's view.
        checker: String,
    },

    /// A load, store, or fetch touched memory outside the mapped range.
    MemAccess {
        /// Faulting byte address.
        addr: Addr,
        /// Access size in bytes.
        size: u32,
    },

    /// An instruction with an explicit trap reached writeback.
    TrapEncountered {
        /// PC of the trapping instruction.
        pc: Addr,
        /// Its disassembly.
        disasm: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::PortWiring(msg) => write!(f, "port wiring violation: {}", msg),
            SimError::Deadlock {
                cycle,
                last_writeback_cycle,
                snapshot,
            } => write!(
                f,
                "deadlock: no writeback since cycle {} (now {})\n{}",
                last_writeback_cycle, cycle, snapshot
            ),
            SimError::CheckerMismatch {
                field,
                simulator,
                checker,
            } => write!(
                f,
                "checker mismatch on {}:\n  simulator: {}\n  checker:   {}",
                field, simulator, checker
            ),
            SimError::MemAccess { addr, size } => {
                write!(f, "memory access violation: {:#010x} ({} bytes)", addr, size)
            }
            SimError::TrapEncountered { pc, disasm } => {
                write!(f, "explicit trap at {:#010x}: {}", pc, disasm)
            }
        }
    }
}

impl std::error::Error for SimError {}
