//! Core simulator implementation.
//!
//! This module contains the pipeline and its collaborators: the register
//! file, the bypassing unit, the branch prediction unit, the functional
//! reference simulator, the checker, and the five pipeline stages.

/// Branch prediction unit (policies, BTB, trait).
pub mod bru;
/// Bypassing (forwarding) unit.
pub mod bypass;
/// Functional oracle comparing every retired instruction.
pub mod checker;
/// Architectural single-step reference simulator.
pub mod func_sim;
/// Top-level pipeline simulator and run loop.
pub mod perf_sim;
/// Register file with in-flight destination tracking.
pub mod rf;
/// The five pipeline stages.
mod stages;

pub use self::func_sim::FuncSim;
pub use self::perf_sim::{ExitStatus, PerfSim};
pub use self::rf::RF;
