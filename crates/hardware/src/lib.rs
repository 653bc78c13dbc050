//! MIPS cycle-accurate simulator library.
//!
//! This crate implements a cycle-accurate performance simulator for the MIPS
//! I/II/32 integer subset with the following:
//! 1. **Core:** A five-stage in-order pipeline (fetch, decode, execute, memory,
//!    writeback) with forwarding, stall insertion, branch prediction, and
//!    misprediction recovery.
//! 2. **ISA:** Table-driven decoding and execution, plus a disassembler.
//! 3. **Checker:** An embedded functional simulator re-executing every retired
//!    instruction as a self-checking oracle.
//! 4. **Ports:** Typed inter-stage channels with bandwidth, latency, and
//!    fan-out validated before cycle 0.
//! 5. **Simulation:** Flat functional memory, configuration, and statistics.

/// Common types and helpers (registers, errors, scalars).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (pipeline, register file, bypassing, prediction, checker).
pub mod core;
/// Instruction set (tables, decoded instruction, disassembler).
pub mod isa;
/// Flat functional memory.
pub mod mem;
/// Typed inter-stage ports and the wiring registry.
pub mod ports;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main simulator type; construct with `PerfSim::new` over a loaded memory.
pub use crate::core::PerfSim;
/// Byte-addressable memory image shared with the checker at start-up.
pub use crate::mem::FuncMemory;
