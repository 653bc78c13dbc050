//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline constants (memory map, predictor, watchdog).
//! 2. **Structures:** Hierarchical config for general, memory, and pipeline settings.
//! 3. **Enums:** Branch predictor policy selection.
//!
//! Use `Config::default()` from the CLI or deserialize from JSON.

use serde::Deserialize;

use crate::common::Addr;

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::Addr;

    /// Base address of the mapped memory region and default entry point.
    ///
    /// The conventional MIPS user text segment base. Program images are
    /// placed here unless the loader is told otherwise.
    pub const MEM_BASE: Addr = 0x0040_0000;

    /// Size of the mapped memory region (16 MiB).
    ///
    /// Accesses outside `[MEM_BASE, MEM_BASE + MEM_SIZE)` are fatal.
    pub const MEM_SIZE: usize = 16 * 1024 * 1024;

    /// Default Branch Target Buffer / counter table size (256 entries).
    pub const BTB_SIZE: usize = 256;

    /// Cycles without a writeback before the deadlock watchdog fires.
    pub const DEADLOCK_THRESHOLD: u64 = 1000;
}

/// Branch predictor policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictorKind {
    /// Always not taken.
    Static,
    /// 2-bit saturating counters with a BTB (default).
    #[default]
    Bimodal,
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit the per-cycle pipeline dump on stderr.
    pub trace: bool,
    /// Entry-point PC when the loader does not supply one.
    pub start_pc: Addr,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            start_pc: defaults::MEM_BASE,
        }
    }
}

/// Functional memory layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// First mapped byte address.
    pub base: Addr,
    /// Mapped size in bytes.
    pub size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEM_BASE,
            size: defaults::MEM_SIZE,
        }
    }
}

/// Pipeline behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Branch predictor policy.
    pub branch_predictor: BranchPredictorKind,
    /// Predictor table size (BTB entries and counters).
    pub btb_size: usize,
    /// Deadlock watchdog threshold in cycles.
    pub deadlock_threshold: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            branch_predictor: BranchPredictorKind::default(),
            btb_size: defaults::BTB_SIZE,
            deadlock_threshold: defaults::DEADLOCK_THRESHOLD,
        }
    }
}

/// Root configuration type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings.
    pub general: GeneralConfig,
    /// Functional memory layout.
    pub memory: MemoryConfig,
    /// Pipeline behaviour.
    pub pipeline: PipelineConfig,
}
