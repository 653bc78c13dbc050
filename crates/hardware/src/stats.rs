//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for a run. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics.
//! 2. **Branch prediction:** Resolved jumps, mispredictions, and accuracy.
//! 3. **Stalls:** Data-hazard and control (flush) stall counts.

use std::time::Instant;

/// Counters accumulated over a simulation run.
#[derive(Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,
    /// Jumps and branches resolved at the Mem stage.
    pub branches_resolved: u64,
    /// Resolved jumps whose prediction was wrong.
    pub branch_mispredictions: u64,
    /// Cycles lost to data-hazard stalls at Decode.
    pub stalls_data: u64,
    /// Cycles lost to misprediction flushes.
    pub stalls_control: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            branches_resolved: 0,
            branch_mispredictions: 0,
            stalls_data: 0,
            stalls_control: 0,
        }
    }
}

impl SimStats {
    /// Creates zeroed statistics with the clock started now.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Fraction of resolved jumps that were predicted correctly.
    pub fn branch_accuracy(&self) -> f64 {
        if self.branches_resolved == 0 {
            return 1.0;
        }
        1.0 - self.branch_mispredictions as f64 / self.branches_resolved as f64
    }

    /// Prints a human-readable summary to stdout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        println!("---- simulation statistics ----");
        println!("cycles:            {}", self.cycles);
        println!("instructions:      {}", self.instructions_retired);
        println!("IPC:               {:.3}", self.ipc());
        println!(
            "branches:          {} ({} mispredicted, {:.1}% accuracy)",
            self.branches_resolved,
            self.branch_mispredictions,
            self.branch_accuracy() * 100.0
        );
        println!("data stalls:       {}", self.stalls_data);
        println!("control stalls:    {}", self.stalls_control);
        if elapsed > 0.0 {
            println!(
                "host speed:        {:.0} cycles/s",
                self.cycles as f64 / elapsed
            );
        }
    }
}
