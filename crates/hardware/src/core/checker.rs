//! Functional oracle for the pipeline.
//!
//! Runs a [`FuncSim`] one instruction at a time in lockstep with Writeback
//! and compares every retired instruction against the reference. Any
//! divergence is fatal and reported with both sides' disassembly and the
//! reference register dump.

use crate::common::{Addr, SimError};
use crate::core::func_sim::FuncSim;
use crate::isa::Instr;
use crate::mem::FuncMemory;

/// Lockstep comparator around the architectural simulator.
pub struct Checker {
    sim: FuncSim,
}

impl Checker {
    /// Creates a checker over an independent copy of the loaded memory.
    pub fn new(mem: FuncMemory, start_pc: Addr) -> Self {
        Self {
            sim: FuncSim::new(mem, start_pc),
        }
    }

    fn mismatch(&self, field: &'static str, retired: &Instr, reference: &Instr) -> SimError {
        SimError::CheckerMismatch {
            field,
            simulator: format!(
                "{} [dst={} v_dst={:#x} writes={} new_pc={:#010x} trap={}]",
                retired,
                retired.dst(),
                retired.v_dst(),
                retired.writes_dst(),
                retired.new_pc(),
                retired.has_trap(),
            ),
            checker: format!(
                "{} [dst={} v_dst={:#x} writes={} new_pc={:#010x} trap={}]\n{}",
                reference,
                reference.dst(),
                reference.v_dst(),
                reference.writes_dst(),
                reference.new_pc(),
                reference.has_trap(),
                self.sim.rf().dump(),
            ),
        }
    }

    /// Steps the reference and compares it with a retired instruction.
    ///
    /// Compared fields: PC, raw word, destination register, committed
    /// destination value (writes to `$0` are exempt per the GPR0 rule),
    /// trap status, and the final `new_pc`.
    pub fn check(&mut self, retired: &Instr) -> Result<(), SimError> {
        let reference = self.sim.step()?;

        if retired.pc() != reference.pc() {
            return Err(self.mismatch("pc", retired, &reference));
        }
        if retired.raw() != reference.raw() {
            return Err(self.mismatch("raw word", retired, &reference));
        }
        if retired.dst() != reference.dst() {
            return Err(self.mismatch("destination register", retired, &reference));
        }
        if retired.writes_dst() != reference.writes_dst() {
            return Err(self.mismatch("destination write enable", retired, &reference));
        }
        let value_matters = retired.writes_dst() && retired.dst().is_tracked();
        if value_matters && retired.v_dst() != reference.v_dst() {
            return Err(self.mismatch("destination value", retired, &reference));
        }
        if retired.has_trap() != reference.has_trap() {
            return Err(self.mismatch("trap status", retired, &reference));
        }
        if retired.new_pc() != reference.new_pc() {
            return Err(self.mismatch("new PC", retired, &reference));
        }
        Ok(())
    }
}
