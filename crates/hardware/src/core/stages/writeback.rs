//! Writeback (WB) stage.
//!
//! Commits the result to the register file (subject to `writes_dst` and the
//! GPR0 rule), releases the in-flight reservation, counts the retire, and
//! runs the functional checker. An explicit trap surfaces here as a fatal
//! error after the checker has confirmed both models agree on it.

use crate::common::{Cycle, SimError};
use crate::core::perf_sim::PerfSim;
use crate::isa::disasm::disassemble;

impl PerfSim {
    pub(crate) fn clock_writeback(&mut self, cycle: Cycle) -> Result<(), SimError> {
        if !self.rp_memory_2_writeback.is_ready(cycle) {
            if self.trace {
                eprintln!("WB  cycle {:>5}: bubble", cycle);
            }
            return Ok(());
        }
        let instr = self.rp_memory_2_writeback.read(cycle);
        debug_assert!(instr.is_complete(), "only executed instructions retire");

        self.rf.write_dst(&instr, cycle);
        self.rf.release(instr.dst());
        self.bypass.release(&instr);

        self.executed_instrs += 1;
        self.last_writeback_cycle = cycle;
        self.stats.instructions_retired += 1;

        if self.trace {
            eprintln!(
                "WB  cycle {:>5}: {} [{} <= {:#x}]",
                cycle,
                instr,
                instr.dst(),
                instr.v_dst()
            );
        }

        self.checker.check(&instr)?;

        if instr.has_trap() {
            return Err(SimError::TrapEncountered {
                pc: instr.pc(),
                disasm: disassemble(&instr),
            });
        }

        if instr.is_halt() {
            self.halted = true;
        }
        Ok(())
    }
}
