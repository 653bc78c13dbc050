//! Memory access (MEM) stage.
//!
//! Resolves jumps: publishes predictor updates and, on a misprediction,
//! raises the global flush and sends the corrected PC to Fetch. Performs
//! loads and stores against functional memory (including the unaligned
//! merge family) and publishes load results on the Mem bypass port. Also
//! observes the flush signal itself, dropping the wrong-path instruction
//! that left Execute the cycle the branch resolved.

use crate::common::{Cycle, SimError};
use crate::core::bru::BpUpdate;
use crate::core::bypass::BypassPacket;
use crate::core::perf_sim::PerfSim;

impl PerfSim {
    pub(crate) fn clock_memory(&mut self, cycle: Cycle) -> Result<(), SimError> {
        let is_flush = self.rp_memory_flush.is_ready(cycle) && self.rp_memory_flush.read(cycle);
        if is_flush {
            if self.rp_execute_2_memory.is_ready(cycle) {
                // The instruction is invalid; tell the bypassing unit so its
                // destination reservation is withdrawn.
                let instr = self.rp_execute_2_memory.read(cycle);
                self.wp_memory_flush_notify.write(instr, cycle);
            }
            if self.trace {
                eprintln!("MEM cycle {:>5}: flush", cycle);
            }
            return Ok(());
        }

        if !self.rp_execute_2_memory.is_ready(cycle) {
            if self.trace {
                eprintln!("MEM cycle {:>5}: bubble", cycle);
            }
            return Ok(());
        }
        let mut instr = self.rp_execute_2_memory.read(cycle);

        if instr.is_jump() {
            self.stats.branches_resolved += 1;
            self.wp_memory_2_bp_update.write(
                BpUpdate {
                    pc: instr.pc(),
                    target: instr.new_pc(),
                    taken: instr.is_jump_taken(),
                },
                cycle,
            );

            if instr.is_misprediction() {
                self.stats.branch_mispredictions += 1;
                // Three younger slots die with every flush.
                self.stats.stalls_control += 3;
                self.wp_memory_2_all_flush.write(true, cycle);
                self.wp_memory_2_fetch_target.write(instr.new_pc(), cycle);
                if self.trace {
                    eprintln!(
                        "MEM cycle {:>5}: misprediction on {} -> {:#010x}",
                        cycle,
                        instr,
                        instr.new_pc()
                    );
                }
            }
        }

        self.mem.load_store(&mut instr)?;

        if instr.is_load() && instr.writes_dst() && instr.dst().is_tracked() {
            self.wp_memory_2_bypass.write(
                BypassPacket {
                    dst: instr.dst(),
                    seq: instr.seq(),
                    data: instr.bypass_data(),
                },
                cycle,
            );
        }

        if self.trace {
            eprintln!("MEM cycle {:>5}: {}", cycle, instr);
        }
        self.wp_memory_2_writeback.write(instr, cycle);
        Ok(())
    }
}
