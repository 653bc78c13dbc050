//! Instruction Fetch (IF) stage.
//!
//! Reads a word from functional memory at the current (or predicted) PC and
//! sends it to Decode together with the prediction that produced it. Honors
//! two backward signals: the Decode stall (hold the PC) and the Mem flush
//! target (redirect and restart the stream).

use crate::common::{Cycle, SimError};
use crate::core::bru::BranchPredictor;
use crate::core::perf_sim::{IfId, PerfSim};

impl PerfSim {
    pub(crate) fn clock_fetch(&mut self, cycle: Cycle) -> Result<(), SimError> {
        // Train the predictor with outcomes resolved last cycle.
        if self.rp_memory_2_bp_update.is_ready(cycle) {
            let update = self.rp_memory_2_bp_update.read(cycle);
            self.bpu.update(update.pc, update.target, update.taken);
        }

        if self.rp_memory_2_fetch_target.is_ready(cycle) {
            // Misprediction recovery: restart the stream at the real target.
            let target = self.rp_memory_2_fetch_target.read(cycle);
            self.pc = target;
            self.fetched_last_cycle = false;
            if self.trace {
                eprintln!("IF  cycle {:>5}: redirect to {:#010x}", cycle, target);
            }
        } else if self.rp_decode_2_fetch_stall.is_ready(cycle)
            && self.rp_decode_2_fetch_stall.read(cycle)
        {
            // The word issued last cycle expires unread in the port; rewind
            // over it so it is refetched once the stall clears.
            if self.fetched_last_cycle {
                self.pc = self.pc.wrapping_sub(4);
            }
            self.fetched_last_cycle = false;
            if self.trace {
                eprintln!("IF  cycle {:>5}: stall (pc={:#010x})", cycle, self.pc);
            }
            return Ok(());
        }

        if self.pc == 0 {
            // Halt frontier: let the pipeline drain.
            self.fetched_last_cycle = false;
            if self.trace {
                eprintln!("IF  cycle {:>5}: bubble", cycle);
            }
            return Ok(());
        }

        let raw = self.mem.fetch_word(self.pc)?;
        let (predicted_taken, predicted_target) = self.bpu.predict(self.pc);

        if self.trace {
            eprintln!(
                "IF  cycle {:>5}: pc={:#010x} raw={:#010x} pred={}{}",
                cycle,
                self.pc,
                raw,
                if predicted_taken { "T->" } else { "NT" },
                if predicted_taken {
                    format!("{:#010x}", predicted_target)
                } else {
                    String::new()
                }
            );
        }

        self.wp_fetch_2_decode.write(
            IfId {
                pc: self.pc,
                raw,
                predicted_taken,
                predicted_target,
            },
            cycle,
        );

        self.pc = if predicted_taken {
            predicted_target
        } else {
            self.pc.wrapping_add(4)
        };
        self.fetched_last_cycle = true;
        Ok(())
    }
}
