//! Execute (EX) stage.
//!
//! Patches any operands promised by the bypass network, runs the executor,
//! and forwards the instruction to Mem. Results that will be committed are
//! published on the Execute bypass port. On a flush the incoming wrong-path
//! instruction is dropped after its reserved destination is reported for
//! release.

use log::debug;

use crate::common::Cycle;
use crate::core::bypass::{select_operand, BypassPacket};
use crate::core::perf_sim::PerfSim;
use crate::isa::instr::SRC_COUNT;

impl PerfSim {
    pub(crate) fn clock_execute(&mut self, cycle: Cycle) {
        if self.rp_execute_flush.is_ready(cycle) && self.rp_execute_flush.read(cycle) {
            if self.rp_decode_2_execute.is_ready(cycle) {
                let instr = self.rp_decode_2_execute.read(cycle);
                self.wp_execute_flush_notify.write(instr, cycle);
            }
            if self.trace {
                eprintln!("EX  cycle {:>5}: flush", cycle);
            }
            return;
        }

        if !self.rp_decode_2_execute.is_ready(cycle) {
            if self.trace {
                eprintln!("EX  cycle {:>5}: bubble", cycle);
            }
            return;
        }
        let mut instr = self.rp_decode_2_execute.read(cycle);

        // Last-cycle bypass data is in the unit's store by now; the schedule
        // set up at Decode guarantees the tag is present.
        for idx in 0..SRC_COUNT {
            if let Some(tag) = instr.bypass_from(idx) {
                let src = instr.src(idx);
                let data = self
                    .bypass
                    .value_for(src, tag)
                    .expect("bypass value promised at decode is missing");
                debug!(
                    "execute: pc={:#010x} src{} ({}) <- bypass {:#x}",
                    instr.pc(),
                    idx,
                    src,
                    data
                );
                if idx < 2 {
                    instr.set_v_src(select_operand(src, data), idx);
                } else {
                    instr.set_v_src_pair(data);
                }
            }
        }

        instr.execute();

        if instr.writes_dst()
            && instr.dst().is_tracked()
            && !instr.is_load()
            && !instr.is_conditional_move()
        {
            self.wp_execute_2_bypass.write(
                BypassPacket {
                    dst: instr.dst(),
                    seq: instr.seq(),
                    data: instr.bypass_data(),
                },
                cycle,
            );
        }

        if self.trace {
            eprintln!("EX  cycle {:>5}: {}", cycle, instr);
        }
        self.wp_execute_2_memory.write(instr, cycle);
    }
}
