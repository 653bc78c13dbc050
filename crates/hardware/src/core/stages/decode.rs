//! Instruction Decode (ID) stage.
//!
//! Holds a one-slot replay buffer so a stalled instruction can be retried.
//! Decodes the fetched word, resolves source operands against the register
//! file and the bypass schedule, reserves the destination, and emits the
//! instruction to Execute. When a source is in flight and not forwardable,
//! asserts the stall signal back to Fetch and keeps the instruction.

use log::debug;

use crate::common::Cycle;
use crate::core::perf_sim::PerfSim;
use crate::isa::instr::SRC_COUNT;
use crate::isa::Instr;

impl PerfSim {
    pub(crate) fn clock_decode(&mut self, cycle: Cycle) {
        if self.rp_decode_flush.is_ready(cycle) && self.rp_decode_flush.read(cycle) {
            // Wrong-path word; nothing here was reserved yet.
            self.decode_data = None;
            if self.trace {
                eprintln!("ID  cycle {:>5}: flush", cycle);
            }
            return;
        }

        // Refill the buffer only when empty; an unread port word expires on
        // its own and is refetched thanks to the stall rewind.
        if self.decode_data.is_none() && self.rp_fetch_2_decode.is_ready(cycle) {
            self.decode_data = Some(self.rp_fetch_2_decode.read(cycle));
        }

        let Some(data) = self.decode_data else {
            if self.trace {
                eprintln!("ID  cycle {:>5}: bubble", cycle);
            }
            return;
        };

        let mut instr = Instr::new(data.raw, data.pc);
        instr.set_prediction(data.predicted_taken, data.predicted_target);

        for idx in 0..SRC_COUNT {
            let src = instr.src(idx);
            if src.is_none() {
                continue;
            }
            if self.rf.is_clean(src) {
                if idx < 2 {
                    instr.set_v_src(self.rf.read(src), idx);
                } else {
                    instr.set_v_src_pair(self.rf.read_pair());
                }
            } else if let Some(tag) = self.bypass.forward_tag(src, cycle) {
                debug!(
                    "decode: pc={:#010x} src{} ({}) waits on bypass tag {}",
                    data.pc, idx, src, tag
                );
                instr.set_bypass_from(idx, tag);
            } else {
                // In flight and not forwardable: hold the instruction and
                // stop Fetch.
                self.stats.stalls_data += 1;
                self.wp_decode_2_fetch_stall.write(true, cycle);
                if self.trace {
                    eprintln!("ID  cycle {:>5}: stall on {} ({})", cycle, src, instr);
                }
                return;
            }
        }

        instr.set_seq(self.seq);
        self.seq += 1;
        self.rf.reserve(instr.dst());
        self.bypass.reserve(&instr, cycle);

        if self.trace {
            eprintln!("ID  cycle {:>5}: {}", cycle, instr);
        }
        self.wp_decode_2_execute.write(instr, cycle);
        self.decode_data = None;
    }
}
