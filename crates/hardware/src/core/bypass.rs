//! Bypassing (forwarding) unit.
//!
//! This module tracks the producers of in-flight destinations and the values
//! they have published on the bypass network. It provides:
//! 1. **Reservation:** Decode registers the newest producer of each destination.
//! 2. **Publication:** Execute and Mem results arrive (through the bypass
//!    ports) keyed by (register, tag); newest tag wins.
//! 3. **Scheduling:** Decode asks whether a source will be forwardable by the
//!    time the consumer executes, or must stall instead.
//! 4. **Withdrawal:** Flush notifications release entries owned by squashed
//!    instructions by tag.

use std::collections::HashMap;

use crate::common::{Cycle, RegId};
use crate::isa::Instr;

/// A bypass-network payload: a producer's result in {HI:LO} pair view.
#[derive(Clone, Copy, Debug)]
pub struct BypassPacket {
    /// Destination register of the producer.
    pub dst: RegId,
    /// Producer's decode tag.
    pub seq: u64,
    /// Result in pair view (see [`Instr::bypass_data`]).
    pub data: u64,
}

#[derive(Clone, Copy, Debug)]
struct Producer {
    seq: u64,
    decode_cycle: Cycle,
    is_load: bool,
    /// MOVN/MOVZ and branch-and-link decide at Execute whether they write;
    /// their results are never forwarded.
    conditional_write: bool,
}

/// Forwarding state, keyed by scoreboard slot.
#[derive(Default)]
pub struct BypassingUnit {
    producers: HashMap<usize, Producer>,
    values: HashMap<usize, (u64, u64)>,
}

impl BypassingUnit {
    /// Creates an empty unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `instr` as the newest in-flight producer of its destination.
    pub fn reserve(&mut self, instr: &Instr, decode_cycle: Cycle) {
        let dst = instr.dst();
        if !dst.is_tracked() {
            return;
        }
        let producer = Producer {
            seq: instr.seq(),
            decode_cycle,
            is_load: instr.is_load(),
            conditional_write: instr.is_conditional_move() || instr.class() == crate::isa::OpClass::RiBranchLink,
        };
        for &slot in dst.slots() {
            self.producers.insert(slot, producer);
        }
    }

    /// Decides whether a source read can be satisfied by forwarding.
    ///
    /// Returns the producer tag the consumer should wait for, or `None` when
    /// the consumer has to stall until the producer commits. Timing: a
    /// non-load result published at the producer's Execute is in the value
    /// store one cycle later, which is exactly the earliest consumer's
    /// Execute; a load result is one stage (one decode cycle) later. Pair
    /// sources are forwardable only when a single producer covers both
    /// halves.
    pub fn forward_tag(&self, src: RegId, decode_cycle: Cycle) -> Option<u64> {
        let slots = src.slots();
        let first = self.producers.get(slots.first()?)?;
        for slot in &slots[1..] {
            match self.producers.get(slot) {
                Some(p) if p.seq == first.seq => {}
                _ => return None,
            }
        }
        if first.conditional_write {
            return None;
        }
        if first.is_load && decode_cycle < first.decode_cycle + 2 {
            return None;
        }
        Some(first.seq)
    }

    /// Stores a published result; older tags never displace newer ones.
    pub fn publish(&mut self, packet: BypassPacket) {
        for &slot in packet.dst.slots() {
            match self.values.get(&slot) {
                Some(&(seq, _)) if seq > packet.seq => {}
                _ => {
                    self.values.insert(slot, (packet.seq, packet.data));
                }
            }
        }
    }

    /// Fetches the value a consumer was promised, if the expected tag holds it.
    ///
    /// The returned value is in pair view; select with [`select_operand`].
    pub fn value_for(&self, src: RegId, expected_seq: u64) -> Option<u64> {
        let slot = src.slots().first().copied()?;
        match self.values.get(&slot) {
            Some(&(seq, data)) if seq == expected_seq => Some(data),
            _ => None,
        }
    }

    /// Drops the producer entry at Writeback (the value store keeps the
    /// published data; consumers decoded after retirement read the register
    /// file instead).
    pub fn release(&mut self, instr: &Instr) {
        self.remove_by_tag(instr, false);
    }

    /// Withdraws everything owned by a flushed instruction.
    pub fn withdraw(&mut self, instr: &Instr) {
        self.remove_by_tag(instr, true);
    }

    fn remove_by_tag(&mut self, instr: &Instr, drop_values: bool) {
        let dst = instr.dst();
        if !dst.is_tracked() {
            return;
        }
        for &slot in dst.slots() {
            if self.producers.get(&slot).is_some_and(|p| p.seq == instr.seq()) {
                self.producers.remove(&slot);
            }
            if drop_values && self.values.get(&slot).is_some_and(|&(s, _)| s == instr.seq()) {
                self.values.remove(&slot);
            }
        }
    }
}

/// Extracts a 32-bit operand from a pair-view bypass value.
///
/// HI consumers take the upper half, everything else the lower half; pair
/// consumers use the full value directly.
pub fn select_operand(src: RegId, data: u64) -> u32 {
    if src == RegId::Hi {
        (data >> 32) as u32
    } else {
        data as u32
    }
}
