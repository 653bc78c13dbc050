//! Register file.
//!
//! This module implements the architectural register file for the pipeline.
//! It performs the following:
//! 1. **Storage:** 32 general-purpose registers plus HI and LO, with `$0` hardwired to zero.
//! 2. **Hazard Tracking:** Per-register in-flight producer counters, reserved at
//!    Decode and released at Writeback or on a flush notification.
//! 3. **Commit Discipline:** At most one architectural commit per register per
//!    cycle, asserted at write time.

use crate::common::reg::{SLOT_COUNT, SLOT_HI, SLOT_LO};
use crate::common::{Cycle, RegId};
use crate::isa::Instr;

/// Architectural register state plus the in-flight scoreboard.
#[derive(Clone)]
pub struct RF {
    gpr: [u32; 32],
    hi: u32,
    lo: u32,
    in_flight: [u32; SLOT_COUNT],
    last_commit: [Cycle; SLOT_COUNT],
}

impl Default for RF {
    fn default() -> Self {
        Self::new()
    }
}

impl RF {
    /// Creates a register file with every register zero and nothing in flight.
    pub fn new() -> Self {
        Self {
            gpr: [0; 32],
            hi: 0,
            lo: 0,
            in_flight: [0; SLOT_COUNT],
            last_commit: [Cycle::MAX; SLOT_COUNT],
        }
    }

    /// Reads a 32-bit register. `$0` and the sentinel read as zero.
    pub fn read(&self, id: RegId) -> u32 {
        match id {
            RegId::Gpr(0) | RegId::None => 0,
            RegId::Gpr(n) => self.gpr[n as usize],
            RegId::Hi => self.hi,
            RegId::Lo => self.lo,
            RegId::HiLo => self.lo,
        }
    }

    /// Reads the {HI:LO} pair as a 64-bit value (HI in the upper half).
    pub fn read_pair(&self) -> u64 {
        self.lo as u64 | ((self.hi as u64) << 32)
    }

    /// Writes a 32-bit register directly. Writes to `$0` are discarded.
    ///
    /// Pair writes go through [`RF::write_dst`]; this entry point serves
    /// initialisation and test setup.
    pub fn write(&mut self, id: RegId, value: u32) {
        match id {
            RegId::Gpr(0) | RegId::None => {}
            RegId::Gpr(n) => self.gpr[n as usize] = value,
            RegId::Hi => self.hi = value,
            RegId::Lo => self.lo = value,
            RegId::HiLo => unreachable!("pair writes commit through write_dst"),
        }
    }

    /// Commits a retiring instruction's result.
    ///
    /// Honors `writes_dst` (cleared by failed conditional moves and untaken
    /// branch-and-links) and the `$0` rule. Pair destinations split the
    /// 64-bit result into LO (low 32) and HI (high 32). Two commits to the
    /// same register in one cycle violate the serialization rule and are
    /// asserted against.
    pub fn write_dst(&mut self, instr: &Instr, cycle: Cycle) {
        if !instr.writes_dst() {
            return;
        }
        let dst = instr.dst();
        for &slot in dst.slots() {
            debug_assert!(
                self.last_commit[slot] != cycle,
                "two commits to slot {} in cycle {}",
                slot,
                cycle
            );
            self.last_commit[slot] = cycle;
        }
        match dst {
            RegId::Gpr(0) | RegId::None => {}
            RegId::Gpr(n) => self.gpr[n as usize] = instr.v_dst() as u32,
            RegId::Hi => self.hi = instr.v_dst() as u32,
            RegId::Lo => self.lo = instr.v_dst() as u32,
            RegId::HiLo => {
                self.lo = instr.v_dst() as u32;
                self.hi = (instr.v_dst() >> 32) as u32;
            }
        }
    }

    /// Reserves a destination: one more in-flight producer for each slot.
    pub fn reserve(&mut self, dst: RegId) {
        if !dst.is_tracked() {
            return;
        }
        for &slot in dst.slots() {
            self.in_flight[slot] += 1;
        }
    }

    /// Releases a reservation at Writeback or on a flush notification.
    pub fn release(&mut self, dst: RegId) {
        if !dst.is_tracked() {
            return;
        }
        for &slot in dst.slots() {
            debug_assert!(self.in_flight[slot] > 0, "release without reservation");
            self.in_flight[slot] -= 1;
        }
    }

    /// True when no producer of `id` is in flight.
    ///
    /// A source read may use the committed value only in this case;
    /// otherwise the value must come through the bypass network.
    pub fn is_clean(&self, id: RegId) -> bool {
        id.slots().iter().all(|&slot| self.in_flight[slot] == 0)
    }

    /// Number of in-flight producers of `id` (pairs report the maximum half).
    pub fn in_flight(&self, id: RegId) -> u32 {
        id.slots()
            .iter()
            .map(|&slot| self.in_flight[slot])
            .max()
            .unwrap_or(0)
    }

    /// Renders the register state for diagnostics.
    pub fn dump(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for i in (0..32).step_by(4) {
            let _ = writeln!(
                out,
                "${:<2}={:#010x} ${:<2}={:#010x} ${:<2}={:#010x} ${:<2}={:#010x}",
                i,
                self.gpr[i],
                i + 1,
                self.gpr[i + 1],
                i + 2,
                self.gpr[i + 2],
                i + 3,
                self.gpr[i + 3]
            );
        }
        let _ = writeln!(out, "hi ={:#010x} lo ={:#010x}", self.hi, self.lo);
        out
    }

    /// In-flight counters indexed by scoreboard slot (HI is 32, LO is 33).
    pub fn in_flight_slots(&self) -> &[u32; SLOT_COUNT] {
        &self.in_flight
    }
}

// Keep the slot constants referenced so the layout stays documented here.
const _: () = assert!(SLOT_HI == 32 && SLOT_LO == 33);
