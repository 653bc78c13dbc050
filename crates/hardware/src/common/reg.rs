//! MIPS register identifiers.
//!
//! This module defines the tagged register id used throughout the pipeline.
//! It provides:
//! 1. **Identification:** One value covering the 32 GPRs, HI, LO, the HI:LO pair, and "no register".
//! 2. **Predicates:** Identity checks (`is_zero`, `is_hi`, `is_lo`) used by decode and bypassing.
//! 3. **Slots:** Expansion of an id into the scoreboard slots it occupies.

use std::fmt;

/// ABI names for the 32 general-purpose registers.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Number of scoreboard slots: 32 GPRs plus HI and LO.
pub const SLOT_COUNT: usize = 34;

/// Scoreboard slot index of HI.
pub const SLOT_HI: usize = 32;
/// Scoreboard slot index of LO.
pub const SLOT_LO: usize = 33;

/// A tagged register identifier.
///
/// Covers the 32 general-purpose registers, the HI and LO multiply/divide
/// halves, the HI:LO pair written atomically by MULT/DIV/MADD/MSUB, and a
/// sentinel for "no register". GPR 0 reads as zero and ignores writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RegId {
    /// General-purpose register `$0`–`$31`.
    Gpr(u8),
    /// The HI half of the multiply/divide result pair.
    Hi,
    /// The LO half of the multiply/divide result pair.
    Lo,
    /// Both halves, written together ({HI = high 32, LO = low 32} of a 64-bit value).
    HiLo,
    /// No register at all.
    #[default]
    None,
}

impl RegId {
    /// The hardwired zero register `$0`.
    pub const ZERO: RegId = RegId::Gpr(0);
    /// The link register `$ra`.
    pub const RA: RegId = RegId::Gpr(31);

    /// True for the hardwired zero register.
    #[inline]
    pub fn is_zero(self) -> bool {
        self == RegId::Gpr(0)
    }

    /// True for HI (alone or as part of the pair).
    #[inline]
    pub fn is_hi(self) -> bool {
        matches!(self, RegId::Hi | RegId::HiLo)
    }

    /// True for LO (alone or as part of the pair).
    #[inline]
    pub fn is_lo(self) -> bool {
        matches!(self, RegId::Lo | RegId::HiLo)
    }

    /// True for the "no register" sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self == RegId::None
    }

    /// True when reading or writing this id touches architectural state.
    ///
    /// `$0` and the sentinel are excluded: neither participates in hazard
    /// tracking or bypassing.
    #[inline]
    pub fn is_tracked(self) -> bool {
        !self.is_none() && !self.is_zero()
    }

    /// Scoreboard slots occupied by this id.
    ///
    /// The pair occupies both the HI and LO slots so a MULT in flight blocks
    /// both MFHI and MFLO consumers.
    pub fn slots(self) -> &'static [usize] {
        static GPR_SLOTS: [[usize; 1]; 32] = {
            let mut s = [[0usize; 1]; 32];
            let mut i = 0;
            while i < 32 {
                s[i] = [i];
                i += 1;
            }
            s
        };
        match self {
            RegId::Gpr(n) => &GPR_SLOTS[n as usize],
            RegId::Hi => &[SLOT_HI],
            RegId::Lo => &[SLOT_LO],
            RegId::HiLo => &[SLOT_HI, SLOT_LO],
            RegId::None => &[],
        }
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegId::Gpr(n) => write!(f, "${}", GPR_NAMES[*n as usize]),
            RegId::Hi => write!(f, "$hi"),
            RegId::Lo => write!(f, "$lo"),
            RegId::HiLo => write!(f, "$hi:$lo"),
            RegId::None => write!(f, "-"),
        }
    }
}
