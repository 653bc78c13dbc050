//! Tests for the shared scalar helpers and register identifiers.

use mips_core::common::reg::{SLOT_HI, SLOT_LO};
use mips_core::common::{bitmask, sign_extend, zero_extend, RegId};

// ══════════════════════════════════════════════════════════
// 1. Bit helpers
// ══════════════════════════════════════════════════════════

#[test]
fn bitmask_edges() {
    assert_eq!(bitmask(0), 0);
    assert_eq!(bitmask(8), 0xFF);
    assert_eq!(bitmask(24), 0x00FF_FFFF);
    assert_eq!(bitmask(32), 0xFFFF_FFFF);
}

#[test]
fn sign_and_zero_extension() {
    assert_eq!(sign_extend(0x8000), 0xFFFF_8000);
    assert_eq!(sign_extend(0x7FFF), 0x0000_7FFF);
    assert_eq!(sign_extend(0xFFFF), 0xFFFF_FFFF);
    assert_eq!(zero_extend(0x8000), 0x0000_8000);
}

// ══════════════════════════════════════════════════════════
// 2. Register identity predicates
// ══════════════════════════════════════════════════════════

#[test]
fn identity_predicates() {
    assert!(RegId::ZERO.is_zero());
    assert!(!RegId::Gpr(1).is_zero());
    assert!(RegId::Hi.is_hi());
    assert!(RegId::HiLo.is_hi());
    assert!(RegId::HiLo.is_lo());
    assert!(!RegId::Hi.is_lo());
    assert!(RegId::None.is_none());
}

#[test]
fn tracking_excludes_zero_and_sentinel() {
    assert!(!RegId::ZERO.is_tracked());
    assert!(!RegId::None.is_tracked());
    assert!(RegId::Gpr(31).is_tracked());
    assert!(RegId::Hi.is_tracked());
    assert!(RegId::HiLo.is_tracked());
}

#[test]
fn pair_occupies_both_scoreboard_slots() {
    assert_eq!(RegId::HiLo.slots(), &[SLOT_HI, SLOT_LO]);
    assert_eq!(RegId::Hi.slots(), &[SLOT_HI]);
    assert_eq!(RegId::Gpr(7).slots(), &[7]);
    assert!(RegId::None.slots().is_empty());
}

#[test]
fn display_uses_abi_names() {
    assert_eq!(RegId::ZERO.to_string(), "$zero");
    assert_eq!(RegId::Gpr(31).to_string(), "$ra");
    assert_eq!(RegId::Hi.to_string(), "$hi");
}
