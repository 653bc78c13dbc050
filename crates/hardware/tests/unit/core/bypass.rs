//! Bypassing Unit Tests — Scheduling, Publication, and Withdrawal.

use crate::common::encode::*;
use mips_core::common::RegId;
use mips_core::core::bypass::{select_operand, BypassPacket, BypassingUnit};
use mips_core::isa::Instr;

const PC: u32 = 0x0040_0000;

/// A decoded producer with destination taken from `word` and the given tag.
fn producer(word: u32, seq: u64) -> Instr {
    let mut i = Instr::new(word, PC);
    i.set_seq(seq);
    i
}

fn packet(dst: RegId, seq: u64, data: u64) -> BypassPacket {
    BypassPacket { dst, seq, data }
}

// ══════════════════════════════════════════════════════════
// 1. Forwarding schedule
// ══════════════════════════════════════════════════════════

#[test]
fn untracked_sources_have_no_producer() {
    let unit = BypassingUnit::new();
    assert_eq!(unit.forward_tag(RegId::Gpr(4), 10), None);
}

#[test]
fn alu_producer_is_forwardable_immediately() {
    let mut unit = BypassingUnit::new();
    unit.reserve(&producer(addu(5, 1, 2), 7), 10);
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 11), Some(7));
}

#[test]
fn load_producer_needs_a_gap_cycle() {
    let mut unit = BypassingUnit::new();
    unit.reserve(&producer(lw(5, 0, 1), 7), 10);
    assert_eq!(
        unit.forward_tag(RegId::Gpr(5), 11),
        None,
        "back-to-back load use must stall"
    );
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 12), Some(7));
}

#[test]
fn conditional_moves_are_never_forwarded() {
    let mut unit = BypassingUnit::new();
    unit.reserve(&producer(movn(5, 1, 2), 7), 10);
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 15), None);
}

#[test]
fn branch_link_is_never_forwarded() {
    let mut unit = BypassingUnit::new();
    unit.reserve(&producer(bltzal(1, 4), 7), 10);
    assert_eq!(unit.forward_tag(RegId::RA, 15), None);
}

#[test]
fn newest_producer_wins() {
    let mut unit = BypassingUnit::new();
    unit.reserve(&producer(addu(5, 1, 2), 7), 10);
    unit.reserve(&producer(addu(5, 3, 4), 8), 11);
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 12), Some(8));
}

#[test]
fn pair_source_requires_a_single_covering_producer() {
    let mut unit = BypassingUnit::new();
    // mult covers both halves: forwardable.
    unit.reserve(&producer(mult(1, 2), 3), 10);
    assert_eq!(unit.forward_tag(RegId::HiLo, 11), Some(3));

    // Split producers (mthi + mtlo): not forwardable as a pair.
    let mut split = BypassingUnit::new();
    split.reserve(&producer(mthi(1), 4), 10);
    split.reserve(&producer(mtlo(1), 5), 11);
    assert_eq!(split.forward_tag(RegId::HiLo, 12), None);
}

// ══════════════════════════════════════════════════════════
// 2. Publication and value selection
// ══════════════════════════════════════════════════════════

#[test]
fn published_value_is_retrieved_by_tag() {
    let mut unit = BypassingUnit::new();
    unit.publish(packet(RegId::Gpr(5), 7, 0x1234));
    assert_eq!(unit.value_for(RegId::Gpr(5), 7), Some(0x1234));
    assert_eq!(unit.value_for(RegId::Gpr(5), 8), None, "stale tag misses");
}

#[test]
fn newer_tag_displaces_older_but_not_vice_versa() {
    let mut unit = BypassingUnit::new();
    unit.publish(packet(RegId::Gpr(5), 7, 0xAAAA));
    unit.publish(packet(RegId::Gpr(5), 8, 0xBBBB));
    assert_eq!(unit.value_for(RegId::Gpr(5), 8), Some(0xBBBB));
    unit.publish(packet(RegId::Gpr(5), 7, 0xAAAA)); // late republish
    assert_eq!(unit.value_for(RegId::Gpr(5), 8), Some(0xBBBB));
}

#[test]
fn pair_publication_serves_both_halves() {
    let mut unit = BypassingUnit::new();
    // A mult result: HI=2, LO=3 in pair view.
    unit.publish(packet(RegId::HiLo, 7, (2u64 << 32) | 3));
    let hi = unit.value_for(RegId::Hi, 7).unwrap();
    let lo = unit.value_for(RegId::Lo, 7).unwrap();
    assert_eq!(select_operand(RegId::Hi, hi), 2);
    assert_eq!(select_operand(RegId::Lo, lo), 3);
    assert_eq!(unit.value_for(RegId::HiLo, 7), Some((2u64 << 32) | 3));
}

#[test]
fn hi_only_producer_parks_its_value_high() {
    let mut unit = BypassingUnit::new();
    let mut mthi_instr = Instr::new(mthi(1), PC);
    mthi_instr.set_seq(9);
    mthi_instr.set_v_src(0x77, 0);
    mthi_instr.execute();
    unit.publish(packet(RegId::Hi, 9, mthi_instr.bypass_data()));
    let data = unit.value_for(RegId::Hi, 9).unwrap();
    assert_eq!(select_operand(RegId::Hi, data), 0x77);
}

// ══════════════════════════════════════════════════════════
// 3. Release and withdrawal
// ══════════════════════════════════════════════════════════

#[test]
fn release_clears_the_producer_entry() {
    let mut unit = BypassingUnit::new();
    let p = producer(addu(5, 1, 2), 7);
    unit.reserve(&p, 10);
    unit.release(&p);
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 12), None);
}

#[test]
fn release_keeps_newer_reservations() {
    let mut unit = BypassingUnit::new();
    let old = producer(addu(5, 1, 2), 7);
    let new = producer(addu(5, 3, 4), 8);
    unit.reserve(&old, 10);
    unit.reserve(&new, 11);
    unit.release(&old); // retiring the old one must not drop the new one
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 12), Some(8));
}

#[test]
fn withdraw_drops_producer_and_value() {
    let mut unit = BypassingUnit::new();
    let p = producer(addu(5, 1, 2), 7);
    unit.reserve(&p, 10);
    unit.publish(packet(RegId::Gpr(5), 7, 0x1234));
    unit.withdraw(&p);
    assert_eq!(unit.forward_tag(RegId::Gpr(5), 12), None);
    assert_eq!(unit.value_for(RegId::Gpr(5), 7), None, "flushed data is gone");
}
