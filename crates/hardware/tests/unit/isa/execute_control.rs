//! Execute Tests — Branches, Jumps, Links, and Traps.
//!
//! Pins the control-flow semantics: the branch target formula, the link
//! capture order for JAL/JALR, halt detection, and the trap-if family.

use crate::common::encode::*;
use mips_core::isa::Instr;

const PC: u32 = 0x0040_0000;

fn exec2(word: u32, s1: u32, s2: u32) -> Instr {
    let mut i = Instr::new(word, PC);
    i.set_v_src(s1, 0);
    i.set_v_src(s2, 1);
    i.execute();
    i
}

// ══════════════════════════════════════════════════════════
// 1. Branches
// ══════════════════════════════════════════════════════════

#[test]
fn taken_branch_adds_scaled_displacement_to_fallthrough() {
    let i = exec2(beq(1, 2, 3), 9, 9);
    assert!(i.is_jump_taken());
    assert_eq!(i.new_pc(), PC + 4 + 3 * 4, "new_PC = PC + 4 + imm*4");
}

#[test]
fn untaken_branch_falls_through() {
    let i = exec2(beq(1, 2, 3), 9, 8);
    assert!(!i.is_jump_taken());
    assert_eq!(i.new_pc(), PC + 4);
}

#[test]
fn branch_with_minus_one_displacement_targets_itself() {
    let i = exec2(beq(0, 0, -1), 0, 0);
    assert!(i.is_jump_taken());
    assert_eq!(i.new_pc(), PC, "offset -1 cancels the +4");
}

#[test]
fn zero_compare_branches() {
    assert!(exec2(blez(1, 2), 0, 0).is_jump_taken());
    assert!(exec2(blez(1, 2), (-3i32) as u32, 0).is_jump_taken());
    assert!(!exec2(blez(1, 2), 1, 0).is_jump_taken());
    assert!(exec2(bltz(1, 2), (-1i32) as u32, 0).is_jump_taken());
    assert!(!exec2(bltz(1, 2), 0, 0).is_jump_taken());
}

// ══════════════════════════════════════════════════════════
// 2. Branch-and-link
// ══════════════════════════════════════════════════════════

#[test]
fn branch_link_taken_links_return_address() {
    let i = exec2(bltzal(1, 4), (-1i32) as u32, 0);
    assert!(i.is_jump_taken());
    assert!(i.writes_dst());
    assert_eq!(i.v_dst() as u32, PC + 4, "link value is PC + 4");
    assert_eq!(i.new_pc(), PC + 4 + 16);
}

#[test]
fn branch_link_untaken_does_not_link() {
    let i = exec2(bltzal(1, 4), 5, 0);
    assert!(!i.is_jump_taken());
    assert!(!i.writes_dst(), "no link when the branch is not taken");
    assert_eq!(i.new_pc(), PC + 4);
}

// ══════════════════════════════════════════════════════════
// 3. Jumps
// ══════════════════════════════════════════════════════════

#[test]
fn j_composes_target_from_region_and_index() {
    let i = exec2(j(0x0040_0100), 0, 0);
    assert!(i.is_jump_taken());
    assert_eq!(i.new_pc(), (PC & 0xF000_0000) | 0x0040_0100);
}

#[test]
fn jal_captures_link_before_the_target() {
    let i = exec2(jal(0x0040_0100), 0, 0);
    assert_eq!(i.v_dst() as u32, PC + 4);
    assert_eq!(i.new_pc(), 0x0040_0100);
}

#[test]
fn jr_aligns_the_target_down_to_a_word() {
    let i = exec2(jr(31), 0x0040_0103, 0);
    assert_eq!(i.new_pc(), 0x0040_0100);
}

#[test]
fn jalr_links_and_jumps_through_a_register() {
    let i = exec2(jalr(5, 31), 0x0040_0200, 0);
    assert_eq!(i.v_dst() as u32, PC + 4);
    assert_eq!(i.new_pc(), 0x0040_0200);
}

#[test]
fn jump_to_zero_is_the_halt_condition() {
    let i = exec2(j(0), 0, 0);
    assert!(i.is_halt(), "is_halt <=> jump with new_PC == 0");
    let other = exec2(j(0x0040_0100), 0, 0);
    assert!(!other.is_halt());
    let arith = exec2(addu(3, 1, 2), 0, 0);
    assert!(!arith.is_halt(), "non-jumps never halt");
}

#[test]
fn non_jump_keeps_sequential_new_pc() {
    let i = exec2(addu(3, 1, 2), 1, 2);
    assert_eq!(i.new_pc(), PC + 4);
}

// ══════════════════════════════════════════════════════════
// 4. Misprediction detection
// ══════════════════════════════════════════════════════════

#[test]
fn correct_prediction_is_not_a_misprediction() {
    let mut i = Instr::new(beq(0, 0, 3), PC);
    i.set_prediction(true, PC + 4 + 12);
    i.execute();
    assert!(!i.is_misprediction());
}

#[test]
fn wrong_direction_is_a_misprediction() {
    let mut i = Instr::new(beq(0, 0, 3), PC);
    i.set_prediction(false, PC + 4);
    i.execute();
    assert!(i.is_misprediction());
}

#[test]
fn wrong_target_is_a_misprediction() {
    let mut i = Instr::new(beq(0, 0, 3), PC);
    i.set_prediction(true, PC + 8);
    i.execute();
    assert!(i.is_misprediction(), "taken with the wrong target still flushes");
}

// ══════════════════════════════════════════════════════════
// 5. Traps
// ══════════════════════════════════════════════════════════

#[test]
fn teq_traps_when_equal() {
    assert!(exec2(teq(1, 2), 7, 7).has_trap());
    assert!(!exec2(teq(1, 2), 7, 8).has_trap());
}

#[test]
fn syscall_and_break_are_noops_at_execute() {
    let i = exec2(syscall(), 0, 0);
    assert!(!i.has_trap());
    assert_eq!(i.new_pc(), PC + 4);
}
