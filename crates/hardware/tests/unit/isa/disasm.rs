//! Disassembler smoke tests.

use crate::common::encode::*;
use mips_core::isa::disasm::disassemble;
use mips_core::isa::Instr;

const PC: u32 = 0x0040_0000;

fn dis(word: u32) -> String {
    disassemble(&Instr::new(word, PC))
}

#[test]
fn r_format() {
    assert_eq!(dis(addu(2, 4, 5)), "addu $v0, $a0, $a1");
    assert_eq!(dis(sll(2, 4, 3)), "sll $v0, $a0, 3");
    assert_eq!(dis(jr(31)), "jr $ra");
    assert_eq!(dis(mfhi(8)), "mfhi $t0");
    assert_eq!(dis(mult(4, 5)), "mult $a0, $a1");
}

#[test]
fn i_format() {
    assert_eq!(dis(addiu(1, 0, 5)), "addiu $at, $zero, 5");
    assert_eq!(dis(addiu(1, 0, -5)), "addiu $at, $zero, -5");
    assert_eq!(dis(lui(2, 0x1)), "lui $v0, 0x1");
    assert_eq!(dis(beq(0, 0, 1)), "beq $zero, $zero, 1");
    assert_eq!(dis(lw(8, -4, 29)), "lw $t0, -4($sp)");
    assert_eq!(dis(sw(8, 8, 29)), "sw $t0, 8($sp)");
}

#[test]
fn j_format_shows_the_absolute_target() {
    assert_eq!(dis(j(0x0040_0100)), "j 0x400100");
    assert_eq!(dis(jal(0x0040_0100)), "jal 0x400100");
}

#[test]
fn unknown_shows_the_raw_word() {
    assert_eq!(dis(0xFC00_0000), "unknown 0xfc000000");
}

#[test]
fn display_prefixes_the_pc() {
    let i = Instr::new(addu(2, 4, 5), PC);
    assert_eq!(i.to_string(), "0x00400000: addu $v0, $a0, $a1");
}
