//! Functional Simulator Tests — Architectural Stepping.

use crate::common::encode::*;
use mips_core::common::RegId;
use mips_core::core::FuncSim;
use mips_core::mem::FuncMemory;

const BASE: u32 = 0x0040_0000;

fn sim_with(program: &[u32]) -> FuncSim {
    let mut mem = FuncMemory::new(BASE, 0x10000);
    for (i, word) in program.iter().enumerate() {
        mem.write(BASE + (i as u32) * 4, 4, *word).unwrap();
    }
    FuncSim::new(mem, BASE)
}

#[test]
fn steps_follow_the_program_order() {
    let mut sim = sim_with(&[addiu(1, 0, 5), addiu(2, 1, 3)]);
    let first = sim.step().unwrap();
    assert_eq!(first.pc(), BASE);
    assert_eq!(sim.pc(), BASE + 4);
    sim.step().unwrap();
    assert_eq!(sim.rf().read(RegId::Gpr(1)), 5);
    assert_eq!(sim.rf().read(RegId::Gpr(2)), 8, "second step sees the first commit");
}

#[test]
fn taken_branch_moves_the_pc() {
    let mut sim = sim_with(&[beq(0, 0, 3)]);
    sim.step().unwrap();
    assert_eq!(sim.pc(), BASE + 4 + 12);
}

#[test]
fn loads_and_stores_hit_its_own_memory() {
    let mut sim = sim_with(&[
        lui(1, 0x40),          // $1 = 0x0040_0000
        addiu(2, 0, 77),
        sw(2, 0x100, 1),
        lw(3, 0x100, 1),
    ]);
    for _ in 0..4 {
        sim.step().unwrap();
    }
    assert_eq!(sim.rf().read(RegId::Gpr(3)), 77);
}

#[test]
fn hi_lo_flow_through_mult_and_moves() {
    let mut sim = sim_with(&[
        addiu(1, 0, 6),
        addiu(2, 0, 7),
        mult(1, 2),
        mflo(3),
        mfhi(4),
    ]);
    for _ in 0..5 {
        sim.step().unwrap();
    }
    assert_eq!(sim.rf().read(RegId::Gpr(3)), 42);
    assert_eq!(sim.rf().read(RegId::Gpr(4)), 0);
}
