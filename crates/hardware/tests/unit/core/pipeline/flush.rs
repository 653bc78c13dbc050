//! Flush Protocol Tests — Misprediction Recovery.

use crate::common::encode::*;
use crate::common::harness::TestContext;
use mips_core::config::{BranchPredictorKind, Config};
use mips_core::core::ExitStatus;

fn static_bp_config() -> Config {
    let mut config = Config::default();
    config.pipeline.branch_predictor = BranchPredictorKind::Static;
    config
}

// ══════════════════════════════════════════════════════════
// 1. Squash correctness
// ══════════════════════════════════════════════════════════

#[test]
fn wrong_path_instructions_never_commit() {
    // beq offset 2 jumps over both writes to $5.
    let mut ctx = TestContext::new(&[
        beq(0, 0, 2),
        addiu(5, 0, 1),
        addiu(5, 0, 2),
        halt(),
    ]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(5), 0, "squashed instructions must not write");
    assert_eq!(ctx.sim.executed_instrs(), 2, "only the branch and the halt retire");
    ctx.assert_no_in_flight();
}

#[test]
fn misprediction_costs_exactly_three_slots() {
    // The mispredicting branch resolves at Mem; the three younger slots are
    // annihilated and fetch restarts at the target: the branch retires in
    // cycle 4, the halt in cycle 8, so the run ends after cycle 9.
    let mut ctx = TestContext::new(&[
        beq(0, 0, 2),
        addiu(5, 0, 1),
        addiu(5, 0, 2),
        halt(),
    ]);
    ctx.run_to_halt();
    assert_eq!(ctx.sim.cycle(), 9);
    assert_eq!(ctx.sim.stats().branch_mispredictions, 2, "the branch and the halting jump");
}

#[test]
fn squashed_reservations_are_withdrawn() {
    // The wrong-path instructions reserve $5 and $6 before the flush lands;
    // the flush-notify path must release both, or the later reader of $5
    // would stall forever.
    let mut ctx = TestContext::new(&[
        beq(0, 0, 3),
        addiu(5, 0, 1),
        addiu(6, 0, 2),
        nop(),
        addu(7, 5, 6),
        halt(),
    ]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(7), 0);
    ctx.assert_no_in_flight();
}

// ══════════════════════════════════════════════════════════
// 2. Branch-to-self
// ══════════════════════════════════════════════════════════

#[test]
fn branch_to_itself_runs_to_the_budget() {
    let mut ctx = TestContext::new(&[beq(0, 0, -1)]);
    let status = ctx.run(10).expect("no fatal error");
    assert_eq!(status, ExitStatus::BudgetReached);
    assert_eq!(ctx.sim.executed_instrs(), 10);
}

// ══════════════════════════════════════════════════════════
// 3. Predictor training across a loop
// ══════════════════════════════════════════════════════════

#[test]
fn bimodal_learns_the_loop_branch() {
    // $1 counts 5 down to 0; bne is taken 4 times, then falls through.
    let mut ctx = TestContext::new(&[
        addiu(1, 0, 5),
        addiu(1, 1, -1),
        bne(1, 0, -2),
        halt(),
    ]);
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 0);
    assert_eq!(ctx.sim.executed_instrs(), 12);
    // First bne (direction), last bne (fall-through), and the untrained
    // halting jump; the middle iterations are predicted.
    assert_eq!(ctx.sim.stats().branch_mispredictions, 3);
    assert_eq!(ctx.sim.stats().branches_resolved, 6);
}

#[test]
fn static_predictor_flushes_every_taken_branch() {
    let mut ctx = TestContext::with_config(
        static_bp_config(),
        &[
            addiu(1, 0, 3),
            addiu(1, 1, -1),
            bne(1, 0, -2),
            halt(),
        ],
    );
    ctx.run_to_halt();
    assert_eq!(ctx.get_reg(1), 0);
    // Taken bnes (2) plus the halting jump; the final not-taken bne is the
    // only control transfer the static policy gets right.
    assert_eq!(ctx.sim.stats().branch_mispredictions, 3);
}

#[test]
fn results_are_identical_under_either_predictor() {
    let program = [
        addiu(1, 0, 5),
        addiu(2, 0, 7),
        beq(1, 2, 2), // not taken
        addu(3, 1, 2),
        halt(),
        nop(),
        halt(),
    ];
    let mut bimodal = TestContext::new(&program);
    bimodal.run_to_halt();
    let mut static_bp = TestContext::with_config(static_bp_config(), &program);
    static_bp.run_to_halt();
    assert_eq!(bimodal.get_reg(3), 12);
    assert_eq!(static_bp.get_reg(3), 12, "prediction policy never changes results");
}
