//! Top-level performance simulator.
//!
//! [`PerfSim`] owns the architectural state, the bypassing unit, the branch
//! predictor, the checker, and every inter-stage port. It performs:
//! 1. **Wiring:** Port construction and registry validation before cycle 0.
//! 2. **Clocking:** One call per stage per cycle, in pipeline order.
//! 3. **Supervision:** Retire accounting, halt detection, and the deadlock watchdog.

use crate::common::{Addr, Cycle, SimError};
use crate::config::Config;
use crate::core::bru::{BpUpdate, BranchPredictorWrapper};
use crate::core::bypass::{BypassPacket, BypassingUnit};
use crate::core::checker::Checker;
use crate::core::rf::RF;
use crate::isa::Instr;
use crate::mem::FuncMemory;
use crate::ports::{PortMap, ReadPort, WritePort, PORT_BW, PORT_FANOUT, PORT_LATENCY};
use crate::stats::SimStats;

/// Readers of the global flush signal: Decode, Execute, and Mem itself.
const FLUSHED_STAGES_NUM: u32 = 3;

/// Record sent from Fetch to Decode.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IfId {
    /// Address the word was fetched from.
    pub pc: Addr,
    /// Raw instruction word.
    pub raw: u32,
    /// Fetch-time predicted direction.
    pub predicted_taken: bool,
    /// Fetch-time predicted next PC.
    pub predicted_target: Addr,
}

/// How a completed run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// A jump to PC 0 retired.
    Halted,
    /// The instruction budget was exhausted first.
    BudgetReached,
}

/// The five-stage in-order pipeline simulator.
pub struct PerfSim {
    pub(crate) rf: RF,
    pub(crate) bypass: BypassingUnit,
    pub(crate) bpu: BranchPredictorWrapper,
    pub(crate) mem: FuncMemory,
    pub(crate) checker: Checker,
    pub(crate) stats: SimStats,

    pub(crate) trace: bool,
    deadlock_threshold: u64,

    pub(crate) pc: Addr,
    pub(crate) cycle: Cycle,
    pub(crate) seq: u64,
    pub(crate) executed_instrs: u64,
    pub(crate) last_writeback_cycle: Cycle,
    pub(crate) halted: bool,

    /// True when Fetch issued a word last cycle (governs the stall rewind).
    pub(crate) fetched_last_cycle: bool,
    /// Decode's one-slot replay buffer.
    pub(crate) decode_data: Option<IfId>,

    // Datapath ports.
    pub(crate) wp_fetch_2_decode: WritePort<IfId>,
    pub(crate) rp_fetch_2_decode: ReadPort<IfId>,
    pub(crate) wp_decode_2_execute: WritePort<Instr>,
    pub(crate) rp_decode_2_execute: ReadPort<Instr>,
    pub(crate) wp_execute_2_memory: WritePort<Instr>,
    pub(crate) rp_execute_2_memory: ReadPort<Instr>,
    pub(crate) wp_memory_2_writeback: WritePort<Instr>,
    pub(crate) rp_memory_2_writeback: ReadPort<Instr>,

    // Backward control ports.
    pub(crate) wp_decode_2_fetch_stall: WritePort<bool>,
    pub(crate) rp_decode_2_fetch_stall: ReadPort<bool>,
    pub(crate) wp_memory_2_all_flush: WritePort<bool>,
    pub(crate) rp_decode_flush: ReadPort<bool>,
    pub(crate) rp_execute_flush: ReadPort<bool>,
    pub(crate) rp_memory_flush: ReadPort<bool>,
    pub(crate) wp_memory_2_fetch_target: WritePort<Addr>,
    pub(crate) rp_memory_2_fetch_target: ReadPort<Addr>,
    pub(crate) wp_memory_2_bp_update: WritePort<BpUpdate>,
    pub(crate) rp_memory_2_bp_update: ReadPort<BpUpdate>,

    // Bypass network ports.
    pub(crate) wp_execute_2_bypass: WritePort<BypassPacket>,
    pub(crate) rp_execute_2_bypass: ReadPort<BypassPacket>,
    pub(crate) wp_memory_2_bypass: WritePort<BypassPacket>,
    pub(crate) rp_memory_2_bypass: ReadPort<BypassPacket>,
    pub(crate) wp_execute_flush_notify: WritePort<Instr>,
    pub(crate) rp_execute_flush_notify: ReadPort<Instr>,
    pub(crate) wp_memory_flush_notify: WritePort<Instr>,
    pub(crate) rp_memory_flush_notify: ReadPort<Instr>,
}

impl PerfSim {
    /// Builds the simulator over an already-loaded memory image.
    ///
    /// The checker receives its own copy of the image. Port wiring is
    /// validated here; a malformed graph never reaches cycle 0.
    pub fn new(mem: FuncMemory, config: &Config) -> Result<Self, SimError> {
        let mut ports = PortMap::new();

        let wp_fetch_2_decode = ports.write_port("FETCH_2_DECODE", PORT_BW, PORT_FANOUT);
        let rp_fetch_2_decode = ports.read_port("FETCH_2_DECODE", PORT_LATENCY);
        let wp_decode_2_execute = ports.write_port("DECODE_2_EXECUTE", PORT_BW, PORT_FANOUT);
        let rp_decode_2_execute = ports.read_port("DECODE_2_EXECUTE", PORT_LATENCY);
        let wp_execute_2_memory = ports.write_port("EXECUTE_2_MEMORY", PORT_BW, PORT_FANOUT);
        let rp_execute_2_memory = ports.read_port("EXECUTE_2_MEMORY", PORT_LATENCY);
        let wp_memory_2_writeback = ports.write_port("MEMORY_2_WRITEBACK", PORT_BW, PORT_FANOUT);
        let rp_memory_2_writeback = ports.read_port("MEMORY_2_WRITEBACK", PORT_LATENCY);

        let wp_decode_2_fetch_stall =
            ports.write_port("DECODE_2_FETCH_STALL", PORT_BW, PORT_FANOUT);
        let rp_decode_2_fetch_stall = ports.read_port("DECODE_2_FETCH_STALL", PORT_LATENCY);
        let wp_memory_2_all_flush =
            ports.write_port("MEMORY_2_ALL_FLUSH", PORT_BW, FLUSHED_STAGES_NUM);
        let rp_decode_flush = ports.read_port("MEMORY_2_ALL_FLUSH", PORT_LATENCY);
        let rp_execute_flush = ports.read_port("MEMORY_2_ALL_FLUSH", PORT_LATENCY);
        let rp_memory_flush = ports.read_port("MEMORY_2_ALL_FLUSH", PORT_LATENCY);
        let wp_memory_2_fetch_target =
            ports.write_port("MEMORY_2_FETCH_TARGET", PORT_BW, PORT_FANOUT);
        let rp_memory_2_fetch_target = ports.read_port("MEMORY_2_FETCH_TARGET", PORT_LATENCY);
        let wp_memory_2_bp_update = ports.write_port("MEMORY_2_FETCH", PORT_BW, PORT_FANOUT);
        let rp_memory_2_bp_update = ports.read_port("MEMORY_2_FETCH", PORT_LATENCY);

        let wp_execute_2_bypass = ports.write_port("EXECUTE_2_BYPASS", PORT_BW, PORT_FANOUT);
        let rp_execute_2_bypass = ports.read_port("EXECUTE_2_BYPASS", PORT_LATENCY);
        let wp_memory_2_bypass = ports.write_port("MEMORY_2_BYPASS", PORT_BW, PORT_FANOUT);
        let rp_memory_2_bypass = ports.read_port("MEMORY_2_BYPASS", PORT_LATENCY);
        let wp_execute_flush_notify =
            ports.write_port("EXECUTE_2_BYPASSING_UNIT_FLUSH_NOTIFY", PORT_BW, PORT_FANOUT);
        let rp_execute_flush_notify =
            ports.read_port("EXECUTE_2_BYPASSING_UNIT_FLUSH_NOTIFY", PORT_LATENCY);
        let wp_memory_flush_notify =
            ports.write_port("MEMORY_2_BYPASSING_UNIT_FLUSH_NOTIFY", PORT_BW, PORT_FANOUT);
        let rp_memory_flush_notify =
            ports.read_port("MEMORY_2_BYPASSING_UNIT_FLUSH_NOTIFY", PORT_LATENCY);

        ports.validate()?;

        let start_pc = config.general.start_pc;
        let checker = Checker::new(mem.clone(), start_pc);

        Ok(Self {
            rf: RF::new(),
            bypass: BypassingUnit::new(),
            bpu: BranchPredictorWrapper::new(
                config.pipeline.branch_predictor,
                config.pipeline.btb_size,
            ),
            mem,
            checker,
            stats: SimStats::new(),
            trace: config.general.trace,
            deadlock_threshold: config.pipeline.deadlock_threshold,
            pc: start_pc,
            cycle: 0,
            seq: 0,
            executed_instrs: 0,
            last_writeback_cycle: 0,
            halted: false,
            fetched_last_cycle: false,
            decode_data: None,
            wp_fetch_2_decode,
            rp_fetch_2_decode,
            wp_decode_2_execute,
            rp_decode_2_execute,
            wp_execute_2_memory,
            rp_execute_2_memory,
            wp_memory_2_writeback,
            rp_memory_2_writeback,
            wp_decode_2_fetch_stall,
            rp_decode_2_fetch_stall,
            wp_memory_2_all_flush,
            rp_decode_flush,
            rp_execute_flush,
            rp_memory_flush,
            wp_memory_2_fetch_target,
            rp_memory_2_fetch_target,
            wp_memory_2_bp_update,
            rp_memory_2_bp_update,
            wp_execute_2_bypass,
            rp_execute_2_bypass,
            wp_memory_2_bypass,
            rp_memory_2_bypass,
            wp_execute_flush_notify,
            rp_execute_flush_notify,
            wp_memory_flush_notify,
            rp_memory_flush_notify,
        })
    }

    /// Ingests last cycle's bypass publications and flush notifications.
    ///
    /// Runs before the stages each cycle so that data published at cycle
    /// `c - 1` is visible to Execute at cycle `c`, and so destinations of
    /// squashed instructions are released before Decode checks hazards.
    fn clock_bypass_network(&mut self, cycle: Cycle) {
        if self.rp_execute_2_bypass.is_ready(cycle) {
            let packet = self.rp_execute_2_bypass.read(cycle);
            self.bypass.publish(packet);
        }
        if self.rp_memory_2_bypass.is_ready(cycle) {
            let packet = self.rp_memory_2_bypass.read(cycle);
            self.bypass.publish(packet);
        }
        if self.rp_execute_flush_notify.is_ready(cycle) {
            let instr = self.rp_execute_flush_notify.read(cycle);
            self.rf.release(instr.dst());
            self.bypass.withdraw(&instr);
        }
        if self.rp_memory_flush_notify.is_ready(cycle) {
            let instr = self.rp_memory_flush_notify.read(cycle);
            self.rf.release(instr.dst());
            self.bypass.withdraw(&instr);
        }
    }

    /// Advances the simulation by one clock cycle.
    ///
    /// Stages run in pipeline order; all cross-stage effects travel through
    /// ports with one cycle of latency, so Mem's flush decision in cycle `c`
    /// reaches the younger stages in cycle `c + 1`.
    pub fn tick(&mut self) -> Result<(), SimError> {
        let cycle = self.cycle;
        self.clock_bypass_network(cycle);
        self.clock_fetch(cycle)?;
        self.clock_decode(cycle);
        self.clock_execute(cycle);
        self.clock_memory(cycle)?;
        self.clock_writeback(cycle)?;
        self.stats.cycles += 1;
        self.cycle += 1;
        Ok(())
    }

    /// Runs until a clean halt, the instruction budget, or a fatal error.
    pub fn run(&mut self, instrs_to_run: u64) -> Result<ExitStatus, SimError> {
        while !self.halted && self.executed_instrs < instrs_to_run {
            if self.cycle.saturating_sub(self.last_writeback_cycle) > self.deadlock_threshold {
                return Err(SimError::Deadlock {
                    cycle: self.cycle,
                    last_writeback_cycle: self.last_writeback_cycle,
                    snapshot: self.snapshot(),
                });
            }
            self.tick()?;
        }
        Ok(if self.halted {
            ExitStatus::Halted
        } else {
            ExitStatus::BudgetReached
        })
    }

    /// Renders the supervisor-visible pipeline state for diagnostics.
    pub fn snapshot(&self) -> String {
        let decode = match &self.decode_data {
            Some(d) => format!("{:#010x} (raw {:#010x})", d.pc, d.raw),
            None => "empty".to_string(),
        };
        format!(
            "cycle={} pc={:#010x} retired={} decode_buffer={}\n{}",
            self.cycle,
            self.pc,
            self.executed_instrs,
            decode,
            self.rf.dump()
        )
    }

    // ── accessors ─────────────────────────────────────────

    /// Architectural register file.
    pub fn rf(&self) -> &RF {
        &self.rf
    }

    /// Mutable register access for harness setup and fault injection.
    pub fn rf_mut(&mut self) -> &mut RF {
        &mut self.rf
    }

    /// Functional memory owned by the pipeline.
    pub fn mem(&self) -> &FuncMemory {
        &self.mem
    }

    /// Run statistics so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Instructions retired so far.
    pub fn executed_instrs(&self) -> u64 {
        self.executed_instrs
    }

    /// Current cycle number.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// True once a jump to PC 0 has retired.
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
