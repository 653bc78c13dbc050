use mips_core::common::{RegId, SimError};
use mips_core::core::ExitStatus;
use mips_core::{Config, FuncMemory, PerfSim};

/// Default program placement: the memory base / entry point.
pub const BASE: u32 = 0x0040_0000;

pub struct TestContext {
    pub sim: PerfSim,
}

impl TestContext {
    /// Loads `program` at the entry point and builds the simulator.
    pub fn new(program: &[u32]) -> Self {
        Self::with_config(Config::default(), program)
    }

    /// Like [`TestContext::new`] with an explicit configuration.
    pub fn with_config(config: Config, program: &[u32]) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut mem = FuncMemory::new(config.memory.base, config.memory.size);
        for (i, word) in program.iter().enumerate() {
            let addr = config.general.start_pc + (i as u32) * 4;
            mem.write(addr, 4, *word).expect("program fits in memory");
        }
        let sim = PerfSim::new(mem, &config).expect("port wiring is valid");
        Self { sim }
    }

    /// Reads a general-purpose register.
    pub fn get_reg(&self, n: u8) -> u32 {
        self.sim.rf().read(RegId::Gpr(n))
    }

    /// Overwrites a register in the pipeline's register file only.
    ///
    /// The checker is not told, so a later consumer of the register makes
    /// the two models diverge; used by the divergence tests.
    pub fn poke_reg(&mut self, n: u8, value: u32) {
        self.sim.rf_mut().write(RegId::Gpr(n), value);
    }

    /// Runs until halt, the given retire budget, or an error.
    pub fn run(&mut self, instrs: u64) -> Result<ExitStatus, SimError> {
        self.sim.run(instrs)
    }

    /// Runs to the clean halt and asserts it was reached.
    pub fn run_to_halt(&mut self) {
        match self.sim.run(u64::MAX) {
            Ok(ExitStatus::Halted) => {}
            other => panic!("expected clean halt, got {:?}", other),
        }
    }

    /// Asserts that no destination reservation is still outstanding.
    pub fn assert_no_in_flight(&self) {
        assert!(
            self.sim.rf().in_flight_slots().iter().all(|&c| c == 0),
            "in-flight producer counters must drain to zero"
        );
    }
}
