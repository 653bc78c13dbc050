//! Functional (architectural) simulator.
//!
//! Executes one instruction per step against its own register file and its
//! own copy of memory, with none of the pipeline machinery. It serves two
//! roles:
//! 1. **Oracle:** The checker steps it in lockstep with Writeback.
//! 2. **Reference:** A standalone architectural model for tests.

use crate::common::{Addr, Cycle, SimError};
use crate::core::rf::RF;
use crate::isa::Instr;
use crate::mem::FuncMemory;

/// Single-step architectural simulator.
#[derive(Clone)]
pub struct FuncSim {
    pc: Addr,
    rf: RF,
    mem: FuncMemory,
    steps: Cycle,
}

impl FuncSim {
    /// Creates a functional simulator over its own memory image.
    pub fn new(mem: FuncMemory, start_pc: Addr) -> Self {
        Self {
            pc: start_pc,
            rf: RF::new(),
            mem,
            steps: 0,
        }
    }

    /// Current PC.
    pub fn pc(&self) -> Addr {
        self.pc
    }

    /// The architectural register file.
    pub fn rf(&self) -> &RF {
        &self.rf
    }

    /// Mutable register access for test setup.
    pub fn rf_mut(&mut self) -> &mut RF {
        &mut self.rf
    }

    /// Executes one instruction: fetch, decode, operand read, execute,
    /// memory access, commit. Returns the completed instruction.
    pub fn step(&mut self) -> Result<Instr, SimError> {
        let raw = self.mem.fetch_word(self.pc)?;
        let mut instr = Instr::new(raw, self.pc);

        for idx in 0..2 {
            let src = instr.src(idx);
            if !src.is_none() {
                instr.set_v_src(self.rf.read(src), idx);
            }
        }
        if !instr.src(2).is_none() {
            instr.set_v_src_pair(self.rf.read_pair());
        }

        instr.execute();
        self.mem.load_store(&mut instr)?;

        self.steps += 1;
        self.rf.write_dst(&instr, self.steps);
        self.pc = instr.new_pc();
        Ok(instr)
    }
}
