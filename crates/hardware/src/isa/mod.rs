//! MIPS instruction set definitions.
//!
//! Contains the table-driven decoder, the decoded instruction type, and the
//! disassembler for the MIPS I/II/32 integer subset.

/// Instruction disassembler for trace output and diagnostics.
pub mod disasm;

/// Decoded instruction representation and execution.
pub mod instr;

/// Static ISA lookup tables (R, REGIMM, opcode, SPECIAL2).
pub mod tables;

pub use self::instr::Instr;
pub use self::tables::{Executor, IsaEntry, OpClass, Pred};
