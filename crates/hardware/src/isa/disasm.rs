//! Instruction disassembler.
//!
//! Converts a decoded instruction into a human-readable mnemonic string for
//! trace output, checker diagnostics, and test failure messages. Formatting
//! is produced on demand; nothing is cached on the instruction.

use crate::common::reg::GPR_NAMES;
use crate::common::sign_extend;
use crate::isa::instr::Instr;
use crate::isa::tables::OpClass;

/// Returns the ABI name for a general-purpose register index.
#[inline]
fn gpr(idx: u32) -> &'static str {
    GPR_NAMES[(idx & 0x1F) as usize]
}

/// Disassembles a decoded instruction.
///
/// Produces strings like `"addu $v0, $a0, $a1"`, `"lw $t0, -4($sp)"`, or
/// `"unknown 0xfc000000"` for unrecognised encodings.
pub fn disassemble(instr: &Instr) -> String {
    let raw = instr.raw();
    let rs = (raw >> 21) & 0x1F;
    let rt = (raw >> 16) & 0x1F;
    let rd = (raw >> 11) & 0x1F;
    let name = instr.name();
    let simm = sign_extend(instr.imm() as u16) as i32;

    match instr.class() {
        OpClass::RArith | OpClass::RCondMove => {
            format!("{} ${}, ${}, ${}", name, gpr(rd), gpr(rs), gpr(rt))
        }
        OpClass::RShift => format!("{} ${}, ${}, ${}", name, gpr(rd), gpr(rt), gpr(rs)),
        OpClass::RShamt => format!("{} ${}, ${}, {}", name, gpr(rd), gpr(rt), instr.shamt()),
        OpClass::RDivMult | OpClass::RAccum | OpClass::RSubtract | OpClass::RTrap => {
            format!("{} ${}, ${}", name, gpr(rs), gpr(rt))
        }
        OpClass::RJump => format!("{} ${}", name, gpr(rs)),
        OpClass::RJumpLink => format!("{} ${}, ${}", name, gpr(rd), gpr(rs)),
        OpClass::RSpecial => name.to_string(),
        OpClass::RMfHi | OpClass::RMfLo => format!("{} ${}", name, gpr(rd)),
        OpClass::RMtHi | OpClass::RMtLo => format!("{} ${}", name, gpr(rs)),
        OpClass::Sp2Count => format!("{} ${}, ${}", name, gpr(rd), gpr(rs)),
        OpClass::IArith => format!("{} ${}, ${}, {}", name, gpr(rt), gpr(rs), simm),
        OpClass::IConst => format!("{} ${}, {:#x}", name, gpr(rt), instr.imm()),
        OpClass::IBranch => format!("{} ${}, ${}, {}", name, gpr(rs), gpr(rt), simm),
        OpClass::IBranchZero | OpClass::RiBranchZero | OpClass::RiBranchLink => {
            format!("{} ${}, {}", name, gpr(rs), simm)
        }
        OpClass::RiTrap => format!("{} ${}, {}", name, gpr(rs), simm),
        OpClass::ILoad
        | OpClass::ILoadU
        | OpClass::ILoadLeft
        | OpClass::ILoadRight
        | OpClass::IStore
        | OpClass::IStoreLeft
        | OpClass::IStoreRight => format!("{} ${}, {}(${})", name, gpr(rt), simm, gpr(rs)),
        OpClass::JJump | OpClass::JJumpLink => {
            let target = (instr.pc() & 0xF000_0000) | (instr.imm() << 2);
            format!("{} {:#x}", name, target)
        }
        OpClass::JSpecial | OpClass::Unknown => format!("unknown {:#010x}", raw),
    }
}
