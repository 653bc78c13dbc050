//! Static ISA lookup tables.
//!
//! Decoding is table-driven: four maps keyed by an 8-bit index resolve a raw
//! word to an [`IsaEntry`] describing the operation. It provides:
//! 1. **R map:** keyed by `funct` when the opcode is 0.
//! 2. **REGIMM map:** keyed by `rt` when the opcode is 1.
//! 3. **Opcode map:** keyed by `opcode` for the remaining I/J forms.
//! 4. **SPECIAL2 map:** keyed by `funct` when the opcode is 0x1C.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Operation class of a decoded instruction.
///
/// The class drives operand selection (which raw fields become `src1`,
/// `src2`, `dst`) and the coarse predicates the pipeline asks of an
/// instruction (is it a jump, a load, a store).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    /// Three-register arithmetic/logic (`add`, `and`, `slt`, SPECIAL2 `mul`).
    RArith,
    /// Accumulating multiply (`madd`, `maddu`): HI:LO += product.
    RAccum,
    /// Subtracting multiply (`msub`, `msubu`): HI:LO -= product.
    RSubtract,
    /// Multiply/divide writing the HI:LO pair.
    RDivMult,
    /// Conditional move (`movn`, `movz`).
    RCondMove,
    /// Variable shift (`sllv` family, amount from a register).
    RShift,
    /// Immediate shift (`sll` family, amount from the shamt field).
    RShamt,
    /// Register jump (`jr`).
    RJump,
    /// Register jump-and-link (`jalr`).
    RJumpLink,
    /// `syscall` / `break`.
    RSpecial,
    /// Register trap-if (`teq` family).
    RTrap,
    /// `mfhi`.
    RMfHi,
    /// `mthi`.
    RMtHi,
    /// `mflo`.
    RMfLo,
    /// `mtlo`.
    RMtLo,
    /// Immediate arithmetic/logic (`addi`, `ori`, `slti`).
    IArith,
    /// Two-register branch (`beq`, `bne`).
    IBranch,
    /// One-register branch against zero (`blez`, `bgtz`).
    IBranchZero,
    /// REGIMM branch against zero (`bltz`, `bgez`).
    RiBranchZero,
    /// REGIMM trap-if with immediate (`teqi` family).
    RiTrap,
    /// Sign-extending load (`lb`, `lh`, `lw`).
    ILoad,
    /// Zero-extending load (`lbu`, `lhu`).
    ILoadU,
    /// Unaligned load-right (`lwr`).
    ILoadRight,
    /// Unaligned load-left (`lwl`).
    ILoadLeft,
    /// Immediate constant (`lui`).
    IConst,
    /// Store (`sb`, `sh`, `sw`).
    IStore,
    /// Unaligned store-right (`swr`).
    IStoreRight,
    /// Unaligned store-left (`swl`).
    IStoreLeft,
    /// Absolute jump (`j`).
    JJump,
    /// Absolute jump-and-link (`jal`).
    JJumpLink,
    /// REGIMM branch-and-link (`bltzal`, `bgezal`).
    RiBranchLink,
    /// Reserved J-format entries.
    JSpecial,
    /// SPECIAL2 bit counting (`clz`, `clo`).
    Sp2Count,
    /// Unrecognised encoding; executes as an explicit trap.
    Unknown,
}

/// Comparison predicate parameterising the set/branch/trap executor families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pred {
    /// `src1 == src2`
    Eq,
    /// `src1 != src2`
    Ne,
    /// signed `src1 >= src2`
    Ge,
    /// signed `src1 < src2`
    Lt,
    /// unsigned `src1 >= src2`
    Geu,
    /// unsigned `src1 < src2`
    Ltu,
    /// signed `src1 <= 0`
    Lez,
    /// signed `src1 >= 0`
    Gez,
    /// signed `src1 < 0`
    Ltz,
    /// signed `src1 > 0`
    Gtz,
    /// signed `src1 == sign_extend(imm)`
    Eqi,
    /// signed `src1 != sign_extend(imm)`
    Nei,
    /// signed `src1 < sign_extend(imm)`
    Lti,
    /// signed `src1 >= sign_extend(imm)`
    Gei,
    /// unsigned `src1 < sign_extend(imm)`
    Ltiu,
    /// unsigned `src1 >= sign_extend(imm)`
    Geiu,
}

/// Executor attached to an ISA entry.
///
/// A statically dispatched sum type: `Instr::execute` matches on this and
/// runs the corresponding helper, avoiding virtual dispatch on the hot path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Executor {
    /// Signed add (wraps silently; no overflow trap is modelled).
    Add,
    /// Unsigned add.
    Addu,
    /// Signed add immediate (wraps silently).
    Addi,
    /// Unsigned add immediate.
    Addiu,
    /// Signed subtract (wraps silently).
    Sub,
    /// Unsigned subtract.
    Subu,
    /// Signed 32×32→64 multiply into HI:LO.
    Mult,
    /// Unsigned 32×32→64 multiply into HI:LO.
    Multu,
    /// Signed divide into {LO=quotient, HI=remainder}; divide-by-zero yields 0.
    Div,
    /// Unsigned divide; divide-by-zero yields 0.
    Divu,
    /// Signed multiply-accumulate into HI:LO.
    Madd,
    /// Unsigned multiply-accumulate into HI:LO.
    Maddu,
    /// Signed multiply-subtract from HI:LO.
    Msub,
    /// Unsigned multiply-subtract from HI:LO.
    Msubu,
    /// SPECIAL2 multiply: rd = low 32 bits of the product.
    Mul,
    /// Plain move of src1 (mfhi/mthi/mflo/mtlo).
    Move,
    /// Shift left logical by shamt.
    Sll,
    /// Shift right logical by shamt.
    Srl,
    /// Shift right arithmetic by shamt.
    Sra,
    /// Shift left logical by src2 (low 5 bits).
    Sllv,
    /// Shift right logical by src2 (low 5 bits).
    Srlv,
    /// Shift right arithmetic by src2 (low 5 bits).
    Srav,
    /// Load upper immediate.
    Lui,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// AND with zero-extended immediate.
    Andi,
    /// OR with zero-extended immediate.
    Ori,
    /// XOR with zero-extended immediate.
    Xori,
    /// Move if src2 != 0.
    Movn,
    /// Move if src2 == 0.
    Movz,
    /// Write 0/1 from the predicate (`slt` family).
    Set(Pred),
    /// Raise an explicit trap when the predicate holds (`teq` family).
    TrapIf(Pred),
    /// Relative branch when the predicate holds.
    Branch(Pred),
    /// Relative branch that links when taken.
    BranchLink(Pred),
    /// Count leading ones.
    Clo,
    /// Count leading zeros.
    Clz,
    /// Absolute jump.
    J,
    /// Register jump.
    Jr,
    /// Absolute jump-and-link.
    Jal,
    /// Register jump-and-link.
    Jalr,
    /// System call (no-op at execute).
    Syscall,
    /// Breakpoint (no-op at execute).
    Break,
    /// Compute a load address.
    LoadAddr,
    /// Compute a store address.
    StoreAddr,
    /// Unknown encoding; raises an explicit trap.
    Unknown,
}

/// One row of an ISA lookup table.
#[derive(Clone, Copy, Debug)]
pub struct IsaEntry {
    /// Mnemonic.
    pub name: &'static str,
    /// Operation class, driving operand selection.
    pub class: OpClass,
    /// Memory access size in bytes; 0 for non-memory operations.
    pub mem_size: u32,
    /// Executor run at the Execute stage.
    pub executor: Executor,
    /// Minimum ISA level (1 = MIPS I, 2 = MIPS II, 32 = MIPS32).
    pub version: u8,
}

const fn entry(
    name: &'static str,
    class: OpClass,
    mem_size: u32,
    executor: Executor,
    version: u8,
) -> IsaEntry {
    IsaEntry {
        name,
        class,
        mem_size,
        executor,
        version,
    }
}

/// Entries keyed by `funct` for opcode 0.
pub static ISA_MAP_R: LazyLock<HashMap<u8, IsaEntry>> = LazyLock::new(|| {
    use Executor as E;
    use OpClass as C;
    HashMap::from([
        (0x00, entry("sll", C::RShamt, 0, E::Sll, 1)),
        (0x02, entry("srl", C::RShamt, 0, E::Srl, 1)),
        (0x03, entry("sra", C::RShamt, 0, E::Sra, 1)),
        (0x04, entry("sllv", C::RShift, 0, E::Sllv, 1)),
        (0x06, entry("srlv", C::RShift, 0, E::Srlv, 1)),
        (0x07, entry("srav", C::RShift, 0, E::Srav, 1)),
        (0x08, entry("jr", C::RJump, 0, E::Jr, 1)),
        (0x09, entry("jalr", C::RJumpLink, 0, E::Jalr, 1)),
        (0x0A, entry("movz", C::RCondMove, 0, E::Movz, 32)),
        (0x0B, entry("movn", C::RCondMove, 0, E::Movn, 32)),
        (0x0C, entry("syscall", C::RSpecial, 0, E::Syscall, 1)),
        (0x0D, entry("break", C::RSpecial, 0, E::Break, 1)),
        (0x10, entry("mfhi", C::RMfHi, 0, E::Move, 1)),
        (0x11, entry("mthi", C::RMtHi, 0, E::Move, 1)),
        (0x12, entry("mflo", C::RMfLo, 0, E::Move, 1)),
        (0x13, entry("mtlo", C::RMtLo, 0, E::Move, 1)),
        (0x18, entry("mult", C::RDivMult, 0, E::Mult, 1)),
        (0x19, entry("multu", C::RDivMult, 0, E::Multu, 1)),
        (0x1A, entry("div", C::RDivMult, 0, E::Div, 1)),
        (0x1B, entry("divu", C::RDivMult, 0, E::Divu, 1)),
        (0x20, entry("add", C::RArith, 0, E::Add, 1)),
        (0x21, entry("addu", C::RArith, 0, E::Addu, 1)),
        (0x22, entry("sub", C::RArith, 0, E::Sub, 1)),
        (0x23, entry("subu", C::RArith, 0, E::Subu, 1)),
        (0x24, entry("and", C::RArith, 0, E::And, 1)),
        (0x25, entry("or", C::RArith, 0, E::Or, 1)),
        (0x26, entry("xor", C::RArith, 0, E::Xor, 1)),
        (0x27, entry("nor", C::RArith, 0, E::Nor, 1)),
        (0x2A, entry("slt", C::RArith, 0, E::Set(Pred::Lt), 1)),
        (0x2B, entry("sltu", C::RArith, 0, E::Set(Pred::Ltu), 1)),
        (0x30, entry("tge", C::RTrap, 0, E::TrapIf(Pred::Ge), 2)),
        (0x31, entry("tgeu", C::RTrap, 0, E::TrapIf(Pred::Geu), 2)),
        (0x32, entry("tlt", C::RTrap, 0, E::TrapIf(Pred::Lt), 2)),
        (0x33, entry("tltu", C::RTrap, 0, E::TrapIf(Pred::Ltu), 2)),
        (0x34, entry("teq", C::RTrap, 0, E::TrapIf(Pred::Eq), 2)),
        (0x36, entry("tne", C::RTrap, 0, E::TrapIf(Pred::Ne), 2)),
    ])
});

/// Entries keyed by `rt` for opcode 1 (REGIMM).
pub static ISA_MAP_RI: LazyLock<HashMap<u8, IsaEntry>> = LazyLock::new(|| {
    use Executor as E;
    use OpClass as C;
    HashMap::from([
        (0x00, entry("bltz", C::RiBranchZero, 0, E::Branch(Pred::Ltz), 1)),
        (0x01, entry("bgez", C::RiBranchZero, 0, E::Branch(Pred::Gez), 1)),
        (0x08, entry("tgei", C::RiTrap, 0, E::TrapIf(Pred::Gei), 2)),
        (0x09, entry("tgeiu", C::RiTrap, 0, E::TrapIf(Pred::Geiu), 2)),
        (0x0A, entry("tlti", C::RiTrap, 0, E::TrapIf(Pred::Lti), 2)),
        (0x0B, entry("tltiu", C::RiTrap, 0, E::TrapIf(Pred::Ltiu), 2)),
        (0x0C, entry("teqi", C::RiTrap, 0, E::TrapIf(Pred::Eqi), 2)),
        (0x0E, entry("tnei", C::RiTrap, 0, E::TrapIf(Pred::Nei), 2)),
        (
            0x10,
            entry("bltzal", C::RiBranchLink, 0, E::BranchLink(Pred::Ltz), 1),
        ),
        (
            0x11,
            entry("bgezal", C::RiBranchLink, 0, E::BranchLink(Pred::Gez), 1),
        ),
    ])
});

/// Entries keyed by `opcode` for the remaining I/J forms.
pub static ISA_MAP_IJ: LazyLock<HashMap<u8, IsaEntry>> = LazyLock::new(|| {
    use Executor as E;
    use OpClass as C;
    HashMap::from([
        (0x02, entry("j", C::JJump, 0, E::J, 1)),
        (0x03, entry("jal", C::JJumpLink, 0, E::Jal, 1)),
        (0x04, entry("beq", C::IBranch, 0, E::Branch(Pred::Eq), 1)),
        (0x05, entry("bne", C::IBranch, 0, E::Branch(Pred::Ne), 1)),
        (0x06, entry("blez", C::IBranchZero, 0, E::Branch(Pred::Lez), 1)),
        (0x07, entry("bgtz", C::IBranchZero, 0, E::Branch(Pred::Gtz), 1)),
        (0x08, entry("addi", C::IArith, 0, E::Addi, 1)),
        (0x09, entry("addiu", C::IArith, 0, E::Addiu, 1)),
        (0x0A, entry("slti", C::IArith, 0, E::Set(Pred::Lti), 1)),
        (0x0B, entry("sltiu", C::IArith, 0, E::Set(Pred::Ltiu), 1)),
        (0x0C, entry("andi", C::IArith, 0, E::Andi, 1)),
        (0x0D, entry("ori", C::IArith, 0, E::Ori, 1)),
        (0x0E, entry("xori", C::IArith, 0, E::Xori, 1)),
        (0x0F, entry("lui", C::IConst, 0, E::Lui, 1)),
        (0x20, entry("lb", C::ILoad, 1, E::LoadAddr, 1)),
        (0x21, entry("lh", C::ILoad, 2, E::LoadAddr, 1)),
        (0x22, entry("lwl", C::ILoadLeft, 4, E::LoadAddr, 1)),
        (0x23, entry("lw", C::ILoad, 4, E::LoadAddr, 1)),
        (0x24, entry("lbu", C::ILoadU, 1, E::LoadAddr, 1)),
        (0x25, entry("lhu", C::ILoadU, 2, E::LoadAddr, 1)),
        (0x26, entry("lwr", C::ILoadRight, 4, E::LoadAddr, 1)),
        (0x28, entry("sb", C::IStore, 1, E::StoreAddr, 1)),
        (0x29, entry("sh", C::IStore, 2, E::StoreAddr, 1)),
        (0x2A, entry("swl", C::IStoreLeft, 4, E::StoreAddr, 1)),
        (0x2B, entry("sw", C::IStore, 4, E::StoreAddr, 1)),
        (0x2E, entry("swr", C::IStoreRight, 4, E::StoreAddr, 1)),
    ])
});

/// Entries keyed by `funct` for opcode 0x1C (SPECIAL2).
pub static ISA_MAP_SP2: LazyLock<HashMap<u8, IsaEntry>> = LazyLock::new(|| {
    use Executor as E;
    use OpClass as C;
    HashMap::from([
        (0x00, entry("madd", C::RAccum, 0, E::Madd, 32)),
        (0x01, entry("maddu", C::RAccum, 0, E::Maddu, 32)),
        (0x02, entry("mul", C::RArith, 0, E::Mul, 32)),
        (0x04, entry("msub", C::RSubtract, 0, E::Msub, 32)),
        (0x05, entry("msubu", C::RSubtract, 0, E::Msubu, 32)),
        (0x20, entry("clz", C::Sp2Count, 0, E::Clz, 32)),
        (0x21, entry("clo", C::Sp2Count, 0, E::Clo, 32)),
    ])
});

/// Catch-all entry for unrecognised encodings.
pub const UNKNOWN_ENTRY: IsaEntry = entry("unknown", OpClass::Unknown, 0, Executor::Unknown, 1);

/// Resolves a raw word to its ISA entry.
///
/// Opcode 0 selects the R map by funct, opcode 1 the REGIMM map by rt,
/// opcode 0x1C the SPECIAL2 map by funct, and anything else the opcode map.
/// Misses resolve to [`UNKNOWN_ENTRY`].
pub fn lookup(raw: u32) -> &'static IsaEntry {
    let opcode = (raw >> 26) as u8;
    let funct = (raw & 0x3F) as u8;
    let rt = ((raw >> 16) & 0x1F) as u8;
    let found = match opcode {
        0x00 => ISA_MAP_R.get(&funct),
        0x01 => ISA_MAP_RI.get(&rt),
        0x1C => ISA_MAP_SP2.get(&funct),
        _ => ISA_MAP_IJ.get(&opcode),
    };
    found.unwrap_or(&UNKNOWN_ENTRY)
}
