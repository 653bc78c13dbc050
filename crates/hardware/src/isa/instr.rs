//! Decoded instruction representation and execution.
//!
//! This module defines [`Instr`], the object that flows through the pipeline
//! ports from Decode to Writeback. It performs:
//! 1. **Decoding:** Field extraction from the R/I/J views and operand-role selection per class.
//! 2. **Execution:** The executor helpers (arithmetic, shifts, branches, jumps, traps).
//! 3. **Classification:** Predicates the pipeline asks of an instruction (jump, load, halt, bubble).

use crate::common::{bitmask, sign_extend, zero_extend, Addr, RegId, Trap};
use crate::isa::tables::{lookup, Executor, IsaEntry, OpClass, Pred};

/// Number of register source operand slots.
pub const SRC_COUNT: usize = 3;

/// A decoded MIPS instruction.
///
/// Created by Decode from a fetched word, mutated by Decode (operand fill),
/// Execute (result, `new_pc`, branch outcome), and Mem (load result), and
/// destroyed by Writeback after the register-file commit. An instruction on
/// a flushed path must be reported to the bypassing unit so its reserved
/// destination is released.
#[derive(Clone, Debug)]
pub struct Instr {
    raw: u32,
    entry: &'static IsaEntry,

    pc: Addr,
    new_pc: Addr,

    src1: RegId,
    src2: RegId,
    src3: RegId,
    dst: RegId,

    v_imm: u32,
    shamt: u8,
    v_src1: u32,
    v_src2: u32,
    v_src3: u64,
    v_dst: u64,

    mem_addr: Addr,
    mem_size: u32,

    complete: bool,
    writes_dst: bool,
    jump_taken: bool,
    trap: Trap,

    predicted_taken: bool,
    predicted_target: Addr,

    /// Monotonic decode sequence number; keys bypass entries.
    seq: u64,
    /// Per-source expected producer tag when the operand arrives via bypass.
    bypass_from: [Option<u64>; SRC_COUNT],
}

impl Instr {
    /// Decodes a raw word fetched at `pc`.
    ///
    /// Operand registers are selected from the R/I/J field views according
    /// to the operation class; `new_pc` is initialised to `pc + 4`.
    pub fn new(raw: u32, pc: Addr) -> Self {
        let entry = lookup(raw);

        let rs = RegId::Gpr(((raw >> 21) & 0x1F) as u8);
        let rt = RegId::Gpr(((raw >> 16) & 0x1F) as u8);
        let rd = RegId::Gpr(((raw >> 11) & 0x1F) as u8);
        let shamt = ((raw >> 6) & 0x1F) as u8;
        let imm16 = raw & 0xFFFF;
        let imm26 = raw & 0x03FF_FFFF;

        let mut instr = Self {
            raw,
            entry,
            pc,
            new_pc: pc.wrapping_add(4),
            src1: RegId::ZERO,
            src2: RegId::ZERO,
            src3: RegId::None,
            dst: RegId::None,
            v_imm: 0,
            shamt: 0,
            v_src1: 0,
            v_src2: 0,
            v_src3: 0,
            v_dst: 0,
            mem_addr: 0,
            mem_size: entry.mem_size,
            complete: false,
            writes_dst: false,
            jump_taken: false,
            trap: Trap::None,
            predicted_taken: false,
            predicted_target: pc.wrapping_add(4),
            seq: 0,
            bypass_from: [None; SRC_COUNT],
        };

        match entry.class {
            OpClass::RArith | OpClass::RCondMove => {
                instr.src1 = rs;
                instr.src2 = rt;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::RShift => {
                // sllv rd, rt, rs: the value comes from rt, the amount from rs.
                instr.src1 = rt;
                instr.src2 = rs;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::RShamt => {
                instr.src1 = rt;
                instr.dst = rd;
                instr.shamt = shamt;
                instr.writes_dst = true;
            }
            OpClass::RDivMult => {
                instr.src1 = rs;
                instr.src2 = rt;
                instr.dst = RegId::HiLo;
                instr.writes_dst = true;
            }
            OpClass::RAccum | OpClass::RSubtract => {
                instr.src1 = rs;
                instr.src2 = rt;
                instr.src3 = RegId::HiLo;
                instr.dst = RegId::HiLo;
                instr.writes_dst = true;
            }
            OpClass::RJump => {
                instr.src1 = rs;
            }
            OpClass::RJumpLink => {
                instr.src1 = rs;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::RSpecial => {}
            OpClass::RTrap => {
                instr.src1 = rs;
                instr.src2 = rt;
            }
            OpClass::RMfHi => {
                instr.src1 = RegId::Hi;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::RMtHi => {
                instr.src1 = rs;
                instr.dst = RegId::Hi;
                instr.writes_dst = true;
            }
            OpClass::RMfLo => {
                instr.src1 = RegId::Lo;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::RMtLo => {
                instr.src1 = rs;
                instr.dst = RegId::Lo;
                instr.writes_dst = true;
            }
            OpClass::IArith | OpClass::IConst => {
                instr.src1 = rs;
                instr.dst = rt;
                instr.v_imm = imm16;
                instr.writes_dst = true;
            }
            OpClass::IBranch => {
                instr.src1 = rs;
                instr.src2 = rt;
                instr.v_imm = imm16;
            }
            OpClass::IBranchZero | OpClass::RiBranchZero | OpClass::RiTrap => {
                instr.src1 = rs;
                instr.v_imm = imm16;
            }
            OpClass::RiBranchLink => {
                instr.src1 = rs;
                instr.dst = RegId::RA;
                instr.v_imm = imm16;
            }
            OpClass::ILoad | OpClass::ILoadU => {
                instr.src1 = rs;
                instr.dst = rt;
                instr.v_imm = imm16;
                instr.writes_dst = true;
            }
            OpClass::ILoadLeft | OpClass::ILoadRight => {
                // The destination doubles as a source: unwritten bytes of rt
                // survive the merge.
                instr.src1 = rs;
                instr.src2 = rt;
                instr.dst = rt;
                instr.v_imm = imm16;
                instr.writes_dst = true;
            }
            OpClass::IStore | OpClass::IStoreLeft | OpClass::IStoreRight => {
                instr.src1 = rs;
                instr.src2 = rt;
                instr.v_imm = imm16;
            }
            OpClass::JJump => {
                instr.v_imm = imm26;
            }
            OpClass::JJumpLink => {
                instr.dst = RegId::RA;
                instr.v_imm = imm26;
                instr.writes_dst = true;
            }
            OpClass::Sp2Count => {
                instr.src1 = rs;
                instr.dst = rd;
                instr.writes_dst = true;
            }
            OpClass::JSpecial | OpClass::Unknown => {}
        }

        instr
    }

    /// A bubble: the empty pipeline slot (raw word 0 at PC 0).
    pub fn bubble() -> Self {
        Self::new(0, 0)
    }

    // ── predicate helpers ─────────────────────────────────

    fn pred(&self, p: Pred) -> bool {
        let s1 = self.v_src1;
        let s2 = self.v_src2;
        let imm = sign_extend(self.v_imm as u16);
        match p {
            Pred::Eq => s1 == s2,
            Pred::Ne => s1 != s2,
            Pred::Ge => (s1 as i32) >= (s2 as i32),
            Pred::Lt => (s1 as i32) < (s2 as i32),
            Pred::Geu => s1 >= s2,
            Pred::Ltu => s1 < s2,
            Pred::Lez => (s1 as i32) <= 0,
            Pred::Gez => (s1 as i32) >= 0,
            Pred::Ltz => (s1 as i32) < 0,
            Pred::Gtz => (s1 as i32) > 0,
            Pred::Eqi => s1 == imm,
            Pred::Nei => s1 != imm,
            Pred::Lti => (s1 as i32) < (imm as i32),
            Pred::Gei => (s1 as i32) >= (imm as i32),
            Pred::Ltiu => s1 < imm,
            Pred::Geiu => s1 >= imm,
        }
    }

    // ── execute helpers ───────────────────────────────────

    fn mult_signed(&self) -> u64 {
        ((self.v_src1 as i32 as i64).wrapping_mul(self.v_src2 as i32 as i64)) as u64
    }

    fn mult_unsigned(&self) -> u64 {
        (self.v_src1 as u64).wrapping_mul(self.v_src2 as u64)
    }

    fn div_pack(quot: u32, rem: u32) -> u64 {
        quot as u64 | ((rem as u64) << 32)
    }

    fn jump(&mut self, target: Addr) {
        self.jump_taken = true;
        self.new_pc = target;
    }

    fn j_target(&self) -> Addr {
        (self.pc & 0xF000_0000) | (self.v_imm << 2)
    }

    fn branch_disp(&self) -> Addr {
        sign_extend(self.v_imm as u16).wrapping_shl(2)
    }

    /// Runs the executor, producing `v_dst`, `new_pc`, the branch outcome,
    /// and the trap state. Marks the instruction complete.
    pub fn execute(&mut self) {
        match self.entry.executor {
            Executor::Add | Executor::Addu => {
                self.v_dst = self.v_src1.wrapping_add(self.v_src2) as u64;
            }
            Executor::Sub | Executor::Subu => {
                self.v_dst = self.v_src1.wrapping_sub(self.v_src2) as u64;
            }
            Executor::Addi | Executor::Addiu => {
                self.v_dst = self.v_src1.wrapping_add(sign_extend(self.v_imm as u16)) as u64;
            }
            Executor::Mult => self.v_dst = self.mult_signed(),
            Executor::Multu => self.v_dst = self.mult_unsigned(),
            Executor::Div => {
                self.v_dst = if self.v_src2 == 0 {
                    0
                } else {
                    let x = self.v_src1 as i32 as i64;
                    let y = self.v_src2 as i32 as i64;
                    Self::div_pack((x / y) as u32, (x % y) as u32)
                };
            }
            Executor::Divu => {
                self.v_dst = if self.v_src2 == 0 {
                    0
                } else {
                    Self::div_pack(self.v_src1 / self.v_src2, self.v_src1 % self.v_src2)
                };
            }
            Executor::Madd => self.v_dst = self.v_src3.wrapping_add(self.mult_signed()),
            Executor::Maddu => self.v_dst = self.v_src3.wrapping_add(self.mult_unsigned()),
            Executor::Msub => self.v_dst = self.v_src3.wrapping_sub(self.mult_signed()),
            Executor::Msubu => self.v_dst = self.v_src3.wrapping_sub(self.mult_unsigned()),
            Executor::Mul => self.v_dst = self.mult_signed() & 0xFFFF_FFFF,
            Executor::Move => self.v_dst = self.v_src1 as u64,
            Executor::Sll => self.v_dst = (self.v_src1 << (self.shamt & 0x1F)) as u64,
            Executor::Srl => self.v_dst = (self.v_src1 >> (self.shamt & 0x1F)) as u64,
            Executor::Sra => {
                self.v_dst = (((self.v_src1 as i32) >> (self.shamt & 0x1F)) as u32) as u64;
            }
            Executor::Sllv => self.v_dst = (self.v_src1 << (self.v_src2 & 0x1F)) as u64,
            Executor::Srlv => self.v_dst = (self.v_src1 >> (self.v_src2 & 0x1F)) as u64,
            Executor::Srav => {
                self.v_dst = (((self.v_src1 as i32) >> (self.v_src2 & 0x1F)) as u32) as u64;
            }
            Executor::Lui => self.v_dst = (sign_extend(self.v_imm as u16) << 16) as u64,
            Executor::And => self.v_dst = (self.v_src1 & self.v_src2) as u64,
            Executor::Or => self.v_dst = (self.v_src1 | self.v_src2) as u64,
            Executor::Xor => self.v_dst = (self.v_src1 ^ self.v_src2) as u64,
            Executor::Nor => self.v_dst = !((self.v_src1 | self.v_src2) as u64),
            Executor::Andi => {
                self.v_dst = (self.v_src1 & zero_extend(self.v_imm as u16)) as u64;
            }
            Executor::Ori => self.v_dst = (self.v_src1 | zero_extend(self.v_imm as u16)) as u64,
            Executor::Xori => {
                self.v_dst = (self.v_src1 ^ zero_extend(self.v_imm as u16)) as u64;
            }
            Executor::Movn => {
                self.v_dst = self.v_src1 as u64;
                self.writes_dst = self.v_src2 != 0;
            }
            Executor::Movz => {
                self.v_dst = self.v_src1 as u64;
                self.writes_dst = self.v_src2 == 0;
            }
            Executor::Set(p) => self.v_dst = self.pred(p) as u64,
            Executor::TrapIf(p) => {
                if self.pred(p) {
                    self.trap = Trap::Explicit;
                }
            }
            Executor::Branch(p) => {
                self.jump_taken = self.pred(p);
                if self.jump_taken {
                    self.new_pc = self.new_pc.wrapping_add(self.branch_disp());
                }
            }
            Executor::BranchLink(p) => {
                self.jump_taken = self.pred(p);
                // Link only when taken; otherwise the destination is left alone.
                self.writes_dst = self.jump_taken;
                if self.jump_taken {
                    self.v_dst = self.new_pc as u64;
                    self.new_pc = self.new_pc.wrapping_add(self.branch_disp());
                }
            }
            Executor::Clo => self.v_dst = (!self.v_src1).leading_zeros() as u64,
            Executor::Clz => self.v_dst = self.v_src1.leading_zeros() as u64,
            Executor::J => self.jump(self.j_target()),
            Executor::Jr => self.jump(self.v_src1 & !0x3),
            Executor::Jal => {
                // The link value is captured before the target overwrites new_pc.
                self.v_dst = self.new_pc as u64;
                self.jump(self.j_target());
            }
            Executor::Jalr => {
                self.v_dst = self.new_pc as u64;
                self.jump(self.v_src1 & !0x3);
            }
            Executor::Syscall | Executor::Break => {}
            Executor::LoadAddr | Executor::StoreAddr => {
                self.mem_addr = self.v_src1.wrapping_add(sign_extend(self.v_imm as u16));
            }
            Executor::Unknown => self.trap = Trap::Explicit,
        }
        self.complete = true;
    }

    // ── classification ────────────────────────────────────

    /// True when the instruction can change the PC in an unusual way.
    pub fn is_jump(&self) -> bool {
        matches!(
            self.entry.class,
            OpClass::JJump
                | OpClass::JJumpLink
                | OpClass::RiBranchLink
                | OpClass::RJump
                | OpClass::RJumpLink
                | OpClass::IBranch
                | OpClass::IBranchZero
                | OpClass::RiBranchZero
        )
    }

    /// True when the jump or branch actually redirected the PC.
    pub fn is_jump_taken(&self) -> bool {
        self.jump_taken
    }

    /// True for any of the load classes.
    pub fn is_load(&self) -> bool {
        matches!(
            self.entry.class,
            OpClass::ILoad | OpClass::ILoadU | OpClass::ILoadRight | OpClass::ILoadLeft
        )
    }

    /// True for any of the store classes.
    pub fn is_store(&self) -> bool {
        matches!(
            self.entry.class,
            OpClass::IStore | OpClass::IStoreRight | OpClass::IStoreLeft
        )
    }

    /// True for MOVN/MOVZ, whose destination write is decided at Execute.
    pub fn is_conditional_move(&self) -> bool {
        self.entry.class == OpClass::RCondMove
    }

    /// Raw word 0 (architectural no-op).
    pub fn is_nop(&self) -> bool {
        self.raw == 0
    }

    /// A no-op at PC 0: the empty pipeline slot.
    pub fn is_bubble(&self) -> bool {
        self.is_nop() && self.pc == 0
    }

    /// A jump whose computed target is PC 0 halts the simulation.
    pub fn is_halt(&self) -> bool {
        self.is_jump() && self.new_pc == 0
    }

    /// True once the executor has run.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True when a trap has been raised for this instruction.
    pub fn has_trap(&self) -> bool {
        self.trap.is_set()
    }

    /// True when the actual outcome disagrees with the fetch-time prediction.
    pub fn is_misprediction(&self) -> bool {
        self.jump_taken != self.predicted_taken
            || (self.jump_taken && self.new_pc != self.predicted_target)
    }

    // ── accessors ─────────────────────────────────────────

    /// ISA table entry backing this instruction.
    pub fn entry(&self) -> &'static IsaEntry {
        self.entry
    }

    /// Mnemonic.
    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    /// Operation class.
    pub fn class(&self) -> OpClass {
        self.entry.class
    }

    /// Raw 32-bit word.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// Address the instruction was fetched from.
    pub fn pc(&self) -> Addr {
        self.pc
    }

    /// Next PC (PC + 4 until a jump or taken branch rewrites it).
    pub fn new_pc(&self) -> Addr {
        self.new_pc
    }

    /// Source register for slot `idx` (0, 1, or 2).
    pub fn src(&self, idx: usize) -> RegId {
        [self.src1, self.src2, self.src3][idx]
    }

    /// Destination register.
    pub fn dst(&self) -> RegId {
        self.dst
    }

    /// Whether the destination will be committed.
    pub fn writes_dst(&self) -> bool {
        self.writes_dst
    }

    /// Immediate field (16-bit for I forms, 26-bit for J forms).
    pub fn imm(&self) -> u32 {
        self.v_imm
    }

    /// Shift amount field.
    pub fn shamt(&self) -> u8 {
        self.shamt
    }

    /// 64-bit result (low 32 architectural for GPR writes; {HI:LO} for pairs).
    pub fn v_dst(&self) -> u64 {
        self.v_dst
    }

    /// Second source value; the data operand of stores.
    pub fn v_src2(&self) -> u32 {
        self.v_src2
    }

    /// Effective memory address (valid after Execute for loads/stores).
    pub fn mem_addr(&self) -> Addr {
        self.mem_addr
    }

    /// Memory access size in bytes; 0 for non-memory instructions.
    pub fn mem_size(&self) -> u32 {
        self.mem_size
    }

    /// Fetch-time predicted direction.
    pub fn predicted_taken(&self) -> bool {
        self.predicted_taken
    }

    /// Fetch-time predicted target.
    pub fn predicted_target(&self) -> Addr {
        self.predicted_target
    }

    /// Decode sequence number (stable bypass tag).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    // ── mutation by the pipeline ──────────────────────────

    /// Records the fetch-time branch prediction.
    pub fn set_prediction(&mut self, taken: bool, target: Addr) {
        self.predicted_taken = taken;
        self.predicted_target = target;
    }

    /// Assigns the decode sequence number.
    pub fn set_seq(&mut self, seq: u64) {
        self.seq = seq;
    }

    /// Fills a 32-bit source operand (slots 0 and 1).
    pub fn set_v_src(&mut self, value: u32, idx: usize) {
        match idx {
            0 => self.v_src1 = value,
            1 => self.v_src2 = value,
            _ => unreachable!("slot 2 is 64-bit; use set_v_src_pair"),
        }
    }

    /// Fills the 64-bit pair operand (slot 2, the MADD/MSUB accumulator).
    pub fn set_v_src_pair(&mut self, value: u64) {
        self.v_src3 = value;
    }

    /// Marks a source operand as pending on the bypass network.
    ///
    /// `seq` is the producer's tag; Execute patches the value once the
    /// bypassing unit holds data for that tag.
    pub fn set_bypass_from(&mut self, idx: usize, seq: u64) {
        self.bypass_from[idx] = Some(seq);
    }

    /// Producer tag a source is waiting on, if any.
    pub fn bypass_from(&self, idx: usize) -> Option<u64> {
        self.bypass_from[idx]
    }

    /// Sets the load result (plain and unaligned loads).
    pub fn set_v_dst(&mut self, value: u32) {
        self.v_dst = value as u64;
    }

    /// Sets the full 64-bit result (used by the functional simulator).
    pub fn set_v_dst_wide(&mut self, value: u64) {
        self.v_dst = value;
    }

    /// Byte-selection mask for the unaligned load/store family.
    ///
    /// `bitmask((4 - addr%4) * 8)`: the low `4 - addr%4` bytes of the
    /// aligned word participate in the transfer.
    pub fn lwrl_mask(&self) -> u32 {
        bitmask((4 - self.mem_addr % 4) * 8)
    }

    /// Value published on the bypass network, in {HI:LO} pair view.
    ///
    /// A HI-only producer parks its 32-bit value in the upper half so that
    /// consumers can select by their source id alone.
    pub fn bypass_data(&self) -> u64 {
        match self.dst {
            RegId::Hi => self.v_dst << 32,
            _ => self.v_dst,
        }
    }
}

impl std::fmt::Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}: {}", self.pc, crate::isa::disasm::disassemble(self))
    }
}
