//! Decoded instruction representation.
//!
//! `Instruction` is a plain sum type: each variant carries exactly the
//! semantic fields its mnemonic needs. There is no runtime dispatch —
//! every stage that cares about instruction semantics matches on the
//! variant directly.

/// A fully decoded instruction, tagged by mnemonic.
///
/// Register indices are `usize` (already range-checked by the decoder
/// against the 5-bit field width, so they are always `0..32`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `J target` — absolute jump, `target` already shifted left 2.
    J {
        /// Absolute word-aligned target address.
        target: u32,
    },
    /// `JR rs` — jump to the address held in `rs`.
    Jr {
        /// Source register holding the target address.
        rs: usize,
    },
    /// `BEQ rs, rt, offset` — branch if `R[rs] == R[rt]`.
    Beq {
        /// First compared register.
        rs: usize,
        /// Second compared register.
        rt: usize,
        /// 16-bit signed offset, pre-shift.
        offset: i32,
    },
    /// `BGTZ rs, offset` — branch if `R[rs] > 0`.
    Bgtz {
        /// Tested register.
        rs: usize,
        /// 16-bit signed offset, pre-shift.
        offset: i32,
    },
    /// `BLTZ rs, offset` — branch if `R[rs] < 0`.
    Bltz {
        /// Tested register.
        rs: usize,
        /// 16-bit signed offset, pre-shift.
        offset: i32,
    },
    /// `BREAK` — halts the simulator after this cycle's fetch.
    Break,
    /// `NOP` — no effect beyond advancing the PC.
    Nop,
    /// `LW rt, offset(rs)` — load a word from `DS[R[rs] + offset]` into `rt`.
    Lw {
        /// Destination register.
        rt: usize,
        /// Base address register.
        rs: usize,
        /// 16-bit signed byte offset.
        offset: i32,
    },
    /// `SW rt, offset(rs)` — store `R[rt]` to `DS[R[rs] + offset]`.
    Sw {
        /// Register holding the value to store.
        rt: usize,
        /// Base address register.
        rs: usize,
        /// 16-bit signed byte offset.
        offset: i32,
    },

    /// `AND rd, rs, rt`
    And {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `NOR rd, rs, rt`
    Nor {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `SUB rd, rs, rt`
    Sub {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `ADD rd, rs, rt`
    Add {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `SLT rd, rs, rt` — `rd <- (rs < rt) as i32`, signed compare.
    Slt {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },

    /// `ADDI rt, rs, imm` — Category-2 immediate ADD.
    AddI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },
    /// `SUBI rt, rs, imm` — Category-2 immediate SUB.
    SubI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },
    /// `ANDI rt, rs, imm` — Category-2 immediate AND.
    AndI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },
    /// `NORI rt, rs, imm` — Category-2 immediate NOR.
    NorI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },
    /// `SLTI rt, rs, imm` — Category-2 immediate SLT.
    SltI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },

    /// `SLL rd, rt, sa` — logical shift left.
    Sll {
        /// Destination register.
        rd: usize,
        /// Source register.
        rt: usize,
        /// Shift amount, `0..32`.
        sa: u32,
    },
    /// `SRL rd, rt, sa` — logical shift right.
    Srl {
        /// Destination register.
        rd: usize,
        /// Source register.
        rt: usize,
        /// Shift amount, `0..32`.
        sa: u32,
    },
    /// `SRA rd, rt, sa` — arithmetic shift right.
    Sra {
        /// Destination register.
        rd: usize,
        /// Source register.
        rt: usize,
        /// Shift amount, `0..32`.
        sa: u32,
    },
    /// `MUL rd, rs, rt` — low 32 bits of the signed product.
    Mul {
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `MUL rt, rs, imm` — Category-2 immediate MUL.
    MulI {
        /// Destination register.
        rt: usize,
        /// Source register.
        rs: usize,
        /// 16-bit sign-extended immediate.
        imm: i32,
    },
}

/// Execution class an instruction is routed to by Issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecClass {
    /// Resolved entirely in Fetch; never enters Pre-Issue.
    Control,
    /// One-cycle arithmetic/logic unit.
    Alu,
    /// Two-cycle shift/multiply unit.
    AluB,
    /// Single-cycle memory port.
    Mem,
}

impl Instruction {
    /// Returns the execution class Issue routes this instruction to.
    #[must_use]
    pub fn exec_class(&self) -> ExecClass {
        use Instruction::{
            Add, AddI, And, AndI, Beq, Bgtz, Bltz, Break, Jr, Lw, Mul, MulI, Nop, Nor, NorI, Slt,
            SltI, Sll, Sra, Srl, Sub, SubI, Sw, J,
        };
        match self {
            J { .. } | Jr { .. } | Beq { .. } | Bgtz { .. } | Bltz { .. } | Break | Nop => {
                ExecClass::Control
            }
            Lw { .. } | Sw { .. } => ExecClass::Mem,
            And { .. }
            | Nor { .. }
            | Sub { .. }
            | Add { .. }
            | Slt { .. }
            | AddI { .. }
            | SubI { .. }
            | AndI { .. }
            | NorI { .. }
            | SltI { .. } => ExecClass::Alu,
            Sll { .. } | Srl { .. } | Sra { .. } | Mul { .. } | MulI { .. } => ExecClass::AluB,
        }
    }

    /// True for the BREAK instruction specifically.
    #[must_use]
    pub fn is_break(&self) -> bool {
        matches!(self, Instruction::Break)
    }

    /// True for branch/jump instructions, which Fetch resolves in place
    /// rather than ever pushing into Pre-Issue.
    #[must_use]
    pub fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            Instruction::J { .. }
                | Instruction::Jr { .. }
                | Instruction::Beq { .. }
                | Instruction::Bgtz { .. }
                | Instruction::Bltz { .. }
        )
    }

    /// Destination register this instruction writes, if any.
    #[must_use]
    pub fn dest(&self) -> Option<usize> {
        use Instruction::{
            Add, AddI, And, AndI, Lw, Mul, MulI, Nor, NorI, Slt, SltI, Sll, Sra, Srl, Sub, SubI,
        };
        match *self {
            And { rd, .. }
            | Nor { rd, .. }
            | Sub { rd, .. }
            | Add { rd, .. }
            | Slt { rd, .. }
            | Sll { rd, .. }
            | Srl { rd, .. }
            | Sra { rd, .. }
            | Mul { rd, .. } => Some(rd),
            AddI { rt, .. }
            | SubI { rt, .. }
            | AndI { rt, .. }
            | NorI { rt, .. }
            | SltI { rt, .. }
            | MulI { rt, .. }
            | Lw { rt, .. } => Some(rt),
            _ => None,
        }
    }

    /// Source registers this instruction reads, in `(srcA, srcB)`
    /// order; `None` for an operand slot that doesn't apply (e.g. an
    /// immediate form's second operand).
    #[must_use]
    pub fn sources(&self) -> (Option<usize>, Option<usize>) {
        use Instruction::{
            Add, AddI, And, AndI, Beq, Bgtz, Bltz, Jr, Lw, Mul, MulI, Nor, NorI, Slt, SltI, Sll,
            Sra, Srl, Sub, SubI, Sw,
        };
        match *self {
            And { rs, rt, .. }
            | Nor { rs, rt, .. }
            | Sub { rs, rt, .. }
            | Add { rs, rt, .. }
            | Slt { rs, rt, .. }
            | Mul { rs, rt, .. }
            | Beq { rs, rt, .. } => (Some(rs), Some(rt)),
            AddI { rs, .. }
            | SubI { rs, .. }
            | AndI { rs, .. }
            | NorI { rs, .. }
            | SltI { rs, .. }
            | MulI { rs, .. } => (Some(rs), None),
            Sll { rt, .. } | Srl { rt, .. } | Sra { rt, .. } => (Some(rt), None),
            Lw { rs, .. } => (Some(rs), None),
            Sw { rs, rt, .. } => (Some(rs), Some(rt)),
            Jr { rs } | Bgtz { rs, .. } | Bltz { rs, .. } => (Some(rs), None),
            _ => (None, None),
        }
    }
}
