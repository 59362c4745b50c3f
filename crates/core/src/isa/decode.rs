//! Instruction decoder.
//!
//! Maps a 32-bit word to an [`Instruction`] plus the [`RawFields`] the
//! disassembler needs for its formatted-binary column. Decoding is
//! table-driven off the opcode field, with the REGIMM and R-type
//! families discriminated further by `rt`/`func`.

use crate::common::bits::{field, sign_extend};
use crate::common::error::SimError;
use crate::isa::instruction::Instruction;
use crate::isa::opcodes::{
    FUNC_ADD, FUNC_AND, FUNC_BREAK, FUNC_JR, FUNC_MUL, FUNC_NOR, FUNC_SLL, FUNC_SLT, FUNC_SRA,
    FUNC_SRL, FUNC_SUB, OP_ADDI, OP_ANDI, OP_BEQ, OP_BGTZ, OP_J, OP_LW, OP_MULI, OP_MUL_RTYPE,
    OP_NORI, OP_REGIMM, OP_RTYPE, OP_SLTI, OP_SUBI, OP_SW, RT_BLTZ,
};

/// Positional fields extracted from a word, independent of which
/// encoding family it turns out to belong to. Used by the disassembler
/// to render the 6/5/5/5/5/6 formatted-binary column regardless of
/// which fields a given mnemonic actually consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFields {
    /// The original 32-bit word.
    pub word: u32,
    /// Bits 0..6.
    pub opcode: u32,
    /// Bits 6..11.
    pub rs: u32,
    /// Bits 11..16.
    pub rt: u32,
    /// Bits 16..21.
    pub rd: u32,
    /// Bits 21..26.
    pub sa: u32,
    /// Bits 26..32.
    pub func: u32,
}

impl RawFields {
    fn extract(word: u32) -> Self {
        Self {
            word,
            opcode: field(word, 0, 6),
            rs: field(word, 6, 5),
            rt: field(word, 11, 5),
            rd: field(word, 16, 5),
            sa: field(word, 21, 5),
            func: field(word, 26, 6),
        }
    }

    /// The 16-bit I-type/Category-2 immediate, sign-extended to `i32`.
    #[must_use]
    pub fn imm16(&self) -> i32 {
        sign_extend(field(self.word, 16, 16), 16)
    }

    /// The 26-bit J-type target field, left-shifted 2.
    #[must_use]
    pub fn j_target(&self) -> u32 {
        field(self.word, 6, 26) << 2
    }
}

/// Decodes a 32-bit word into an [`Instruction`] and its [`RawFields`].
///
/// `line` is the 1-based program-image line number, used only to
/// annotate a [`SimError::Decode`] if decoding fails.
///
/// # Errors
///
/// Returns [`SimError::Decode`] for an unrecognized opcode, an
/// unrecognized R-type func, or an ill-formed REGIMM `rt` selector.
pub fn decode(word: u32, line: usize) -> Result<(Instruction, RawFields), SimError> {
    let raw = RawFields::extract(word);
    let inst = decode_fields(&raw, line)?;
    Ok((inst, raw))
}

fn decode_fields(raw: &RawFields, line: usize) -> Result<Instruction, SimError> {
    let rs = raw.rs as usize;
    let rt = raw.rt as usize;
    let rd = raw.rd as usize;

    match raw.opcode {
        OP_J => Ok(Instruction::J {
            target: raw.j_target(),
        }),

        OP_REGIMM => {
            if raw.rt == RT_BLTZ {
                Ok(Instruction::Bltz {
                    rs,
                    offset: raw.imm16(),
                })
            } else {
                Err(SimError::Decode {
                    line,
                    reason: format!("unknown REGIMM rt selector {:05b}", raw.rt),
                })
            }
        }

        OP_BEQ => Ok(Instruction::Beq {
            rs,
            rt,
            offset: raw.imm16(),
        }),
        OP_BGTZ => Ok(Instruction::Bgtz {
            rs,
            offset: raw.imm16(),
        }),
        OP_LW => Ok(Instruction::Lw {
            rt,
            rs,
            offset: raw.imm16(),
        }),
        OP_SW => Ok(Instruction::Sw {
            rt,
            rs,
            offset: raw.imm16(),
        }),

        OP_ADDI => Ok(Instruction::AddI {
            rt,
            rs,
            imm: raw.imm16(),
        }),
        OP_SUBI => Ok(Instruction::SubI {
            rt,
            rs,
            imm: raw.imm16(),
        }),
        OP_ANDI => Ok(Instruction::AndI {
            rt,
            rs,
            imm: raw.imm16(),
        }),
        OP_NORI => Ok(Instruction::NorI {
            rt,
            rs,
            imm: raw.imm16(),
        }),
        OP_SLTI => Ok(Instruction::SltI {
            rt,
            rs,
            imm: raw.imm16(),
        }),
        OP_MULI => Ok(Instruction::MulI {
            rt,
            rs,
            imm: raw.imm16(),
        }),

        OP_RTYPE => decode_rtype(raw, rs, rt, rd, line),
        OP_MUL_RTYPE if raw.func == FUNC_MUL => Ok(Instruction::Mul { rd, rs, rt }),

        other => Err(SimError::Decode {
            line,
            reason: format!("unknown opcode {other:06b}"),
        }),
    }
}

fn decode_rtype(
    raw: &RawFields,
    rs: usize,
    rt: usize,
    rd: usize,
    line: usize,
) -> Result<Instruction, SimError> {
    match raw.func {
        FUNC_SLL if raw.rs == 0 && raw.rt == 0 && raw.rd == 0 && raw.sa == 0 => {
            Ok(Instruction::Nop)
        }
        FUNC_SLL => Ok(Instruction::Sll { rd, rt, sa: raw.sa }),
        FUNC_SRL => Ok(Instruction::Srl { rd, rt, sa: raw.sa }),
        FUNC_SRA => Ok(Instruction::Sra { rd, rt, sa: raw.sa }),
        FUNC_ADD => Ok(Instruction::Add { rd, rs, rt }),
        FUNC_SUB => Ok(Instruction::Sub { rd, rs, rt }),
        FUNC_AND => Ok(Instruction::And { rd, rs, rt }),
        FUNC_NOR => Ok(Instruction::Nor { rd, rs, rt }),
        FUNC_SLT => Ok(Instruction::Slt { rd, rs, rt }),
        FUNC_JR => Ok(Instruction::Jr { rs }),
        FUNC_BREAK => Ok(Instruction::Break),
        other => Err(SimError::Decode {
            line,
            reason: format!("unknown R-type func {other:06b}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn w(opcode: u32, rs: u32, rt: u32, rd: u32, sa: u32, func: u32) -> u32 {
        (opcode << 26) | (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | func
    }

    #[test]
    fn decodes_nop_as_all_zero_word() {
        let (inst, _) = decode(0, 1).unwrap();
        assert_eq!(inst, Instruction::Nop);
    }

    #[test]
    fn decodes_break() {
        let word = w(OP_RTYPE, 0, 0, 0, 0, FUNC_BREAK);
        let (inst, _) = decode(word, 2).unwrap();
        assert_eq!(inst, Instruction::Break);
    }

    #[test]
    fn decodes_add_r_type() {
        let word = w(OP_RTYPE, 1, 2, 3, 0, FUNC_ADD);
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(inst, Instruction::Add { rd: 3, rs: 1, rt: 2 });
    }

    #[test]
    fn decodes_sll_vs_nop_disambiguation() {
        let sll = w(OP_RTYPE, 0, 1, 2, 4, FUNC_SLL);
        let (inst, _) = decode(sll, 1).unwrap();
        assert_eq!(
            inst,
            Instruction::Sll {
                rd: 2,
                rt: 1,
                sa: 4
            }
        );
    }

    #[test]
    fn decodes_mul_rtype() {
        let word = w(OP_MUL_RTYPE, 1, 2, 3, 0, FUNC_MUL);
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(inst, Instruction::Mul { rd: 3, rs: 1, rt: 2 });
    }

    #[test]
    fn decodes_bltz_via_regimm_rt_zero() {
        let word = w(OP_REGIMM, 5, 0, 0, 0, 0) | 0xFFFF; // offset = -1
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(inst, Instruction::Bltz { rs: 5, offset: -1 });
    }

    #[test]
    fn rejects_unknown_opcode() {
        let word = w(0b111111, 0, 0, 0, 0, 0);
        let err = decode(word, 7).unwrap_err();
        assert!(matches!(err, SimError::Decode { line: 7, .. }));
    }

    #[test]
    fn rejects_unknown_rtype_func() {
        let word = w(OP_RTYPE, 1, 1, 1, 1, 0b111111);
        let err = decode(word, 4).unwrap_err();
        assert!(matches!(err, SimError::Decode { line: 4, .. }));
    }

    #[test]
    fn j_target_shifts_left_two() {
        let word = w(OP_J, 0, 0, 0, 0, 0) | 10; // low bits of the 26-bit target field
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(inst, Instruction::J { target: 40 });
    }

    #[rstest]
    #[case::add(FUNC_ADD, Instruction::Add { rd: 3, rs: 1, rt: 2 })]
    #[case::sub(FUNC_SUB, Instruction::Sub { rd: 3, rs: 1, rt: 2 })]
    #[case::and(FUNC_AND, Instruction::And { rd: 3, rs: 1, rt: 2 })]
    #[case::nor(FUNC_NOR, Instruction::Nor { rd: 3, rs: 1, rt: 2 })]
    #[case::slt(FUNC_SLT, Instruction::Slt { rd: 3, rs: 1, rt: 2 })]
    fn decodes_every_three_register_rtype_func(
        #[case] func: u32,
        #[case] expected: Instruction,
    ) {
        let word = w(OP_RTYPE, 1, 2, 3, 0, func);
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(inst, expected);
    }
}
