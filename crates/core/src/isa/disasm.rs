//! Renders a decoded instruction back to text: the formatted-binary
//! column and the canonical mnemonic/operand column of the `dis`
//! output.

use crate::common::bits::format_fields;
use crate::isa::decode::RawFields;
use crate::isa::instruction::Instruction;

/// Formats `raw.word` as the space-separated 6/5/5/5/5/6 binary column,
/// independent of which fields `inst` actually consumes.
#[must_use]
pub fn format_binary(raw: &RawFields) -> String {
    format_fields(raw.word)
}

/// Renders the canonical mnemonic/operand text for `inst`.
///
/// Branch and jump offsets are rendered pre-shifted (`#<off<<2>`), to
/// match how the original bitstream encodes them.
#[must_use]
pub fn format_operands(inst: &Instruction) -> String {
    match *inst {
        Instruction::J { target } => format!("J #{target}"),
        Instruction::Jr { rs } => format!("JR R{rs}"),
        Instruction::Beq { rs, rt, offset } => format!("BEQ R{rs}, R{rt}, #{}", offset << 2),
        Instruction::Bgtz { rs, offset } => format!("BGTZ R{rs}, #{}", offset << 2),
        Instruction::Bltz { rs, offset } => format!("BLTZ R{rs}, #{}", offset << 2),
        Instruction::Break => "BREAK".to_string(),
        Instruction::Nop => "NOP".to_string(),
        Instruction::Lw { rt, rs, offset } => format!("LW R{rt}, {offset}(R{rs})"),
        Instruction::Sw { rt, rs, offset } => format!("SW R{rt}, {offset}(R{rs})"),

        Instruction::And { rd, rs, rt } => format!("AND R{rd}, R{rs}, R{rt}"),
        Instruction::Nor { rd, rs, rt } => format!("NOR R{rd}, R{rs}, R{rt}"),
        Instruction::Sub { rd, rs, rt } => format!("SUB R{rd}, R{rs}, R{rt}"),
        Instruction::Add { rd, rs, rt } => format!("ADD R{rd}, R{rs}, R{rt}"),
        Instruction::Slt { rd, rs, rt } => format!("SLT R{rd}, R{rs}, R{rt}"),

        Instruction::AddI { rt, rs, imm } => format!("ADD R{rt}, R{rs}, #{imm}"),
        Instruction::SubI { rt, rs, imm } => format!("SUB R{rt}, R{rs}, #{imm}"),
        Instruction::AndI { rt, rs, imm } => format!("AND R{rt}, R{rs}, #{imm}"),
        Instruction::NorI { rt, rs, imm } => format!("NOR R{rt}, R{rs}, #{imm}"),
        Instruction::SltI { rt, rs, imm } => format!("SLT R{rt}, R{rs}, #{imm}"),

        Instruction::Sll { rd, rt, sa } => format!("SLL R{rd}, R{rt}, #{sa}"),
        Instruction::Srl { rd, rt, sa } => format!("SRL R{rd}, R{rt}, #{sa}"),
        Instruction::Sra { rd, rt, sa } => format!("SRA R{rd}, R{rt}, #{sa}"),
        Instruction::Mul { rd, rs, rt } => format!("MUL R{rd}, R{rs}, R{rt}"),
        Instruction::MulI { rt, rs, imm } => format!("MUL R{rt}, R{rs}, #{imm}"),
    }
}

/// Renders a full `dis` output line for one program word at program
/// counter `pc`: `<binary>\t<pc>\t<mnemonic operands>`.
#[must_use]
pub fn format_line(raw: &RawFields, inst: &Instruction, pc: u32) -> String {
    format!("{}\t{pc}\t{}", format_binary(raw), format_operands(inst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::decode::decode;

    #[test]
    fn renders_add_operands() {
        let word = 0b000000_00001_00010_00011_00000_100000u32;
        let (inst, _) = decode(word, 1).unwrap();
        assert_eq!(format_operands(&inst), "ADD R3, R1, R2");
    }

    #[test]
    fn renders_nop_and_break() {
        let (nop, _) = decode(0, 1).unwrap();
        assert_eq!(format_operands(&nop), "NOP");

        let break_word = 0b000000_00000_00000_00000_00000_001101u32;
        let (brk, _) = decode(break_word, 2).unwrap();
        assert_eq!(format_operands(&brk), "BREAK");
    }

    #[test]
    fn renders_lw_with_offset_and_base() {
        let inst = Instruction::Lw {
            rt: 2,
            rs: 5,
            offset: -4,
        };
        assert_eq!(format_operands(&inst), "LW R2, -4(R5)");
    }

    #[test]
    fn renders_branch_offset_pre_shifted() {
        let inst = Instruction::Bgtz { rs: 1, offset: -2 };
        assert_eq!(format_operands(&inst), "BGTZ R1, #-8");
    }

    #[test]
    fn format_binary_has_six_space_separated_groups() {
        let word = 0b000000_00001_00010_00011_00000_100000u32;
        let (_, raw) = decode(word, 1).unwrap();
        assert_eq!(format_binary(&raw).split(' ').count(), 6);
    }

    #[test]
    fn format_line_joins_binary_pc_and_operands_by_tabs() {
        let word = 0u32;
        let (inst, raw) = decode(word, 1).unwrap();
        let line = format_line(&raw, &inst, 64);
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1], "64");
        assert_eq!(fields[2], "NOP");
    }
}
