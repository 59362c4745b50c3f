//! Program-image loader: splits a text image into the decoded
//! instruction segment and the data segment that follows BREAK.
//!
//! This module never touches the filesystem — it works over an
//! already-read `&str` so it can be exercised directly in tests. The
//! CLI owns the one `fs::read_to_string` call.

use std::collections::BTreeMap;

use crate::arch::DataSegment;
use crate::common::bits::{parse_signed_word, parse_word};
use crate::common::error::SimError;
use crate::isa::{decode, format_line, Instruction};

/// Starting program counter mandated by the program-image format.
pub const START_PC: u32 = 64;

/// The decoded instruction segment plus the data segment that follows
/// the BREAK word in the program image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedProgram {
    /// Decoded instructions, keyed by the PC they load at.
    pub instructions: BTreeMap<u32, Instruction>,
    /// Data words following BREAK, as a contiguous segment.
    pub data: DataSegment,
}

/// Parses `text` as a program image: each line is exactly 32
/// characters of `'0'`/`'1'`. Lines are assigned increasing word
/// addresses starting at [`START_PC`]. The first line that decodes to
/// BREAK ends the instruction segment; every line after it is a
/// signed 32-bit data word.
///
/// # Errors
///
/// Returns [`SimError::Decode`] if any instruction-segment line is not
/// exactly 32 `'0'`/`'1'` characters, fails to decode, or if the image
/// never contains a BREAK word.
pub fn load_program(text: &str) -> Result<LoadedProgram, SimError> {
    let mut instructions = BTreeMap::new();
    let mut pc = START_PC;
    let mut lines = text.lines().enumerate();
    let mut break_seen = false;

    for (idx, line) in &mut lines {
        let line_no = idx + 1;
        let word = parse_word(line, line_no)?;
        let (inst, _raw) = decode(word, line_no)?;
        instructions.insert(pc, inst);
        pc += 4;
        if inst.is_break() {
            break_seen = true;
            break;
        }
    }

    if !break_seen {
        return Err(SimError::Decode {
            line: instructions.len(),
            reason: "program image contains no BREAK word".to_string(),
        });
    }

    let mut data = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        data.push(parse_signed_word(line, line_no)?);
    }

    Ok(LoadedProgram {
        instructions,
        data: DataSegment::new(pc, data),
    })
}

/// Renders the `dis` output for an entire program image: every
/// instruction-segment line (through and including BREAK) as the
/// formatted-binary/mnemonic line, followed by every data line as
/// `<raw bits>\t<pc>\t<signed value>`.
///
/// Unlike [`load_program`], this never builds a [`Machine`](crate::pipeline::Machine)-
/// ready image; it only needs each line to decode (for the instruction
/// segment) or parse as a signed word (for the data segment), so it is
/// kept as its own pass rather than layered on `load_program`'s output.
///
/// # Errors
///
/// Returns [`SimError::Decode`] under the same conditions as
/// [`load_program`].
pub fn disassemble(text: &str) -> Result<String, SimError> {
    let mut out = String::new();
    let mut pc = START_PC;
    let mut lines = text.lines().enumerate();
    let mut break_seen = false;

    for (idx, line) in &mut lines {
        let line_no = idx + 1;
        let word = parse_word(line, line_no)?;
        let (inst, raw) = decode(word, line_no)?;
        out.push_str(&format_line(&raw, &inst, pc));
        out.push('\n');
        pc += 4;
        if inst.is_break() {
            break_seen = true;
            break;
        }
    }

    if !break_seen {
        return Err(SimError::Decode {
            line: text.lines().count(),
            reason: "program image contains no BREAK word".to_string(),
        });
    }

    for (idx, line) in lines {
        let line_no = idx + 1;
        let value = parse_signed_word(line, line_no)?;
        out.push_str(&format!("{line}\t{pc}\t{value}\n"));
        pc += 4;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(bits: &str) -> String {
        assert_eq!(bits.len(), 32);
        bits.to_string()
    }

    #[test]
    fn loads_nop_then_break_with_no_data() {
        let image = format!(
            "{}\n{}\n",
            line("00000000000000000000000000000000"),
            line("00000000000000000000000000001101"),
        );
        let loaded = load_program(&image).unwrap();
        assert_eq!(loaded.instructions.len(), 2);
        assert_eq!(loaded.instructions[&64], Instruction::Nop);
        assert_eq!(loaded.instructions[&68], Instruction::Break);
        assert!(loaded.data.is_empty());
        assert_eq!(loaded.data.base(), 72);
    }

    #[test]
    fn data_segment_starts_immediately_after_break() {
        let image = format!(
            "{}\n{}\n{}\n",
            line("00000000000000000000000000001101"),
            "00000000000000000000000000000011",
            "00000000000000000000000000000100",
        );
        let loaded = load_program(&image).unwrap();
        assert_eq!(loaded.data.base(), 68);
        assert_eq!(loaded.data.read(68, 0).unwrap(), 3);
        assert_eq!(loaded.data.read(72, 0).unwrap(), 4);
    }

    #[test]
    fn rejects_line_of_wrong_length() {
        let image = "0101\n";
        let err = load_program(image).unwrap_err();
        assert!(matches!(err, SimError::Decode { line: 1, .. }));
    }

    #[test]
    fn rejects_missing_break() {
        let image = line("00000000000000000000000000000000");
        let err = load_program(&image).unwrap_err();
        assert!(matches!(err, SimError::Decode { .. }));
    }

    #[test]
    fn disassemble_renders_instruction_and_data_lines() {
        let image = format!(
            "{}\n{}\n{}\n",
            line("00000000000000000000000000001101"),
            "00000000000000000000000000000011",
            "00000000000000000000000000000100",
        );
        let text = disassemble(&image).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("\t64\tBREAK"));
        assert_eq!(
            lines[1],
            "00000000000000000000000000000011\t68\t3"
        );
        assert_eq!(
            lines[2],
            "00000000000000000000000000000100\t72\t4"
        );
    }

    #[test]
    fn disassemble_rejects_missing_break() {
        let image = line("00000000000000000000000000000000");
        let err = disassemble(&image).unwrap_err();
        assert!(matches!(err, SimError::Decode { .. }));
    }
}
