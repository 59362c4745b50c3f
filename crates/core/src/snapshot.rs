//! Per-cycle snapshot formatter: renders the exact textual block the
//! `sim` command needs, from a machine state that has already
//! completed and committed one cycle.

use crate::isa::format_operands;
use crate::pipeline::engine::{Machine, StepOutcome};
use crate::pipeline::entries::{Entry, ExecResult};

const RULE: &str = "--------------------";

fn mnemonic_and_operands(entry: &Entry) -> (String, String) {
    let text = format_operands(&entry.inst);
    match text.split_once(' ') {
        Some((mnemonic, operands)) => (mnemonic.to_string(), operands.to_string()),
        None => (text, String::new()),
    }
}

fn bracketed(desc: Option<&Entry>) -> String {
    match desc {
        Some(entry) => format!("[{}]", entry.describe()),
        None => String::new(),
    }
}

fn bracketed_result(result: Option<&ExecResult>) -> String {
    match result {
        Some(result) => format!("[{}]", result.describe()),
        None => String::new(),
    }
}

fn queue_lines(label: &str, entries: &[Option<Entry>]) -> String {
    let mut out = format!("{label}:\n");
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("\tEntry {i}:{}\n", bracketed(entry.as_ref())));
    }
    out.pop();
    out
}

fn slots_snapshot(slots: &crate::pipeline::buffers::Slots<Entry>) -> Vec<Option<Entry>> {
    (0..slots.capacity()).map(|i| slots.get(i).copied()).collect()
}

/// Renders the full `sim` snapshot block for one completed cycle.
#[must_use]
pub fn render(m: &Machine, step: &StepOutcome) -> String {
    let header_entry = m
        .program
        .get(&step.pc_at_start)
        .map(|inst| Entry::new(step.pc_at_start, *inst));

    let (mnemonic, operands) = match &header_entry {
        Some(entry) => mnemonic_and_operands(entry),
        None => (String::new(), String::new()),
    };

    let pre_issue = slots_snapshot(m.pre_issue.committed());
    let pre_alu = slots_snapshot(m.pre_alu.committed());
    let pre_alu_b = slots_snapshot(m.pre_alu_b.committed());
    let pre_mem = slots_snapshot(m.pre_mem.committed());

    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Cycle:{}\t{}\t{}\t{}\n",
        step.cycle, step.pc_at_start, mnemonic, operands
    ));
    out.push('\n');
    out.push_str("IF Unit:\n");
    out.push_str(&format!(
        "\tWaiting Instruction: {}\n",
        bracketed(step.waiting.as_ref())
    ));
    out.push_str(&format!(
        "\tExecuted Instruction: {}\n",
        bracketed(step.executed.as_ref())
    ));
    out.push_str(&queue_lines("Pre-Issue Buffer", &pre_issue));
    out.push('\n');
    out.push_str(&queue_lines("Pre-ALU Queue", &pre_alu));
    out.push('\n');
    out.push_str(&format!(
        "Post-ALU Buffer:{}\n",
        bracketed_result(m.post_alu.committed().peek())
    ));
    out.push_str(&queue_lines("Pre-ALUB Queue", &pre_alu_b));
    out.push('\n');
    out.push_str(&format!(
        "Post-ALUB Buffer:{}\n",
        bracketed_result(m.post_alu_b.committed().peek())
    ));
    out.push_str(&queue_lines("Pre-MEM Queue", &pre_mem));
    out.push('\n');
    out.push_str(&format!(
        "Post-MEM Buffer:{}\n",
        bracketed_result(m.post_mem.committed().peek())
    ));
    out.push_str("Registers\n");
    out.push_str(&m.regs.committed().dump());
    out.push('\n');
    out.push_str("Data\n");
    out.push_str(&m.data.committed().dump());

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::DataSegment;
    use crate::isa::Instruction;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn renders_break_only_snapshot() {
        let mut program = BTreeMap::new();
        program.insert(64, Instruction::Break);
        let mut m = Machine::new(64, program, DataSegment::new(68, vec![]));
        let step = m.step().unwrap();

        let text = render(&m, &step);
        assert!(text.starts_with("--------------------\nCycle:1\t64\tBREAK\t"));
        assert!(text.contains("IF Unit:"));
        assert!(text.contains("\tExecuted Instruction: [64 BREAK]"));
        assert!(text.contains("Pre-Issue Buffer:\n\tEntry 0:\n\tEntry 1:\n\tEntry 2:\n\tEntry 3:"));
        assert!(text.contains("Post-ALU Buffer:"));
        assert!(text.contains("Registers\nR00:"));
        assert!(text.contains("Data"));
    }

    #[test]
    fn occupied_buffer_entry_is_bracketed_with_pc_and_mnemonic() {
        let mut program = BTreeMap::new();
        program.insert(64, Instruction::Add { rd: 3, rs: 1, rt: 2 });
        program.insert(68, Instruction::Break);
        let mut m = Machine::new(64, program, DataSegment::new(72, vec![]));
        let step = m.step().unwrap();

        let text = render(&m, &step);
        assert!(text.contains("Entry 0:[64 ADD R3, R1, R2]"));
    }

    /// Pins the exact byte layout of a minimal cycle's snapshot block,
    /// so a change to field order or spacing shows up as a diff
    /// instead of a passing-but-wrong substring match.
    #[test]
    fn break_only_snapshot_matches_byte_for_byte() {
        let mut program = BTreeMap::new();
        program.insert(64, Instruction::Break);
        let mut m = Machine::new(64, program, DataSegment::new(68, vec![]));
        let step = m.step().unwrap();

        let text = render(&m, &step);
        let expected = concat!(
            "--------------------\n",
            "Cycle:1\t64\tBREAK\t\n",
            "\n",
            "IF Unit:\n",
            "\tWaiting Instruction: \n",
            "\tExecuted Instruction: [64 BREAK]\n",
            "Pre-Issue Buffer:\n",
            "\tEntry 0:\n",
            "\tEntry 1:\n",
            "\tEntry 2:\n",
            "\tEntry 3:\n",
            "Pre-ALU Queue:\n",
            "\tEntry 0:\n",
            "\tEntry 1:\n",
            "Post-ALU Buffer:\n",
            "Pre-ALUB Queue:\n",
            "\tEntry 0:\n",
            "\tEntry 1:\n",
            "Post-ALUB Buffer:\n",
            "Pre-MEM Queue:\n",
            "\tEntry 0:\n",
            "\tEntry 1:\n",
            "Post-MEM Buffer:\n",
            "Registers\n",
            "R00:\t0\t0\t0\t0\t0\t0\t0\t0\n",
            "R08:\t0\t0\t0\t0\t0\t0\t0\t0\n",
            "R16:\t0\t0\t0\t0\t0\t0\t0\t0\n",
            "R24:\t0\t0\t0\t0\t0\t0\t0\t0\n",
            "Data\n",
        );
        assert_eq!(text, expected);
    }
}
