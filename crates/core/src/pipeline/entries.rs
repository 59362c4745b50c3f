//! Pipeline entry types: what actually sits in the buffers and queues.

use crate::isa::Instruction;

/// An in-flight instruction, as it travels from Pre-Issue through its
/// execution queue. Carries just enough to be re-displayed in a
/// snapshot and to be executed once its operands are ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Program counter at which this instruction was fetched.
    pub pc: u32,
    /// The decoded instruction.
    pub inst: Instruction,
}

impl Entry {
    /// Builds a new in-flight entry.
    #[must_use]
    pub fn new(pc: u32, inst: Instruction) -> Self {
        Self { pc, inst }
    }

    /// `PC MNEMONIC operands` description; the snapshot formatter wraps
    /// this in brackets for buffer/queue entries.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.pc, crate::isa::format_operands(&self.inst))
    }
}

/// A value produced by an execution unit, awaiting Write-Back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecResult {
    /// The instruction that produced this result.
    pub entry: Entry,
    /// Destination register to receive `value`.
    pub dest: usize,
    /// The computed value.
    pub value: i32,
}

impl ExecResult {
    /// Short description for the snapshot formatter, reusing the
    /// entry's own rendering.
    #[must_use]
    pub fn describe(&self) -> String {
        self.entry.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_pc_and_mnemonic() {
        let entry = Entry::new(68, Instruction::Nop);
        assert_eq!(entry.describe(), "68 NOP");
    }
}
