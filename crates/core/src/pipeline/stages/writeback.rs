//! Write-Back: drains the three Post-* buffers, delivering results to
//! the register file and releasing scoreboard reservations.

use crate::common::error::SimError;
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::ExecResult;
use crate::pipeline::scoreboard::Fu;

/// Which results were written back this cycle, for the snapshot
/// formatter and for test assertions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteBackOutcome {
    /// Result drained from Post-ALU, if any.
    pub from_alu: Option<ExecResult>,
    /// Result drained from Post-ALU-B, if any.
    pub from_alu_b: Option<ExecResult>,
    /// Result drained from Post-MEM, if any.
    pub from_mem: Option<ExecResult>,
}

fn deliver(m: &mut Machine, result: ExecResult, fu: Option<Fu>, cycle: u64) -> Result<(), SimError> {
    m.regs.pending_mut().write(result.dest, result.value, cycle)?;
    m.regs.pending_mut().clear(result.dest, cycle)?;
    if let Some(fu) = fu {
        m.scoreboard.pending_mut().slot_mut(fu).drain_active();
    }
    Ok(())
}

/// Runs Write-Back for one cycle. Reads each Post-* buffer's
/// committed occupant — i.e. whatever the corresponding execution
/// unit finished *last* cycle — and never touches the Post-* buffers
/// themselves; clearing a stale occupant once it's been superseded is
/// each execution stage's own responsibility (see their module docs).
///
/// # Errors
///
/// Propagates register-access errors.
pub fn write_back_stage(m: &mut Machine) -> Result<WriteBackOutcome, SimError> {
    let cycle = m.cycle;
    let mut outcome = WriteBackOutcome::default();

    if let Some(result) = m.post_alu.committed().peek().copied() {
        deliver(m, result, Some(Fu::Alu), cycle)?;
        outcome.from_alu = Some(result);
    }
    if let Some(result) = m.post_alu_b.committed().peek().copied() {
        deliver(m, result, Some(Fu::AluB), cycle)?;
        outcome.from_alu_b = Some(result);
    }
    if let Some(result) = m.post_mem.committed().peek().copied() {
        deliver(m, result, None, cycle)?;
        outcome.from_mem = Some(result);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::DataSegment;
    use crate::isa::Instruction;
    use crate::pipeline::engine::Machine;
    use crate::pipeline::entries::Entry;
    use crate::pipeline::scoreboard::FuEntry;
    use std::collections::BTreeMap;

    #[test]
    fn drains_post_alu_into_register_file_and_clears_reservation() {
        let mut m = Machine::new(64, BTreeMap::new(), DataSegment::new(64, vec![]));
        m.regs.pending_mut().mark(3, crate::arch::Unit::Alu, 0).unwrap();
        m.regs.commit();
        m.scoreboard.pending_mut().alu.place(FuEntry {
            dest: Some(3),
            src_a: None,
            src_b: None,
            src_a_producer: None,
            src_b_producer: None,
            src_a_ready: true,
            src_b_ready: true,
            cycles_remaining: 1,
        });
        m.scoreboard.commit();
        m.post_alu.pending_mut().set(ExecResult {
            entry: Entry::new(64, Instruction::Add { rd: 3, rs: 1, rt: 2 }),
            dest: 3,
            value: 7,
        });
        m.post_alu.commit();

        let outcome = write_back_stage(&mut m).unwrap();
        assert!(outcome.from_alu.is_some());
        assert_eq!(m.regs.pending().read(3, 0).unwrap(), 7);
        assert!(m.regs.pending().is_ready(3, 0).unwrap());
        assert!(!m.scoreboard.pending().alu.is_busy());
    }
}
