//! Instruction Fetch: the only stage that reads and advances the PC,
//! and the only stage that resolves branches.

use crate::common::error::SimError;
use crate::isa::Instruction;
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::Entry;

/// What Fetch accomplished this cycle, for the snapshot formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The first instruction considered this cycle, whatever became of
    /// it — used by the snapshot formatter's cycle header line.
    pub header: Option<Entry>,
    /// A branch/jump still waiting on its operands.
    pub waiting: Option<Entry>,
    /// A branch/jump resolved this cycle.
    pub executed: Option<Entry>,
    /// True once BREAK has been fetched.
    pub halted: bool,
}

fn operand_ready(m: &Machine, reg: usize, cycle: u64) -> Result<bool, SimError> {
    let ready = m.regs.committed().is_ready(reg, cycle)?;
    let blocked_by_pre_issue = m
        .pre_issue
        .committed()
        .iter()
        .any(|e| e.inst.dest() == Some(reg));
    Ok(ready && !blocked_by_pre_issue)
}

/// Runs Fetch for one cycle, mutating `m`'s pending PC, pending
/// Pre-Issue buffer, and `waiting_branch` slot.
///
/// # Errors
///
/// Returns [`SimError::Decode`] if the word at PC fails to decode, or
/// [`SimError::FetchPastEnd`] if PC runs past the loaded instruction
/// segment before BREAK retires.
pub fn fetch_stage(m: &mut Machine) -> Result<FetchOutcome, SimError> {
    let cycle = m.cycle;

    if m.break_fetched {
        return Ok(FetchOutcome::default());
    }

    if let Some(waiting) = m.waiting_branch.take() {
        let mut outcome = FetchOutcome {
            header: Some(waiting),
            ..FetchOutcome::default()
        };
        return resolve_branch(m, waiting, cycle, &mut outcome);
    }

    let mut outcome = FetchOutcome::default();
    let mut fetched = 0u8;

    while fetched < 2 && !m.pre_issue.pending().is_full() {
        let pc = m.pc;
        let inst = *m.program.get(&pc).ok_or(SimError::FetchPastEnd { pc, cycle })?;
        if outcome.header.is_none() {
            outcome.header = Some(Entry::new(pc, inst));
        }

        if inst.is_break() {
            outcome.executed = Some(Entry::new(pc, inst));
            outcome.halted = true;
            m.break_fetched = true;
            return Ok(outcome);
        }

        if matches!(inst, Instruction::Nop) {
            m.pc += 4;
            fetched += 1;
            continue;
        }

        if inst.is_control_transfer() {
            let entry = Entry::new(pc, inst);
            return resolve_branch(m, entry, cycle, &mut outcome);
        }

        let entry = Entry::new(pc, inst);
        if !m.pre_issue.pending_mut().try_push(entry) {
            break;
        }
        m.pc += 4;
        fetched += 1;
    }

    Ok(outcome)
}

fn resolve_branch(
    m: &mut Machine,
    entry: Entry,
    cycle: u64,
    outcome: &mut FetchOutcome,
) -> Result<FetchOutcome, SimError> {
    let ready = match entry.inst {
        Instruction::J { .. } => true,
        Instruction::Jr { rs }
        | Instruction::Bgtz { rs, .. }
        | Instruction::Bltz { rs, .. } => operand_ready(m, rs, cycle)?,
        Instruction::Beq { rs, rt, .. } => {
            operand_ready(m, rs, cycle)? && operand_ready(m, rt, cycle)?
        }
        _ => unreachable!("resolve_branch called with a non-control instruction"),
    };

    if !ready {
        outcome.waiting = Some(entry);
        m.waiting_branch = Some(entry);
        return Ok(*outcome);
    }

    let fall_through = entry.pc + 4;
    match entry.inst {
        Instruction::J { target } => m.pc = target,
        Instruction::Jr { rs } => m.pc = m.regs.committed().read(rs, cycle)? as u32,
        Instruction::Beq { rs, rt, offset } => {
            let a = m.regs.committed().read(rs, cycle)?;
            let b = m.regs.committed().read(rt, cycle)?;
            m.pc = if a == b {
                fall_through.wrapping_add((offset << 2) as u32)
            } else {
                fall_through
            };
        }
        Instruction::Bgtz { rs, offset } => {
            let v = m.regs.committed().read(rs, cycle)?;
            m.pc = if v > 0 {
                fall_through.wrapping_add((offset << 2) as u32)
            } else {
                fall_through
            };
        }
        Instruction::Bltz { rs, offset } => {
            let v = m.regs.committed().read(rs, cycle)?;
            m.pc = if v < 0 {
                fall_through.wrapping_add((offset << 2) as u32)
            } else {
                fall_through
            };
        }
        _ => unreachable!("resolve_branch called with a non-control instruction"),
    }

    outcome.executed = Some(entry);
    Ok(*outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::engine::Machine;
    use std::collections::BTreeMap;

    fn machine_with(program: Vec<(u32, Instruction)>) -> Machine {
        let mut map = BTreeMap::new();
        for (pc, inst) in program {
            map.insert(pc, inst);
        }
        Machine::new(64, map, crate::arch::DataSegment::new(64, vec![]))
    }

    #[test]
    fn fetch_discards_nop_and_advances_pc() {
        let mut m = machine_with(vec![(64, Instruction::Nop), (68, Instruction::Break)]);
        let outcome = fetch_stage(&mut m).unwrap();
        assert!(outcome.executed.is_some());
        assert!(outcome.halted);
    }

    #[test]
    fn fetch_pushes_alu_instruction_into_pre_issue() {
        let mut m = machine_with(vec![(
            64,
            Instruction::Add { rd: 1, rs: 2, rt: 3 },
        )]);
        fetch_stage(&mut m).unwrap();
        assert_eq!(m.pre_issue.pending().len(), 1);
        assert_eq!(m.pc, 68);
    }

    #[test]
    fn fetch_stalls_on_unready_branch_operand() {
        let mut m = machine_with(vec![(64, Instruction::Bgtz { rs: 1, offset: -1 })]);
        m.regs.pending_mut().mark(1, crate::arch::Unit::Alu, 0).unwrap();
        m.regs.commit();
        let outcome = fetch_stage(&mut m).unwrap();
        assert!(outcome.waiting.is_some());
        assert!(m.waiting_branch.is_some());
        assert_eq!(m.pc, 64);
    }

    #[test]
    fn fetch_past_end_is_fatal() {
        let mut m = machine_with(vec![(64, Instruction::Nop)]);
        fetch_stage(&mut m).unwrap();
        let err = fetch_stage(&mut m).unwrap_err();
        assert!(matches!(err, SimError::FetchPastEnd { pc: 68, .. }));
    }
}
