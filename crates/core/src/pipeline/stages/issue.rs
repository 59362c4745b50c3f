//! Issue: drains Pre-Issue into the three execution queues subject to
//! structural, WAW, WAR, and RAW (for the memory path) hazard checks.

use crate::common::error::SimError;
use crate::isa::{ExecClass, Instruction};
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::Entry;
use crate::pipeline::scoreboard::{Fu, FuEntry};

/// Which Pre-Issue entries issued this cycle, for the snapshot
/// formatter (currently unused beyond the count, kept for symmetry
/// with the other stages' outcome types).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IssueOutcome {
    /// How many instructions issued this cycle (at most 2).
    pub issued: u8,
}

fn queue_room(used: usize, capacity: usize) -> bool {
    used < capacity
}

/// Runs Issue for one cycle.
///
/// # Errors
///
/// Returns [`SimError::RegisterOutOfRange`] if an instruction names a
/// register index the decoder should already have range-checked (this
/// only surfaces if that invariant is ever violated upstream).
pub fn issue_stage(m: &mut Machine) -> Result<IssueOutcome, SimError> {
    let cycle = m.cycle;
    let committed_len = m.pre_issue.committed().len();
    let mut still_present: Vec<Option<Entry>> = (0..committed_len)
        .map(|i| m.pre_issue.committed().get(i).copied())
        .collect();

    let alu_cap = m.pre_alu.committed().capacity();
    let alu_b_cap = m.pre_alu_b.committed().capacity();
    let mem_cap = m.pre_mem.committed().capacity();

    let mut staged_alu = m.pre_alu.committed().len();
    let mut staged_alu_b = m.pre_alu_b.committed().len();
    let mut staged_mem = m.pre_mem.committed().len();

    let mut staged_alu_fu = usize::from(m.scoreboard.committed().alu.active.is_some())
        + usize::from(m.scoreboard.committed().alu.shadow.is_some());
    let mut staged_alu_b_fu = usize::from(m.scoreboard.committed().alu_b.active.is_some())
        + usize::from(m.scoreboard.committed().alu_b.shadow.is_some());

    let mut outcome = IssueOutcome::default();

    for i in 0..committed_len {
        if outcome.issued >= 2 {
            break;
        }
        let Some(entry) = still_present[i] else {
            continue;
        };

        let earlier_dests: Vec<usize> = (0..i)
            .filter_map(|j| still_present[j].and_then(|e| e.inst.dest()))
            .collect();
        let earlier_unissued_store = (0..i).any(|j| {
            matches!(still_present[j], Some(e) if matches!(e.inst, Instruction::Sw { .. }))
        });

        let (src_a, src_b) = entry.inst.sources();
        let waw_ok = match entry.inst.dest() {
            Some(d) => m.regs.committed().is_ready(d, cycle)? && !earlier_dests.contains(&d),
            None => true,
        };
        let war_ok = [src_a, src_b]
            .into_iter()
            .flatten()
            .all(|s| !earlier_dests.contains(&s));

        if !waw_ok || !war_ok {
            continue;
        }

        let can_issue = match entry.inst.exec_class() {
            ExecClass::Alu => {
                queue_room(staged_alu, alu_cap) && queue_room(staged_alu_fu, 2)
            }
            ExecClass::AluB => {
                queue_room(staged_alu_b, alu_b_cap) && queue_room(staged_alu_b_fu, 2)
            }
            ExecClass::Mem => {
                if earlier_unissued_store {
                    false
                } else {
                    let raw_ok = [src_a, src_b]
                        .into_iter()
                        .flatten()
                        .map(|s| m.regs.committed().is_ready(s, cycle))
                        .collect::<Result<Vec<_>, _>>()?
                        .into_iter()
                        .all(|ready| ready);
                    raw_ok && queue_room(staged_mem, mem_cap)
                }
            }
            ExecClass::Control => unreachable!("control instructions never reach Pre-Issue"),
        };

        if !can_issue {
            continue;
        }

        issue_entry(m, entry, cycle)?;
        match entry.inst.exec_class() {
            ExecClass::Alu => {
                staged_alu += 1;
                staged_alu_fu += 1;
            }
            ExecClass::AluB => {
                staged_alu_b += 1;
                staged_alu_b_fu += 1;
            }
            ExecClass::Mem => staged_mem += 1,
            ExecClass::Control => unreachable!(),
        }
        still_present[i] = None;
        outcome.issued += 1;

        let pending_index = m
            .pre_issue
            .pending()
            .iter()
            .position(|e| e.pc == entry.pc)
            .expect("issued entry must still be present in the pending buffer");
        m.pre_issue.pending_mut().remove(pending_index);
    }

    Ok(outcome)
}

fn producer_of(m: &Machine, reg: usize) -> Option<Fu> {
    let alu_match = m
        .scoreboard
        .committed()
        .alu
        .active
        .as_ref()
        .or(m.scoreboard.committed().alu.shadow.as_ref())
        .is_some_and(|e| e.dest == Some(reg));
    let alu_b_match = m
        .scoreboard
        .committed()
        .alu_b
        .active
        .as_ref()
        .or(m.scoreboard.committed().alu_b.shadow.as_ref())
        .is_some_and(|e| e.dest == Some(reg));
    if alu_match {
        Some(Fu::Alu)
    } else if alu_b_match {
        Some(Fu::AluB)
    } else {
        None
    }
}

fn issue_entry(m: &mut Machine, entry: Entry, cycle: u64) -> Result<(), SimError> {
    let (src_a, src_b) = entry.inst.sources();

    match entry.inst.exec_class() {
        ExecClass::Alu => {
            let fu_entry = FuEntry {
                dest: entry.inst.dest(),
                src_a,
                src_b,
                src_a_producer: src_a.and_then(|s| producer_of(m, s)),
                src_b_producer: src_b.and_then(|s| producer_of(m, s)),
                src_a_ready: match src_a {
                    Some(s) => m.regs.committed().is_ready(s, cycle)?,
                    None => true,
                },
                src_b_ready: match src_b {
                    Some(s) => m.regs.committed().is_ready(s, cycle)?,
                    None => true,
                },
                cycles_remaining: 1,
            };
            m.scoreboard.pending_mut().alu.place(fu_entry);
            if let Some(d) = entry.inst.dest() {
                m.regs
                    .pending_mut()
                    .mark(d, crate::arch::Unit::Alu, cycle)?;
            }
            m.pre_alu.pending_mut().try_push(entry);
        }
        ExecClass::AluB => {
            let fu_entry = FuEntry {
                dest: entry.inst.dest(),
                src_a,
                src_b,
                src_a_producer: src_a.and_then(|s| producer_of(m, s)),
                src_b_producer: src_b.and_then(|s| producer_of(m, s)),
                src_a_ready: match src_a {
                    Some(s) => m.regs.committed().is_ready(s, cycle)?,
                    None => true,
                },
                src_b_ready: match src_b {
                    Some(s) => m.regs.committed().is_ready(s, cycle)?,
                    None => true,
                },
                cycles_remaining: 2,
            };
            m.scoreboard.pending_mut().alu_b.place(fu_entry);
            if let Some(d) = entry.inst.dest() {
                m.regs
                    .pending_mut()
                    .mark(d, crate::arch::Unit::AluB, cycle)?;
            }
            m.pre_alu_b.pending_mut().try_push(entry);
        }
        ExecClass::Mem => {
            if let Instruction::Lw { rt, .. } = entry.inst {
                m.regs
                    .pending_mut()
                    .mark(rt, crate::arch::Unit::Mem, cycle)?;
            }
            m.pre_mem.pending_mut().try_push(entry);
        }
        ExecClass::Control => unreachable!("control instructions never reach Pre-Issue"),
    }
    Ok(())
}
