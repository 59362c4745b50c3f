//! MEM: the single-cycle memory port. Loads post a result for
//! Write-Back; stores commit directly to the data segment.

use crate::common::error::SimError;
use crate::isa::Instruction;
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::ExecResult;

/// What MEM did this cycle, for the snapshot formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemOutcome {
    /// The load result deposited into Post-MEM, if any.
    pub result: Option<ExecResult>,
    /// True if a store committed to the data segment this cycle.
    pub stored: bool,
}

/// Runs MEM for one cycle.
///
/// # Errors
///
/// Returns [`SimError::AddressOutOfRange`] if the effective address
/// falls outside the loaded data segment or is unaligned.
pub fn mem_stage(m: &mut Machine) -> Result<MemOutcome, SimError> {
    let cycle = m.cycle;
    let Some(entry) = m.pre_mem.committed().get(0).copied() else {
        m.post_mem.pending_mut().take();
        return Ok(MemOutcome::default());
    };

    let mut outcome = MemOutcome::default();
    match entry.inst {
        Instruction::Lw { rt, rs, offset } => {
            let base = m.regs.committed().read(rs, cycle)?;
            let address = (base + offset) as u32;
            let value = m.data.committed().read(address, cycle)?;
            let result = ExecResult {
                entry,
                dest: rt,
                value,
            };
            m.post_mem.pending_mut().set(result);
            outcome.result = Some(result);
        }
        Instruction::Sw { rt, rs, offset } => {
            let base = m.regs.committed().read(rs, cycle)?;
            let address = (base + offset) as u32;
            let value = m.regs.committed().read(rt, cycle)?;
            m.data.pending_mut().write(address, value, cycle)?;
            m.post_mem.pending_mut().take();
            outcome.stored = true;
        }
        other => unreachable!("{other:?} is not a MEM-class instruction"),
    }
    m.pre_mem.pending_mut().pop_front();

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::DataSegment;
    use crate::pipeline::engine::Machine;
    use crate::pipeline::entries::Entry;
    use std::collections::BTreeMap;

    fn fresh_machine() -> Machine {
        Machine::new(64, BTreeMap::new(), DataSegment::new(64, vec![3, 4, 5]))
    }

    #[test]
    fn lw_reads_data_segment_into_post_mem() {
        let mut m = fresh_machine();
        m.regs.pending_mut().write(1, 64, 0).unwrap();
        m.regs.commit();
        m.pre_mem.pending_mut().try_push(Entry::new(
            64,
            Instruction::Lw {
                rt: 2,
                rs: 1,
                offset: 4,
            },
        ));
        m.pre_mem.commit();

        let outcome = mem_stage(&mut m).unwrap();
        let result = outcome.result.unwrap();
        assert_eq!(result.value, 4);
        assert_eq!(result.dest, 2);
    }

    #[test]
    fn sw_writes_data_segment_and_posts_nothing() {
        let mut m = fresh_machine();
        m.regs.pending_mut().write(1, 64, 0).unwrap();
        m.regs.pending_mut().write(2, 99, 0).unwrap();
        m.regs.commit();
        m.pre_mem.pending_mut().try_push(Entry::new(
            64,
            Instruction::Sw {
                rt: 2,
                rs: 1,
                offset: 0,
            },
        ));
        m.pre_mem.commit();

        let outcome = mem_stage(&mut m).unwrap();
        assert!(outcome.result.is_none());
        assert!(outcome.stored);
        m.data.commit();
        assert_eq!(m.data.committed().read(64, 0).unwrap(), 99);
    }
}
