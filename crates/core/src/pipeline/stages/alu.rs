//! The 1-cycle ALU: AND/NOR/SUB/ADD/SLT, register or Category-2
//! immediate forms.

use crate::common::error::SimError;
use crate::isa::Instruction;
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::ExecResult;

/// What the ALU produced this cycle, for the snapshot formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AluOutcome {
    /// The result deposited into Post-ALU, if any.
    pub result: Option<ExecResult>,
}

fn compute(m: &Machine, inst: &Instruction, cycle: u64) -> Result<(usize, i32), SimError> {
    let rf = m.regs.committed();
    let value = match *inst {
        Instruction::And { rd, rs, rt } => (rd, rf.read(rs, cycle)? & rf.read(rt, cycle)?),
        Instruction::Nor { rd, rs, rt } => (rd, !(rf.read(rs, cycle)? | rf.read(rt, cycle)?)),
        Instruction::Sub { rd, rs, rt } => {
            (rd, rf.read(rs, cycle)?.wrapping_sub(rf.read(rt, cycle)?))
        }
        Instruction::Add { rd, rs, rt } => {
            (rd, rf.read(rs, cycle)?.wrapping_add(rf.read(rt, cycle)?))
        }
        Instruction::Slt { rd, rs, rt } => {
            (rd, i32::from(rf.read(rs, cycle)? < rf.read(rt, cycle)?))
        }
        Instruction::AddI { rt, rs, imm } => (rt, rf.read(rs, cycle)?.wrapping_add(imm)),
        Instruction::SubI { rt, rs, imm } => (rt, rf.read(rs, cycle)?.wrapping_sub(imm)),
        Instruction::AndI { rt, rs, imm } => (rt, rf.read(rs, cycle)? & imm),
        Instruction::NorI { rt, rs, imm } => (rt, !(rf.read(rs, cycle)? | imm)),
        Instruction::SltI { rt, rs, imm } => (rt, i32::from(rf.read(rs, cycle)? < imm)),
        other => unreachable!("{other:?} is not an ALU-class instruction"),
    };
    Ok(value)
}

/// Runs the ALU for one cycle: pops and computes the head of Pre-ALU
/// if it is ready, else clears any stale Post-ALU occupant so it is
/// not re-drained by Write-Back.
///
/// # Errors
///
/// Propagates register-access errors from [`compute`].
pub fn alu_stage(m: &mut Machine) -> Result<AluOutcome, SimError> {
    let cycle = m.cycle;
    let Some(entry) = m.pre_alu.committed().get(0).copied() else {
        m.post_alu.pending_mut().take();
        return Ok(AluOutcome::default());
    };

    // `r_j`/`r_k` are snapshotted onto the scoreboard at Issue time and
    // never updated in place, and the scoreboard's `active` slot can
    // lag a cycle behind whichever instruction is actually at the head
    // of Pre-ALU (it isn't drained until the cycle after its result is
    // posted). So readiness is re-derived straight from the head
    // instruction's own source registers against the committed
    // register file every cycle, rather than trusting either the
    // stored flags or the scoreboard row they were written against.
    let (src_a, src_b) = entry.inst.sources();
    let src_a_ready = match src_a {
        Some(r) => m.regs.committed().is_ready(r, cycle)?,
        None => true,
    };
    let src_b_ready = match src_b {
        Some(r) => m.regs.committed().is_ready(r, cycle)?,
        None => true,
    };

    if !(src_a_ready && src_b_ready) {
        m.post_alu.pending_mut().take();
        return Ok(AluOutcome::default());
    }

    let (dest, value) = compute(m, &entry.inst, cycle)?;
    let result = ExecResult { entry, dest, value };
    m.post_alu.pending_mut().set(result);
    m.pre_alu.pending_mut().pop_front();

    Ok(AluOutcome {
        result: Some(result),
    })
}
