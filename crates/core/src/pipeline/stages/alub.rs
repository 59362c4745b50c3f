//! The 2-cycle ALU-B: shifts and multiplies. The head of Pre-ALU-B
//! occupies the unit for two cycles before its result is posted.

use crate::common::error::SimError;
use crate::isa::Instruction;
use crate::pipeline::engine::Machine;
use crate::pipeline::entries::ExecResult;

/// What ALU-B produced this cycle, for the snapshot formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AluBOutcome {
    /// The result deposited into Post-ALU-B, if this was its second
    /// (final) cycle of occupancy.
    pub result: Option<ExecResult>,
}

fn compute(m: &Machine, inst: &Instruction, cycle: u64) -> Result<(usize, i32), SimError> {
    let rf = m.regs.committed();
    let value = match *inst {
        Instruction::Sll { rd, rt, sa } => (rd, ((rf.read(rt, cycle)? as u32) << sa) as i32),
        Instruction::Srl { rd, rt, sa } => (rd, ((rf.read(rt, cycle)? as u32) >> sa) as i32),
        Instruction::Sra { rd, rt, sa } => (rd, rf.read(rt, cycle)? >> sa),
        Instruction::Mul { rd, rs, rt } => {
            let product = i64::from(rf.read(rs, cycle)?) * i64::from(rf.read(rt, cycle)?);
            (rd, product as i32)
        }
        Instruction::MulI { rt, rs, imm } => {
            let product = i64::from(rf.read(rs, cycle)?) * i64::from(imm);
            (rt, product as i32)
        }
        other => unreachable!("{other:?} is not an ALU-B-class instruction"),
    };
    Ok(value)
}

/// Runs ALU-B for one cycle.
///
/// # Errors
///
/// Propagates register-access errors from [`compute`].
pub fn alu_b_stage(m: &mut Machine) -> Result<AluBOutcome, SimError> {
    let cycle = m.cycle;
    let Some(entry) = m.pre_alu_b.committed().get(0).copied() else {
        m.post_alu_b.pending_mut().take();
        return Ok(AluBOutcome::default());
    };

    // See `alu_stage` for why readiness is re-derived from the head
    // instruction's own sources against the committed register file,
    // rather than from whichever entry currently sits in the
    // scoreboard's `active` slot.
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
        m.post_alu_b.pending_mut().take();
        return Ok(AluBOutcome::default());
    }

    // The scoreboard row carrying this entry's `cycles_remaining`
    // counter can likewise be in `active` or `shadow` depending on
    // whether a still-draining predecessor is one cycle from clearing
    // `active` — identify the right row by destination register
    // (WAW already guarantees at most one in-flight entry per dest)
    // rather than assuming `active` always belongs to the head.
    let head_dest = entry.inst.dest();
    let slot = m.scoreboard.committed().alu_b;
    let in_active = slot.active.is_some_and(|e| e.dest == head_dest);
    let in_shadow = slot.shadow.is_some_and(|e| e.dest == head_dest);
    let cycles_remaining = slot
        .active
        .filter(|e| e.dest == head_dest)
        .or_else(|| slot.shadow.filter(|e| e.dest == head_dest))
        .map_or(1, |e| e.cycles_remaining);

    if cycles_remaining > 1 {
        let sb = m.scoreboard.pending_mut();
        if in_active {
            if let Some(active) = sb.alu_b.active.as_mut() {
                active.cycles_remaining -= 1;
            }
        } else if in_shadow {
            if let Some(shadow) = sb.alu_b.shadow.as_mut() {
                shadow.cycles_remaining -= 1;
            }
        }
        m.post_alu_b.pending_mut().take();
        return Ok(AluBOutcome::default());
    }

    let (dest, value) = compute(m, &entry.inst, cycle)?;
    let result = ExecResult { entry, dest, value };
    m.post_alu_b.pending_mut().set(result);
    m.pre_alu_b.pending_mut().pop_front();

    Ok(AluBOutcome {
        result: Some(result),
    })
}
