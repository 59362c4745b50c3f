//! `Machine`: owns all pipeline state and drives one cycle at a time.

use std::collections::BTreeMap;

use crate::arch::{DataSegment, RegisterFile};
use crate::common::error::SimError;
use crate::isa::Instruction;
use crate::pipeline::buffers::{Cycle, Slot, Slots};
use crate::pipeline::entries::{Entry, ExecResult};
use crate::pipeline::scoreboard::Scoreboard;
use crate::pipeline::stages::{
    alu_b_stage, alu_stage, fetch_stage, issue_stage, mem_stage, write_back_stage,
};

const PRE_ISSUE_CAPACITY: usize = 4;
const PRE_EXEC_CAPACITY: usize = 2;

/// What happened during one completed, committed cycle — the facts
/// the snapshot formatter needs that aren't already visible by
/// reading the post-commit buffers directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The cycle just completed (1-based).
    pub cycle: u64,
    /// PC Fetch was working from at the start of this cycle.
    pub pc_at_start: u32,
    /// A branch/jump still waiting on its operands.
    pub waiting: Option<Entry>,
    /// A branch/jump, or BREAK, resolved this cycle.
    pub executed: Option<Entry>,
    /// True once BREAK has retired.
    pub halted: bool,
}

/// Owns the program counter, cycle counter, architectural state, and
/// every pipeline buffer, each held behind [`Cycle`] so stages read a
/// stable committed view and write only to the pending view.
pub struct Machine {
    /// Current program counter (mutated only by Fetch).
    pub pc: u32,
    /// Number of cycles executed so far.
    pub cycle: u64,
    /// True once every pipeline buffer has drained after BREAK.
    pub halted: bool,
    /// True once BREAK has been fetched; Fetch stops issuing new work
    /// but the rest of the pipeline keeps stepping until it drains.
    pub break_fetched: bool,
    /// A branch/jump Fetch is still waiting to resolve.
    pub waiting_branch: Option<Entry>,
    /// The decoded program, keyed by PC.
    pub program: BTreeMap<u32, Instruction>,

    /// Architectural registers and their reservation flags.
    pub regs: Cycle<RegisterFile>,
    /// The data segment.
    pub data: Cycle<DataSegment>,
    /// The two-FU scoreboard.
    pub scoreboard: Cycle<Scoreboard>,

    /// Out-of-order Pre-Issue buffer, capacity 4.
    pub pre_issue: Cycle<Slots<Entry>>,
    /// Pre-ALU FIFO, capacity 2.
    pub pre_alu: Cycle<Slots<Entry>>,
    /// Pre-ALU-B FIFO, capacity 2.
    pub pre_alu_b: Cycle<Slots<Entry>>,
    /// Pre-MEM FIFO, capacity 2.
    pub pre_mem: Cycle<Slots<Entry>>,
    /// Post-ALU single slot.
    pub post_alu: Cycle<Slot<ExecResult>>,
    /// Post-ALU-B single slot.
    pub post_alu_b: Cycle<Slot<ExecResult>>,
    /// Post-MEM single slot.
    pub post_mem: Cycle<Slot<ExecResult>>,
}

impl Machine {
    /// Builds a fresh machine: PC at `start_pc`, all buffers empty,
    /// all registers zero, cycle counter at 0.
    #[must_use]
    pub fn new(start_pc: u32, program: BTreeMap<u32, Instruction>, data: DataSegment) -> Self {
        Self {
            pc: start_pc,
            cycle: 0,
            halted: false,
            break_fetched: false,
            waiting_branch: None,
            program,
            regs: Cycle::new(RegisterFile::new()),
            data: Cycle::new(data),
            scoreboard: Cycle::new(Scoreboard::new()),
            pre_issue: Cycle::new(Slots::new(PRE_ISSUE_CAPACITY)),
            pre_alu: Cycle::new(Slots::new(PRE_EXEC_CAPACITY)),
            pre_alu_b: Cycle::new(Slots::new(PRE_EXEC_CAPACITY)),
            pre_mem: Cycle::new(Slots::new(PRE_EXEC_CAPACITY)),
            post_alu: Cycle::new(Slot::new()),
            post_alu_b: Cycle::new(Slot::new()),
            post_mem: Cycle::new(Slot::new()),
        }
    }

    fn commit_all(&mut self) {
        self.regs.commit();
        self.data.commit();
        self.scoreboard.commit();
        self.pre_issue.commit();
        self.pre_alu.commit();
        self.pre_alu_b.commit();
        self.pre_mem.commit();
        self.post_alu.commit();
        self.post_alu_b.commit();
        self.post_mem.commit();
    }

    fn check_invariants(&self) -> Result<(), SimError> {
        let cycle = self.cycle;
        let over_capacity = self.pre_issue.committed().len() > PRE_ISSUE_CAPACITY
            || self.pre_alu.committed().len() > PRE_EXEC_CAPACITY
            || self.pre_alu_b.committed().len() > PRE_EXEC_CAPACITY
            || self.pre_mem.committed().len() > PRE_EXEC_CAPACITY;
        if over_capacity {
            return Err(SimError::InvariantViolation {
                invariant: "pipeline buffer exceeded its fixed capacity".to_string(),
                cycle,
            });
        }
        Ok(())
    }

    /// True once Pre-Issue and every Pre-*/Post-* buffer is empty, i.e.
    /// nothing is left in flight for BREAK to wait on.
    fn is_drained(&self) -> bool {
        self.pre_issue.committed().is_empty()
            && self.pre_alu.committed().is_empty()
            && self.pre_alu_b.committed().is_empty()
            && self.pre_mem.committed().is_empty()
            && !self.post_alu.committed().is_occupied()
            && !self.post_alu_b.committed().is_occupied()
            && !self.post_mem.committed().is_occupied()
    }

    /// Advances the machine by exactly one cycle: Fetch, Issue, ALU,
    /// ALU-B, MEM, Write-Back against the committed view, then
    /// `commit_all`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`SimError`] the first failing stage raises.
    /// The caller is still expected to emit a snapshot for this cycle
    /// before propagating the error (see `sim::simulator`).
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        self.cycle += 1;
        let cycle = self.cycle;
        let pc_at_start = self.pc;

        tracing::debug!(cycle, pc = pc_at_start, "stepping");

        let fetch_outcome = fetch_stage(self).map_err(SimError::traced)?;
        issue_stage(self).map_err(SimError::traced)?;
        alu_stage(self).map_err(SimError::traced)?;
        alu_b_stage(self).map_err(SimError::traced)?;
        mem_stage(self).map_err(SimError::traced)?;
        write_back_stage(self).map_err(SimError::traced)?;

        self.commit_all();
        self.check_invariants().map_err(SimError::traced)?;

        if self.break_fetched && self.is_drained() {
            self.halted = true;
        }

        Ok(StepOutcome {
            cycle,
            pc_at_start,
            waiting: fetch_outcome.waiting,
            executed: fetch_outcome.executed,
            halted: self.halted,
        })
    }
}
