//! Scoreboard: one entry per functional unit, tracking operand
//! readiness so Issue can enforce WAW/WAR/RAW without re-deriving it
//! from the buffers every cycle.

/// Which functional unit produces an operand still in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fu {
    /// The 1-cycle ALU.
    Alu,
    /// The 2-cycle ALU-B.
    AluB,
}

/// A functional unit's scoreboard row: destination (`f_i`), the two
/// source registers (`f_j`/`f_k`), which FU (if any) still owes each
/// source (`q_j`/`q_k`), and whether each source is ready (`r_j`/`r_k`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuEntry {
    /// Destination register (`f_i`).
    pub dest: Option<usize>,
    /// First source register (`f_j`).
    pub src_a: Option<usize>,
    /// Second source register (`f_k`), `None` for immediate forms.
    pub src_b: Option<usize>,
    /// FU that will produce `src_a`, if not already in the RF (`q_j`).
    pub src_a_producer: Option<Fu>,
    /// FU that will produce `src_b`, if not already in the RF (`q_k`).
    pub src_b_producer: Option<Fu>,
    /// Whether `src_a` is ready (`r_j`).
    pub src_a_ready: bool,
    /// Whether `src_b` is ready (`r_k`); vacuously true when `src_b`
    /// is `None`.
    pub src_b_ready: bool,
    /// Cycles remaining before this entry's result is ready
    /// (1 for the ALU, 2 then 1 for ALU-B).
    pub cycles_remaining: u8,
}

impl FuEntry {
    /// Both operands ready, i.e. `r_j ∧ r_k`.
    #[must_use]
    pub fn operands_ready(&self) -> bool {
        self.src_a_ready && self.src_b_ready
    }
}

/// Two-entry ring for one functional unit: an `active` slot executing
/// the oldest issued instruction, and a `shadow` slot holding a just
/// issued instruction while `active` is still busy. Write-Back
/// promotes `shadow` into `active` once `active` drains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FuSlot {
    /// The instruction currently executing, if any.
    pub active: Option<FuEntry>,
    /// A just-issued instruction waiting for `active` to drain.
    pub shadow: Option<FuEntry>,
}

impl FuSlot {
    /// True iff `active` is occupied.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// True iff at least one of `active`/`shadow` is free.
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.active.is_none() || self.shadow.is_none()
    }

    /// Places `entry` into `active` if free, else into `shadow`.
    /// Panics if neither slot is free — callers must check
    /// [`Self::has_room`] first.
    pub fn place(&mut self, entry: FuEntry) {
        if self.active.is_none() {
            self.active = Some(entry);
        } else {
            assert!(self.shadow.is_none(), "FU slot has no room");
            self.shadow = Some(entry);
        }
    }

    /// Clears `active` and, if `shadow` held an entry, promotes it.
    pub fn drain_active(&mut self) {
        self.active = self.shadow.take();
    }
}

/// The two functional-unit scoreboard rows. There is no persistent
/// entry for the memory port: LW/SW ordering and hazard checks are
/// enforced directly against register reservation flags at Issue time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// The ALU's active/shadow ring.
    pub alu: FuSlot,
    /// ALU-B's active/shadow ring.
    pub alu_b: FuSlot,
}

impl Scoreboard {
    /// Fresh scoreboard with both FUs idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the ring for `fu`.
    #[must_use]
    pub fn slot(&self, fu: Fu) -> &FuSlot {
        match fu {
            Fu::Alu => &self.alu,
            Fu::AluB => &self.alu_b,
        }
    }

    /// Mutably borrows the ring for `fu`.
    pub fn slot_mut(&mut self, fu: Fu) -> &mut FuSlot {
        match fu {
            Fu::Alu => &mut self.alu,
            Fu::AluB => &mut self.alu_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dest: usize) -> FuEntry {
        FuEntry {
            dest: Some(dest),
            src_a: None,
            src_b: None,
            src_a_producer: None,
            src_b_producer: None,
            src_a_ready: true,
            src_b_ready: true,
            cycles_remaining: 1,
        }
    }

    #[test]
    fn place_fills_active_then_shadow() {
        let mut slot = FuSlot::default();
        slot.place(entry(1));
        assert!(slot.is_busy());
        assert!(slot.has_room());
        slot.place(entry(2));
        assert!(!slot.has_room());
        assert_eq!(slot.active.unwrap().dest, Some(1));
        assert_eq!(slot.shadow.unwrap().dest, Some(2));
    }

    #[test]
    fn drain_active_promotes_shadow() {
        let mut slot = FuSlot::default();
        slot.place(entry(1));
        slot.place(entry(2));
        slot.drain_active();
        assert_eq!(slot.active.unwrap().dest, Some(2));
        assert!(slot.shadow.is_none());
    }

    #[test]
    fn operands_ready_requires_both_flags() {
        let mut e = entry(1);
        e.src_b_ready = false;
        assert!(!e.operands_ready());
        e.src_b_ready = true;
        assert!(e.operands_ready());
    }
}
