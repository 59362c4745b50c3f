//! Fatal error taxonomy for the simulator.
//!
//! Every error in this module is fatal to the run: there is no local
//! recovery path anywhere in the pipeline. Each variant carries enough
//! context (cycle, PC, and kind-specific detail) to reproduce the
//! diagnostic a test suite would diff against.

use thiserror::Error;

/// A fatal condition encountered while decoding a program image or
/// stepping the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A 32-bit word could not be decoded into a known instruction.
    #[error("decode error at line {line}: {reason}")]
    Decode {
        /// 1-based line number in the program image.
        line: usize,
        /// Human-readable description of what failed (unknown opcode,
        /// unknown R-type func, malformed bit string, ...).
        reason: String,
    },

    /// A register index fell outside `0..32`.
    #[error("register R{index} out of range at cycle {cycle}")]
    RegisterOutOfRange {
        /// The offending index.
        index: i64,
        /// Cycle on which the access was attempted.
        cycle: u64,
    },

    /// A data segment address fell outside the loaded range.
    #[error("address {address:#x} out of range at cycle {cycle}")]
    AddressOutOfRange {
        /// The offending byte address.
        address: u32,
        /// Cycle on which the access was attempted.
        cycle: u64,
    },

    /// A scoreboard or buffer invariant was violated — a logic bug.
    #[error("invariant violated at cycle {cycle}: {invariant}")]
    InvariantViolation {
        /// Which invariant broke.
        invariant: String,
        /// Cycle on which the violation was detected.
        cycle: u64,
    },

    /// Fetch walked the PC past the end of the loaded instruction
    /// segment without having retired BREAK.
    #[error("fetch past end of instruction memory at pc={pc:#x}, cycle {cycle}")]
    FetchPastEnd {
        /// The out-of-range PC.
        pc: u32,
        /// Cycle on which this was detected.
        cycle: u64,
    },

    /// Defensive bound: the run exceeded the configured cycle budget
    /// without retiring BREAK.
    #[error("exceeded cycle budget of {budget} without retiring BREAK")]
    CycleBudgetExceeded {
        /// The configured budget that was exceeded.
        budget: u64,
    },
}

impl SimError {
    /// Logs this error via `tracing::error!` and returns it unchanged,
    /// so call sites can write `return Err(err.traced())`.
    #[must_use]
    pub fn traced(self) -> Self {
        tracing::error!(error = %self, "fatal simulator error");
        self
    }
}
