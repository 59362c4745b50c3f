//! Cycle-accurate simulator core for a reduced, two-issue,
//! out-of-order MIPS32 pipeline governed by a scoreboard.
//!
//! This crate implements the execution engine end to end:
//! 1. **ISA:** the bit codec, the table-driven decoder, and the
//!    disassembler that renders a decoded instruction back to the
//!    canonical mnemonic/operand text.
//! 2. **Architectural state:** the register file (with its per-FU
//!    reservation flags) and the word-addressable data segment.
//! 3. **Pipeline:** the double-buffered buffers/queues, the
//!    active/shadow scoreboard, and the six execution stages (Fetch,
//!    Issue, ALU, ALU-B, MEM, Write-Back) driven one cycle at a time
//!    by [`Machine::step`](pipeline::Machine::step).
//! 4. **Loader and driver:** a pure program-image parser and a
//!    cycle-budgeted runner that accumulates the per-cycle snapshot
//!    text a `sim` front end writes out.
//!
//! The crate never touches the filesystem; callers (the `mipssim`
//! CLI, or any other embedding) own all file I/O and hand this crate
//! already-read text.

/// Architectural state: the register file and the data segment.
pub mod arch;
/// Shared primitives: the bit codec and the fatal error taxonomy.
pub mod common;
/// Instruction encoding: decoder, disassembler, and opcode tables.
pub mod isa;
/// Program-image loader.
pub mod loader;
/// Pipeline buffers, scoreboard, execution stages, and `Machine`.
pub mod pipeline;
/// Cycle-budgeted simulation driver.
pub mod sim;
/// Per-cycle `sim` snapshot formatter.
pub mod snapshot;

pub use common::SimError;
pub use isa::Instruction;
pub use loader::{disassemble, load_program, LoadedProgram, START_PC};
pub use pipeline::Machine;
pub use sim::{run, SimRun, DEFAULT_MAX_CYCLES};
