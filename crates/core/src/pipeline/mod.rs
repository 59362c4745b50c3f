//! The pipeline engine: buffers, scoreboard, the six execution stages,
//! and the `Machine` that drives one cycle at a time.

pub mod buffers;
pub mod engine;
pub mod entries;
pub mod scoreboard;
pub mod stages;

pub use buffers::{Cycle, Slot, Slots};
pub use engine::{Machine, StepOutcome};
pub use entries::{Entry, ExecResult};
pub use scoreboard::{Fu, FuEntry, FuSlot, Scoreboard};
