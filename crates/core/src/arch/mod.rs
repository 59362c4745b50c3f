//! Architectural state: the register file and the data segment.

pub mod memory;
pub mod registers;

pub use memory::DataSegment;
pub use registers::{RegisterFile, Unit};
