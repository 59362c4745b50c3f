//! The six pipeline stages, run in fixed order by `Machine::step`.

pub mod alu;
pub mod alub;
pub mod fetch;
pub mod issue;
pub mod mem;
pub mod writeback;

pub use alu::alu_stage;
pub use alub::alu_b_stage;
pub use fetch::fetch_stage;
pub use issue::issue_stage;
pub use mem::mem_stage;
pub use writeback::write_back_stage;
