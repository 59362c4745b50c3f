//! Simulation driver: runs a loaded program one committed cycle at a
//! time, accumulating the `sim` snapshot block for each cycle.
//!
//! This module deliberately never touches the filesystem — it is
//! handed an already-loaded [`LoadedProgram`] and hands back rendered
//! text, leaving all file I/O to the CLI.

use crate::common::error::SimError;
use crate::loader::{LoadedProgram, START_PC};
use crate::pipeline::engine::{Machine, StepOutcome};
use crate::snapshot;

/// Safety cycle bound the CLI falls back to when `--max-cycles` is not
/// given explicitly.
pub const DEFAULT_MAX_CYCLES: u64 = 10_000;

/// The accumulated result of driving a [`Machine`] to completion.
#[derive(Debug)]
pub struct SimRun {
    /// The concatenated `sim` snapshot blocks, one per attempted
    /// cycle, in cycle order. Populated even on failure, up to and
    /// including the failing cycle.
    pub output: String,
    /// `Ok(())` on a clean BREAK retirement; the first fatal
    /// [`SimError`] otherwise.
    pub result: Result<(), SimError>,
}

/// Runs `program` from [`START_PC`] until BREAK retires, a stage
/// raises a fatal [`SimError`], or `max_cycles` elapses without BREAK
/// retiring (reported as [`SimError::CycleBudgetExceeded`]).
///
/// Every committed cycle's snapshot is appended to [`SimRun::output`]
/// before the loop checks for halt, budget exhaustion, or (on the
/// next iteration) a stage error — so a caller always has the
/// snapshot text up to the point of failure.
#[must_use]
pub fn run(program: LoadedProgram, max_cycles: u64) -> SimRun {
    let mut machine = Machine::new(START_PC, program.instructions, program.data);
    let mut output = String::new();

    loop {
        let pc_at_start = machine.pc;
        match machine.step() {
            Ok(outcome) => {
                output.push_str(&snapshot::render(&machine, &outcome));
                output.push('\n');

                if outcome.halted {
                    return SimRun {
                        output,
                        result: Ok(()),
                    };
                }
                if machine.cycle >= max_cycles {
                    let err = SimError::CycleBudgetExceeded { budget: max_cycles }.traced();
                    return SimRun {
                        output,
                        result: Err(err),
                    };
                }
            }
            Err(err) => {
                // The failing cycle never committed (`Machine::step`
                // only commits once every stage succeeds), so render
                // from whatever the last good commit left behind; the
                // cycle/pc fields still identify where it failed.
                let fallback = StepOutcome {
                    cycle: machine.cycle,
                    pc_at_start,
                    waiting: None,
                    executed: None,
                    halted: false,
                };
                output.push_str(&snapshot::render(&machine, &fallback));
                output.push('\n');
                return SimRun {
                    output,
                    result: Err(err),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_program;

    #[test]
    fn break_only_program_runs_exactly_one_cycle() {
        let image = format!(
            "{}\n{}\n",
            "00000000000000000000000000000000",
            "00000000000000000000000000001101",
        );
        let loaded = load_program(&image).unwrap();
        let run_result = run(loaded, DEFAULT_MAX_CYCLES);

        assert!(run_result.result.is_ok());
        assert_eq!(run_result.output.matches("Cycle:").count(), 1);
        assert!(run_result.output.contains("Cycle:1\t64\tNOP"));
    }

    #[test]
    fn cycle_budget_exceeded_is_reported_and_output_still_flushed() {
        // J #64 loops on itself forever; BREAK is present in the
        // image (so the loader accepts it) but is never reached.
        let image = format!(
            "{}\n{}\n",
            "00001000000000000000000000010000",
            "00000000000000000000000000001101",
        );
        let loaded = load_program(&image).unwrap();
        let run_result = run(loaded, 10);

        assert!(matches!(
            run_result.result,
            Err(SimError::CycleBudgetExceeded { budget: 10 })
        ));
        assert_eq!(run_result.output.matches("Cycle:").count(), 10);
    }
}
