//! `mipssim` — command-line front end for the two-issue, out-of-order
//! MIPS32 scoreboard pipeline simulator.
//!
//! This binary owns all filesystem access; the `mipssim-core` library
//! never reads or writes a file directly.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mipssim_core::{disassemble, load_program, run, SimError, DEFAULT_MAX_CYCLES};

#[derive(Parser, Debug)]
#[command(
    name = "mipssim",
    author,
    version,
    about = "Cycle-accurate simulator for a reduced two-issue out-of-order MIPS32 pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disassemble a program image, one line per program word.
    Dis {
        /// Path to the 32-char binary-word program image.
        #[arg(long)]
        input: String,
        /// Path to write the disassembly text to.
        #[arg(long)]
        output: String,
    },
    /// Simulate a program image, one snapshot block per cycle.
    Sim {
        /// Path to the 32-char binary-word program image.
        #[arg(long)]
        input: String,
        /// Path to write the per-cycle snapshot text to.
        #[arg(long)]
        output: String,
        /// Safety cycle bound; the run fails with `CycleBudgetExceeded`
        /// if BREAK hasn't retired by then.
        #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
        max_cycles: u64,
    },
    /// Disassemble, then simulate, the same program image.
    DisSim {
        /// Path to the 32-char binary-word program image.
        #[arg(long)]
        input: String,
        /// Path to write the disassembly text to.
        #[arg(long = "output-dis")]
        output_dis: String,
        /// Path to write the per-cycle snapshot text to.
        #[arg(long = "output-sim")]
        output_sim: String,
        /// Safety cycle bound; see [`Command::Sim`].
        #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
        max_cycles: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Dis { input, output } => run_dis(&input, &output),
        Command::Sim {
            input,
            output,
            max_cycles,
        } => run_sim(&input, &output, max_cycles),
        Command::DisSim {
            input,
            output_dis,
            output_sim,
            max_cycles,
        } => {
            let dis_code = run_dis(&input, &output_dis);
            if dis_code != ExitCode::SUCCESS {
                return dis_code;
            }
            run_sim(&input, &output_sim, max_cycles)
        }
    }
}

fn read_input(path: &str) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error reading {path}: {e}");
        ExitCode::FAILURE
    })
}

fn report(err: &SimError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::FAILURE
}

fn run_dis(input: &str, output: &str) -> ExitCode {
    let text = match read_input(input) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let rendered = match disassemble(&text) {
        Ok(rendered) => rendered,
        Err(err) => return report(&err),
    };

    if let Err(e) = fs::write(output, rendered) {
        eprintln!("error writing {output}: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_sim(input: &str, output: &str, max_cycles: u64) -> ExitCode {
    let text = match read_input(input) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let loaded = match load_program(&text) {
        Ok(loaded) => loaded,
        Err(err) => return report(&err),
    };

    let run_result = run(loaded, max_cycles);
    if let Err(e) = fs::write(output, &run_result.output) {
        eprintln!("error writing {output}: {e}");
        return ExitCode::FAILURE;
    }

    match run_result.result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::{run_dis, run_sim};

    fn write_image(contents: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn run_dis_writes_disassembly_to_the_output_path() {
        let input = write_image(&format!(
            "{}\n{}\n",
            "00000000000000000000000000000000",
            "00000000000000000000000000001101",
        ));
        let output = NamedTempFile::new().unwrap();

        let _code = run_dis(
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        );

        let rendered = fs::read_to_string(output.path()).unwrap();
        assert!(rendered.contains("BREAK"));
    }

    #[test]
    fn run_sim_leaves_the_output_empty_on_a_missing_input_path() {
        let output = NamedTempFile::new().unwrap();
        let _code = run_sim(
            "/nonexistent/path/to/image.txt",
            output.path().to_str().unwrap(),
            10,
        );
        let rendered = fs::read_to_string(output.path()).unwrap();
        assert!(rendered.is_empty());
    }

    #[test]
    fn run_sim_writes_cycle_snapshots_for_a_break_only_program() {
        let input = write_image(&format!(
            "{}\n{}\n",
            "00000000000000000000000000000000",
            "00000000000000000000000000001101",
        ));
        let output = NamedTempFile::new().unwrap();

        let _code = run_sim(
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            10,
        );

        let rendered = fs::read_to_string(output.path()).unwrap();
        assert!(rendered.contains("Cycle:1"));
    }
}
