// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// main.rs
//
// This file contains the main entry point for the Tomasulo simulator.
// It provides a command-line interface for running a program of
// floating-point instructions through the engine, cycle by cycle.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use tomasulo_sim::config::TomasuloConfig;
use tomasulo_sim::driver::{self, DriverConfig};
use tomasulo_sim::engine::Scheduler;
use tomasulo_sim::parser::parse_program;
use tomasulo_sim::printer::{self, OutputFormat};
use tomasulo_sim::utils::logger::{LogLevel, Logger};

#[derive(Parser)]
#[command(name = "tomasulo-sim")]
#[command(about = "A cycle-accurate simulator of Tomasulo's dynamic instruction scheduling algorithm")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program through the engine
    Run {
        /// Assembly program file (ADD/SUB/MUL/DIV Rd Rs1 Rs2, LOAD/STORE imm(Rbase))
        program: PathBuf,

        /// Maximum number of cycles to run non-interactively. Omit to fall
        /// back to the interactive stepper (press Enter to advance one
        /// cycle, 'q' to stop).
        #[arg(long)]
        cycles: Option<u32>,

        /// Suppress the per-cycle snapshot; print only the final state
        #[arg(short, long)]
        quiet: bool,

        /// Snapshot rendering format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write CLI-facing log messages to this file instead of stdout
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Log dropped/unrecognized lines instead of silently skipping them
        #[arg(long)]
        warn_on_parse_error: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            cycles,
            quiet,
            format,
            log_file,
            warn_on_parse_error,
        } => run(program, cycles, quiet, format, log_file, warn_on_parse_error),
    }
}

fn run(
    program_path: PathBuf,
    cycles: Option<u32>,
    quiet: bool,
    format: OutputFormat,
    log_file: Option<PathBuf>,
    warn_on_parse_error: bool,
) -> ExitCode {
    let mut logger = Logger::new(log_file.as_ref().and_then(|p| p.to_str()), LogLevel::Info);

    let text = match fs::read_to_string(&program_path) {
        Ok(text) => text,
        Err(e) => {
            logger.error(&format!("failed to read {}: {e}", program_path.display()));
            return ExitCode::FAILURE;
        },
    };

    let config = TomasuloConfig::default();
    let instructions = parse_program(&text, config.max_instructions, warn_on_parse_error);
    if instructions.is_empty() {
        logger.warning("no instructions parsed from input; nothing to simulate");
    }

    let mut sched = Scheduler::new(config, instructions);
    // Omitting --cycles falls back to the interactive stepper, with no
    // fixed cycle cap beyond what `Scheduler::is_done` or the user's 'q'
    // naturally imposes.
    let driver_config = DriverConfig {
        max_cycles: cycles.unwrap_or(u32::MAX),
        interactive: cycles.is_none(),
        quiet,
        format,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let advanced = match driver::run(&mut sched, &driver_config, &mut out) {
        Ok(advanced) => advanced,
        Err(e) => {
            logger.error(&format!("I/O error while driving simulation: {e}"));
            return ExitCode::FAILURE;
        },
    };

    logger.info(&format!("simulation stopped after {advanced} cycle(s)"));
    println!("{}", printer::render(&sched, format));

    ExitCode::SUCCESS
}
