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

// driver.rs
//
// Drives a `Scheduler` one cycle at a time, printing a snapshot after
// each cycle, either on a fixed cycle budget or interactively: the user
// hits Enter to step, or `q`/EOF to stop early.

use std::io::{self, BufRead, Write as _};

use crate::engine::Scheduler;
use crate::printer::{self, OutputFormat};

pub struct DriverConfig {
    pub max_cycles: u32,
    pub interactive: bool,
    pub quiet: bool,
    pub format: OutputFormat,
}

/// Run `sched` to completion (or `max_cycles`, whichever comes first).
/// Returns the number of cycles actually advanced.
pub fn run<W: io::Write>(sched: &mut Scheduler, config: &DriverConfig, out: &mut W) -> io::Result<u32> {
    let mut advanced = 0;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while advanced < config.max_cycles && !sched.is_done() {
        sched.advance_one_cycle();
        advanced += 1;

        if !config.quiet {
            writeln!(out, "{}", printer::render(sched, config.format))?;
        }

        if config.interactive {
            write!(out, "-- press Enter to step, 'q' to quit --")?;
            out.flush()?;
            match lines.next() {
                Some(Ok(line)) if line.trim().eq_ignore_ascii_case("q") => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e),
                None => break, // EOF
            }
        }
    }

    Ok(advanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TomasuloConfig;
    use crate::engine::{Instruction, Operation};

    #[test]
    fn non_interactive_run_stops_when_program_is_done() {
        let mut sched = Scheduler::new(
            TomasuloConfig::default(),
            vec![Instruction::new(Operation::Add, 1, 2, 3, 0.0)],
        );
        let config = DriverConfig {
            max_cycles: 100,
            interactive: false,
            quiet: true,
            format: OutputFormat::Text,
        };
        let mut sink = Vec::new();
        let advanced = run(&mut sched, &config, &mut sink).unwrap();
        assert!(advanced < 100);
        assert!(sched.is_done());
    }

    #[test]
    fn non_interactive_run_respects_max_cycles() {
        let mut sched = Scheduler::new(
            TomasuloConfig::default(),
            vec![Instruction::new(Operation::Div, 1, 2, 3, 0.0)],
        );
        let config = DriverConfig {
            max_cycles: 3,
            interactive: false,
            quiet: true,
            format: OutputFormat::Text,
        };
        let mut sink = Vec::new();
        let advanced = run(&mut sched, &config, &mut sink).unwrap();
        assert_eq!(advanced, 3);
        assert!(!sched.is_done());
    }
}
