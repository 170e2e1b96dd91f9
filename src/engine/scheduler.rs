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

// scheduler.rs
//
// The per-cycle state machine driving Issue, Execute, and Write Result
// across the station pool, and the Common Data Bus broadcast that ties
// them together. This is the core of the engine; see spec sections 4
// and 5 for the contract this file implements.
//
// Cycle numbering: `cycle` names the cycle currently being processed by
// a call to `advance_one_cycle`, and only advances once Issue, Execute,
// and Write Result have all run for it (spec section 5's canonical
// phase order ends with "advance cycle counter"). The first call
// processes cycle 0.

use crate::config::TomasuloConfig;
use crate::engine::instruction::{Instruction, Operation};
use crate::engine::registers::{RegisterFile, RegisterStatus};
use crate::engine::station::{Bank, StationPool};

const BANKS: [Bank; 4] = [Bank::AddSub, Bank::MulDiv, Bank::Load, Bank::Store];

/// Drives a fixed program of instructions through Issue, Execute, and
/// Write Result one cycle at a time.
pub struct Scheduler {
    pub config: TomasuloConfig,
    pub program: Vec<Instruction>,
    pub pc: usize,
    pub cycle: u32,
    pub registers: RegisterFile,
    pub register_status: RegisterStatus,
    pub stations: StationPool,
}

impl Scheduler {
    pub fn new(config: TomasuloConfig, program: Vec<Instruction>) -> Self {
        let register_count = config.register_count;
        Self {
            stations: StationPool::new(&config),
            registers: RegisterFile::new(register_count),
            register_status: RegisterStatus::new(register_count),
            config,
            program,
            pc: 0,
            cycle: 0,
        }
    }

    /// Number of instructions whose `issued` timestamp is set — always
    /// equal to `pc` (invariant 5, spec section 8).
    pub fn instructions_issued(&self) -> usize {
        self.pc
    }

    pub fn is_done(&self) -> bool {
        self.pc >= self.program.len() && self.stations.all_busy().next().is_none()
    }

    /// Advance the engine by exactly one cycle: Issue, then Execute, then
    /// Write Result, then the cycle counter. Non-blocking; the driver
    /// decides when to call this.
    ///
    /// A station that Issue places this cycle does not begin its latency
    /// countdown until the next cycle — Execute only decrements stations
    /// that were already busy when this cycle started (spec section 5:
    /// "a freshly issued instruction cannot complete in the same cycle
    /// it was issued"). The pre-issue snapshot is how that's enforced
    /// without a separate per-station flag.
    pub fn advance_one_cycle(&mut self) {
        let pre_issue_busy = self.snapshot_busy();
        self.try_issue();
        self.execute(&pre_issue_busy);
        self.write_result();
        self.cycle += 1;
    }

    fn snapshot_busy(&self) -> [Vec<bool>; 4] {
        BANKS.map(|bank| self.stations.bank(bank).iter().map(|s| s.busy).collect())
    }

    // ---- Issue ----------------------------------------------------------

    fn try_issue(&mut self) {
        if self.pc >= self.program.len() {
            return;
        }
        let op = self.program[self.pc].op;
        let Some(bank) = op.bank() else {
            // Nop never occupies a station; it "issues" immediately and
            // carries no further timestamps.
            self.program[self.pc].issued = Some(self.cycle);
            self.pc += 1;
            return;
        };

        let Some(index) = self.stations.find_free(bank) else {
            log::debug!("cycle {}: structural stall, no free {:?} station", self.cycle, bank);
            return;
        };

        let instr_index = self.pc;
        let instr = self.program[instr_index].clone();

        let (vj, qj, vk, qk) = match op {
            // Load addresses memory directly; it reads no source
            // register (spec section 4.2).
            Operation::Load => (0.0, 0, 0.0, 0),
            // Store's only operand is the value to store (src1); the
            // base register (src2) is treated as already resolved and
            // is never renamed (spec section 4.2, section 9).
            Operation::Store => {
                let (v, q) = self.operand(instr.src1);
                (v, q, 0.0, 0)
            },
            _ => {
                let (vj, qj) = self.operand(instr.src1);
                let (vk, qk) = self.operand(instr.src2);
                (vj, qj, vk, qk)
            },
        };

        let tag = self.stations.tag_of(bank, index);
        let station = self.stations.station_mut(bank, index);
        station.busy = true;
        station.op = op;
        station.dest = instr.dest;
        station.vj = vj;
        station.qj = qj;
        station.vk = vk;
        station.qk = qk;
        station.address = instr.immediate;
        station.remaining = op.latency();
        station.owner_instruction_index = Some(instr_index);

        // Store renames no destination register.
        if op != Operation::Store {
            self.register_status.set_producer(instr.dest, tag);
        }

        self.program[instr_index].issued = Some(self.cycle);
        self.pc += 1;

        log::debug!(
            "cycle {}: issued {} (instr {}) into {:?}[{}] tag {}",
            self.cycle,
            op.mnemonic(),
            instr_index,
            bank,
            index,
            tag
        );
    }

    /// Resolve a source register to (value, awaited tag) at Issue time.
    fn operand(&self, reg: usize) -> (f64, usize) {
        match self.register_status.producer(reg) {
            Some(tag) => (0.0, tag),
            None => (self.registers.read(reg), 0),
        }
    }

    // ---- Execute ----------------------------------------------------------

    fn execute(&mut self, pre_issue_busy: &[Vec<bool>; 4]) {
        for (bank_idx, bank) in BANKS.into_iter().enumerate() {
            for index in 0..self.stations.bank(bank).len() {
                if !pre_issue_busy[bank_idx][index] {
                    continue;
                }
                let station = self.stations.station_mut(bank, index);
                if station.remaining == 0 || !station.operands_ready() {
                    continue;
                }
                station.remaining -= 1;
                if station.remaining == 0 {
                    if let Some(instr_index) = station.owner_instruction_index {
                        self.program[instr_index].executed = Some(self.cycle);
                    }
                }
            }
        }
    }

    // ---- Write Result / CDB broadcast --------------------------------------

    fn write_result(&mut self) {
        // Collect eligible stations first: the idealised CDB broadcasts
        // everyone that's ready in the same cycle, and freeing one must
        // not affect whether another is still seen as eligible.
        let mut eligible = Vec::new();
        for bank in BANKS {
            for index in 0..self.stations.bank(bank).len() {
                let station = self.stations.station(bank, index);
                if station.busy && station.remaining == 0 && station.operands_ready() {
                    eligible.push((bank, index));
                }
            }
        }

        for (bank, index) in eligible {
            let tag = self.stations.tag_of(bank, index);
            let station = self.stations.station(bank, index).clone();
            let result = compute_result(&station);

            if station.op != Operation::Store {
                if self.register_status.clear_if(station.dest, tag) {
                    self.registers.write(station.dest, result);
                } else {
                    log::debug!(
                        "cycle {}: stale tag {} for R{} discarded (re-renamed since issue)",
                        self.cycle,
                        tag,
                        station.dest
                    );
                }
                self.stations.broadcast(tag, result);
            }

            if let Some(instr_index) = station.owner_instruction_index {
                self.program[instr_index].written = Some(self.cycle);
                self.program[instr_index].completed = Some(self.cycle);
            }

            self.stations.free_station(bank, index);
        }
    }
}

fn compute_result(station: &crate::engine::station::ReservationStation) -> f64 {
    match station.op {
        Operation::Add => station.vj + station.vk,
        Operation::Sub => station.vj - station.vk,
        Operation::Mul => station.vj * station.vk,
        Operation::Div => station.vj / station.vk,
        // Placeholder memory model: every Load yields the same constant,
        // preserved for test determinism (spec section 9).
        Operation::Load => 1.0,
        Operation::Store | Operation::Nop => 0.0,
    }
}
