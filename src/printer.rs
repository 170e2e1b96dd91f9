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

// printer.rs
//
// A read-only textual (and, as an alternative, JSON) view of the
// engine's state between cycles: register values and producer tags,
// busy reservation stations, and per-instruction phase timestamps.

use crate::engine::station::Bank;
use crate::engine::Scheduler;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct RegisterSnapshot {
    index: usize,
    value: f64,
    producer_tag: Option<usize>,
}

#[derive(Serialize)]
struct StationSnapshot {
    bank: &'static str,
    index: usize,
    tag: usize,
    op: &'static str,
    dest: usize,
    vj: f64,
    vk: f64,
    qj: usize,
    qk: usize,
    remaining: usize,
}

#[derive(Serialize)]
struct InstructionSnapshot {
    index: usize,
    mnemonic: &'static str,
    dest: usize,
    src1: usize,
    src2: usize,
    issued: Option<u32>,
    executed: Option<u32>,
    written: Option<u32>,
    completed: Option<u32>,
}

#[derive(Serialize)]
struct Snapshot {
    cycle: u32,
    registers: Vec<RegisterSnapshot>,
    stations: Vec<StationSnapshot>,
    instructions: Vec<InstructionSnapshot>,
}

fn build_snapshot(sched: &Scheduler) -> Snapshot {
    let registers = (0..sched.registers.len())
        .map(|i| RegisterSnapshot {
            index: i,
            value: sched.registers.read(i),
            producer_tag: sched.register_status.producer(i),
        })
        .collect();

    let mut stations = Vec::new();
    for (bank, name) in [
        (Bank::AddSub, "add_sub"),
        (Bank::MulDiv, "mul_div"),
        (Bank::Load, "load"),
        (Bank::Store, "store"),
    ] {
        for (i, s) in sched.stations.bank(bank).iter().enumerate() {
            if s.busy {
                stations.push(StationSnapshot {
                    bank: name,
                    index: i,
                    tag: sched.stations.tag_of(bank, i),
                    op: s.op.mnemonic(),
                    dest: s.dest,
                    vj: s.vj,
                    vk: s.vk,
                    qj: s.qj,
                    qk: s.qk,
                    remaining: s.remaining,
                });
            }
        }
    }

    let instructions = sched
        .program
        .iter()
        .enumerate()
        .map(|(i, instr)| InstructionSnapshot {
            index: i,
            mnemonic: instr.op.mnemonic(),
            dest: instr.dest,
            src1: instr.src1,
            src2: instr.src2,
            issued: instr.issued,
            executed: instr.executed,
            written: instr.written,
            completed: instr.completed,
        })
        .collect();

    Snapshot {
        cycle: sched.cycle,
        registers,
        stations,
        instructions,
    }
}

pub fn render(sched: &Scheduler, format: OutputFormat) -> String {
    let snapshot = build_snapshot(sched);
    match format {
        OutputFormat::Text => render_text(&snapshot),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&snapshot).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
        },
    }
}

fn render_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Cycle {} ===\n", snapshot.cycle));

    out.push_str("\nRegisters:\n");
    for reg in &snapshot.registers {
        out.push_str(&format!("R{}: {:.4}", reg.index, reg.value));
        if let Some(tag) = reg.producer_tag {
            out.push_str(&format!(" [tag {}]", tag));
        }
        out.push('\n');
    }

    out.push_str("\nReservation Stations:\n");
    for s in &snapshot.stations {
        out.push_str(&format!(
            "[{}:{}] tag={} {} Vj={:.4} Vk={:.4} Qj={} Qk={} Dest=R{} Remaining={}\n",
            s.bank, s.index, s.tag, s.op, s.vj, s.vk, s.qj, s.qk, s.dest, s.remaining
        ));
    }

    out.push_str("\nInstructions:\n");
    for instr in &snapshot.instructions {
        out.push_str(&format!(
            "{}: {} R{} R{} R{}",
            instr.index, instr.mnemonic, instr.dest, instr.src1, instr.src2
        ));
        if let Some(c) = instr.issued {
            out.push_str(&format!(" [Issue@{}]", c));
        }
        if let Some(c) = instr.executed {
            out.push_str(&format!(" [Exec@{}]", c));
        }
        if let Some(c) = instr.written {
            out.push_str(&format!(" [Write@{}]", c));
        }
        if let Some(c) = instr.completed {
            out.push_str(&format!(" [Complete@{}]", c));
        }
        out.push('\n');
    }

    out
}
