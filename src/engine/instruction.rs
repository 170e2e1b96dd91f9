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

// instruction.rs
//
// This file contains the instruction record for the Tomasulo engine: the
// decoded operation plus the four phase timestamps the scheduler stamps
// as the instruction moves through Issue, Execute, and Write Result.

use crate::engine::station::Bank;
use serde::{Deserialize, Serialize};

/// One of the six operations the engine can schedule, plus the no-op the
/// parser emits for lines it can't make sense of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Load,
    Store,
    Nop,
}

impl Operation {
    /// Fixed per-operation latency in cycles, per the configuration table.
    pub fn latency(self) -> usize {
        match self {
            Operation::Add | Operation::Sub => 2,
            Operation::Mul => 10,
            Operation::Div => 40,
            Operation::Load => 2,
            Operation::Store => 2,
            Operation::Nop => 0,
        }
    }

    /// The reservation-station bank this operation is issued into.
    pub fn bank(self) -> Option<Bank> {
        match self {
            Operation::Add | Operation::Sub => Some(Bank::AddSub),
            Operation::Mul | Operation::Div => Some(Bank::MulDiv),
            Operation::Load => Some(Bank::Load),
            Operation::Store => Some(Bank::Store),
            Operation::Nop => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Mul => "MUL",
            Operation::Div => "DIV",
            Operation::Load => "LOAD",
            Operation::Store => "STORE",
            Operation::Nop => "NOP",
        }
    }
}

/// A decoded instruction plus its four phase timestamps.
///
/// Timestamps are `None` until the scheduler stamps them; `issued` is the
/// only one set by Issue, `executed` by the cycle Execute's latency
/// counter reaches zero, and `written`/`completed` together by Write
/// Result. The invariant `issued <= executed <= written <= completed`
/// (wherever each is set) is maintained by the scheduler, never by this
/// type itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Operation,
    pub dest: usize,
    pub src1: usize,
    pub src2: usize,
    pub immediate: f64,

    pub issued: Option<u32>,
    pub executed: Option<u32>,
    pub written: Option<u32>,
    pub completed: Option<u32>,
}

impl Instruction {
    pub fn new(op: Operation, dest: usize, src1: usize, src2: usize, immediate: f64) -> Self {
        Self {
            op,
            dest,
            src1,
            src2,
            immediate,
            issued: None,
            executed: None,
            written: None,
            completed: None,
        }
    }
}
