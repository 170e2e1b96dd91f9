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

// station.rs
//
// Reservation stations, organized into the four disjoint banks the engine
// schedules into, and the global tag arithmetic that addresses them.

use crate::config::TomasuloConfig;
use crate::engine::instruction::Operation;
use serde::{Deserialize, Serialize};

/// One of the four reservation-station banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    AddSub,
    MulDiv,
    Load,
    Store,
}

/// A station's address on the common data bus. Tag 0 means "no producer /
/// operand ready" and is never assigned to a real station.
pub type Tag = usize;

/// A single reservation station. Valid only while `busy`; all other
/// fields are meaningless on a free station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStation {
    pub busy: bool,
    pub op: Operation,
    pub dest: usize,
    pub vj: f64,
    pub vk: f64,
    pub qj: Tag,
    pub qk: Tag,
    pub address: f64,
    pub remaining: usize,
    /// Index into the program's instruction vector this station is
    /// currently serving. The only correct way to find the instruction
    /// whose timestamps this station's completion should stamp — never
    /// `dest`, since two instructions may share a destination register.
    pub owner_instruction_index: Option<usize>,
}

impl ReservationStation {
    fn free() -> Self {
        Self {
            busy: false,
            op: Operation::Nop,
            dest: 0,
            vj: 0.0,
            vk: 0.0,
            qj: 0,
            qk: 0,
            address: 0.0,
            remaining: 0,
            owner_instruction_index: None,
        }
    }

    /// True once both awaited operands have resolved (Qj = Qk = 0).
    /// Store never awaits a second operand.
    pub fn operands_ready(&self) -> bool {
        self.qj == 0 && (self.op == Operation::Store || self.qk == 0)
    }

    fn reset(&mut self) {
        *self = Self::free();
    }
}

/// The four station banks plus the bijective tag arithmetic of spec
/// section 4.1: a tag is `bank_base + index + 1`, where `bank_base` is
/// the number of tags in all earlier banks.
pub struct StationPool {
    pub add_sub: Vec<ReservationStation>,
    pub mul_div: Vec<ReservationStation>,
    pub load: Vec<ReservationStation>,
    pub store: Vec<ReservationStation>,
}

impl StationPool {
    pub fn new(config: &TomasuloConfig) -> Self {
        Self {
            add_sub: (0..config.add_sub_stations).map(|_| ReservationStation::free()).collect(),
            mul_div: (0..config.mul_div_stations).map(|_| ReservationStation::free()).collect(),
            load: (0..config.load_buffers).map(|_| ReservationStation::free()).collect(),
            store: (0..config.store_buffers).map(|_| ReservationStation::free()).collect(),
        }
    }

    fn bank_base(&self, bank: Bank) -> usize {
        match bank {
            Bank::AddSub => 0,
            Bank::MulDiv => self.add_sub.len(),
            Bank::Load => self.add_sub.len() + self.mul_div.len(),
            Bank::Store => self.add_sub.len() + self.mul_div.len() + self.load.len(),
        }
    }

    pub fn bank(&self, bank: Bank) -> &[ReservationStation] {
        match bank {
            Bank::AddSub => &self.add_sub,
            Bank::MulDiv => &self.mul_div,
            Bank::Load => &self.load,
            Bank::Store => &self.store,
        }
    }

    fn bank_mut(&mut self, bank: Bank) -> &mut Vec<ReservationStation> {
        match bank {
            Bank::AddSub => &mut self.add_sub,
            Bank::MulDiv => &mut self.mul_div,
            Bank::Load => &mut self.load,
            Bank::Store => &mut self.store,
        }
    }

    /// (bank, index) -> global tag. The only sanctioned translation.
    pub fn tag_of(&self, bank: Bank, index: usize) -> Tag {
        self.bank_base(bank) + index + 1
    }

    /// global tag -> (bank, index), the inverse of `tag_of`.
    pub fn locate(&self, tag: Tag) -> Option<(Bank, usize)> {
        if tag == 0 {
            return None;
        }
        let t = tag - 1;
        let (a, m, l) = (self.add_sub.len(), self.mul_div.len(), self.load.len());
        if t < a {
            Some((Bank::AddSub, t))
        } else if t < a + m {
            Some((Bank::MulDiv, t - a))
        } else if t < a + m + l {
            Some((Bank::Load, t - a - m))
        } else if t < a + m + l + self.store.len() {
            Some((Bank::Store, t - a - m - l))
        } else {
            None
        }
    }

    /// First free slot in the operation's bank, if any.
    pub fn find_free(&self, bank: Bank) -> Option<usize> {
        self.bank(bank).iter().position(|s| !s.busy)
    }

    pub fn station(&self, bank: Bank, index: usize) -> &ReservationStation {
        &self.bank(bank)[index]
    }

    pub fn station_mut(&mut self, bank: Bank, index: usize) -> &mut ReservationStation {
        &mut self.bank_mut(bank)[index]
    }

    pub fn free_station(&mut self, bank: Bank, index: usize) {
        self.bank_mut(bank)[index].reset();
    }

    /// Every busy station across all four banks, tagged with its global tag.
    pub fn all_busy(&self) -> impl Iterator<Item = (Tag, &ReservationStation)> {
        [Bank::AddSub, Bank::MulDiv, Bank::Load, Bank::Store]
            .into_iter()
            .flat_map(move |bank| {
                self.bank(bank)
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.busy)
                    .map(move |(i, s)| (self.tag_of(bank, i), s))
            })
    }

    /// Broadcast a computed result to every station awaiting `tag` on
    /// either operand slot, across all four banks.
    pub fn broadcast(&mut self, tag: Tag, value: f64) {
        for bank in [Bank::AddSub, Bank::MulDiv, Bank::Load, Bank::Store] {
            for station in self.bank_mut(bank) {
                if !station.busy {
                    continue;
                }
                if station.qj == tag {
                    station.vj = value;
                    station.qj = 0;
                }
                if station.qk == tag {
                    station.vk = value;
                    station.qk = 0;
                }
            }
        }
    }
}
