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

// registers.rs
//
// The architectural register file and the register-status (renaming)
// table that pairs each register with the tag of the station currently
// scheduled to produce its next value.

use crate::engine::station::Tag;

/// Fixed-length scalar floating-point register file, index 0 included
/// (unlike a MIPS integer file, register 0 here is an ordinary writable
/// register — the spec does not carry a hardwired-zero convention).
#[derive(Debug, Clone)]
pub struct RegisterFile {
    data: Vec<f64>,
}

impl RegisterFile {
    pub fn new(count: usize) -> Self {
        Self { data: vec![0.0; count] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn read(&self, reg: usize) -> f64 {
        self.data[reg]
    }

    pub fn write(&mut self, reg: usize, value: f64) {
        self.data[reg] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }
}

/// Per-register producer tag: `None` means the register is ready and its
/// value in the register file is current; `Some(tag)` names the station
/// that will write it next.
#[derive(Debug, Clone)]
pub struct RegisterStatus {
    tags: Vec<Tag>,
}

impl RegisterStatus {
    pub fn new(count: usize) -> Self {
        Self { tags: vec![0; count] }
    }

    pub fn producer(&self, reg: usize) -> Option<Tag> {
        let tag = self.tags[reg];
        (tag != 0).then_some(tag)
    }

    pub fn set_producer(&mut self, reg: usize, tag: Tag) {
        self.tags[reg] = tag;
    }

    pub fn clear(&mut self, reg: usize) {
        self.tags[reg] = 0;
    }

    /// Clear the mapping only if it still names `tag` — the stale-tag
    /// rule's guard, lifted out so the scheduler can't apply it wrong.
    pub fn clear_if(&mut self, reg: usize, tag: Tag) -> bool {
        if self.tags[reg] == tag {
            self.tags[reg] = 0;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Tag>> + '_ {
        self.tags.iter().map(|&t| (t != 0).then_some(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registers_are_zero_and_ready() {
        let regs = RegisterFile::new(32);
        let status = RegisterStatus::new(32);
        for r in 0..32 {
            assert_eq!(regs.read(r), 0.0);
            assert_eq!(status.producer(r), None);
        }
    }

    #[test]
    fn stale_tag_guard_refuses_mismatched_clear() {
        let mut status = RegisterStatus::new(4);
        status.set_producer(1, 7);
        assert!(!status.clear_if(1, 8));
        assert_eq!(status.producer(1), Some(7));
        assert!(status.clear_if(1, 7));
        assert_eq!(status.producer(1), None);
    }
}
