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

// parser.rs
//
// A line-oriented parser for the assembly dialect described in spec
// section 6: blank lines and `#`-comments are ignored, mnemonics are
// case-insensitive, and an unrecognized or malformed line is dropped
// rather than rejected (spec section 7 — silent drop is the default;
// `--warn-on-parse-error` upgrades drops to a logged warning).

use crate::engine::{Instruction, Operation};

/// Parse every line of `text` into a program, silently dropping any line
/// that doesn't match one of the six accepted syntaxes and stopping once
/// `max_instructions` instructions have been accepted (spec section 7's
/// instruction-table overflow rule).
pub fn parse_program(text: &str, max_instructions: usize, warn_on_error: bool) -> Vec<Instruction> {
    let mut program = Vec::new();
    for (lineno, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if program.len() >= max_instructions {
            if warn_on_error {
                log::warn!("line {}: dropped, instruction table full ({max_instructions} max)", lineno + 1);
            }
            continue;
        }
        match parse_line(line) {
            Some(instr) => program.push(instr),
            None => {
                if warn_on_error {
                    log::warn!("line {}: unrecognized instruction, dropped: {line:?}", lineno + 1);
                }
            },
        }
    }
    program
}

fn parse_line(line: &str) -> Option<Instruction> {
    let mut parts = line.split_whitespace();
    let mnemonic = parts.next()?.to_ascii_uppercase();

    match mnemonic.as_str() {
        "ADD" | "SUB" | "MUL" | "DIV" => {
            let op = match mnemonic.as_str() {
                "ADD" => Operation::Add,
                "SUB" => Operation::Sub,
                "MUL" => Operation::Mul,
                _ => Operation::Div,
            };
            let dest = parse_register(parts.next()?)?;
            let src1 = parse_register(parts.next()?)?;
            let src2 = parse_register(parts.next()?)?;
            Some(Instruction::new(op, dest, src1, src2, 0.0))
        },
        "LOAD" => {
            let dest = parse_register(parts.next()?)?;
            let (imm, base) = parse_address(parts.next()?)?;
            Some(Instruction::new(Operation::Load, dest, base, 0, imm))
        },
        "STORE" => {
            let src = parse_register(parts.next()?)?;
            let (imm, base) = parse_address(parts.next()?)?;
            Some(Instruction::new(Operation::Store, 0, src, base, imm))
        },
        _ => None,
    }
}

/// `Rn` with n in [0, 31].
fn parse_register(token: &str) -> Option<usize> {
    let digits = token.strip_prefix(['R', 'r'])?;
    let reg: usize = digits.parse().ok()?;
    (reg < 32).then_some(reg)
}

/// `imm(Rbase)`, e.g. `0(R2)` or `-4(R0)`.
fn parse_address(token: &str) -> Option<(f64, usize)> {
    let open = token.find('(')?;
    let close = token.find(')')?;
    if close < open {
        return None;
    }
    let imm: f64 = token[..open].parse().ok()?;
    let base = parse_register(&token[open + 1..close])?;
    Some((imm, base))
}
