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

// Property-based checks of spec.md section 8's invariants across
// randomly generated small programs, rather than just the six
// hand-picked scenarios covered elsewhere.

use proptest::prelude::*;
use tomasulo_sim::config::TomasuloConfig;
use tomasulo_sim::engine::{Instruction, Operation, Scheduler};

const OPS: [Operation; 6] = [
    Operation::Add,
    Operation::Sub,
    Operation::Mul,
    Operation::Div,
    Operation::Load,
    Operation::Store,
];

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    (0..OPS.len(), 0usize..8, 0usize..8, 0usize..8).prop_map(|(op_idx, dest, src1, src2)| {
        Instruction::new(OPS[op_idx], dest, src1, src2, 0.0)
    })
}

fn arb_program(max_len: usize) -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec(arb_instruction(), 0..=max_len)
}

proptest! {
    // Every program eventually finishes within a generous cycle bound,
    // and never stamps a timestamp out of phase order (invariant 1-4).
    #[test]
    fn any_small_program_runs_to_completion_with_ordered_timestamps(program in arb_program(8)) {
        let len = program.len();
        let mut sched = Scheduler::new(TomasuloConfig::default(), program);

        // Worst case in this configuration is dominated by Div's 40-cycle
        // latency stacked across every instruction in the program.
        let cap = 50 * (len as u32 + 1);
        let mut cycles = 0;
        while !sched.is_done() && cycles < cap {
            sched.advance_one_cycle();
            cycles += 1;
        }

        prop_assert!(sched.is_done(), "program of {len} instructions did not finish within {cap} cycles");
        prop_assert_eq!(sched.instructions_issued(), len);

        for instr in &sched.program {
            if let (Some(issued), Some(executed)) = (instr.issued, instr.executed) {
                prop_assert!(issued <= executed);
            }
            if let (Some(executed), Some(written)) = (instr.executed, instr.written) {
                prop_assert!(executed <= written);
            }
            prop_assert_eq!(instr.written, instr.completed);
        }
    }

    // Invariant 5: pc (instructions issued) never exceeds program length,
    // and every register-status entry always names a currently busy
    // station's tag or is clear — never a tag for a freed station.
    #[test]
    fn register_status_never_points_at_a_free_station(program in arb_program(6)) {
        let len = program.len();
        let mut sched = Scheduler::new(TomasuloConfig::default(), program);
        let cap = 50 * (len as u32 + 1);
        let mut cycles = 0;
        while !sched.is_done() && cycles < cap {
            sched.advance_one_cycle();
            cycles += 1;

            prop_assert!(sched.instructions_issued() <= len);
            for reg in 0..sched.config.register_count {
                if let Some(tag) = sched.register_status.producer(reg) {
                    let located = sched.stations.locate(tag);
                    prop_assert!(located.is_some());
                    let (bank, index) = located.unwrap();
                    prop_assert!(sched.stations.station(bank, index).busy);
                }
            }
        }
    }
}
