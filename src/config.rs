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

// config.rs
//
// This file contains the configuration struct for the Tomasulo engine:
// register count, per-bank station capacities, and the instruction-table
// cap. Latencies are fixed per operation (see engine::instruction) and
// are not configurable, since they are part of the simulator's external
// contract (spec section 6).

/// Sizing knobs for a `Scheduler`. `Default` reproduces the configuration
/// constants spec section 6 fixes: 32 registers, 6 add/sub stations, 6
/// mul/div stations, 4 load buffers, 4 store buffers.
#[derive(Debug, Clone)]
pub struct TomasuloConfig {
    pub register_count: usize,
    pub add_sub_stations: usize,
    pub mul_div_stations: usize,
    pub load_buffers: usize,
    pub store_buffers: usize,
    pub max_instructions: usize,
}

impl Default for TomasuloConfig {
    fn default() -> Self {
        Self {
            register_count: 32,
            add_sub_stations: 6,
            mul_div_stations: 6,
            load_buffers: 4,
            store_buffers: 4,
            max_instructions: 100,
        }
    }
}

impl TomasuloConfig {
    pub fn new(register_count: usize) -> Self {
        assert!(register_count > 0, "register file must have at least one register");
        Self {
            register_count,
            ..Self::default()
        }
    }

    pub fn with_arithmetic_stations(mut self, add_sub: usize, mul_div: usize) -> Self {
        self.add_sub_stations = add_sub;
        self.mul_div_stations = mul_div;
        self
    }

    pub fn with_memory_buffers(mut self, load: usize, store: usize) -> Self {
        self.load_buffers = load;
        self.store_buffers = store;
        self
    }

    pub fn with_max_instructions(mut self, max_instructions: usize) -> Self {
        self.max_instructions = max_instructions;
        self
    }

    pub fn total_stations(&self) -> usize {
        self.add_sub_stations + self.mul_div_stations + self.load_buffers + self.store_buffers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_constants() {
        let config = TomasuloConfig::default();
        assert_eq!(config.register_count, 32);
        assert_eq!(config.add_sub_stations, 6);
        assert_eq!(config.mul_div_stations, 6);
        assert_eq!(config.load_buffers, 4);
        assert_eq!(config.store_buffers, 4);
        assert_eq!(config.total_stations(), 20);
    }

    #[test]
    fn builder_overrides_compose() {
        let config = TomasuloConfig::default()
            .with_arithmetic_stations(2, 1)
            .with_memory_buffers(1, 1);
        assert_eq!(config.total_stations(), 5);
    }
}
