// mod.rs
//
// The Tomasulo scheduling engine: instruction records, the register file
// and register-status (renaming) table, the reservation-station pool,
// and the scheduler that drives Issue, Execute, and Write Result.

pub mod instruction;
pub mod registers;
pub mod scheduler;
pub mod station;

pub use instruction::{Instruction, Operation};
pub use scheduler::Scheduler;
pub use station::Bank;
