//! VMIL execution engine: opcode table, decoding, bounds-checked process memory
//! and the single-step interpreter.

pub mod cpu;
pub mod decoder;
pub mod fault;
pub mod instruction;
pub mod isa;
pub mod memory_page;
pub mod runner;
pub mod vm;

pub use fault::Fault;
pub use instruction::Instruction;
pub use isa::Opcode;
pub use memory_page::MemoryRegion;
pub use vm::{ExecutionStats, Layout, Status, VM};
