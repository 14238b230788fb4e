// Loading
mod loader;
pub use loader::parse_image;
mod span;

// Running
mod alu;
pub use alu::AluOp;
mod opcode;
pub use opcode::Opcode;
mod runtime;
pub use runtime::{Cpu, RunStatus};
mod state;
pub use state::{Flag, MachineState, Memory, MEMORY_SIZE, SP, STACK_TOP};

mod error;
pub use error::RunError;

pub mod env;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
