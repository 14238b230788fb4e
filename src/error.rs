use std::io;

use miette::{miette, Diagnostic, LabeledSpan, Report, Severity};
use thiserror::Error;

use crate::span::Span;

/// Fatal conditions raised while the CPU is running.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    #[error("Unknown instruction {opcode:#010b} at address {pc}")]
    #[diagnostic(
        code(run::unknown_instruction),
        help("check the program image for a missing operand or a mistyped op-code")
    )]
    UnknownInstruction { opcode: u8, pc: usize },

    #[error("Memory address {address} is out of range")]
    #[diagnostic(
        code(run::address_out_of_range),
        help("memory spans addresses 0 to 255; instructions need their operands inside it too")
    )]
    AddressOutOfRange { address: usize },

    #[error("Register R{register} does not exist")]
    #[diagnostic(
        code(run::register_out_of_range),
        help("registers are numbered R0 to R7; check the operand bytes of this instruction")
    )]
    RegisterOutOfRange { register: u8 },

    #[error("Unsupported ALU operation `{op}`")]
    #[diagnostic(code(run::unsupported_operation), help("the ALU implements ADD and MUL"))]
    UnsupportedOperation { op: String },

    #[error("Program did not halt within {limit} steps")]
    #[diagnostic(
        code(run::step_limit),
        help("raise the limit with `--max-steps` or `LS8_STEP_LIMIT`, or check for an endless loop")
    )]
    StepLimitExceeded { limit: u64 },

    #[error("Failed to write program output")]
    #[diagnostic(code(run::output))]
    Output(#[from] io::Error),
}

// Loader errors

pub fn load_bad_lit(span: Span, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::bad_lit",
        help = "each line holds one byte as a binary literal, like 10000010",
        labels = vec![LabeledSpan::at(span.as_range(), "not a byte")],
        "Encountered an invalid binary literal.",
    )
    .with_source_code(src.to_string())
}

pub fn load_too_long(span: Span, src: &str, len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::too_long",
        help = "memory holds at most 256 bytes",
        labels = vec![LabeledSpan::at(span.as_range(), "does not fit in memory")],
        "Program image is {len} bytes long and cannot fit in memory.",
    )
    .with_source_code(src.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = RunError::UnknownInstruction {
            opcode: 0xFF,
            pc: 12,
        };
        assert_eq!(
            err.to_string(),
            "Unknown instruction 0b11111111 at address 12"
        );
        let err = RunError::AddressOutOfRange { address: 256 };
        assert_eq!(err.to_string(), "Memory address 256 is out of range");
        let err = RunError::RegisterOutOfRange { register: 15 };
        assert_eq!(err.to_string(), "Register R15 does not exist");
        let err = RunError::UnsupportedOperation { op: "SUB".into() };
        assert_eq!(err.to_string(), "Unsupported ALU operation `SUB`");
    }
}
