use std::fmt;
use std::str::FromStr;

use crate::error::RunError;

/// Operations implemented by the arithmetic logic unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    /// Combine two register values. Results wrap mod 256.
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}

impl FromStr for AluOp {
    type Err = RunError;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ADD" => Ok(AluOp::Add),
            "MUL" => Ok(AluOp::Mul),
            _ => Err(RunError::UnsupportedOperation {
                op: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
        };
        write!(f, "{name}")
    }
}
