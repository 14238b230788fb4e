use std::fmt;

/// Every instruction the CPU understands. Discriminants are the encoded op-codes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Stop the machine
    HLT = 0b0000_0001,
    /// Pop return address into PC
    RET = 0b0001_0001,
    /// Push register onto the stack
    PUSH = 0b0100_0101,
    /// Pop stack into register
    POP = 0b0100_0110,
    /// Print register as decimal
    PRN = 0b0100_0111,
    /// Push return address and jump to address in register
    CALL = 0b0101_0000,
    JMP = 0b0101_0100,
    /// Jump if equal flag set
    JEQ = 0b0101_0101,
    /// Jump if equal flag clear
    JNE = 0b0101_0110,
    /// Load immediate into register
    LDI = 0b1000_0010,
    ADD = 0b1010_0000,
    MUL = 0b1010_0010,
    /// Compare two registers, setting the equal flag
    CMP = 0b1010_0111,
}

impl Opcode {
    const ALL: [Opcode; 13] = [
        Opcode::HLT,
        Opcode::RET,
        Opcode::PUSH,
        Opcode::POP,
        Opcode::PRN,
        Opcode::CALL,
        Opcode::JMP,
        Opcode::JEQ,
        Opcode::JNE,
        Opcode::LDI,
        Opcode::ADD,
        Opcode::MUL,
        Opcode::CMP,
    ];

    pub fn decode(byte: u8) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    /// Number of operand bytes, stored in the top two bits of the op-code.
    pub fn operand_count(self) -> usize {
        (self as u8 >> 6) as usize
    }

    /// Bytes to advance the PC by when the instruction does not set it.
    pub fn width(self) -> usize {
        1 + self.operand_count()
    }

    /// Whether the handler sets the PC itself.
    pub fn sets_pc(self) -> bool {
        (self as u8) & 0b0001_0000 != 0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_bytes() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::decode(op as u8), Some(op));
        }
        assert_eq!(Opcode::decode(0b1000_0010), Some(Opcode::LDI));
        assert_eq!(Opcode::decode(0b1111_1111), None);
        assert_eq!(Opcode::decode(0), None);
    }

    #[test]
    fn widths() {
        #[rustfmt::skip]
        let cases = [
            (Opcode::HLT, 1), (Opcode::RET, 1),
            (Opcode::PRN, 2), (Opcode::PUSH, 2), (Opcode::POP, 2),
            (Opcode::CALL, 2), (Opcode::JMP, 2), (Opcode::JEQ, 2), (Opcode::JNE, 2),
            (Opcode::LDI, 3), (Opcode::ADD, 3), (Opcode::MUL, 3), (Opcode::CMP, 3),
        ];
        for (op, width) in cases {
            assert_eq!(op.width(), width, "width of {op}");
        }
    }

    #[test]
    fn pc_setters() {
        let setters: Vec<_> = Opcode::ALL.into_iter().filter(|op| op.sets_pc()).collect();
        assert_eq!(
            setters,
            [
                Opcode::RET,
                Opcode::CALL,
                Opcode::JMP,
                Opcode::JEQ,
                Opcode::JNE
            ]
        );
    }
}
