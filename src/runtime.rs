use std::io::Write;

use crate::alu::AluOp;
use crate::error::RunError;
use crate::opcode::Opcode;
use crate::state::{Flag, MachineState, SP};

/// Outcome of a single fetch-decode-execute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Halted,
}

/// The execution engine. Owns the machine state for the lifetime of a run.
pub struct Cpu {
    state: MachineState,
    /// Instructions executed so far
    steps: u64,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            state: MachineState::new(),
            steps: 0,
        }
    }

    /// Fresh CPU with `image` loaded at address 0.
    pub fn from_image(image: &[u8]) -> Result<Cpu, RunError> {
        let mut cpu = Cpu::new();
        cpu.state.mem.load(image)?;
        tracing::debug!(bytes = image.len(), "loaded program image");
        Ok(cpu)
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run until halted, writing program output to `out`. Returns the number of steps taken.
    pub fn run(&mut self, out: &mut impl Write) -> Result<u64, RunError> {
        self.run_with_limit(out, None)
    }

    /// Run until halted, failing once `limit` instructions have executed without halting.
    pub fn run_with_limit(
        &mut self,
        out: &mut impl Write,
        limit: Option<u64>,
    ) -> Result<u64, RunError> {
        loop {
            if let Some(limit) = limit {
                if self.steps >= limit {
                    tracing::warn!(limit, pc = self.state.pc, "step limit reached");
                    return Err(RunError::StepLimitExceeded { limit });
                }
            }
            match self.step(out) {
                Ok(RunStatus::Running) => (),
                Ok(RunStatus::Halted) => {
                    tracing::debug!(steps = self.steps, "halted");
                    return Ok(self.steps);
                }
                Err(e) => {
                    tracing::warn!(pc = self.state.pc, "run terminated: {e}");
                    return Err(e);
                }
            }
        }
    }

    /// Execute one instruction. On failure the PC is left at the failing instruction.
    pub fn step(&mut self, out: &mut impl Write) -> Result<RunStatus, RunError> {
        let pc = self.state.pc;
        let instr = self.state.read(pc)?;
        // Operands are always fetched, even when unused
        let operand_a = self.state.read(pc + 1)?;
        let operand_b = self.state.read(pc + 2)?;

        let op = Opcode::decode(instr).ok_or(RunError::UnknownInstruction { opcode: instr, pc })?;
        tracing::trace!(pc, %op, operand_a, operand_b);

        match op {
            Opcode::HLT => {
                self.steps += 1;
                return Ok(RunStatus::Halted);
            }
            Opcode::LDI => *self.state.reg(operand_a)? = operand_b,
            Opcode::PRN => {
                let val = *self.state.reg(operand_a)?;
                writeln!(out, "{val}")?;
            }
            Opcode::ADD => self.alu_op(AluOp::Add, operand_a, operand_b)?,
            Opcode::MUL => self.alu_op(AluOp::Mul, operand_a, operand_b)?,
            Opcode::PUSH => {
                let val = *self.state.reg(operand_a)?;
                self.push_val(val)?;
            }
            Opcode::POP => {
                let val = self.state.read(self.state.sp() as usize)?;
                *self.state.reg(operand_a)? = val;
                // After the load, so `POP R7` increments the popped value
                self.state.set_sp(self.state.sp().wrapping_add(1));
            }
            Opcode::CALL => {
                let ret = pc + op.width();
                let ret_addr =
                    u8::try_from(ret).map_err(|_| RunError::AddressOutOfRange { address: ret })?;
                let target = *self.state.reg(operand_a)?;
                self.push_val(ret_addr)?;
                self.state.pc = target as usize;
            }
            Opcode::RET => {
                self.state.pc = self.pop_val()? as usize;
            }
            Opcode::CMP => {
                let b = *self.state.reg(operand_b)?;
                let equal = *self.state.reg(operand_a)? == b;
                self.state.flag = Flag::from(equal);
            }
            Opcode::JMP => self.jump_if(true, operand_a, op)?,
            Opcode::JEQ => self.jump_if(self.state.flag == Flag::Equal, operand_a, op)?,
            Opcode::JNE => self.jump_if(self.state.flag == Flag::Clear, operand_a, op)?,
        }

        if !op.sets_pc() {
            self.state.pc = pc + op.width();
        }
        self.steps += 1;
        Ok(RunStatus::Running)
    }

    /// Apply an ALU operation named by `op` to registers `reg_a` and `reg_b`, storing into `reg_a`.
    pub fn alu(&mut self, op: &str, reg_a: u8, reg_b: u8) -> Result<(), RunError> {
        let op: AluOp = op.parse()?;
        self.alu_op(op, reg_a, reg_b)
    }

    fn alu_op(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<(), RunError> {
        let b = *self.state.reg(reg_b)?;
        let a = self.state.reg(reg_a)?;
        *a = op.apply(*a, b);
        Ok(())
    }

    /// Register is checked even when the jump is not taken.
    fn jump_if(&mut self, cond: bool, reg: u8, op: Opcode) -> Result<(), RunError> {
        let target = *self.state.reg(reg)?;
        if cond {
            self.state.pc = target as usize;
        } else {
            self.state.pc += op.width();
        }
        Ok(())
    }

    fn push_val(&mut self, val: u8) -> Result<(), RunError> {
        let sp = self.state.sp().wrapping_sub(1);
        self.state.write(sp as usize, val)?;
        self.state.set_sp(sp);
        Ok(())
    }

    fn pop_val(&mut self) -> Result<u8, RunError> {
        let sp = self.state.sp();
        let val = self.state.read(sp as usize)?;
        self.state.set_sp(sp.wrapping_add(1));
        Ok(val)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
