use crate::error::RunError;

/// LS-8 can address 256 bytes of memory.
pub const MEMORY_SIZE: usize = 0x100;
/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Register holding the stack pointer. Only a convention, any instruction may touch it.
pub const SP: u8 = 7;
/// Initial stack pointer, just below the high memory region.
pub const STACK_TOP: u8 = 0xF4;

/// Byte-addressable system memory.
pub struct Memory {
    cells: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: [0; MEMORY_SIZE],
        }
    }

    pub fn read(&self, addr: usize) -> Result<u8, RunError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(RunError::AddressOutOfRange { address: addr })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), RunError> {
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or(RunError::AddressOutOfRange { address: addr })?;
        *cell = value;
        Ok(())
    }

    /// Copy `image` into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), RunError> {
        if image.len() > MEMORY_SIZE {
            return Err(RunError::AddressOutOfRange {
                address: image.len() - 1,
            });
        }
        self.cells[..image.len()].copy_from_slice(image);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality flag, set by CMP and read by the conditional jumps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flag {
    #[default]
    Clear = 0,
    Equal = 1,
}

impl From<bool> for Flag {
    fn from(equal: bool) -> Self {
        if equal {
            Flag::Equal
        } else {
            Flag::Clear
        }
    }
}

/// Represents complete machine state during runtime.
pub struct MachineState {
    pub mem: Memory,
    /// 8x 8-bit registers, wrapping on overflow
    pub reg: [u8; REGISTER_COUNT],
    /// Program counter
    pub pc: usize,
    pub flag: Flag,
}

impl MachineState {
    pub fn new() -> Self {
        let mut reg = [0; REGISTER_COUNT];
        reg[SP as usize] = STACK_TOP;
        MachineState {
            mem: Memory::new(),
            reg,
            pc: 0,
            flag: Flag::Clear,
        }
    }

    pub fn read(&self, addr: usize) -> Result<u8, RunError> {
        self.mem.read(addr)
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), RunError> {
        self.mem.write(addr, value)
    }

    #[inline]
    pub fn reg(&mut self, reg: u8) -> Result<&mut u8, RunError> {
        self.reg
            .get_mut(reg as usize)
            .ok_or(RunError::RegisterOutOfRange { register: reg })
    }

    pub fn sp(&self) -> u8 {
        self.reg[SP as usize]
    }

    pub fn set_sp(&mut self, sp: u8) {
        self.reg[SP as usize] = sp;
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_with_stack_pointer() {
        let state = MachineState::new();
        assert_eq!(state.pc, 0);
        assert_eq!(state.flag, Flag::Clear);
        assert_eq!(state.reg, [0, 0, 0, 0, 0, 0, 0, 0xF4]);
        for addr in 0..MEMORY_SIZE {
            assert_eq!(state.read(addr).unwrap(), 0);
        }
    }

    #[test]
    fn read_write_bounds() {
        let mut mem = Memory::new();
        mem.write(0, 1).unwrap();
        mem.write(255, 2).unwrap();
        assert_eq!(mem.read(0).unwrap(), 1);
        assert_eq!(mem.read(255).unwrap(), 2);

        assert!(matches!(
            mem.read(256),
            Err(RunError::AddressOutOfRange { address: 256 })
        ));
        assert!(matches!(
            mem.write(300, 9),
            Err(RunError::AddressOutOfRange { address: 300 })
        ));
    }

    #[test]
    fn load_image() {
        let mut mem = Memory::new();
        mem.load(&[0b10000010, 0, 8]).unwrap();
        assert_eq!(mem.read(0).unwrap(), 0b10000010);
        assert_eq!(mem.read(2).unwrap(), 8);
        assert_eq!(mem.read(3).unwrap(), 0);

        assert!(mem.load(&[0; MEMORY_SIZE]).is_ok());
        assert!(matches!(
            mem.load(&[0; MEMORY_SIZE + 1]),
            Err(RunError::AddressOutOfRange { address: 256 })
        ));
    }

    #[test]
    fn register_bounds() {
        let mut state = MachineState::new();
        *state.reg(0).unwrap() = 42;
        *state.reg(7).unwrap() = 1;
        assert_eq!(state.reg[0], 42);
        assert_eq!(state.sp(), 1);

        for reg in [8, 9, 15, 255] {
            assert!(matches!(
                state.reg(reg),
                Err(RunError::RegisterOutOfRange { register }) if register == reg
            ));
        }
        assert_eq!(state.reg, [42, 0, 0, 0, 0, 0, 0, 1]);
    }
}
