use crate::memory::PROGRAM_START;

/// Index of the register used as a carry/borrow/collision flag by some instructions.
pub const FLAG_REGISTER: usize = 0xF;

/// The 16 V registers plus the I and PC registers.
///
/// V registers are only reachable through `v`/`set_v`, so an instruction that reads Vx and Vy
/// and writes VF always reads both operands before the flag is written, even when the indices
/// coincide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    // 16 available registers named V0 through VF. VF is used as a flag in some instructions.
    v: [u8; 16],
    // The I register is used to address memory in some instructions.
    pub i: u16,
    // The address of the next instruction to execute.
    pub pc: u16,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16,
        }
    }

    /// Value of register V`idx`. Only the low nibble of `idx` is used.
    pub fn v(&self, idx: usize) -> u8 {
        self.v[idx & 0xF]
    }

    pub fn set_v(&mut self, idx: usize, value: u8) {
        self.v[idx & 0xF] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = flag as u8;
    }

    pub fn v_registers(&self) -> &[u8; 16] {
        &self.v
    }

    /// Skip the next instruction.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        RegisterFile::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let regs = RegisterFile::new();
        assert_eq!(regs.pc, 0x200);
        assert_eq!(regs.i, 0);
        assert_eq!(regs.v_registers(), &[0; 16]);
    }

    #[test]
    fn flag_is_vf() {
        let mut regs = RegisterFile::new();
        regs.set_flag(true);
        assert_eq!(regs.v(0xF), 1);
        regs.set_v(0xF, 7);
        regs.set_flag(false);
        assert_eq!(regs.v(0xF), 0);
    }

    #[test]
    fn skip_advances_by_one_instruction() {
        let mut regs = RegisterFile::new();
        regs.skip();
        assert_eq!(regs.pc, 0x202);
    }
}
