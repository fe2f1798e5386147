use crate::error::VmError;

/// Maximum number of nested subroutine calls. The original CHIP-8 allowed 12; we allow 16.
pub const STACK_DEPTH: usize = 16;

/// Return addresses of the subroutines currently being executed.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    addresses: [u16; STACK_DEPTH],
    // The index of the first free cell.
    sp: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, address: u16) -> Result<(), VmError> {
        if self.sp == STACK_DEPTH {
            return Err(VmError::StackOverflow);
        }

        self.addresses[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, VmError> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }

        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn clear(&mut self) {
        self.addresses = [0; STACK_DEPTH];
        self.sp = 0;
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}
