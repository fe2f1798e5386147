use std::io;

use thiserror::Error;

/// Fatal conditions raised while loading or running a program. None of these are recoverable:
/// the host is expected to report the error and stop calling `cycle`.
#[derive(Debug, Error)]
pub enum VmError {
    /// The fetched word does not match any known instruction encoding.
    #[error("illegal instruction {instruction:#06X} at address {address:#05X}")]
    IllegalInstruction { instruction: u16, address: u16 },

    /// A fetch, sprite read, BCD store or bulk register transfer would touch memory past the end
    /// of the address space.
    #[error("memory access of {len} byte(s) at address {address:#06X} is out of bounds")]
    OutOfRangeAccess { address: usize, len: usize },

    #[error("call stack overflow, recursion depth limit reached")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    /// A keypad instruction referenced a register holding a value that is not a hex key.
    #[error("key {0:#04X} is not on the keypad")]
    InvalidKey(u8),

    /// The program source could not be opened or read.
    #[error("failed to load program: {0}")]
    Load(#[from] io::Error),
}
