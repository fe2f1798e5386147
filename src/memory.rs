use std::io::Read;

use crate::error::VmError;

/// Size of the addressable memory space.
pub const MEM_SIZE: usize = 4096;
/// The first 512 bytes are reserved for the interpreter. Programs are loaded right after them.
pub const PROGRAM_START: usize = 0x200;
/// Address of the built-in hex font sprites.
pub const FONT_ADDRESS: usize = 0x50;
/// Each font sprite is 4 pixels wide and 5 rows tall.
pub const FONT_STRIDE: usize = 5;

const FONT: [u8; FONT_STRIDE * 16] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // '0'
    0x20, 0x60, 0x20, 0x20, 0x70, // '1'
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // '2'
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // '3'
    0x90, 0x90, 0xF0, 0x10, 0x10, // '4'
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // '5'
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // '6'
    0xF0, 0x10, 0x20, 0x40, 0x40, // '7'
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // '8'
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // '9'
    0xF0, 0x90, 0xF0, 0x90, 0x90, // 'A'
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // 'B'
    0xF0, 0x80, 0x80, 0x80, 0xF0, // 'C'
    0xE0, 0x90, 0x90, 0x90, 0xE0, // 'D'
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // 'E'
    0xF0, 0x80, 0xF0, 0x80, 0x80, // 'F'
];

/// The flat CHIP-8 address space. Holds the font, the loaded program and any data written by
/// the program itself. Every access is bounds checked.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Zero-filled memory with the font sprites in place.
    pub fn new() -> Self {
        let mut memory = Memory {
            bytes: [0; MEM_SIZE],
        };
        memory.clear();
        memory
    }

    /// Return to the construction-time contents.
    pub fn clear(&mut self) {
        self.bytes = [0; MEM_SIZE];
        self.bytes[FONT_ADDRESS..FONT_ADDRESS + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program to the program area. Bytes that don't fit are dropped. Returns the number
    /// of bytes copied.
    pub fn load_program(&mut self, rom: &[u8]) -> usize {
        let len = rom.len().min(MEM_SIZE - PROGRAM_START);
        self.bytes[PROGRAM_START..PROGRAM_START + len].copy_from_slice(&rom[..len]);
        len
    }

    /// Read a program from `reader` into the program area, stopping once the area is full.
    pub fn load_program_from(&mut self, reader: &mut impl Read) -> Result<usize, VmError> {
        let space = MEM_SIZE - PROGRAM_START;
        let mut rom = Vec::with_capacity(space + 1);
        // One byte past the program area is enough to tell that the source was truncated.
        reader
            .by_ref()
            .take(space as u64 + 1)
            .read_to_end(&mut rom)?;

        if rom.len() > space {
            log::warn!("program is larger than {} bytes, the rest is ignored", space);
            rom.truncate(space);
        }

        Ok(self.load_program(&rom))
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8, VmError> {
        Ok(self.read_slice(addr, 1)?[0])
    }

    /// Instructions are 2 bytes, big-endian.
    pub fn read_word(&self, addr: usize) -> Result<u16, VmError> {
        let word = self.read_slice(addr, 2)?;
        Ok(((word[0] as u16) << 8) | (word[1] as u16))
    }

    pub fn read_slice(&self, addr: usize, len: usize) -> Result<&[u8], VmError> {
        let range = Self::check_range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write_slice(&mut self, addr: usize, data: &[u8]) -> Result<(), VmError> {
        let range = Self::check_range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// The entire address space, for hosts that want to inspect or dump it.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn check_range(addr: usize, len: usize) -> Result<std::ops::Range<usize>, VmError> {
        match addr.checked_add(len) {
            Some(end) if end <= MEM_SIZE => Ok(addr..end),
            _ => Err(VmError::OutOfRangeAccess { address: addr, len }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
