use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Options, Quirks};
use crate::error::VmError;
use crate::instruction::Instruction;
use crate::memory::{Memory, FONT_ADDRESS, FONT_STRIDE};
use crate::registers::RegisterFile;
use crate::screen::Chip8Screen;
use crate::stack::CallStack;
use crate::timers::Timers;

/// Number of keys on the hex keypad.
pub const KEY_COUNT: usize = 16;

/// Represents a CHIP-8 CPU
pub struct Cpu<R = StdRng> {
    // The available CPU memory. While the entire range is addressable, the first 512 bytes are
    // reserved for the interpreter. We only use them to store the font sprites needed for
    // instruction Fx29.
    memory: Memory,

    // Return addresses of the active subroutine calls.
    call_stack: CallStack,

    // V0-VF, I and PC.
    registers: RegisterFile,

    // The delay timer and the sound timer registers count down once per cycle when not zero. If
    // the sound timer register is not zero a beep is heard.
    timers: Timers,

    // Internal screen buffer which is updated by draw/clear instructions.
    screen: Chip8Screen,
    // Screen buffer dirty flag. This flag is set whenever the internal buffer is changed. The
    // actual display must update and then clear this flag.
    screen_dirty: bool,

    // Current keyboard state, owned by the host.
    key_state: [bool; KEY_COUNT],

    // The last fetched instruction word.
    instruction: u16,

    quirks: Quirks,
    rng: R,
}

impl Cpu {
    /// Construct a CHIP-8 cpu at the initial entry state, with default quirks and a random seed.
    pub fn new() -> Self {
        Cpu::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Cpu::with_rng(options.quirks, rng)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu::new()
    }
}

impl<R: Rng> Cpu<R> {
    /// Construct a CHIP-8 cpu at the initial entry state, drawing `RND` values from `rng`.
    pub fn with_rng(quirks: Quirks, rng: R) -> Self {
        Cpu {
            memory: Memory::new(),
            call_stack: CallStack::new(),
            registers: RegisterFile::new(),
            timers: Timers::new(),
            screen: Chip8Screen::new(),
            screen_dirty: false,
            key_state: [false; KEY_COUNT],
            instruction: 0,
            quirks,
            rng,
        }
    }

    /// Copy rom bytes to memory at the entry point. Bytes that don't fit in memory are silently
    /// dropped. Returns the number of bytes loaded. Other state is left untouched.
    pub fn load_program(&mut self, rom: &[u8]) -> usize {
        let loaded = self.memory.load_program(rom);
        if loaded < rom.len() {
            log::warn!("program truncated from {} to {} bytes", rom.len(), loaded);
        }
        log::debug!("loaded {} program bytes", loaded);
        loaded
    }

    /// Read a program from `reader` into memory at the entry point.
    pub fn load_program_from(&mut self, reader: &mut impl Read) -> Result<usize, VmError> {
        let loaded = self.memory.load_program_from(reader)?;
        log::debug!("loaded {} program bytes", loaded);
        Ok(loaded)
    }

    /// Read the program stored at `path` into memory at the entry point.
    pub fn load_program_file(&mut self, path: impl AsRef<Path>) -> Result<usize, VmError> {
        let mut file = File::open(path.as_ref())?;
        self.load_program_from(&mut file)
    }

    /// Fetch, decode and execute one instruction, then tick the timers.
    ///
    /// On error the PC is left pointing at the faulting instruction and the timers are not
    /// ticked. The error is fatal: the caller should stop calling `cycle`.
    pub fn cycle(&mut self) -> Result<(), VmError> {
        let address = self.registers.pc;
        self.instruction = self.memory.read_word(address as usize)?;

        // The PC is advanced before execution, so jumps assign their target directly and skips
        // advance it once more.
        self.registers.pc = address.wrapping_add(2);

        let result = match Instruction::decode(self.instruction) {
            Some(instr) => {
                log::trace!("{:#05X}: {:04X}  {}", address, self.instruction, instr);
                self.execute(instr)
            }
            None => Err(VmError::IllegalInstruction {
                instruction: self.instruction,
                address,
            }),
        };

        if let Err(err) = result {
            self.registers.pc = address;
            return Err(err);
        }

        if self.timers.tick() {
            log::debug!("sound timer expired");
        }

        Ok(())
    }

    /// Return memory, registers, call stack, timers and screen to their construction-time
    /// state. Quirks, the random source and the keypad are kept.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.call_stack.clear();
        self.registers = RegisterFile::new();
        self.timers = Timers::new();
        self.screen.clear();
        self.screen_dirty = true;
        self.instruction = 0;
        log::debug!("cpu reset");
    }

    /// Returns whether or not the screen dirty, and if it is, sets it to false.
    pub fn handle_screen_dirty_flag(&mut self) -> bool {
        let captured_flag = self.screen_dirty;
        self.screen_dirty = false;
        captured_flag
    }

    /// Returns true if the emulator should play a tone
    pub fn should_play_tone(&self) -> bool {
        self.timers.is_sounding()
    }

    pub fn keypad(&self) -> &[bool; KEY_COUNT] {
        &self.key_state
    }

    pub fn keypad_mut(&mut self) -> &mut [bool; KEY_COUNT] {
        &mut self.key_state
    }

    /// Update the internal key state to the provided key state.
    pub fn update_key_state(&mut self, new_key_state: &[bool; KEY_COUNT]) {
        self.key_state = *new_key_state;
    }

    /// Press or release a single key. Keys above 0xF are ignored.
    pub fn set_key(&mut self, key: usize, pressed: bool) {
        if let Some(state) = self.key_state.get_mut(key) {
            *state = pressed;
        }
    }

    pub fn screen(&self) -> &Chip8Screen {
        &self.screen
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn instruction(&self) -> u16 {
        self.instruction
    }

    pub fn v(&self, idx: usize) -> u8 {
        self.registers.v(idx)
    }

    pub fn set_v(&mut self, idx: usize, value: u8) {
        self.registers.set_v(idx, value);
    }

    pub fn i(&self) -> u16 {
        self.registers.i
    }

    pub fn set_i(&mut self, value: u16) {
        self.registers.i = value;
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.registers.pc = value;
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn stack_depth(&self) -> usize {
        self.call_stack.depth()
    }

    fn execute(&mut self, instr: Instruction) -> Result<(), VmError> {
        use Instruction::*;

        match instr {
            Cls => self.instr_00e0(),
            Ret => self.instr_00ee()?,
            Jp { addr } => self.instr_1nnn(addr),
            Call { addr } => self.instr_2nnn(addr)?,
            SeByte { x, byte } => self.instr_3xkk(x, byte),
            SneByte { x, byte } => self.instr_4xkk(x, byte),
            SeReg { x, y } => self.instr_5xy0(x, y),
            LdByte { x, byte } => self.instr_6xkk(x, byte),
            AddByte { x, byte } => self.instr_7xkk(x, byte),
            LdReg { x, y } => self.instr_8xy0(x, y),
            Or { x, y } => self.instr_8xy1(x, y),
            And { x, y } => self.instr_8xy2(x, y),
            Xor { x, y } => self.instr_8xy3(x, y),
            AddReg { x, y } => self.instr_8xy4(x, y),
            Sub { x, y } => self.instr_8xy5(x, y),
            Shr { x, y } => self.instr_8xy6(x, y),
            Subn { x, y } => self.instr_8xy7(x, y),
            Shl { x, y } => self.instr_8xye(x, y),
            SneReg { x, y } => self.instr_9xy0(x, y),
            LdI { addr } => self.instr_annn(addr),
            JpV0 { addr } => self.instr_bnnn(addr),
            Rnd { x, byte } => self.instr_cxkk(x, byte),
            Drw { x, y, height } => self.instr_dxyn(x, y, height)?,
            Skp { x } => self.instr_ex9e(x)?,
            Sknp { x } => self.instr_exa1(x)?,
            LdVxDt { x } => self.instr_fx07(x),
            LdVxK { x } => self.instr_fx0a(x),
            LdDtVx { x } => self.instr_fx15(x),
            LdStVx { x } => self.instr_fx18(x),
            AddIVx { x } => self.instr_fx1e(x),
            LdFVx { x } => self.instr_fx29(x),
            LdBVx { x } => self.instr_fx33(x)?,
            LdMemVx { x } => self.instr_fx55(x)?,
            LdVxMem { x } => self.instr_fx65(x)?,
        }

        Ok(())
    }
}

// Instruction implementations
impl<R: Rng> Cpu<R> {
    /// Execute `CLS` instruction
    fn instr_00e0(&mut self) {
        self.screen.clear();
        self.screen_dirty = true;
    }

    /// Execute `RET` instruction
    fn instr_00ee(&mut self) -> Result<(), VmError> {
        self.registers.pc = self.call_stack.pop()?;
        Ok(())
    }

    /// Execute `JP addr` instruction
    fn instr_1nnn(&mut self, addr: u16) {
        self.registers.pc = addr;
    }

    /// Execute `CALL addr` instruction
    fn instr_2nnn(&mut self, addr: u16) -> Result<(), VmError> {
        // The PC already points at the instruction after the call, which is where RET resumes.
        self.call_stack.push(self.registers.pc)?;
        self.registers.pc = addr;
        Ok(())
    }

    /// Execute `SE Vx, byte` instruction
    fn instr_3xkk(&mut self, x: usize, byte: u8) {
        if self.registers.v(x) == byte {
            self.registers.skip();
        }
    }

    /// Execute `SNE Vx, byte` instruction
    fn instr_4xkk(&mut self, x: usize, byte: u8) {
        if self.registers.v(x) != byte {
            self.registers.skip();
        }
    }

    /// Execute `SE Vx, Vy` instruction
    fn instr_5xy0(&mut self, x: usize, y: usize) {
        if self.registers.v(x) == self.registers.v(y) {
            self.registers.skip();
        }
    }

    /// Execute `LD Vx, byte` instruction
    fn instr_6xkk(&mut self, x: usize, byte: u8) {
        self.registers.set_v(x, byte);
    }

    /// Execute `ADD Vx, byte` instruction
    fn instr_7xkk(&mut self, x: usize, byte: u8) {
        // No carry flag for the immediate form
        let sum = self.registers.v(x).wrapping_add(byte);
        self.registers.set_v(x, sum);
    }

    /// Execute `LD Vx, Vy` instruction
    fn instr_8xy0(&mut self, x: usize, y: usize) {
        self.registers.set_v(x, self.registers.v(y));
    }

    /// Execute `OR Vx, Vy` instruction
    fn instr_8xy1(&mut self, x: usize, y: usize) {
        self.registers
            .set_v(x, self.registers.v(x) | self.registers.v(y));
    }

    /// Execute `AND Vx, Vy` instruction
    fn instr_8xy2(&mut self, x: usize, y: usize) {
        self.registers
            .set_v(x, self.registers.v(x) & self.registers.v(y));
    }

    /// Execute `XOR Vx, Vy` instruction
    fn instr_8xy3(&mut self, x: usize, y: usize) {
        self.registers
            .set_v(x, self.registers.v(x) ^ self.registers.v(y));
    }

    // For the flag-producing ALU instructions both operands are read first, then the result is
    // stored, then VF. When x is 0xF the flag wins.

    /// Execute `ADD Vx, Vy` instruction
    fn instr_8xy4(&mut self, x: usize, y: usize) {
        let (sum, carry) = self.registers.v(x).overflowing_add(self.registers.v(y));
        self.registers.set_v(x, sum);
        self.registers.set_flag(carry);
    }

    /// Execute `SUB Vx, Vy` instruction
    fn instr_8xy5(&mut self, x: usize, y: usize) {
        let (vx, vy) = (self.registers.v(x), self.registers.v(y));
        self.registers.set_v(x, vx.wrapping_sub(vy));
        self.registers.set_flag(vx > vy);
    }

    /// Execute `SHR Vx, Vy` instruction
    fn instr_8xy6(&mut self, x: usize, y: usize) {
        let value = self.registers.v(self.shift_source(x, y));
        self.registers.set_v(x, value >> 1);
        // After a shift-right, VF holds the LSB that was shifted out
        self.registers.set_flag(value & 1 == 1);
    }

    /// Execute `SUBN Vx, Vy` instruction
    fn instr_8xy7(&mut self, x: usize, y: usize) {
        let (vx, vy) = (self.registers.v(x), self.registers.v(y));
        self.registers.set_v(x, vy.wrapping_sub(vx));
        self.registers.set_flag(vy > vx);
    }

    /// Execute `SHL Vx, Vy` instruction
    fn instr_8xye(&mut self, x: usize, y: usize) {
        let value = self.registers.v(self.shift_source(x, y));
        self.registers.set_v(x, value << 1);
        // After a shift-left, VF holds the MSB that was shifted out
        self.registers.set_flag(value & 0x80 != 0);
    }

    /// Execute `SNE Vx, Vy` instruction
    fn instr_9xy0(&mut self, x: usize, y: usize) {
        if self.registers.v(x) != self.registers.v(y) {
            self.registers.skip();
        }
    }

    /// Execute `LD I, addr` instruction
    fn instr_annn(&mut self, addr: u16) {
        self.registers.i = addr;
    }

    /// Execute `JP V0, addr` instruction
    fn instr_bnnn(&mut self, addr: u16) {
        self.registers.pc = addr + self.registers.v(0) as u16;
    }

    /// Execute `RND Vx, byte` instruction
    fn instr_cxkk(&mut self, x: usize, byte: u8) {
        let value = self.rng.gen::<u8>() & byte;
        self.registers.set_v(x, value);
    }

    /// Execute `DRW Vx, Vy, nibble` instruction
    fn instr_dxyn(&mut self, x: usize, y: usize, height: u8) -> Result<(), VmError> {
        // A sprite is a bit-packed representation of a bitmap, as such its width is 8, and the
        // number of bytes is its height. The whole sprite is checked before anything is drawn.
        let sprite = self
            .memory
            .read_slice(self.registers.i as usize, height as usize)?;

        let sprite_x = self.registers.v(x) as usize;
        let sprite_y = self.registers.v(y) as usize;
        let collision = self.screen.draw_sprite(sprite_x, sprite_y, sprite);

        // When drawing sprites, VF acts as collision flag
        self.registers.set_flag(collision);
        self.screen_dirty = true;
        Ok(())
    }

    /// Execute `SKP Vx` instruction
    fn instr_ex9e(&mut self, x: usize) -> Result<(), VmError> {
        if self.key_pressed(x)? {
            self.registers.skip();
        }
        Ok(())
    }

    /// Execute `SKNP Vx` instruction
    fn instr_exa1(&mut self, x: usize) -> Result<(), VmError> {
        if !self.key_pressed(x)? {
            self.registers.skip();
        }
        Ok(())
    }

    /// Execute `LD Vx, DT` instruction
    fn instr_fx07(&mut self, x: usize) {
        self.registers.set_v(x, self.timers.delay);
    }

    /// Execute `LD Vx, K` instruction
    fn instr_fx0a(&mut self, x: usize) {
        match self.key_state.iter().position(|&pressed| pressed) {
            Some(key) => self.registers.set_v(x, key as u8),
            // Nothing pressed yet. Rewind so this instruction is fetched again next cycle.
            None => self.registers.pc = self.registers.pc.wrapping_sub(2),
        }
    }

    /// Execute `LD DT, Vx` instruction
    fn instr_fx15(&mut self, x: usize) {
        self.timers.delay = self.registers.v(x);
    }

    /// Execute `LD ST, Vx` instruction
    fn instr_fx18(&mut self, x: usize) {
        self.timers.sound = self.registers.v(x);
    }

    /// Execute `ADD I, Vx` instruction
    fn instr_fx1e(&mut self, x: usize) {
        self.registers.i = self.registers.i.wrapping_add(self.registers.v(x) as u16);
    }

    /// Execute `LD F, Vx` instruction
    fn instr_fx29(&mut self, x: usize) {
        let hex_digit = self.registers.v(x) as u16;
        self.registers.i = FONT_ADDRESS as u16 + hex_digit * FONT_STRIDE as u16;
    }

    /// Execute `LD B, Vx` instruction
    fn instr_fx33(&mut self, x: usize) -> Result<(), VmError> {
        let reg_val = self.registers.v(x);
        let digits = [reg_val / 100, (reg_val / 10) % 10, reg_val % 10];
        self.memory.write_slice(self.registers.i as usize, &digits)
    }

    /// Execute `LD [I], Vx` instruction
    fn instr_fx55(&mut self, last_reg: usize) -> Result<(), VmError> {
        // Store registers V0 through Vx in memory, starting at address I
        let values = *self.registers.v_registers();
        self.memory
            .write_slice(self.registers.i as usize, &values[..=last_reg])?;
        self.advance_index(last_reg);
        Ok(())
    }

    /// Execute `LD Vx, [I]` instruction
    fn instr_fx65(&mut self, last_reg: usize) -> Result<(), VmError> {
        // Load registers V0 through Vx from memory, starting at address I
        let values = self
            .memory
            .read_slice(self.registers.i as usize, last_reg + 1)?;
        for (reg, &value) in values.iter().enumerate() {
            self.registers.set_v(reg, value);
        }
        self.advance_index(last_reg);
        Ok(())
    }

    // In newer interpreters the Vy register is ignored and instead Vx is shifted in-place.
    fn shift_source(&self, x: usize, y: usize) -> usize {
        if self.quirks.original_shift {
            y
        } else {
            x
        }
    }

    // In the original CHIP-8 interpreter, the I register was incremented in the load/store loop.
    fn advance_index(&mut self, last_reg: usize) {
        if self.quirks.original_mem_acc {
            self.registers.i = self.registers.i.wrapping_add(last_reg as u16 + 1);
        }
    }

    fn key_pressed(&self, x: usize) -> Result<bool, VmError> {
        let key = self.registers.v(x);
        self.key_state
            .get(key as usize)
            .copied()
            .ok_or(VmError::InvalidKey(key))
    }
}
