//! JavaScript-facing wrapper around the CHIP-8 core. The host page owns the timing loop, the
//! canvas and the keyboard; it drives the emulator through these calls.

use wasm_bindgen::prelude::*;

use crate::config::{Options, Quirks};
use crate::cpu::{Cpu, KEY_COUNT};
use crate::utils;

#[wasm_bindgen]
/// A CHIP-8 machine as seen from the browser
pub struct Emulator {
    cpu: Cpu,
}

#[wasm_bindgen]
impl Emulator {
    /// Construct an emulator at the initial entry state, with no program loaded.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        utils::set_panic_hook();
        utils::init_console_logger(log::LevelFilter::Info);

        Emulator { cpu: Cpu::new() }
    }

    /// Construct an emulator with rom bytes loaded at the entry point. Bytes that don't fit in
    /// memory are dropped.
    pub fn with_rom(rom: &[u8]) -> Self {
        Emulator::with_rom_and_options(rom, false, false)
    }

    /// Construct an emulator with rom bytes loaded at the entry point.
    /// When `original_shift` is true, the original behaviour of the shift instructions is used,
    /// i.e. the instruction shifts Vy instead of Vx.
    /// When `original_mem_acc` is true, the original behaviour of the load/store instructions is
    /// used, i.e. the instructions increment the I register by the number of registers used.
    pub fn with_rom_and_options(rom: &[u8], original_shift: bool, original_mem_acc: bool) -> Self {
        utils::set_panic_hook();
        utils::init_console_logger(log::LevelFilter::Info);

        let options = Options::with_quirks(Quirks::new(original_shift, original_mem_acc));
        let mut cpu = Cpu::with_options(options);
        cpu.load_program(rom);

        Emulator { cpu }
    }

    /// Decode and execute one instruction. A thrown error is fatal and the caller should stop
    /// calling `cycle`.
    /// It is the responsibility of the caller to check the screen dirty flag and update the
    /// display if needed.
    pub fn cycle(&mut self) -> Result<(), JsValue> {
        self.cpu.cycle().map_err(|err| {
            log::error!("{}", err);
            JsValue::from_str(&err.to_string())
        })
    }

    /// Load a new program at the entry point without touching the rest of the machine state.
    pub fn load_program(&mut self, rom: &[u8]) -> usize {
        self.cpu.load_program(rom)
    }

    /// Return the machine to its power-on state. Memory is cleared, so a program must be loaded
    /// again.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Get a pointer to the screen buffer memory, used from the JS side to render the screen.
    /// The buffer is `screen_width() * screen_height()` bytes, one per pixel, row-major.
    pub fn get_screen_buffer(&self) -> *const bool {
        self.cpu.screen().pixels().as_ptr()
    }

    pub fn screen_width(&self) -> usize {
        self.cpu.screen().width()
    }

    pub fn screen_height(&self) -> usize {
        self.cpu.screen().height()
    }

    /// Returns whether or not the screen dirty, and if it is, sets it to false.
    pub fn handle_screen_dirty_flag(&mut self) -> bool {
        self.cpu.handle_screen_dirty_flag()
    }

    /// Update the internal key state to the provided key state.
    /// `new_key_state` must be of length 16, a non-zero byte meaning the key is pressed.
    /// `wasm_bindgen` doesn't support passing boolean arrays, so we take a byte array instead.
    pub fn update_key_state(&mut self, new_key_state: &[u8]) -> Result<(), JsValue> {
        if new_key_state.len() != KEY_COUNT {
            return Err(JsValue::from_str(&format!(
                "expected {} key states, got {}",
                KEY_COUNT,
                new_key_state.len()
            )));
        }

        for (key, &state) in new_key_state.iter().enumerate() {
            self.cpu.set_key(key, state != 0);
        }
        Ok(())
    }

    /// Returns true if the emulator should play a tone
    pub fn should_play_tone(&self) -> bool {
        self.cpu.should_play_tone()
    }

    /// Set the level of messages written to the browser console: `off`, `error`, `warn`,
    /// `info`, `debug` or `trace`. `trace` logs every executed instruction.
    pub fn set_log_level(&self, level: &str) -> Result<(), JsValue> {
        utils::set_log_level(level)
            .map(|_| ())
            .map_err(|err| JsValue::from_str(&err))
    }

    /// Address of the instruction that will be executed next.
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Emulator::new()
    }
}
