//! A CHIP-8 virtual machine.
//!
//! The core is host agnostic: the host decides how often to call [`Cpu::cycle`], feeds the
//! keypad state in, and copies the framebuffer out. Each cycle fetches one instruction, executes
//! it and ticks the delay and sound timers once. The [`wasm`] module exposes the same machine to
//! JavaScript.

mod utils;

pub mod config;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod memory;
pub mod registers;
pub mod screen;
pub mod stack;
pub mod timers;
pub mod wasm;

pub use config::{Options, Quirks};
pub use cpu::{Cpu, KEY_COUNT};
pub use error::VmError;
pub use instruction::Instruction;
pub use memory::{Memory, FONT_ADDRESS, MEM_SIZE, PROGRAM_START};
pub use screen::{Chip8Screen, Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use wasm::Emulator;
