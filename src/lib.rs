//! A Chip-8 virtual machine.
//!
//! The [`interpreter::Interpreter`] owns all machine state and is driven
//! externally: the embedding loop runs a batch of cycles, ticks the timers
//! once per 60 Hz frame, renders [`display::Display`] and forwards key
//! events. See `src/main.rs` for an SDL2 front end doing exactly that.

pub mod display;
pub mod error;
pub mod interpreter;
pub mod keyboard;
mod memory;
mod opcode;
mod registers;

pub use crate::error::{Error, Result};
