// processor/process.rs
use crate::errors::EmbattledError;

use super::memory::Memory;
use super::registers::Registers;

/// A running program: its registers, its own memory and a sleep counter.
#[derive(Debug, Clone, Default)]
pub struct Process {
    pub registers: Registers,
    pub memory: Memory,
    /// Steps left to sleep before the next instruction runs.
    pub sleep_remaining: u16,
}

impl Process {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a process from a full 64 KiB memory image. Registers start at zero.
    pub fn with_image(image: &[u8]) -> Result<Self, EmbattledError> {
        Ok(Self {
            registers: Registers::default(),
            memory: Memory::from_image(image)?,
            sleep_remaining: 0,
        })
    }

    pub fn reset(&mut self) {
        self.registers = Registers::default();
        self.sleep_remaining = 0;
    }
}
