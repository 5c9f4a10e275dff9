use std::fmt;

use crate::errors::EmbattledError;

pub const MEMORY_SIZE: usize = 0x10000;

/// The 64 KiB address space of a process. Every address is valid and
/// multi-byte accesses wrap around at the top.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Builds memory from a full-size image.
    pub fn from_image(image: &[u8]) -> Result<Self, EmbattledError> {
        if image.len() != MEMORY_SIZE {
            return Err(EmbattledError::ImageSize {
                expected: MEMORY_SIZE,
                actual: image.len(),
            });
        }
        Ok(Self {
            bytes: image.to_vec().into_boxed_slice(),
        })
    }

    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    #[inline]
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read_byte(addr), self.read_byte(addr.wrapping_add(1))])
    }

    #[inline]
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_byte(addr, lo);
        self.write_byte(addr.wrapping_add(1), hi);
    }

    /// Copies `bytes` starting at `base`, wrapping past 0xFFFF.
    pub fn load(&mut self, base: u16, bytes: &[u8]) {
        let mut addr = base;
        for &b in bytes {
            self.write_byte(addr, b);
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory").field("nonzero_bytes", &used).finish()
    }
}
