// assembler/binary.rs
use super::text::TextSpan;
use crate::processor::MEMORY_SIZE;

/// Links a statement in the source to the bytes it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapping {
    pub span: TextSpan,
    pub address: u16,
    pub size: u16,
}

impl SourceMapping {
    #[inline]
    pub fn contains(&self, address: u16) -> bool {
        let offset = address.wrapping_sub(self.address);
        offset < self.size
    }
}

/// An assembled program: a full memory image plus the source mappings, in statement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryProgram {
    pub bytes: Vec<u8>,
    pub mappings: Vec<SourceMapping>,
}

impl BinaryProgram {
    pub fn new() -> Self {
        Self { bytes: vec![0; MEMORY_SIZE], mappings: Vec::new() }
    }

    /// The mapping whose bytes cover `address`, if any.
    pub fn mapping_at(&self, address: u16) -> Option<&SourceMapping> {
        self.mappings.iter().find(|m| m.contains(address))
    }

    /// Address of the first statement on the zero-based source `line`.
    pub fn address_of_line(&self, line: usize) -> Option<u16> {
        self.mappings
            .iter()
            .find(|m| m.span.start.line == line)
            .map(|m| m.address)
    }
}

impl Default for BinaryProgram {
    fn default() -> Self {
        Self::new()
    }
}
