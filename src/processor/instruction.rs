// processor/instruction.rs
use super::opcode::Opcode;
use super::registers::Register;

/// Operand fields of an instruction. Fields the opcode's layout does not use stay at
/// their defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub reg_a: Register,
    pub reg_b: Register,
    pub reg_c: Register,
    pub imm_a: u16,
    pub imm_b: u16,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Operands,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Operands) -> Self {
        Self { opcode, operands }
    }

    /// Encoded size in bytes.
    #[inline]
    pub fn size(&self) -> u16 {
        self.opcode.layout().size()
    }
}
