// processor/encoder.rs
use super::instruction::Instruction;
use super::memory::Memory;
use super::opcode::Layout;
use super::registers::Register;

#[inline] fn pair(hi: Register, lo: Register) -> u8 { (hi.nibble() << 4) | lo.nibble() }
#[inline] fn high(r: Register) -> u8 { r.nibble() << 4 }
#[inline] fn lo8(v: u16) -> u8 { (v & 0xFF) as u8 }
#[inline] fn hi8(v: u16) -> u8 { (v >> 8) as u8 }

/// Encodes an instruction into its byte representation.
pub fn encode(inst: &Instruction) -> Vec<u8> {
    let op = inst.opcode.byte();
    let o = &inst.operands;
    match inst.opcode.layout() {
        Layout::None => vec![op],
        Layout::RegA => vec![op, high(o.reg_a)],
        Layout::RegARegB => vec![op, pair(o.reg_a, o.reg_b)],
        Layout::ImmA16 => vec![op, lo8(o.imm_a), hi8(o.imm_a)],
        Layout::RegAImmA8 => vec![op, lo8(o.imm_a), high(o.reg_a)],
        Layout::RegARegBImmA4 => vec![op, (o.imm_a & 0xF) as u8, pair(o.reg_a, o.reg_b)],
        Layout::RegARegBRegC => vec![op, high(o.reg_c), pair(o.reg_a, o.reg_b)],
        Layout::ImmA8ImmB16 => vec![op, lo8(o.imm_a), lo8(o.imm_b), hi8(o.imm_b)],
        Layout::RegAImmA16 => vec![op, lo8(o.imm_a), hi8(o.imm_a), high(o.reg_a)],
        Layout::RegARegBImmA16 => vec![op, lo8(o.imm_a), hi8(o.imm_a), pair(o.reg_a, o.reg_b)],
        Layout::ImmA16ImmB16 => vec![op, lo8(o.imm_a), hi8(o.imm_a), lo8(o.imm_b), hi8(o.imm_b)],
    }
}

/// Writes `inst` at `addr` and returns the address just past it.
pub fn write_instruction(mem: &mut Memory, addr: u16, inst: &Instruction) -> u16 {
    let bytes = encode(inst);
    mem.load(addr, &bytes);
    addr.wrapping_add(bytes.len() as u16)
}
