// processor/decoder.rs
use super::instruction::{Instruction, Operands};
use super::memory::Memory;
use super::opcode::{Layout, Opcode};
use super::registers::Register;

#[inline]
fn word(lo: u8, hi: u8) -> u16 {
    u16::from_le_bytes([lo, hi])
}

/// Reads the instruction at `*ip` and advances `*ip` past it. Reads wrap at the top of
/// memory.
pub fn fetch(mem: &Memory, ip: &mut u16) -> Instruction {
    let opcode = Opcode::from_byte(mem.read_byte(*ip));
    let layout = opcode.layout();
    let mut b = [0u8; 4];
    for (i, slot) in b.iter_mut().enumerate().take(layout.size() as usize - 1) {
        *slot = mem.read_byte(ip.wrapping_add(1 + i as u16));
    }
    *ip = ip.wrapping_add(layout.size());

    let regs = |byte: u8| (Register::from_nibble(byte >> 4), Register::from_nibble(byte));
    let mut o = Operands::default();
    match layout {
        Layout::None => {}
        Layout::RegA => o.reg_a = regs(b[0]).0,
        Layout::RegARegB => (o.reg_a, o.reg_b) = regs(b[0]),
        Layout::ImmA16 => o.imm_a = word(b[0], b[1]),
        Layout::RegAImmA8 => {
            o.imm_a = b[0] as u16;
            o.reg_a = regs(b[1]).0;
        }
        Layout::RegARegBImmA4 => {
            o.imm_a = (b[0] & 0xF) as u16;
            (o.reg_a, o.reg_b) = regs(b[1]);
        }
        Layout::RegARegBRegC => {
            o.reg_c = regs(b[0]).0;
            (o.reg_a, o.reg_b) = regs(b[1]);
        }
        Layout::ImmA8ImmB16 => {
            o.imm_a = b[0] as u16;
            o.imm_b = word(b[1], b[2]);
        }
        Layout::RegAImmA16 => {
            o.imm_a = word(b[0], b[1]);
            o.reg_a = regs(b[2]).0;
        }
        Layout::RegARegBImmA16 => {
            o.imm_a = word(b[0], b[1]);
            (o.reg_a, o.reg_b) = regs(b[2]);
        }
        Layout::ImmA16ImmB16 => {
            o.imm_a = word(b[0], b[1]);
            o.imm_b = word(b[2], b[3]);
        }
    }
    Instruction::new(opcode, o)
}

fn imm_text(value: u16, bits: u8) -> String {
    match bits {
        4 => format!("{value}"),
        8 => format!("0x{value:02X}"),
        _ => format!("0x{value:04X}"),
    }
}

/// Renders an instruction as assembly text that assembles back to the same bytes.
pub fn disassemble(inst: &Instruction) -> String {
    let layout = inst.opcode.layout();
    let o = &inst.operands;
    let name = inst.opcode.name();
    let (mnemonic, form) = name.split_once('_').unwrap_or((name, ""));

    let imm_a = imm_text(o.imm_a, layout.imm_a_bits());
    let mut ops: Vec<String> = Vec::with_capacity(3);
    if form == "ir" {
        // immediate comes before the register it pairs with
        if layout.has_reg_b() {
            ops.extend([o.reg_a.to_string(), imm_a, o.reg_b.to_string()]);
        } else {
            ops.extend([imm_a, o.reg_a.to_string()]);
        }
    } else {
        if layout.has_reg_a() {
            ops.push(o.reg_a.to_string());
        }
        if layout.has_reg_b() {
            ops.push(o.reg_b.to_string());
        }
        if layout.has_reg_c() {
            ops.push(o.reg_c.to_string());
        }
        if layout.imm_a_bits() > 0 {
            ops.push(imm_a);
        }
        if layout.has_imm_b() {
            ops.push(imm_text(o.imm_b, 16));
        }
    }

    if ops.is_empty() {
        mnemonic.to_string()
    } else {
        format!("{mnemonic} {}", ops.join(", "))
    }
}
