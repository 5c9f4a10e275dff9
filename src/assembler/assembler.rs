// assembler/assembler.rs
use std::collections::HashMap;

use super::binary::{BinaryProgram, SourceMapping};
use super::errors::*;
use super::mnemonic::{Mnemonic, Overload, Slot};
use super::parser::{parse, Operand, OperandValue, Statement, StatementKind};
use super::text::TextSpan;
use crate::processor::{encode, Instruction, Opcode, Operands, MEMORY_SIZE};

/// An instruction whose overload is fixed but whose label references are not yet resolved.
struct Pending<'a> {
    address: u16,
    overload: &'static Overload,
    operands: &'a [Operand],
}

// ---------- API ----------
pub fn assemble(source: &str) -> Result<BinaryProgram, AssembleError> {
    let statements = parse(source)?;
    assemble_statements(&statements)
}

pub fn assemble_statements(statements: &[Statement]) -> Result<BinaryProgram, AssembleError> {
    let mut program = BinaryProgram::new();
    let mut used = vec![false; MEMORY_SIZE];
    let mut labels = HashMap::<&str, u16>::new();
    let mut pending = Vec::<Pending>::new();
    let mut address: u32 = 0;

    // 1st pass: pick overloads, lay out code and data, collect labels
    for stmt in statements {
        match &stmt.kind {
            StatementKind::Label { name, address: at } => {
                if let Some(at) = at {
                    address = *at as u32;
                }
                if let Some(name) = name {
                    if address as usize >= MEMORY_SIZE {
                        return Err(AssembleError::new(stmt.span, PROGRAM_TOO_LARGE));
                    }
                    if labels.insert(name.as_str(), address as u16).is_some() {
                        return Err(AssembleError::new(stmt.span, DUPLICATE_LABEL));
                    }
                }
            }
            StatementKind::Instruction { mnemonic, operands } => {
                let overload = select_overload(*mnemonic, operands, stmt.span)?;
                for (slot, operand) in overload.slots.iter().zip(operands) {
                    check_literal(overload.opcode, *slot, operand)?;
                }
                let size = overload.opcode.layout().size();
                reserve(&mut used, address, size as u32, stmt.span)?;
                program.mappings.push(SourceMapping { span: stmt.span, address: address as u16, size });
                pending.push(Pending { address: address as u16, overload, operands });
                address += size as u32;
            }
            StatementKind::Data(bytes) => {
                let len = bytes.len() as u32;
                reserve(&mut used, address, len, stmt.span)?;
                let at = address as usize;
                program.bytes[at..at + bytes.len()].copy_from_slice(bytes);
                program.mappings.push(SourceMapping {
                    span: stmt.span,
                    address: address as u16,
                    size: len as u16,
                });
                address += len;
            }
        }
    }

    // 2nd pass: resolve label references and encode
    for item in &pending {
        let inst = resolve(item, &labels)?;
        let at = item.address as usize;
        let bytes = encode(&inst);
        program.bytes[at..at + bytes.len()].copy_from_slice(&bytes);
    }

    Ok(program)
}

fn select_overload(
    mnemonic: Mnemonic,
    operands: &[Operand],
    span: TextSpan,
) -> Result<&'static Overload, AssembleError> {
    let overloads = mnemonic.overloads();
    let min = overloads.iter().map(|o| o.slots.len()).min().unwrap_or(0);
    let max = overloads.iter().map(|o| o.slots.len()).max().unwrap_or(0);
    if operands.len() < min {
        let end = TextSpan::new(span.end, span.end);
        return Err(AssembleError::new(end, TOO_FEW_PARAMETERS));
    }
    if operands.len() > max {
        return Err(AssembleError::new(operands[max].span, TOO_MANY_PARAMETERS));
    }

    // longest matching prefix wins; ties go to the earlier overload
    let mut best: Option<(usize, &'static Overload)> = None;
    for overload in overloads.iter().filter(|o| o.slots.len() == operands.len()) {
        let matched = overload
            .slots
            .iter()
            .zip(operands)
            .take_while(|(slot, op)| slot.is_register() == op.is_register())
            .count();
        if matched == operands.len() {
            return Ok(overload);
        }
        if best.is_none_or(|(n, _)| matched > n) {
            best = Some((matched, overload));
        }
    }

    let Some((n, overload)) = best else {
        return Err(AssembleError::new(span, TOO_MANY_PARAMETERS));
    };
    let slot = overload.slots[n];
    let message = if slot.is_register() {
        EXPECTED_REGISTER
    } else if slot_bits(overload.opcode, slot) == 16 {
        EXPECTED_IMMEDIATE_OR_LABEL
    } else {
        EXPECTED_IMMEDIATE
    };
    Err(AssembleError::new(operands[n].span, message))
}

fn slot_bits(opcode: Opcode, slot: Slot) -> u8 {
    match slot {
        Slot::ImmA => opcode.layout().imm_a_bits(),
        Slot::ImmB => 16,
        _ => 0,
    }
}

fn in_range(value: i64, bits: u8) -> bool {
    match bits {
        4 => (0..=15).contains(&value),
        8 => (-128..=255).contains(&value),
        _ => (-32768..=65535).contains(&value),
    }
}

fn check_literal(opcode: Opcode, slot: Slot, operand: &Operand) -> Result<(), AssembleError> {
    let bits = slot_bits(opcode, slot);
    match &operand.value {
        OperandValue::Label(_) if bits != 16 => Err(AssembleError::new(operand.span, EXPECTED_IMMEDIATE)),
        OperandValue::Immediate(v) if !in_range(*v, bits) => {
            Err(AssembleError::new(operand.span, IMMEDIATE_OUT_OF_RANGE))
        }
        _ => Ok(()),
    }
}

fn reserve(used: &mut [bool], address: u32, len: u32, span: TextSpan) -> Result<(), AssembleError> {
    let end = address + len;
    if end > MEMORY_SIZE as u32 {
        return Err(AssembleError::new(span, PROGRAM_TOO_LARGE));
    }
    let region = &mut used[address as usize..end as usize];
    if region.iter().any(|&b| b) {
        return Err(AssembleError::new(span, OVERLAPPING_OUTPUT));
    }
    region.fill(true);
    Ok(())
}

fn resolve(item: &Pending, labels: &HashMap<&str, u16>) -> Result<Instruction, AssembleError> {
    let opcode = item.overload.opcode;
    let mut o = Operands::default();
    for (&slot, operand) in item.overload.slots.iter().zip(item.operands) {
        let raw = match &operand.value {
            OperandValue::Register(r) => {
                match slot {
                    Slot::RegA => o.reg_a = *r,
                    Slot::RegB => o.reg_b = *r,
                    _ => o.reg_c = *r,
                }
                continue;
            }
            OperandValue::Immediate(v) => *v as u16,
            OperandValue::Label(name) => *labels
                .get(name.as_str())
                .ok_or_else(|| AssembleError::new(operand.span, UNDEFINED_LABEL))?,
        };
        let mask = match slot_bits(opcode, slot) {
            4 => 0x000F,
            8 => 0x00FF,
            _ => 0xFFFF,
        };
        match slot {
            Slot::ImmB => o.imm_b = raw & mask,
            _ => o.imm_a = raw & mask,
        }
    }
    Ok(Instruction::new(opcode, o))
}
