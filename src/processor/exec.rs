// processor/exec.rs
use super::decoder::fetch;
use super::instruction::Instruction;
use super::opcode::Opcode;
use super::process::Process;

/// What a call to [`step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// The process was asleep; nothing ran and the sleep counter went down by one.
    Slept,
}

/// Where the two inputs of a binary operation come from.
#[derive(Clone, Copy)]
enum Form {
    /// `A = B op C`
    Rr,
    /// `A = B op imm`
    Ri,
    /// `A = imm op B`
    Ir,
}

type BinaryOp = fn(u16, u16) -> u16;

fn divs(a: u16, b: u16) -> u16 {
    if b == 0 { 0xFFFF } else { (a as i16).wrapping_div(b as i16) as u16 }
}

fn divu(a: u16, b: u16) -> u16 {
    if b == 0 { 0xFFFF } else { a / b }
}

fn rems(a: u16, b: u16) -> u16 {
    if b == 0 { a } else { (a as i16).wrapping_rem(b as i16) as u16 }
}

fn remu(a: u16, b: u16) -> u16 {
    if b == 0 { a } else { a % b }
}

fn lsh(a: u16, n: u16) -> u16 {
    if n >= 16 { 0 } else { a << n }
}

fn rshu(a: u16, n: u16) -> u16 {
    if n >= 16 { 0 } else { a >> n }
}

fn rshs(a: u16, n: u16) -> u16 {
    ((a as i16) >> n.min(15)) as u16
}

fn and(a: u16, b: u16) -> u16 { a & b }
fn ior(a: u16, b: u16) -> u16 { a | b }
fn xor(a: u16, b: u16) -> u16 { a ^ b }
fn ceq(a: u16, b: u16) -> u16 { (a == b) as u16 }
fn cne(a: u16, b: u16) -> u16 { (a != b) as u16 }
fn clts(a: u16, b: u16) -> u16 { ((a as i16) < (b as i16)) as u16 }
fn cltu(a: u16, b: u16) -> u16 { (a < b) as u16 }
fn cges(a: u16, b: u16) -> u16 { ((a as i16) >= (b as i16)) as u16 }
fn cgeu(a: u16, b: u16) -> u16 { (a >= b) as u16 }

fn binary(op: Opcode) -> Option<(BinaryOp, Form)> {
    use Form::*;
    use Opcode::*;
    let entry: (BinaryOp, Form) = match op {
        AddR => (u16::wrapping_add, Rr),
        AddI => (u16::wrapping_add, Ri),
        SubRr => (u16::wrapping_sub, Rr),
        SubRi => (u16::wrapping_sub, Ri),
        SubIr => (u16::wrapping_sub, Ir),
        MulR => (u16::wrapping_mul, Rr),
        MulI => (u16::wrapping_mul, Ri),
        DivsRr => (divs, Rr),
        DivsRi => (divs, Ri),
        DivsIr => (divs, Ir),
        DivuRr => (divu, Rr),
        DivuRi => (divu, Ri),
        DivuIr => (divu, Ir),
        RemsRr => (rems, Rr),
        RemsRi => (rems, Ri),
        RemsIr => (rems, Ir),
        RemuRr => (remu, Rr),
        RemuRi => (remu, Ri),
        RemuIr => (remu, Ir),
        AndR => (and, Rr),
        AndI => (and, Ri),
        IorR => (ior, Rr),
        IorI => (ior, Ri),
        XorR => (xor, Rr),
        XorI => (xor, Ri),
        LshRr => (lsh, Rr),
        LshRi => (lsh, Ri),
        LshIr => (lsh, Ir),
        RshsRr => (rshs, Rr),
        RshsRi => (rshs, Ri),
        RshsIr => (rshs, Ir),
        RshuRr => (rshu, Rr),
        RshuRi => (rshu, Ri),
        RshuIr => (rshu, Ir),
        CeqR => (ceq, Rr),
        CeqI => (ceq, Ri),
        CneR => (cne, Rr),
        CneI => (cne, Ri),
        CltsRr => (clts, Rr),
        CltsRi => (clts, Ri),
        CltsIr => (clts, Ir),
        CltuRr => (cltu, Rr),
        CltuRi => (cltu, Ri),
        CltuIr => (cltu, Ir),
        CgesRr => (cges, Rr),
        CgesRi => (cges, Ri),
        CgesIr => (cges, Ir),
        CgeuRr => (cgeu, Rr),
        CgeuRi => (cgeu, Ri),
        CgeuIr => (cgeu, Ir),
        _ => return None,
    };
    Some(entry)
}

/// Runs one step of `p`: either a single instruction, or one step of sleep.
pub fn step(p: &mut Process) -> Step {
    if p.sleep_remaining > 0 {
        p.sleep_remaining -= 1;
        return Step::Slept;
    }

    let mut ip = p.registers.ip;
    let inst = fetch(&p.memory, &mut ip);
    p.registers.ip = ip;
    execute(p, &inst);
    Step::Executed(inst)
}

fn execute(p: &mut Process, inst: &Instruction) {
    let o = inst.operands;
    let regs = &mut p.registers;
    let mem = &mut p.memory;
    let a = regs.read(o.reg_a);
    let b = regs.read(o.reg_b);

    if let Some((op, form)) = binary(inst.opcode) {
        let value = match form {
            Form::Rr => op(b, regs.read(o.reg_c)),
            Form::Ri => op(b, o.imm_a),
            Form::Ir => op(o.imm_a, b),
        };
        regs.write(o.reg_a, value);
        return;
    }

    match inst.opcode {
        Opcode::JmpR | Opcode::JmpI => {
            let target = if inst.opcode == Opcode::JmpR { a } else { o.imm_a };
            regs.rt = regs.ip;
            regs.ip = target;
        }
        Opcode::JmzR => {
            if a == 0 {
                regs.ip = b;
            }
        }
        Opcode::JmzI => {
            if a == 0 {
                regs.ip = o.imm_a;
            }
        }
        Opcode::SlpR => p.sleep_remaining = a,
        Opcode::SlpI => p.sleep_remaining = o.imm_a,

        Opcode::SetR => regs.write(o.reg_a, b),
        Opcode::SetI => regs.write(o.reg_a, o.imm_a),
        Opcode::LdbR => regs.write(o.reg_a, mem.read_byte(b) as u16),
        Opcode::LdbI => regs.write(o.reg_a, mem.read_byte(o.imm_a) as u16),
        Opcode::LdwR => regs.write(o.reg_a, mem.read_word(b)),
        Opcode::LdwI => regs.write(o.reg_a, mem.read_word(o.imm_a)),

        Opcode::StbRr => mem.write_byte(b, a as u8),
        Opcode::StbRi => mem.write_byte(o.imm_a, a as u8),
        Opcode::StbIr => mem.write_byte(a, o.imm_a as u8),
        Opcode::StbIi => mem.write_byte(o.imm_b, o.imm_a as u8),
        Opcode::StwRr => mem.write_word(b, a),
        Opcode::StwRi => mem.write_word(o.imm_a, a),
        Opcode::StwIr => mem.write_word(a, o.imm_a),
        Opcode::StwIi => mem.write_word(o.imm_b, o.imm_a),

        // push reads A before sp moves; pop writes A after, so `popw $sp` keeps the popped value
        Opcode::Pshb => {
            regs.sp = regs.sp.wrapping_sub(1);
            mem.write_byte(regs.sp, a as u8);
        }
        Opcode::Pshw => {
            regs.sp = regs.sp.wrapping_sub(2);
            mem.write_word(regs.sp, a);
        }
        Opcode::Popb => {
            let v = mem.read_byte(regs.sp) as u16;
            regs.sp = regs.sp.wrapping_add(1);
            regs.write(o.reg_a, v);
        }
        Opcode::Popw => {
            let v = mem.read_word(regs.sp);
            regs.sp = regs.sp.wrapping_add(2);
            regs.write(o.reg_a, v);
        }

        _ => {} // nop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::encoder::write_instruction;
    use crate::processor::instruction::Operands;
    use crate::processor::registers::Register;

    const A: Register = Register::X0;
    const B: Register = Register::X1;
    const C: Register = Register::X2;

    fn run_one(p: &mut Process, opcode: Opcode, operands: Operands) -> Step {
        let ip = p.registers.ip;
        write_instruction(&mut p.memory, ip, &Instruction::new(opcode, operands));
        step(p)
    }

    fn rrr() -> Operands {
        Operands { reg_a: A, reg_b: B, reg_c: C, ..Default::default() }
    }

    fn binary_rr(opcode: Opcode, lhs: u16, rhs: u16) -> u16 {
        let mut p = Process::new();
        p.registers.write(B, lhs);
        p.registers.write(C, rhs);
        run_one(&mut p, opcode, rrr());
        p.registers.read(A)
    }

    #[test]
    fn ip_advances_before_execute() {
        let mut p = Process::new();
        p.registers.ip = 0x100;
        let s = run_one(&mut p, Opcode::JmpI, Operands { imm_a: 0x2000, ..Default::default() });
        assert!(matches!(s, Step::Executed(i) if i.opcode == Opcode::JmpI));
        assert_eq!(p.registers.ip, 0x2000);
        assert_eq!(p.registers.rt, 0x103);
    }

    #[test]
    fn jmp_through_rt_reads_target_first() {
        let mut p = Process::new();
        p.registers.rt = 0x4000;
        run_one(&mut p, Opcode::JmpR, Operands { reg_a: Register::Rt, ..Default::default() });
        assert_eq!(p.registers.ip, 0x4000);
        assert_eq!(p.registers.rt, 0x0002);
    }

    #[test]
    fn jmz_only_jumps_on_zero() {
        let mut p = Process::new();
        p.registers.write(B, 0x0800);
        run_one(&mut p, Opcode::JmzR, Operands { reg_a: A, reg_b: B, ..Default::default() });
        assert_eq!(p.registers.ip, 0x0800);

        let mut p = Process::new();
        p.registers.write(A, 1);
        run_one(&mut p, Opcode::JmzI, Operands { reg_a: A, imm_a: 0x0800, ..Default::default() });
        assert_eq!(p.registers.ip, 4);
        assert_eq!(p.registers.rt, 0);
    }

    #[test]
    fn slp_counts_down_one_step_at_a_time() {
        let mut p = Process::new();
        run_one(&mut p, Opcode::SlpI, Operands { imm_a: 2, ..Default::default() });
        assert_eq!(step(&mut p), Step::Slept);
        assert_eq!(step(&mut p), Step::Slept);
        assert_eq!(p.sleep_remaining, 0);
        assert!(matches!(step(&mut p), Step::Executed(_)));
    }

    #[test]
    fn loads_zero_extend_and_wrap() {
        let mut p = Process::new();
        p.memory.write_byte(0xFFFF, 0xCD);
        p.memory.write_byte(0x0000, 0xAB);
        p.registers.ip = 0x10;
        run_one(&mut p, Opcode::LdwI, Operands { reg_a: A, imm_a: 0xFFFF, ..Default::default() });
        assert_eq!(p.registers.read(A), 0xABCD);
        run_one(&mut p, Opcode::LdbI, Operands { reg_a: B, imm_a: 0xFFFF, ..Default::default() });
        assert_eq!(p.registers.read(B), 0x00CD);
    }

    #[test]
    fn store_forms_take_value_then_address() {
        let mut p = Process::new();
        p.registers.ip = 0x100;
        p.registers.write(A, 0x1234);
        p.registers.write(B, 0x2000);
        run_one(&mut p, Opcode::StwRr, Operands { reg_a: A, reg_b: B, ..Default::default() });
        assert_eq!(p.memory.read_word(0x2000), 0x1234);

        run_one(&mut p, Opcode::StbRi, Operands { reg_a: A, imm_a: 0x3000, ..Default::default() });
        assert_eq!(p.memory.read_byte(0x3000), 0x34);

        // ir: immediate value stored at the address held in A
        p.registers.write(A, 0x4000);
        run_one(&mut p, Opcode::StwIr, Operands { reg_a: A, imm_a: 0xBEEF, ..Default::default() });
        assert_eq!(p.memory.read_word(0x4000), 0xBEEF);
        run_one(&mut p, Opcode::StbIr, Operands { reg_a: A, imm_a: 0x7F, ..Default::default() });
        assert_eq!(p.memory.read_byte(0x4000), 0x7F);

        run_one(&mut p, Opcode::StwIi, Operands { imm_a: 0xCAFE, imm_b: 0x5000, ..Default::default() });
        assert_eq!(p.memory.read_word(0x5000), 0xCAFE);
        run_one(&mut p, Opcode::StbIi, Operands { imm_a: 0x99, imm_b: 0x5002, ..Default::default() });
        assert_eq!(p.memory.read_byte(0x5002), 0x99);
    }

    #[test]
    fn push_wraps_below_zero() {
        let mut p = Process::new();
        p.registers.ip = 0x100;
        p.registers.write(A, 0x1234);
        run_one(&mut p, Opcode::Pshb, Operands { reg_a: A, ..Default::default() });
        assert_eq!(p.registers.sp, 0xFFFF);
        assert_eq!(p.memory.read_byte(0xFFFF), 0x34);

        let mut p = Process::new();
        p.registers.ip = 0x100;
        p.registers.write(A, 0x1234);
        run_one(&mut p, Opcode::Pshw, Operands { reg_a: A, ..Default::default() });
        assert_eq!(p.registers.sp, 0xFFFE);
        assert_eq!(p.memory.read_byte(0xFFFE), 0x34);
        assert_eq!(p.memory.read_byte(0xFFFF), 0x12);
    }

    #[test]
    fn push_and_pop_of_sp() {
        let mut p = Process::new();
        p.registers.ip = 0x100;
        p.registers.sp = 0x8000;
        run_one(&mut p, Opcode::Pshw, Operands { reg_a: Register::Sp, ..Default::default() });
        assert_eq!(p.memory.read_word(0x7FFE), 0x8000);
        run_one(&mut p, Opcode::Popw, Operands { reg_a: A, ..Default::default() });
        assert_eq!(p.registers.read(A), 0x8000);
        assert_eq!(p.registers.sp, 0x8000);

        p.memory.write_word(0x8000, 0x1111);
        run_one(&mut p, Opcode::Popw, Operands { reg_a: Register::Sp, ..Default::default() });
        assert_eq!(p.registers.sp, 0x1111);
    }

    #[test]
    fn writes_to_nl_are_dropped() {
        let mut p = Process::new();
        run_one(&mut p, Opcode::SetI, Operands { reg_a: Register::Nl, imm_a: 7, ..Default::default() });
        assert_eq!(p.registers.read(Register::Nl), 0);
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(binary_rr(Opcode::AddR, 0xFFFF, 2), 1);
        assert_eq!(binary_rr(Opcode::SubRr, 1, 2), 0xFFFF);
        assert_eq!(binary_rr(Opcode::MulR, 0x1234, 0x5678), 0x0060);
    }

    #[test]
    fn immediate_forms_pick_operand_order() {
        let mut p = Process::new();
        p.registers.write(B, 3);
        run_one(&mut p, Opcode::SubRi, Operands { reg_a: A, reg_b: B, imm_a: 10, ..Default::default() });
        assert_eq!(p.registers.read(A), 0xFFF9);
        run_one(&mut p, Opcode::SubIr, Operands { reg_a: A, reg_b: B, imm_a: 10, ..Default::default() });
        assert_eq!(p.registers.read(A), 7);
    }

    #[test]
    fn signed_division_reference_values() {
        assert_eq!(binary_rr(Opcode::DivsRr, 0x5678, 0x1234), 0x0004);
        assert_eq!(binary_rr(Opcode::DivsRr, 0x8765, 0x1234), 0xFFFA);
        assert_eq!(binary_rr(Opcode::DivsRr, 0x5678, 0xFEDC), 0xFFB5);
        assert_eq!(binary_rr(Opcode::DivsRr, 0xBA98, 0xFEDC), 0x003C);

        assert_eq!(binary_rr(Opcode::RemsRr, 0x5678, 0x1234), 0x0DA8);
        assert_eq!(binary_rr(Opcode::RemsRr, 0x8765, 0x1234), 0xF49D);
        assert_eq!(binary_rr(Opcode::RemsRr, 0x5678, 0xFEDC), 0x00EC);
        assert_eq!(binary_rr(Opcode::RemsRr, 0xBA98, 0xFEDC), 0xFF08);
    }

    #[test]
    fn unsigned_remainder_reference_values() {
        assert_eq!(binary_rr(Opcode::RemuRr, 0x5678, 0x1234), 0x0DA8);
        assert_eq!(binary_rr(Opcode::RemuRr, 0x8765, 0x1234), 0x07F9);
        assert_eq!(binary_rr(Opcode::RemuRr, 0x5678, 0xFEDC), 0x5678);
        assert_eq!(binary_rr(Opcode::RemuRr, 0xBA98, 0xFEDC), 0xBA98);
    }

    #[test]
    fn division_edge_cases() {
        assert_eq!(binary_rr(Opcode::DivsRr, 0x1234, 0), 0xFFFF);
        assert_eq!(binary_rr(Opcode::DivuRr, 0x1234, 0), 0xFFFF);
        assert_eq!(binary_rr(Opcode::RemsRr, 0x1234, 0), 0x1234);
        assert_eq!(binary_rr(Opcode::RemuRr, 0x1234, 0), 0x1234);
        assert_eq!(binary_rr(Opcode::DivsRr, 0x8000, 0xFFFF), 0x8000);
        assert_eq!(binary_rr(Opcode::RemsRr, 0x8000, 0xFFFF), 0);
    }

    #[test]
    fn shift_reference_values() {
        assert_eq!(binary_rr(Opcode::LshRr, 0x5678, 5), 0xCF00);
        assert_eq!(binary_rr(Opcode::LshRr, 0x5678, 0xFFFB), 0);
        assert_eq!(binary_rr(Opcode::RshsRr, 0x8765, 5), 0xFC3B);
        assert_eq!(binary_rr(Opcode::RshuRr, 0x8765, 5), 0x043B);
        assert_eq!(binary_rr(Opcode::RshsRr, 0x8765, 16), 0xFFFF);
        assert_eq!(binary_rr(Opcode::RshsRr, 0x0765, 0x8000), 0);
        assert_eq!(binary_rr(Opcode::RshuRr, 0x8765, 16), 0);
    }

    #[test]
    fn compares_yield_one_or_zero() {
        assert_eq!(binary_rr(Opcode::CltsRr, 0xFFFF, 1), 1);
        assert_eq!(binary_rr(Opcode::CltuRr, 0xFFFF, 1), 0);
        assert_eq!(binary_rr(Opcode::CgesRr, 1, 0xFFFF), 1);
        assert_eq!(binary_rr(Opcode::CgeuRr, 1, 0xFFFF), 0);
        assert_eq!(binary_rr(Opcode::CeqR, 5, 5), 1);
        assert_eq!(binary_rr(Opcode::CneR, 5, 5), 0);
    }

    #[test]
    fn unknown_opcode_runs_as_nop() {
        let mut p = Process::new();
        p.memory.write_byte(0, 0xFF);
        let s = step(&mut p);
        assert_eq!(s, Step::Executed(Instruction::default()));
        assert_eq!(p.registers.ip, 1);
    }
}
