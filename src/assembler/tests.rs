use super::errors::*;
use super::*;
use crate::processor::{fetch, Instruction, Memory, Opcode, Operands, Process, Register, Step};

fn decode_at(prog: &BinaryProgram, address: u16) -> Instruction {
    let mem = Memory::from_image(&prog.bytes).expect("image");
    let mut ip = address;
    fetch(&mem, &mut ip)
}

fn assemble_err(src: &str) -> AssembleError {
    assemble(src).err().expect("expected error")
}

#[test]
fn image_is_full_size() {
    let prog = assemble("nop").expect("assemble");
    assert_eq!(prog.bytes.len(), 65536);
    assert_eq!(prog.mappings.len(), 1);
}

#[test]
fn three_operand_forms_pick_their_overload() {
    let prog = assemble("sub $x0, $x1, $x2\nsub $x0, $x1, 5\nsub $x0, 5, $x1\n").expect("assemble");
    let first = decode_at(&prog, 0);
    assert_eq!(first.opcode, Opcode::SubRr);
    assert_eq!(first.operands.reg_c, Register::X2);
    assert_eq!(decode_at(&prog, 3).opcode, Opcode::SubRi);
    let ir = decode_at(&prog, 7);
    assert_eq!(ir.opcode, Opcode::SubIr);
    assert_eq!((ir.operands.reg_a, ir.operands.reg_b, ir.operands.imm_a), (Register::X0, Register::X1, 5));
}

#[test]
fn commutative_immediate_first_moves_operands() {
    let prog = assemble("add $x0, 7, $x1").expect("assemble");
    let inst = decode_at(&prog, 0);
    assert_eq!(inst.opcode, Opcode::AddI);
    assert_eq!(inst.operands.reg_b, Register::X1);
    assert_eq!(inst.operands.imm_a, 7);
}

#[test]
fn pseudo_compares_swap_operands() {
    let prog = assemble("cgts $x0, $x1, $x2\ncgts $x0, $x1, 3\ncleu $x0, 3, $x2\n").expect("assemble");
    let rr = decode_at(&prog, 0);
    assert_eq!(rr.opcode, Opcode::CltsRr);
    assert_eq!((rr.operands.reg_b, rr.operands.reg_c), (Register::X2, Register::X1));
    let ir = decode_at(&prog, 3);
    assert_eq!(ir.opcode, Opcode::CltsIr);
    assert_eq!((ir.operands.reg_b, ir.operands.imm_a), (Register::X1, 3));
    let ri = decode_at(&prog, 7);
    assert_eq!(ri.opcode, Opcode::CgeuRi);
    assert_eq!((ri.operands.reg_b, ri.operands.imm_a), (Register::X2, 3));
}

#[test]
fn store_forms_take_value_then_address() {
    let src = "stb $x0, $x1\nstb $x0, 0x1000\nstb 0x7F, $x1\nstb 0x7F, 0x1000\nstw 0xBEEF, 0x2000\n";
    let prog = assemble(src).expect("assemble");
    let ops: Vec<Opcode> = [0u16, 2, 6, 9, 13].iter().map(|&a| decode_at(&prog, a).opcode).collect();
    assert_eq!(ops, [Opcode::StbRr, Opcode::StbRi, Opcode::StbIr, Opcode::StbIi, Opcode::StwIi]);
    let ii = decode_at(&prog, 13);
    assert_eq!((ii.operands.imm_a, ii.operands.imm_b), (0xBEEF, 0x2000));
}

#[test]
fn labels_resolve_forward_and_backward() {
    let src = "start:\n  jmp @end\n  nop\nend: jmp @start\n";
    let prog = assemble(src).expect("assemble");
    assert_eq!(decode_at(&prog, 0).operands.imm_a, 4);
    assert_eq!(decode_at(&prog, 4).operands.imm_a, 0);
}

#[test]
fn address_labels_move_the_output() {
    let src = "nop\n@0100:\n.data AA BB\nhere@0200: set $x0, @here\n";
    let prog = assemble(src).expect("assemble");
    assert_eq!(prog.bytes[0x100], 0xAA);
    assert_eq!(prog.bytes[0x101], 0xBB);
    let set = decode_at(&prog, 0x200);
    assert_eq!(set.opcode, Opcode::SetI);
    assert_eq!(set.operands.imm_a, 0x200);
    assert_eq!(prog.address_of_line(3), Some(0x200));
    assert_eq!(prog.mapping_at(0x203).map(|m| m.span.start.line), Some(3));
    assert!(prog.mapping_at(0x204).is_none());
}

#[test]
fn negative_immediates_wrap_to_field_width() {
    let prog = assemble("set $x0, -1\nstb -1, 0x10\n").expect("assemble");
    assert_eq!(decode_at(&prog, 0).operands.imm_a, 0xFFFF);
    assert_eq!(decode_at(&prog, 4).operands.imm_a, 0xFF);
}

#[test]
fn immediate_ranges_per_field() {
    assert!(assemble("set $x0, 65535").is_ok());
    assert!(assemble("set $x0, -32768").is_ok());
    assert_eq!(assemble_err("set $x0, 65536").message, IMMEDIATE_OUT_OF_RANGE);
    assert_eq!(assemble_err("set $x0, -32769").message, IMMEDIATE_OUT_OF_RANGE);
    assert_eq!(assemble_err("stb 256, $x0").message, IMMEDIATE_OUT_OF_RANGE);
    assert!(assemble("stb -128, $x0").is_ok());
    assert!(assemble("lsh $x0, $x0, 15").is_ok());
    let err = assemble_err("lsh $x0, $x0, 16");
    assert_eq!(err.message, IMMEDIATE_OUT_OF_RANGE);
    assert_eq!(err.span, TextSpan::on_line(0, 14, 16));
}

#[test]
fn labels_only_fit_wide_fields() {
    let err = assemble_err("x: lsh $x0, $x0, @x");
    assert_eq!(err.message, EXPECTED_IMMEDIATE);
    assert_eq!(assemble_err("x: stb @x, $x0").message, EXPECTED_IMMEDIATE);
    assert!(assemble("x: stb $x0, @x").is_ok());
}

#[test]
fn parameter_count_errors() {
    let err = assemble_err("add $x0, $x1");
    assert_eq!(err.message, TOO_FEW_PARAMETERS);
    let err = assemble_err("nop 0");
    assert_eq!(err.message, TOO_MANY_PARAMETERS);
    assert_eq!(err.span, TextSpan::on_line(0, 4, 5));
}

#[test]
fn mismatch_reports_longest_matching_overload() {
    let err = assemble_err("set 5, $x0");
    assert_eq!(err.message, EXPECTED_REGISTER);
    assert_eq!(err.span, TextSpan::on_line(0, 4, 5));

    let err = assemble_err("add $x0, 1, 2");
    assert_eq!(err.message, EXPECTED_REGISTER);
    assert_eq!(err.span, TextSpan::on_line(0, 12, 13));

    let err = assemble_err("pshw 5");
    assert_eq!(err.message, EXPECTED_REGISTER);
}

#[test]
fn label_errors() {
    let err = assemble_err("a: nop\na: nop\n");
    assert_eq!(err.message, DUPLICATE_LABEL);
    assert_eq!(err.span.start.line, 1);

    let err = assemble_err("nop\njmp @missing\n");
    assert_eq!(err.message, UNDEFINED_LABEL);
    assert_eq!(err.span, TextSpan::on_line(1, 4, 12));
    assert_eq!(err.to_string(), "line 2: Undefined label");
}

#[test]
fn layout_errors() {
    assert_eq!(assemble_err("@FFFE:\njmp 0").message, PROGRAM_TOO_LARGE);
    assert!(assemble("@FFFD:\njmp 0").is_ok());
    let err = assemble_err("@FFFD:\njmp @end\nend:\n");
    assert_eq!(err.message, PROGRAM_TOO_LARGE);
    assert_eq!(err.span.start.line, 2);
    let err = assemble_err("nop\nnop\n@0001:\nnop\n");
    assert_eq!(err.message, OVERLAPPING_OUTPUT);
    assert_eq!(err.span.start.line, 3);
}

#[test]
fn parse_errors_surface_through_assemble() {
    let err = assemble_err("nop\nfrobnicate $x0\n");
    assert_eq!(err.message, UNRECOGNIZED_MNEMONIC);
    assert_eq!(err.span.start.line, 1);
}

#[test]
fn assembled_loop_runs_on_the_processor() {
    let src = "
        set $x0, 0
        set $x1, 5
    loop:
        add $x0, $x0, 3
        sub $x1, $x1, 1
        jmz $x1, @done
        jmp @loop
    done:
        pshw $x0
        popb $x2
    halt:
        jmp @halt
    ";
    let prog = assemble(src).expect("assemble");
    let mut p = Process::with_image(&prog.bytes).expect("image");
    p.registers.sp = 0x8000;
    for _ in 0..200 {
        assert!(matches!(crate::processor::step(&mut p), Step::Executed(_)));
    }
    assert_eq!(p.registers.read(Register::X0), 15);
    assert_eq!(p.registers.read(Register::X1), 0);
    assert_eq!(p.registers.read(Register::X2), 15);
    assert_eq!(p.registers.sp, 0x7FFF);
}

#[test]
fn disassembly_reassembles_to_the_same_bytes() {
    use crate::processor::{disassemble, encode};
    let samples = [
        Instruction::new(Opcode::StbIr, Operands { reg_a: Register::X3, imm_a: 0x80, ..Default::default() }),
        Instruction::new(
            Opcode::RshsRi,
            Operands { reg_a: Register::X0, reg_b: Register::X11, imm_a: 15, ..Default::default() },
        ),
        Instruction::new(
            Opcode::CgesIr,
            Operands { reg_a: Register::Rt, reg_b: Register::Sp, imm_a: 0x1234, ..Default::default() },
        ),
        Instruction::new(Opcode::StwIi, Operands { imm_a: 0xFFFF, imm_b: 0x0102, ..Default::default() }),
        Instruction::new(Opcode::Popw, Operands { reg_a: Register::Ip, ..Default::default() }),
    ];
    for inst in samples {
        let text = disassemble(&inst);
        let prog = assemble(&text).expect("assemble");
        let bytes = encode(&inst);
        assert_eq!(&prog.bytes[..bytes.len()], bytes.as_slice(), "{text}");
    }
}
