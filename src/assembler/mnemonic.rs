// assembler/mnemonic.rs
use crate::processor::Opcode;

/// The instruction field an assembly operand is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    RegA,
    RegB,
    RegC,
    ImmA,
    ImmB,
}

impl Slot {
    #[inline]
    pub fn is_register(self) -> bool {
        matches!(self, Slot::RegA | Slot::RegB | Slot::RegC)
    }
}

/// One way of writing a mnemonic: the opcode it selects and where each operand goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overload {
    pub opcode: Opcode,
    pub slots: &'static [Slot],
}

use Slot::*;

const NONE: &[Slot] = &[];
const R: &[Slot] = &[RegA];
const I: &[Slot] = &[ImmA];
const RR: &[Slot] = &[RegA, RegB];
const RI: &[Slot] = &[RegA, ImmA];
const IR_A: &[Slot] = &[ImmA, RegA];
const II: &[Slot] = &[ImmA, ImmB];
const RRR: &[Slot] = &[RegA, RegB, RegC];
const RRI: &[Slot] = &[RegA, RegB, ImmA];
const RIR: &[Slot] = &[RegA, ImmA, RegB];
const RRR_SWAP: &[Slot] = &[RegA, RegC, RegB];

macro_rules! mnemonics {
    ($($variant:ident => $name:literal [$($opcode:ident : $slots:ident),* $(,)?];)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Mnemonic {
            $($variant,)*
        }

        impl Mnemonic {
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Mnemonic::$variant => $name,)*
                }
            }

            /// Candidate encodings, in the order they are tried.
            pub const fn overloads(self) -> &'static [Overload] {
                match self {
                    $(Mnemonic::$variant => &[$(Overload { opcode: Opcode::$opcode, slots: $slots }),*],)*
                }
            }
        }
    };
}

mnemonics! {
    Nop  => "nop"  [Nop: NONE];
    Jmp  => "jmp"  [JmpR: R, JmpI: I];
    Jmz  => "jmz"  [JmzR: RR, JmzI: RI];
    Slp  => "slp"  [SlpR: R, SlpI: I];

    Set  => "set"  [SetR: RR, SetI: RI];
    Ldb  => "ldb"  [LdbR: RR, LdbI: RI];
    Ldw  => "ldw"  [LdwR: RR, LdwI: RI];
    Stb  => "stb"  [StbRr: RR, StbRi: RI, StbIr: IR_A, StbIi: II];
    Stw  => "stw"  [StwRr: RR, StwRi: RI, StwIr: IR_A, StwIi: II];
    Pshb => "pshb" [Pshb: R];
    Pshw => "pshw" [Pshw: R];
    Popb => "popb" [Popb: R];
    Popw => "popw" [Popw: R];

    Add  => "add"  [AddR: RRR, AddI: RRI, AddI: RIR];
    Sub  => "sub"  [SubRr: RRR, SubRi: RRI, SubIr: RIR];
    Mul  => "mul"  [MulR: RRR, MulI: RRI, MulI: RIR];
    Divs => "divs" [DivsRr: RRR, DivsRi: RRI, DivsIr: RIR];
    Divu => "divu" [DivuRr: RRR, DivuRi: RRI, DivuIr: RIR];
    Rems => "rems" [RemsRr: RRR, RemsRi: RRI, RemsIr: RIR];
    Remu => "remu" [RemuRr: RRR, RemuRi: RRI, RemuIr: RIR];

    And  => "and"  [AndR: RRR, AndI: RRI, AndI: RIR];
    Ior  => "ior"  [IorR: RRR, IorI: RRI, IorI: RIR];
    Xor  => "xor"  [XorR: RRR, XorI: RRI, XorI: RIR];
    Lsh  => "lsh"  [LshRr: RRR, LshRi: RRI, LshIr: RIR];
    Rshs => "rshs" [RshsRr: RRR, RshsRi: RRI, RshsIr: RIR];
    Rshu => "rshu" [RshuRr: RRR, RshuRi: RRI, RshuIr: RIR];

    Ceq  => "ceq"  [CeqR: RRR, CeqI: RRI, CeqI: RIR];
    Cne  => "cne"  [CneR: RRR, CneI: RRI, CneI: RIR];
    Clts => "clts" [CltsRr: RRR, CltsRi: RRI, CltsIr: RIR];
    Cltu => "cltu" [CltuRr: RRR, CltuRi: RRI, CltuIr: RIR];
    Cges => "cges" [CgesRr: RRR, CgesRi: RRI, CgesIr: RIR];
    Cgeu => "cgeu" [CgeuRr: RRR, CgeuRi: RRI, CgeuIr: RIR];

    // a > b is b < a, a <= b is b >= a
    Cgts => "cgts" [CltsRr: RRR_SWAP, CltsIr: RRI, CltsRi: RIR];
    Cgtu => "cgtu" [CltuRr: RRR_SWAP, CltuIr: RRI, CltuRi: RIR];
    Cles => "cles" [CgesRr: RRR_SWAP, CgesIr: RRI, CgesRi: RIR];
    Cleu => "cleu" [CgeuRr: RRR_SWAP, CgeuIr: RRI, CgeuRi: RIR];
}

impl Mnemonic {
    /// Looks a mnemonic up by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}
