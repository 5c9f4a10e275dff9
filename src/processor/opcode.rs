// processor/opcode.rs

/// How the operand bytes of an instruction are laid out after the opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    None,           // [op]
    RegA,           // [op][A|-]
    RegARegB,       // [op][A|B]
    ImmA16,         // [op][immA lo][immA hi]
    RegAImmA8,      // [op][immA8][A|-]
    RegARegBImmA4,  // [op][-|immA4][A|B]
    RegARegBRegC,   // [op][C|-][A|B]
    ImmA8ImmB16,    // [op][immA8][immB lo][immB hi]
    RegAImmA16,     // [op][immA lo][immA hi][A|-]
    RegARegBImmA16, // [op][immA lo][immA hi][A|B]
    ImmA16ImmB16,   // [op][immA lo][immA hi][immB lo][immB hi]
}

impl Layout {
    /// Total encoded size in bytes, opcode included.
    pub const fn size(self) -> u16 {
        match self {
            Layout::None => 1,
            Layout::RegA | Layout::RegARegB => 2,
            Layout::ImmA16 | Layout::RegAImmA8 | Layout::RegARegBImmA4 | Layout::RegARegBRegC => 3,
            Layout::ImmA8ImmB16 | Layout::RegAImmA16 | Layout::RegARegBImmA16 => 4,
            Layout::ImmA16ImmB16 => 5,
        }
    }

    pub const fn has_reg_a(self) -> bool {
        matches!(
            self,
            Layout::RegA
                | Layout::RegARegB
                | Layout::RegAImmA8
                | Layout::RegARegBImmA4
                | Layout::RegARegBRegC
                | Layout::RegAImmA16
                | Layout::RegARegBImmA16
        )
    }

    pub const fn has_reg_b(self) -> bool {
        matches!(
            self,
            Layout::RegARegB | Layout::RegARegBImmA4 | Layout::RegARegBRegC | Layout::RegARegBImmA16
        )
    }

    pub const fn has_reg_c(self) -> bool {
        matches!(self, Layout::RegARegBRegC)
    }

    /// Width of immediate A in bits (0 when absent).
    pub const fn imm_a_bits(self) -> u8 {
        match self {
            Layout::RegARegBImmA4 => 4,
            Layout::RegAImmA8 | Layout::ImmA8ImmB16 => 8,
            Layout::ImmA16 | Layout::RegAImmA16 | Layout::RegARegBImmA16 | Layout::ImmA16ImmB16 => 16,
            _ => 0,
        }
    }

    /// Immediate B is always 16 bits wide when present.
    pub const fn has_imm_b(self) -> bool {
        matches!(self, Layout::ImmA8ImmB16 | Layout::ImmA16ImmB16)
    }
}

macro_rules! opcodes {
    ($($variant:ident => $name:literal, $layout:ident;)*) => {
        /// An operation code. The discriminant is the encoded opcode byte.
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            #[default]
            $($variant,)*
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)*
                }
            }

            pub const fn layout(self) -> Layout {
                match self {
                    $(Opcode::$variant => Layout::$layout,)*
                }
            }
        }
    };
}

opcodes! {
    Nop    => "nop",     None;

    JmpR   => "jmp_r",   RegA;
    JmpI   => "jmp_i",   ImmA16;
    JmzR   => "jmz_r",   RegARegB;
    JmzI   => "jmz_i",   RegAImmA16;
    SlpR   => "slp_r",   RegA;
    SlpI   => "slp_i",   ImmA16;

    SetR   => "set_r",   RegARegB;
    SetI   => "set_i",   RegAImmA16;
    LdbR   => "ldb_r",   RegARegB;
    LdbI   => "ldb_i",   RegAImmA16;
    LdwR   => "ldw_r",   RegARegB;
    LdwI   => "ldw_i",   RegAImmA16;
    StbRr  => "stb_rr",  RegARegB;
    StbRi  => "stb_ri",  RegAImmA16;
    StbIr  => "stb_ir",  RegAImmA8;
    StbIi  => "stb_ii",  ImmA8ImmB16;
    StwRr  => "stw_rr",  RegARegB;
    StwRi  => "stw_ri",  RegAImmA16;
    StwIr  => "stw_ir",  RegAImmA16;
    StwIi  => "stw_ii",  ImmA16ImmB16;
    Pshb   => "pshb",    RegA;
    Pshw   => "pshw",    RegA;
    Popb   => "popb",    RegA;
    Popw   => "popw",    RegA;

    AddR   => "add_r",   RegARegBRegC;
    AddI   => "add_i",   RegARegBImmA16;
    SubRr  => "sub_rr",  RegARegBRegC;
    SubRi  => "sub_ri",  RegARegBImmA16;
    SubIr  => "sub_ir",  RegARegBImmA16;
    MulR   => "mul_r",   RegARegBRegC;
    MulI   => "mul_i",   RegARegBImmA16;
    DivsRr => "divs_rr", RegARegBRegC;
    DivsRi => "divs_ri", RegARegBImmA16;
    DivsIr => "divs_ir", RegARegBImmA16;
    DivuRr => "divu_rr", RegARegBRegC;
    DivuRi => "divu_ri", RegARegBImmA16;
    DivuIr => "divu_ir", RegARegBImmA16;
    RemsRr => "rems_rr", RegARegBRegC;
    RemsRi => "rems_ri", RegARegBImmA16;
    RemsIr => "rems_ir", RegARegBImmA16;
    RemuRr => "remu_rr", RegARegBRegC;
    RemuRi => "remu_ri", RegARegBImmA16;
    RemuIr => "remu_ir", RegARegBImmA16;

    AndR   => "and_r",   RegARegBRegC;
    AndI   => "and_i",   RegARegBImmA16;
    IorR   => "ior_r",   RegARegBRegC;
    IorI   => "ior_i",   RegARegBImmA16;
    XorR   => "xor_r",   RegARegBRegC;
    XorI   => "xor_i",   RegARegBImmA16;
    LshRr  => "lsh_rr",  RegARegBRegC;
    LshRi  => "lsh_ri",  RegARegBImmA4;
    LshIr  => "lsh_ir",  RegARegBImmA16;
    RshsRr => "rshs_rr", RegARegBRegC;
    RshsRi => "rshs_ri", RegARegBImmA4;
    RshsIr => "rshs_ir", RegARegBImmA16;
    RshuRr => "rshu_rr", RegARegBRegC;
    RshuRi => "rshu_ri", RegARegBImmA4;
    RshuIr => "rshu_ir", RegARegBImmA16;

    CeqR   => "ceq_r",   RegARegBRegC;
    CeqI   => "ceq_i",   RegARegBImmA16;
    CneR   => "cne_r",   RegARegBRegC;
    CneI   => "cne_i",   RegARegBImmA16;
    CltsRr => "clts_rr", RegARegBRegC;
    CltsRi => "clts_ri", RegARegBImmA16;
    CltsIr => "clts_ir", RegARegBImmA16;
    CltuRr => "cltu_rr", RegARegBRegC;
    CltuRi => "cltu_ri", RegARegBImmA16;
    CltuIr => "cltu_ir", RegARegBImmA16;
    CgesRr => "cges_rr", RegARegBRegC;
    CgesRi => "cges_ri", RegARegBImmA16;
    CgesIr => "cges_ir", RegARegBImmA16;
    CgeuRr => "cgeu_rr", RegARegBRegC;
    CgeuRi => "cgeu_ri", RegARegBImmA16;
    CgeuIr => "cgeu_ir", RegARegBImmA16;
}

impl Opcode {
    /// Decodes an opcode byte. Bytes past the end of the table decode as `nop`.
    #[inline]
    pub fn from_byte(byte: u8) -> Opcode {
        Self::ALL.get(byte as usize).copied().unwrap_or(Opcode::Nop)
    }

    #[inline]
    pub fn byte(self) -> u8 {
        self as u8
    }
}
