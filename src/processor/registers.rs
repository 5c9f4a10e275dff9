// processor/registers.rs
use std::fmt;

/// One of the sixteen registers, identified by its 4-bit code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// Null register. Reads as 0, writes are discarded.
    #[default]
    Nl = 0,
    /// Instruction pointer.
    Ip,
    /// Stack pointer.
    Sp,
    /// Return address, written by `jmp`.
    Rt,
    X0,
    X1,
    X2,
    X3,
    X4,
    X5,
    X6,
    X7,
    X8,
    X9,
    X10,
    X11,
}

pub const REGISTER_COUNT: usize = 16;
pub const GENERAL_REGISTER_COUNT: usize = 12;

const REGISTER_NAMES: [&str; REGISTER_COUNT] = [
    "nl", "ip", "sp", "rt", "x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7", "x8", "x9", "x10", "x11",
];

impl Register {
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::Nl,
        Register::Ip,
        Register::Sp,
        Register::Rt,
        Register::X0,
        Register::X1,
        Register::X2,
        Register::X3,
        Register::X4,
        Register::X5,
        Register::X6,
        Register::X7,
        Register::X8,
        Register::X9,
        Register::X10,
        Register::X11,
    ];

    /// Decodes the low 4 bits of `nibble`. Upper bits are ignored.
    #[inline]
    pub fn from_nibble(nibble: u8) -> Register {
        Self::ALL[(nibble & 0xF) as usize]
    }

    #[inline]
    pub fn nibble(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        REGISTER_NAMES[self as usize]
    }

    /// Looks a register up by its assembly name, ignoring case.
    pub fn from_name(name: &str) -> Option<Register> {
        REGISTER_NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| Self::ALL[i])
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub ip: u16,
    pub sp: u16,
    pub rt: u16,
    pub x: [u16; GENERAL_REGISTER_COUNT], // x0..x11
}

impl Registers {
    #[inline]
    pub fn read(&self, r: Register) -> u16 {
        match r {
            Register::Nl => 0,
            Register::Ip => self.ip,
            Register::Sp => self.sp,
            Register::Rt => self.rt,
            general => self.x[general as usize - Register::X0 as usize],
        }
    }

    #[inline]
    pub fn write(&mut self, r: Register, v: u16) {
        match r {
            Register::Nl => {}
            Register::Ip => self.ip = v,
            Register::Sp => self.sp = v,
            Register::Rt => self.rt = v,
            general => self.x[general as usize - Register::X0 as usize] = v,
        }
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip=0x{:04X} sp=0x{:04X} rt=0x{:04X}", self.ip, self.sp, self.rt)?;
        for (i, chunk) in self.x.chunks(4).enumerate() {
            writeln!(f)?;
            for (j, v) in chunk.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:<3}=0x{:04X}", format!("x{}", i * 4 + j), v)?;
            }
        }
        Ok(())
    }
}
