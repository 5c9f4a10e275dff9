pub mod decoder;
pub mod encoder;
pub mod exec;
pub mod instruction;
pub mod memory;
pub mod opcode;
pub mod process;
pub mod registers;

pub use decoder::{disassemble, fetch};
pub use encoder::{encode, write_instruction};
pub use exec::{step, Step};
pub use instruction::{Instruction, Operands};
pub use memory::{Memory, MEMORY_SIZE};
pub use opcode::{Layout, Opcode};
pub use process::Process;
pub use registers::{Register, Registers};
