pub mod assembler;
pub mod binary;
pub mod errors;
pub mod mnemonic;
pub mod parser;
pub mod text;

pub use assembler::{assemble, assemble_statements};
pub use binary::{BinaryProgram, SourceMapping};
pub use errors::{render_diagnostic, AssembleError};
pub use parser::{parse, Operand, OperandValue, Statement, StatementKind};
pub use text::{TextPosition, TextSpan};

#[cfg(test)]
mod tests;
