use thiserror::Error;

use crate::assembler::AssembleError;

/// Errors raised by the engine outside of assembly diagnostics.
#[derive(Error, Debug)]
pub enum EmbattledError {
    /// A memory image that does not cover the whole address space.
    #[error("memory image must be {expected} bytes, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    #[error("no robot in slot {0}")]
    NoSuchRobot(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}
