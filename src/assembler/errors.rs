// assembler/errors.rs
use std::fmt::Write;

use thiserror::Error;

use super::text::TextSpan;

// parse
pub const TOO_MANY_OPERANDS: &str = "Too many operands";
pub const INVALID_LABEL_NAME: &str = "Invalid label name";
pub const INVALID_LABEL_ADDRESS: &str = "Invalid label address";
pub const UNRECOGNIZED_MNEMONIC: &str = "Unrecognized mnemonic";
pub const UNRECOGNIZED_DIRECTIVE: &str = "Unrecognized directive";
pub const INVALID_OPERAND: &str = "Invalid operand";
pub const INVALID_REGISTER: &str = "Invalid register";
pub const INVALID_HEX_VALUE: &str = "Invalid hexadecimal value";
pub const INVALID_INT_VALUE: &str = "Invalid integer value";
pub const INVALID_HEX_BYTE: &str = "Invalid hexadecimal byte";
pub const UNEXPECTED_CHARACTER: &str = "Unexpected character";
pub const UNEXPECTED_END_OF_LINE: &str = "Unexpected end of line";

// assemble
pub const TOO_FEW_PARAMETERS: &str = "Too few parameters";
pub const TOO_MANY_PARAMETERS: &str = "Too many parameters";
pub const EXPECTED_REGISTER: &str = "Expected register as parameter";
pub const EXPECTED_IMMEDIATE: &str = "Expected immediate value as parameter";
pub const EXPECTED_IMMEDIATE_OR_LABEL: &str = "Expected immediate value or label reference as parameter";
pub const IMMEDIATE_OUT_OF_RANGE: &str = "Immediate value is outside the allowed range";
pub const UNDEFINED_LABEL: &str = "Undefined label";
pub const DUPLICATE_LABEL: &str = "Duplicate label";
pub const PROGRAM_TOO_LARGE: &str = "Program exceeds available memory";
pub const OVERLAPPING_OUTPUT: &str = "Overlapping code or data";

/// A parse or assembly failure, located in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {}: {}", .span.start.line + 1, .message)]
pub struct AssembleError {
    pub span: TextSpan,
    pub message: &'static str,
}

impl AssembleError {
    pub fn new(span: TextSpan, message: &'static str) -> Self {
        Self { span, message }
    }
}

/// Formats a compiler-style diagnostic: the message, the location, and the offending
/// source line with the span underlined.
pub fn render_diagnostic(file: &str, source: &str, err: &AssembleError) -> String {
    let start = err.span.start;
    let mut diag = String::new();
    let _ = writeln!(diag, "error: {}", err.message);
    let _ = writeln!(diag, " --> {file}:{start}");

    if let Some(raw_line) = source.lines().nth(start.line) {
        let line_text = raw_line.trim_end_matches('\r');
        let width = if err.span.end.line == start.line {
            err.span.end.column.saturating_sub(start.column).max(1)
        } else {
            line_text.chars().count().saturating_sub(start.column).max(1)
        };
        let _ = writeln!(diag, "  |");
        let _ = writeln!(diag, "{:>4} | {}", start.line + 1, line_text);
        let _ = writeln!(diag, "  | {}{}", " ".repeat(start.column), "^".repeat(width));
    }

    diag
}
