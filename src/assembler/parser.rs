// assembler/parser.rs
//! Line-oriented parser. Each source line holds at most one label, followed by at most
//! one instruction or `.data` directive. `;` starts a comment that runs to end of line.

use super::errors::*;
use super::mnemonic::Mnemonic;
use super::text::TextSpan;
use crate::processor::Register;

const COMMENT_CHAR: char = ';';
const LABEL_SUFFIX: char = ':';
const MAX_OPERANDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandValue {
    Register(Register),
    Immediate(i64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub value: OperandValue,
    pub span: TextSpan,
}

impl Operand {
    /// Label references count as immediates when picking an overload.
    #[inline]
    pub fn is_register(&self) -> bool {
        matches!(self.value, OperandValue::Register(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `name:`, `name@HHHH:` or `@HHHH:`.
    Label { name: Option<String>, address: Option<u16> },
    Instruction { mnemonic: Mnemonic, operands: Vec<Operand> },
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: TextSpan,
}

// ---------- API ----------
pub fn parse(source: &str) -> Result<Vec<Statement>, AssembleError> {
    let mut statements = Vec::new();
    for (line_no, raw) in source.lines().enumerate() {
        let code = raw.split(COMMENT_CHAR).next().unwrap_or("");
        let mut cursor = Cursor::new(line_no, code);
        cursor.parse_line(&mut statements)?;
    }
    Ok(statements)
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[inline]
fn is_operand_end(c: char) -> bool {
    c.is_whitespace() || c == ','
}

struct Cursor {
    line: usize,
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(line: usize, code: &str) -> Self {
        Self { line, chars: code.chars().collect(), pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    #[inline]
    fn span(&self, start: usize, end: usize) -> TextSpan {
        TextSpan::on_line(self.line, start, end)
    }

    #[inline]
    fn error(&self, start: usize, end: usize, message: &'static str) -> AssembleError {
        AssembleError::new(self.span(start, end), message)
    }

    fn unexpected_char(&self) -> AssembleError {
        self.error(self.pos, self.pos + 1, UNEXPECTED_CHARACTER)
    }

    fn parse_line(&mut self, out: &mut Vec<Statement>) -> Result<(), AssembleError> {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(());
        }

        if self.chars[self.pos..].contains(&LABEL_SUFFIX) {
            out.push(self.parse_label()?);
            self.skip_whitespace();
            if self.at_end() {
                return Ok(());
            }
        }

        let statement = if self.peek() == Some('.') {
            self.parse_directive()?
        } else {
            self.parse_instruction()?
        };
        out.push(statement);
        Ok(())
    }

    fn parse_label(&mut self) -> Result<Statement, AssembleError> {
        let start = self.pos;
        let name_start = self.pos;
        let name = self.take_while(is_ident_char);
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(name_start, self.pos, INVALID_LABEL_NAME));
        }

        let mut address = None;
        if self.peek() == Some('@') {
            self.pos += 1;
            let digits_start = self.pos;
            let digits = self.take_while(|c| c != LABEL_SUFFIX && !c.is_whitespace());
            let parsed = if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                None
            } else {
                u16::from_str_radix(&digits, 16).ok()
            };
            match parsed {
                Some(a) => address = Some(a),
                None => return Err(self.error(digits_start, self.pos, INVALID_LABEL_ADDRESS)),
            }
        } else if name.is_empty() {
            return Err(self.error(start, start, INVALID_LABEL_NAME));
        }

        if self.peek() != Some(LABEL_SUFFIX) {
            return Err(self.unexpected_char());
        }
        self.pos += 1;

        Ok(Statement {
            kind: StatementKind::Label {
                name: if name.is_empty() { None } else { Some(name) },
                address,
            },
            span: self.span(start, self.pos),
        })
    }

    fn parse_directive(&mut self) -> Result<Statement, AssembleError> {
        let start = self.pos;
        self.pos += 1; // '.'
        let word = self.take_while(is_ident_char);
        if !word.eq_ignore_ascii_case("data") {
            return Err(self.error(start, self.pos, UNRECOGNIZED_DIRECTIVE));
        }
        if !self.at_end() && !self.peek().is_some_and(char::is_whitespace) {
            return Err(self.unexpected_char());
        }

        let mut bytes = Vec::new();
        let mut end = self.pos;
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            let token_start = self.pos;
            let token = self.take_while(|c| !c.is_whitespace());
            if token.len() != 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(self.error(token_start, self.pos, INVALID_HEX_BYTE));
            }
            let byte = u8::from_str_radix(&token, 16)
                .map_err(|_| self.error(token_start, self.pos, INVALID_HEX_BYTE))?;
            bytes.push(byte);
            end = self.pos;
        }

        if bytes.is_empty() {
            return Err(self.error(self.pos, self.pos, UNEXPECTED_END_OF_LINE));
        }
        Ok(Statement {
            kind: StatementKind::Data(bytes),
            span: self.span(start, end),
        })
    }

    fn parse_instruction(&mut self) -> Result<Statement, AssembleError> {
        let start = self.pos;
        let word = self.take_while(|c| !is_operand_end(c));
        let mnemonic = Mnemonic::from_name(&word)
            .ok_or_else(|| self.error(start, self.pos, UNRECOGNIZED_MNEMONIC))?;

        let mut operands: Vec<Operand> = Vec::new();
        let mut end = self.pos;
        self.skip_whitespace();
        if !self.at_end() {
            loop {
                let operand = self.parse_operand()?;
                if operands.len() == MAX_OPERANDS {
                    return Err(AssembleError::new(operand.span, TOO_MANY_OPERANDS));
                }
                end = self.pos;
                operands.push(operand);

                self.skip_whitespace();
                match self.peek() {
                    None => break,
                    Some(',') => {
                        self.pos += 1;
                        self.skip_whitespace();
                    }
                    Some(_) => return Err(self.unexpected_char()),
                }
            }
        }

        Ok(Statement {
            kind: StatementKind::Instruction { mnemonic, operands },
            span: self.span(start, end),
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, AssembleError> {
        let start = self.pos;
        let value = match self.peek() {
            Some('$') => {
                self.pos += 1;
                let name = self.take_while(is_ident_char);
                let reg = Register::from_name(&name)
                    .ok_or_else(|| self.error(start, self.pos, INVALID_REGISTER))?;
                OperandValue::Register(reg)
            }
            Some('@') => {
                self.pos += 1;
                let name = self.take_while(is_ident_char);
                if !name.starts_with(is_ident_start) {
                    return Err(self.error(start, self.pos, INVALID_LABEL_NAME));
                }
                OperandValue::Label(name)
            }
            Some('0') if matches!(self.chars.get(self.pos + 1), Some('x' | 'X')) => {
                self.pos += 2;
                let digits = self.take_while(|c| c.is_ascii_alphanumeric());
                let value = u32::from_str_radix(&digits, 16)
                    .map_err(|_| self.error(start, self.pos, INVALID_HEX_VALUE))?;
                OperandValue::Immediate(value as i64)
            }
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
                self.pos += 1;
                self.take_while(|c| c.is_ascii_alphanumeric());
                let text: String = self.chars[start..self.pos].iter().collect();
                let value = text
                    .parse::<i32>()
                    .map_err(|_| self.error(start, self.pos, INVALID_INT_VALUE))?;
                OperandValue::Immediate(value as i64)
            }
            _ => {
                self.take_while(|c| !is_operand_end(c));
                return Err(self.error(start, self.pos, INVALID_OPERAND));
            }
        };
        Ok(Operand { value, span: self.span(start, self.pos) })
    }
}
