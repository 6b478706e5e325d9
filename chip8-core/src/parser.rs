/*
Copyright 2020 Anish Jewalikar

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Two-pass assembler: turns a token stream into a resolved, encoded
//! byte stream. Pass one builds an intermediate-representation
//! instruction list and a label table; pass two resolves label
//! references against that table and encodes everything to bytes.

use crate::cast::checked_cast;
use crate::error::SyntaxError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::opcode::{self, OpMeta, OperandKind};

pub const PROGRAM_START: u16 = 0x200;

/// An operand as written in source, before label resolution.
#[derive(Debug, Clone, Copy)]
enum RawOperand<'a> {
    Value(i64),
    Label(&'a str),
}

/// One parsed instruction or raw data directive, still carrying
/// unresolved label references.
#[derive(Debug, Clone)]
pub struct Instruction<'a> {
    meta: Option<&'static OpMeta>,
    operands: Vec<RawOperand<'a>>,
    data: Vec<u8>,
    pub address: u16,
}

impl<'a> Instruction<'a> {
    pub fn is_data(&self) -> bool {
        self.meta.is_none()
    }

    pub fn size(&self) -> u16 {
        if self.is_data() {
            self.data.len() as u16
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Label<'a> {
    name: &'a str,
    address: u16,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    instructions: Vec<Instruction<'a>>,
    labels: Vec<Label<'a>>,
    address: u16,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            instructions: Vec::new(),
            labels: Vec::new(),
            address: PROGRAM_START,
        }
    }

    /// Runs both assembler passes and returns the encoded program.
    pub fn assemble(mut self) -> Result<Vec<u8>, SyntaxError> {
        self.parse_top_level()?;
        self.resolve_labels();
        Ok(self.encode())
    }

    fn parse_top_level(&mut self) -> Result<(), SyntaxError> {
        loop {
            let tok = self.lexer.peek()?;
            match tok.kind {
                TokenKind::Eos => return Ok(()),
                TokenKind::Mnemonic => self.parse_instruction()?,
                TokenKind::Text => self.parse_label_or_data()?,
                _ => {
                    return Err(SyntaxError::new(
                        format!("expected a label, directive, or instruction, found `{}`", tok.text),
                        tok.line,
                        tok.column,
                        tok.text.to_string(),
                    ))
                }
            }
        }
    }

    /// `label` and `data` are both introduced by a bare `text` token, so
    /// the production is disambiguated one token late: a `:` makes it a
    /// label, anything else (provided the text is `data`) starts a data
    /// directive.
    fn parse_label_or_data(&mut self) -> Result<(), SyntaxError> {
        let name_tok = self.lexer.next()?;
        if self.lexer.peek()?.kind == TokenKind::Colon {
            self.lexer.next()?;
            self.labels.push(Label { name: name_tok.text, address: self.address });
            return Ok(());
        }
        if name_tok.text == "data" {
            return self.parse_data();
        }
        Err(SyntaxError::new(
            format!("expected `:` after label `{}`", name_tok.text),
            name_tok.line,
            name_tok.column,
            name_tok.text.to_string(),
        ))
    }

    fn parse_data(&mut self) -> Result<(), SyntaxError> {
        let mut bytes = Vec::new();
        loop {
            let tok = self.lexer.next()?;
            if tok.kind != TokenKind::Number {
                return Err(SyntaxError::new(
                    "expected a numeric byte value in `data` directive",
                    tok.line,
                    tok.column,
                    tok.text.to_string(),
                ));
            }
            let byte: u8 = checked_cast(tok.value)
                .map_err(|_| SyntaxError::new("byte value out of range 0-255", tok.line, tok.column, tok.text.to_string()))?;
            bytes.push(byte);
            if self.lexer.peek()?.kind == TokenKind::Comma {
                self.lexer.next()?;
            } else {
                break;
            }
        }
        self.add_instruction(Instruction { meta: None, operands: Vec::new(), data: bytes, address: 0 });
        Ok(())
    }

    fn parse_instruction(&mut self) -> Result<(), SyntaxError> {
        let mnemonic_tok = self.lexer.next()?;
        // The lexer only classifies a token as `Mnemonic` on an exact,
        // case-sensitive table hit, so its text is already the table's
        // own spelling.
        let mnemonic = mnemonic_tok.text;

        // Try the zero-operand form first: if this mnemonic has one and
        // the next token clearly doesn't start an operand, take it.
        if !starts_operand(self.lexer.peek()?.kind) {
            if let Some(meta) = opcode::find_by_signature(mnemonic, OperandKind::None, OperandKind::None, OperandKind::None) {
                self.add_instruction(Instruction { meta: Some(meta), operands: Vec::new(), data: Vec::new(), address: 0 });
                return Ok(());
            }
        }

        let mut operands = Vec::new();
        let mut tokens = Vec::new();
        loop {
            let tok = self.lexer.next()?;
            tokens.push(tok);
            operands.push(self.raw_operand(tok)?);
            if self.lexer.peek()?.kind == TokenKind::Comma {
                self.lexer.next()?;
            } else {
                break;
            }
        }

        if tokens.len() > 3 {
            let last = tokens.last().unwrap();
            return Err(SyntaxError::new(
                "an instruction may take at most 3 operands",
                last.line,
                last.column,
                last.text.to_string(),
            ));
        }

        let meta = self
            .resolve_signature(mnemonic, &tokens)
            .ok_or_else(|| self.no_overload_error(&mnemonic_tok, mnemonic))?;

        self.add_instruction(Instruction { meta: Some(meta), operands, data: Vec::new(), address: 0 });
        Ok(())
    }

    fn raw_operand(&self, tok: Token<'a>) -> Result<RawOperand<'a>, SyntaxError> {
        match tok.kind {
            TokenKind::Variable => Ok(RawOperand::Value(tok.value)),
            TokenKind::I | TokenKind::Dt | TokenKind::St => Ok(RawOperand::Value(0)),
            TokenKind::Number => Ok(RawOperand::Value(tok.value)),
            TokenKind::Text => Ok(RawOperand::Label(tok.text)),
            _ => Err(SyntaxError::new(
                format!("`{}` cannot be used as an operand", tok.text),
                tok.line,
                tok.column,
                tok.text.to_string(),
            )),
        }
    }

    /// Finds the table row matching `mnemonic` and the parsed operand
    /// tokens. Each token kind maps to exactly one operand kind — a
    /// number is always `k`, a bare identifier is always `addr` — so
    /// there is exactly one signature to look up, not several to try.
    fn resolve_signature(&self, mnemonic: &str, tokens: &[Token<'a>]) -> Option<&'static OpMeta> {
        let mut kinds = [OperandKind::None; 3];
        for (i, tok) in tokens.iter().enumerate().take(3) {
            kinds[i] = match tok.kind {
                TokenKind::Variable => OperandKind::V,
                TokenKind::I => OperandKind::I,
                TokenKind::Dt => OperandKind::Dt,
                TokenKind::St => OperandKind::St,
                TokenKind::Number => OperandKind::K,
                TokenKind::Text => OperandKind::Addr,
                _ => return None,
            };
        }
        opcode::find_by_signature(mnemonic, kinds[0], kinds[1], kinds[2])
    }

    fn no_overload_error(&self, tok: &Token<'a>, mnemonic: &str) -> SyntaxError {
        let rows = opcode::rows_for_mnemonic(mnemonic);
        let help = if rows.is_empty() {
            format!("`{}` is not a known instruction", mnemonic)
        } else {
            let forms: Vec<String> = rows
                .iter()
                .map(|m| {
                    let ops: Vec<&str> = (0..m.parameter_count()).map(|i| m.parameter(i).as_str()).collect();
                    if ops.is_empty() {
                        m.mnemonic.to_string()
                    } else {
                        format!("{} {}", m.mnemonic, ops.join(", "))
                    }
                })
                .collect();
            format!("valid forms are:\n  {}", forms.join("\n  "))
        };
        SyntaxError::new(
            format!("no overload of `{}` matches these operands", mnemonic),
            tok.line,
            tok.column,
            tok.text.to_string(),
        )
        .with_help(help)
    }

    fn add_instruction(&mut self, mut instr: Instruction<'a>) {
        instr.address = self.address;
        self.address += instr.size();
        self.instructions.push(instr);
    }

    /// Undefined labels resolve to address 0 rather than raising an
    /// error, matching the reference assembler's default behavior.
    fn resolve_labels(&mut self) {
        for instr in &mut self.instructions {
            for op in &mut instr.operands {
                if let RawOperand::Label(name) = *op {
                    let resolved = self
                        .labels
                        .iter()
                        .find(|l| l.name == name)
                        .map(|l| l.address as i64)
                        .unwrap_or(0);
                    *op = RawOperand::Value(resolved);
                }
            }
        }
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for instr in &self.instructions {
            match instr.meta {
                None => out.extend_from_slice(&instr.data),
                Some(meta) => {
                    let mut values = [0i64; 3];
                    for (i, op) in instr.operands.iter().enumerate().take(3) {
                        values[i] = match op {
                            RawOperand::Value(v) => *v,
                            RawOperand::Label(_) => 0,
                        };
                    }
                    let word = opcode::generate_op(meta, values[0], values[1], values[2]);
                    out.extend_from_slice(&word.to_be_bytes());
                }
            }
        }
        out
    }
}

fn starts_operand(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Variable | TokenKind::I | TokenKind::Dt | TokenKind::St | TokenKind::Number | TokenKind::Text)
}

/// Assembles `source` into a flat program image, ready to load at
/// [`PROGRAM_START`].
pub fn assemble(source: &str) -> Result<Vec<u8>, SyntaxError> {
    Parser::new(source).assemble()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_simple_program() {
        let program = assemble("ld v0, 0x1\nadd v0, v1\ncls\nret\n").unwrap();
        assert_eq!(program, vec![0x60, 0x01, 0x80, 0x14, 0x00, 0xE0, 0x00, 0xEE]);
    }

    #[test]
    fn resolves_forward_label_references() {
        let program = assemble("jmp loop\nloop:\ncls\n").unwrap();
        // jmp to loop's address: PROGRAM_START + 2
        assert_eq!(&program[0..2], &[0x12, 0x02]);
        assert_eq!(&program[2..4], &[0x00, 0xE0]);
    }

    #[test]
    fn undefined_label_resolves_to_zero() {
        let program = assemble("jmp nowhere\n").unwrap();
        assert_eq!(&program[0..2], &[0x10, 0x00]);
    }

    #[test]
    fn data_directive_emits_raw_bytes() {
        let program = assemble("data 0x01, 2, 0x03\n").unwrap();
        assert_eq!(program, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn end_to_end_assembler_example() {
        let program = assemble("hires\nld v0, 32\nloop: jmp loop\n").unwrap();
        assert_eq!(program, vec![0x00, 0xFF, 0x60, 0x20, 0x12, 0x04]);
    }

    #[test]
    fn ld_i_accepts_both_a_numeric_literal_and_an_address() {
        let program = assemble("ld i, 0x300\n").unwrap();
        assert_eq!(program, vec![0xA3, 0x00]);
    }

    #[test]
    fn numeric_literal_never_resolves_as_an_address_operand() {
        // `jmp` only has an `addr` row; a bare number must not be
        // reinterpreted as one just because no `k` row exists.
        assert!(assemble("jmp 0x300\n").is_err());
    }

    #[test]
    fn label_reference_never_resolves_as_a_k_operand() {
        // `skeq v, k` must not accept a label in place of the immediate.
        assert!(assemble("skeq v0, somewhere\nsomewhere:\ncls\n").is_err());
    }

    #[test]
    fn more_than_three_operands_is_an_error() {
        assert!(assemble("disp v0, v1, 1, v2\n").is_err());
    }

    #[test]
    fn unknown_mnemonic_overload_reports_help() {
        let err = assemble("skeq v0, dt\n").unwrap_err();
        assert!(err.has_help());
    }
}
