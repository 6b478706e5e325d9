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

//! Tokenizer for assembly source. Tokens borrow their text from the
//! source buffer, so a [`Lexer`] can't outlive the `&str` it was built
//! from.

use crate::error::SyntaxError;
use crate::opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Mnemonic,
    Number,
    Colon,
    Comma,
    Eos,
    Variable,
    I,
    Dt,
    St,
}

#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Populated for `Number` (the literal value) and `Variable` (the
    /// register index 0..=15).
    pub value: i64,
    pub line: usize,
    pub column: usize,
}

impl<'a> Token<'a> {
    pub fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
    lookahead: Option<Token<'a>>,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            lookahead: None,
        }
    }

    /// Advances past the current token and returns it.
    pub fn next(&mut self) -> Result<Token<'a>, SyntaxError> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(tok);
        }
        self.scan()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, SyntaxError> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scan()?);
        }
        Ok(self.lookahead.unwrap())
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek_byte()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b';') => {
                    while let Some(c) = self.peek_byte() {
                        if c == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn context(&self, start: usize) -> &'a str {
        let end = self.pos.min(self.source.len());
        let start = start.min(end);
        &self.source[start..end]
    }

    fn scan(&mut self) -> Result<Token<'a>, SyntaxError> {
        self.skip_trivia();
        let (line, column) = (self.line, self.column);
        let start = self.pos;

        let c = match self.peek_byte() {
            None => {
                return Ok(Token {
                    kind: TokenKind::Eos,
                    text: "",
                    value: 0,
                    line,
                    column,
                })
            }
            Some(c) => c,
        };

        if c == b':' {
            self.advance();
            return Ok(Token { kind: TokenKind::Colon, text: self.context(start), value: 0, line, column });
        }
        if c == b',' {
            self.advance();
            return Ok(Token { kind: TokenKind::Comma, text: self.context(start), value: 0, line, column });
        }
        if c.is_ascii_digit() {
            return self.read_number(start, line, column);
        }
        if is_ident_start(c) {
            return self.read_name(start, line, column);
        }

        Err(SyntaxError::new(
            format!("unexpected character `{}`", c as char),
            line,
            column,
            (c as char).to_string(),
        ))
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Result<Token<'a>, SyntaxError> {
        let radix;
        if self.peek_byte() == Some(b'0') {
            let save = self.pos;
            self.advance();
            match self.peek_byte() {
                Some(b'x') | Some(b'X') => {
                    self.advance();
                    radix = 16;
                }
                Some(b'b') | Some(b'B') => {
                    self.advance();
                    radix = 2;
                }
                _ => {
                    self.pos = save;
                    self.column -= 1;
                    radix = 10;
                }
            }
        } else {
            radix = 10;
        }

        let digits_start = self.pos;
        while let Some(c) = self.peek_byte() {
            if (c as char).is_digit(radix) {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.context(start);
        let digits = &self.source[digits_start..self.pos];
        if digits.is_empty() {
            return Err(SyntaxError::new("malformed numeric literal", line, column, text.to_string()));
        }
        let value = i64::from_str_radix(digits, radix)
            .map_err(|_| SyntaxError::new("malformed numeric literal", line, column, text.to_string()))?;
        Ok(Token { kind: TokenKind::Number, text, value, line, column })
    }

    fn read_name(&mut self, start: usize, line: usize, column: usize) -> Result<Token<'a>, SyntaxError> {
        while let Some(c) = self.peek_byte() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let text = self.context(start);

        if text == "i" {
            return Ok(Token { kind: TokenKind::I, text, value: 0, line, column });
        }
        if text == "dt" {
            return Ok(Token { kind: TokenKind::Dt, text, value: 0, line, column });
        }
        if text == "st" {
            return Ok(Token { kind: TokenKind::St, text, value: 0, line, column });
        }
        if let Some(reg) = parse_register(text) {
            return Ok(Token { kind: TokenKind::Variable, text, value: reg as i64, line, column });
        }
        if opcode::is_mnemonic(text) {
            return Ok(Token { kind: TokenKind::Mnemonic, text, value: 0, line, column });
        }
        Ok(Token { kind: TokenKind::Text, text, value: 0, line, column })
    }
}

/// Parses `v0`..`vF`, the only variable form this assembler accepts.
/// The `v` prefix is case-sensitive, matching every other reserved word.
fn parse_register(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 || bytes[0] != b'v' {
        return None;
    }
    (bytes[1] as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lex = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lex.next().unwrap();
            if tok.kind == TokenKind::Eos {
                out.push(tok.kind);
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn classifies_reserved_words_before_mnemonics() {
        let mut lex = Lexer::new("i dt st v3 vA jmp label");
        assert_eq!(lex.next().unwrap().kind, TokenKind::I);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Dt);
        assert_eq!(lex.next().unwrap().kind, TokenKind::St);
        let v3 = lex.next().unwrap();
        assert_eq!(v3.kind, TokenKind::Variable);
        assert_eq!(v3.value, 3);
        let va = lex.next().unwrap();
        assert_eq!(va.kind, TokenKind::Variable);
        assert_eq!(va.value, 10);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Mnemonic);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Text);
    }

    #[test]
    fn reserved_words_and_mnemonics_are_case_sensitive() {
        let mut lex = Lexer::new("I DT ST JMP");
        assert_eq!(lex.next().unwrap().kind, TokenKind::Text);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Text);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Text);
        assert_eq!(lex.next().unwrap().kind, TokenKind::Text);
    }

    #[test]
    fn reads_numeric_literals_in_every_base() {
        let mut lex = Lexer::new("0x1F 0b101 42");
        assert_eq!(lex.next().unwrap().value, 0x1F);
        assert_eq!(lex.next().unwrap().value, 0b101);
        assert_eq!(lex.next().unwrap().value, 42);
    }

    #[test]
    fn skips_comments_to_end_of_line() {
        assert_eq!(kinds("jmp ; a comment\nloop"), vec![TokenKind::Mnemonic, TokenKind::Text, TokenKind::Eos]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lex = Lexer::new("jmp start");
        let peeked = lex.peek().unwrap();
        assert_eq!(peeked.kind, TokenKind::Mnemonic);
        let next = lex.next().unwrap();
        assert_eq!(next.text, peeked.text);
    }

    #[test]
    fn unexpected_character_is_a_syntax_error() {
        let mut lex = Lexer::new("@");
        assert!(lex.next().is_err());
    }

    #[test]
    fn colon_and_comma_are_punctuation() {
        assert_eq!(kinds("label: ld v0, 1"), vec![
            TokenKind::Text, TokenKind::Colon, TokenKind::Mnemonic,
            TokenKind::Variable, TokenKind::Comma, TokenKind::Number, TokenKind::Eos,
        ]);
    }
}
