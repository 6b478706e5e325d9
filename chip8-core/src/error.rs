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

//! Error types raised by the lexer, parser, and the integer-range cast.
//!
//! The VM never throws; runtime failure is reported through its `Status`
//! field instead (see `crate::vm`).

use std::fmt;

use thiserror::Error;

/// A syntax error raised while lexing or parsing assembly source.
///
/// Carries enough context (line, column, the offending span, and an
/// optional list of valid instruction forms) to render a diagnostic
/// identical in shape to `syntax error at {line}:{column} near '{context}':
/// {message}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {line}:{column} near `{context}`: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn new(
        message: impl Into<String>,
        line: usize,
        column: usize,
        context: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            context: context.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn has_help(&self) -> bool {
        self.help.is_some()
    }
}

/// Raised by [`crate::cast::checked_cast`] when a source value does not
/// fit in the destination integer type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("value `{value}` is out of range for destination type")]
pub struct CastError {
    pub value: String,
}

impl CastError {
    pub fn new(value: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}
