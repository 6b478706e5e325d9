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

//! A (super) Chip-8 two-pass assembler and interpreter backend.
//!
//! This crate owns the binary semantics shared by an assembler CLI and
//! an interpreter front-end: the opcode metadata table, the lexer and
//! parser that turn assembly source into bytes, the virtual machine
//! that runs those bytes, and the ROM loader that ties a file on disk
//! to either path. Windowing, audio, and configuration are left to
//! front-end collaborators.

pub mod cast;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod input;
pub mod lexer;
pub mod opcode;
pub mod parser;
pub mod rom;
pub mod vm;

pub use error::SyntaxError;
pub use parser::assemble;
pub use vm::CPU;
