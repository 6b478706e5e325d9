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

//! Loads a ROM from disk into a [`CPU`], dispatching on file extension:
//! `.ch8` is raw bytes, `.c8s` is assembler source.

use std::path::Path;

use thiserror::Error;

use crate::parser;
use crate::vm::{CPU, PROGRAM_MAX_SIZE};

#[derive(Error, Debug)]
pub enum RomError {
    #[error("could not read `{path}`: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("`{path}` has no recognized extension (expected .ch8 or .c8s)")]
    UnknownExtension { path: String },

    #[error("rom is too large: {size} bytes exceeds the {max} byte program area")]
    TooLarge { size: usize, max: usize },

    #[error("source file is not valid UTF-8: {path}")]
    InvalidUtf8 { path: String },

    #[error(transparent)]
    Syntax(#[from] crate::error::SyntaxError),
}

/// Loads `path` into `cpu`'s program area. Does not reset `cpu`;
/// callers construct a fresh [`CPU`] before loading.
pub fn load_rom_from_disk(cpu: &mut CPU, path: impl AsRef<Path>) -> Result<(), RomError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| RomError::Io { path: path.display().to_string(), source })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("ch8") => load_rom_from_memory(cpu, &bytes),
        Some(ext) if ext.eq_ignore_ascii_case("c8s") => {
            let text = String::from_utf8(bytes).map_err(|_| RomError::InvalidUtf8 { path: path.display().to_string() })?;
            let program = parser::assemble(&text)?;
            load_rom_from_memory(cpu, &program)
        }
        _ => Err(RomError::UnknownExtension { path: path.display().to_string() }),
    }
}

/// Loads an already-assembled or raw binary image into `cpu`'s program
/// area.
pub fn load_rom_from_memory(cpu: &mut CPU, program: &[u8]) -> Result<(), RomError> {
    if program.len() > PROGRAM_MAX_SIZE {
        return Err(RomError::TooLarge { size: program.len(), max: PROGRAM_MAX_SIZE });
    }
    cpu.load(program);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_raw_binary_into_program_area() {
        let mut cpu = CPU::new();
        load_rom_from_memory(&mut cpu, &[0x00, 0xE0, 0x00, 0xEE]).unwrap();
        assert_eq!(&cpu.memory[0x200..0x204], &[0x00, 0xE0, 0x00, 0xEE]);
    }

    #[test]
    fn oversize_rom_is_rejected() {
        let mut cpu = CPU::new();
        let program = vec![0u8; PROGRAM_MAX_SIZE + 1];
        assert!(matches!(load_rom_from_memory(&mut cpu, &program), Err(RomError::TooLarge { .. })));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("chip8-core-test-rom.bin");
        std::fs::write(&path, b"\x00\xE0").unwrap();
        let mut cpu = CPU::new();
        let result = load_rom_from_disk(&mut cpu, &path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(RomError::UnknownExtension { .. })));
    }

    #[test]
    fn source_extension_assembles_before_loading() {
        let dir = std::env::temp_dir();
        let path = dir.join("chip8-core-test-rom.c8s");
        std::fs::write(&path, b"cls\nret\n").unwrap();
        let mut cpu = CPU::new();
        load_rom_from_disk(&mut cpu, &path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(&cpu.memory[0x200..0x204], &[0x00, 0xE0, 0x00, 0xEE]);
    }
}
