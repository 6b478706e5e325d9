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

use std::process::ExitCode;

use clap::{App, Arg};

fn main() -> ExitCode {
    let matches = App::new("assemble")
        .version("1.0.2")
        .about("A two-pass assembler for (super) Chip-8 source.")
        .arg(
            Arg::with_name("input")
                .help("Assembly source file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Path to write the assembled ROM to")
                .required(true)
                .index(2),
        )
        .get_matches();

    let input_path = matches.value_of("input").unwrap();
    let output_path = matches.value_of("output").unwrap();

    let source = match std::fs::read_to_string(input_path) {
        Ok(source) => source,
        Err(error) => {
            println!("could not read `{}`: {}", input_path, error);
            return ExitCode::FAILURE;
        }
    };

    let program = match chip8_core::assemble(&source) {
        Ok(program) => program,
        Err(error) => {
            print_syntax_error(&error);
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = std::fs::write(output_path, program) {
        println!("could not write `{}`: {}", output_path, error);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn print_syntax_error(error: &chip8_core::SyntaxError) {
    println!(
        "syntax error at {}:{} near `{}': {}",
        error.line, error.column, error.context, error.message
    );
    if let Some(help) = &error.help {
        println!();
        println!("{}", help);
    }
}
