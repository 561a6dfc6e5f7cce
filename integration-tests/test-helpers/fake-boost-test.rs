// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A stand-in for a Boost.Test binary, used by integration tests.
//!
//! It understands `--list_content`, `--list_labels` and `--run_test=<name>`. Copies whose file
//! name contains `broken` fail to list their content, like a binary that isn't built with
//! Boost.Test.

use std::{env, io::Write, process::ExitCode};

// Boost writes the tree to stderr. CRLF line endings match a Windows build.
const CONTENT: &str = "math_suite*\r\n    addition*\r\n    division*: divides numbers\r\n    failing_case*\r\nstandalone_case*\r\n";

const LABELS: &str = "  smoke \n\nlong \t running\n";

fn main() -> ExitCode {
    let broken = env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .is_some_and(|stem| stem.contains("broken"));

    let Some(arg) = env::args().nth(1) else {
        eprintln!("usage: fake-boost-test --list_content | --list_labels | --run_test=<name>");
        return ExitCode::from(200);
    };

    match arg.as_str() {
        "--list_content" if broken => {
            eprintln!("Test setup error: no test cases matching filter or all test cases were disabled");
            ExitCode::from(201)
        }
        "--list_content" => {
            let _ = std::io::stderr().write_all(CONTENT.as_bytes());
            ExitCode::SUCCESS
        }
        "--list_labels" => {
            print!("{LABELS}");
            ExitCode::SUCCESS
        }
        other => match other.strip_prefix("--run_test=") {
            Some(name) => {
                println!("Running {name}");
                if name.contains("fail") {
                    println!("*** 1 failure is detected in the test module");
                    ExitCode::FAILURE
                } else {
                    println!("*** No errors detected");
                    ExitCode::SUCCESS
                }
            }
            None => {
                eprintln!("unknown argument: {other}");
                ExitCode::from(200)
            }
        },
    }
}
