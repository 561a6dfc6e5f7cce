// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that drive the console binary through a pipe.
//!
//! Piped input isn't a terminal, so the line editor doesn't print prompts; only command output
//! shows up on stdout.
//!
//! The `fake-boost-test` helper stands in for a real Boost.Test binary. Each test copies it into a
//! temporary directory under the name it needs. No `logs` directory is created, so `/lfl` always
//! reports that there are no full logs.

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use pretty_assertions::assert_eq;
use std::fs;

struct TempBinaries {
    dir: Utf8TempDir,
}

impl TempBinaries {
    fn new() -> Self {
        let dir = camino_tempfile::Builder::new()
            .prefix("test-console-")
            .tempdir()
            .expect("created temp dir");
        Self { dir }
    }

    /// Copies the fake binary into the temp dir under `name`.
    fn add(&self, name: &str) -> Utf8PathBuf {
        let dest = self
            .dir
            .path()
            .join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
        fs::copy(env!("CARGO_BIN_EXE_fake-boost-test"), &dest).expect("copied fake binary");
        dest
    }

    fn history_file(&self) -> Utf8PathBuf {
        self.dir.path().join("history.txt")
    }
}

struct ConsoleOutput {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_console(args: &[&str], history_file: &Utf8Path, input: &str) -> ConsoleOutput {
    let mut all_args = vec![
        "--user-config-file",
        "none",
        "--color",
        "never",
        "--history-file",
        history_file.as_str(),
    ];
    all_args.extend_from_slice(args);

    let output = duct::cmd(env!("CARGO_BIN_EXE_test-console-dup"), all_args)
        .env_remove("TEST_CONSOLE_LOG")
        .env_remove("TEST_CONSOLE_USER_CONFIG_FILE")
        .env_remove("TEST_CONSOLE_HISTORY_FILE")
        .stdin_bytes(input)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .expect("ran test-console");

    ConsoleOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8(output.stdout).expect("stdout is UTF-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr is UTF-8"),
    }
}

#[test]
fn run_labels_and_tests() {
    let binaries = TempBinaries::new();
    let binary = binaries.add("unit_tests");
    let history_file = binaries.history_file();

    let output = run_console(
        &[binary.as_str()],
        &history_file,
        "/list-labels\n@smoke\nmath_suite/addition\nmath_suite/nope\n/quit\n",
    );
    assert_eq!(output.exit_code, Some(0), "stderr: {}", output.stderr);

    assert!(
        output.stdout.contains("@smoke\n@long running\n"),
        "labels listed: {}",
        output.stdout
    );
    assert!(output.stdout.contains("Running @smoke\n"));
    assert!(output.stdout.contains("Running math_suite/addition\n"));
    assert!(
        output
            .stdout
            .contains("Unrecognized input: math_suite/nope\n")
    );
    assert!(
        !output.stdout.contains("unit_tests > "),
        "no prompt without a terminal: {}",
        output.stdout
    );

    let history = fs::read_to_string(&history_file).expect("history file written");
    for line in ["/list-labels", "@smoke", "math_suite/addition", "/quit"] {
        assert!(history.contains(line), "history contains {line}: {history}");
    }
}

#[test]
fn failing_test_keeps_going() {
    let binaries = TempBinaries::new();
    let binary = binaries.add("unit_tests");

    let output = run_console(
        &[binary.as_str()],
        &binaries.history_file(),
        "math_suite/failing_case\n/list-tests\n",
    );
    assert_eq!(output.exit_code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Running math_suite/failing_case\n"));
    assert!(
        output
            .stdout
            .contains("math_suite*\n    addition*\n    division*: divides numbers\n"),
        "tree listed without carriage returns: {:?}",
        output.stdout
    );
    assert!(
        output.stderr.contains("info: test run exited with code 1"),
        "stderr: {}",
        output.stderr
    );
}

#[test]
fn load_at_prompt() {
    let binaries = TempBinaries::new();
    let good = binaries.add("unit_tests");
    let broken = binaries.add("broken_tests");

    let input = format!("@smoke\n/load {broken}\n/load {good}\n@smoke\n/lfl\n/q\n");
    let output = run_console(&[], &binaries.history_file(), &input);
    assert_eq!(output.exit_code, Some(0), "stderr: {}", output.stderr);

    let expected_lines = [
        "No test binary loaded!",
        "Failed to list bin content: 'broken_tests'. Not a valid boost test binary?",
        "Running @smoke",
    ];
    let mut rest = output.stdout.as_str();
    for expected in expected_lines {
        let index = rest
            .find(expected)
            .unwrap_or_else(|| panic!("`{expected}` not found in order: {}", output.stdout));
        rest = &rest[index + expected.len()..];
    }
    assert!(rest.contains("No full logs found in "), "stdout: {rest}");
}

#[test]
fn unknown_command() {
    let binaries = TempBinaries::new();
    let output = run_console(&[], &binaries.history_file(), "/frobnicate\n/help\n");
    assert_eq!(output.exit_code, Some(0));
    assert!(output.stdout.contains("Unknown command\n"));
    assert!(output.stdout.contains("/quit [/q] - Exit the application\n"));
}

#[test]
fn too_many_arguments() {
    let binaries = TempBinaries::new();
    let output = run_console(&["a_tests", "b_tests"], &binaries.history_file(), "");
    assert_eq!(output.exit_code, Some(2));
    assert!(output.stderr.contains("Usage"), "stderr: {}", output.stderr);
}

#[test]
fn missing_user_config() {
    let binaries = TempBinaries::new();
    let history_file = binaries.history_file();
    let config_path = binaries.dir.path().join("missing.toml");

    let output = duct::cmd!(
        env!("CARGO_BIN_EXE_test-console-dup"),
        "--user-config-file",
        config_path.as_str(),
        "--history-file",
        history_file.as_str(),
        "--color",
        "never",
    )
    .env_remove("TEST_CONSOLE_LOG")
    .stdin_bytes("/quit\n")
    .stdout_capture()
    .stderr_capture()
    .unchecked()
    .run()
    .expect("ran test-console");

    assert_eq!(output.status.code(), Some(97));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: "), "stderr: {stderr}");
    assert!(stderr.contains("missing.toml"), "stderr: {stderr}");
}
