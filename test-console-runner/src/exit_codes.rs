// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Documented exit codes.

/// Documented exit codes for `test-console`.
///
/// Problems at the prompt (unknown commands, failed loads, failing tests) never end the session,
/// so these only cover errors that happen before or outside the prompt.
///
/// Unknown/unexpected failures will always result in exit code 1. Command-line usage errors exit
/// with code 2.
pub enum TestConsoleExitCode {}

impl TestConsoleExitCode {
    /// The session ended normally, through `/quit` or end of input.
    pub const OK: i32 = 0;

    /// The user config file could not be found, read or parsed.
    pub const USER_CONFIG_ERROR: i32 = 97;

    /// The interactive prompt could not be started or failed while reading input.
    pub const PROMPT_ERROR: i32 = 98;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
