// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The same program as test-console's main.rs, built inside this package so that integration
//! tests can find it through `CARGO_BIN_EXE_test-console-dup`.

use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = enable_ansi_support::enable_ansi_support();

    test_console::main_impl()
}
