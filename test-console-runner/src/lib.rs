// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `test-console`, an interactive front-end for Boost.Test binaries.
//!
//! The basic flow is:
//!
//! 1. A [`catalog::Catalog`] loads a test binary by running it with `--list_content` and
//!    `--list_labels` through a [`process::ProcessRunner`].
//! 2. The [`repl::ReplSession`] reads lines from the prompt and routes them either to the
//!    [`commands::CommandRegistry`] (lines starting with `/`) or to a test run (labels starting
//!    with `@`, or full test paths).
//! 3. Tab completion is provided by [`completion`], which fuzzy-matches labels and commands.

pub mod catalog;
pub mod commands;
pub mod completion;
pub mod errors;
pub mod exit_codes;
mod helpers;
pub mod logs;
pub mod process;
pub mod repl;
pub mod user_config;
pub mod write_str;
