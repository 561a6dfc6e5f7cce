// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An interactive console for running Boost.Test binaries.
//!
//! This crate holds the command-line interface. The prompt itself, along with loading test
//! binaries and running tests, lives in `test-console-runner`.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{Color, LOG_ENV, OutputContext, StderrStyles};
