// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-specific configuration for test-console.
//!
//! ## Config file location
//!
//! The user config file is read from `$XDG_CONFIG_HOME/test-console/config.toml`, or
//! `~/.config/test-console/config.toml` if `XDG_CONFIG_HOME` isn't set. A missing file is fine;
//! every setting has a built-in default.
//!
//! ## Settings
//!
//! ```toml
//! # Where prompt history is kept. Relative paths are relative to this file.
//! history-file = "history.txt"
//! # How many lines of history to keep.
//! max-history-size = 1000
//! # The program used to show logs. The log path is appended.
//! log-viewer = "less -R"
//! # File name prefix that distinguishes full logs from normal ones.
//! full-log-prefix = "ful"
//! # The prompt shown while no test binary is loaded.
//! default-prompt = "test console > "
//! ```
//!
//! ## Configuration hierarchy
//!
//! Settings are resolved in the following order (highest priority first):
//!
//! 1. CLI arguments and environment variables (e.g. `--history-file`)
//! 2. The user config file
//! 3. Built-in defaults

mod discovery;
mod imp;

pub use discovery::*;
pub use imp::*;
