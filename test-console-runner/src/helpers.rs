// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for test-console-runner.

use camino::Utf8Path;
use itertools::Itertools;

/// Trims leading and trailing whitespace and collapses internal runs of whitespace into a single
/// space.
pub(crate) fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Returns the file name of `path` for use in user-facing messages, falling back to the full path
/// if there's no file name (e.g. `..`).
pub(crate) fn display_file_name(path: &Utf8Path) -> String {
    path.file_name().unwrap_or(path.as_str()).to_owned()
}
