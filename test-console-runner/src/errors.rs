// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by test-console.

use crate::process::ProcessExit;
use camino::{FromPathBufError, Utf8PathBuf};
use std::{error::Error, fmt, io};
use thiserror::Error;

/// An error that occurred while spawning or waiting on a child process.
///
/// A child that runs and exits with a non-zero status is *not* an error: that's reported as a
/// [`ProcessExit`] instead.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The child process could not be started.
    #[error("failed to execute `{command}`")]
    Spawn {
        /// The command line, joined with shell quoting.
        command: String,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Waiting on the child process failed.
    #[error("failed to wait on `{command}`")]
    Wait {
        /// The command line, joined with shell quoting.
        command: String,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Killing the child process failed.
    #[error("failed to kill `{command}`")]
    Kill {
        /// The command line, joined with shell quoting.
        command: String,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurred while loading a test binary into the catalog.
///
/// The `Display` impls here are the messages shown at the prompt.
#[derive(Debug, Error)]
pub enum LoadBinaryError {
    /// No path was provided.
    #[error("Usage: /load <path-to-test-binary>")]
    NoPath,

    /// The path does not exist.
    #[error("File not found: {file_name}")]
    NotFound {
        /// The path that was requested.
        path: Utf8PathBuf,

        /// The file name component of the path.
        file_name: String,
    },

    /// The path exists but is not a regular file.
    #[error("File: '{file_name}' is not a valid file type")]
    NotAFile {
        /// The path that was requested.
        path: Utf8PathBuf,

        /// The file name component of the path.
        file_name: String,
    },

    /// Reading metadata for the path failed for a reason other than it not existing.
    #[error("failed to read metadata for `{path}`")]
    Metadata {
        /// The path that was requested.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Running the binary with `--list_content` or `--list_labels` failed to start.
    #[error("failed to query test binary `{file_name}`")]
    Exec {
        /// The file name component of the path.
        file_name: String,

        /// The underlying error.
        #[source]
        error: ProcessError,
    },

    /// `--list_content` exited with a non-zero status.
    #[error("Failed to list bin content: '{file_name}'. Not a valid boost test binary?")]
    ListContentFailed {
        /// The file name component of the path.
        file_name: String,

        /// How the listing process exited.
        exit: ProcessExit,
    },
}

/// An error that occurred while looking for the newest full log.
#[derive(Debug, Error)]
pub enum ShowLogError {
    /// No test binary is loaded, so there's no logs directory to look in.
    #[error("No test binary loaded!")]
    NoBinaryLoaded,

    /// The logs directory doesn't exist or has no matching files.
    #[error("No full logs found in {logs_dir}")]
    NoLogsFound {
        /// The directory that was scanned.
        logs_dir: Utf8PathBuf,
    },

    /// Reading the logs directory failed.
    #[error("failed to read logs directory `{logs_dir}`")]
    ReadDir {
        /// The directory that was scanned.
        logs_dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Launching the log viewer failed.
    #[error("failed to open log `{log}` in the viewer")]
    Viewer {
        /// The log that was supposed to be opened.
        log: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: ProcessError,
    },
}

/// An error that occurred while reading the user config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UserConfigError {
    /// The user config file was explicitly requested but does not exist.
    #[error("user config file not found at `{path}`")]
    FileNotFound {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// The user config file could not be read.
    #[error("failed to read user config at `{path}`")]
    Read {
        /// The path to the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The user config file is not valid TOML, or doesn't match the expected schema.
    #[error("failed to parse user config at `{path}`")]
    Parse {
        /// The path to the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },

    /// The `log-viewer` setting could not be split into a command line.
    #[error("in user config at `{path}`, invalid log-viewer `{value}`: {reason}")]
    InvalidLogViewer {
        /// The path to the file.
        path: Utf8PathBuf,

        /// The value that was provided.
        value: String,

        /// Why the value is invalid.
        reason: &'static str,
    },

    /// The `full-log-prefix` setting is empty.
    #[error("in user config at `{path}`, full-log-prefix must not be empty")]
    EmptyFullLogPrefix {
        /// The path to the file.
        path: Utf8PathBuf,
    },

    /// A directory in the user's home directory has a path that isn't valid UTF-8.
    #[error("user directory path is not valid UTF-8")]
    NonUtf8Path {
        /// The underlying error.
        #[source]
        error: FromPathBufError,
    },
}

/// An error that occurred while reading or writing the history file.
///
/// These are reported as warnings: the prompt works without history.
#[derive(Debug, Error)]
pub enum HistoryFileError {
    /// Loading history at startup failed.
    #[error("failed to load history from `{path}`")]
    Load {
        /// The history file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: rustyline::error::ReadlineError,
    },

    /// Creating the directory for the history file failed.
    #[error("failed to create directory `{dir}` for the history file")]
    CreateDir {
        /// The directory.
        dir: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Saving history failed.
    #[error("failed to save history to `{path}`")]
    Save {
        /// The history file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: rustyline::error::ReadlineError,
    },
}

/// An error that occurred while running the interactive prompt.
#[derive(Debug, Error)]
pub enum ReplError {
    /// The line editor could not be initialized or failed while reading.
    #[error("error reading from the prompt")]
    Readline {
        /// The underlying error.
        #[source]
        error: rustyline::error::ReadlineError,
    },

    /// Writing to the console failed.
    #[error("error writing to the console")]
    Write {
        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// Displays an error followed by its chain of sources, one per line.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut next_error = self.error.source();
        while let Some(error) = next_error {
            write!(f, "\n  caused by: {error}")?;
            next_error = error.source();
        }

        Ok(())
    }
}
