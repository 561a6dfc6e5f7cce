// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running child processes: test binaries and the log viewer.
//!
//! Every invocation is synchronous: the caller blocks until the child exits. Callers go through
//! the [`ProcessRunner`] trait so that tests can substitute a recording fake, and the real
//! implementation ([`DuctRunner`]) hands out a [`RunningProcess`] that can be killed, which leaves
//! room for timeouts later.

mod imp;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use imp::*;

use crate::errors::ProcessError;
use camino::{Utf8Path, Utf8PathBuf};
use std::{fmt, process::ExitStatus};

/// What to do with the child's stdout and stderr.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaptureMode {
    /// Merge stdout and stderr into a single captured stream.
    Capture,

    /// Let the child write directly to the console.
    Inherit,
}

/// A single command to run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    program: Utf8PathBuf,
    args: Vec<String>,
    capture: CaptureMode,
}

impl Invocation {
    /// Creates a new invocation of `program` with no arguments, inheriting the console.
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture: CaptureMode::Inherit,
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the capture mode.
    pub fn capture(mut self, capture: CaptureMode) -> Self {
        self.capture = capture;
        self
    }

    /// Returns the program to run.
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Returns the capture mode.
    pub fn capture_mode(&self) -> CaptureMode {
        self.capture
    }

    /// Returns the command line with shell quoting, for messages.
    pub fn command_line(&self) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

/// How a child process finished.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProcessExit {
    /// The process exited with this code.
    Exited(i32),

    /// The process was terminated by this signal (Unix only).
    Signaled(i32),

    /// The platform didn't report how the process exited.
    Unknown,
}

impl ProcessExit {
    /// Converts a standard library exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Unknown
    }

    /// Returns true if the process exited with code 0.
    pub fn success(self) -> bool {
        self == Self::Exited(0)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {code}"),
            Self::Signaled(signal) => write!(f, "aborted with signal {signal}"),
            Self::Unknown => write!(f, "exited with an unknown error"),
        }
    }
}

/// The result of running a child process to completion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessOutcome {
    /// How the process finished.
    pub exit: ProcessExit,

    /// Lines of merged stdout and stderr, if the invocation captured output. Empty otherwise.
    ///
    /// Lines are split on `\n`; any `\r` is left for the caller to deal with.
    pub lines: Vec<String>,
}

/// Runs child processes.
pub trait ProcessRunner {
    /// Runs the invocation and blocks until the child exits.
    ///
    /// A non-zero exit is reported through [`ProcessOutcome::exit`]. An error is only returned if
    /// the child couldn't be started or waited on.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome, ProcessError>;
}
