// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CaptureMode, Invocation, ProcessExit, ProcessOutcome, ProcessRunner};
use crate::errors::ProcessError;
use duct::{Expression, Handle, cmd};
use tracing::debug;

/// The real process runner, built on top of `duct`.
#[derive(Clone, Debug, Default)]
pub struct DuctRunner {
    _private: (),
}

impl DuctRunner {
    /// Creates a new `DuctRunner`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the invocation without waiting for it to finish.
    pub fn start(&self, invocation: &Invocation) -> Result<RunningProcess, ProcessError> {
        let command = invocation.command_line();
        debug!("starting `{command}` ({:?})", invocation.capture_mode());

        match Self::expression(invocation).start() {
            Ok(handle) => Ok(RunningProcess {
                handle,
                command,
                capture: invocation.capture_mode(),
            }),
            Err(error) => Err(ProcessError::Spawn { command, error }),
        }
    }

    fn expression(invocation: &Invocation) -> Expression {
        // The program is passed through as a string so that bare names like `less` are looked up
        // in PATH. Callers that mean a file pass an absolute path.
        let expr = cmd(invocation.program().as_str(), invocation.arguments()).unchecked();
        match invocation.capture_mode() {
            CaptureMode::Capture => expr.stderr_to_stdout().stdout_capture(),
            CaptureMode::Inherit => expr,
        }
    }
}

impl ProcessRunner for DuctRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome, ProcessError> {
        self.start(invocation)?.wait()
    }
}

/// A child process that has been started but not yet waited on.
#[derive(Debug)]
pub struct RunningProcess {
    handle: Handle,
    command: String,
    capture: CaptureMode,
}

impl RunningProcess {
    /// Returns the command line this process was started with.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the process IDs of the child.
    pub fn pids(&self) -> Vec<u32> {
        self.handle.pids()
    }

    /// Blocks until the child exits, collecting captured output if any.
    pub fn wait(self) -> Result<ProcessOutcome, ProcessError> {
        let output = match self.handle.into_output() {
            Ok(output) => output,
            Err(error) => {
                return Err(ProcessError::Wait {
                    command: self.command,
                    error,
                });
            }
        };

        let exit = ProcessExit::from_status(output.status);
        debug!("`{}` {exit}", self.command);

        let lines = match self.capture {
            CaptureMode::Capture => String::from_utf8_lossy(&output.stdout)
                .split_terminator('\n')
                .map(str::to_owned)
                .collect(),
            CaptureMode::Inherit => Vec::new(),
        };

        Ok(ProcessOutcome { exit, lines })
    }

    /// Kills the child. A subsequent [`wait`](Self::wait) reports how it was terminated.
    pub fn kill(&self) -> Result<(), ProcessError> {
        self.handle.kill().map_err(|error| ProcessError::Kill {
            command: self.command.clone(),
            error,
        })
    }
}
