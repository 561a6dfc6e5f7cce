// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CaptureMode, Invocation, ProcessExit, ProcessOutcome, ProcessRunner};
use crate::errors::ProcessError;
use std::{cell::RefCell, collections::BTreeMap, io, rc::Rc};

/// A scripted reply to an invocation, keyed by the invocation's first argument.
#[derive(Clone, Debug)]
pub(crate) enum FakeResponse {
    Exit { code: i32, output: String },
    SpawnError(io::ErrorKind),
}

/// A process runner that records invocations instead of spawning anything.
///
/// Clones share state, so a test can hand one clone to the code under test and inspect the other.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeRunner {
    inner: Rc<RefCell<FakeRunnerInner>>,
}

#[derive(Debug, Default)]
struct FakeRunnerInner {
    responses: BTreeMap<String, FakeResponse>,
    invocations: Vec<Invocation>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A runner that answers `--list_content` and `--list_labels` successfully.
    pub(crate) fn with_listing(content: &str, labels: &str) -> Self {
        let runner = Self::new();
        runner.respond("--list_content", 0, content);
        runner.respond("--list_labels", 0, labels);
        runner
    }

    pub(crate) fn respond(&self, first_arg: &str, code: i32, output: &str) {
        self.set_response(
            first_arg,
            FakeResponse::Exit {
                code,
                output: output.to_owned(),
            },
        );
    }

    pub(crate) fn set_response(&self, first_arg: &str, response: FakeResponse) {
        self.inner
            .borrow_mut()
            .responses
            .insert(first_arg.to_owned(), response);
    }

    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        self.inner.borrow().invocations.clone()
    }

    /// Returns the arguments of every invocation, in order.
    pub(crate) fn invoked_args(&self) -> Vec<Vec<String>> {
        self.inner
            .borrow()
            .invocations
            .iter()
            .map(|invocation| invocation.arguments().to_vec())
            .collect()
    }

    pub(crate) fn clear_invocations(&self) {
        self.inner.borrow_mut().invocations.clear();
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome, ProcessError> {
        let mut inner = self.inner.borrow_mut();
        inner.invocations.push(invocation.clone());

        let key = invocation
            .arguments()
            .first()
            .map(String::as_str)
            .unwrap_or_default();
        let response = inner
            .responses
            .get(key)
            .cloned()
            .unwrap_or(FakeResponse::Exit {
                code: 0,
                output: String::new(),
            });

        match response {
            FakeResponse::Exit { code, output } => {
                let lines = match invocation.capture_mode() {
                    CaptureMode::Capture => output.split_terminator('\n').map(str::to_owned).collect(),
                    CaptureMode::Inherit => Vec::new(),
                };
                Ok(ProcessOutcome {
                    exit: ProcessExit::Exited(code),
                    lines,
                })
            }
            FakeResponse::SpawnError(kind) => Err(ProcessError::Spawn {
                command: invocation.command_line(),
                error: io::Error::new(kind, "fake spawn failure"),
            }),
        }
    }
}
