// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use owo_colors::OwoColorize;
use std::error::Error;
use test_console_runner::{
    errors::{ReplError, UserConfigError},
    exit_codes::TestConsoleExitCode,
};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholders: errors are meant to be shown with
// display_to_stderr, which colorizes them and prints their causes.

/// An error that ends the program.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("user config error")]
    UserConfig {
        #[from]
        err: UserConfigError,
    },
    #[error("prompt error")]
    Prompt {
        #[from]
        err: ReplError,
    },
    #[error("failed to write output")]
    WriteOutput {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    pub(crate) fn write_output(err: std::io::Error) -> Self {
        Self::WriteOutput { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::UserConfig { .. } => TestConsoleExitCode::USER_CONFIG_ERROR,
            Self::Prompt { .. } => TestConsoleExitCode::PROMPT_ERROR,
            Self::WriteOutput { .. } => TestConsoleExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::UserConfig { err } => {
                error!("{}", err.style(styles.bold));
                err.source()
            }
            Self::Prompt { err } => {
                error!("{err}");
                err.source()
            }
            Self::WriteOutput { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {err}");
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn exit_codes() {
        let error = ExpectedError::from(UserConfigError::FileNotFound {
            path: Utf8PathBuf::from("missing.toml"),
        });
        assert_eq!(
            error.process_exit_code(),
            TestConsoleExitCode::USER_CONFIG_ERROR
        );

        let error = ExpectedError::write_output(std::io::Error::other("broken pipe"));
        assert_eq!(
            error.process_exit_code(),
            TestConsoleExitCode::WRITE_OUTPUT_ERROR
        );
    }
}
