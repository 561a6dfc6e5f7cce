// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finding and viewing the logs that test binaries write next to themselves.
//!
//! Test binaries are expected to write their logs to a `logs` directory alongside the binary.
//! Full logs are told apart from normal ones by a short file name prefix.

use crate::{
    catalog::TestBinary,
    errors::ShowLogError,
    process::{Invocation, ProcessExit, ProcessRunner},
};
use camino::{Utf8Path, Utf8PathBuf};
use std::{cmp::Reverse, io, time::SystemTime};
use tracing::debug;

/// The default file name prefix for full logs.
pub const DEFAULT_FULL_LOG_PREFIX: &str = "ful";

/// The extension every log file has.
pub const LOG_EXTENSION: &str = "log";

/// A full log found on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullLog {
    /// The path to the log.
    pub path: Utf8PathBuf,

    /// When the log was last modified.
    pub modified: SystemTime,
}

/// Returns all full logs directly inside `logs_dir`, newest first.
///
/// Full logs are regular files (symlinks are followed) with the `.log` extension whose file name
/// starts with `prefix`. Logs modified at the same time are ordered by file name. A missing
/// directory is treated the same as an empty one.
pub fn find_full_logs(logs_dir: &Utf8Path, prefix: &str) -> Result<Vec<FullLog>, ShowLogError> {
    let entries = match logs_dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!("logs directory `{logs_dir}` does not exist");
            return Ok(Vec::new());
        }
        Err(error) => {
            return Err(ShowLogError::ReadDir {
                logs_dir: logs_dir.to_owned(),
                error,
            });
        }
    };

    let mut logs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ShowLogError::ReadDir {
            logs_dir: logs_dir.to_owned(),
            error,
        })?;

        let path = entry.path();
        if !is_full_log_name(path, prefix) {
            continue;
        }

        // Path::metadata follows symlinks, unlike DirEntry::metadata.
        let metadata = match path.metadata() {
            Ok(metadata) => metadata,
            Err(error) => {
                debug!("skipping `{path}`: {error}");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        logs.push(FullLog {
            path: path.to_owned(),
            modified,
        });
    }

    logs.sort_by(|a, b| {
        (Reverse(a.modified), a.path.file_name()).cmp(&(Reverse(b.modified), b.path.file_name()))
    });
    Ok(logs)
}

/// Returns the most recently modified full log in `logs_dir`.
pub fn newest_full_log(logs_dir: &Utf8Path, prefix: &str) -> Result<FullLog, ShowLogError> {
    find_full_logs(logs_dir, prefix)?
        .into_iter()
        .next()
        .ok_or_else(|| ShowLogError::NoLogsFound {
            logs_dir: logs_dir.to_owned(),
        })
}

fn is_full_log_name(path: &Utf8Path, prefix: &str) -> bool {
    path.extension() == Some(LOG_EXTENSION)
        && path
            .file_name()
            .is_some_and(|file_name| file_name.starts_with(prefix))
}

/// The program used to show logs, along with any leading arguments. The log path is appended.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogViewer {
    program: String,
    args: Vec<String>,
}

impl LogViewer {
    /// Creates a viewer from a split command line. Returns `None` if `argv` is empty.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }

    /// The viewer used when none is configured: `notepad` on Windows, `less` elsewhere.
    pub fn platform_default() -> Self {
        let program = if cfg!(windows) { "notepad" } else { "less" };
        Self {
            program: program.to_owned(),
            args: Vec::new(),
        }
    }

    /// Returns the program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the invocation that shows `log`.
    pub fn invocation(&self, log: &Utf8Path) -> Invocation {
        Invocation::new(self.program.as_str())
            .args(self.args.iter().map(String::as_str))
            .arg(log.as_str())
    }
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Opens the newest full log of `binary` in `viewer`, waiting for the viewer to exit.
///
/// Returns the log that was shown along with how the viewer exited.
pub fn show_newest_full_log(
    binary: Option<&TestBinary>,
    prefix: &str,
    viewer: &LogViewer,
    runner: &dyn ProcessRunner,
) -> Result<(Utf8PathBuf, ProcessExit), ShowLogError> {
    let binary = binary.ok_or(ShowLogError::NoBinaryLoaded)?;
    let log = newest_full_log(binary.logs_path(), prefix)?.path;

    let outcome = runner
        .run(&viewer.invocation(&log))
        .map_err(|error| ShowLogError::Viewer {
            log: log.clone(),
            error,
        })?;
    if !outcome.exit.success() {
        debug!("log viewer `{}` {}", viewer.program(), outcome.exit);
    }

    Ok((log, outcome.exit))
}
