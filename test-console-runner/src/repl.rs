// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interactive prompt.
//!
//! Each line read from the prompt is routed as follows:
//!
//! * Empty lines are ignored.
//! * Lines starting with `/` are commands, and work whether or not a binary is loaded.
//! * Anything else needs a loaded binary. Lines starting with `@` must match a label exactly, and
//!   other lines must match the full path of a test unit (e.g. `suite/case`). A match runs the
//!   binary with `--run_test=<line>`, attached to the console.

use crate::{
    catalog::{Catalog, run_test_arg},
    commands::{CommandRegistry, DispatchOutcome},
    completion::{CompletionCandidates, ConsoleHelper},
    errors::{DisplayErrorChain, HistoryFileError, ReplError},
    logs::{LogViewer, show_newest_full_log},
    process::{Invocation, ProcessRunner},
    user_config::UserConfig,
    write_str::WriteStr,
};
use camino::{Utf8Path, Utf8PathBuf};
use rustyline::{
    CompletionType, Config, Editor, error::ReadlineError, history::DefaultHistory,
};
use std::io;
use tracing::{debug, info, warn};

/// Mutable session state shared by the prompt and the commands.
pub struct AppState {
    catalog: Catalog,
    runner: Box<dyn ProcessRunner>,
    log_viewer: LogViewer,
    full_log_prefix: String,
}

impl AppState {
    /// Creates the state for a new session, with nothing loaded.
    pub fn new(config: &UserConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self {
            catalog: Catalog::new(config.default_prompt.as_str()),
            runner,
            log_viewer: config.log_viewer.clone(),
            full_log_prefix: config.full_log_prefix.clone(),
        }
    }

    /// Enables color in the prompt.
    pub fn colorize(&mut self) {
        self.catalog.colorize();
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Loads the binary at `path`, printing a message if that fails.
    ///
    /// Returns whether the binary was loaded.
    pub fn load_binary(&mut self, path: &Utf8Path, out: &mut dyn WriteStr) -> io::Result<bool> {
        match self.catalog.load(path, self.runner.as_ref()) {
            Ok(binary) => {
                debug!("loaded test binary `{}`", binary.binary_path());
                Ok(true)
            }
            Err(error) => {
                writeln!(out, "{}", DisplayErrorChain::new(&error))?;
                Ok(false)
            }
        }
    }

    /// Runs a single test or `@label` in the loaded binary, blocking until it exits.
    ///
    /// A failing test is logged, not printed: the binary's own output already says what failed.
    pub fn run_test(&self, name: &str, out: &mut dyn WriteStr) -> io::Result<()> {
        let Some(binary) = self.catalog.loaded_binary() else {
            writeln!(out, "No test binary loaded!")?;
            return Ok(());
        };

        // The child writes straight to the console, so anything buffered must go first.
        out.write_str_flush()?;

        let invocation = Invocation::new(binary.binary_path()).arg(run_test_arg(name));
        match self.runner.run(&invocation) {
            Ok(outcome) if outcome.exit.success() => {
                debug!("test run `{name}` passed");
            }
            Ok(outcome) => {
                info!("test run {}", outcome.exit);
            }
            Err(error) => {
                writeln!(out, "{}", DisplayErrorChain::new(&error))?;
            }
        }
        Ok(())
    }

    /// Opens the newest full log of the loaded binary in the log viewer.
    pub fn show_last_full_log(&self, out: &mut dyn WriteStr) -> io::Result<()> {
        let result = show_newest_full_log(
            self.catalog.loaded_binary(),
            &self.full_log_prefix,
            &self.log_viewer,
            self.runner.as_ref(),
        );
        match result {
            Ok((log, exit)) => debug!("showed `{log}`, viewer {exit}"),
            Err(error) => writeln!(out, "{}", DisplayErrorChain::new(&error))?,
        }
        Ok(())
    }
}

/// What to do after a line has been handled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineOutcome {
    /// Read another line.
    Continue,

    /// End the session.
    Quit,
}

/// Options for [`ReplSession::run_interactive`].
#[derive(Clone, Debug)]
pub struct InteractiveOptions {
    /// Where history is loaded from at startup and saved to on exit.
    pub history_file: Utf8PathBuf,

    /// The maximum number of history entries to keep.
    pub max_history_size: usize,
}

/// A prompt session: the state plus the commands that operate on it.
pub struct ReplSession {
    state: AppState,
    registry: CommandRegistry,
}

impl ReplSession {
    /// Creates a new session.
    pub fn new(state: AppState, registry: CommandRegistry) -> Self {
        Self { state, registry }
    }

    /// Returns the session state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Loads the binary at `path`, printing a message if that fails.
    pub fn load_binary(&mut self, path: &Utf8Path, out: &mut dyn WriteStr) -> io::Result<bool> {
        self.state.load_binary(path, out)
    }

    /// Returns the prompt to show for the next line.
    pub fn prompt(&self) -> &str {
        self.state.catalog.prompt()
    }

    /// Returns what can currently be tab-completed.
    pub fn completion_candidates(&self) -> CompletionCandidates {
        CompletionCandidates::new(self.state.catalog.labels(), self.registry.names())
    }

    /// Handles a single line of input.
    pub fn handle_line(&mut self, line: &str, out: &mut dyn WriteStr) -> io::Result<LineOutcome> {
        if line.is_empty() {
            return Ok(LineOutcome::Continue);
        }

        if line.starts_with('/') {
            match self.registry.dispatch(line, &mut self.state, out)? {
                DispatchOutcome::NotHandled => writeln!(out, "Unknown command")?,
                DispatchOutcome::Handled => {}
                DispatchOutcome::Quit => return Ok(LineOutcome::Quit),
            }
            return Ok(LineOutcome::Continue);
        }

        let Some(binary) = self.state.catalog.loaded_binary() else {
            writeln!(out, "No test binary loaded!")?;
            return Ok(LineOutcome::Continue);
        };

        if line.starts_with('@') {
            match binary.find_label(line) {
                Some(label) => self.state.run_test(label, out)?,
                None => writeln!(out, "Unknown label: {line}")?,
            }
        } else {
            match binary.find_test(line.trim()) {
                Some(test) => self.state.run_test(test, out)?,
                None => writeln!(out, "Unrecognized input: {line}")?,
            }
        }

        Ok(LineOutcome::Continue)
    }

    /// Reads lines from the terminal until `/quit` or end of input.
    ///
    /// History is loaded before the first line and saved on the way out. Problems with the
    /// history file are logged as warnings.
    pub fn run_interactive(&mut self, options: &InteractiveOptions) -> Result<(), ReplError> {
        let config = Config::builder()
            .max_history_size(options.max_history_size)
            .map_err(|error| ReplError::Readline { error })?
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .build();
        let mut editor: Editor<ConsoleHelper, DefaultHistory> =
            Editor::with_config(config).map_err(|error| ReplError::Readline { error })?;
        editor.set_helper(Some(ConsoleHelper::new(self.completion_candidates())));

        load_history(&mut editor, &options.history_file);

        let mut stdout = io::stdout();
        let result = loop {
            let line = match editor.readline(self.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    if let Err(error) = writeln!(stdout, "Interrupted. Type /quit to exit.") {
                        break Err(ReplError::Write { error });
                    }
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input, exiting");
                    break Ok(());
                }
                Err(error) => break Err(ReplError::Readline { error }),
            };

            if !line.is_empty() {
                if let Err(error) = editor.add_history_entry(line.as_str()) {
                    warn!("failed to add history entry: {error}");
                }
            }

            let outcome = match self.handle_line(&line, &mut stdout) {
                Ok(outcome) => outcome,
                Err(error) => break Err(ReplError::Write { error }),
            };

            if let Some(helper) = editor.helper_mut() {
                helper.set_candidates(self.completion_candidates());
            }

            if outcome == LineOutcome::Quit {
                break Ok(());
            }
        };

        save_history(&mut editor, &options.history_file);
        result
    }
}

fn load_history(editor: &mut Editor<ConsoleHelper, DefaultHistory>, path: &Utf8Path) {
    match editor.load_history(path) {
        Ok(()) => debug!("loaded history from `{path}`"),
        Err(ReadlineError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
            debug!("no history at `{path}` yet");
        }
        Err(error) => {
            let error = HistoryFileError::Load {
                path: path.to_owned(),
                error,
            };
            warn!("{}", DisplayErrorChain::new(error));
        }
    }
}

fn save_history(editor: &mut Editor<ConsoleHelper, DefaultHistory>, path: &Utf8Path) {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
        if let Err(error) = std::fs::create_dir_all(dir) {
            let error = HistoryFileError::CreateDir {
                dir: dir.to_owned(),
                error,
            };
            warn!("{}", DisplayErrorChain::new(error));
            return;
        }
    }

    match editor.save_history(path) {
        Ok(()) => debug!("saved history to `{path}`"),
        Err(error) => {
            let error = HistoryFileError::Save {
                path: path.to_owned(),
                error,
            };
            warn!("{}", DisplayErrorChain::new(error));
        }
    }
}
