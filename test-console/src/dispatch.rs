// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    output::{OutputContext, OutputOpts},
};
use camino::Utf8PathBuf;
use clap::Parser;
use test_console_runner::{
    commands::CommandRegistry,
    exit_codes::TestConsoleExitCode,
    process::DuctRunner,
    repl::{AppState, InteractiveOptions, ReplSession},
    user_config::{UserConfig, UserConfigLocation, default_history_path},
};
use tracing::debug;

/// Parses the command line, runs the console and exits the process.
///
/// Shared between the `test-console` binary and its duplicate used by integration tests.
pub fn main_impl() -> ! {
    let app = TestConsoleApp::parse();
    let output = app.init_output();

    match app.exec(output) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}

/// An interactive console for running Boost.Test binaries.
///
/// Type `@<label>` to run every test with a label, or the full path of a test (`suite/case`) to
/// run just that test. Commands start with `/`; type `/help` to list them. Tab completes labels
/// and commands.
#[derive(Debug, Parser)]
#[command(
    name = "test-console",
    version,
    max_term_width = 100,
)]
pub struct TestConsoleApp {
    /// Test binary to load at startup
    #[arg(value_name = "TEST_BINARY")]
    test_binary: Option<Utf8PathBuf>,

    /// File to load prompt history from and save it to
    ///
    /// Defaults to the `history-file` setting in the user config, then
    /// `$XDG_DATA_HOME/test-console/history.txt`.
    #[arg(long, value_name = "PATH", env = "TEST_CONSOLE_HISTORY_FILE")]
    history_file: Option<Utf8PathBuf>,

    /// User config file, or `none` to use built-in defaults
    ///
    /// Defaults to `$XDG_CONFIG_HOME/test-console/config.toml`.
    #[arg(long, value_name = "PATH", env = "TEST_CONSOLE_USER_CONFIG_FILE")]
    user_config_file: Option<String>,

    #[command(flatten)]
    output: OutputOpts,
}

impl TestConsoleApp {
    /// Initializes logging and color support.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Runs the console until the user quits, returning the exit code.
    pub fn exec(self, output: OutputContext) -> Result<i32> {
        let location = UserConfigLocation::from_cli_or_env(self.user_config_file.as_deref());
        let config = UserConfig::from_location(location)?;

        let history_file = self
            .history_file
            .or_else(|| config.history_file.clone())
            .unwrap_or_else(default_history_path);
        debug!("using history file `{history_file}`");

        let mut state = AppState::new(&config, Box::new(DuctRunner::new()));
        if output.colorize_prompt() {
            state.colorize();
        }
        let mut session = ReplSession::new(state, CommandRegistry::builtin());

        if let Some(test_binary) = &self.test_binary {
            session
                .load_binary(test_binary, &mut std::io::stdout())
                .map_err(ExpectedError::write_output)?;
        }

        session.run_interactive(&InteractiveOptions {
            history_file,
            max_history_size: config.max_history_size,
        })?;

        Ok(TestConsoleExitCode::OK)
    }
}
