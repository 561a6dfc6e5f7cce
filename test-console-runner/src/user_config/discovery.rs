// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery of per-user file locations.

use crate::errors::UserConfigError;
use camino::Utf8PathBuf;
use etcetera::{BaseStrategy, HomeDirError, base_strategy::Xdg};
use tracing::debug;

/// The directory name used under the XDG config and data directories.
pub const APP_DIR_NAME: &str = "test-console";

/// The history file used when no per-user data directory can be determined, relative to the
/// current directory.
pub const FALLBACK_HISTORY_FILE: &str = "btc_history.hist";

/// Returns the path the user config file is expected at, or `None` if the home directory is
/// unknown.
///
/// This is `$XDG_CONFIG_HOME/test-console/config.toml`, falling back to
/// `~/.config/test-console/config.toml`, on all platforms.
pub fn user_config_path() -> Result<Option<Utf8PathBuf>, UserConfigError> {
    let strategy = match Xdg::new() {
        Ok(strategy) => strategy,
        Err(HomeDirError) => return Ok(None),
    };

    let config_path = strategy.config_dir().join(APP_DIR_NAME).join("config.toml");
    Utf8PathBuf::try_from(config_path)
        .map(Some)
        .map_err(|error| UserConfigError::NonUtf8Path { error })
}

/// Returns the default history file: `$XDG_DATA_HOME/test-console/history.txt`.
///
/// Falls back to [`FALLBACK_HISTORY_FILE`] in the current directory if the data directory can't
/// be determined or isn't valid UTF-8.
pub fn default_history_path() -> Utf8PathBuf {
    let data_dir = match Xdg::new() {
        Ok(strategy) => strategy.data_dir(),
        Err(HomeDirError) => {
            debug!("no home directory, using `{FALLBACK_HISTORY_FILE}` for history");
            return Utf8PathBuf::from(FALLBACK_HISTORY_FILE);
        }
    };

    match Utf8PathBuf::try_from(data_dir.join(APP_DIR_NAME).join("history.txt")) {
        Ok(path) => path,
        Err(error) => {
            debug!(
                "data directory `{}` is not valid UTF-8, using `{FALLBACK_HISTORY_FILE}` for history",
                error.as_path().display(),
            );
            Utf8PathBuf::from(FALLBACK_HISTORY_FILE)
        }
    }
}
