// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::discovery::user_config_path;
use crate::{
    catalog::DEFAULT_PROMPT,
    errors::UserConfigError,
    logs::{DEFAULT_FULL_LOG_PREFIX, LogViewer},
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeSet, io};
use tracing::{debug, warn};

/// Special value for `--user-config-file` and `TEST_CONSOLE_USER_CONFIG_FILE` that skips loading
/// user config entirely.
pub const USER_CONFIG_NONE: &str = "none";

/// The number of history lines kept by default.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;

/// Where to load user config from.
#[derive(Clone, Copy, Debug)]
pub enum UserConfigLocation<'a> {
    /// The default location, see [`user_config_path`]. A missing file is not an error.
    Default,

    /// Don't load user config; use built-in defaults only.
    Isolated,

    /// An explicit path. A missing file is an error.
    Explicit(&'a Utf8Path),
}

impl<'a> UserConfigLocation<'a> {
    /// Interprets a value from the command line or environment.
    ///
    /// `None` means [`Default`](Self::Default), `"none"` means [`Isolated`](Self::Isolated), and
    /// anything else is an explicit path.
    pub fn from_cli_or_env(s: Option<&'a str>) -> Self {
        match s {
            None => Self::Default,
            Some(USER_CONFIG_NONE) => Self::Isolated,
            Some(s) => Self::Explicit(Utf8Path::new(s)),
        }
    }
}

/// Resolved user configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserConfig {
    /// The history file, if configured. `None` means the default location.
    pub history_file: Option<Utf8PathBuf>,

    /// The maximum number of history lines to keep.
    pub max_history_size: usize,

    /// The program used to show logs.
    pub log_viewer: LogViewer,

    /// The file name prefix of full logs.
    pub full_log_prefix: String,

    /// The prompt shown while no binary is loaded.
    pub default_prompt: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            log_viewer: LogViewer::platform_default(),
            full_log_prefix: DEFAULT_FULL_LOG_PREFIX.to_owned(),
            default_prompt: DEFAULT_PROMPT.to_owned(),
        }
    }
}

impl UserConfig {
    /// Loads user config from `location`, filling in defaults for anything not set.
    pub fn from_location(location: UserConfigLocation<'_>) -> Result<Self, UserConfigError> {
        Self::from_location_with_warnings(location, &mut DefaultUserConfigWarnings)
    }

    fn from_location_with_warnings(
        location: UserConfigLocation<'_>,
        warnings: &mut impl UserConfigWarnings,
    ) -> Result<Self, UserConfigError> {
        match location {
            UserConfigLocation::Isolated => {
                debug!("user config: skipping (isolated)");
                Ok(Self::default())
            }
            UserConfigLocation::Explicit(path) => {
                debug!("user config: loading from explicit path {path}");
                match Self::from_path_with_warnings(path, warnings)? {
                    Some(config) => Ok(config),
                    None => Err(UserConfigError::FileNotFound {
                        path: path.to_owned(),
                    }),
                }
            }
            UserConfigLocation::Default => match user_config_path()? {
                Some(path) => {
                    Ok(Self::from_path_with_warnings(&path, warnings)?.unwrap_or_default())
                }
                None => {
                    debug!("user config: could not determine config directory");
                    Ok(Self::default())
                }
            },
        }
    }

    fn from_path_with_warnings(
        path: &Utf8Path,
        warnings: &mut impl UserConfigWarnings,
    ) -> Result<Option<Self>, UserConfigError> {
        debug!("user config: attempting to load from {path}");
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("user config: file does not exist at {path}");
                return Ok(None);
            }
            Err(error) => {
                return Err(UserConfigError::Read {
                    path: path.to_owned(),
                    error,
                });
            }
        };

        let (config, unknown) =
            DeserializedUserConfig::deserialize_toml(&contents).map_err(|error| {
                UserConfigError::Parse {
                    path: path.to_owned(),
                    error,
                }
            })?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        let config = config.resolve(path)?;
        debug!("user config: loaded successfully from {path}");
        Ok(Some(config))
    }
}

trait UserConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

struct DefaultUserConfigWarnings;

impl UserConfigWarnings for DefaultUserConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if let [key] = Vec::from_iter(unknown).as_slice() {
            unknown_str.push_str("key: ");
            unknown_str.push_str(key);
        } else {
            unknown_str.push_str("keys:\n");
            for key in unknown {
                unknown_str.push_str("\n  - ");
                unknown_str.push_str(key);
            }
        }

        warn!("in user config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedUserConfig {
    history_file: Option<Utf8PathBuf>,
    max_history_size: Option<usize>,
    log_viewer: Option<String>,
    full_log_prefix: Option<String>,
    default_prompt: Option<String>,
}

impl DeserializedUserConfig {
    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }

    /// Validates settings and fills in defaults. `path` is the config file, used for errors and
    /// to resolve a relative history file.
    fn resolve(self, path: &Utf8Path) -> Result<UserConfig, UserConfigError> {
        let defaults = UserConfig::default();

        let log_viewer = match self.log_viewer {
            Some(value) => parse_log_viewer(path, value)?,
            None => defaults.log_viewer,
        };

        let full_log_prefix = match self.full_log_prefix {
            Some(prefix) if prefix.is_empty() => {
                return Err(UserConfigError::EmptyFullLogPrefix {
                    path: path.to_owned(),
                });
            }
            Some(prefix) => prefix,
            None => defaults.full_log_prefix,
        };

        let history_file = self.history_file.map(|history_file| {
            match path.parent() {
                Some(config_dir) if history_file.is_relative() => config_dir.join(history_file),
                _ => history_file,
            }
        });

        Ok(UserConfig {
            history_file,
            max_history_size: self.max_history_size.unwrap_or(defaults.max_history_size),
            log_viewer,
            full_log_prefix,
            default_prompt: self.default_prompt.unwrap_or(defaults.default_prompt),
        })
    }
}

fn parse_log_viewer(path: &Utf8Path, value: String) -> Result<LogViewer, UserConfigError> {
    let argv = match shell_words::split(&value) {
        Ok(argv) => argv,
        Err(_) => {
            return Err(UserConfigError::InvalidLogViewer {
                path: path.to_owned(),
                value,
                reason: "missing closing quote",
            });
        }
    };

    LogViewer::from_argv(argv).ok_or_else(|| UserConfigError::InvalidLogViewer {
        path: path.to_owned(),
        value,
        reason: "command is empty",
    })
}
