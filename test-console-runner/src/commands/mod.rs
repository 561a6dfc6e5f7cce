// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands typed at the prompt.
//!
//! Commands live in a [`CommandRegistry`], a fixed table built at startup. A line is dispatched by
//! comparing it against every long name in table order and picking the first name the line starts
//! with. Because of this, `/selectx` runs `/select` with no arguments, and a command listed earlier
//! shadows any later command whose name it is a prefix of. If no long name matches, the first
//! word of the line is compared exactly against the short aliases.

mod builtin;

pub use builtin::*;

use crate::{repl::AppState, write_str::WriteStr};
use std::{fmt, io};
use tracing::debug;

/// Printed by `/help` before the list of commands.
pub const HELP_PREAMBLE: &str = "@<name> - start test using label <name>\n\
                                 <name> - start test using its name <name>\n\
                                 \n\
                                 Possible commands:\n\
                                 \n";

/// What the prompt should do after a command has run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandOutcome {
    /// Read the next line.
    Continue,

    /// End the session.
    Quit,
}

/// The result of [`CommandRegistry::dispatch`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    /// No command matched the line.
    NotHandled,

    /// A command ran and the session continues.
    Handled,

    /// A command asked to end the session.
    Quit,
}

/// Everything a command has access to while it runs.
pub struct CommandContext<'a> {
    /// Session state, including the catalog.
    pub state: &'a mut AppState,

    /// The registry the command was dispatched from.
    pub registry: &'a CommandRegistry,

    /// Where to print output.
    pub out: &'a mut dyn WriteStr,
}

/// A command handler.
pub trait Command {
    /// Runs the command. `args` is whatever followed the command name, trimmed.
    ///
    /// Problems the user should know about are printed to `ctx.out`; errors are reserved for
    /// failing to print.
    fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome>;
}

/// A row in the command table.
pub struct CommandEntry {
    name: &'static str,
    short_name: &'static str,
    description: &'static str,
    handler: Box<dyn Command>,
}

impl CommandEntry {
    /// Creates a new entry.
    pub fn new(
        name: &'static str,
        short_name: &'static str,
        description: &'static str,
        handler: impl Command + 'static,
    ) -> Self {
        Self {
            name,
            short_name,
            description,
            handler: Box::new(handler),
        }
    }

    /// The long name, including the leading `/`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The short alias, including the leading `/`.
    pub fn short_name(&self) -> &'static str {
        self.short_name
    }

    /// The description shown by `/help`. May be empty.
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("short_name", &self.short_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// The ordered table of commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command to the table.
    ///
    /// # Panics
    ///
    /// Panics if a command with the same long name is already registered.
    pub fn with_command(mut self, entry: CommandEntry) -> Self {
        assert!(
            self.entries.iter().all(|existing| existing.name != entry.name),
            "command `{}` registered twice",
            entry.name,
        );
        self.entries.push(entry);
        self
    }

    /// Returns the registered commands in table order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Returns the long names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Finds the command for `line`, returning it along with its trimmed arguments.
    pub fn find<'line>(&self, line: &'line str) -> Option<(&CommandEntry, &'line str)> {
        let by_name = self.entries.iter().find_map(|entry| {
            line.strip_prefix(entry.name)
                .map(|args| (entry, args.trim()))
        });
        if by_name.is_some() {
            return by_name;
        }

        let (first_word, args) = line
            .trim_start()
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim(), ""));
        self.entries
            .iter()
            .find(|entry| entry.short_name == first_word)
            .map(|entry| (entry, args.trim()))
    }

    /// Runs the command matching `line`, if any.
    pub fn dispatch(
        &self,
        line: &str,
        state: &mut AppState,
        out: &mut dyn WriteStr,
    ) -> io::Result<DispatchOutcome> {
        let Some((entry, args)) = self.find(line) else {
            debug!("no command matches `{line}`");
            return Ok(DispatchOutcome::NotHandled);
        };

        debug!("running {} with arguments `{args}`", entry.name);
        let mut ctx = CommandContext {
            state,
            registry: self,
            out,
        };
        match entry.handler.run(args, &mut ctx)? {
            CommandOutcome::Continue => Ok(DispatchOutcome::Handled),
            CommandOutcome::Quit => Ok(DispatchOutcome::Quit),
        }
    }

    /// Writes the `/help` text.
    pub fn write_help(&self, out: &mut dyn WriteStr) -> io::Result<()> {
        out.write_str(HELP_PREAMBLE)?;
        for entry in &self.entries {
            writeln!(
                out,
                "{} [{}] - {}",
                entry.name, entry.short_name, entry.description
            )?;
        }
        Ok(())
    }
}
