// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Command, CommandContext, CommandEntry, CommandOutcome, CommandRegistry};
use camino::Utf8Path;
use std::io;

impl CommandRegistry {
    /// Returns the registry with every built-in command, in the order `/help` lists them.
    pub fn builtin() -> Self {
        Self::new()
            .with_command(CommandEntry::new(
                "/quit",
                "/q",
                "Exit the application",
                QuitCommand,
            ))
            .with_command(CommandEntry::new(
                "/last-full-log",
                "/lfl",
                "Show latest full test log in the log viewer",
                LastFullLogCommand,
            ))
            .with_command(CommandEntry::new(
                "/last-log",
                "/llg",
                "Show latest normal test log in the log viewer",
                NotImplementedCommand,
            ))
            .with_command(CommandEntry::new(
                "/list-labels",
                "/ll",
                "List all found labels",
                ListLabelsCommand,
            ))
            .with_command(CommandEntry::new(
                "/list-tests",
                "/lt",
                "List all found tests",
                ListTestsCommand,
            ))
            .with_command(CommandEntry::new(
                "/view-log",
                "/vl",
                "",
                NotImplementedCommand,
            ))
            .with_command(CommandEntry::new(
                "/view-full-log",
                "/vfl",
                "",
                NotImplementedCommand,
            ))
            .with_command(CommandEntry::new(
                "/help",
                "/h",
                "Print help message",
                HelpCommand,
            ))
            .with_command(CommandEntry::new(
                "/view-test",
                "/vt",
                "",
                NotImplementedCommand,
            ))
            .with_command(CommandEntry::new(
                "/load",
                "/l",
                "Load provided test binary",
                LoadCommand,
            ))
            .with_command(CommandEntry::new(
                "/select",
                "/s",
                "",
                NotImplementedCommand,
            ))
    }
}

/// `/quit`: ends the session. History is saved by the prompt on the way out.
#[derive(Clone, Copy, Debug)]
pub struct QuitCommand;

impl Command for QuitCommand {
    fn run(&self, _args: &str, _ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        Ok(CommandOutcome::Quit)
    }
}

/// `/last-full-log`: opens the newest full log in the log viewer.
#[derive(Clone, Copy, Debug)]
pub struct LastFullLogCommand;

impl Command for LastFullLogCommand {
    fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        ctx.state.show_last_full_log(ctx.out)?;
        Ok(CommandOutcome::Continue)
    }
}

/// `/list-labels`: prints the labels of the last loaded binary.
#[derive(Clone, Copy, Debug)]
pub struct ListLabelsCommand;

impl Command for ListLabelsCommand {
    fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        let labels_text = ctx
            .state
            .catalog()
            .last_binary()
            .map_or("", |binary| binary.labels_text());
        writeln!(ctx.out, "{labels_text}")?;
        Ok(CommandOutcome::Continue)
    }
}

/// `/list-tests`: prints the test tree of the last loaded binary.
#[derive(Clone, Copy, Debug)]
pub struct ListTestsCommand;

impl Command for ListTestsCommand {
    fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        let content_text = ctx
            .state
            .catalog()
            .last_binary()
            .map_or("", |binary| binary.content_text());
        writeln!(ctx.out, "{content_text}")?;
        Ok(CommandOutcome::Continue)
    }
}

/// `/help`: prints usage and the command table.
#[derive(Clone, Copy, Debug)]
pub struct HelpCommand;

impl Command for HelpCommand {
    fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        ctx.registry.write_help(ctx.out)?;
        Ok(CommandOutcome::Continue)
    }
}

/// `/load <path>`: loads a test binary, replacing the current one.
#[derive(Clone, Copy, Debug)]
pub struct LoadCommand;

impl Command for LoadCommand {
    fn run(&self, args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        ctx.state.load_binary(Utf8Path::new(args), ctx.out)?;
        Ok(CommandOutcome::Continue)
    }
}

/// Placeholder for commands that are listed but don't do anything yet.
#[derive(Clone, Copy, Debug)]
pub struct NotImplementedCommand;

impl Command for NotImplementedCommand {
    fn run(&self, _args: &str, ctx: &mut CommandContext<'_>) -> io::Result<CommandOutcome> {
        writeln!(ctx.out, "Not implemented")?;
        Ok(CommandOutcome::Continue)
    }
}
