// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tab completion for labels and commands.
//!
//! Matching is fuzzy: the first character of the input must match the first character of the
//! candidate, and every following character must appear later in the candidate, in order but not
//! necessarily next to each other. So `/lt` completes to `/list-tests`, but also to `/select`.

use rustyline::{
    Context, Helper,
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
};

/// Returns true if `candidate` starts with the first character of `input` and contains the rest
/// of `input` as a subsequence.
///
/// All characters are compared literally. An empty input matches every candidate.
pub fn fuzzy_matches(input: &str, candidate: &str) -> bool {
    let mut input_chars = input.chars();
    let Some(first) = input_chars.next() else {
        return true;
    };

    let mut candidate_chars = candidate.chars();
    if candidate_chars.next() != Some(first) {
        return false;
    }

    input_chars.all(|c| candidate_chars.any(|d| d == c))
}

/// A snapshot of everything that can be completed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompletionCandidates {
    labels: Vec<String>,
    commands: Vec<String>,
}

impl CompletionCandidates {
    /// Creates a new set of candidates. Labels start with `@`, commands with `/`.
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<String>>,
        commands: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the completions for `input`, in candidate order.
    ///
    /// Input starting with `@` completes labels, input starting with `/` completes commands, and
    /// anything else (including empty input) completes nothing.
    pub fn complete(&self, input: &str) -> Vec<String> {
        let candidates = match input.chars().next() {
            Some('@') => &self.labels,
            Some('/') => &self.commands,
            _ => return Vec::new(),
        };

        candidates
            .iter()
            .filter(|candidate| fuzzy_matches(input, candidate))
            .cloned()
            .collect()
    }
}

/// Line editor integration: completes the whole line up to the cursor.
#[derive(Debug, Default)]
pub struct ConsoleHelper {
    candidates: CompletionCandidates,
}

impl ConsoleHelper {
    /// Creates a new helper.
    pub fn new(candidates: CompletionCandidates) -> Self {
        Self { candidates }
    }

    /// Replaces the candidates, e.g. after a new binary is loaded.
    pub fn set_candidates(&mut self, candidates: CompletionCandidates) {
        self.candidates = candidates;
    }

    /// Returns the start of the text to replace, and the replacements.
    fn complete_line(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let input = line.get(..pos).unwrap_or(line);
        let pairs = self
            .candidates
            .complete(input)
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        (0, pairs)
    }
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.complete_line(line, pos))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;
}

impl Highlighter for ConsoleHelper {}

impl Validator for ConsoleHelper {}

impl Helper for ConsoleHelper {}
