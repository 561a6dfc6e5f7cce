// Copyright (c) The test-console Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The catalog: what's known about the currently loaded test binary.
//!
//! A binary is loaded by running it twice, once with `--list_content` and once with
//! `--list_labels`. The catalog is replaced as a whole on every successful load; a failed load
//! only clears the loaded flag and resets the prompt.

use crate::{
    errors::LoadBinaryError,
    helpers::{display_file_name, normalize_whitespace},
    process::{CaptureMode, Invocation, ProcessRunner},
};
use camino::{Utf8Path, Utf8PathBuf};
use owo_colors::{OwoColorize, Style, style};
use std::io;
use tracing::debug;

/// The prompt shown when no binary is loaded.
pub const DEFAULT_PROMPT: &str = "test console > ";

/// The name of the logs directory, relative to the directory containing the test binary.
pub const LOGS_DIR_NAME: &str = "logs";

/// Argument that makes a Boost.Test binary print its test tree.
pub const LIST_CONTENT_ARG: &str = "--list_content";

/// Argument that makes a Boost.Test binary print its labels.
pub const LIST_LABELS_ARG: &str = "--list_labels";

/// Indentation used by `--list_content` for each level of the test tree.
const TREE_INDENT_WIDTH: usize = 4;

/// Returns the argument that makes a Boost.Test binary run the given test or `@label`.
pub fn run_test_arg(name: &str) -> String {
    format!("--run_test={name}")
}

/// State about the loaded test binary, plus the prompt derived from it.
#[derive(Clone, Debug)]
pub struct Catalog {
    default_prompt: String,
    prompt_style: Style,
    prompt: String,
    loaded: bool,
    binary: Option<TestBinary>,
}

impl Catalog {
    /// Creates an empty catalog that shows `default_prompt` until a binary is loaded.
    pub fn new(default_prompt: impl Into<String>) -> Self {
        let default_prompt = default_prompt.into();
        Self {
            prompt: default_prompt.clone(),
            default_prompt,
            prompt_style: Style::new(),
            loaded: false,
            binary: None,
        }
    }

    /// Shows the binary name in the prompt in bold green.
    pub fn colorize(&mut self) {
        self.prompt_style = style().green().bold();
    }

    /// Returns the prompt to show for the next line.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns true if the last load succeeded. Tests may only be run if this is true.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns the loaded binary, if the last load succeeded.
    pub fn loaded_binary(&self) -> Option<&TestBinary> {
        self.binary.as_ref().filter(|_| self.loaded)
    }

    /// Returns the most recently loaded binary, even if a later load attempt failed.
    pub fn last_binary(&self) -> Option<&TestBinary> {
        self.binary.as_ref()
    }

    /// Returns the labels of the most recently loaded binary, each starting with `@`.
    pub fn labels(&self) -> &[String] {
        self.binary
            .as_ref()
            .map(|binary| binary.labels.as_slice())
            .unwrap_or_default()
    }

    /// Loads the test binary at `path`.
    ///
    /// The prompt is reset and the loaded flag cleared before anything else happens, so a failed
    /// load leaves the catalog unloaded, but the data from the previous successful load is kept.
    pub fn load(
        &mut self,
        path: &Utf8Path,
        runner: &dyn ProcessRunner,
    ) -> Result<&TestBinary, LoadBinaryError> {
        self.prompt.clone_from(&self.default_prompt);
        self.loaded = false;

        if path.as_str().is_empty() {
            return Err(LoadBinaryError::NoPath);
        }

        let file_name = display_file_name(path);
        match path.metadata() {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                return Err(LoadBinaryError::NotAFile {
                    path: path.to_owned(),
                    file_name,
                });
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(LoadBinaryError::NotFound {
                    path: path.to_owned(),
                    file_name,
                });
            }
            Err(error) => {
                return Err(LoadBinaryError::Metadata {
                    path: path.to_owned(),
                    error,
                });
            }
        }

        // An absolute path ensures that a bare file name isn't looked up in PATH.
        let binary_path = path
            .canonicalize_utf8()
            .unwrap_or_else(|_| path.to_owned());
        let logs_path = match binary_path.parent() {
            Some(parent) => parent.join(LOGS_DIR_NAME),
            None => Utf8PathBuf::from(LOGS_DIR_NAME),
        };

        let list_content = runner
            .run(
                &Invocation::new(binary_path.clone())
                    .arg(LIST_CONTENT_ARG)
                    .capture(CaptureMode::Capture),
            )
            .map_err(|error| LoadBinaryError::Exec {
                file_name: file_name.clone(),
                error,
            })?;

        let mut content_text = String::new();
        for line in &list_content.lines {
            content_text.extend(line.chars().filter(|&c| c != '\r'));
            content_text.push('\n');
        }

        // This is the only check that the file is actually a Boost.Test binary.
        if !list_content.exit.success() {
            return Err(LoadBinaryError::ListContentFailed {
                file_name,
                exit: list_content.exit,
            });
        }

        let list_labels = runner
            .run(
                &Invocation::new(binary_path.clone())
                    .arg(LIST_LABELS_ARG)
                    .capture(CaptureMode::Capture),
            )
            .map_err(|error| LoadBinaryError::Exec {
                file_name: file_name.clone(),
                error,
            })?;
        if !list_labels.exit.success() {
            debug!("`{file_name} {LIST_LABELS_ARG}` {}, ignoring", list_labels.exit);
        }

        let mut labels = Vec::with_capacity(list_labels.lines.len());
        let mut labels_text = String::new();
        for line in &list_labels.lines {
            let label = normalize_whitespace(line);
            if label.is_empty() {
                continue;
            }
            let label = format!("@{label}");
            labels_text.push_str(&label);
            labels_text.push('\n');
            labels.push(label);
        }

        let binary_name = path.file_stem().unwrap_or(file_name.as_str()).to_owned();
        let test_names = parse_test_tree(&content_text);
        debug!(
            "loaded `{binary_path}`: {} tests, {} labels",
            test_names.len(),
            labels.len(),
        );

        self.prompt = format!("{} > ", binary_name.style(self.prompt_style));
        self.loaded = true;
        Ok(self.binary.insert(TestBinary {
            binary_path,
            binary_name,
            logs_path,
            content_text,
            labels_text,
            labels,
            test_names,
        }))
    }
}

/// A test binary that was loaded successfully.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestBinary {
    binary_path: Utf8PathBuf,
    binary_name: String,
    logs_path: Utf8PathBuf,
    content_text: String,
    labels_text: String,
    labels: Vec<String>,
    test_names: Vec<String>,
}

impl TestBinary {
    /// The absolute path to the binary.
    pub fn binary_path(&self) -> &Utf8Path {
        &self.binary_path
    }

    /// The binary's file stem.
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// The directory where test logs are expected: `logs` next to the binary.
    pub fn logs_path(&self) -> &Utf8Path {
        &self.logs_path
    }

    /// The raw `--list_content` output, with carriage returns removed.
    pub fn content_text(&self) -> &str {
        &self.content_text
    }

    /// The labels, one per line.
    pub fn labels_text(&self) -> &str {
        &self.labels_text
    }

    /// The labels in listing order, each starting with `@`.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Full paths of every test unit (`suite/case`), in listing order.
    pub fn test_names(&self) -> &[String] {
        &self.test_names
    }

    /// Looks up a label by exact match.
    pub fn find_label(&self, label: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|candidate| *candidate == label)
            .map(String::as_str)
    }

    /// Looks up a test unit by its exact full path.
    pub fn find_test(&self, name: &str) -> Option<&str> {
        self.test_names
            .iter()
            .find(|candidate| *candidate == name)
            .map(String::as_str)
    }
}

/// Parses the indented tree printed by `--list_content` into full test unit paths.
///
/// The output looks like:
///
/// ```text
/// suite*
///     case_one*
///     case_two*: a description
/// other_case
/// ```
///
/// Each level is indented by four spaces, `*` marks units that are enabled by default, and
/// anything after a `:` is a description.
pub fn parse_test_tree(content: &str) -> Vec<String> {
    let mut stack: Vec<&str> = Vec::new();
    let mut names = Vec::new();

    for line in content.lines() {
        let unit = line.trim_start();
        let level = (line.len() - unit.len()) / TREE_INDENT_WIDTH;

        let unit = unit.split_once(':').map_or(unit, |(name, _)| name);
        let unit = unit.trim_end().trim_end_matches('*').trim_end();
        if unit.is_empty() {
            continue;
        }

        stack.truncate(level);
        stack.push(unit);
        names.push(stack.join("/"));
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::test_helpers::{FakeResponse, FakeRunner};
    use camino_tempfile::{Utf8TempDir, tempdir};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    static CONTENT: &str = "first_suite*\n    case_one*\r\n    case_two*: a slow one\nlast_case\n";
    static LABELS: &str = "  smoke \n\nlong \t running\n";

    fn fixture_binary(name: &str) -> (Utf8TempDir, Utf8PathBuf) {
        let dir = tempdir().expect("created temp dir");
        let path = dir.path().join(name);
        std::fs::write(&path, b"").expect("wrote fake binary");
        (dir, path)
    }

    #[test]
    fn load_populates_catalog() {
        let (_dir, path) = fixture_binary("unit_tests.bin");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let binary = catalog.load(&path, &runner).expect("load succeeded").clone();

        assert_eq!(binary.binary_name(), "unit_tests");
        assert_eq!(
            binary.content_text(),
            "first_suite*\n    case_one*\n    case_two*: a slow one\nlast_case\n"
        );
        assert_eq!(binary.labels(), ["@smoke", "@long running"]);
        assert_eq!(binary.labels_text(), "@smoke\n@long running\n");
        assert_eq!(
            binary.test_names(),
            [
                "first_suite",
                "first_suite/case_one",
                "first_suite/case_two",
                "last_case"
            ]
        );
        assert_eq!(
            binary.logs_path(),
            binary.binary_path().parent().unwrap().join("logs").as_path()
        );
        assert!(catalog.is_loaded());
        assert_eq!(catalog.prompt(), "unit_tests > ");

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        for (invocation, arg) in invocations.iter().zip([LIST_CONTENT_ARG, LIST_LABELS_ARG]) {
            assert_eq!(invocation.program(), binary.binary_path());
            assert_eq!(invocation.arguments(), [arg]);
            assert_eq!(invocation.capture_mode(), CaptureMode::Capture);
        }
    }

    #[test]
    fn load_is_deterministic() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);

        let mut first = Catalog::new(DEFAULT_PROMPT);
        let mut second = Catalog::new(DEFAULT_PROMPT);
        let first = first.load(&path, &runner).expect("first load").clone();
        let second = second.load(&path, &runner).expect("second load").clone();
        assert_eq!(first, second);
    }

    #[test]
    fn reload_replaces_previous_data() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);
        let mut catalog = Catalog::new(DEFAULT_PROMPT);
        catalog.load(&path, &runner).expect("first load");

        runner.respond(LIST_CONTENT_ARG, 0, "only_case*\n");
        runner.respond(LIST_LABELS_ARG, 0, "nightly\n");
        let binary = catalog.load(&path, &runner).expect("second load");

        assert_eq!(binary.content_text(), "only_case*\n");
        assert_eq!(binary.labels(), ["@nightly"]);
        assert_eq!(binary.labels_text(), "@nightly\n");
    }

    #[test]
    fn missing_file_keeps_previous_data() {
        let (dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);
        let mut catalog = Catalog::new(DEFAULT_PROMPT);
        catalog.load(&path, &runner).expect("first load");
        let before = catalog.last_binary().cloned();
        runner.clear_invocations();

        let error = catalog
            .load(&dir.path().join("missing"), &runner)
            .expect_err("missing file");

        assert_eq!(error.to_string(), "File not found: missing");
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.prompt(), DEFAULT_PROMPT);
        assert_eq!(catalog.loaded_binary(), None);
        assert_eq!(catalog.last_binary().cloned(), before);
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn directory_is_not_a_valid_file_type() {
        let dir = tempdir().expect("created temp dir");
        let subdir = dir.path().join("build");
        std::fs::create_dir(&subdir).expect("created subdir");
        let runner = FakeRunner::new();
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let error = catalog.load(&subdir, &runner).expect_err("directory");
        assert_eq!(error.to_string(), "File: 'build' is not a valid file type");
        assert!(!catalog.is_loaded());
        assert!(runner.invocations().is_empty());
    }

    #[test]
    fn empty_path_is_rejected() {
        let runner = FakeRunner::new();
        let mut catalog = Catalog::new(DEFAULT_PROMPT);
        let error = catalog.load(Utf8Path::new(""), &runner).expect_err("empty");
        assert!(matches!(error, LoadBinaryError::NoPath), "{error:?}");
    }

    #[test]
    fn failing_list_content_is_not_loaded() {
        let (_dir, path) = fixture_binary("not_a_test");
        let runner = FakeRunner::new();
        runner.respond(LIST_CONTENT_ARG, 201, "unknown argument\n");
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let error = catalog.load(&path, &runner).expect_err("non-zero exit");
        assert_eq!(
            error.to_string(),
            "Failed to list bin content: 'not_a_test'. Not a valid boost test binary?"
        );
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.last_binary(), None);
        assert_eq!(
            runner.invoked_args(),
            [vec![LIST_CONTENT_ARG.to_owned()]],
            "labels are not listed after content listing fails"
        );
    }

    #[test]
    fn spawn_failure_is_distinct() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::new();
        runner.set_response(
            LIST_CONTENT_ARG,
            FakeResponse::SpawnError(io::ErrorKind::PermissionDenied),
        );
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let error = catalog.load(&path, &runner).expect_err("spawn failure");
        assert!(
            matches!(error, LoadBinaryError::Exec { .. }),
            "unexpected error: {error:?}"
        );
        assert!(!catalog.is_loaded());
    }

    #[test]
    fn empty_listing_is_valid() {
        let (_dir, path) = fixture_binary("empty_tests");
        let runner = FakeRunner::with_listing("", "");
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let binary = catalog.load(&path, &runner).expect("load succeeded");
        assert_eq!(binary.content_text(), "");
        assert!(binary.labels().is_empty());
        assert!(catalog.is_loaded());
    }

    #[test]
    fn failing_list_labels_is_ignored() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, "");
        runner.respond(LIST_LABELS_ARG, 1, "smoke\n");
        let mut catalog = Catalog::new(DEFAULT_PROMPT);

        let binary = catalog.load(&path, &runner).expect("load succeeded");
        assert_eq!(binary.labels(), ["@smoke"]);
    }

    #[test]
    fn colorized_prompt() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);
        let mut catalog = Catalog::new(DEFAULT_PROMPT);
        catalog.colorize();
        catalog.load(&path, &runner).expect("load succeeded");

        let prompt = catalog.prompt();
        assert!(prompt.starts_with("\u{1b}["), "prompt starts with an escape: {prompt:?}");
        assert!(prompt.contains("unit_tests"));
        assert!(prompt.ends_with("\u{1b}[0m > "), "prompt resets color: {prompt:?}");
    }

    #[test]
    fn find_label_is_exact() {
        let (_dir, path) = fixture_binary("unit_tests");
        let runner = FakeRunner::with_listing(CONTENT, LABELS);
        let mut catalog = Catalog::new(DEFAULT_PROMPT);
        let binary = catalog.load(&path, &runner).expect("load succeeded");

        assert_eq!(binary.find_label("@smoke"), Some("@smoke"));
        assert_eq!(binary.find_label("@smok"), None);
        assert_eq!(binary.find_label("smoke"), None);
        assert_eq!(binary.find_test("first_suite/case_two"), Some("first_suite/case_two"));
        assert_eq!(binary.find_test("case_two"), None);
    }

    #[test]
    fn test_tree() {
        let content = indoc! {"
            master*
                io*
                    read_file*: reads a file
                    write_file
                net*

            standalone*
        "};

        assert_eq!(
            parse_test_tree(content),
            [
                "master",
                "master/io",
                "master/io/read_file",
                "master/io/write_file",
                "master/net",
                "standalone",
            ]
        );
    }

    #[test]
    fn run_test_argument() {
        assert_eq!(run_test_arg("@smoke"), "--run_test=@smoke");
        assert_eq!(run_test_arg("suite/case"), "--run_test=suite/case");
    }
}
