//! Testing utilities shared by the fuzz harness and the regression tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`FuzzScript`]: an `arbitrary`-generated script built from well-formed fragments
//! - [`check_script`]: assert the splitter invariants on any raw script
//! - [`check_fuzz_script`]: assert the invariants plus comment-stripping equivalence
//! - [`run_crash_dir_regression`]: replay every saved crash input of a harness

extern crate std;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use arbitrary::Arbitrary;
use std::time::{Duration, Instant};

use crate::ScriptParser;

/// One well-formed piece of a generated script.
#[derive(Debug, Clone, Arbitrary)]
pub enum Fragment {
    /// SQL text free of quotes, comment markers and delimiters.
    Word(String),
    /// A single-quoted literal; the content is escaped by doubling quotes.
    Quoted(String),
    /// A `--` comment, rendered with its terminating line break.
    LineComment(String),
    /// A `/* */` comment.
    BlockComment(String),
    /// The statement delimiter.
    Delimiter,
    /// A `\n`, `\r` or `\r\n`.
    LineBreak(u8),
    /// A single space.
    Space,
}

/// A generated script: a sequence of [`Fragment`]s.
#[derive(Debug, Clone, Arbitrary)]
pub struct FuzzScript {
    /// The fragments, in source order.
    pub fragments: Vec<Fragment>,
}

impl FuzzScript {
    /// Renders the script using `;` as delimiter.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_with(false)
    }

    /// Renders the script with every comment replaced by what the splitter
    /// leaves in its place.
    #[must_use]
    pub fn render_without_comments(&self) -> String {
        self.render_with(true)
    }

    /// Returns the rendered quoted literals, in source order.
    #[must_use]
    pub fn quoted_literals(&self) -> Vec<String> {
        self.fragments
            .iter()
            .filter_map(|fragment| match fragment {
                Fragment::Quoted(content) => Some(quote(content)),
                _ => None,
            })
            .collect()
    }

    fn render_with(&self, strip_comments: bool) -> String {
        let mut script = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Word(word) => script.extend(word.chars().filter(|c| is_word_char(*c))),
                Fragment::Quoted(content) => script.push_str(&quote(content)),
                Fragment::LineComment(text) => {
                    if !strip_comments {
                        script.push_str("--");
                        script.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
                    }
                    script.push('\n');
                }
                Fragment::BlockComment(text) => {
                    // A line break looks ahead at the next character, which
                    // must be the same in both renderings.
                    if script.ends_with(['\n', '\r']) {
                        script.push(' ');
                    }
                    if strip_comments {
                        script.push(' ');
                    } else {
                        script.push_str("/*");
                        script.push_str(&text.replace("*/", "* /"));
                        script.push_str("*/");
                    }
                }
                Fragment::Delimiter => script.push(';'),
                Fragment::LineBreak(kind) => script.push_str(match kind % 3 {
                    0 => "\n",
                    1 => "\r",
                    _ => "\r\n",
                }),
                Fragment::Space => script.push(' '),
            }
        }
        script
    }
}

fn quote(content: &str) -> String {
    format!("'{}'", content.replace('\'', "''"))
}

fn is_word_char(c: char) -> bool {
    !matches!(c, '\'' | '"' | '\\' | ';' | '-' | '/' | '*') && !c.is_control()
}

/// Counts the `;` characters of `script`, an upper bound on top-level delimiters.
fn count_delimiters(script: &str) -> usize {
    script.chars().filter(|c| *c == ';').count()
}

/// Splits an arbitrary script and asserts the invariants that hold for any
/// successful split.
///
/// # Panics
///
/// Panics if an invariant is violated.
pub fn check_script(script: &str) {
    let parser = ScriptParser::new();
    let Ok(statements) = parser.split(script) else {
        return;
    };

    assert!(
        statements.len() <= count_delimiters(script) + 1,
        "More statements than delimiters in {script:?}"
    );
    for statement in &statements {
        assert!(!statement.is_empty(), "Empty statement from {script:?}");
        assert_eq!(
            statement.trim_matches(|c: char| c <= ' ' || c.is_whitespace()),
            statement,
            "Untrimmed statement from {script:?}"
        );
    }

    let rejoined = statements.join(";\n");
    assert_eq!(
        parser.split(&rejoined).as_ref(),
        Ok(&statements),
        "Re-splitting the statements of {script:?} changed them"
    );
}

/// Asserts the invariants of a generated script, which is always well formed.
///
/// # Panics
///
/// Panics if an invariant is violated.
pub fn check_fuzz_script(script: &FuzzScript) {
    let parser = ScriptParser::new();
    let rendered = script.render();
    let statements = parser
        .split(&rendered)
        .unwrap_or_else(|error| panic!("Well-formed script {rendered:?} rejected: {error}"));
    check_script(&rendered);

    let stripped = parser
        .split(&script.render_without_comments())
        .unwrap_or_else(|error| panic!("Comment-free script rejected: {error}"));
    assert_eq!(statements, stripped, "Comment stripping is not equivalent for {rendered:?}");

    let joined = statements.join(";");
    for literal in script.quoted_literals() {
        assert!(
            joined.contains(&literal),
            "Literal {literal:?} was altered in {rendered:?}"
        );
    }
}

/// Replays every file of `dir` through `check`, in file name order.
///
/// Files are read as raw bytes; a missing directory is treated as empty.
/// Each input must complete within `time_limit`, so that inputs the fuzzer
/// killed for slowness are caught as well.
///
/// # Panics
///
/// Panics if a file cannot be read, if `check` panics, or if an input is too slow.
pub fn run_crash_dir_regression(dir: &str, time_limit: Duration, check: impl Fn(&[u8])) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    for path in paths {
        let bytes = std::fs::read(&path)
            .unwrap_or_else(|error| panic!("Failed to read {}: {error}", path.display()));
        let started = Instant::now();
        check(&bytes);
        let elapsed = started.elapsed();
        assert!(
            elapsed <= time_limit,
            "{} took {elapsed:?}, over the {time_limit:?} limit",
            path.display()
        );
    }
}
