//! Regression tests from fuzzing crashes.
//!
//! These tests ensure that bugs found by fuzzing don't regress.
//!
//! Each fuzz harness has a corresponding crash-input directory under
//! `tests/crash_inputs/<harness>/`, replayed through the same shared helper
//! the harness uses.
//!
//! | Harness     | Input type   | Crash directory                  |
//! |-------------|--------------|----------------------------------|
//! | `split_raw` | `&[u8]`      | `tests/crash_inputs/split_raw/`  |
//! | `fragments` | `FuzzScript` | `tests/crash_inputs/fragments/`  |
//!
//! `fragments` crash files are raw `arbitrary`-encoded bytes, decoded via
//! [`arbitrary::Unstructured`]. Files that no longer decode are skipped.
//!
//! Requires the `testing` feature: `cargo test --features testing`. New crash
//! files are copied from `fuzz/hfuzz_workspace/<harness>/` once fixed.

#![cfg(feature = "testing")]

use sql_script_splitter::testing::{
    Fragment, FuzzScript, check_fuzz_script, check_script, run_crash_dir_regression,
};
use std::time::Duration;

/// Maximum time allowed for a single crash input. The scan is linear, so
/// anything close to this is a bug.
const PER_INPUT_TIME_LIMIT: Duration = Duration::from_secs(2);

/// A line break right before a block comment.
///
/// Bug: the comment-free rendering replaced the comment by a space, which the
/// preceding line break saw as lookahead and stopped emitting its own space.
/// Fix: both renderings put a space between the line break and the comment.
#[test]
fn fuzz_regression_line_break_before_block_comment() {
    check_fuzz_script(&FuzzScript {
        fragments: vec![
            Fragment::Word("a".into()),
            Fragment::LineBreak(0),
            Fragment::BlockComment("c".into()),
            Fragment::Word("b".into()),
        ],
    });
}

/// Adjacent literals merge into one literal with a doubled quote.
#[test]
fn fuzz_regression_adjacent_literals() {
    check_fuzz_script(&FuzzScript {
        fragments: vec![
            Fragment::Quoted(String::new()),
            Fragment::Quoted("x;".into()),
            Fragment::Delimiter,
            Fragment::Quoted("'".into()),
        ],
    });
}

/// A block comment whose body ends in `*`.
#[test]
fn fuzz_regression_star_before_comment_end() {
    check_fuzz_script(&FuzzScript {
        fragments: vec![
            Fragment::Word("SELECT".into()),
            Fragment::BlockComment("**".into()),
            Fragment::Word("1".into()),
        ],
    });
    check_script("SELECT /***/ 1; /*/ still open */ 2");
}

/// A `\r` ending a line comment followed by `\n`.
#[test]
fn fuzz_regression_crlf_after_line_comment() {
    check_script("a --x\r\nb;c");
    check_fuzz_script(&FuzzScript {
        fragments: vec![
            Fragment::Word("a".into()),
            Fragment::LineComment("x".into()),
            Fragment::LineBreak(2),
            Fragment::Word("b".into()),
        ],
    });
}

/// Automatically test all `split_raw` crash files.
#[test]
fn fuzz_regression_split_raw_crash_inputs_dir() {
    run_crash_dir_regression(
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/crash_inputs/split_raw"),
        PER_INPUT_TIME_LIMIT,
        |data| {
            if let Ok(script) = std::str::from_utf8(data) {
                check_script(script);
            }
        },
    );
}

/// Automatically test all `fragments` crash files.
#[test]
fn fuzz_regression_fragments_crash_inputs_dir() {
    run_crash_dir_regression(
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/crash_inputs/fragments"),
        PER_INPUT_TIME_LIMIT,
        |data| {
            if let Ok(script) = arbitrary::Unstructured::new(data).arbitrary::<FuzzScript>() {
                check_fuzz_script(&script);
            }
        },
    );
}
