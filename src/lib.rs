#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;
#[cfg(feature = "testing")]
extern crate std;

pub mod errors;
pub mod runner;
pub mod splitter;
#[cfg(feature = "testing")]
pub mod testing;

use alloc::string::String;
use alloc::vec::Vec;

// Re-export main types
pub use errors::{MalformedScriptError, RunError};
pub use runner::{FnSink, ScriptRunner, StatementSink, sink_fn};
pub use splitter::{ScriptParser, Statements};

/// Splits `script` on `;` into trimmed statements, dropping comments.
///
/// # Errors
///
/// Returns a [`MalformedScriptError`] if a quote or block comment is left
/// open at end of input.
pub fn split(script: &str) -> Result<Vec<String>, MalformedScriptError> {
    ScriptParser::new().split(script)
}

/// Splits `script` on `delimiter` into trimmed statements, dropping comments.
///
/// # Errors
///
/// Returns a [`MalformedScriptError`] if a quote or block comment is left
/// open at end of input.
pub fn split_with_delimiter(
    script: &str,
    delimiter: char,
) -> Result<Vec<String>, MalformedScriptError> {
    ScriptParser::new().with_delimiter(delimiter).split(script)
}
