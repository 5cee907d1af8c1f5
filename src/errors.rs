//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors raised when a script cannot be split into statements.
///
/// Malformed input is never partially split: either every statement of the
/// script is produced, or one of these errors is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedScriptError {
    /// A quoted literal or identifier was still open at end of input.
    #[error("Unterminated {quote}-quoted literal starting at position {pos}")]
    UnterminatedQuote {
        /// The opening quote character.
        quote: char,
        /// Byte offset of the opening quote.
        pos: usize,
    },
    /// A block comment was still open at end of input.
    #[error("Unterminated block comment starting at position {pos}")]
    UnterminatedBlockComment {
        /// Byte offset of the opening `/*`.
        pos: usize,
    },
}

impl MalformedScriptError {
    /// Returns the byte offset in the script where the offending token starts.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::UnterminatedQuote { pos, .. } | Self::UnterminatedBlockComment { pos } => *pos,
        }
    }
}

/// Errors raised by [`ScriptRunner::execute`](crate::ScriptRunner::execute).
#[derive(Debug, thiserror::Error)]
pub enum RunError<E> {
    /// The script could not be split; no statement was handed to the sink.
    #[error(transparent)]
    Malformed(#[from] MalformedScriptError),
    /// The sink rejected a statement. Statements before `index` were handled.
    #[error("Statement {index} was rejected: {statement}")]
    Sink {
        /// Zero-based index of the rejected statement.
        index: usize,
        /// The rejected statement.
        statement: String,
        /// The error reported by the sink.
        #[source]
        source: E,
    },
}
