//! Single-pass scanner splitting a SQL script into statements.
//!
//! The scanner tracks whether it is at top level, inside a quoted literal,
//! or inside a comment. Only at top level are delimiters, comment openers and
//! quotes interpreted. Comments are dropped, top-level line breaks collapse
//! into spaces, and quoted text is copied verbatim.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::iter::{FusedIterator, Peekable};
use core::str::CharIndices;

use crate::errors::MalformedScriptError;

/// Configuration of a script scan.
///
/// # Examples
///
/// ```
/// use sql_script_splitter::ScriptParser;
///
/// let parser = ScriptParser::new().with_delimiter('/');
/// let statements = parser.split("SELECT 1 FROM DUAL\n/\nSELECT 2 FROM DUAL /").unwrap();
/// assert_eq!(statements, ["SELECT 1 FROM DUAL", "SELECT 2 FROM DUAL"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScriptParser {
    delimiter: char,
    backslash_escaping: bool,
    double_quotes: bool,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptParser {
    /// The delimiter used when none is configured.
    pub const DEFAULT_DELIMITER: char = ';';

    /// Creates a parser splitting on `;`, treating `"` as a quote and `\` as a
    /// plain character.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER,
            backslash_escaping: false,
            double_quotes: true,
        }
    }

    /// Sets the top-level statement delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables backslash escaping.
    ///
    /// When enabled, `\` and the character following it are copied as-is and
    /// the escaped character is never interpreted, so `'it\'s'` is a single
    /// literal.
    #[must_use]
    pub const fn with_backslash_escaping(mut self, enabled: bool) -> Self {
        self.backslash_escaping = enabled;
        self
    }

    /// Enables or disables double-quoted identifiers (`"a;b"`).
    #[must_use]
    pub const fn with_double_quotes(mut self, enabled: bool) -> Self {
        self.double_quotes = enabled;
        self
    }

    /// Returns the statement delimiter.
    #[must_use]
    pub const fn delimiter(self) -> char {
        self.delimiter
    }

    /// Returns whether backslash escaping is enabled.
    #[must_use]
    pub const fn backslash_escaping(self) -> bool {
        self.backslash_escaping
    }

    /// Returns whether double-quoted identifiers are recognized.
    #[must_use]
    pub const fn double_quotes(self) -> bool {
        self.double_quotes
    }

    /// Lazily scans `script`, yielding each statement as soon as it ends.
    ///
    /// Statements preceding a malformed tail are yielded before the error;
    /// use [`split`](Self::split) when the script must be rejected as a whole.
    #[must_use]
    pub fn statements<'a>(self, script: &'a str) -> Statements<'a> {
        Statements {
            chars: script.char_indices().peekable(),
            parser: self,
            state: State::Normal,
            buffer: String::new(),
            finished: false,
        }
    }

    /// Splits `script` into its statements, in source order.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedScriptError`] if a quote or block comment is left
    /// open at end of input. No statements are returned in that case.
    pub fn split(self, script: &str) -> Result<Vec<String>, MalformedScriptError> {
        self.statements(script).collect()
    }
}

/// Lexical mode of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuote { quote: char, start: usize },
    InLineComment,
    InBlockComment { start: usize },
}

/// Iterator over the statements of a script, created by
/// [`ScriptParser::statements`].
#[derive(Debug, Clone)]
pub struct Statements<'a> {
    chars: Peekable<CharIndices<'a>>,
    parser: ScriptParser,
    state: State,
    buffer: String,
    finished: bool,
}

impl Statements<'_> {
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consumes one character, returning a statement if it ended one.
    fn handle_char(&mut self, pos: usize, current: char) -> Option<String> {
        let next = self.peek_char();
        match self.state {
            State::Normal => return self.handle_normal(pos, current, next),
            State::InQuote { quote, .. } => self.handle_quoted(quote, current, next),
            State::InLineComment => {
                // A line-break delimiter both closes the comment and ends the statement.
                if current == self.parser.delimiter && is_line_break(current) {
                    self.state = State::Normal;
                    return self.take_statement();
                }
                if is_line_break(current) {
                    self.push_line_break(next);
                    self.state = State::Normal;
                }
            }
            State::InBlockComment { .. } => {
                if current == '*' && next == Some('/') {
                    self.chars.next();
                    self.buffer.push(' ');
                    self.state = State::Normal;
                }
            }
        }
        None
    }

    fn handle_normal(&mut self, pos: usize, current: char, next: Option<char>) -> Option<String> {
        match (current, next) {
            ('-', Some('-')) => {
                self.chars.next();
                self.state = State::InLineComment;
            }
            ('/', Some('*')) => {
                self.chars.next();
                self.state = State::InBlockComment { start: pos };
            }
            _ if current == self.parser.delimiter => return self.take_statement(),
            _ if is_line_break(current) => self.push_line_break(next),
            ('\\', _) if self.parser.backslash_escaping => self.push_escaped(current),
            ('\'', _) => self.open_quote(current, pos),
            ('"', _) if self.parser.double_quotes => self.open_quote(current, pos),
            _ => self.buffer.push(current),
        }
        None
    }

    fn handle_quoted(&mut self, quote: char, current: char, next: Option<char>) {
        if current == '\\' && self.parser.backslash_escaping {
            self.push_escaped(current);
        } else if current == quote && next == Some(quote) {
            self.chars.next();
            self.buffer.push(quote);
            self.buffer.push(quote);
        } else {
            if current == quote {
                self.state = State::Normal;
            }
            self.buffer.push(current);
        }
    }

    fn open_quote(&mut self, quote: char, pos: usize) {
        self.buffer.push(quote);
        self.state = State::InQuote { quote, start: pos };
    }

    fn push_escaped(&mut self, backslash: char) {
        self.buffer.push(backslash);
        if let Some((_, escaped)) = self.chars.next() {
            self.buffer.push(escaped);
        }
    }

    /// A line break becomes a single space unless a space already separates
    /// the surrounding tokens.
    fn push_line_break(&mut self, next: Option<char>) {
        if next != Some(' ') && !self.buffer.ends_with(' ') {
            self.buffer.push(' ');
        }
    }

    fn take_statement(&mut self) -> Option<String> {
        let statement = self.buffer.trim_matches(is_trimmed);
        let statement = (!statement.is_empty()).then(|| statement.to_owned());
        self.buffer.clear();
        statement
    }
}

impl Iterator for Statements<'_> {
    type Item = Result<String, MalformedScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while let Some((pos, current)) = self.chars.next() {
            if let Some(statement) = self.handle_char(pos, current) {
                return Some(Ok(statement));
            }
        }
        self.finished = true;
        match self.state {
            State::InQuote { quote, start } => {
                Some(Err(MalformedScriptError::UnterminatedQuote { quote, pos: start }))
            }
            State::InBlockComment { start } => {
                Some(Err(MalformedScriptError::UnterminatedBlockComment { pos: start }))
            }
            State::Normal | State::InLineComment => self.take_statement().map(Ok),
        }
    }
}

impl FusedIterator for Statements<'_> {}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Spaces, control characters and any other Unicode whitespace.
fn is_trimmed(c: char) -> bool {
    c <= ' ' || c.is_whitespace()
}
