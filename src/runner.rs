//! Driving a statement consumer from a whole script.
//!
//! A [`ScriptRunner`] splits a script with its [`ScriptParser`] and forwards
//! every statement, in order, to a [`StatementSink`]. The script is split in
//! full before the first statement is forwarded, so a malformed script never
//! reaches the sink half-way.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;

use crate::errors::RunError;
use crate::splitter::ScriptParser;

/// A consumer of SQL statements, such as a database connection or a recorder.
pub trait StatementSink {
    /// The error reported when a statement cannot be handled.
    type Error;

    /// Handles one statement, without its trailing delimiter.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement could not be handled.
    fn handle(&mut self, statement: &str) -> Result<(), Self::Error>;
}

impl StatementSink for Vec<String> {
    type Error = Infallible;

    fn handle(&mut self, statement: &str) -> Result<(), Self::Error> {
        self.push(statement.to_owned());
        Ok(())
    }
}

impl<S: StatementSink + ?Sized> StatementSink for &mut S {
    type Error = S::Error;

    fn handle(&mut self, statement: &str) -> Result<(), Self::Error> {
        (**self).handle(statement)
    }
}

/// A [`StatementSink`] backed by a closure. Created by [`sink_fn`].
#[derive(Debug, Clone)]
pub struct FnSink<F>(F);

/// Wraps a closure into a [`StatementSink`].
///
/// # Examples
///
/// ```
/// use sql_script_splitter::{ScriptRunner, sink_fn};
///
/// let mut lengths = Vec::new();
/// let mut runner = ScriptRunner::new(sink_fn(|statement: &str| {
///     lengths.push(statement.len());
///     Ok::<(), core::convert::Infallible>(())
/// }));
/// runner.execute("SELECT 1; SELECT 22").unwrap();
/// drop(runner);
/// assert_eq!(lengths, [8, 9]);
/// ```
#[must_use]
pub fn sink_fn<F, E>(f: F) -> FnSink<F>
where
    F: FnMut(&str) -> Result<(), E>,
{
    FnSink(f)
}

impl<F, E> StatementSink for FnSink<F>
where
    F: FnMut(&str) -> Result<(), E>,
{
    type Error = E;

    fn handle(&mut self, statement: &str) -> Result<(), Self::Error> {
        (self.0)(statement)
    }
}

/// Runs scripts statement by statement against a [`StatementSink`].
#[derive(Debug, Clone)]
pub struct ScriptRunner<S> {
    parser: ScriptParser,
    sink: S,
}

impl<S: StatementSink> ScriptRunner<S> {
    /// Creates a runner using the default [`ScriptParser`].
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_parser(ScriptParser::new(), sink)
    }

    /// Creates a runner using the given parser configuration.
    #[must_use]
    pub fn with_parser(parser: ScriptParser, sink: S) -> Self {
        Self { parser, sink }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub fn parser(&self) -> &ScriptParser {
        &self.parser
    }

    /// Returns the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the runner, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Splits `script` and forwards its statements to the sink in order.
    ///
    /// Returns the number of statements handled.
    ///
    /// # Errors
    ///
    /// * [`RunError::Malformed`] if the script cannot be split. The sink has
    ///   not been called.
    /// * [`RunError::Sink`] if the sink rejects a statement. Later statements
    ///   are not forwarded.
    pub fn execute(&mut self, script: &str) -> Result<usize, RunError<S::Error>> {
        let statements = self.parser.split(script).inspect_err(|error| {
            log::warn!("Refusing to run malformed script: {error}");
        })?;
        log::debug!("Running script with {} statement(s)", statements.len());

        for (index, statement) in statements.iter().enumerate() {
            log::trace!("Statement {index}: {statement}");
            if let Err(source) = self.sink.handle(statement) {
                log::warn!("Statement {index} failed, aborting script");
                return Err(RunError::Sink {
                    index,
                    statement: statement.clone(),
                    source,
                });
            }
        }
        Ok(statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MalformedScriptError;
    use alloc::vec;

    #[derive(Debug, PartialEq, Eq)]
    struct Rejected;

    #[test]
    fn test_records_statements() {
        let mut runner = ScriptRunner::new(Vec::new());
        let count = runner
            .execute("CREATE TABLE a (x INT);\n-- seed\nINSERT INTO a VALUES (1);")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            runner.into_sink(),
            ["CREATE TABLE a (x INT)", "INSERT INTO a VALUES (1)"]
        );
    }

    #[test]
    fn test_runs_accumulate() {
        let mut recorded: Vec<String> = Vec::new();
        let mut runner = ScriptRunner::new(&mut recorded);
        runner.execute("SELECT 1").unwrap();
        runner.execute("SELECT 2;").unwrap();
        assert_eq!(recorded, ["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn test_malformed_script_reaches_no_statement() {
        let mut runner = ScriptRunner::new(Vec::new());
        let error = runner.execute("SELECT 1; SELECT 'oops").unwrap_err();
        assert!(matches!(
            error,
            RunError::Malformed(MalformedScriptError::UnterminatedQuote { pos: 17, .. })
        ));
        assert!(runner.sink().is_empty());
    }

    #[test]
    fn test_sink_error_stops_the_run() {
        let mut seen = vec![];
        let mut runner = ScriptRunner::new(sink_fn(|statement: &str| {
            if statement.starts_with("DROP") {
                return Err(Rejected);
            }
            seen.push(statement.to_owned());
            Ok(())
        }));
        let error = runner
            .execute("SELECT 1; DROP TABLE a; SELECT 2;")
            .unwrap_err();
        drop(runner);

        match error {
            RunError::Sink {
                index,
                statement,
                source,
            } => {
                assert_eq!(index, 1);
                assert_eq!(statement, "DROP TABLE a");
                assert_eq!(source, Rejected);
            }
            RunError::Malformed(other) => panic!("unexpected error: {other}"),
        }
        assert_eq!(seen, ["SELECT 1"]);
    }

    #[test]
    fn test_custom_parser() {
        let parser = ScriptParser::new().with_delimiter('/');
        let mut runner = ScriptRunner::with_parser(parser, Vec::new());
        assert_eq!(runner.parser().delimiter(), '/');
        runner.execute("BEGIN NULL; END;\n/").unwrap();
        runner.sink_mut().push("marker".into());
        assert_eq!(runner.sink(), &["BEGIN NULL; END;", "marker"]);
    }
}
