use std::io;
use triplestream_model::Triple;

/// A syntax error found while scanning or interpreting a document.
///
/// Every error carries the 1-based line and row (column) of the offending token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TurtleSyntaxError {
    /// A word that matches none of the token shapes.
    #[error("Unexpected token when scanning '{token}' at line : {line} row : {column}")]
    UnrecognizedToken {
        token: String,
        line: usize,
        column: usize,
    },
    /// A prefix declaration whose name or IRI does not have the expected shape.
    #[error("Malformed prefix declaration when scanning '{token}' at line : {line} row : {column}, expected {expected}")]
    MalformedPrefixDeclaration {
        token: String,
        expected: &'static str,
        line: usize,
        column: usize,
    },
    /// A word following a complete prefix declaration on the same line.
    #[error("Unexpected token when scanning '{token}', expected a prefix definition at line : {line} row : {column}")]
    UnexpectedPrefixToken {
        token: String,
        line: usize,
        column: usize,
    },
    /// A `]` without a matching `[`, or a statement ending while a `[` is still open.
    #[error("Unbalanced blank node property list when scanning '{token}' at line : {line} row : {column}")]
    UnbalancedBlankNodeList {
        token: String,
        line: usize,
        column: usize,
    },
    /// A prefixed name whose prefix has not been declared.
    #[error("Undefined prefix '{prefix}' when scanning '{token}' at line : {line} row : {column}")]
    UndefinedPrefix {
        prefix: String,
        token: String,
        line: usize,
        column: usize,
    },
    /// A well-formed token in a position the grammar does not allow.
    #[error("Unexpected token when scanning '{token}' at line : {line} row : {column}, expected {expected}")]
    UnexpectedToken {
        token: String,
        expected: &'static str,
        line: usize,
        column: usize,
    },
    /// The input ended in the middle of a statement.
    #[error("Unexpected end of input after line : {line}, the last statement is incomplete")]
    UnexpectedEndOfInput { line: usize },
}

impl TurtleSyntaxError {
    /// Returns the line on which the error occurred.
    pub fn line(&self) -> usize {
        match self {
            Self::UnrecognizedToken { line, .. }
            | Self::MalformedPrefixDeclaration { line, .. }
            | Self::UnexpectedPrefixToken { line, .. }
            | Self::UnbalancedBlankNodeList { line, .. }
            | Self::UndefinedPrefix { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line } => *line,
        }
    }
}

/// An error raised while parsing a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TurtleParseError {
    /// The document is not valid.
    #[error(transparent)]
    Syntax(#[from] TurtleSyntaxError),
    /// The input could not be opened or read.
    #[error("Unreadable input: {0}")]
    Io(#[from] io::Error),
}

impl From<TurtleParseError> for io::Error {
    #[inline]
    fn from(error: TurtleParseError) -> Self {
        match error {
            TurtleParseError::Io(error) => error,
            TurtleParseError::Syntax(error) => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

/// The outcome of a parse that stopped on an error.
///
/// The triples of statements completed before the failure remain valid and are handed back.
#[derive(Debug, thiserror::Error)]
#[error("Parsing stopped after {} triples: {error}", .triples.len())]
pub struct IncompleteParse {
    pub triples: Vec<Triple>,
    #[source]
    pub error: TurtleParseError,
}
