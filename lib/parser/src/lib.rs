//! Streaming parsers for the Turtle and N-Triples subsets understood by triplestream.
//!
//! Parsing runs in three pull-based stages. The [`Lexer`] cuts each input line into [`Segment`]s
//! following a [`SplitRule`], the [`Tokenizer`] classifies segments into [`Token`]s (and scans
//! prefix declarations), and the [`TurtleParser`] interprets tokens into [`Triple`]s. Nothing is
//! read ahead of what the consumer pulls.
//!
//! [`Triple`]: triplestream_model::Triple

mod config;
mod error;
mod lexer;
mod ntriples;
mod token;
mod tokenizer;
mod turtle;

pub use config::{ParserConfig, SplitRule};
pub use error::{IncompleteParse, TurtleParseError, TurtleSyntaxError};
pub use lexer::{LexedLine, Lexer, Segment};
pub use ntriples::NTriplesParser;
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
pub use turtle::TurtleParser;
