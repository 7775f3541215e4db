use std::io;
use triplestream_common::error::StorageError;
use triplestream_execution::QueryEvaluationError;
use triplestream_parser::TurtleParseError;

/// An error raised while loading a document into a [`Store`](crate::store::Store).
///
/// Triples parsed before the error stay in the store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoaderError {
    /// The document could not be read or is invalid.
    #[error("Loading stopped after inserting {inserted} triples: {error}")]
    Parsing {
        /// The number of triples inserted before the error.
        inserted: usize,
        #[source]
        error: TurtleParseError,
    },
    /// An error raised during the insertion in the store.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The background parsing task failed.
    #[error(transparent)]
    Reader(#[from] QueryEvaluationError),
}

impl From<LoaderError> for io::Error {
    #[inline]
    fn from(error: LoaderError) -> Self {
        match error {
            LoaderError::Parsing { error, .. } => error.into(),
            LoaderError::Storage(error) => error.into(),
            LoaderError::Reader(error) => error.into(),
        }
    }
}
