use std::io;
use tokio::task::JoinError;
use triplestream_common::error::StorageError;

/// An error raised while evaluating a query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// An error from the graph.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The consumer stopped before the stage could deliver all of its results.
    #[error("The pipeline stage was cancelled before completing")]
    Cancelled,
    /// A pipeline stage panicked or was aborted.
    #[error("A pipeline stage failed to complete: {0}")]
    Join(#[from] JoinError),
}

impl From<QueryEvaluationError> for io::Error {
    #[inline]
    fn from(error: QueryEvaluationError) -> Self {
        match error {
            QueryEvaluationError::Storage(error) => error.into(),
            error @ QueryEvaluationError::Cancelled => {
                Self::new(io::ErrorKind::Interrupted, error)
            }
            QueryEvaluationError::Join(error) => Self::other(error),
        }
    }
}
