use crate::NodeKind;
use thiserror::Error;

/// The result of comparing two terms.
pub type TermResult<T> = Result<T, TermError>;

/// An error raised by the term comparison algebra.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TermError {
    /// The two operands are of different kinds and no boolean result is meaningful.
    #[error("Type mismatch: cannot compare a {left} with a {right}")]
    TypeMismatch { left: NodeKind, right: NodeKind },
}

impl TermError {
    pub fn type_mismatch<T>(left: NodeKind, right: NodeKind) -> TermResult<T> {
        Err(TermError::TypeMismatch { left, right })
    }
}
