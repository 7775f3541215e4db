pub mod error;
mod graph;
mod slice;

pub use graph::{Graph, TripleStream};
pub use slice::Slice;

pub type StorageResult<T> = Result<T, error::StorageError>;
