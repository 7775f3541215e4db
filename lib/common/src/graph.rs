use crate::{Slice, StorageResult};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;
use triplestream_model::{BlankNodeMatchingMode, Triple, TriplePattern};

/// A lazy sequence of triples produced by a [`Graph`].
pub type TripleStream = BoxStream<'static, StorageResult<Triple>>;

/// A store of triples that can be queried with triple patterns.
///
/// # Matching
///
/// A stored triple matches a pattern if every position of the pattern either is a wildcard
/// (a variable, or a blank node under [`BlankNodeMatchingMode::Variable`]) or is strictly equal to
/// the stored node. See [`Triple::matches`].
///
/// # Concurrency
///
/// Implementations must tolerate concurrent read-only queries, as sibling pattern evaluations may
/// probe the graph in parallel.
#[async_trait]
pub trait Graph: Debug + Send + Sync {
    /// Adds `triple` to the graph. Returns false if the triple was already present.
    async fn add(&self, triple: Triple) -> StorageResult<bool>;

    /// Adds all `triples` to the graph. Returns the number of triples that were not present yet.
    async fn extend(&self, triples: Vec<Triple>) -> StorageResult<usize> {
        let mut inserted = 0;
        for triple in triples {
            if self.add(triple).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Removes every stored triple matching `pattern`. Returns the number of removed triples.
    ///
    /// Variables of `pattern` match anything, while its blank nodes only match themselves.
    async fn delete(&self, pattern: &TriplePattern) -> StorageResult<usize>;

    /// Returns the number of triples in the graph.
    async fn len(&self) -> StorageResult<usize>;

    async fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Returns the stored triples matching `pattern`, in scan order.
    ///
    /// The stream is lazy: no matches are computed ahead of demand.
    async fn filter(
        &self,
        pattern: &TriplePattern,
        blank_node_mode: BlankNodeMatchingMode,
    ) -> StorageResult<TripleStream>;

    /// Returns the window `slice` of the matches of [`Graph::filter`], preserving their order.
    async fn filter_subset(
        &self,
        pattern: &TriplePattern,
        blank_node_mode: BlankNodeMatchingMode,
        slice: Slice,
    ) -> StorageResult<TripleStream> {
        let stream = self.filter(pattern, blank_node_mode).await?;
        Ok(slice.apply(stream))
    }
}
