use crate::memory::snapshot::{MemGraphSnapshot, MemTriples};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;
use triplestream_common::{Graph, StorageResult, TripleStream};
use triplestream_model::{BlankNodeMatchingMode, Triple, TriplePattern};

/// A memory-based graph.
///
/// The triples live behind an [`Arc`] that readers clone to obtain a [`MemGraphSnapshot`]. Writers
/// copy the triples if a snapshot is still alive, so scans never observe concurrent writes.
#[derive(Debug, Default)]
pub struct MemGraph {
    triples: RwLock<Arc<MemTriples>>,
}

impl MemGraph {
    /// Creates a new empty [`MemGraph`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot of this graph.
    pub async fn snapshot(&self) -> MemGraphSnapshot {
        MemGraphSnapshot::new(Arc::clone(&*self.triples.read().await))
    }

    /// Removes all triples.
    pub async fn clear(&self) {
        *self.triples.write().await = Arc::default();
    }

    async fn transaction<T>(&self, action: impl FnOnce(&mut MemTriples) -> T) -> T {
        let mut triples = self.triples.write().await;
        action(Arc::make_mut(&mut triples))
    }
}

#[async_trait]
impl Graph for MemGraph {
    async fn add(&self, triple: Triple) -> StorageResult<bool> {
        Ok(self.transaction(|triples| triples.insert(triple)).await)
    }

    async fn extend(&self, triples: Vec<Triple>) -> StorageResult<usize> {
        let inserted = self
            .transaction(|stored| {
                triples
                    .into_iter()
                    .filter(|triple| stored.insert(triple.clone()))
                    .count()
            })
            .await;
        trace!("Inserted {inserted} triples");
        Ok(inserted)
    }

    async fn delete(&self, pattern: &TriplePattern) -> StorageResult<usize> {
        let removed = self
            .transaction(|triples| triples.remove_matching(pattern))
            .await;
        trace!("Removed {removed} triples matching {pattern}");
        Ok(removed)
    }

    async fn len(&self) -> StorageResult<usize> {
        Ok(self.triples.read().await.order.len())
    }

    async fn filter(
        &self,
        pattern: &TriplePattern,
        blank_node_mode: BlankNodeMatchingMode,
    ) -> StorageResult<TripleStream> {
        trace!("Scanning for {pattern}");
        let scan = self.snapshot().await.scan(pattern.clone(), blank_node_mode);
        Ok(stream::iter(scan.map(Ok)).boxed())
    }
}
