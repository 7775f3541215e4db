use crate::memory::scan::MemGraphScan;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use triplestream_model::{BlankNodeMatchingMode, Triple, TriplePattern};

/// The triples of a [`MemGraph`](crate::memory::MemGraph) in insertion order, plus a hash index
/// that keeps `add` from storing duplicates.
#[derive(Clone, Debug, Default)]
pub(super) struct MemTriples {
    pub(super) order: Vec<Triple>,
    pub(super) index: FxHashSet<Triple>,
}

impl MemTriples {
    pub(super) fn insert(&mut self, triple: Triple) -> bool {
        if self.index.contains(&triple) {
            return false;
        }
        self.index.insert(triple.clone());
        self.order.push(triple);
        true
    }

    pub(super) fn remove_matching(&mut self, pattern: &TriplePattern) -> usize {
        let before = self.order.len();
        let index = &mut self.index;
        self.order.retain(|triple| {
            let matches = pattern.matches(triple, BlankNodeMatchingMode::Filter);
            if matches {
                index.remove(triple);
            }
            !matches
        });
        before - self.order.len()
    }
}

/// Provides a snapshot view on a [`MemGraph`](crate::memory::MemGraph). Writers can modify the
/// graph without changing the view of the snapshot.
#[derive(Clone, Debug)]
pub struct MemGraphSnapshot {
    triples: Arc<MemTriples>,
}

impl MemGraphSnapshot {
    pub(super) fn new(triples: Arc<MemTriples>) -> Self {
        Self { triples }
    }

    pub fn len(&self) -> usize {
        self.triples.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.order.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.index.contains(triple)
    }

    /// Iterates over the triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.order.iter()
    }

    /// Returns a lazy scan over the triples matching `pattern`.
    pub fn scan(
        &self,
        pattern: TriplePattern,
        blank_node_mode: BlankNodeMatchingMode,
    ) -> MemGraphScan {
        MemGraphScan::new(Arc::clone(&self.triples), pattern, blank_node_mode)
    }
}
