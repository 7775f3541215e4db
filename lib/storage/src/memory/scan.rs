use crate::memory::snapshot::MemTriples;
use std::sync::Arc;
use triplestream_model::{BlankNodeMatchingMode, Triple, TriplePattern};

/// An iterator over the triples of a snapshot that match a pattern.
///
/// Matches are computed one at a time as the iterator is advanced.
#[derive(Debug)]
pub struct MemGraphScan {
    triples: Arc<MemTriples>,
    pattern: TriplePattern,
    blank_node_mode: BlankNodeMatchingMode,
    position: usize,
}

impl MemGraphScan {
    pub(super) fn new(
        triples: Arc<MemTriples>,
        pattern: TriplePattern,
        blank_node_mode: BlankNodeMatchingMode,
    ) -> Self {
        Self {
            triples,
            pattern,
            blank_node_mode,
            position: 0,
        }
    }
}

impl Iterator for MemGraphScan {
    type Item = Triple;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(triple) = self.triples.order.get(self.position) {
            self.position += 1;
            if self.pattern.matches(triple, self.blank_node_mode) {
                return Some(triple.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.triples.order.len().saturating_sub(self.position)))
    }
}
