use crate::error::QueryEvaluationError;
use futures::stream::BoxStream;
use futures::{future, stream, StreamExt, TryStreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use triplestream_common::Graph;
use triplestream_model::{BindingsGroup, BlankNodeMatchingMode, Node, Triple, TriplePattern};

/// A lazy sequence of bindings produced while evaluating patterns.
pub type BindingsStream = BoxStream<'static, Result<BindingsGroup, QueryEvaluationError>>;

/// Matches one triple pattern against a [`Graph`].
///
/// Every position of the pattern holding a variable (or a blank node under
/// [`BlankNodeMatchingMode::Variable`]) is free. Each matching triple produces one
/// [`BindingsGroup`] binding the free positions to the matched nodes. Variables repeated within the
/// pattern only match triples where all their occurrences hold the same node.
#[derive(Clone, Debug)]
pub struct BgpNode {
    pattern: TriplePattern,
    graph: Arc<dyn Graph>,
    blank_node_mode: BlankNodeMatchingMode,
}

impl BgpNode {
    pub fn new(pattern: TriplePattern, graph: Arc<dyn Graph>) -> Self {
        Self {
            pattern,
            graph,
            blank_node_mode: BlankNodeMatchingMode::default(),
        }
    }

    #[must_use]
    pub fn with_blank_node_mode(mut self, blank_node_mode: BlankNodeMatchingMode) -> Self {
        self.blank_node_mode = blank_node_mode;
        self
    }

    pub fn pattern(&self) -> &TriplePattern {
        &self.pattern
    }

    /// Returns the names of the free positions, in subject, predicate, object order.
    pub fn variables(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.pattern
            .positions()
            .into_iter()
            .filter_map(|node| node.variable_name(self.blank_node_mode))
    }

    /// Streams one group per triple matching the pattern, in graph scan order.
    ///
    /// The graph is not queried before the stream is first polled.
    pub fn execute(&self) -> BindingsStream {
        self.execute_with(BindingsGroup::new())
    }

    /// Streams `incoming` extended with the bindings of every triple matching the pattern.
    ///
    /// Free variables already bound in `incoming` are replaced by their value before the graph is
    /// probed. Each produced group is an independent copy of `incoming`.
    pub fn execute_with(&self, incoming: BindingsGroup) -> BindingsStream {
        let (probe, free) = self.substitute(&incoming);
        let graph = Arc::clone(&self.graph);
        let blank_node_mode = self.blank_node_mode;

        let matches = async move {
            debug!("Probing graph with {probe}");
            graph.filter(&probe, blank_node_mode).await
        };
        stream::once(matches)
            .try_flatten()
            .map_err(QueryEvaluationError::from)
            .try_filter_map(move |triple| future::ready(Ok(bind(&incoming, &free, &triple))))
            .boxed()
    }

    /// Grounds the free positions bound in `incoming`. Returns the probe pattern and the positions
    /// that remain free, with their variable names.
    ///
    /// A position bound to a blank node stays free under [`BlankNodeMatchingMode::Variable`], as
    /// the probe would treat the blank node as a wildcard. [`bind`] then checks the bound value.
    fn substitute(&self, incoming: &BindingsGroup) -> (TriplePattern, Vec<(usize, String)>) {
        let mut free = Vec::new();
        let mut ground = |index: usize, node: &Node| -> Node {
            let Some(name) = node.variable_name(self.blank_node_mode) else {
                return node.clone();
            };
            match incoming.get(&name) {
                Some(bound) if !bound.is_wildcard(self.blank_node_mode) => bound.clone(),
                _ => {
                    free.push((index, name.into_owned()));
                    node.clone()
                }
            }
        };
        let probe = Triple {
            subject: ground(0, &self.pattern.subject),
            predicate: ground(1, &self.pattern.predicate),
            object: ground(2, &self.pattern.object),
        };
        (probe, free)
    }
}

/// Extends a copy of `incoming` with the free positions of `triple`. Returns `None` if a repeated
/// variable would be bound to two different nodes.
fn bind(
    incoming: &BindingsGroup,
    free: &[(usize, String)],
    triple: &Triple,
) -> Option<BindingsGroup> {
    let positions = triple.positions();
    let mut group = incoming.clone();
    free.iter()
        .all(|(index, name)| group.try_bind(name, positions[*index]))
        .then_some(group)
}
