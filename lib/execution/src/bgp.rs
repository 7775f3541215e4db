use crate::bgp_node::{BgpNode, BindingsStream};
use crate::config::ExecutionConfig;
use crate::pipeline::spawn_pipeline;
use futures::{future, stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use triplestream_common::Graph;
use triplestream_model::{BindingsGroup, TriplePattern};

/// A conjunction of triple patterns, evaluated as a left-deep index nested-loop join.
///
/// The first node is executed on its own. Every group it produces probes the second node through
/// [`BgpNode::execute_with`], and so on. Nodes are joined in the given order.
#[derive(Clone, Debug, Default)]
pub struct BasicGraphPattern {
    nodes: Vec<BgpNode>,
}

impl BasicGraphPattern {
    pub fn new(nodes: Vec<BgpNode>) -> Self {
        Self { nodes }
    }

    /// Creates one node per pattern, all matching against `graph`.
    pub fn from_patterns(
        patterns: impl IntoIterator<Item = TriplePattern>,
        graph: &Arc<dyn Graph>,
        config: &ExecutionConfig,
    ) -> Self {
        let nodes = patterns
            .into_iter()
            .map(|pattern| {
                BgpNode::new(pattern, Arc::clone(graph))
                    .with_blank_node_mode(config.blank_node_mode)
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[BgpNode] {
        &self.nodes
    }

    /// Returns the variables of all patterns in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut variables: Vec<String> = Vec::new();
        for name in self.nodes.iter().flat_map(BgpNode::variables) {
            if !variables.iter().any(|known| *known == name) {
                variables.push(name.into_owned());
            }
        }
        variables
    }

    /// Streams the joined groups. An empty pattern yields a single empty group.
    pub fn execute(&self) -> BindingsStream {
        let Some((first, rest)) = self.nodes.split_first() else {
            return stream::once(future::ready(Ok(BindingsGroup::new()))).boxed();
        };
        rest.iter().fold(first.execute(), |groups, node| {
            let node = node.clone();
            groups
                .and_then(move |group| future::ready(Ok(node.execute_with(group))))
                .try_flatten()
                .boxed()
        })
    }

    /// Like [`BasicGraphPattern::execute`], but every node runs in its own task, connected to the
    /// next through a bounded channel. Dropping the returned stream stops all tasks.
    ///
    /// Must be called within a Tokio runtime.
    pub fn execute_pipelined(&self, config: &ExecutionConfig) -> BindingsStream {
        spawn_pipeline(&self.nodes, config.channel_capacity.max(1))
    }
}
