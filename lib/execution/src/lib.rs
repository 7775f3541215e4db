//! This crate defines the query execution of triplestream.
//!
//! # Basic Graph Patterns
//!
//! A [`BgpNode`] matches one triple pattern against a [`Graph`](triplestream_common::Graph) and
//! produces one [`BindingsGroup`](triplestream_model::BindingsGroup) per match. Nodes are chained
//! into a [`BasicGraphPattern`] through [`BgpNode::execute_with`], which grounds the variables
//! already bound upstream before probing the graph:
//!
//! ```text
//! execute(p1) -> group -> execute_with(p2, group) -> group -> execute_with(p3, group) -> ...
//! ```
//!
//! All results are produced lazily. [`BasicGraphPattern::execute_pipelined`] additionally runs
//! every node in its own task, with backpressure through bounded channels and cancellation once
//! the consumer goes away.

mod bgp;
mod bgp_node;
mod config;
mod error;
mod pipeline;

pub use bgp::BasicGraphPattern;
pub use bgp_node::{BgpNode, BindingsStream};
pub use config::ExecutionConfig;
pub use error::QueryEvaluationError;
pub use pipeline::{spawn_triple_reader, TripleReader};
