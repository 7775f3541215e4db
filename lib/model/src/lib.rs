//! The term model of triplestream: RDF nodes, triples, and the bindings produced while matching
//! triple patterns.
//!
//! Two comparison modes exist. [`Node::equals`] is strict and refuses to compare nodes of different
//! kinds. [`Node::equivalent`] is the SPARQL-style comparison used for pattern matching, where
//! variables (and, depending on the [`BlankNodeMatchingMode`], blank nodes) match anything.

mod bindings;
mod blank_node_mode;
mod error;
mod literal;
mod node;
mod triple;
pub mod vocab;

pub use bindings::BindingsGroup;
pub use blank_node_mode::BlankNodeMatchingMode;
pub use error::{TermError, TermResult};
pub use literal::Literal;
pub use node::{Node, NodeKind};
pub use triple::{Triple, TriplePattern};
