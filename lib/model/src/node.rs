use crate::{BlankNodeMatchingMode, Literal, TermError, TermResult};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// A node of an RDF graph or of a triple pattern.
///
/// The identity of a node is its kind together with its contents. Nodes are immutable once
/// constructed.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum Node {
    /// An [IRI](https://www.w3.org/TR/rdf11-concepts/#section-IRIs) naming a resource.
    Uri(String),
    /// A [literal](https://www.w3.org/TR/rdf11-concepts/#section-Graph-Literal).
    Literal(Literal),
    /// A [blank node](https://www.w3.org/TR/rdf11-concepts/#section-blank-nodes), identified by a
    /// document-scoped label.
    BlankNode(String),
    /// A pattern variable. Only meaningful inside triple patterns.
    Variable(String),
}

/// The kind of a [`Node`] without its contents.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum NodeKind {
    Uri,
    Literal,
    BlankNode,
    Variable,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NodeKind::Uri => "URI",
            NodeKind::Literal => "Literal",
            NodeKind::BlankNode => "Blank Node",
            NodeKind::Variable => "Variable",
        })
    }
}

impl Node {
    pub fn uri(value: impl Into<String>) -> Self {
        Node::Uri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(Literal::new_simple_literal(value))
    }

    pub fn blank_node(id: impl Into<String>) -> Self {
        Node::BlankNode(id.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable(name.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Uri(_) => NodeKind::Uri,
            Node::Literal(_) => NodeKind::Literal,
            Node::BlankNode(_) => NodeKind::BlankNode,
            Node::Variable(_) => NodeKind::Variable,
        }
    }

    /// Returns true if this node matches any other node under `mode`.
    pub fn is_wildcard(&self, mode: BlankNodeMatchingMode) -> bool {
        match self {
            Node::Variable(_) => true,
            Node::BlankNode(_) => mode == BlankNodeMatchingMode::Variable,
            _ => false,
        }
    }

    /// Returns the name under which this node is bound when it stands for a variable in a
    /// pattern, if any.
    ///
    /// Blank nodes are only treated as variables under [`BlankNodeMatchingMode::Variable`]. They
    /// are bound as `_:label` so that they never share a binding with the variable `?label`.
    pub fn variable_name(&self, mode: BlankNodeMatchingMode) -> Option<Cow<'_, str>> {
        match self {
            Node::Variable(name) => Some(Cow::Borrowed(name.as_str())),
            Node::BlankNode(id) if mode == BlankNodeMatchingMode::Variable => {
                Some(Cow::Owned(format!("_:{id}")))
            }
            _ => None,
        }
    }

    /// Strict equality.
    ///
    /// Fails with [`TermError::TypeMismatch`] if the two nodes are of different kinds.
    pub fn equals(&self, other: &Node) -> TermResult<bool> {
        match (self, other) {
            (Node::Uri(a), Node::Uri(b)) => Ok(a == b),
            (Node::Literal(a), Node::Literal(b)) => Ok(a == b),
            (Node::BlankNode(a), Node::BlankNode(b)) => Ok(a == b),
            (Node::Variable(a), Node::Variable(b)) => Ok(a == b),
            _ => TermError::type_mismatch(self.kind(), other.kind()),
        }
    }

    /// SPARQL-style equality used for pattern matching, treating blank nodes as variables.
    ///
    /// See [`Node::equivalent_with`].
    pub fn equivalent(&self, other: &Node) -> TermResult<bool> {
        self.equivalent_with(other, BlankNodeMatchingMode::default())
    }

    /// SPARQL-style equality used for pattern matching.
    ///
    /// If either operand is a wildcard under `mode` the result is `true`, whatever the kind of the
    /// other operand. Otherwise, the result is the one of [`Node::equals`], including the type
    /// mismatch for operands of different kinds.
    pub fn equivalent_with(&self, other: &Node, mode: BlankNodeMatchingMode) -> TermResult<bool> {
        if self.is_wildcard(mode) || other.is_wildcard(mode) {
            return Ok(true);
        }
        self.equals(other)
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Literal(literal)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Uri(value) => write!(f, "<{value}>"),
            Node::Literal(literal) => literal.fmt(f),
            Node::BlankNode(id) => write!(f, "_:{id}"),
            Node::Variable(name) => write!(f, "?{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<Node> {
        vec![
            Node::uri("http://example.com/foo"),
            Node::literal("Toto"),
            Node::Literal(Literal::new_language_tagged_literal("Toto", "en")),
            Node::blank_node("v"),
            Node::variable("x"),
        ]
    }

    #[test]
    fn nodes_are_equal_to_themselves() {
        for node in sample_nodes() {
            assert_eq!(node.equals(&node), Ok(true), "{node} must equal itself");
            assert_eq!(node.equivalent(&node), Ok(true), "{node} must be equivalent to itself");
        }
    }

    #[test]
    fn blank_node_variables_do_not_collide_with_named_variables() {
        let mode = BlankNodeMatchingMode::Variable;
        assert_eq!(Node::variable("x").variable_name(mode).as_deref(), Some("x"));
        assert_eq!(Node::blank_node("x").variable_name(mode).as_deref(), Some("_:x"));
        assert_eq!(Node::blank_node("x").variable_name(BlankNodeMatchingMode::Filter), None);
        assert_eq!(Node::uri("http://example.com/x").variable_name(mode), None);
    }

    #[test]
    fn equals_across_kinds_is_a_type_mismatch() {
        let uri = Node::uri("http://example.com/foo");
        let literal = Node::literal("Toto");
        let bnode = Node::blank_node("v");

        assert_eq!(
            uri.equals(&literal),
            Err(TermError::TypeMismatch {
                left: NodeKind::Uri,
                right: NodeKind::Literal
            })
        );
        assert!(uri.equals(&bnode).is_err());
        assert!(literal.equals(&bnode).is_err());
        assert!(bnode.equals(&uri).is_err());
    }

    #[test]
    fn equals_compares_contents() {
        assert_eq!(
            Node::uri("http://example.com/foo").equals(&Node::uri("http://example.com/bar")),
            Ok(false)
        );
        assert_eq!(Node::literal("20").equals(&Node::literal("Toto")), Ok(false));
        assert_eq!(
            Node::literal("20").equals(&Node::Literal(Literal::new_typed_literal(
                "20",
                crate::vocab::xsd::INTEGER
            ))),
            Ok(false)
        );
    }

    #[test]
    fn blank_nodes_and_variables_are_equivalent_to_anything() {
        for wildcard in [Node::blank_node("v"), Node::variable("x")] {
            for other in sample_nodes() {
                assert_eq!(wildcard.equivalent(&other), Ok(true));
                assert_eq!(other.equivalent(&wildcard), Ok(true));
            }
        }
    }

    #[test]
    fn equivalent_without_wildcards_matches_equals() {
        let uri = Node::uri("http://example.com/foo");
        let other_uri = Node::uri("http://example.com/bar");
        let literal = Node::literal("Toto");

        assert_eq!(uri.equivalent(&other_uri), uri.equals(&other_uri));
        assert!(uri.equivalent(&literal).is_err());
        assert!(literal.equivalent(&uri).is_err());
    }

    #[test]
    fn blank_nodes_are_constants_in_filter_mode() {
        let bnode = Node::blank_node("v");
        let mode = BlankNodeMatchingMode::Filter;

        assert_eq!(bnode.equivalent_with(&Node::blank_node("v"), mode), Ok(true));
        assert_eq!(bnode.equivalent_with(&Node::blank_node("w"), mode), Ok(false));
        assert!(bnode
            .equivalent_with(&Node::uri("http://example.com/foo"), mode)
            .is_err());
        assert_eq!(Node::variable("x").equivalent_with(&bnode, mode), Ok(true));
    }

    #[test]
    fn display_uses_ntriples_syntax() {
        let rendered = sample_nodes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec![
                "<http://example.com/foo>",
                "\"Toto\"",
                "\"Toto\"@en",
                "_:v",
                "?x"
            ]
        );
    }
}
