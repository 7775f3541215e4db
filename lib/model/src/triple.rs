use crate::{BlankNodeMatchingMode, Node, TermResult};
use std::fmt::{Display, Formatter};

/// An RDF [triple](https://www.w3.org/TR/rdf11-concepts/#section-triples).
///
/// The same type doubles as a triple pattern, in which case zero or more positions hold a
/// [`Node::Variable`] (or a blank node acting as one).
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

/// A triple whose positions may be variables.
pub type TriplePattern = Triple;

impl Triple {
    pub fn new(
        subject: impl Into<Node>,
        predicate: impl Into<Node>,
        object: impl Into<Node>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns the three positions in subject, predicate, object order.
    pub fn positions(&self) -> [&Node; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Position-wise strict equality. The first failing comparison is returned as the error.
    pub fn equals(&self, other: &Triple) -> TermResult<bool> {
        let subject = self.subject.equals(&other.subject)?;
        let predicate = self.predicate.equals(&other.predicate)?;
        let object = self.object.equals(&other.object)?;
        Ok(subject && predicate && object)
    }

    /// Position-wise [`Node::equivalent`]. The first failing comparison is returned as the error.
    pub fn equivalent(&self, other: &Triple) -> TermResult<bool> {
        self.equivalent_with(other, BlankNodeMatchingMode::default())
    }

    /// Position-wise [`Node::equivalent_with`].
    pub fn equivalent_with(&self, other: &Triple, mode: BlankNodeMatchingMode) -> TermResult<bool> {
        let subject = self.subject.equivalent_with(&other.subject, mode)?;
        let predicate = self.predicate.equivalent_with(&other.predicate, mode)?;
        let object = self.object.equivalent_with(&other.object, mode)?;
        Ok(subject && predicate && object)
    }

    /// Returns true if `candidate` matches this triple used as a pattern.
    ///
    /// Only the wildcards of the pattern are honored: blank nodes stored in `candidate` are
    /// constants. Comparisons of different node kinds are a non-match.
    pub fn matches(&self, candidate: &Triple, mode: BlankNodeMatchingMode) -> bool {
        self.positions()
            .into_iter()
            .zip(candidate.positions())
            .all(|(pattern, term)| pattern.is_wildcard(mode) || pattern.equals(term) == Ok(true))
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
