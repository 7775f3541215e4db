use crate::Node;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// An assignment of variable names to concrete nodes, representing one (partial) query answer.
///
/// Groups flowing through successive pattern matches are extended by copy: [`Clone`] produces an
/// independent group, so branches that share an ancestor never observe each other's bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingsGroup {
    bindings: FxHashMap<String, Node>,
}

impl BindingsGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&Node> {
        self.bindings.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Binds `variable` to `node`, returning the previous binding.
    pub fn bind(&mut self, variable: impl Into<String>, node: Node) -> Option<Node> {
        self.bindings.insert(variable.into(), node)
    }

    /// Returns an independent copy of this group with `variable` bound to `node`.
    #[must_use]
    pub fn extended(&self, variable: impl Into<String>, node: Node) -> Self {
        let mut group = self.clone();
        group.bind(variable, node);
        group
    }

    /// Binds `variable` to `node` unless it is already bound to a different node.
    ///
    /// Returns whether the group is consistent with the binding afterward.
    pub fn try_bind(&mut self, variable: &str, node: &Node) -> bool {
        match self.bindings.get(variable) {
            Some(bound) => bound == node,
            None => {
                self.bindings.insert(variable.to_owned(), node.clone());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.bindings.iter().map(|(name, node)| (name.as_str(), node))
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for BindingsGroup {
    fn from_iter<T: IntoIterator<Item = (K, Node)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Display for BindingsGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bindings = self
            .iter()
            .sorted_by_key(|(name, _)| *name)
            .map(|(name, node)| format!("{name}: {node}"))
            .join(", ");
        write!(f, "{{{bindings}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_independent() {
        let mut group = BindingsGroup::new();
        group.bind("x", Node::uri("http://example.com/Tom"));

        let mut left = group.clone();
        let mut right = group.clone();
        left.bind("y", Node::literal("22"));
        right.bind("y", Node::literal("30"));

        assert_eq!(group.len(), 1);
        assert_eq!(left.get("y"), Some(&Node::literal("22")));
        assert_eq!(right.get("y"), Some(&Node::literal("30")));
    }

    #[test]
    fn try_bind_rejects_conflicting_bindings() {
        let mut group = BindingsGroup::new();
        assert!(group.try_bind("x", &Node::literal("a")));
        assert!(group.try_bind("x", &Node::literal("a")));
        assert!(!group.try_bind("x", &Node::literal("b")));
        assert_eq!(group.get("x"), Some(&Node::literal("a")));
    }

    #[test]
    fn display_is_sorted_by_variable() {
        let group: BindingsGroup = [
            ("y", Node::literal("22")),
            ("x", Node::uri("http://example.com/Tom")),
        ]
        .into_iter()
        .collect();
        insta::assert_snapshot!(group, @r#"{x: <http://example.com/Tom>, y: "22"}"#);
    }
}
