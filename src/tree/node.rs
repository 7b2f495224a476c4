//! Condition tree nodes

use crate::element::{Comparison, LogicalConnective};
use smallvec::SmallVec;

/// Address of a node: child indices walked from the root
pub type NodePath = SmallVec<[usize; 8]>;

/// Node of a condition tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Comparison),
    Group(Group),
}

/// Connective-tagged node owning its children
///
/// A `not` group holds exactly one child; an `and`/`or` group holds at
/// least two once editing operations have settled. The one exception is a
/// parenthesized single operand such as `(A)`, decoded as a marked
/// one-child `and` group.
///
/// `parenthesized` records explicit parentheses read from a linear
/// condition that encoding would not add on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) connective: LogicalConnective,
    pub(crate) children: Vec<Node>,
    pub(crate) parenthesized: bool,
}

impl Group {
    pub fn connective(&self) -> LogicalConnective {
        self.connective
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn is_not(&self) -> bool {
        self.connective == LogicalConnective::Not
    }

    pub fn is_parenthesized(&self) -> bool {
        self.parenthesized
    }

    /// Marked one-child group standing for `(operand)`
    pub(crate) fn is_wrapper(&self) -> bool {
        self.parenthesized && !self.is_not() && self.children.len() == 1
    }
}

impl Node {
    pub fn leaf(comparison: Comparison) -> Self {
        Node::Leaf(comparison)
    }

    /// Negate a node
    pub fn not(child: Node) -> Self {
        Node::Group(Group {
            connective: LogicalConnective::Not,
            children: vec![child],
            parenthesized: false,
        })
    }

    pub fn and(children: Vec<Node>) -> Self {
        Node::Group(Group {
            connective: LogicalConnective::And,
            children,
            parenthesized: false,
        })
    }

    pub fn or(children: Vec<Node>) -> Self {
        Node::Group(Group {
            connective: LogicalConnective::Or,
            children,
            parenthesized: false,
        })
    }

    /// Mark a node as written in explicit parentheses
    ///
    /// An unmarked `and`/`or` group takes the mark itself. Anything else is
    /// wrapped in a marked one-child `and` group, so `(A)` and `((A or B))`
    /// stay distinct from `A` and `(A or B)`.
    pub fn parenthesized(node: Node) -> Self {
        match node {
            Node::Group(mut g) if !g.is_not() && !g.parenthesized && g.children.len() > 1 => {
                g.parenthesized = true;
                Node::Group(g)
            }
            other => Node::Group(Group {
                connective: LogicalConnective::And,
                children: vec![other],
                parenthesized: true,
            }),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        match self {
            Node::Leaf(c) => Some(c),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Leaf(_) => None,
        }
    }

    /// Connective of a group, `None` for leaves
    pub fn connective(&self) -> Option<LogicalConnective> {
        self.as_group().map(|g| g.connective)
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(g) => &g.children,
            Node::Leaf(_) => &[],
        }
    }

    pub fn is_parenthesized(&self) -> bool {
        matches!(self, Node::Group(g) if g.parenthesized)
    }

    pub fn is_not_group(&self) -> bool {
        matches!(self, Node::Group(g) if g.is_not())
    }

    /// Whether this is an `and`/`or` group new children can be added to
    pub fn is_binary_group(&self) -> bool {
        matches!(self, Node::Group(g) if !g.is_not())
    }

    /// Node at `path` below this one, or None if the path is invalid
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        let mut node = self;
        for &i in path {
            match node {
                Node::Group(g) => node = g.children.get(i)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub(crate) fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &i in path {
            match node {
                Node::Group(g) => node = g.children.get_mut(i)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub(crate) fn group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Leaf(_) => None,
        }
    }

    /// Paths of every leaf below this node, in document order
    pub fn leaf_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        let mut current = NodePath::new();
        self.collect_leaf_paths(&mut current, &mut paths);
        paths
    }

    fn collect_leaf_paths(&self, current: &mut NodePath, paths: &mut Vec<NodePath>) {
        match self {
            Node::Leaf(_) => paths.push(current.clone()),
            Node::Group(g) => {
                for (i, child) in g.children.iter().enumerate() {
                    current.push(i);
                    child.collect_leaf_paths(current, paths);
                    current.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Field, FieldKind};
    use crate::element::ComparisonOperator;
    use smallvec::smallvec;

    fn leaf(name: &str) -> Node {
        Node::leaf(
            Comparison::new(Field::new(name, FieldKind::Int32), ComparisonOperator::Equal, 1).unwrap(),
        )
    }

    #[test]
    fn test_get_by_path() {
        let tree = Node::and(vec![leaf("A"), Node::not(Node::or(vec![leaf("B"), leaf("C")]))]);

        assert_eq!(tree.get(&[]), Some(&tree));
        assert_eq!(tree.get(&[0]), Some(&leaf("A")));
        assert_eq!(tree.get(&[1, 0, 1]), Some(&leaf("C")));
        assert_eq!(tree.get(&[0, 0]), None);
        assert_eq!(tree.get(&[2]), None);
        assert_eq!(tree.get(&[1]).and_then(Node::connective), Some(LogicalConnective::Not));
    }

    #[test]
    fn test_leaf_paths_in_document_order() {
        let tree = Node::and(vec![leaf("A"), Node::not(Node::or(vec![leaf("B"), leaf("C")]))]);
        let expected: Vec<NodePath> = vec![smallvec![0], smallvec![1, 0, 0], smallvec![1, 0, 1]];
        assert_eq!(tree.leaf_paths(), expected);
        assert_eq!(leaf("A").leaf_paths(), vec![NodePath::new()]);
    }

    #[test]
    fn test_parenthesized_marks_or_wraps() {
        let marked = Node::parenthesized(Node::or(vec![leaf("A"), leaf("B")]));
        assert!(marked.is_parenthesized());
        assert_eq!(marked.children().len(), 2);

        let wrapped = Node::parenthesized(leaf("A"));
        assert!(wrapped.as_group().is_some_and(Group::is_wrapper));
        assert_eq!(wrapped.children(), &[leaf("A")]);

        let twice = Node::parenthesized(marked.clone());
        assert_eq!(twice.children(), &[marked]);

        let negated = Node::parenthesized(Node::not(leaf("A")));
        assert_eq!(negated.connective(), Some(LogicalConnective::And));
        assert!(negated.children()[0].is_not_group());
    }
}
