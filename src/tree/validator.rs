//! Completeness check for condition trees

use crate::tree::{Node, NodePath};

/// First incomplete leaf in document order
///
/// A leaf is incomplete when its comparison has no field, no value, or an
/// empty string value for a field that is not text.
pub fn find_first_invalid(node: &Node) -> Option<&Node> {
    match node {
        Node::Leaf(c) if !c.is_complete() => Some(node),
        Node::Leaf(_) => None,
        Node::Group(g) => g.children().iter().find_map(find_first_invalid),
    }
}

/// Path of the first incomplete leaf, relative to `node`
pub fn find_first_invalid_path(node: &Node) -> Option<NodePath> {
    match node {
        Node::Leaf(c) if !c.is_complete() => Some(NodePath::new()),
        Node::Leaf(_) => None,
        Node::Group(g) => g.children().iter().enumerate().find_map(|(i, child)| {
            find_first_invalid_path(child).map(|mut path| {
                path.insert(0, i);
                path
            })
        }),
    }
}
