//! Interactive editing of condition trees

use crate::condition::{Condition, FilterSnapshot};
use crate::element::Comparison;
use crate::error::{FilterError, Result};
use crate::tree::convert::{to_condition, to_tree};
use crate::tree::validator::find_first_invalid_path;
use crate::tree::{Node, NodePath};

/// Condition tree being built by one editing session
///
/// Every operation addresses nodes by [`NodePath`] and keeps the tree in
/// shape: `not` groups hold one child and `and`/`or` groups are dissolved as
/// soon as they are left with a single child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionTree {
    root: Option<Node>,
}

impl ConditionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: Node) -> Self {
        Self { root: Some(root) }
    }

    /// Decode a stored condition for editing
    pub fn from_condition(condition: &Condition) -> Result<Self> {
        Ok(Self {
            root: to_tree(condition)?,
        })
    }

    /// Encode the tree as it stands, incomplete leaves included
    pub fn to_condition(&self) -> Result<Condition> {
        match &self.root {
            Some(root) => to_condition(root),
            None => Ok(Condition::new()),
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        self.root.as_ref()?.get(path)
    }

    fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        self.root.as_mut()?.get_mut(path)
    }

    /// Paths of every leaf in document order
    pub fn leaves(&self) -> impl Iterator<Item = NodePath> {
        self.root
            .as_ref()
            .map(Node::leaf_paths)
            .unwrap_or_default()
            .into_iter()
    }

    /// Path of the first incomplete leaf, if any
    pub fn find_first_invalid(&self) -> Option<NodePath> {
        self.root.as_ref().and_then(find_first_invalid_path)
    }

    /// Validate and freeze the tree into an executable filter
    pub fn compile(&self) -> Result<FilterSnapshot> {
        if let Some(path) = self.find_first_invalid() {
            log::debug!("compile refused: incomplete leaf at {:?}", path);
            return Err(FilterError::IncompleteCondition(path));
        }
        Ok(self.to_condition()?.snapshot())
    }

    /// Add a comparison and return its path
    ///
    /// An empty tree takes the leaf as its root. A leaf or `not` root is
    /// paired with the new leaf under a fresh `and` root. Otherwise the leaf
    /// joins the selected `and`/`or` group, or the root group when nothing
    /// suitable is selected.
    pub fn add_leaf(&mut self, comparison: Comparison, selected: Option<&[usize]>) -> NodePath {
        let leaf = Node::leaf(comparison);
        let root = match self.root.take() {
            None => {
                log::debug!("add_leaf: tree was empty, leaf becomes root");
                self.root = Some(leaf);
                return NodePath::new();
            }
            Some(root) => root,
        };

        if !root.is_binary_group() {
            log::debug!("add_leaf: wrapping root and new leaf in an 'and' group");
            self.root = Some(Node::and(vec![root, leaf]));
            return NodePath::from_slice(&[1]);
        }
        self.root = Some(root);

        let target: NodePath = selected
            .filter(|path| self.get(path).is_some_and(Node::is_binary_group))
            .map(NodePath::from_slice)
            .unwrap_or_default();

        let mut path = target.clone();
        if let Some(group) = self.get_mut(&target).and_then(Node::group_mut) {
            group.children.push(leaf);
            path.push(group.children.len() - 1);
        }
        log::debug!("add_leaf: appended leaf at {:?}", path);
        path
    }

    /// Whether `selection` can be wrapped in a new group
    ///
    /// Requires two or more distinct existing siblings of one `and`/`or`
    /// parent that do not make up all of its children.
    pub fn is_groupable(&self, selection: &[NodePath]) -> bool {
        sibling_indices(selection)
            .and_then(|(parent, indices)| {
                let group = self.get(&parent)?.as_group()?;
                let in_bounds = indices.last().is_some_and(|&last| last < group.children.len());
                Some(!group.is_not() && in_bounds && indices.len() < group.children.len())
            })
            .unwrap_or(false)
    }

    /// Wrap the selected siblings in a new `and` group
    ///
    /// The group takes the place of the first selected node and holds the
    /// selection in document order. Returns its path, or `None` when the
    /// selection is not groupable.
    pub fn group(&mut self, selection: &[NodePath]) -> Option<NodePath> {
        if !self.is_groupable(selection) {
            return None;
        }
        let (parent_path, indices) = sibling_indices(selection)?;
        let parent = self.get_mut(&parent_path)?.group_mut()?;

        let mut taken: Vec<Node> = indices
            .iter()
            .rev()
            .map(|&i| parent.children.remove(i))
            .collect();
        taken.reverse();

        let first = indices[0];
        parent.children.insert(first, Node::and(taken));

        let mut path = parent_path;
        path.push(first);
        log::debug!("group: wrapped {} nodes into new group at {:?}", indices.len(), path);
        Some(path)
    }

    /// Whether the group at `path` can be spliced into its parent
    pub fn is_ungroupable(&self, path: &[usize]) -> bool {
        let Some((_, parent_path)) = path.split_last() else {
            return false;
        };
        let is_binary = |p: &[usize]| self.get(p).is_some_and(Node::is_binary_group);
        is_binary(path) && is_binary(parent_path)
    }

    /// Replace an `and`/`or` group by its children, in place
    ///
    /// Undoes [`ConditionTree::group`]. Returns the path of the first
    /// spliced child.
    pub fn ungroup(&mut self, path: &[usize]) -> Option<NodePath> {
        if !self.is_ungroupable(path) {
            return None;
        }
        let (&index, parent_path) = path.split_last()?;
        let parent = self.get_mut(parent_path)?.group_mut()?;
        let children = match parent.children.remove(index) {
            Node::Group(g) => g.children,
            leaf => vec![leaf],
        };
        let count = children.len();
        parent.children.splice(index..index, children);

        log::debug!("ungroup: spliced {} children at {:?}", count, path);
        Some(NodePath::from_slice(path))
    }

    /// Toggle negation on every selected node
    ///
    /// A `not` group is replaced by its operand; anything else is wrapped in
    /// a new `not` group. Nodes keep their positions.
    pub fn invert(&mut self, selection: &[NodePath]) {
        let mut paths: Vec<&NodePath> = selection.iter().collect();
        // descendants first so ancestor paths stay valid
        paths.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        paths.dedup();

        for path in paths {
            let Some(slot) = self.get_mut(path) else {
                continue;
            };
            let node = std::mem::replace(slot, Node::leaf(Comparison::blank()));
            *slot = match node {
                Node::Group(mut g) if g.is_not() && g.children.len() == 1 => {
                    log::debug!("invert: removing 'not' at {:?}", path);
                    g.children.remove(0)
                }
                other => {
                    log::debug!("invert: negating node at {:?}", path);
                    Node::not(other)
                }
            };
        }
    }

    /// Swap a node with its previous sibling; returns its new path
    pub fn move_up(&mut self, path: &[usize]) -> Option<NodePath> {
        let (&index, parent_path) = path.split_last()?;
        if index == 0 {
            return None;
        }
        self.swap_siblings(parent_path, index - 1, index)?;
        let mut moved = NodePath::from_slice(parent_path);
        moved.push(index - 1);
        Some(moved)
    }

    /// Swap a node with its next sibling; returns its new path
    pub fn move_down(&mut self, path: &[usize]) -> Option<NodePath> {
        let (&index, parent_path) = path.split_last()?;
        let next = index.checked_add(1)?;
        self.swap_siblings(parent_path, index, next)?;
        let mut moved = NodePath::from_slice(parent_path);
        moved.push(next);
        Some(moved)
    }

    fn swap_siblings(&mut self, parent_path: &[usize], a: usize, b: usize) -> Option<()> {
        let parent = self.get_mut(parent_path)?.group_mut()?;
        if b >= parent.children.len() {
            return None;
        }
        parent.children.swap(a, b);
        log::debug!("swapped children {} and {} of {:?}", a, b, parent_path);
        Some(())
    }

    /// Remove the node at `path` and return it
    ///
    /// An `and`/`or` parent left with one child is dissolved into its own
    /// parent (or becomes the root). A `not` parent left empty is deleted in
    /// turn, with the same rule applied further up. Deleting the root
    /// empties the tree.
    pub fn delete(&mut self, path: &[usize]) -> Option<Node> {
        let Some((&index, parent_path)) = path.split_last() else {
            log::debug!("delete: removing root");
            return self.root.take();
        };

        let parent = self.get_mut(parent_path)?.group_mut()?;
        if index >= parent.children.len() {
            return None;
        }
        let removed = parent.children.remove(index);
        let dissolve = match parent.children.len() {
            0 => None,
            1 if !parent.is_not() => parent.children.pop(),
            _ => return Some(removed),
        };

        match dissolve {
            Some(only) => {
                log::debug!("delete: dissolving group at {:?}", parent_path);
                self.replace(parent_path, only);
            }
            None => {
                log::debug!("delete: removing emptied group at {:?}", parent_path);
                self.delete(parent_path);
            }
        }
        Some(removed)
    }

    fn replace(&mut self, path: &[usize], node: Node) {
        if path.is_empty() {
            self.root = Some(node);
        } else if let Some(slot) = self.get_mut(path) {
            *slot = node;
        }
    }
}

/// Common parent and sorted child indices of a sibling selection
fn sibling_indices(selection: &[NodePath]) -> Option<(NodePath, Vec<usize>)> {
    if selection.len() < 2 {
        return None;
    }
    let (_, parent) = selection[0].split_last()?;
    let mut indices = Vec::with_capacity(selection.len());
    for path in selection {
        let (&index, p) = path.split_last()?;
        if p != parent {
            return None;
        }
        indices.push(index);
    }
    indices.sort_unstable();
    indices.dedup();
    if indices.len() != selection.len() {
        return None;
    }
    Some((NodePath::from_slice(parent), indices))
}

impl From<Node> for ConditionTree {
    fn from(root: Node) -> Self {
        Self::from_root(root)
    }
}

impl TryFrom<&Condition> for ConditionTree {
    type Error = FilterError;

    fn try_from(condition: &Condition) -> Result<Self> {
        Self::from_condition(condition)
    }
}
