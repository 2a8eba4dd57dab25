use crate::iter::Iter;
use crate::node::{Node, NodeId, Side};
use anyhow::{ensure, Context, Result};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A binary tree stored as an arena of nodes linked by [`NodeId`]s.
///
/// Nodes are only ever created as the root or in an empty child slot of an
/// existing node, so at rest the links always form a proper tree: every node
/// is reachable from the root and has exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryTree<T> {
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) root: Option<NodeId>,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BinaryTree<T> {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        BinaryTree {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).map(|node| &mut node.value)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::right)
    }

    /// All node ids in arena (creation) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Places `value` at the root of an empty tree.
    pub fn set_root(&mut self, value: T) -> Result<NodeId> {
        ensure!(self.root.is_none(), "tree already has a root");
        let id = self.push(value);
        self.root = Some(id);
        Ok(id)
    }

    /// Creates a node holding `value` in the empty `side` slot of `parent`.
    pub fn attach(&mut self, parent: NodeId, side: Side, value: T) -> Result<NodeId> {
        ensure!(
            parent.0 < self.nodes.len(),
            "node {parent} does not belong to this tree"
        );
        ensure!(
            self.nodes[parent.0].child(side).is_none(),
            "{side:?} slot of node {parent} is already occupied"
        );
        Ok(self.push_child(parent, side, value))
    }

    fn push(&mut self, value: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(value));
        id
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, side: Side, value: T) -> NodeId {
        let id = self.push(value);
        *self.nodes[parent.0].child_mut(side) = Some(id);
        id
    }

    /// Inserts a new value using the BST rule: values less than a node go
    /// left, values greater or equal go right.
    pub fn insert(&mut self, new_value: T) -> NodeId
    where
        T: Ord,
    {
        let Some(mut current) = self.root else {
            let id = self.push(new_value);
            self.root = Some(id);
            return id;
        };
        loop {
            let node = &self.nodes[current.0];
            let side = if new_value < node.value {
                Side::Left
            } else {
                Side::Right
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return self.push_child(current, side, new_value),
            }
        }
    }

    /// Builds a BST by inserting the values one by one.
    /// (If the provided vector is empty, the resulting tree will be empty.)
    pub fn from_vec(values: Vec<T>) -> Self
    where
        T: Ord,
    {
        let mut tree = BinaryTree::new();
        for val in values {
            tree.insert(val);
        }
        tree
    }

    /// Builds a tree from a level-order listing where `None` marks an absent
    /// child, e.g. `[Some(1), None, Some(2), Some(3)]`.
    ///
    /// Trailing `None`s are ignored. A value that has no free parent slot left
    /// is an error.
    pub fn from_level_order<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let mut items = items.into_iter();
        let mut tree = BinaryTree::new();
        let Some(root) = items.next().flatten() else {
            ensure!(
                items.all(|item| item.is_none()),
                "level order has values below an absent root"
            );
            return Ok(tree);
        };

        let mut parents = VecDeque::from([tree.set_root(root)?]);
        while let Some(parent) = parents.pop_front() {
            for side in [Side::Left, Side::Right] {
                match items.next() {
                    Some(Some(value)) => parents.push_back(tree.push_child(parent, side, value)),
                    Some(None) => {}
                    None => return Ok(tree),
                }
            }
        }
        ensure!(
            items.all(|item| item.is_none()),
            "level order has values with no parent slot left"
        );
        Ok(tree)
    }

    /// Parses a level-order listing such as `[2,1,3,null,4]`.
    ///
    /// Brackets are optional, whitespace around entries is ignored and both
    /// `null` and `#` mark an absent child.
    pub fn parse_level_order(input: &str) -> Result<Self>
    where
        T: FromStr,
        T::Err: Error + Send + Sync + 'static,
    {
        let trimmed = input.trim();
        let inner = trimmed.strip_prefix('[').unwrap_or(trimmed);
        let inner = inner.strip_suffix(']').unwrap_or(inner).trim();
        if inner.is_empty() {
            return Ok(BinaryTree::new());
        }

        let items = inner
            .split(',')
            .enumerate()
            .map(|(position, token)| match token.trim() {
                "null" | "#" => Ok(None),
                value => value
                    .parse::<T>()
                    .map(Some)
                    .with_context(|| format!("invalid value {value:?} at position {position}")),
            })
            .collect::<Result<Vec<_>>>()?;
        BinaryTree::from_level_order(items)
    }

    /// Level-order listing of the tree with trailing `None`s trimmed; the
    /// inverse of [`from_level_order`](Self::from_level_order).
    pub fn to_level_order(&self) -> Vec<Option<&T>> {
        let mut result = Vec::with_capacity(self.nodes.len() * 2 + 1);
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            result.push(Some(&self.nodes[root.0].value));
            queue.push_back(root);
        }
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id.0];
            for child in [node.left, node.right] {
                match child {
                    Some(child) => {
                        result.push(Some(&self.nodes[child.0].value));
                        queue.push_back(child);
                    }
                    None => result.push(None),
                }
            }
        }
        while matches!(result.last(), Some(None)) {
            result.pop();
        }
        result
    }

    /// Returns the first node in in-order that holds `value`.
    pub fn find(&self, value: &T) -> Option<NodeId>
    where
        T: PartialEq,
    {
        self.iter().find(|(_, v)| *v == value).map(|(id, _)| id)
    }

    /// Stack-based in-order iterator. Borrows the tree immutably and never
    /// touches its links.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns the in-order traversal of the tree as a vector. In-order
    /// traversal of a BST produces the values in sorted order.
    pub fn in_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.len());
        self.collect_in_order(self.root, &mut result);
        result
    }

    fn collect_in_order<'a>(&'a self, id: Option<NodeId>, result: &mut Vec<&'a T>) {
        if let Some(id) = id {
            let node = &self.nodes[id.0];
            self.collect_in_order(node.left, result);
            result.push(&node.value);
            self.collect_in_order(node.right, result);
        }
    }

    pub fn pre_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.len());
        self.collect_pre_order(self.root, &mut result);
        result
    }

    fn collect_pre_order<'a>(&'a self, id: Option<NodeId>, result: &mut Vec<&'a T>) {
        if let Some(id) = id {
            let node = &self.nodes[id.0];
            result.push(&node.value);
            self.collect_pre_order(node.left, result);
            self.collect_pre_order(node.right, result);
        }
    }

    pub fn post_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.len());
        self.collect_post_order(self.root, &mut result);
        result
    }

    fn collect_post_order<'a>(&'a self, id: Option<NodeId>, result: &mut Vec<&'a T>) {
        if let Some(id) = id {
            let node = &self.nodes[id.0];
            self.collect_post_order(node.left, result);
            self.collect_post_order(node.right, result);
            result.push(&node.value);
        }
    }

    /// Node ids in post-order, gathered with an explicit stack of
    /// `(id, children_pushed)` frames so tree height never reaches the call
    /// stack.
    fn post_order_ids(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, bool)> = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, false));
        }
        while let Some((id, children_pushed)) = stack.pop() {
            if children_pushed {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            let node = &self.nodes[id.0];
            if let Some(right) = node.right {
                stack.push((right, false));
            }
            if let Some(left) = node.left {
                stack.push((left, false));
            }
        }
        order
    }

    /// Folds the tree bottom-up: `combine` gets each node together with the
    /// records already built for its left and right subtrees and returns the
    /// node's own record. Returns the root's record.
    ///
    /// Pending records live in one slot per node id, so the fold works on
    /// trees of any height.
    pub(crate) fn fold_post_order<'a, R, F>(&'a self, mut combine: F) -> Option<R>
    where
        F: FnMut(NodeId, &'a Node<T>, Option<R>, Option<R>) -> R,
    {
        let mut records: Vec<Option<R>> = self.nodes.iter().map(|_| None).collect();
        for id in self.post_order_ids() {
            let node = &self.nodes[id.0];
            let left = node.left.and_then(|left| records[left.0].take());
            let right = node.right.and_then(|right| records[right.0].take());
            records[id.0] = Some(combine(id, node, left, right));
        }
        self.root.and_then(|root| records[root.0].take())
    }
}

impl<T> Index<NodeId> for BinaryTree<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }
}

impl<T> IndexMut<NodeId> for BinaryTree<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.0].value
    }
}

impl<'a, T> IntoIterator for &'a BinaryTree<T> {
    type Item = (NodeId, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromStr for BinaryTree<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        BinaryTree::parse_level_order(s)
    }
}

/// Writes the level-order form, e.g. `[2,1,3,null,4]`.
impl<T: fmt::Display> fmt::Display for BinaryTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.to_level_order().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match item {
                Some(value) => write!(f, "{value}")?,
                None => f.write_str("null")?,
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_insert_builds_bst() {
        let tree = BinaryTree::from_vec(vec![4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.in_order(), vec![&1, &2, &3, &4, &5, &6, &7]);
        assert_eq!(tree.pre_order(), vec![&4, &2, &1, &3, &6, &5, &7]);
        assert_eq!(tree.post_order(), vec![&1, &3, &2, &5, &7, &6, &4]);
    }

    #[test]
    fn test_insert_sends_duplicates_right() {
        let tree = BinaryTree::from_vec(vec![2, 2]);
        let root = tree.root().unwrap();
        assert_eq!(tree.left(root), None);
        assert_eq!(tree.right(root).map(|id| tree[id]), Some(2));
    }

    #[test]
    fn test_attach_rejects_occupied_slot() {
        let mut tree = BinaryTree::new();
        let root = tree.set_root(1).unwrap();
        tree.attach(root, Side::Left, 2).unwrap();
        assert!(tree.attach(root, Side::Left, 3).is_err());
        assert!(tree.set_root(4).is_err());
        assert!(tree.attach(NodeId(42), Side::Right, 5).is_err());
        assert_eq!(tree.len(), 2);
    }

    #[rstest]
    #[case("[2,1,3]", vec![1, 2, 3])]
    #[case("[1,null,2,3]", vec![1, 3, 2])]
    #[case("1, 2, 3, 4, 5", vec![4, 2, 5, 1, 3])]
    #[case("[5,1,4,#,#,3,6]", vec![1, 5, 3, 4, 6])]
    #[case("[]", vec![])]
    #[case("[null]", vec![])]
    #[case("1,2]", vec![2, 1])]
    #[case("[1,2", vec![2, 1])]
    fn test_parse_level_order(#[case] input: &str, #[case] expected: Vec<i32>) {
        let tree: BinaryTree<i32> = input.parse().unwrap();
        assert_eq!(tree.in_order().into_iter().copied().collect::<Vec<_>>(), expected);
    }

    #[rstest]
    #[case("[1,x,2]")]
    #[case("[null,1]")]
    #[case("[1,null,null,2]")]
    fn test_parse_level_order_rejects(#[case] input: &str) {
        assert!(BinaryTree::<i32>::parse_level_order(input).is_err());
    }

    #[rstest]
    #[case("[2,1,3]")]
    #[case("[1,null,2,3]")]
    #[case("[3,1,4,null,null,2]")]
    #[case("[]")]
    fn test_display_matches_input(#[case] input: &str) {
        let tree: BinaryTree<i32> = input.parse().unwrap();
        assert_eq!(tree.to_string(), input);
    }

    #[test]
    fn test_to_level_order_trims_trailing_gaps() {
        let tree = BinaryTree::from_level_order([Some(1), Some(2), None, None, None]).unwrap();
        assert_eq!(tree.to_level_order(), vec![Some(&1), Some(&2)]);
    }

    #[test]
    fn test_fold_post_order_counts_subtrees() {
        let tree: BinaryTree<i32> = "[1,2,3,4,5,null,6]".parse().unwrap();
        let mut visited = Vec::new();
        let size = tree.fold_post_order(|_, node, left: Option<usize>, right| {
            visited.push(node.value);
            1 + left.unwrap_or(0) + right.unwrap_or(0)
        });
        assert_eq!(size, Some(6));
        assert_eq!(visited, vec![4, 5, 2, 6, 3, 1]);
        assert_eq!(BinaryTree::<i32>::new().fold_post_order(|_, _, _: Option<u8>, _| 0), None);
    }

    #[test]
    fn test_fold_post_order_deep_chain() {
        let mut tree = BinaryTree::new();
        let mut parent = tree.set_root(0).unwrap();
        for value in 1..200_000 {
            parent = tree.attach(parent, Side::Left, value).unwrap();
        }
        let height = tree.fold_post_order(|_, _, left: Option<usize>, right| {
            1 + left.unwrap_or(0).max(right.unwrap_or(0))
        });
        assert_eq!(height, Some(200_000));
    }

    #[test]
    fn test_find_and_index() {
        let mut tree: BinaryTree<i32> = "[2,1,3]".parse().unwrap();
        let one = tree.find(&1).unwrap();
        assert_eq!(tree[one], 1);
        tree[one] = 10;
        assert_eq!(tree.value(one), Some(&10));
        assert_eq!(tree.find(&1), None);
    }
}
