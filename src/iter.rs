use crate::binary_tree::BinaryTree;
use crate::node::NodeId;
use std::iter::FusedIterator;

/// In-order iterator over `(NodeId, &T)` backed by an explicit stack of
/// pending ancestors.
///
/// Unlike a [`MorrisWalk`](crate::MorrisWalk) it only needs a shared borrow,
/// at the cost of O(height) extra memory.
pub struct Iter<'a, T> {
    tree: &'a BinaryTree<T>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a BinaryTree<T>) -> Self {
        Iter {
            tree,
            stack: Vec::new(),
            current: tree.root,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree.nodes[id.0].left;
        }
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        self.current = node.right;
        Some((id, &node.value))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Side;

    #[test]
    fn test_iter_matches_recursive_in_order() {
        let tree: BinaryTree<i32> = "[1,2,3,4,5,null,6,null,null,7]".parse().unwrap();
        let stacked: Vec<&i32> = tree.iter().map(|(_, value)| value).collect();
        assert_eq!(stacked, tree.in_order());
    }

    #[test]
    fn test_iter_yields_matching_ids() {
        let tree = BinaryTree::from_vec(vec![5, 3, 8]);
        for (id, value) in &tree {
            assert_eq!(&tree[id], value);
        }
    }

    #[test]
    fn test_iter_deep_right_chain() {
        let mut tree = BinaryTree::new();
        let mut parent = tree.set_root(0).unwrap();
        for value in 1..200_000 {
            parent = tree.attach(parent, Side::Right, value).unwrap();
        }
        assert!(tree.iter().map(|(_, value)| *value).eq(0..200_000));
    }

    #[test]
    fn test_iter_empty_tree() {
        let tree = BinaryTree::<u8>::new();
        assert_eq!(tree.iter().next(), None);
    }
}
