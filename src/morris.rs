//! Threadless tree walks (Morris traversal).
//!
//! The walks visit every node with O(1) auxiliary memory. Instead of a stack
//! they borrow the empty `right` slot of each left subtree's rightmost node
//! and store a *thread* back to the ancestor that has to be visited once the
//! subtree is done:
//!
//! ```text
//!        4                 4
//!       / \               / \
//!      2   6     ==>     2   6        (3.right threaded back to 4
//!     / \               / \            while the left subtree of 4
//!    1   3             1   3 ~> 4      is being walked)
//! ```
//!
//! Every thread is removed on the second encounter of its ancestor, so a walk
//! that runs to completion leaves the tree exactly as it found it. A walk
//! holds the tree's only mutable borrow while threads are installed, which
//! keeps the intermediate shape out of reach of every other reader.

use crate::binary_tree::BinaryTree;
use crate::node::{Node, NodeId};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    In,
    Pre,
}

/// A lazy Morris walk over a tree, yielding node ids in in-order or
/// pre-order.
///
/// The iterator borrows its tree mutably. Values can be read between steps
/// through [`value`](Self::value):
///
/// ```
/// use tree_threads::BinaryTree;
///
/// let mut tree: BinaryTree<i32> = "[2,1,3]".parse().unwrap();
/// let mut walk = tree.morris_in_order();
/// let mut seen = Vec::new();
/// while let Some(id) = walk.next() {
///     seen.push(*walk.value(id));
/// }
/// assert_eq!(seen, vec![1, 2, 3]);
/// ```
///
/// Dropping the walk before it is exhausted finishes the walk without
/// yielding anything more, which removes every remaining thread.
pub struct MorrisWalk<'a, T> {
    tree: &'a mut BinaryTree<T>,
    current: Option<NodeId>,
    order: Order,
}

impl<'a, T> MorrisWalk<'a, T> {
    fn new(tree: &'a mut BinaryTree<T>, order: Order) -> Self {
        let current = tree.root;
        MorrisWalk {
            tree,
            current,
            order,
        }
    }

    /// Value of a node of the walked tree.
    pub fn value(&self, id: NodeId) -> &T {
        &self.tree.nodes[id.0].value
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Runs the walk to the end, cloning every visited value.
    pub fn collect_values(mut self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.tree.len());
        while let Some(id) = self.next() {
            values.push(self.value(id).clone());
        }
        values
    }
}

impl<T> Iterator for MorrisWalk<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let nodes = &mut self.tree.nodes;
        while let Some(cursor) = self.current {
            let Some(left) = nodes[cursor.0].left else {
                self.current = nodes[cursor.0].right;
                return Some(cursor);
            };

            let pred = rightmost_before(nodes, left, cursor);
            if nodes[pred.0].right.is_none() {
                // First encounter: thread back and descend.
                trace!("thread {pred} -> {cursor}");
                nodes[pred.0].right = Some(cursor);
                self.current = Some(left);
                if self.order == Order::Pre {
                    return Some(cursor);
                }
            } else {
                // Second encounter: the left subtree is done.
                trace!("unthread {pred} -> {cursor}");
                nodes[pred.0].right = None;
                self.current = nodes[cursor.0].right;
                if self.order == Order::In {
                    return Some(cursor);
                }
            }
        }
        None
    }
}

impl<T> Drop for MorrisWalk<'_, T> {
    fn drop(&mut self) {
        if self.current.is_some() {
            debug!("morris walk stopped early, draining to remove threads");
            while self.next().is_some() {}
        }
    }
}

/// Walks right from `left` until the right link is empty or threads back to
/// `cursor`.
fn rightmost_before<T>(nodes: &[Node<T>], left: NodeId, cursor: NodeId) -> NodeId {
    let mut pred = left;
    while let Some(next) = nodes[pred.0].right {
        if next == cursor {
            break;
        }
        pred = next;
    }
    pred
}

/// Reverses the chain of right links starting at `from` and returns its old
/// tail, which is now the head.
fn reverse_right_edge<T>(nodes: &mut [Node<T>], from: NodeId) -> NodeId {
    let mut prev = None;
    let mut head = from;
    let mut current = Some(from);
    while let Some(id) = current {
        current = nodes[id.0].right;
        nodes[id.0].right = prev;
        prev = Some(id);
        head = id;
    }
    head
}

/// Visits the right edge starting at `from` bottom-up, restoring it after.
fn visit_right_edge<T, F>(nodes: &mut [Node<T>], from: NodeId, visit: &mut F)
where
    F: FnMut(NodeId, &T),
{
    let tail = reverse_right_edge(nodes, from);
    let mut current = Some(tail);
    while let Some(id) = current {
        visit(id, &nodes[id.0].value);
        current = nodes[id.0].right;
    }
    reverse_right_edge(nodes, tail);
}

impl<T> BinaryTree<T> {
    /// Starts a threadless in-order walk (left, node, right).
    pub fn morris_in_order(&mut self) -> MorrisWalk<'_, T> {
        MorrisWalk::new(self, Order::In)
    }

    /// Starts a threadless pre-order walk (node, left, right).
    pub fn morris_pre_order(&mut self) -> MorrisWalk<'_, T> {
        MorrisWalk::new(self, Order::Pre)
    }

    /// Threadless post-order walk (left, right, node).
    ///
    /// On the second encounter of a node, the right edge of its left subtree
    /// is visited bottom-up by reversing it in place and reversing it back;
    /// the right edge of the whole tree is visited last.
    pub fn morris_post_order<F>(&mut self, mut visit: F)
    where
        F: FnMut(NodeId, &T),
    {
        let nodes = &mut self.nodes;
        let mut current = self.root;
        while let Some(cursor) = current {
            if let Some(left) = nodes[cursor.0].left {
                let pred = rightmost_before(nodes, left, cursor);
                if nodes[pred.0].right.is_none() {
                    nodes[pred.0].right = Some(cursor);
                    current = Some(left);
                    continue;
                }
                nodes[pred.0].right = None;
                visit_right_edge(nodes, left, &mut visit);
            }
            current = nodes[cursor.0].right;
        }
        if let Some(root) = self.root {
            visit_right_edge(nodes, root, &mut visit);
        }
    }
}

/// In-order values of `tree`, collected by a Morris walk.
pub fn in_order_values<T: Clone>(tree: &mut BinaryTree<T>) -> Vec<T> {
    tree.morris_in_order().collect_values()
}

/// Pre-order values of `tree`, collected by a Morris walk.
pub fn pre_order_values<T: Clone>(tree: &mut BinaryTree<T>) -> Vec<T> {
    tree.morris_pre_order().collect_values()
}

/// Post-order values of `tree`, collected by a Morris walk.
pub fn post_order_values<T: Clone>(tree: &mut BinaryTree<T>) -> Vec<T> {
    let mut values = Vec::with_capacity(tree.len());
    tree.morris_post_order(|_, value| values.push(value.clone()));
    values
}
