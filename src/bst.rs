//! Binary-search-tree queries built on the threadless in-order walk.
//!
//! All of them take the tree by `&mut` because the walk threads links while
//! it runs; every function hands the tree back with its original shape.

use crate::binary_tree::BinaryTree;
use crate::node::NodeId;

/// Checks the strict BST ordering: the in-order sequence must be strictly
/// increasing. Empty trees are valid.
///
/// The walk always runs to the end so that every thread is removed.
pub fn is_valid_bst<T: Ord>(tree: &mut BinaryTree<T>) -> bool {
    let mut walk = tree.morris_in_order();
    let mut prev: Option<NodeId> = None;
    let mut valid = true;
    while let Some(id) = walk.next() {
        if let Some(prev) = prev {
            if walk.value(id) <= walk.value(prev) {
                valid = false;
            }
        }
        prev = Some(id);
    }
    valid
}

/// Returns the value with 1-based sorted rank `k`, or `None` when `k` is 0
/// or larger than the number of nodes.
pub fn kth_smallest<T: Clone>(tree: &mut BinaryTree<T>, k: usize) -> Option<T> {
    if k == 0 || k > tree.len() {
        return None;
    }
    let mut walk = tree.morris_in_order();
    let id = walk.nth(k - 1)?;
    let value = walk.value(id).clone();
    Some(value)
}

/// Returns the node visited right after `target` in in-order, or `None` when
/// `target` is the last node or is not part of the tree.
pub fn in_order_successor<T>(tree: &mut BinaryTree<T>, target: NodeId) -> Option<NodeId> {
    let mut walk = tree.morris_in_order();
    let mut prev = None;
    for id in walk.by_ref() {
        if prev == Some(target) {
            return Some(id);
        }
        prev = Some(id);
    }
    None
}

/// Finds the two nodes of a BST whose values were swapped.
///
/// The first node is the larger side of the first inversion in the in-order
/// sequence and the second is the smaller side of the last one; two adjacent
/// nodes produce a single inversion. Returns `None` when there is no
/// inversion at all.
pub fn find_swapped<T: Ord>(tree: &mut BinaryTree<T>) -> Option<(NodeId, NodeId)> {
    let mut walk = tree.morris_in_order();
    let mut prev: Option<NodeId> = None;
    let mut first = None;
    let mut second = None;
    while let Some(id) = walk.next() {
        if let Some(prev) = prev {
            if walk.value(prev) >= walk.value(id) {
                if first.is_none() {
                    first = Some(prev);
                }
                second = Some(id);
            }
        }
        prev = Some(id);
    }
    first.zip(second)
}

/// Restores a BST in which exactly two values were swapped, without changing
/// its shape. Returns whether anything was swapped back.
///
/// An inversion between two equal values is a duplicate, not a swap: the
/// tree is left alone and `false` is returned.
pub fn recover_swapped<T: Ord>(tree: &mut BinaryTree<T>) -> bool {
    let Some((first, second)) = find_swapped(tree) else {
        return false;
    };
    if tree.nodes[first.0].value == tree.nodes[second.0].value {
        return false;
    }
    let (low, high) = (first.min(second), first.max(second));
    let (head, tail) = tree.nodes.split_at_mut(high.0);
    std::mem::swap(&mut head[low.0].value, &mut tail[0].value);
    true
}
