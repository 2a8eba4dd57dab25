//! Post-order aggregates over a tree.
//!
//! Each query returns a small record per subtree and builds a node's record
//! from its children's records only, so every node is looked at once.

use crate::binary_tree::BinaryTree;
use std::cmp::max;

#[derive(Debug, Clone, Copy, Default)]
struct DiameterInfo {
    /// Longest path in edges inside the subtree.
    diameter: usize,
    /// Height in nodes.
    height: usize,
}

/// Number of edges on the longest path between any two nodes.
pub fn diameter<T>(tree: &BinaryTree<T>) -> usize {
    tree.fold_post_order(|_, _, left: Option<DiameterInfo>, right| {
        let (left, right) = (left.unwrap_or_default(), right.unwrap_or_default());
        DiameterInfo {
            diameter: max(max(left.diameter, right.diameter), left.height + right.height),
            height: max(left.height, right.height) + 1,
        }
    })
    .map_or(0, |info| info.diameter)
}

#[derive(Debug, Clone, Copy)]
struct BalanceInfo {
    balanced: bool,
    height: usize,
}

impl BalanceInfo {
    const EMPTY: BalanceInfo = BalanceInfo {
        balanced: true,
        height: 0,
    };
}

/// Whether the heights of every node's two subtrees differ by at most one.
pub fn is_balanced<T>(tree: &BinaryTree<T>) -> bool {
    tree.fold_post_order(|_, _, left: Option<BalanceInfo>, right| {
        let left = left.unwrap_or(BalanceInfo::EMPTY);
        let right = right.unwrap_or(BalanceInfo::EMPTY);
        BalanceInfo {
            balanced: left.balanced && right.balanced && left.height.abs_diff(right.height) <= 1,
            height: max(left.height, right.height) + 1,
        }
    })
    .map_or(true, |info| info.balanced)
}

#[derive(Debug)]
struct BstInfo<'a, T> {
    /// Size of the largest BST subtree found so far.
    largest: usize,
    size: usize,
    min: &'a T,
    max: &'a T,
}

impl<T> BstInfo<'_, T> {
    fn is_bst(&self) -> bool {
        self.largest == self.size
    }
}

/// Node count of the largest subtree (a node with all its descendants) that
/// is a strict BST.
pub fn largest_bst_subtree<'a, T: Ord>(tree: &'a BinaryTree<T>) -> usize {
    tree.fold_post_order(|_, node, left: Option<BstInfo<'a, T>>, right| {
        let mut info = BstInfo {
            largest: 0,
            size: 1,
            min: &node.value,
            max: &node.value,
        };
        for child in [&left, &right].into_iter().flatten() {
            info.size += child.size;
            info.min = info.min.min(child.min);
            info.max = info.max.max(child.max);
            info.largest = info.largest.max(child.largest);
        }

        let left_fits = left
            .as_ref()
            .map_or(true, |left| left.is_bst() && *left.max < node.value);
        let right_fits = right
            .as_ref()
            .map_or(true, |right| right.is_bst() && node.value < *right.min);
        if left_fits && right_fits {
            info.largest = info.size;
        }
        info
    })
    .map_or(0, |info| info.largest)
}
