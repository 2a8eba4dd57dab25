//! In-order binary tree algorithms built around a threadless walk.
//!
//! A [`BinaryTree`] is an arena of nodes addressed by [`NodeId`]. Its
//! [`morris_in_order`](BinaryTree::morris_in_order) walk visits every node in
//! order with O(1) extra memory by temporarily threading empty right links
//! back to ancestors. The [`bst`] queries (validation, k-th smallest,
//! successor, swapped-pair recovery) all run on that walk and leave the tree
//! as they found it. [`SortedRing`] turns a BST into a sorted circular
//! doubly-linked list, and [`subtree_info`] collects per-subtree aggregates.
//!
//! ```
//! use tree_threads::{bst, BinaryTree};
//!
//! let mut tree: BinaryTree<i32> = "[2,1,3]".parse().unwrap();
//! assert!(bst::is_valid_bst(&mut tree));
//! assert_eq!(bst::kth_smallest(&mut tree, 2), Some(2));
//!
//! let ring = tree.into_sorted_ring();
//! assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

pub mod binary_tree;
pub mod bst;
pub mod graph_utils;
pub mod iter;
pub mod morris;
pub mod node;
pub mod sorted_ring;
pub mod subtree_info;

pub use binary_tree::BinaryTree;
pub use iter::Iter;
pub use morris::MorrisWalk;
pub use node::{Node, NodeId, Side};
pub use sorted_ring::{RingNode, SortedRing};
