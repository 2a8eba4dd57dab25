use crate::binary_tree::BinaryTree;
use crate::node::NodeId;
use std::ops::Index;

/// A node of a [`SortedRing`]: a value with links to its neighbours in
/// sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct RingNode<T> {
    pub value: T,
    prev: NodeId,
    next: NodeId,
}

impl<T> RingNode<T> {
    pub fn prev(&self) -> NodeId {
        self.prev
    }

    pub fn next(&self) -> NodeId {
        self.next
    }
}

/// A circular doubly-linked list holding the values of a BST in in-order.
///
/// Built by consuming a [`BinaryTree`]; every value keeps the [`NodeId`] it
/// had in the tree. The head is the smallest value, `head.prev` is the
/// largest and `tail.next` is the head again.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedRing<T> {
    nodes: Vec<RingNode<T>>,
    head: Option<NodeId>,
}

/// First and last node of an already linked sorted sublist.
#[derive(Debug, Clone, Copy)]
struct Span {
    head: NodeId,
    tail: NodeId,
}

/// Neighbour links collected while the tree is still intact.
struct Links {
    prev: Vec<Option<NodeId>>,
    next: Vec<Option<NodeId>>,
}

impl Links {
    fn join(&mut self, before: NodeId, after: NodeId) {
        self.next[before.0] = Some(after);
        self.prev[after.0] = Some(before);
    }
}

impl<T> From<BinaryTree<T>> for SortedRing<T> {
    fn from(tree: BinaryTree<T>) -> Self {
        let mut links = Links {
            prev: vec![None; tree.len()],
            next: vec![None; tree.len()],
        };
        // Each subtree becomes a sorted span; a node is spliced between the
        // spans of its children without walking them again.
        let span = tree.fold_post_order(|id, _, left: Option<Span>, right| {
            if let Some(left) = left {
                links.join(left.tail, id);
            }
            if let Some(right) = right {
                links.join(id, right.head);
            }
            Span {
                head: left.map_or(id, |span| span.head),
                tail: right.map_or(id, |span| span.tail),
            }
        });
        let Some(span) = span else {
            return SortedRing {
                nodes: Vec::new(),
                head: None,
            };
        };
        links.join(span.tail, span.head);

        let nodes = tree
            .nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| RingNode {
                value: node.value,
                // Every node of the tree got both neighbours above.
                prev: links.prev[i].unwrap_or(NodeId(i)),
                next: links.next[i].unwrap_or(NodeId(i)),
            })
            .collect();
        SortedRing {
            nodes,
            head: Some(span.head),
        }
    }
}

impl<T> BinaryTree<T> {
    /// Consumes the tree and relinks its nodes into a sorted circular
    /// doubly-linked list.
    pub fn into_sorted_ring(self) -> SortedRing<T> {
        SortedRing::from(self)
    }
}

impl<T> SortedRing<T> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node holding the smallest value.
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Node holding the largest value.
    pub fn tail(&self) -> Option<NodeId> {
        self.head.map(|head| self.nodes[head.0].prev)
    }

    pub fn node(&self, id: NodeId) -> Option<&RingNode<T>> {
        self.nodes.get(id.0)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).map(RingNode::next)
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).map(RingNode::prev)
    }

    /// Values in ascending order, following `next` links once around.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.walk(self.head, RingNode::next)
    }

    /// Values in descending order, following `prev` links once around.
    pub fn iter_rev(&self) -> impl Iterator<Item = &T> + '_ {
        self.walk(self.tail(), RingNode::prev)
    }

    fn walk(
        &self,
        start: Option<NodeId>,
        step: fn(&RingNode<T>) -> NodeId,
    ) -> impl Iterator<Item = &T> + '_ {
        let mut current = start;
        (0..self.len()).map_while(move |_| {
            let node = &self.nodes[current?.0];
            current = Some(step(node));
            Some(&node.value)
        })
    }
}

impl<T> Index<NodeId> for SortedRing<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.nodes[id.0].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Side;

    #[test]
    fn test_ring_from_bst() {
        let tree: BinaryTree<i32> = "[4,2,5,1,3]".parse().unwrap();
        let ring = tree.into_sorted_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(ring.iter_rev().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);

        let head = ring.head().unwrap();
        let tail = ring.tail().unwrap();
        assert_eq!(ring[head], 1);
        assert_eq!(ring[tail], 5);
        assert_eq!(ring.prev(head), Some(tail));
        assert_eq!(ring.next(tail), Some(head));
    }

    #[test]
    fn test_ring_returns_to_head_after_len_steps() {
        let tree = BinaryTree::from_vec(vec![50, 30, 70, 20, 40, 60, 80, 35, 65]);
        let ring = tree.into_sorted_ring();
        let head = ring.head().unwrap();
        let mut current = head;
        let mut values = Vec::new();
        for _ in 0..ring.len() {
            values.push(ring[current]);
            current = ring.next(current).unwrap();
        }
        assert_eq!(current, head);
        assert_eq!(values, vec![20, 30, 35, 40, 50, 60, 65, 70, 80]);
        for id in (0..ring.len()).map(NodeId) {
            let next = ring.next(id).unwrap();
            assert_eq!(ring.prev(next), Some(id));
        }
    }

    #[test]
    fn test_ring_keeps_node_ids() {
        let mut tree = BinaryTree::new();
        let root = tree.set_root('b').unwrap();
        let a = tree.attach(root, Side::Left, 'a').unwrap();
        let c = tree.attach(root, Side::Right, 'c').unwrap();
        let ring = SortedRing::from(tree);
        assert_eq!(ring.head(), Some(a));
        assert_eq!(ring.next(a), Some(root));
        assert_eq!(ring.next(root), Some(c));
        assert_eq!(ring.next(c), Some(a));
    }

    #[test]
    fn test_single_node_ring_links_to_itself() {
        let ring = BinaryTree::from_vec(vec![9]).into_sorted_ring();
        let head = ring.head().unwrap();
        assert_eq!(ring.next(head), Some(head));
        assert_eq!(ring.prev(head), Some(head));
        assert_eq!(ring.tail(), Some(head));
    }

    #[test]
    fn test_deep_left_chain_becomes_ring() {
        let node_count = 200_000;
        let mut tree = BinaryTree::new();
        let mut parent = tree.set_root(node_count - 1).unwrap();
        for value in (0..node_count - 1).rev() {
            parent = tree.attach(parent, Side::Left, value).unwrap();
        }
        let ring = tree.into_sorted_ring();
        assert_eq!(ring.len(), node_count as usize);
        assert_eq!(ring.head(), Some(parent));
        assert_eq!(ring.tail(), Some(NodeId(0)));
        assert!(ring.iter().copied().eq(0..node_count));
        assert!(ring.iter_rev().copied().eq((0..node_count).rev()));
    }

    #[test]
    fn test_empty_tree_gives_empty_ring() {
        let ring = BinaryTree::<i32>::new().into_sorted_ring();
        assert!(ring.is_empty());
        assert_eq!(ring.head(), None);
        assert_eq!(ring.tail(), None);
        assert_eq!(ring.iter().count(), 0);
    }
}
