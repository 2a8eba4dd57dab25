use crate::binary_tree::BinaryTree;
use crate::node::{NodeId, Side};
use anyhow::{anyhow, Context, Result};
use graphviz_rust::cmd::{CommandArg, Format};
use graphviz_rust::printer::PrinterContext;
use log::info;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{Display, Write as _};
use std::fs;
use std::path::Path;

/// Converts the tree into a petgraph graph. Graph node indices equal the
/// tree's node ids and every edge is weighted with the child side.
pub fn to_digraph<T>(tree: &BinaryTree<T>) -> DiGraph<&T, Side> {
    let mut graph = DiGraph::with_capacity(tree.len(), tree.len().saturating_sub(1));

    // Create nodes.
    for node in &tree.nodes {
        graph.add_node(&node.value);
    }

    // Connect every parent to its children.
    for id in tree.node_ids() {
        for side in [Side::Left, Side::Right] {
            if let Some(child) = tree.nodes[id.0].child(side) {
                graph.add_edge(NodeIndex::new(id.0), NodeIndex::new(child.0), side);
            }
        }
    }
    graph
}

/// Renders the tree in Graphviz DOT format, labelling edges `L` and `R`.
pub fn to_dot<T: Display>(tree: &BinaryTree<T>) -> String {
    format!("{}", Dot::new(&to_digraph(tree)))
}

/// Writes the DOT rendering of the tree to `dot_file`.
pub fn write_dot<T: Display>(tree: &BinaryTree<T>, dot_file: impl AsRef<Path>) -> Result<()> {
    let dot_file = dot_file.as_ref();
    fs::write(dot_file, to_dot(tree))
        .with_context(|| format!("Failed to write DOT file {}", dot_file.display()))?;
    info!("DOT file saved as: {}", dot_file.display());
    Ok(())
}

/// Converts a DOT file to a PNG image with the Graphviz `dot` binary.
pub fn render_png(dot_file: impl AsRef<Path>, image_file: impl AsRef<Path>) -> Result<()> {
    let (dot_file, image_file) = (dot_file.as_ref(), image_file.as_ref());
    let dot_content = fs::read_to_string(dot_file)
        .with_context(|| format!("Failed to read DOT file {}", dot_file.display()))?;
    let graph = graphviz_rust::parse(&dot_content)
        .map_err(|e| anyhow!("Failed to parse DOT file {}: {e}", dot_file.display()))?;
    graphviz_rust::exec(
        graph,
        &mut PrinterContext::default(),
        vec![
            Format::Png.into(),
            CommandArg::Output(image_file.to_string_lossy().into_owned()),
        ],
    )
    .with_context(|| format!("Failed to generate image {}", image_file.display()))?;
    info!("Tree image saved as: {}", image_file.display());
    Ok(())
}

/// Writes the DOT file and converts it to an image.
pub fn visualize_tree<T: Display>(
    tree: &BinaryTree<T>,
    dot_file: impl AsRef<Path>,
    image_file: impl AsRef<Path>,
) -> Result<()> {
    write_dot(tree, dot_file.as_ref())?;
    render_png(dot_file, image_file)
}

/// Draws the tree sideways: the right subtree above a node, the left subtree
/// below, indented by depth. The root is marked `H`, right children `v` (the
/// parent is below) and left children `^` (the parent is above).
pub fn sideways<T: Display>(tree: &BinaryTree<T>) -> String {
    const INDENT: usize = 6;
    let mut out = String::new();
    // Reverse in-order with an explicit stack: (node, depth, marker, right side done).
    let mut stack: Vec<(NodeId, usize, char, bool)> = Vec::new();
    if let Some(root) = tree.root {
        stack.push((root, 0, 'H', false));
    }
    while let Some((id, depth, marker, right_done)) = stack.pop() {
        let node = &tree.nodes[id.0];
        if !right_done {
            stack.push((id, depth, marker, true));
            if let Some(right) = node.right {
                stack.push((right, depth + 1, 'v', false));
            }
            continue;
        }
        let _ = writeln!(
            out,
            "{:indent$}{marker}{}{marker}",
            "",
            node.value,
            indent = depth * INDENT
        );
        if let Some(left) = node.left {
            stack.push((left, depth + 1, '^', false));
        }
    }
    out
}

/// Checks that `0..node_count` fits in `i32` and returns the range end.
fn value_range(node_count: usize) -> Result<i32> {
    i32::try_from(node_count)
        .with_context(|| format!("Cannot number {node_count} nodes with i32 values"))
}

/// Generates a tree of random shape with `node_count` nodes. Values are
/// `0..node_count` in creation order, so the tree is rarely a BST.
pub fn random_tree<R: Rng>(node_count: usize, rng: &mut R) -> Result<BinaryTree<i32>> {
    let end = value_range(node_count)?;
    let mut tree = BinaryTree::new();
    if end == 0 {
        return Ok(tree);
    }
    let root = tree.insert(0);
    let mut open_slots = vec![(root, Side::Left), (root, Side::Right)];

    // Every new node takes a random free slot and opens two more.
    for value in 1..end {
        let slot = rng.gen_range(0..open_slots.len());
        let (parent, side) = open_slots.swap_remove(slot);
        let id = tree.push_child(parent, side, value);
        open_slots.push((id, Side::Left));
        open_slots.push((id, Side::Right));
    }
    Ok(tree)
}

/// Generates a BST holding `0..node_count` inserted in random order.
pub fn random_bst<R: Rng>(node_count: usize, rng: &mut R) -> Result<BinaryTree<i32>> {
    let mut values: Vec<i32> = (0..value_range(node_count)?).collect();
    values.shuffle(rng);
    Ok(BinaryTree::from_vec(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::visit::EdgeRef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_to_digraph_matches_tree() {
        let tree: BinaryTree<i32> = "[2,1,3,null,null,4]".parse().unwrap();
        let graph = to_digraph(&tree);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        for id in tree.node_ids() {
            assert_eq!(graph[NodeIndex::new(id.index())], &tree[id]);
        }
        let root = NodeIndex::new(0);
        let mut children: Vec<_> = graph
            .edges(root)
            .map(|edge| (*edge.weight(), *graph[edge.target()]))
            .collect();
        children.sort_by_key(|(_, value)| *value);
        assert_eq!(children, vec![(Side::Left, 1), (Side::Right, 3)]);
    }

    #[test]
    fn test_to_dot_labels_nodes_and_edges() {
        let tree: BinaryTree<i32> = "[2,1,3]".parse().unwrap();
        let dot = to_dot(&tree);
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label = \"2\""));
        assert!(dot.contains("0 -> 1"));
        assert!(dot.contains("label = \"L\""));
        assert!(dot.contains("0 -> 2"));
        assert!(dot.contains("label = \"R\""));
    }

    #[test]
    fn test_sideways() {
        let tree: BinaryTree<i32> = "[2,1,3]".parse().unwrap();
        assert_eq!(sideways(&tree), "      v3v\nH2H\n      ^1^\n");
        assert_eq!(sideways(&BinaryTree::<i32>::new()), "");

        let tree: BinaryTree<i32> = "[4,2,null,1,3]".parse().unwrap();
        assert_eq!(
            sideways(&tree),
            "H4H\n            v3v\n      ^2^\n            ^1^\n"
        );
    }

    #[test]
    fn test_random_counts_beyond_i32_are_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let too_many = i32::MAX as usize + 1;
        assert!(random_tree(too_many, &mut rng).is_err());
        assert!(random_bst(too_many, &mut rng).is_err());
    }

    #[test]
    fn test_random_tree_has_requested_size() {
        let mut rng = StdRng::seed_from_u64(7);
        for node_count in [0, 1, 2, 17, 200] {
            let tree = random_tree(node_count, &mut rng).unwrap();
            assert_eq!(tree.len(), node_count);
            assert_eq!(tree.iter().count(), node_count);
        }
    }

    #[test]
    fn test_random_bst_is_sorted() {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = random_bst(50, &mut rng).unwrap();
        let values: Vec<i32> = tree.in_order().into_iter().copied().collect();
        assert_eq!(values, (0..50).collect::<Vec<_>>());
    }
}
