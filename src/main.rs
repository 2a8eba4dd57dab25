use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;
use tree_threads::{bst, graph_utils, morris, subtree_info, BinaryTree};

const DEFAULT_TREE: &str = "[4,2,6,1,3,5,7]";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tree in level order, e.g. "[4,2,6,1,3,5,7]" ("null" marks a missing child)
    #[arg(long, short, conflicts_with = "random")]
    tree: Option<String>,

    /// Use a random BST with this many nodes instead of --tree
    #[arg(long, value_name = "NODES")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Print the k-th smallest value (1-based)
    #[arg(long, short)]
    kth: Option<usize>,

    /// Print the in-order successor of the node holding this value
    #[arg(long, value_name = "VALUE")]
    successor_of: Option<i32>,

    /// Swap back two misplaced values of a BST
    #[arg(long)]
    recover: bool,

    /// Convert the tree into a sorted circular list and print it
    #[arg(long)]
    ring: bool,

    /// Write the tree as a Graphviz DOT file
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Also render the DOT file to a PNG image (needs Graphviz)
    #[arg(long, value_name = "FILE", requires = "dot")]
    png: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    run(cli, &mut io::stdout().lock())
}

fn load_tree(cli: &Cli) -> Result<BinaryTree<i32>> {
    if let Some(node_count) = cli.random {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return graph_utils::random_bst(node_count, &mut rng);
    }
    let input = cli.tree.as_deref().unwrap_or(DEFAULT_TREE);
    BinaryTree::parse_level_order(input).with_context(|| format!("Failed to parse tree {input:?}"))
}

fn show(value: Option<i32>) -> String {
    value.map_or_else(|| "none".to_string(), |value| value.to_string())
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let mut tree = load_tree(&cli)?;
    debug!("loaded tree with {} nodes", tree.len());

    writeln!(out, "Tree: {tree}")?;
    write!(out, "{}", graph_utils::sideways(&tree))?;
    writeln!(out, "In-order: {:?}", morris::in_order_values(&mut tree))?;
    writeln!(out, "Pre-order: {:?}", morris::pre_order_values(&mut tree))?;
    writeln!(out, "Post-order: {:?}", morris::post_order_values(&mut tree))?;
    writeln!(out, "Valid BST: {}", bst::is_valid_bst(&mut tree))?;
    writeln!(out, "Diameter: {}", subtree_info::diameter(&tree))?;
    writeln!(out, "Balanced: {}", subtree_info::is_balanced(&tree))?;
    writeln!(
        out,
        "Largest BST subtree: {}",
        subtree_info::largest_bst_subtree(&tree)
    )?;

    if let Some(k) = cli.kth {
        writeln!(out, "Smallest #{k}: {}", show(bst::kth_smallest(&mut tree, k)))?;
    }

    if let Some(value) = cli.successor_of {
        let target = tree
            .find(&value)
            .with_context(|| format!("Value {value} is not in the tree"))?;
        let successor = bst::in_order_successor(&mut tree, target).map(|id| tree[id]);
        writeln!(out, "Successor of {value}: {}", show(successor))?;
    }

    if cli.recover {
        if bst::recover_swapped(&mut tree) {
            info!("swapped two misplaced values back");
            writeln!(out, "Recovered: {tree}")?;
        } else {
            writeln!(out, "Recovered: nothing to swap")?;
        }
    }

    if let Some(dot_file) = &cli.dot {
        match &cli.png {
            Some(image_file) => graph_utils::visualize_tree(&tree, dot_file, image_file)?,
            None => graph_utils::write_dot(&tree, dot_file)?,
        }
    }

    if cli.ring {
        let ring = tree.into_sorted_ring();
        let values: Vec<String> = ring.iter().map(i32::to_string).collect();
        match ring.head() {
            Some(head) => writeln!(out, "Ring: {} <-> (back to {})", values.join(" <-> "), ring[head])?,
            None => writeln!(out, "Ring: empty")?,
        }
    }

    Ok(())
}
