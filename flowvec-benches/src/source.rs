//! Seeded synthetic graphs for benchmarking.
//!
//! Graphs are a ring lattice with random chords, which gives every node a
//! mix of triangle-closing and outward neighbours.

use flowvec_core::{Graph, GraphBuilder};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The lattice would connect a node to itself.
    #[error("ring neighbours ({ring_neighbours}) must be below half the node count ({node_count})")]
    RingTooWide {
        /// Requested lattice neighbours on each side.
        ring_neighbours: usize,
        /// Requested node count.
        node_count: usize,
    },
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticGraphConfig {
    /// Number of nodes, labelled `n0`, `n1`, ...
    pub node_count: usize,
    /// Lattice neighbours on each side of a node.
    pub ring_neighbours: usize,
    /// Random chords added per node. Chords that duplicate an edge or form a
    /// self loop are skipped.
    pub chords_per_node: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates weighted graphs from a [`SyntheticGraphConfig`].
///
/// # Examples
///
/// ```
/// use flowvec_benches::source::{SyntheticGraph, SyntheticGraphConfig};
///
/// let config = SyntheticGraphConfig {
///     node_count: 10,
///     ring_neighbours: 2,
///     chords_per_node: 0,
///     seed: 42,
/// };
/// let graph = SyntheticGraph::generate(&config).expect("valid config");
/// assert_eq!(graph.node_count(), 10);
/// assert_eq!(graph.edge_count(), 20);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SyntheticGraph;

impl SyntheticGraph {
    /// Builds the graph eagerly. Edge weights are drawn from `[0.5, 4.0)`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroNodes`] if `node_count` is zero, or
    /// [`SyntheticError::RingTooWide`] if the lattice would wrap onto itself.
    pub fn generate(config: &SyntheticGraphConfig) -> Result<Graph, SyntheticError> {
        let node_count = config.node_count;
        if node_count == 0 {
            return Err(SyntheticError::ZeroNodes);
        }
        if config.ring_neighbours.saturating_mul(2) >= node_count && config.ring_neighbours > 0 {
            return Err(SyntheticError::RingTooWide {
                ring_neighbours: config.ring_neighbours,
                node_count,
            });
        }

        let labels: Vec<String> = (0..node_count).map(|node| format!("n{node}")).collect();
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut builder = GraphBuilder::new();
        for label in &labels {
            builder.add_node(label);
        }

        for (node, label) in labels.iter().enumerate() {
            for offset in 1..=config.ring_neighbours {
                let wrapped = node.saturating_add(offset);
                let target = if wrapped >= node_count {
                    wrapped.saturating_sub(node_count)
                } else {
                    wrapped
                };
                if let Some(other) = labels.get(target) {
                    builder.add_weighted_edge(label, other, rng.gen_range(0.5..4.0));
                }
            }
        }

        let lattice = builder.clone().build();
        for (node, label) in labels.iter().enumerate() {
            for _ in 0..config.chords_per_node {
                let target = rng.gen_range(0..node_count);
                if target == node || lattice.has_edge(node, target) {
                    continue;
                }
                if let Some(other) = labels.get(target) {
                    builder.add_weighted_edge(label, other, rng.gen_range(0.5..4.0));
                }
            }
        }
        Ok(builder.build())
    }
}
