//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a precomputation benchmark run.
#[derive(Clone, Debug)]
pub struct PrecomputeBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Lattice neighbours on each side of a node.
    pub ring_neighbours: usize,
}

impl fmt::Display for PrecomputeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.ring_neighbours)
    }
}

/// Parameters for a walk generation benchmark run.
#[derive(Clone, Debug)]
pub struct WalkBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Nodes per walk.
    pub walk_length: usize,
    /// Rounds over the node set.
    pub num_walks: usize,
}

impl fmt::Display for WalkBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},len={},rounds={}",
            self.node_count, self.walk_length, self.num_walks,
        )
    }
}
