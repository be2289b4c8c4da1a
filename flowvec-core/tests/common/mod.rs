use flowvec_core::{
    Graph, SamplingStrategy, TransitionModel, TransitionParams, WalkGenerator, WalkParams,
};

/// Nodes `{a, b, c, d}` with edges `a-b`, `b-c`, `a-c`, `c-d`.
#[must_use]
pub fn triangle_with_tail() -> Graph {
    [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")]
        .into_iter()
        .collect()
}

/// The triangle `a-b-c`.
#[must_use]
pub fn triangle() -> Graph {
    [("a", "b"), ("b", "c"), ("c", "a")].into_iter().collect()
}

/// Index of `label`, panicking when the graph lacks it.
#[must_use]
pub fn node(graph: &Graph, label: &str) -> usize {
    graph
        .index_of(label)
        .unwrap_or_else(|| panic!("node {label} must exist"))
}

/// Transition tables for `graph` with global biases and no overrides.
#[must_use]
pub fn precompute(graph: &Graph, p: f64, q: f64) -> TransitionModel {
    let params = TransitionParams::new(p, q).expect("test biases must be valid");
    TransitionModel::precompute(graph, &params, &SamplingStrategy::new())
        .expect("precompute must succeed")
}

/// Generator without per-node overrides.
#[must_use]
pub fn generator(walk_length: usize, num_walks: usize) -> WalkGenerator {
    WalkGenerator::new(
        WalkParams::new(walk_length, num_walks).expect("walk parameters must be valid"),
        SamplingStrategy::new(),
    )
    .expect("empty strategy is valid")
}
