//! Property tests over randomly generated weighted graphs.

use proptest::{prelude::*, test_runner::TestCaseResult};
use rand::{SeedableRng, rngs::SmallRng};

use super::{WalkGenerator, WalkParams};
use crate::{
    Graph, GraphBuilder, SamplingStrategy, TransitionModel, TransitionParams,
    test_utils::suite_proptest_config,
};

const TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug)]
struct GraphFixture {
    nodes: usize,
    edges: Vec<(usize, usize, f64)>,
}

impl GraphFixture {
    fn build(&self) -> Graph {
        let mut builder = GraphBuilder::new();
        for node in 0..self.nodes {
            builder.add_node(&format!("n{node}"));
        }
        for &(left, right, weight) in &self.edges {
            builder.add_weighted_edge(&format!("n{left}"), &format!("n{right}"), weight);
        }
        builder.build()
    }
}

fn graph_fixture() -> impl Strategy<Value = GraphFixture> {
    (1_usize..12).prop_flat_map(|nodes| {
        prop::collection::vec((0..nodes, 0..nodes, 0.1_f64..10.0), 0..(nodes * 3))
            .prop_map(move |edges| GraphFixture { nodes, edges })
    })
}

fn bias() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), 0.05_f64..20.0]
}

fn sums_to_one(probabilities: &[f64]) -> bool {
    (probabilities.iter().sum::<f64>() - 1.0).abs() <= TOLERANCE
}

fn check_distributions(graph: &Graph, model: &TransitionModel) -> TestCaseResult {
    for current in 0..graph.node_count() {
        let neighbors = model.neighbors(current);
        prop_assert_eq!(neighbors.len(), graph.degree(current));
        match model.first_step(current) {
            Some(dist) => {
                prop_assert_eq!(dist.len(), neighbors.len());
                prop_assert!(sums_to_one(dist.probabilities()));
            }
            None => prop_assert!(neighbors.is_empty()),
        }
        for &previous in neighbors {
            let dist = model.second_order(current, previous);
            prop_assert!(dist.is_some(), "missing ({current}, {previous})");
            if let Some(dist) = dist {
                prop_assert_eq!(dist.len(), neighbors.len());
                prop_assert!(sums_to_one(dist.probabilities()));
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn distributions_are_normalized(fixture in graph_fixture(), p in bias(), q in bias()) {
        let graph = fixture.build();
        let params = TransitionParams::new(p, q).expect("generated biases are positive");
        let model = TransitionModel::precompute(&graph, &params, &SamplingStrategy::new())
            .expect("positive weights and biases never degenerate");
        check_distributions(&graph, &model)?;
    }

    #[test]
    fn walks_are_valid_paths(
        fixture in graph_fixture(),
        p in bias(),
        q in bias(),
        walk_length in 1_usize..16,
        num_walks in 1_usize..4,
        seed in any::<u64>(),
    ) {
        let graph = fixture.build();
        let params = TransitionParams::new(p, q).expect("generated biases are positive");
        let model = TransitionModel::precompute(&graph, &params, &SamplingStrategy::new())
            .expect("positive weights and biases never degenerate");
        let generator = WalkGenerator::new(
            WalkParams::new(walk_length, num_walks).expect("generated parameters are positive"),
            SamplingStrategy::new(),
        )
        .expect("empty strategy is valid");
        let corpus = generator.generate(&model, &mut SmallRng::seed_from_u64(seed));

        prop_assert_eq!(corpus.len(), num_walks * graph.node_count());
        for walk in &corpus {
            prop_assert!(!walk.is_empty() && walk.len() <= walk_length);
            for pair in walk.windows(2) {
                if let [from, to] = pair {
                    prop_assert!(graph.has_edge(*from, *to));
                }
            }
            // Only a dead end may cut a walk short.
            if walk.len() < walk_length {
                let last = walk.last().copied().unwrap_or_default();
                prop_assert_eq!(graph.degree(last), 0);
            }
        }
    }

    #[test]
    fn precompute_is_repeatable(fixture in graph_fixture(), p in bias(), q in bias()) {
        let graph = fixture.build();
        let params = TransitionParams::new(p, q).expect("generated biases are positive");
        let strategy = SamplingStrategy::new();
        let first = TransitionModel::precompute(&graph, &params, &strategy)
            .expect("precompute must succeed");
        let second = TransitionModel::precompute(&graph, &params, &strategy)
            .expect("precompute must succeed");
        prop_assert_eq!(&first, &second);
        #[cfg(feature = "parallel")]
        {
            let parallel = TransitionModel::precompute_parallel(&graph, &params, &strategy)
                .expect("parallel precompute must succeed");
            prop_assert_eq!(&first, &parallel);
        }
    }
}
