//! Unit tests for transition precomputation.

use rstest::rstest;

use super::*;
use crate::{
    EdgeAttributes, GraphBuilder, NodeOverrides,
    error::Node2VecErrorCode,
    test_utils::{
        assert_close, path3, triangle_with_bridge, triangle_with_tail, weighted_star_with_isolate,
    },
};

fn params(p: f64, q: f64) -> TransitionParams {
    TransitionParams::new(p, q).expect("test parameters must be valid")
}

fn model(graph: &Graph, p: f64, q: f64) -> TransitionModel {
    TransitionModel::precompute(graph, &params(p, q), &SamplingStrategy::new())
        .expect("precompute must succeed")
}

#[rstest]
fn unit_biases_weight_every_move_equally() {
    let graph = triangle_with_tail();
    let model = model(&graph, 1.0, 1.0);
    let (a, b, c, d) = (0, 1, 2, 3);

    for next in [a, b, d] {
        let probability = model
            .transition_probability(c, Some(a), next)
            .expect("c has a (c, a) table");
        assert_eq!(probability, 1.0 / 3.0);
    }
}

#[rstest]
fn biases_split_return_common_and_outward_moves() {
    // At c arriving from a: return to a gets 1/p, common neighbour b gets 1,
    // outward d gets 1/q.
    let graph = triangle_with_tail();
    let model = model(&graph, 2.0, 4.0);
    let (a, b, c, d) = (0, 1, 2, 3);
    let total = 0.5 + 1.0 + 0.25;

    let get = |next| model.transition_probability(c, Some(a), next).expect("edge");
    assert_close(get(a), 0.5 / total, 1e-12);
    assert_close(get(b), 1.0 / total, 1e-12);
    assert_close(get(d), 0.25 / total, 1e-12);
}

#[rstest]
#[case::subnormal_p(1e-310, 1.0, 0, 1.0)]
#[case::subnormal_q(1.0, 1e-310, 3, 1.0)]
#[case::subnormal_both(1e-310, 1e-310, 0, 0.5)]
fn subnormal_biases_stay_finite(
    #[case] p: f64,
    #[case] q: f64,
    #[case] favoured: usize,
    #[case] expected: f64,
) {
    let graph = triangle_with_tail();
    let model = model(&graph, p, q);
    let (a, c) = (0, 2);

    let dist = model.second_order(c, a).expect("c has a (c, a) table");
    assert!(dist.probabilities().iter().all(|probability| probability.is_finite()));
    assert_close(dist.probabilities().iter().sum(), 1.0, 1e-12);
    let favoured_probability = model
        .transition_probability(c, Some(a), favoured)
        .expect("favoured move is an edge");
    assert_close(favoured_probability, expected, 1e-12);
}

#[rstest]
fn first_step_ignores_biases_and_uses_weights() {
    let graph = weighted_star_with_isolate();
    let model = model(&graph, 0.1, 10.0);
    let hub = graph.index_of("hub").expect("hub");
    let x = graph.index_of("x").expect("x");
    let y = graph.index_of("y").expect("y");

    assert_eq!(model.transition_probability(hub, None, x), Some(0.25));
    assert_eq!(model.transition_probability(hub, None, y), Some(0.75));
}

#[rstest]
fn disabled_weight_key_treats_edges_as_unit() {
    let graph = weighted_star_with_isolate();
    let params = params(1.0, 1.0).with_weight_key(None);
    let model = TransitionModel::precompute(&graph, &params, &SamplingStrategy::new())
        .expect("precompute must succeed");
    let hub = graph.index_of("hub").expect("hub");

    let dist = model.first_step(hub).expect("hub has neighbours");
    assert_eq!(dist.probabilities(), &[0.5, 0.5]);
}

#[rstest]
fn isolated_nodes_have_no_tables() {
    let graph = weighted_star_with_isolate();
    let model = model(&graph, 1.0, 1.0);
    let lonely = graph.index_of("lonely").expect("lonely");

    assert!(model.first_step(lonely).is_none());
    assert!(model.neighbors(lonely).is_empty());
    assert_eq!(model.node_count(), 4);
}

#[rstest]
fn second_order_tables_exist_only_for_adjacent_pairs() {
    let graph = triangle_with_tail();
    let model = model(&graph, 1.0, 1.0);
    let (a, d) = (0, 3);

    assert!(model.second_order(d, a).is_none());
    assert!(model.second_order(a, d).is_none());
    assert!(model.second_order(99, a).is_none());
}

#[rstest]
fn infinite_q_forbids_outward_moves() {
    let graph = triangle_with_bridge();
    let model = model(&graph, 1.0, f64::INFINITY);
    let (a, b, d) = (0, 1, 3);

    assert_eq!(model.transition_probability(b, Some(a), d), Some(0.0));
}

#[rstest]
fn infinite_p_forbids_returning() {
    let graph = triangle_with_bridge();
    let model = model(&graph, f64::INFINITY, 1.0);
    let (a, b, c) = (0, 1, 2);

    assert_eq!(model.transition_probability(a, Some(b), b), Some(0.0));
    assert_eq!(model.transition_probability(a, Some(b), c), Some(1.0));
}

#[rstest]
fn overrides_apply_to_the_current_node_only() {
    let graph = triangle_with_tail();
    let strategy = SamplingStrategy::new().with_override(
        "c",
        NodeOverrides {
            q: Some(0.5),
            ..NodeOverrides::default()
        },
    );
    let overridden = TransitionModel::precompute(&graph, &params(1.0, 1.0), &strategy)
        .expect("precompute must succeed");
    let baseline = model(&graph, 1.0, 1.0);
    let (a, b, c, d) = (0, 1, 2, 3);

    // At c the outward move to d doubles in weight: [a, b, d] => [1, 1, 2].
    assert_eq!(overridden.transition_probability(c, Some(a), d), Some(0.5));
    // At b nothing changed.
    assert_eq!(overridden.second_order(b, a), baseline.second_order(b, a));
}

#[rstest]
fn degenerate_transition_fails_fast() {
    // On a path every move is either a return or outward. Node `a` is
    // tabulated first and its only context (arriving from `b`) vanishes.
    let graph = path3();
    let err = TransitionModel::precompute(
        &graph,
        &params(f64::INFINITY, f64::INFINITY),
        &SamplingStrategy::new(),
    )
    .expect_err("all transition weights vanish");

    assert_eq!(err.code(), Node2VecErrorCode::DegenerateDistribution);
    match err {
        Node2VecError::DegenerateDistribution {
            current,
            previous,
            total,
        } => {
            assert_eq!(&*current, "a");
            assert_eq!(previous.as_deref(), Some("b"));
            assert_eq!(total, 0.0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case::negative(-1.0)]
#[case::zero(0.0)]
#[case::nan(f64::NAN)]
fn invalid_edge_weights_are_rejected(#[case] weight: f64) {
    let mut builder = GraphBuilder::new();
    builder.add_edge_with_attributes(
        "a",
        "b",
        EdgeAttributes::from([("weight".to_owned(), weight)]),
    );
    let graph = builder.build();
    let err = TransitionModel::precompute(&graph, &params(1.0, 1.0), &SamplingStrategy::new())
        .expect_err("weight must be rejected");

    assert_eq!(err.code(), Node2VecErrorCode::InvalidEdgeWeight);
}

#[rstest]
fn empty_graph_is_rejected() {
    let err = TransitionModel::precompute(
        &Graph::default(),
        &params(1.0, 1.0),
        &SamplingStrategy::new(),
    )
    .expect_err("empty graph must be rejected");
    assert_eq!(err, Node2VecError::EmptyGraph);
}

#[rstest]
fn invalid_override_is_rejected_before_computation() {
    let strategy = SamplingStrategy::new().with_override(
        "a",
        NodeOverrides {
            p: Some(-3.0),
            ..NodeOverrides::default()
        },
    );
    let err = TransitionModel::precompute(&path3(), &params(1.0, 1.0), &strategy)
        .expect_err("override must be rejected");
    assert_eq!(err.code(), Node2VecErrorCode::InvalidHyperparameter);
}

#[rstest]
fn precompute_is_idempotent() {
    let graph = triangle_with_bridge();
    assert_eq!(model(&graph, 0.3, 2.5), model(&graph, 0.3, 2.5));
}

#[cfg(feature = "parallel")]
#[rstest]
fn parallel_precompute_matches_sequential() {
    let graph = triangle_with_bridge();
    let params = params(0.7, 1.9);
    let strategy = SamplingStrategy::new();
    let sequential =
        TransitionModel::precompute(&graph, &params, &strategy).expect("sequential precompute");
    let parallel = TransitionModel::precompute_parallel(&graph, &params, &strategy)
        .expect("parallel precompute");
    assert_eq!(sequential, parallel);
}
