//! Tests for the `Node2Vec` orchestration API.

mod common;

use common::{generator, node, precompute, triangle, triangle_with_tail};
use flowvec_core::{
    ExecutionStrategy, Graph, Node2VecBuilder, Node2VecError, NodeOverrides, SamplingStrategy,
};
use flowvec_test_support::tracing::RecordingLayer;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn graph() -> Graph {
    triangle_with_tail()
}

#[rstest]
fn builder_defaults() {
    let builder = Node2VecBuilder::new();
    assert_eq!(builder.walk_length(), 80);
    assert_eq!(builder.num_walks(), 10);
    assert_eq!(builder.dimensions(), 128);
    assert_eq!(builder.execution_strategy(), ExecutionStrategy::Sequential);

    let node2vec = builder.build().expect("defaults valid");
    assert_eq!(node2vec.transition_params().p(), 1.0);
    assert_eq!(node2vec.transition_params().weight_key(), Some("weight"));
    assert_eq!(node2vec.seed(), None);
}

#[rstest]
fn seeded_sequential_runs_are_identical(graph: Graph) {
    let node2vec = Node2VecBuilder::new()
        .with_walk_length(15)
        .with_num_walks(4)
        .with_p(0.5)
        .with_q(2.0)
        .with_seed(2024)
        .build()
        .expect("configuration must be valid");

    let first = node2vec.walks(&graph).expect("walks must succeed");
    let second = node2vec.walks(&graph).expect("walks must succeed");
    assert_eq!(first, second);
    assert_eq!(first.len(), 16);
}

#[rstest]
fn labelled_corpus_uses_graph_labels(graph: Graph) {
    let node2vec = Node2VecBuilder::new()
        .with_walk_length(3)
        .with_num_walks(1)
        .with_seed(1)
        .build()
        .expect("configuration must be valid");
    let sentences = node2vec
        .walks(&graph)
        .expect("walks must succeed")
        .to_labels(&graph);

    assert_eq!(sentences.len(), 4);
    for sentence in &sentences {
        assert_eq!(sentence.len(), 3);
        assert!(sentence.iter().all(|label| graph.index_of(label).is_some()));
    }
}

#[rstest]
fn strategy_overrides_reach_generation(graph: Graph) {
    let strategy = SamplingStrategy::new().with_override(
        "d",
        NodeOverrides {
            num_walks: Some(0),
            walk_length: Some(2),
            ..NodeOverrides::default()
        },
    );
    let corpus = Node2VecBuilder::new()
        .with_walk_length(5)
        .with_num_walks(2)
        .with_sampling_strategy(strategy)
        .with_seed(3)
        .build()
        .expect("configuration must be valid")
        .walks(&graph)
        .expect("walks must succeed");

    let d = node(&graph, "d");
    assert_eq!(corpus.len(), 6);
    assert!(corpus.iter().all(|walk| walk.first() != Some(&d)));
}

#[rstest]
fn pipeline_matches_its_building_blocks() {
    let graph = triangle();
    let node2vec = Node2VecBuilder::new()
        .with_walk_length(6)
        .with_num_walks(3)
        .with_p(0.5)
        .with_q(2.0)
        .with_seed(77)
        .build()
        .expect("configuration must be valid");

    let model = node2vec.precompute(&graph).expect("precompute must succeed");
    assert_eq!(model, precompute(&graph, 0.5, 2.0));

    let expected = generator(6, 3).generate(&model, &mut SmallRng::seed_from_u64(77));
    assert_eq!(node2vec.generate(&model).expect("generation must succeed"), expected);

    // No triangle walk is cut short, and each node starts one walk per round.
    let a = node(&graph, "a");
    assert_eq!(expected.len(), 9);
    assert!(expected.iter().all(|walk| walk.len() == 6));
    assert_eq!(expected.iter().filter(|walk| walk.first() == Some(&a)).count(), 3);
}

#[rstest]
fn empty_graph_errors() {
    let err = Node2VecBuilder::new()
        .build()
        .expect("configuration must be valid")
        .walks(&Graph::default())
        .expect_err("empty graphs must be rejected");
    assert_eq!(err, Node2VecError::EmptyGraph);
}

#[rstest]
fn walks_record_core_tracing(graph: Graph) {
    let node2vec = Node2VecBuilder::new()
        .with_walk_length(4)
        .with_num_walks(2)
        .with_seed(9)
        .build()
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let corpus = tracing::subscriber::with_default(subscriber, || node2vec.walks(&graph))
        .expect("walks must succeed");
    assert_eq!(corpus.len(), 8);

    let walks_span = layer.span("core.walks").expect("core.walks span must exist");
    assert_eq!(walks_span.field("nodes"), Some("4"));
    assert_eq!(walks_span.field("edges"), Some("4"));
    assert_eq!(walks_span.field("strategy"), Some("Sequential"));
    assert_eq!(walks_span.field("seeded"), Some("true"));

    let precompute_span = layer
        .span("core.precompute")
        .expect("core.precompute span must exist");
    assert_eq!(precompute_span.field("p"), Some("1"));
    assert_eq!(precompute_span.field("overrides"), Some("0"));
    assert!(layer.span("core.generate").is_some());
    assert!(layer.has_message(Level::INFO, "walk corpus ready"));
}

#[rstest]
fn unknown_override_labels_log_a_warning(graph: Graph) {
    let strategy = SamplingStrategy::new().with_override(
        "ghost",
        NodeOverrides {
            p: Some(2.0),
            ..NodeOverrides::default()
        },
    );
    let node2vec = Node2VecBuilder::new()
        .with_walk_length(2)
        .with_num_walks(1)
        .with_sampling_strategy(strategy)
        .with_seed(0)
        .build()
        .expect("configuration must be valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || node2vec.walks(&graph))
        .expect("unknown labels are not fatal");

    assert!(layer.events().iter().any(|event| {
        event.level == Level::WARN && event.field("node") == Some("ghost")
    }));
    assert!(layer.has_message(Level::WARN, "sampling strategy entry has no effect"));
}
