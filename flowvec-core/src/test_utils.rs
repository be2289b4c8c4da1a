//! Shared test utilities for `flowvec-core`.

use flowvec_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{Graph, GraphBuilder};

/// Builds a standard proptest configuration from the shared CI profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Triangle `a-b-c` with a tail `c-d`, all weights 1.
///
/// Indices: `a=0`, `b=1`, `c=2`, `d=3`.
#[must_use]
pub(crate) fn triangle_with_tail() -> Graph {
    [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")]
        .into_iter()
        .collect()
}

/// Triangle `a-b-c` where `b` also bridges to `d`.
///
/// Indices: `a=0`, `b=1`, `c=2`, `d=3`.
#[must_use]
pub(crate) fn triangle_with_bridge() -> Graph {
    [("a", "b"), ("b", "c"), ("c", "a"), ("b", "d")]
        .into_iter()
        .collect()
}

/// Path `a-b-c`.
#[must_use]
pub(crate) fn path3() -> Graph {
    [("a", "b"), ("b", "c")].into_iter().collect()
}

/// Star with weighted spokes from `hub` plus an isolated node `lonely`.
#[must_use]
pub(crate) fn weighted_star_with_isolate() -> Graph {
    let mut builder = GraphBuilder::new();
    builder
        .add_weighted_edge("hub", "x", 1.0)
        .add_weighted_edge("hub", "y", 3.0);
    builder.add_node("lonely");
    builder.build()
}

/// Asserts that two floats agree within `tolerance`.
pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}
