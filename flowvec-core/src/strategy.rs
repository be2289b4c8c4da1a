//! Per-node overrides for walk hyperparameters.
//!
//! A [`SamplingStrategy`] is a sparse map from node label to
//! [`NodeOverrides`]. Every lookup resolves the node-specific value first and
//! falls back to the global default supplied by the caller.

use std::collections::BTreeMap;

use crate::{Graph, Result, error::Node2VecError};

/// Optional per-node replacements for the global hyperparameters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct NodeOverrides {
    /// Number of rounds in which this node starts a walk. Zero excludes it.
    pub num_walks: Option<usize>,
    /// Length of walks starting at this node.
    pub walk_length: Option<usize>,
    /// Return parameter applied when the walk is currently at this node.
    pub p: Option<f64>,
    /// In-out parameter applied when the walk is currently at this node.
    pub q: Option<f64>,
}

impl NodeOverrides {
    fn is_empty(&self) -> bool {
        self.num_walks.is_none()
            && self.walk_length.is_none()
            && self.p.is_none()
            && self.q.is_none()
    }
}

/// Sparse mapping from node label to [`NodeOverrides`].
///
/// # Examples
/// ```
/// use flowvec_core::{NodeOverrides, SamplingStrategy};
///
/// let strategy = SamplingStrategy::new().with_override(
///     "hub",
///     NodeOverrides { q: Some(4.0), ..NodeOverrides::default() },
/// );
/// assert_eq!(strategy.q_for("hub", 1.0), 4.0);
/// assert_eq!(strategy.q_for("leaf", 1.0), 1.0);
/// assert_eq!(strategy.p_for("hub", 0.5), 0.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SamplingStrategy {
    overrides: BTreeMap<String, NodeOverrides>,
}

impl SamplingStrategy {
    /// Creates an empty strategy, meaning every node uses the global values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the overrides for `label`.
    #[must_use]
    pub fn with_override(mut self, label: impl Into<String>, overrides: NodeOverrides) -> Self {
        self.insert(label, overrides);
        self
    }

    /// Adds or replaces the overrides for `label`.
    pub fn insert(&mut self, label: impl Into<String>, overrides: NodeOverrides) {
        self.overrides.insert(label.into(), overrides);
    }

    /// Returns the overrides recorded for `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&NodeOverrides> {
        self.overrides.get(label)
    }

    /// Returns the number of nodes with overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Returns whether no node has overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Iterates over `(label, overrides)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeOverrides)> {
        self.overrides
            .iter()
            .map(|(label, overrides)| (label.as_str(), overrides))
    }

    /// Resolves the return parameter for `label`.
    #[must_use]
    pub fn p_for(&self, label: &str, global: f64) -> f64 {
        self.get(label).and_then(|o| o.p).unwrap_or(global)
    }

    /// Resolves the in-out parameter for `label`.
    #[must_use]
    pub fn q_for(&self, label: &str, global: f64) -> f64 {
        self.get(label).and_then(|o| o.q).unwrap_or(global)
    }

    /// Resolves the walk length for walks starting at `label`.
    #[must_use]
    pub fn walk_length_for(&self, label: &str, global: usize) -> usize {
        self.get(label).and_then(|o| o.walk_length).unwrap_or(global)
    }

    /// Resolves the number of rounds in which `label` starts a walk.
    #[must_use]
    pub fn num_walks_for(&self, label: &str, global: usize) -> usize {
        self.get(label).and_then(|o| o.num_walks).unwrap_or(global)
    }

    /// Checks every override against its domain.
    ///
    /// `p` and `q` must be strictly positive, `walk_length` must be
    /// at least one. `num_walks` may be zero, which excludes the node from
    /// starting walks.
    ///
    /// # Errors
    /// Returns [`Node2VecError::InvalidHyperparameter`] naming the first
    /// offending node and parameter.
    pub fn validate(&self) -> Result<()> {
        for (label, overrides) in &self.overrides {
            if let Some(p) = overrides.p {
                check_bias(p)
                    .map_err(|reason| Node2VecError::invalid_override("p", label, reason))?;
            }
            if let Some(q) = overrides.q {
                check_bias(q)
                    .map_err(|reason| Node2VecError::invalid_override("q", label, reason))?;
            }
            if overrides.walk_length == Some(0) {
                return Err(Node2VecError::invalid_override(
                    "walk_length",
                    label,
                    "walk_length must be at least 1",
                ));
            }
        }
        Ok(())
    }

    /// Returns the labels of overrides that name no node of `graph` or that
    /// carry no values at all.
    #[must_use]
    pub fn inert_entries<'a>(&'a self, graph: &Graph) -> Vec<&'a str> {
        self.overrides
            .iter()
            .filter(|(label, overrides)| overrides.is_empty() || graph.index_of(label).is_none())
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

impl FromIterator<(String, NodeOverrides)> for SamplingStrategy {
    fn from_iter<I: IntoIterator<Item = (String, NodeOverrides)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

/// Validates a return or in-out bias value.
///
/// Positive infinity is accepted and drives the matching weight to exactly
/// zero.
pub(crate) fn check_bias(value: f64) -> core::result::Result<(), String> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!("must be greater than zero (got {value})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::error::Node2VecErrorCode;

    fn overrides(p: Option<f64>, q: Option<f64>, walk_length: Option<usize>) -> NodeOverrides {
        NodeOverrides {
            num_walks: None,
            walk_length,
            p,
            q,
        }
    }

    #[rstest]
    fn resolution_prefers_node_specific_values() {
        let strategy = SamplingStrategy::new().with_override(
            "a",
            NodeOverrides {
                num_walks: Some(2),
                walk_length: Some(5),
                p: Some(0.25),
                q: None,
            },
        );

        assert_eq!(strategy.p_for("a", 1.0), 0.25);
        assert_eq!(strategy.q_for("a", 3.0), 3.0);
        assert_eq!(strategy.walk_length_for("a", 80), 5);
        assert_eq!(strategy.num_walks_for("a", 10), 2);
        assert_eq!(strategy.walk_length_for("b", 80), 80);
        assert_eq!(strategy.num_walks_for("b", 10), 10);
    }

    #[rstest]
    #[case::zero_p(overrides(Some(0.0), None, None), "p")]
    #[case::negative_q(overrides(None, Some(-1.0), None), "q")]
    #[case::nan_p(overrides(Some(f64::NAN), None, None), "p")]
    #[case::negative_infinite_q(overrides(None, Some(f64::NEG_INFINITY), None), "q")]
    #[case::zero_length(overrides(None, None, Some(0)), "walk_length")]
    fn validate_rejects_out_of_domain_overrides(
        #[case] node: NodeOverrides,
        #[case] expected: &'static str,
    ) {
        let strategy = SamplingStrategy::new().with_override("n", node);
        let err = strategy.validate().expect_err("override must be rejected");
        assert_eq!(err.code(), Node2VecErrorCode::InvalidHyperparameter);
        match err {
            Node2VecError::InvalidHyperparameter { name, node, .. } => {
                assert_eq!(name, expected);
                assert_eq!(node.as_deref(), Some("n"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn validate_accepts_infinite_bias() {
        let strategy = SamplingStrategy::new()
            .with_override("n", overrides(Some(f64::INFINITY), Some(f64::INFINITY), None));
        assert!(strategy.validate().is_ok());
    }

    #[rstest]
    fn validate_accepts_zero_num_walks() {
        let strategy = SamplingStrategy::new().with_override(
            "n",
            NodeOverrides {
                num_walks: Some(0),
                ..NodeOverrides::default()
            },
        );
        assert!(strategy.validate().is_ok());
    }

    #[rstest]
    fn inert_entries_reports_unknown_and_empty_overrides() {
        let graph: Graph = [("a", "b")].into_iter().collect();
        let strategy: SamplingStrategy = [
            ("a".to_owned(), overrides(Some(2.0), None, None)),
            ("b".to_owned(), NodeOverrides::default()),
            ("ghost".to_owned(), overrides(None, Some(2.0), None)),
        ]
        .into_iter()
        .collect();

        assert_eq!(strategy.inert_entries(&graph), vec!["b", "ghost"]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn strategy_reads_label_keyed_json() {
        let strategy: SamplingStrategy =
            serde_json::from_str(r#"{ "hub": { "q": 4.0 }, "leaf": { "num_walks": 0 } }"#)
                .expect("strategy JSON must parse");
        assert_eq!(strategy.len(), 2);
        assert_eq!(strategy.q_for("hub", 1.0), 4.0);
        assert_eq!(strategy.num_walks_for("leaf", 10), 0);
        assert_eq!(strategy.p_for("leaf", 2.0), 2.0);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn strategy_rejects_unknown_override_fields() {
        let parsed = serde_json::from_str::<SamplingStrategy>(r#"{ "hub": { "bias": 4.0 } }"#);
        assert!(parsed.is_err());
    }
}
