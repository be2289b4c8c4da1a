//! Precomputed first-step and second-order transition tables.
//!
//! For every node `current` and every neighbour `previous` the walk may have
//! arrived from, the model stores a distribution over `current`'s neighbours:
//!
//! - returning to `previous` is weighted `w / p`,
//! - moving to a common neighbour of `previous` and `current` keeps `w`,
//! - moving further away is weighted `w / q`,
//!
//! where `w` is the edge weight and `p`, `q` are resolved for `current`. The
//! first step of a walk uses the raw edge weights.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::{
    Graph, Result, SamplingStrategy, TransitionParams,
    error::{Node2VecError, SamplingError},
    sampling::Distribution,
};

#[derive(Clone, Debug, PartialEq)]
struct NodeTable {
    neighbors: Vec<usize>,
    first_step: Option<Distribution>,
    second_order: HashMap<usize, Distribution>,
}

/// Immutable transition tables for biased second-order walks.
///
/// # Examples
/// ```
/// use flowvec_core::{Graph, SamplingStrategy, TransitionModel, TransitionParams};
///
/// let graph: Graph = [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")].into_iter().collect();
/// let params = TransitionParams::new(1.0, 1.0)?;
/// let model = TransitionModel::precompute(&graph, &params, &SamplingStrategy::new())?;
///
/// let (a, c) = (0, 2);
/// let dist = model.second_order(c, a).expect("a-c is an edge");
/// assert_eq!(dist.probabilities(), &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
/// # Ok::<(), flowvec_core::Node2VecError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionModel {
    labels: Vec<String>,
    tables: Vec<NodeTable>,
}

impl TransitionModel {
    /// Builds the transition tables for `graph`.
    ///
    /// # Errors
    /// Returns [`Node2VecError::EmptyGraph`] for a graph without nodes,
    /// [`Node2VecError::InvalidHyperparameter`] for an invalid override,
    /// [`Node2VecError::InvalidEdgeWeight`] for a non-finite or non-positive
    /// weight, and [`Node2VecError::DegenerateDistribution`] when the weights
    /// of some transition sum to zero.
    #[instrument(
        name = "core.precompute",
        err,
        skip_all,
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            p = params.p(),
            q = params.q(),
            overrides = strategy.len(),
        ),
    )]
    pub fn precompute(
        graph: &Graph,
        params: &TransitionParams,
        strategy: &SamplingStrategy,
    ) -> Result<Self> {
        let context = PrecomputeContext::prepare(graph, params, strategy)?;
        let tables = (0..graph.node_count())
            .map(|node| context.node_table(node))
            .collect::<Result<Vec<_>>>()?;
        Ok(context.finish(tables))
    }

    /// Builds the same tables as [`TransitionModel::precompute`], computing
    /// nodes on the Rayon pool. The result is identical to the sequential one.
    ///
    /// # Errors
    /// Returns the same errors as [`TransitionModel::precompute`]. When
    /// several nodes fail, the error of the lowest-indexed node is returned.
    #[cfg(feature = "parallel")]
    #[instrument(
        name = "core.precompute_parallel",
        err,
        skip_all,
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            p = params.p(),
            q = params.q(),
            threads = rayon::current_num_threads(),
        ),
    )]
    pub fn precompute_parallel(
        graph: &Graph,
        params: &TransitionParams,
        strategy: &SamplingStrategy,
    ) -> Result<Self> {
        use rayon::prelude::*;

        let context = PrecomputeContext::prepare(graph, params, strategy)?;
        let outcomes: Vec<Result<NodeTable>> = (0..graph.node_count())
            .into_par_iter()
            .map(|node| context.node_table(node))
            .collect();
        let tables = outcomes.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(context.finish(tables))
    }

    /// Returns the number of nodes covered by the model.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns the label of `node`.
    #[must_use]
    pub fn label(&self, node: usize) -> Option<&str> {
        self.labels.get(node).map(String::as_str)
    }

    /// Returns all node labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the neighbours of `node`. Distributions are aligned with this
    /// slice.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.tables
            .get(node)
            .map(|table| table.neighbors.as_slice())
            .unwrap_or_default()
    }

    /// Returns the distribution for a walk's first step from `node`, or
    /// `None` for an isolated node.
    #[must_use]
    pub fn first_step(&self, node: usize) -> Option<&Distribution> {
        self.tables.get(node)?.first_step.as_ref()
    }

    /// Returns the distribution for leaving `current` after arriving from
    /// `previous`, or `None` when `previous` is not a neighbour of `current`.
    #[must_use]
    pub fn second_order(&self, current: usize, previous: usize) -> Option<&Distribution> {
        self.tables.get(current)?.second_order.get(&previous)
    }

    /// Returns the probability of stepping from `current` to `next`, given
    /// the node the walk arrived from (`None` on the first step).
    #[must_use]
    pub fn transition_probability(
        &self,
        current: usize,
        previous: Option<usize>,
        next: usize,
    ) -> Option<f64> {
        let dist = match previous {
            Some(previous) => self.second_order(current, previous)?,
            None => self.first_step(current)?,
        };
        let position = self.neighbors(current).iter().position(|&n| n == next)?;
        Some(dist.probability(position))
    }

    /// Draws the successor of `current` from the appropriate table.
    ///
    /// Returns `None` when no distribution is stored for the context, which
    /// ends the walk.
    pub(crate) fn step<R: rand::Rng + ?Sized>(
        &self,
        current: usize,
        previous: Option<usize>,
        rng: &mut R,
    ) -> Option<usize> {
        let dist = match previous {
            Some(previous) => self.second_order(current, previous)?,
            None => self.first_step(current)?,
        };
        let position = dist.sample(rng);
        self.neighbors(current).get(position).copied()
    }
}

struct PrecomputeContext<'a> {
    graph: &'a Graph,
    params: &'a TransitionParams,
    strategy: &'a SamplingStrategy,
    neighbor_sets: Vec<HashSet<usize>>,
}

impl<'a> PrecomputeContext<'a> {
    fn prepare(
        graph: &'a Graph,
        params: &'a TransitionParams,
        strategy: &'a SamplingStrategy,
    ) -> Result<Self> {
        if graph.is_empty() {
            return Err(Node2VecError::EmptyGraph);
        }
        strategy.validate()?;
        for label in strategy.inert_entries(graph) {
            warn!(node = label, "sampling strategy entry has no effect");
        }

        let neighbor_sets = (0..graph.node_count())
            .map(|node| graph.neighbors(node).collect::<HashSet<_>>())
            .collect();
        Ok(Self {
            graph,
            params,
            strategy,
            neighbor_sets,
        })
    }

    fn finish(&self, tables: Vec<NodeTable>) -> TransitionModel {
        let contexts: usize = tables.iter().map(|table| table.second_order.len()).sum();
        debug!(contexts, "transition tables built");
        TransitionModel {
            labels: self.graph.labels().to_vec(),
            tables,
        }
    }

    fn label(&self, node: usize) -> &'a str {
        self.graph.label(node).unwrap_or_default()
    }

    fn node_table(&self, current: usize) -> Result<NodeTable> {
        let (neighbors, weights) = self.checked_neighbors(current)?;
        if neighbors.is_empty() {
            return Ok(NodeTable {
                neighbors,
                first_step: None,
                second_order: HashMap::new(),
            });
        }

        let first_step = Distribution::from_weights(&weights)
            .map_err(|error| self.degenerate(current, None, error))?;

        let current_label = self.label(current);
        let p = self.strategy.p_for(current_label, self.params.p());
        let q = self.strategy.q_for(current_label, self.params.q());

        let mut second_order = HashMap::with_capacity(neighbors.len());
        let mut moves = Vec::with_capacity(neighbors.len());
        let mut biased = Vec::with_capacity(neighbors.len());
        for &source in &neighbors {
            let source_neighbors = self.neighbor_sets.get(source);
            moves.clear();
            moves.extend(neighbors.iter().map(|&destination| {
                if destination == source {
                    p
                } else if source_neighbors.is_some_and(|set| set.contains(&destination)) {
                    1.0
                } else {
                    q
                }
            }));
            // Factors are relative to the smallest bias present and stay in
            // [0, 1] even for subnormal `p` or `q`.
            let smallest = moves.iter().copied().fold(f64::INFINITY, f64::min);
            biased.clear();
            biased.extend(
                moves
                    .iter()
                    .zip(&weights)
                    .map(|(&bias, &weight)| weight * bias_factor(bias, smallest)),
            );
            let dist = Distribution::from_weights(&biased)
                .map_err(|error| self.degenerate(current, Some(source), error))?;
            second_order.insert(source, dist);
        }

        Ok(NodeTable {
            neighbors,
            first_step: Some(first_step),
            second_order,
        })
    }

    fn checked_neighbors(&self, node: usize) -> Result<(Vec<usize>, Vec<f64>)> {
        let mut neighbors = Vec::with_capacity(self.graph.degree(node));
        let mut weights = Vec::with_capacity(self.graph.degree(node));
        for (neighbor, weight) in self.graph.weighted_neighbors(node, self.params.weight_key()) {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(Node2VecError::InvalidEdgeWeight {
                    left: self.label(node).into(),
                    right: self.label(neighbor).into(),
                    weight,
                });
            }
            neighbors.push(neighbor);
            weights.push(weight);
        }
        Ok((neighbors, weights))
    }

    fn degenerate(
        &self,
        current: usize,
        previous: Option<usize>,
        error: SamplingError,
    ) -> Node2VecError {
        match error {
            SamplingError::NonPositiveTotal { total } => Node2VecError::DegenerateDistribution {
                current: self.label(current).into(),
                previous: previous.map(|node| self.label(node).into()),
                total,
            },
            other => Node2VecError::Sampling(other),
        }
    }
}

/// Scales a move whose bias is `bias` relative to the smallest bias among the
/// moves out of the same context. When every bias is infinite, every move
/// vanishes.
fn bias_factor(bias: f64, smallest: f64) -> f64 {
    if smallest.is_infinite() {
        0.0
    } else {
        smallest / bias
    }
}

#[cfg(test)]
mod tests;
