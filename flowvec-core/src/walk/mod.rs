//! Walk corpus generation over a precomputed [`TransitionModel`].
//!
//! Each round visits every node in a freshly shuffled order and starts one
//! walk per node, unless the node's `num_walks` override has already been
//! used up. A walk stops early when it reaches a node with no stored
//! distribution for its context.

mod budget;
mod corpus;

use std::{ops::Range, time::Instant};

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{Result, SamplingStrategy, TransitionModel, WalkParams};

pub use self::{budget::WalkBudget, corpus::WalkCorpus};

/// A walk expressed as node indices into the originating graph.
pub type Walk = Vec<usize>;

/// Upper bound on the steps reserved before a walk starts. Walks may still
/// grow past it; the bound only stops huge lengths from over-allocating.
const PREALLOCATED_STEPS: usize = 256;

/// Resolved per-node plan: how many rounds start a walk at the node and how
/// long those walks may grow.
#[derive(Clone, Copy, Debug)]
struct NodePlan {
    num_walks: usize,
    walk_length: usize,
}

/// Generates biased random walks from a [`TransitionModel`].
///
/// # Examples
/// ```
/// use flowvec_core::{
///     Graph, SamplingStrategy, TransitionModel, TransitionParams, WalkGenerator, WalkParams,
/// };
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph: Graph = [("a", "b"), ("b", "c")].into_iter().collect();
/// let model = TransitionModel::precompute(
///     &graph,
///     &TransitionParams::default(),
///     &SamplingStrategy::new(),
/// )?;
/// let generator = WalkGenerator::new(WalkParams::new(4, 2)?, SamplingStrategy::new())?;
///
/// let corpus = generator.generate(&model, &mut SmallRng::seed_from_u64(1));
/// assert_eq!(corpus.len(), 6);
/// assert!(corpus.walks().iter().all(|walk| walk.len() == 4));
/// # Ok::<(), flowvec_core::Node2VecError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkGenerator {
    params: WalkParams,
    strategy: SamplingStrategy,
}

impl WalkGenerator {
    /// Creates a generator from global walk parameters and per-node
    /// overrides.
    ///
    /// # Errors
    /// Returns [`crate::Node2VecError::InvalidHyperparameter`] when an
    /// override is out of its domain.
    pub fn new(params: WalkParams, strategy: SamplingStrategy) -> Result<Self> {
        strategy.validate()?;
        Ok(Self { params, strategy })
    }

    /// Returns the global walk parameters.
    #[must_use]
    pub fn params(&self) -> WalkParams {
        self.params
    }

    /// Returns the per-node overrides.
    #[must_use]
    pub fn strategy(&self) -> &SamplingStrategy {
        &self.strategy
    }

    /// Lazily yields the walks of every round in corpus order.
    ///
    /// The iterator borrows `rng` for its whole lifetime; dropping it early
    /// is how callers bound the amount of work.
    pub fn walks<'a, R: Rng + ?Sized>(
        &'a self,
        model: &'a TransitionModel,
        rng: &'a mut R,
    ) -> Walks<'a, R> {
        Walks::new(self.plans(model), model, rng, 0..self.params.num_walks())
    }

    /// Generates the complete corpus on the current thread.
    ///
    /// For a fixed seed the corpus, including its order, is reproducible.
    #[instrument(
        name = "core.generate",
        skip_all,
        fields(
            nodes = model.node_count(),
            num_walks = self.params.num_walks(),
            walk_length = self.params.walk_length(),
        ),
    )]
    pub fn generate<R: Rng + ?Sized>(&self, model: &TransitionModel, rng: &mut R) -> WalkCorpus {
        let corpus: WalkCorpus = self.walks(model, rng).collect();
        debug!(walks = corpus.len(), "walk corpus generated");
        corpus
    }

    /// Generates walks until the corpus completes or `budget` is exhausted.
    ///
    /// The walks produced are a prefix of what [`WalkGenerator::generate`]
    /// yields for the same generator state.
    #[instrument(
        name = "core.generate_with_budget",
        skip_all,
        fields(
            nodes = model.node_count(),
            max_walks = ?budget.max_walks(),
            time_limit = ?budget.time_limit(),
        ),
    )]
    pub fn generate_with_budget<R: Rng + ?Sized>(
        &self,
        model: &TransitionModel,
        rng: &mut R,
        budget: &WalkBudget,
    ) -> WalkCorpus {
        let started = Instant::now();
        let mut walks = self.walks(model, rng);
        let mut corpus = Vec::new();
        loop {
            if budget.is_exhausted(corpus.len(), started.elapsed()) {
                debug!(walks = corpus.len(), "walk budget exhausted");
                break;
            }
            let Some(walk) = walks.next() else {
                break;
            };
            corpus.push(walk);
        }
        WalkCorpus::from(corpus)
    }

    /// Generates the corpus with one Rayon job per round.
    ///
    /// Round `r` draws from a private generator seeded by mixing `seed` with
    /// `r`, so the corpus is fully determined by `seed` and does not depend
    /// on the number of worker threads. Its order differs from the
    /// sequential corpus for the same seed.
    #[cfg(feature = "parallel")]
    #[instrument(
        name = "core.generate_parallel",
        skip_all,
        fields(
            nodes = model.node_count(),
            num_walks = self.params.num_walks(),
            threads = rayon::current_num_threads(),
        ),
    )]
    pub fn generate_parallel(&self, model: &TransitionModel, seed: u64) -> WalkCorpus {
        use rand::{SeedableRng, rngs::SmallRng};
        use rayon::prelude::*;

        let plans = self.plans(model);
        let rounds: Vec<Vec<Walk>> = (0..self.params.num_walks())
            .into_par_iter()
            .map(|round| {
                let mut rng = SmallRng::seed_from_u64(crate::rng::mix_stream_seed(seed, round));
                Walks::new(plans.clone(), model, &mut rng, round..round + 1).collect()
            })
            .collect();
        let corpus: WalkCorpus = rounds.into_iter().flatten().collect();
        debug!(walks = corpus.len(), "walk corpus generated");
        corpus
    }

    fn plans(&self, model: &TransitionModel) -> Vec<NodePlan> {
        let global_walks = self.params.num_walks();
        let global_length = self.params.walk_length();
        model
            .labels()
            .iter()
            .map(|label| NodePlan {
                num_walks: self.strategy.num_walks_for(label, global_walks),
                walk_length: self.strategy.walk_length_for(label, global_length),
            })
            .collect()
    }
}

/// Lazy iterator over generated walks, created by [`WalkGenerator::walks`].
pub struct Walks<'a, R: ?Sized> {
    plans: Vec<NodePlan>,
    model: &'a TransitionModel,
    rng: &'a mut R,
    rounds: Range<usize>,
    round: Option<usize>,
    order: Vec<usize>,
    cursor: usize,
}

impl<'a, R: Rng + ?Sized> Walks<'a, R> {
    fn new(
        plans: Vec<NodePlan>,
        model: &'a TransitionModel,
        rng: &'a mut R,
        rounds: Range<usize>,
    ) -> Self {
        let order = (0..plans.len()).collect();
        Self {
            plans,
            model,
            rng,
            rounds,
            round: None,
            order,
            cursor: 0,
        }
    }

    fn next_source(&mut self) -> Option<(usize, usize)> {
        loop {
            let round = match self.round {
                Some(round) if self.cursor < self.order.len() => round,
                _ => {
                    let round = self.rounds.next()?;
                    self.order.shuffle(&mut *self.rng);
                    self.cursor = 0;
                    self.round = Some(round);
                    round
                }
            };
            let source = self.order.get(self.cursor).copied();
            self.cursor += 1;
            let Some(source) = source else {
                continue;
            };
            let Some(plan) = self.plans.get(source) else {
                continue;
            };
            if round < plan.num_walks {
                return Some((source, plan.walk_length));
            }
        }
    }

    fn walk_from(&mut self, source: usize, walk_length: usize) -> Walk {
        let mut walk = Vec::with_capacity(walk_length.min(PREALLOCATED_STEPS));
        walk.push(source);
        let mut previous = None;
        let mut current = source;
        while walk.len() < walk_length {
            let Some(next) = self.model.step(current, previous, &mut *self.rng) else {
                break;
            };
            walk.push(next);
            previous = Some(current);
            current = next;
        }
        walk
    }
}

impl<R: Rng + ?Sized> Iterator for Walks<'_, R> {
    type Item = Walk;

    fn next(&mut self) -> Option<Self::Item> {
        let (source, walk_length) = self.next_source()?;
        Some(self.walk_from(source, walk_length))
    }
}

#[cfg(test)]
mod property;
