//! Node2vec orchestration: precompute transitions, generate the walk corpus,
//! and hand it to a skip-gram trainer.

use std::num::NonZeroUsize;

use tracing::{info, instrument};
#[cfg(feature = "parallel")]
use tracing::warn;

use crate::{
    Graph, Result, TransitionModel, TransitionParams, WalkBudget, WalkCorpus, WalkGenerator,
    WalkParams,
    builder::ExecutionStrategy,
    error::Node2VecError,
    rng,
    trainer::{SkipGramParams, SkipGramTrainer},
};

/// Entry point for generating node2vec walks and embeddings.
///
/// # Examples
/// ```
/// use flowvec_core::{Graph, Node2VecBuilder};
///
/// let graph: Graph = [("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")]
///     .into_iter()
///     .collect();
/// let node2vec = Node2VecBuilder::new()
///     .with_walk_length(10)
///     .with_num_walks(3)
///     .with_seed(42)
///     .build()
///     .expect("builder must succeed");
///
/// let corpus = node2vec.walks(&graph).expect("walks must succeed");
/// assert_eq!(corpus.len(), 12);
/// assert_eq!(corpus, node2vec.walks(&graph).expect("walks must succeed"));
/// ```
#[derive(Debug, Clone)]
pub struct Node2Vec {
    dimensions: NonZeroUsize,
    transition: TransitionParams,
    generator: WalkGenerator,
    seed: Option<u64>,
    execution_strategy: ExecutionStrategy,
    budget: WalkBudget,
}

impl Node2Vec {
    pub(crate) fn new(
        dimensions: NonZeroUsize,
        transition: TransitionParams,
        generator: WalkGenerator,
        seed: Option<u64>,
        execution_strategy: ExecutionStrategy,
        budget: WalkBudget,
    ) -> Self {
        Self {
            dimensions,
            transition,
            generator,
            seed,
            execution_strategy,
            budget,
        }
    }

    /// Returns the embedding width forwarded to the trainer.
    #[must_use]
    pub fn dimensions(&self) -> NonZeroUsize {
        self.dimensions
    }

    /// Returns the transition parameters.
    #[must_use]
    pub fn transition_params(&self) -> &TransitionParams {
        &self.transition
    }

    /// Returns the global walk parameters.
    #[must_use]
    pub fn walk_params(&self) -> WalkParams {
        self.generator.params()
    }

    /// Returns the fixed seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the execution strategy that will be used when generating.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Returns the work budget applied to generation.
    #[must_use]
    pub fn budget(&self) -> WalkBudget {
        self.budget
    }

    /// Precomputes transitions for `graph` according to the execution
    /// strategy.
    ///
    /// # Errors
    /// Returns the errors of [`TransitionModel::precompute`] and
    /// [`Node2VecError::WorkerPool`] when a dedicated pool cannot be built.
    pub fn precompute(&self, graph: &Graph) -> Result<TransitionModel> {
        let strategy = self.generator.strategy();
        match self.execution_strategy {
            ExecutionStrategy::Sequential => {
                TransitionModel::precompute(graph, &self.transition, strategy)
            }
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Parallel { workers } => in_pool(workers, || {
                TransitionModel::precompute_parallel(graph, &self.transition, strategy)
            })?,
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel { .. } => Err(parallel_unavailable()),
        }
    }

    /// Precomputes transitions for `graph` and generates the walk corpus.
    ///
    /// # Errors
    /// Returns the errors of [`Node2Vec::precompute`].
    #[instrument(
        name = "core.walks",
        err,
        skip_all,
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            strategy = ?self.execution_strategy,
            seeded = self.seed.is_some(),
        ),
    )]
    pub fn walks(&self, graph: &Graph) -> Result<WalkCorpus> {
        let model = self.precompute(graph)?;
        let corpus = self.generate(&model)?;
        info!(walks = corpus.len(), "walk corpus ready");
        Ok(corpus)
    }

    /// Generates a walk corpus from an already computed `model`.
    ///
    /// # Errors
    /// Returns [`Node2VecError::WorkerPool`] when a dedicated pool cannot be
    /// built.
    pub fn generate(&self, model: &TransitionModel) -> Result<WalkCorpus> {
        match self.execution_strategy {
            ExecutionStrategy::Sequential => {
                let mut rng = rng::run_rng(self.seed);
                Ok(if self.budget.is_unlimited() {
                    self.generator.generate(model, &mut rng)
                } else {
                    self.generator
                        .generate_with_budget(model, &mut rng, &self.budget)
                })
            }
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Parallel { workers } => {
                let seed = rng::base_seed(self.seed);
                let corpus = in_pool(workers, || self.generator.generate_parallel(model, seed))?;
                Ok(self.truncate_parallel(corpus))
            }
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel { .. } => Err(parallel_unavailable()),
        }
    }

    /// Returns the skip-gram parameters used by [`Node2Vec::fit`].
    #[must_use]
    pub fn skip_gram_params(&self) -> SkipGramParams {
        let workers = match self.execution_strategy {
            ExecutionStrategy::Sequential => None,
            ExecutionStrategy::Parallel { workers } => workers,
        };
        SkipGramParams::new(self.dimensions).with_workers(workers)
    }

    /// Generates walks on `graph` and trains embeddings with `trainer` using
    /// [`Node2Vec::skip_gram_params`].
    ///
    /// # Errors
    /// Returns the errors of [`Node2Vec::walks`] and
    /// [`Node2VecError::Trainer`] when the trainer fails.
    pub fn fit<T: SkipGramTrainer>(&self, graph: &Graph, trainer: &T) -> Result<T::Model> {
        self.fit_with(graph, trainer, &self.skip_gram_params())
    }

    /// Like [`Node2Vec::fit`], with explicit skip-gram parameters.
    ///
    /// # Errors
    /// Returns the errors of [`Node2Vec::walks`] and
    /// [`Node2VecError::Trainer`] when the trainer fails.
    #[instrument(
        name = "core.fit",
        err,
        skip_all,
        fields(vector_size = params.vector_size().get(), sg = params.sg()),
    )]
    pub fn fit_with<T: SkipGramTrainer>(
        &self,
        graph: &Graph,
        trainer: &T,
        params: &SkipGramParams,
    ) -> Result<T::Model> {
        let sentences = self.walks(graph)?.to_labels(graph);
        trainer
            .train(&sentences, params)
            .map_err(|error| Node2VecError::Trainer {
                message: error.to_string().into(),
            })
    }

    #[cfg(feature = "parallel")]
    fn truncate_parallel(&self, corpus: WalkCorpus) -> WalkCorpus {
        if self.budget.time_limit().is_some() {
            warn!("time limits are not enforced during parallel generation");
        }
        match self.budget.max_walks() {
            Some(max) if corpus.len() > max => {
                let mut walks = corpus.into_inner();
                walks.truncate(max);
                WalkCorpus::from(walks)
            }
            _ => corpus,
        }
    }
}

#[cfg(feature = "parallel")]
fn in_pool<T: Send>(
    workers: Option<NonZeroUsize>,
    job: impl FnOnce() -> T + Send,
) -> Result<T> {
    match workers {
        None => Ok(job()),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.get())
                .build()
                .map_err(|error| Node2VecError::WorkerPool {
                    message: error.to_string().into(),
                })?;
            Ok(pool.install(job))
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn parallel_unavailable() -> Node2VecError {
    Node2VecError::WorkerPool {
        message: "parallel execution requires the `parallel` feature".into(),
    }
}
