//! Builder utilities for configuring node2vec runs.
//!
//! Exposes the execution strategy selection surface and the validation that
//! happens before a [`Node2Vec`] instance exists, so no computation starts
//! with an out-of-domain hyperparameter.

use std::num::NonZeroUsize;

use crate::{
    Result, SamplingStrategy, TransitionParams, WalkBudget, WalkGenerator, WalkParams,
    error::Node2VecError, graph::DEFAULT_WEIGHT_KEY, node2vec::Node2Vec,
};

/// Indicates how [`Node2Vec`] schedules precomputation and walk generation.
///
/// `Sequential` runs on the calling thread and reproduces the corpus,
/// including its order, for a fixed seed. `Parallel` spreads nodes and walk
/// rounds over a Rayon pool; for a fixed seed the corpus is still fully
/// determined, but its order differs from the sequential one.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use flowvec_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Parallel { workers: NonZeroUsize::new(4) };
/// assert!(matches!(strategy, ExecutionStrategy::Parallel { .. }));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Run everything on the calling thread.
    #[default]
    Sequential,
    /// Run on a Rayon pool. `None` uses the global pool; `Some(n)` builds a
    /// dedicated pool with `n` threads.
    Parallel {
        /// Number of worker threads.
        workers: Option<NonZeroUsize>,
    },
}

/// Configures and constructs [`Node2Vec`] instances.
///
/// # Examples
/// ```
/// use flowvec_core::{ExecutionStrategy, Node2VecBuilder};
///
/// let node2vec = Node2VecBuilder::new()
///     .with_walk_length(20)
///     .with_num_walks(5)
///     .with_p(0.5)
///     .with_q(2.0)
///     .with_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(node2vec.walk_params().walk_length(), 20);
/// assert_eq!(node2vec.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct Node2VecBuilder {
    dimensions: usize,
    walk_length: usize,
    num_walks: usize,
    p: f64,
    q: f64,
    weight_key: Option<String>,
    sampling_strategy: SamplingStrategy,
    seed: Option<u64>,
    execution_strategy: ExecutionStrategy,
    budget: WalkBudget,
}

impl Default for Node2VecBuilder {
    fn default() -> Self {
        Self {
            dimensions: 128,
            walk_length: 80,
            num_walks: 10,
            p: 1.0,
            q: 1.0,
            weight_key: Some(DEFAULT_WEIGHT_KEY.to_owned()),
            sampling_strategy: SamplingStrategy::new(),
            seed: None,
            execution_strategy: ExecutionStrategy::Sequential,
            budget: WalkBudget::unlimited(),
        }
    }
}

impl Node2VecBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::Node2VecBuilder;
    ///
    /// let builder = Node2VecBuilder::new();
    /// assert_eq!(builder.dimensions(), 128);
    /// assert_eq!(builder.walk_length(), 80);
    /// assert_eq!(builder.num_walks(), 10);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the embedding width forwarded to the skip-gram trainer.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Returns the configured embedding width.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Sets the global walk length, in nodes.
    #[must_use]
    pub fn with_walk_length(mut self, walk_length: usize) -> Self {
        self.walk_length = walk_length;
        self
    }

    /// Returns the configured global walk length.
    #[must_use]
    pub fn walk_length(&self) -> usize {
        self.walk_length
    }

    /// Sets the number of rounds over the node set.
    #[must_use]
    pub fn with_num_walks(mut self, num_walks: usize) -> Self {
        self.num_walks = num_walks;
        self
    }

    /// Returns the configured number of rounds.
    #[must_use]
    pub fn num_walks(&self) -> usize {
        self.num_walks
    }

    /// Sets the global return parameter.
    #[must_use]
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Sets the global in-out parameter.
    #[must_use]
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Selects the edge attribute read as weight; `None` treats every edge as
    /// weight `1.0`.
    #[must_use]
    pub fn with_weight_key(mut self, weight_key: Option<String>) -> Self {
        self.weight_key = weight_key;
        self
    }

    /// Sets the per-node overrides.
    #[must_use]
    pub fn with_sampling_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.sampling_strategy = strategy;
        self
    }

    /// Fixes the random seed. Without a seed every run draws one from OS
    /// entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the execution strategy to use when generating walks.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::{ExecutionStrategy, Node2VecBuilder};
    ///
    /// let builder = Node2VecBuilder::new()
    ///     .with_execution_strategy(ExecutionStrategy::Parallel { workers: None });
    /// assert_eq!(
    ///     builder.execution_strategy(),
    ///     ExecutionStrategy::Parallel { workers: None }
    /// );
    /// ```
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Bounds the amount of work a run performs.
    #[must_use]
    pub fn with_budget(mut self, budget: WalkBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Validates the configuration and constructs a [`Node2Vec`] instance.
    ///
    /// # Errors
    /// Returns [`Node2VecError::InvalidHyperparameter`] when `dimensions`,
    /// `walk_length`, or `num_walks` is zero, when `p` or `q` is not strictly
    /// positive, or when a per-node override is out of its domain. Returns
    /// [`Node2VecError::WorkerPool`] when parallel execution is requested in a
    /// build without the `parallel` feature.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::{Node2VecBuilder, Node2VecErrorCode};
    ///
    /// let err = Node2VecBuilder::new().with_q(0.0).build().unwrap_err();
    /// assert_eq!(err.code(), Node2VecErrorCode::InvalidHyperparameter);
    /// ```
    pub fn build(self) -> Result<Node2Vec> {
        let dimensions = NonZeroUsize::new(self.dimensions).ok_or_else(|| {
            Node2VecError::invalid_global("dimensions", "dimensions must be at least 1")
        })?;
        let transition = TransitionParams::new(self.p, self.q)?.with_weight_key(self.weight_key);
        let walk = WalkParams::new(self.walk_length, self.num_walks)?;
        let generator = WalkGenerator::new(walk, self.sampling_strategy)?;

        #[cfg(not(feature = "parallel"))]
        if matches!(self.execution_strategy, ExecutionStrategy::Parallel { .. }) {
            return Err(Node2VecError::WorkerPool {
                message: "parallel execution requires the `parallel` feature".into(),
            });
        }

        Ok(Node2Vec::new(
            dimensions,
            transition,
            generator,
            self.seed,
            self.execution_strategy,
            self.budget,
        ))
    }
}
