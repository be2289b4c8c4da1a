//! Hand-off seam to an external skip-gram embedding trainer.

use std::num::NonZeroUsize;

/// Architecture flag understood by skip-gram trainers: `1` selects
/// skip-gram, `0` selects CBOW.
pub const SKIP_GRAM: u8 = 1;

/// Parameters forwarded to a [`SkipGramTrainer`].
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use flowvec_core::SkipGramParams;
///
/// let params = SkipGramParams::new(NonZeroUsize::new(64).expect("non-zero"))
///     .with_window(5);
/// assert_eq!(params.vector_size().get(), 64);
/// assert_eq!(params.sg(), 1);
/// assert_eq!(params.window(), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkipGramParams {
    vector_size: NonZeroUsize,
    sg: u8,
    window: usize,
    min_count: usize,
    workers: Option<NonZeroUsize>,
}

impl SkipGramParams {
    /// Creates skip-gram parameters for embeddings of width `vector_size`.
    #[must_use]
    pub const fn new(vector_size: NonZeroUsize) -> Self {
        Self {
            vector_size,
            sg: SKIP_GRAM,
            window: 10,
            min_count: 1,
            workers: None,
        }
    }

    /// Overrides the architecture flag; `0` selects CBOW.
    #[must_use]
    pub const fn with_sg(mut self, sg: u8) -> Self {
        self.sg = sg;
        self
    }

    /// Sets the context window size.
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the minimum token frequency kept by the trainer.
    #[must_use]
    pub const fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    /// Sets the trainer's worker count.
    #[must_use]
    pub const fn with_workers(mut self, workers: Option<NonZeroUsize>) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the embedding width.
    #[must_use]
    pub const fn vector_size(&self) -> NonZeroUsize {
        self.vector_size
    }

    /// Returns the architecture flag.
    #[must_use]
    pub const fn sg(&self) -> u8 {
        self.sg
    }

    /// Returns the context window size.
    #[must_use]
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Returns the minimum token frequency.
    #[must_use]
    pub const fn min_count(&self) -> usize {
        self.min_count
    }

    /// Returns the trainer's worker count, if fixed.
    #[must_use]
    pub const fn workers(&self) -> Option<NonZeroUsize> {
        self.workers
    }
}

/// A skip-gram trainer that turns a labelled walk corpus into a model.
///
/// Implementations live outside this crate; the core only prepares the
/// sentences and parameters.
pub trait SkipGramTrainer {
    /// The trained embedding model.
    type Model;
    /// Failure reported by the trainer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Trains a model on `sentences`, each a walk of node labels.
    ///
    /// # Errors
    /// Returns the trainer's own error type when training fails.
    fn train(
        &self,
        sentences: &[Vec<String>],
        params: &SkipGramParams,
    ) -> Result<Self::Model, Self::Error>;
}
