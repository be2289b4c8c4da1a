use std::time::Duration;

/// Optional caps on the amount of work a single generation run performs.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use flowvec_core::WalkBudget;
///
/// let budget = WalkBudget::unlimited()
///     .with_max_walks(1_000)
///     .with_time_limit(Duration::from_secs(30));
/// assert_eq!(budget.max_walks(), Some(1_000));
/// assert!(!budget.is_unlimited());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkBudget {
    max_walks: Option<usize>,
    time_limit: Option<Duration>,
}

impl WalkBudget {
    /// A budget that never stops generation.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_walks: None,
            time_limit: None,
        }
    }

    /// Caps the number of walks in the corpus.
    #[must_use]
    pub const fn with_max_walks(mut self, max_walks: usize) -> Self {
        self.max_walks = Some(max_walks);
        self
    }

    /// Caps the wall-clock time spent generating.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Returns the walk cap, if any.
    #[must_use]
    pub const fn max_walks(&self) -> Option<usize> {
        self.max_walks
    }

    /// Returns the time cap, if any.
    #[must_use]
    pub const fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Returns whether neither cap is set.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.max_walks.is_none() && self.time_limit.is_none()
    }

    pub(crate) fn is_exhausted(&self, produced: usize, elapsed: Duration) -> bool {
        self.max_walks.is_some_and(|max| produced >= max)
            || self.time_limit.is_some_and(|limit| elapsed >= limit)
    }
}
