//! Validated hyperparameters for transition precomputation and walk generation.

use crate::{
    Result,
    error::Node2VecError,
    graph::DEFAULT_WEIGHT_KEY,
    strategy::check_bias,
};

/// Return/in-out biases and the edge attribute that supplies weights.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionParams {
    p: f64,
    q: f64,
    weight_key: Option<String>,
}

impl TransitionParams {
    /// Creates a parameter set with explicit return and in-out biases.
    ///
    /// The weight key defaults to `weight`.
    ///
    /// # Errors
    /// Returns [`Node2VecError::InvalidHyperparameter`] when `p` or `q` is not
    /// strictly positive.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::TransitionParams;
    ///
    /// let params = TransitionParams::new(0.5, 2.0).expect("parameters must be valid");
    /// assert_eq!(params.p(), 0.5);
    /// assert_eq!(params.weight_key(), Some("weight"));
    /// assert!(TransitionParams::new(0.0, 1.0).is_err());
    /// ```
    pub fn new(p: f64, q: f64) -> Result<Self> {
        check_bias(p).map_err(|reason| Node2VecError::invalid_global("p", reason))?;
        check_bias(q).map_err(|reason| Node2VecError::invalid_global("q", reason))?;
        Ok(Self {
            p,
            q,
            weight_key: Some(DEFAULT_WEIGHT_KEY.to_owned()),
        })
    }

    /// Selects the edge attribute read as weight. `None` treats every edge
    /// as weight `1.0`.
    #[must_use]
    pub fn with_weight_key(mut self, weight_key: Option<String>) -> Self {
        self.weight_key = weight_key;
        self
    }

    /// Returns the global return parameter.
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Returns the global in-out parameter.
    #[must_use]
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Returns the edge attribute read as weight.
    #[must_use]
    pub fn weight_key(&self) -> Option<&str> {
        self.weight_key.as_deref()
    }
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            p: 1.0,
            q: 1.0,
            weight_key: Some(DEFAULT_WEIGHT_KEY.to_owned()),
        }
    }
}

/// Walk count and length used when no per-node override applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkParams {
    walk_length: usize,
    num_walks: usize,
}

impl WalkParams {
    /// Creates walk parameters.
    ///
    /// # Errors
    /// Returns [`Node2VecError::InvalidHyperparameter`] when either value is
    /// zero.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::WalkParams;
    ///
    /// let params = WalkParams::new(80, 10).expect("parameters must be valid");
    /// assert_eq!(params.walk_length(), 80);
    /// assert!(WalkParams::new(0, 10).is_err());
    /// ```
    pub fn new(walk_length: usize, num_walks: usize) -> Result<Self> {
        if walk_length == 0 {
            return Err(Node2VecError::invalid_global(
                "walk_length",
                "walk_length must be at least 1",
            ));
        }
        if num_walks == 0 {
            return Err(Node2VecError::invalid_global(
                "num_walks",
                "num_walks must be at least 1",
            ));
        }
        Ok(Self {
            walk_length,
            num_walks,
        })
    }

    /// Returns the global walk length, in nodes.
    #[must_use]
    pub fn walk_length(&self) -> usize {
        self.walk_length
    }

    /// Returns the number of rounds over the node set.
    #[must_use]
    pub fn num_walks(&self) -> usize {
        self.num_walks
    }
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            walk_length: 80,
            num_walks: 10,
        }
    }
}
