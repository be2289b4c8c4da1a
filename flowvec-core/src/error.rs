//! Error types for the flowvec core library.
//!
//! Defines the error enums exposed by the public API, their stable error
//! codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by the weighted sampling primitive.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SamplingError {
    /// No candidates were supplied.
    #[error("cannot sample from an empty candidate list")]
    Empty,
    /// Candidate and weight slices had different lengths.
    #[error("{candidates} candidates were given with {weights} weights")]
    LengthMismatch {
        /// Number of candidates supplied.
        candidates: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// A weight was negative, NaN, or infinite.
    #[error("weight {weight} at index {index} is not a finite non-negative number")]
    InvalidWeight {
        /// Position of the offending weight.
        index: usize,
        /// The offending weight.
        weight: f64,
    },
    /// Weights summed to zero (or underflowed), so no candidate can be drawn.
    #[error("weights sum to {total}, which is not strictly positive")]
    NonPositiveTotal {
        /// Sum of the supplied weights.
        total: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SamplingError`] variants.
    enum SamplingErrorCode for SamplingError {
        /// No candidates were supplied.
        Empty => Empty => "SAMPLING_EMPTY",
        /// Candidate and weight slices had different lengths.
        LengthMismatch => LengthMismatch { .. } => "SAMPLING_LENGTH_MISMATCH",
        /// A weight was negative, NaN, or infinite.
        InvalidWeight => InvalidWeight { .. } => "SAMPLING_INVALID_WEIGHT",
        /// Weights summed to a non-positive total.
        NonPositiveTotal => NonPositiveTotal { .. } => "SAMPLING_NON_POSITIVE_TOTAL",
    }
}

/// Error type produced when configuring or running node2vec walk generation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Node2VecError {
    /// A hyperparameter (global or per-node override) was outside its domain.
    #[error("invalid hyperparameter `{name}`{}: {reason}", node_suffix(.node.as_deref()))]
    InvalidHyperparameter {
        /// Name of the offending parameter, e.g. `p` or `walk_length`.
        name: &'static str,
        /// Node whose override was invalid, or `None` for a global value.
        node: Option<Arc<str>>,
        /// Human-readable description of the violated constraint.
        reason: Arc<str>,
    },
    /// The unnormalized weights for a transition summed to a non-positive value.
    #[error(
        "transition weights at `{current}`{} sum to {total}; adjust p/q or filter the graph",
        previous_suffix(.previous.as_deref())
    )]
    DegenerateDistribution {
        /// Node the walk would be leaving.
        current: Arc<str>,
        /// Node the walk arrived from, or `None` for a first step.
        previous: Option<Arc<str>>,
        /// Sum of the unnormalized weights.
        total: f64,
    },
    /// An edge weight resolved to a non-finite or non-positive value.
    #[error("edge `{left}`-`{right}` has weight {weight}; weights must be finite and positive")]
    InvalidEdgeWeight {
        /// One endpoint of the edge.
        left: Arc<str>,
        /// The other endpoint of the edge.
        right: Arc<str>,
        /// The offending weight.
        weight: f64,
    },
    /// The graph has no nodes.
    #[error("graph contains no nodes")]
    EmptyGraph,
    /// The weighted sampler rejected its input.
    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    /// The worker pool for parallel execution could not be created.
    #[error("failed to build worker pool: {message}")]
    WorkerPool {
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
    /// The external skip-gram trainer failed.
    #[error("skip-gram trainer failed: {message}")]
    Trainer {
        /// Message reported by the trainer.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`Node2VecError`] variants.
    enum Node2VecErrorCode for Node2VecError {
        /// A hyperparameter was outside its domain.
        InvalidHyperparameter => InvalidHyperparameter { .. } => "FLOWVEC_INVALID_HYPERPARAMETER",
        /// Transition weights summed to a non-positive value.
        DegenerateDistribution => DegenerateDistribution { .. } => "FLOWVEC_DEGENERATE_DISTRIBUTION",
        /// An edge weight was non-finite or non-positive.
        InvalidEdgeWeight => InvalidEdgeWeight { .. } => "FLOWVEC_INVALID_EDGE_WEIGHT",
        /// The graph has no nodes.
        EmptyGraph => EmptyGraph => "FLOWVEC_EMPTY_GRAPH",
        /// The weighted sampler rejected its input.
        SamplingFailure => Sampling(..) => "FLOWVEC_SAMPLING_FAILURE",
        /// The worker pool could not be created.
        WorkerPool => WorkerPool { .. } => "FLOWVEC_WORKER_POOL",
        /// The external trainer failed.
        TrainerFailure => Trainer { .. } => "FLOWVEC_TRAINER_FAILURE",
    }
}

impl Node2VecError {
    /// Retrieve the inner [`SamplingErrorCode`] when the error originated in the sampler.
    #[must_use]
    pub const fn sampling_code(&self) -> Option<SamplingErrorCode> {
        match self {
            Self::Sampling(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn invalid_global(name: &'static str, reason: impl Into<Arc<str>>) -> Self {
        Self::InvalidHyperparameter {
            name,
            node: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_override(
        name: &'static str,
        node: &str,
        reason: impl Into<Arc<str>>,
    ) -> Self {
        Self::InvalidHyperparameter {
            name,
            node: Some(Arc::from(node)),
            reason: reason.into(),
        }
    }
}

fn node_suffix(node: Option<&str>) -> String {
    node.map(|label| format!(" for node `{label}`"))
        .unwrap_or_default()
}

fn previous_suffix(previous: Option<&str>) -> String {
    previous
        .map(|label| format!(" (arriving from `{label}`)"))
        .unwrap_or_default()
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, Node2VecError>;
