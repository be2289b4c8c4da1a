//! Flowvec core library: biased second-order random walks (node2vec) over
//! program-dependence graphs.
//!
//! The pipeline is [`TransitionModel::precompute`] followed by
//! [`WalkGenerator::generate`]; [`Node2Vec`] wires both together and hands
//! the corpus to an external [`SkipGramTrainer`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod graph;
mod node2vec;
mod params;
mod rng;
mod sampling;
mod strategy;
mod trainer;
mod transition;
mod walk;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ExecutionStrategy, Node2VecBuilder},
    error::{Node2VecError, Node2VecErrorCode, Result, SamplingError, SamplingErrorCode},
    graph::{DEFAULT_EDGE_WEIGHT, DEFAULT_WEIGHT_KEY, EdgeAttributes, Graph, GraphBuilder},
    node2vec::Node2Vec,
    params::{TransitionParams, WalkParams},
    sampling::{Distribution, choose_weighted, choose_weighted_from},
    strategy::{NodeOverrides, SamplingStrategy},
    trainer::{SKIP_GRAM, SkipGramParams, SkipGramTrainer},
    transition::TransitionModel,
    walk::{Walk, WalkBudget, WalkCorpus, WalkGenerator, Walks},
};
