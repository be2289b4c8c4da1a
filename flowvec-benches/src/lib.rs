//! Benchmark support crate for flowvec.
//!
//! Provides seeded synthetic graphs and parameter types used by the Criterion
//! benchmarks for transition precomputation and walk generation.

pub mod error;
pub mod params;
pub mod source;
