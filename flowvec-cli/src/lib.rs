//! Support library for the flowvec CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and
//! integration tests can exercise them without spawning a subprocess.

pub mod cli;
pub mod logging;
