//! Command-line interface orchestration for flowvec.
//!
//! The `walk` command loads a flow-edge file, optionally applies a JSON
//! sampling strategy, and emits the biased random-walk corpus one walk per
//! line.

mod commands;

pub use commands::{
    Cli, CliError, Command, WalkCommand, WalkSummary, render_corpus, run_cli, write_corpus,
};
