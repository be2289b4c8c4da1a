//! Flow-edge provider: turns directed data-flow and control-flow records from
//! a program-dependence graph into the undirected [`flowvec_core::Graph`]
//! consumed by the walk engine.

mod edge;
mod errors;
mod loader;

pub use edge::{EdgeKind, FlowEdge};
pub use errors::FlowEdgeError;
pub use loader::{FlowGraphLoader, LoadReport};

#[cfg(test)]
mod tests;
