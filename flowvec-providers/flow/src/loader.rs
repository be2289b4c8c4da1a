//! Assembles an undirected graph from flow-edge records.

use std::{collections::HashSet, io::BufRead};

use flowvec_core::{DEFAULT_WEIGHT_KEY, EdgeAttributes, Graph, GraphBuilder};
use tracing::{debug, instrument};

use crate::{
    edge::{EdgeKind, FlowEdge},
    errors::FlowEdgeError,
};

/// Counts describing one load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records parsed, excluding blank lines and comments.
    pub records: usize,
    /// Records dropped because their kind was not selected.
    pub filtered: usize,
    /// Records dropped because their undirected pair was already present.
    pub duplicates: usize,
    /// Nodes in the resulting graph.
    pub nodes: usize,
    /// Edges in the resulting graph.
    pub edges: usize,
}

/// Filters flow edges by kind and folds them into an undirected [`Graph`].
///
/// Direction is discarded: `a -> b` and `b -> a` describe the same edge, and
/// only the first record of a pair is kept. Endpoints that only occur on
/// filtered records do not become nodes.
///
/// # Examples
/// ```
/// use flowvec_providers_flow::FlowGraphLoader;
///
/// let input = "a\tb\tREACHES\nb\ta\tFLOWS_TO\nb\tc\tCDG\n";
/// let (graph, report) = FlowGraphLoader::new().load_reader(input.as_bytes())?;
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(report.duplicates, 1);
/// assert_eq!(report.filtered, 1);
/// # Ok::<(), flowvec_providers_flow::FlowEdgeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FlowGraphLoader {
    kinds: Vec<EdgeKind>,
    weight_key: String,
}

impl Default for FlowGraphLoader {
    fn default() -> Self {
        Self {
            kinds: vec![EdgeKind::Reaches, EdgeKind::FlowsTo],
            weight_key: DEFAULT_WEIGHT_KEY.to_owned(),
        }
    }
}

impl FlowGraphLoader {
    /// Creates a loader that keeps `REACHES` and `FLOWS_TO` edges.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set of kinds to keep.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EdgeKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Names the edge attribute that receives record weights.
    #[must_use]
    pub fn with_weight_key(mut self, weight_key: impl Into<String>) -> Self {
        self.weight_key = weight_key.into();
        self
    }

    /// Returns the kinds kept by this loader.
    #[must_use]
    pub fn kinds(&self) -> &[EdgeKind] {
        &self.kinds
    }

    /// Returns whether records of `kind` are kept.
    #[must_use]
    pub fn allows(&self, kind: &EdgeKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Reads tab-separated records from `reader`.
    ///
    /// # Errors
    /// Returns the parse errors of [`FlowEdge::parse_line`],
    /// [`FlowEdgeError::Io`] when reading fails, and
    /// [`FlowEdgeError::EmptyGraph`] when no record is kept.
    #[instrument(name = "providers.flow.load", err, skip_all)]
    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<(Graph, LoadReport), FlowEdgeError> {
        let mut edges = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            if let Some(edge) = FlowEdge::parse_line(index + 1, &line?)? {
                edges.push(edge);
            }
        }
        self.load_edges(edges)
    }

    /// Folds already parsed records into a graph.
    ///
    /// # Errors
    /// Returns [`FlowEdgeError::EmptyGraph`] when no record is kept.
    pub fn load_edges(
        &self,
        edges: impl IntoIterator<Item = FlowEdge>,
    ) -> Result<(Graph, LoadReport), FlowEdgeError> {
        let mut builder = GraphBuilder::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut report = LoadReport::default();

        for edge in edges {
            report.records += 1;
            if !self.allows(&edge.kind) {
                report.filtered += 1;
                continue;
            }
            if !seen.insert(undirected_key(&edge.source, &edge.target)) {
                report.duplicates += 1;
                continue;
            }
            let attributes: EdgeAttributes = edge
                .weight
                .map(|weight| (self.weight_key.clone(), weight))
                .into_iter()
                .collect();
            builder.add_edge_with_attributes(&edge.source, &edge.target, attributes);
        }

        let graph = builder.build();
        if graph.is_empty() {
            return Err(FlowEdgeError::EmptyGraph);
        }
        report.nodes = graph.node_count();
        report.edges = graph.edge_count();
        debug!(
            records = report.records,
            filtered = report.filtered,
            duplicates = report.duplicates,
            nodes = report.nodes,
            edges = report.edges,
            "flow graph assembled"
        );
        Ok((graph, report))
    }
}

fn undirected_key(left: &str, right: &str) -> (String, String) {
    if left <= right {
        (left.to_owned(), right.to_owned())
    } else {
        (right.to_owned(), left.to_owned())
    }
}
