//! Undirected, optionally weighted graph consumed by the walk engine.
//!
//! Node labels are opaque strings interned to dense indices in insertion
//! order. Neighbour lists follow edge insertion order so every computation
//! over a graph is deterministic.

use std::collections::{BTreeMap, HashMap};

/// Attribute map attached to an edge. The attribute named by the configured
/// weight key supplies the edge weight.
pub type EdgeAttributes = BTreeMap<String, f64>;

/// Weight used when an edge carries no attribute for the weight key.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Attribute name consulted for edge weights unless configured otherwise.
pub const DEFAULT_WEIGHT_KEY: &str = "weight";

#[derive(Clone, Debug, PartialEq)]
struct Adjacent {
    node: usize,
    edge: usize,
}

/// An immutable undirected graph.
///
/// # Examples
/// ```
/// use flowvec_core::GraphBuilder;
///
/// let mut builder = GraphBuilder::new();
/// builder.add_edge("a", "b");
/// builder.add_edge("b", "c");
/// builder.add_node("isolated");
/// let graph = builder.build();
///
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(graph.edge_count(), 2);
/// let b = graph.index_of("b").expect("b was inserted");
/// assert_eq!(graph.degree(b), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    labels: Vec<String>,
    adjacency: Vec<Vec<Adjacent>>,
    edges: Vec<EdgeAttributes>,
    index: HashMap<String, usize>,
}

impl Graph {
    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label of `node`, if it exists.
    #[must_use]
    pub fn label(&self, node: usize) -> Option<&str> {
        self.labels.get(node).map(String::as_str)
    }

    /// Returns all labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Looks up the index assigned to `label`.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Returns the number of neighbours of `node` (zero for unknown nodes).
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }

    /// Iterates over the neighbours of `node` in edge insertion order.
    pub fn neighbors(&self, node: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|adjacent| adjacent.node)
    }

    /// Iterates over `(neighbour, weight)` pairs of `node`, resolving weights
    /// as [`Graph::edge_weight`] does.
    pub fn weighted_neighbors<'a>(
        &'a self,
        node: usize,
        weight_key: Option<&'a str>,
    ) -> impl ExactSizeIterator<Item = (usize, f64)> + 'a {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |adjacent| {
                let weight = weight_key
                    .and_then(|key| self.edges.get(adjacent.edge)?.get(key).copied())
                    .unwrap_or(DEFAULT_EDGE_WEIGHT);
                (adjacent.node, weight)
            })
    }

    /// Returns whether `left` and `right` share an edge.
    #[must_use]
    pub fn has_edge(&self, left: usize, right: usize) -> bool {
        self.edge_index(left, right).is_some()
    }

    /// Returns the attributes of the edge between `left` and `right`.
    #[must_use]
    pub fn edge_attributes(&self, left: usize, right: usize) -> Option<&EdgeAttributes> {
        self.edge_index(left, right)
            .and_then(|edge| self.edges.get(edge))
    }

    /// Resolves the weight of the edge between `left` and `right`.
    ///
    /// Returns the attribute named by `weight_key`, or [`DEFAULT_EDGE_WEIGHT`]
    /// when the key is `None` or the edge has no such attribute. Returns
    /// `None` when the nodes are not adjacent.
    ///
    /// # Examples
    /// ```
    /// use flowvec_core::{EdgeAttributes, GraphBuilder};
    ///
    /// let mut builder = GraphBuilder::new();
    /// builder.add_edge_with_attributes("a", "b", EdgeAttributes::from([("cost".into(), 4.0)]));
    /// let graph = builder.build();
    ///
    /// assert_eq!(graph.edge_weight(0, 1, Some("cost")), Some(4.0));
    /// assert_eq!(graph.edge_weight(0, 1, Some("weight")), Some(1.0));
    /// assert_eq!(graph.edge_weight(0, 1, None), Some(1.0));
    /// ```
    #[must_use]
    pub fn edge_weight(&self, left: usize, right: usize, weight_key: Option<&str>) -> Option<f64> {
        let attributes = self.edge_attributes(left, right)?;
        let weight = weight_key
            .and_then(|key| attributes.get(key).copied())
            .unwrap_or(DEFAULT_EDGE_WEIGHT);
        Some(weight)
    }

    fn edge_index(&self, left: usize, right: usize) -> Option<usize> {
        let (sparser, target) = if self.degree(left) <= self.degree(right) {
            (left, right)
        } else {
            (right, left)
        };
        self.adjacency
            .get(sparser)?
            .iter()
            .find(|adjacent| adjacent.node == target)
            .map(|adjacent| adjacent.edge)
    }
}

/// Incrementally assembles a [`Graph`].
///
/// Re-adding an existing edge merges its attributes, with later values
/// replacing earlier ones. A self loop appears once in its node's neighbour
/// list.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label` if it is not already present and returns its index.
    pub fn add_node(&mut self, label: &str) -> usize {
        if let Some(&existing) = self.graph.index.get(label) {
            return existing;
        }
        let node = self.graph.labels.len();
        self.graph.labels.push(label.to_owned());
        self.graph.adjacency.push(Vec::new());
        self.graph.index.insert(label.to_owned(), node);
        node
    }

    /// Adds an unweighted edge, creating missing endpoints.
    pub fn add_edge(&mut self, left: &str, right: &str) -> &mut Self {
        self.add_edge_with_attributes(left, right, EdgeAttributes::new())
    }

    /// Adds an edge whose `weight` attribute is `weight`.
    pub fn add_weighted_edge(&mut self, left: &str, right: &str, weight: f64) -> &mut Self {
        let attributes = EdgeAttributes::from([(DEFAULT_WEIGHT_KEY.to_owned(), weight)]);
        self.add_edge_with_attributes(left, right, attributes)
    }

    /// Adds an edge carrying `attributes`, merging into an existing edge.
    pub fn add_edge_with_attributes(
        &mut self,
        left: &str,
        right: &str,
        attributes: EdgeAttributes,
    ) -> &mut Self {
        let left_node = self.add_node(left);
        let right_node = self.add_node(right);

        if let Some(edge) = self.graph.edge_index(left_node, right_node) {
            if let Some(existing) = self.graph.edges.get_mut(edge) {
                existing.extend(attributes);
            }
            return self;
        }

        let edge = self.graph.edges.len();
        self.graph.edges.push(attributes);
        self.push_adjacent(left_node, right_node, edge);
        if left_node != right_node {
            self.push_adjacent(right_node, left_node, edge);
        }
        self
    }

    fn push_adjacent(&mut self, from: usize, to: usize, edge: usize) {
        if let Some(list) = self.graph.adjacency.get_mut(from) {
            list.push(Adjacent { node: to, edge });
        }
    }

    /// Finalizes the graph.
    #[must_use]
    pub fn build(self) -> Graph {
        self.graph
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Graph {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut builder = GraphBuilder::new();
        for (left, right) in iter {
            builder.add_edge(left, right);
        }
        builder.build()
    }
}
