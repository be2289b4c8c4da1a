use crate::Graph;

use super::Walk;

/// The ordered collection of walks produced by one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkCorpus {
    walks: Vec<Walk>,
}

impl WalkCorpus {
    /// Returns the walks in generation order.
    #[must_use]
    pub fn walks(&self) -> &[Walk] {
        &self.walks
    }

    /// Returns the number of walks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walks.len()
    }

    /// Returns whether the corpus holds no walks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walks.is_empty()
    }

    /// Iterates over the walks in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Walk> {
        self.walks.iter()
    }

    /// Translates node indices into the labels of `graph`, producing the
    /// sentences a skip-gram trainer consumes.
    ///
    /// Indices unknown to `graph` are dropped.
    #[must_use]
    pub fn to_labels(&self, graph: &Graph) -> Vec<Vec<String>> {
        self.walks
            .iter()
            .map(|walk| {
                walk.iter()
                    .filter_map(|&node| graph.label(node).map(str::to_owned))
                    .collect()
            })
            .collect()
    }

    /// Returns the underlying walks.
    #[must_use]
    pub fn into_inner(self) -> Vec<Walk> {
        self.walks
    }
}

impl From<Vec<Walk>> for WalkCorpus {
    fn from(walks: Vec<Walk>) -> Self {
        Self { walks }
    }
}

impl FromIterator<Walk> for WalkCorpus {
    fn from_iter<I: IntoIterator<Item = Walk>>(iter: I) -> Self {
        Self {
            walks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WalkCorpus {
    type Item = &'a Walk;
    type IntoIter = std::slice::Iter<'a, Walk>;

    fn into_iter(self) -> Self::IntoIter {
        self.walks.iter()
    }
}

impl IntoIterator for WalkCorpus {
    type Item = Walk;
    type IntoIter = std::vec::IntoIter<Walk>;

    fn into_iter(self) -> Self::IntoIter {
        self.walks.into_iter()
    }
}
