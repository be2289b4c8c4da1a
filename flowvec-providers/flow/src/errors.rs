use thiserror::Error;

/// Failure while reading flow-edge records or assembling the graph.
#[derive(Debug, Error)]
pub enum FlowEdgeError {
    /// A record lacked a required tab-separated field.
    #[error("line {line}: missing `{field}` field")]
    MissingField {
        /// One-based line number.
        line: usize,
        /// Name of the absent field.
        field: &'static str,
    },
    /// A record carried a weight that is not a finite positive number.
    #[error("line {line}: weight `{raw}` must be a finite positive number")]
    InvalidWeight {
        /// One-based line number.
        line: usize,
        /// The weight text as written.
        raw: String,
    },
    /// A record had more than four fields.
    #[error("line {line}: expected at most 4 fields but found {found}")]
    TrailingFields {
        /// One-based line number.
        line: usize,
        /// Number of fields found.
        found: usize,
    },
    /// No record survived edge-kind filtering.
    #[error("no edges of the selected kinds were found")]
    EmptyGraph,
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
