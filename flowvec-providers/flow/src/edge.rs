//! Flow-edge records and their edge kinds.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::errors::FlowEdgeError;

/// Relation carried by a flow edge.
///
/// Parsing never fails: unrecognised kinds are kept verbatim in
/// [`EdgeKind::Other`] so callers may still select them.
///
/// # Examples
/// ```
/// use flowvec_providers_flow::EdgeKind;
///
/// assert_eq!("REACHES".parse::<EdgeKind>(), Ok(EdgeKind::Reaches));
/// assert_eq!("flows-to".parse::<EdgeKind>(), Ok(EdgeKind::FlowsTo));
/// assert_eq!("CDG".parse::<EdgeKind>(), Ok(EdgeKind::Other("CDG".to_owned())));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Data-flow: a definition reaches a use.
    Reaches,
    /// Control-flow: execution flows to the successor.
    FlowsTo,
    /// Any other relation, as written in the input.
    Other(String),
}

impl FromStr for EdgeKind {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Ok(match normalized.as_str() {
            "reaches" => Self::Reaches,
            "flows_to" => Self::FlowsTo,
            _ => Self::Other(raw.trim().to_owned()),
        })
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reaches => f.write_str("REACHES"),
            Self::FlowsTo => f.write_str("FLOWS_TO"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A directed flow-edge record.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
    /// Node the edge leaves.
    pub source: String,
    /// Node the edge enters.
    pub target: String,
    /// Relation carried by the edge.
    pub kind: EdgeKind,
    /// Optional positive weight.
    pub weight: Option<f64>,
}

impl FlowEdge {
    /// Parses one `source<TAB>target<TAB>kind[<TAB>weight]` record.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. `line` is the
    /// one-based line number used in errors.
    ///
    /// # Errors
    /// Returns [`FlowEdgeError::MissingField`] when a field is absent or
    /// empty, [`FlowEdgeError::InvalidWeight`] for a weight that is not a
    /// finite positive number, and [`FlowEdgeError::TrailingFields`] for extra
    /// columns.
    ///
    /// # Examples
    /// ```
    /// use flowvec_providers_flow::{EdgeKind, FlowEdge};
    ///
    /// let edge = FlowEdge::parse_line(1, "12\t13\tREACHES\t2.5")?.expect("not a comment");
    /// assert_eq!(edge.kind, EdgeKind::Reaches);
    /// assert_eq!(edge.weight, Some(2.5));
    /// assert!(FlowEdge::parse_line(2, "# header")?.is_none());
    /// # Ok::<(), flowvec_providers_flow::FlowEdgeError>(())
    /// ```
    pub fn parse_line(line: usize, text: &str) -> Result<Option<Self>, FlowEdgeError> {
        let trimmed = text.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if fields.len() > 4 {
            return Err(FlowEdgeError::TrailingFields {
                line,
                found: fields.len(),
            });
        }
        let field = |position: usize, name: &'static str| {
            fields
                .get(position)
                .copied()
                .filter(|value| !value.is_empty())
                .ok_or(FlowEdgeError::MissingField { line, field: name })
        };

        let source = field(0, "source")?;
        let target = field(1, "target")?;
        let Ok(kind) = field(2, "kind")?.parse::<EdgeKind>();
        let weight = match fields.get(3).copied().filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(parse_weight(line, raw)?),
            None => None,
        };

        Ok(Some(Self {
            source: source.to_owned(),
            target: target.to_owned(),
            kind,
            weight,
        }))
    }
}

fn parse_weight(line: usize, raw: &str) -> Result<f64, FlowEdgeError> {
    raw.parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite() && *weight > 0.0)
        .ok_or_else(|| FlowEdgeError::InvalidWeight {
            line,
            raw: raw.to_owned(),
        })
}
