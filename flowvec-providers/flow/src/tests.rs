//! Unit tests for record parsing.

use rstest::rstest;

use crate::{EdgeKind, FlowEdge, FlowEdgeError};

#[rstest]
#[case("reaches", EdgeKind::Reaches)]
#[case(" REACHES ", EdgeKind::Reaches)]
#[case("FLOWS_TO", EdgeKind::FlowsTo)]
#[case("Flows-To", EdgeKind::FlowsTo)]
#[case("IS_AST_PARENT", EdgeKind::Other("IS_AST_PARENT".to_owned()))]
fn edge_kinds_parse_case_insensitively(#[case] raw: &str, #[case] expected: EdgeKind) {
    let Ok(kind) = raw.parse::<EdgeKind>();
    assert_eq!(kind, expected);
}

#[rstest]
fn edge_kinds_display_canonically() {
    assert_eq!(EdgeKind::FlowsTo.to_string(), "FLOWS_TO");
    assert_eq!(EdgeKind::Other("CDG".to_owned()).to_string(), "CDG");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("# source\ttarget\tkind")]
#[case("  # indented comment")]
fn blank_and_comment_lines_are_skipped(#[case] text: &str) {
    assert_eq!(FlowEdge::parse_line(1, text).expect("parse must succeed"), None);
}

#[rstest]
fn records_without_weight_parse() {
    let edge = FlowEdge::parse_line(3, "x\ty\tFLOWS_TO\r\n")
        .expect("parse must succeed")
        .expect("record expected");
    assert_eq!(
        edge,
        FlowEdge {
            source: "x".to_owned(),
            target: "y".to_owned(),
            kind: EdgeKind::FlowsTo,
            weight: None,
        }
    );
}

#[rstest]
#[case("x", "target")]
#[case("x\ty", "kind")]
#[case("x\t\tREACHES", "target")]
#[case("\ty\tREACHES", "source")]
fn missing_fields_are_reported(#[case] text: &str, #[case] expected: &'static str) {
    let err = FlowEdge::parse_line(7, text).expect_err("record is incomplete");
    assert!(matches!(
        err,
        FlowEdgeError::MissingField { line: 7, field } if field == expected
    ));
}

#[rstest]
#[case("0")]
#[case("-1.5")]
#[case("NaN")]
#[case("inf")]
#[case("heavy")]
fn invalid_weights_are_reported(#[case] raw: &str) {
    let err = FlowEdge::parse_line(2, &format!("a\tb\tREACHES\t{raw}"))
        .expect_err("weight must be rejected");
    assert!(matches!(err, FlowEdgeError::InvalidWeight { line: 2, .. }));
}

#[rstest]
fn trailing_fields_are_rejected() {
    let err = FlowEdge::parse_line(4, "a\tb\tREACHES\t1\textra").expect_err("too many fields");
    assert!(matches!(err, FlowEdgeError::TrailingFields { line: 4, found: 5 }));
}
