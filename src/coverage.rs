//! Coverage verification engine.
//!
//! Verifies that the examples bundled with a rule exercise every
//! structural feature of the rule's XPath expression and maps each gap
//! back to a ruleset line:
//!
//! ```text
//! expression ──> xpath::analyze_expression ──> XPathStructure
//!                                                    │
//!          ┌──────────────┬──────────────┬───────────┤
//!          ▼              ▼              ▼           ▼
//!    node types      attributes      operators   conditionals
//!    (dimensions)    (dimensions)    (dimensions) (strategy dispatch)
//!          │              │              │           │
//!          └──────────────┴──────┬───────┴───────────┘
//!                                ▼
//!                       XPathCoverageResult
//! ```
//!
//! Missing features are annotated with ruleset line numbers through the
//! three-tier locator in [`locate`]. A failed conjunction is overturned
//! when node-type coverage is complete and the examples include both a
//! violation and a valid case.

mod conditionals;
mod dimensions;
mod locate;
mod types;

pub use conditionals::{
    ClauseVec, check_conditional, comparison_strategy, conjunction_strategy, negation_strategy,
    split_top_level
};
pub use dimensions::{check_attributes, check_node_types, check_operators};
pub use locate::LocatorContext;
pub use types::{
    CoverageEvidence, CoverageResult, Dimension, LineAccumulator, XPathCoverageResult
};

use crate::xpath::{self, Conditional, ConditionalKind};

/// Verify that the aggregated example text demonstrates every structural
/// feature of `expression`
///
/// # Notes
///
/// - An empty expression or empty example text yields an empty failing
///   result
/// - An expression with no extractable features passes trivially with an
///   empty coverage list
/// - Supplying a [`LocatorContext`] adds ruleset line numbers to missing
///   features and fills `covered_line_numbers`
pub fn verify_coverage(
    expression: &str,
    example_text: &str,
    locator: Option<&LocatorContext<'_>>
) -> XPathCoverageResult {
    if expression.trim().is_empty() || example_text.trim().is_empty() {
        return XPathCoverageResult::empty_failure();
    }

    let structure = xpath::analyze_expression(expression);
    let mut lines = LineAccumulator::new();
    let mut coverage = Vec::new();

    let mut node_types_complete = None;
    if !structure.node_types.is_empty() {
        let evidence =
            check_node_types(&structure.node_types, example_text, locator, &mut lines);
        node_types_complete = Some(evidence.is_complete());
        coverage.push(dimension_result(evidence));
    }
    if !structure.attributes.is_empty() {
        let evidence =
            check_attributes(&structure.attributes, example_text, locator, &mut lines);
        coverage.push(dimension_result(evidence));
    }
    if !structure.operators.is_empty() {
        let evidence = check_operators(&structure.operators, example_text, locator, &mut lines);
        coverage.push(dimension_result(evidence));
    }

    let mut uncovered_branches = Vec::new();
    if !structure.conditionals.is_empty() {
        let override_conjunctions = node_types_complete == Some(true)
            && has_violation_case(example_text)
            && has_valid_case(example_text);

        let mut evidence = Vec::new();
        let mut passed = 0usize;
        for conditional in &structure.conditionals {
            let mut result = check_conditional(conditional, example_text);
            if !result.success
                && conditional.kind == ConditionalKind::Conjunction
                && override_conjunctions
            {
                result = structural_override_result(conditional);
            }
            if result.success {
                passed += 1;
            } else {
                uncovered_branches.push(annotated_branch(conditional, &result, locator, &mut lines));
            }
            evidence.extend(result.evidence);
        }

        let total = structure.conditionals.len();
        let message = format!("Conditional coverage: {passed}/{total}");
        coverage.push(if passed == total {
            CoverageResult::passed(message, evidence)
        } else {
            CoverageResult::failed(message, evidence)
        });
    }

    let overall_success = coverage.iter().all(|result| result.success);
    XPathCoverageResult {
        coverage,
        overall_success,
        uncovered_branches,
        covered_line_numbers: lines.into_lines()
    }
}

fn dimension_result(evidence: CoverageEvidence) -> CoverageResult {
    let label = match evidence.dimension {
        Dimension::NodeType => "Node type",
        Dimension::Attribute => "Attribute",
        Dimension::Operator => "Operator",
        Dimension::Conditional => "Conditional"
    };
    let message =
        format!("{label} coverage: {}/{}", evidence.count_found, evidence.count_required);
    if evidence.is_complete() {
        CoverageResult::passed(message, vec![evidence])
    } else {
        CoverageResult::failed(message, vec![evidence])
    }
}

/// Passing verdict substituted for a conjunction rescued by the
/// structural override.
fn structural_override_result(conditional: &Conditional) -> CoverageResult {
    CoverageResult::passed(
        format!(
            "Conjunction '{}' covered structurally by paired violation and valid examples",
            conditional.expression.trim()
        ),
        vec![CoverageEvidence::new(Dimension::Conditional, 1, 1, String::new())]
    )
}

/// Branch description for a failed conditional, line-annotated when the
/// locator can place the clause.
fn annotated_branch(
    conditional: &Conditional,
    result: &CoverageResult,
    locator: Option<&LocatorContext<'_>>,
    lines: &mut LineAccumulator
) -> String {
    match locator.and_then(|context| context.locate_conditional(conditional)) {
        Some(number) => {
            lines.record(number);
            format!("{} (line {number})", result.message)
        }
        None => result.message.clone()
    }
}

/// A line flagging a triggered rule, ignoring "no violation" remarks.
fn has_violation_case(example_text: &str) -> bool {
    example_text.lines().any(|line| {
        let lowered = line.to_lowercase();
        lowered.contains("violation") && !lowered.contains("no violation")
    })
}

/// A line marking clean example code.
fn has_valid_case(example_text: &str) -> bool {
    example_text.lines().any(|line| {
        let lowered = line.to_lowercase();
        lowered.contains("no violation") || lowered.contains("// valid") || lowered.contains("// ok")
    })
}
