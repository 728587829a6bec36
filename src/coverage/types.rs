//! Type definitions for the coverage verification engine.
//!
//! This module defines the result values produced when rule examples are
//! checked against the structure of an XPath expression:
//! - [`Dimension`] - The four coverage axes (node types, attributes,
//!   operators, conditionals)
//! - [`CoverageEvidence`] - Per-dimension found/required counts with a
//!   human-readable gap description
//! - [`CoverageResult`] - Pass/fail verdict for one dimension
//! - [`XPathCoverageResult`] - Complete verdict for one rule
//! - [`LineAccumulator`] - Collector for rule-file lines tied to
//!   uncovered features

use std::collections::BTreeSet;

use serde::Serialize;

/// One of the four structural axes a rule's examples must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    /// Syntax-tree node names selected by the expression
    NodeType,
    /// `@Name` attribute references
    Attribute,
    /// Comparison and arithmetic operator tokens
    Operator,
    /// Boolean sub-clauses (conjunctions, negations, comparisons, ...)
    Conditional
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeType => write!(f, "node type"),
            Self::Attribute => write!(f, "attribute"),
            Self::Operator => write!(f, "operator"),
            Self::Conditional => write!(f, "conditional")
        }
    }
}

/// Counted evidence for one dimension of one rule.
///
/// `description` lists only what is missing (optionally with rule-file
/// line numbers); fully covered dimensions carry an empty description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageEvidence {
    /// Which axis this evidence belongs to
    pub dimension:      Dimension,
    /// How many extracted features the examples demonstrate
    pub count_found:    usize,
    /// How many features the expression declares
    pub count_required: usize,
    /// "Missing:" bullet list, empty when nothing is missing
    pub description:    String
}

impl CoverageEvidence {
    /// Create evidence, clamping `count_found` so it never exceeds
    /// `count_required`.
    pub fn new(
        dimension: Dimension,
        count_found: usize,
        count_required: usize,
        description: String
    ) -> Self {
        Self {
            dimension,
            count_found: count_found.min(count_required),
            count_required,
            description
        }
    }

    pub fn is_complete(&self) -> bool {
        self.count_found == self.count_required
    }
}

/// Verdict for a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageResult {
    /// Human-readable summary line
    pub message:  String,
    /// Whether the dimension is fully covered
    pub success:  bool,
    /// Supporting counts and gap descriptions
    pub evidence: Vec<CoverageEvidence>
}

impl CoverageResult {
    pub fn passed(message: impl Into<String>, evidence: Vec<CoverageEvidence>) -> Self {
        Self {
            message: message.into(),
            success: true,
            evidence
        }
    }

    pub fn failed(message: impl Into<String>, evidence: Vec<CoverageEvidence>) -> Self {
        Self {
            message: message.into(),
            success: false,
            evidence
        }
    }
}

/// Complete coverage verdict for one rule's XPath expression.
///
/// `covered_line_numbers` feeds the LCOV export path and is independent
/// of the pass/fail verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XPathCoverageResult {
    /// One entry per non-empty dimension
    pub coverage:             Vec<CoverageResult>,
    /// True iff every produced entry succeeded (or none were produced)
    pub overall_success:      bool,
    /// Descriptions of conditional branches the examples never exercise
    pub uncovered_branches:   Vec<String>,
    /// Rule-file lines tied to features the checkers examined
    pub covered_line_numbers: BTreeSet<usize>
}

impl XPathCoverageResult {
    /// Failing result for absent input (empty expression or no examples).
    pub fn empty_failure() -> Self {
        Self {
            coverage:             Vec::new(),
            overall_success:      false,
            uncovered_branches:   Vec::new(),
            covered_line_numbers: BTreeSet::new()
        }
    }
}

/// Explicit collector for rule-file line numbers discovered while
/// checking, threaded through every checker call instead of held in
/// ambient state.
#[derive(Debug, Clone, Default)]
pub struct LineAccumulator {
    lines: BTreeSet<usize>
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: usize) {
        self.lines.insert(line);
    }

    pub fn into_lines(self) -> BTreeSet<usize> {
        self.lines
    }
}
