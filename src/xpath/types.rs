use compact_str::CompactString;
use indexmap::IndexSet;
use serde::Serialize;

/// Ordered set of extracted feature names.
///
/// Insertion order is discovery order within the expression, which keeps
/// reports aligned with how the rule author wrote the query.
pub type FeatureSet = IndexSet<CompactString>;

/// Kind of boolean sub-clause found in an XPath expression.
///
/// Conditionals are modeled as a flattened list of tagged variants, not as an
/// expression tree: downstream checks only need an independent verdict per
/// clause, never an evaluable structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum ConditionalKind {
    /// A predicate comparing attribute values (`@Size > 3`)
    Comparison,
    /// Clauses joined by `and`
    Conjunction,
    /// A `not(...)` call
    Negation,
    /// Clauses joined by `or`
    Disjunction,
    /// An `if (...) then ... else ...` form
    IfExpression,
    /// A `some`/`every ... satisfies` form
    Quantified,
    /// A boolean function call (`exists`, `contains`, ...)
    BooleanFunction,
    /// Anything the analyzer recognized as conditional but could not classify
    Other
}

impl ConditionalKind {
    /// Connective keyword joining the clause to its neighbors, when one exists.
    ///
    /// Used by the line locator to disambiguate nested clauses: the search
    /// pattern for a conjunction is `and <clause>`, for a disjunction
    /// `or <clause>`.
    pub fn connective(&self) -> Option<&'static str> {
        match self {
            Self::Conjunction => Some("and"),
            Self::Disjunction => Some("or"),
            _ => None
        }
    }
}

impl std::fmt::Display for ConditionalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comparison => write!(f, "comparison"),
            Self::Conjunction => write!(f, "conjunction"),
            Self::Negation => write!(f, "negation"),
            Self::Disjunction => write!(f, "disjunction"),
            Self::IfExpression => write!(f, "if expression"),
            Self::Quantified => write!(f, "quantified expression"),
            Self::BooleanFunction => write!(f, "boolean function"),
            Self::Other => write!(f, "other")
        }
    }
}

/// A boolean sub-clause of an XPath expression.
///
/// `position` is a character offset into the *trimmed* expression that
/// produced this conditional. The line locator re-derives the same trimming
/// before applying the offset; anything else would shift every mapped line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditional {
    pub kind:       ConditionalKind,
    pub expression: String,
    pub position:   usize
}

/// Structural features extracted from one XPath expression.
///
/// Produced by [`analyze`](super::analyze); consumed by the coverage checkers.
/// Every collection may be empty; an expression with nothing to check is a
/// valid (trivially covered) input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct XPathStructure {
    pub node_types:   FeatureSet,
    pub attributes:   FeatureSet,
    pub operators:    FeatureSet,
    pub conditionals: Vec<Conditional>
}

impl XPathStructure {
    /// True when no dimension extracted anything.
    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty()
            && self.attributes.is_empty()
            && self.operators.is_empty()
            && self.conditionals.is_empty()
    }

    /// Total number of extracted features across all dimensions.
    pub fn feature_count(&self) -> usize {
        self.node_types.len()
            + self.attributes.len()
            + self.operators.len()
            + self.conditionals.len()
    }
}
