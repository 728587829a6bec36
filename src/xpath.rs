mod extract;
mod types;

pub use types::{Conditional, ConditionalKind, FeatureSet, XPathStructure};

/// Decompose a rule's XPath expression into the structural features its
/// examples must demonstrate
///
/// # Notes
///
/// - Heuristic: no full XPath grammar is parsed
/// - Never fails; unrecognized syntax yields fewer features, not errors
pub fn analyze_expression(expression: &str) -> XPathStructure {
    extract::extract_structure(expression)
}
