use std::io::Write;

use tempfile::NamedTempFile;
use xpath_rule_coverage::{
    coverage::{CoverageEvidence, Dimension, LocatorContext, verify_coverage},
    ruledef::RuleSet
};

const COVERED_EXPRESSION: &str = "//WhileStatement[@Depth > 2]";

const COVERED_EXAMPLES: &str = "\
while (depth > 2) { } // violation
// Depth: 3
while (x) { } // no violation
// Depth: 1
";

#[test]
fn test_fully_covered_rule_passes() {
    let result = verify_coverage(COVERED_EXPRESSION, COVERED_EXAMPLES, None);

    assert!(result.overall_success);
    assert_eq!(result.coverage.len(), 4);
    assert!(result.uncovered_branches.is_empty());
    assert!(result.covered_line_numbers.is_empty());
}

#[test]
fn test_dimension_messages_carry_counts() {
    let result = verify_coverage(COVERED_EXPRESSION, COVERED_EXAMPLES, None);

    let messages: Vec<&str> = result.coverage.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Node type coverage: 1/1",
            "Attribute coverage: 1/1",
            "Operator coverage: 1/1",
            "Conditional coverage: 1/1"
        ]
    );
}

#[test]
fn test_empty_expression_fails() {
    let result = verify_coverage("", "class A { }", None);

    assert!(!result.overall_success);
    assert!(result.coverage.is_empty());
}

#[test]
fn test_blank_example_text_fails() {
    let result = verify_coverage("//WhileStatement", "   ", None);

    assert!(!result.overall_success);
    assert!(result.coverage.is_empty());
}

#[test]
fn test_expression_without_features_passes_trivially() {
    let result = verify_coverage("/foo/bar", "unrelated text", None);

    assert!(result.overall_success);
    assert!(result.coverage.is_empty());
}

#[test]
fn test_empty_dimensions_produce_no_entries() {
    let result = verify_coverage("//WhileStatement", "while (true) { }", None);

    assert_eq!(result.coverage.len(), 1);
    assert_eq!(result.coverage[0].message, "Node type coverage: 1/1");
}

#[test]
fn test_missing_node_type_reported() {
    let result = verify_coverage("//SynchronizedStatement", "class A { }", None);

    assert!(!result.overall_success);
    assert_eq!(result.coverage[0].message, "Node type coverage: 0/1");
    assert_eq!(
        result.coverage[0].evidence[0].description,
        "Missing:\n  - SynchronizedStatement"
    );
}

#[test]
fn test_verification_is_idempotent() {
    let first = verify_coverage(COVERED_EXPRESSION, COVERED_EXAMPLES, None);
    let second = verify_coverage(COVERED_EXPRESSION, COVERED_EXAMPLES, None);

    assert_eq!(first, second);
}

#[test]
fn test_found_count_never_exceeds_required() {
    let evidence = CoverageEvidence::new(Dimension::Operator, 5, 2, String::new());

    assert_eq!(evidence.count_found, 2);
    assert_eq!(evidence.count_required, 2);
    assert!(evidence.is_complete());
}

#[test]
fn test_conjunction_missing_keyword_reported() {
    let expression = "//FieldDeclaration[@Final = true() and @Static = true()]";
    let result = verify_coverage(expression, "final int x = 1; // violation", None);

    assert!(!result.overall_success);
    assert_eq!(
        result.uncovered_branches,
        vec!["Conjunction missing 'static' keyword in examples"]
    );
    let conditional = result.coverage.last().unwrap();
    assert_eq!(conditional.message, "Conditional coverage: 0/1");
    assert!(!conditional.success);
}

#[test]
fn test_structural_override_rescues_failed_conjunction() {
    let expression = "//FieldDeclaration[@Xyz = 1 and @Qrs = 2]";
    let examples = "final int x = 1; // violation\nint y = 2; // no violation";
    let result = verify_coverage(expression, examples, None);

    let conditional = result.coverage.last().unwrap();
    assert_eq!(conditional.message, "Conditional coverage: 1/1");
    assert!(conditional.success);
    assert!(result.uncovered_branches.is_empty());
}

#[test]
fn test_override_needs_a_valid_case() {
    let expression = "//FieldDeclaration[@Xyz = 1 and @Qrs = 2]";
    let examples = "final int x = 1; // violation";
    let result = verify_coverage(expression, examples, None);

    let conditional = result.coverage.last().unwrap();
    assert_eq!(conditional.message, "Conditional coverage: 0/1");
    assert_eq!(result.uncovered_branches.len(), 1);
}

#[test]
fn test_disjunction_fails_even_with_fallback_text() {
    let expression = "//IfStatement[@Depth = 1 or @Depth = 2]";
    let examples = "if (a == 1) { } // violation\n// Depth: 1";
    let result = verify_coverage(expression, examples, None);

    assert!(!result.overall_success);
    assert_eq!(result.uncovered_branches.len(), 1);
    assert!(
        result.uncovered_branches[0]
            .contains("Coverage check not implemented for disjunction conditionals")
    );
}

#[test]
fn test_unimplemented_verdict_is_deterministic() {
    let expression = "//IfStatement[@Depth = 1 or @Depth = 2]";
    let examples = "if (a == 1) { } // violation\n// Depth: 1";

    let first = verify_coverage(expression, examples, None);
    let second = verify_coverage(expression, examples, None);
    assert_eq!(first.uncovered_branches, second.uncovered_branches);
}

#[test]
fn test_locator_annotates_missing_features() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<?xml version="1.0"?>
<ruleset name="sync">
  <rule name="NoSync" language="java" message="no sync">
    <properties>
      <property name="xpath">
        <value>//SynchronizedStatement</value>
      </property>
    </properties>
    <example>class A {{ }}</example>
  </rule>
</ruleset>"#
    )
    .unwrap();

    let ruleset = RuleSet::load(file.path()).unwrap();
    let rule = &ruleset.rules[0];
    let locator = LocatorContext::new(&ruleset.path, &rule.xpath);
    let result = verify_coverage(&rule.xpath, &rule.aggregated_examples(), Some(&locator));

    assert!(!result.overall_success);
    assert_eq!(
        result.coverage[0].evidence[0].description,
        "Missing:\n  - SynchronizedStatement (line 6)"
    );
    assert!(result.covered_line_numbers.contains(&6));
}
