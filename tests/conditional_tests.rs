// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use xpath_rule_coverage::{
    coverage::{
        check_conditional, comparison_strategy, conjunction_strategy, negation_strategy,
        split_top_level
    },
    xpath::{Conditional, ConditionalKind}
};

fn conditional(kind: ConditionalKind, expression: &str) -> Conditional {
    Conditional {
        kind,
        expression: expression.to_string(),
        position: 0
    }
}

#[test]
fn test_comparison_passes_with_two_distinct_values() {
    let cond = conditional(ConditionalKind::Comparison, "@Depth > 2");
    let text = "while (a) { } // Depth: 3\nwhile (b) { } // Depth: 1";

    let result = comparison_strategy(&cond, text);
    assert!(result.success);
    assert!(result.message.contains("2 distinct values"));
}

#[test]
fn test_comparison_fails_with_one_value() {
    let cond = conditional(ConditionalKind::Comparison, "@Depth > 2");
    let text = "while (a) { } // Depth: 3\nwhile (b) { } // Depth: 3";

    let result = comparison_strategy(&cond, text);
    assert!(!result.success);
    assert!(
        result
            .message
            .contains("needs at least two distinct values for @Depth, found 1")
    );
    assert_eq!(result.evidence[0].count_found, 1);
    assert_eq!(result.evidence[0].count_required, 2);
}

#[test]
fn test_comparison_without_attributes_fails() {
    let cond = conditional(ConditionalKind::Comparison, "3 > 2");

    let result = comparison_strategy(&cond, "three is more than two");
    assert!(!result.success);
    assert!(result.message.contains("No attributes found"));
}

#[test]
fn test_annotation_names_match_case_insensitively() {
    let cond = conditional(ConditionalKind::Comparison, "@Depth > 2");
    let text = "x // depth: 3\ny // DEPTH: 1";

    let result = comparison_strategy(&cond, text);
    assert!(result.success);
}

#[test]
fn test_conjunction_shortcut_passes() {
    let cond =
        conditional(ConditionalKind::Conjunction, "@Final = true() and @Static = true()");

    let result = conjunction_strategy(&cond, "static final int x = 1;");
    assert!(result.success);
}

#[test]
fn test_conjunction_shortcut_names_missing_keyword() {
    let cond =
        conditional(ConditionalKind::Conjunction, "@Final = true() and @Static = true()");

    let result = conjunction_strategy(&cond, "final int x = 1;");
    assert!(!result.success);
    assert_eq!(result.message, "Conjunction missing 'static' keyword in examples");
}

#[test]
fn test_conjunction_splits_and_checks_each_clause() {
    let cond =
        conditional(ConditionalKind::Conjunction, "@Name = 'count' and .//ReturnStatement");

    let result = conjunction_strategy(&cond, "int count; return count;");
    assert!(result.success);
}

#[test]
fn test_conjunction_lists_failed_clauses() {
    let cond =
        conditional(ConditionalKind::Conjunction, "@Name = 'missing' and .//ReturnStatement");

    let result = conjunction_strategy(&cond, "return 1;");
    assert!(!result.success);
    assert_eq!(result.message, "Conjunction clauses not demonstrated: @Name = 'missing'");
    assert_eq!(result.evidence[0].count_found, 1);
    assert_eq!(result.evidence[0].count_required, 2);
    assert!(result.evidence[0].description.contains("@Name = 'missing'"));
}

#[test]
fn test_split_top_level_respects_quotes() {
    let clauses = split_top_level("@A = 'x and y' and @B", "and");

    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0], "@A = 'x and y'");
    assert_eq!(clauses[1], "@B");
}

#[test]
fn test_split_top_level_respects_brackets() {
    let clauses = split_top_level("ancestor::Field[@A and @B] and @C", "and");

    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0], "ancestor::Field[@A and @B]");
    assert_eq!(clauses[1], "@C");
}

#[test]
fn test_split_ignores_keyword_inside_words() {
    let clauses = split_top_level("@Sandbox and @B", "and");

    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0], "@Sandbox");
}

#[test]
fn test_negation_via_surviving_keyword() {
    let cond = conditional(ConditionalKind::Negation, "not(@Synchronized = true())");

    let result = negation_strategy(&cond, "synchronized void m() { }");
    assert!(result.success);
    assert!(result.message.contains("via keyword 'synchronized'"));
}

#[test]
fn test_negation_without_keyword_fails() {
    let cond = conditional(ConditionalKind::Negation, "not(ancestor::TryStatement)");

    let result = negation_strategy(&cond, "class A { }");
    assert!(!result.success);
    assert!(result.message.contains("not demonstrated by examples"));
}

#[test]
fn test_negation_static_final_shortcut() {
    let cond =
        conditional(ConditionalKind::Negation, "not(ancestor::Field[@Static and @Final])");

    let covered = negation_strategy(&cond, "static final int x = 1;");
    assert!(covered.success);

    let uncovered = negation_strategy(&cond, "int x = 1;");
    assert!(!uncovered.success);
    assert!(uncovered.message.contains("needs a static final field example"));
}

#[test]
fn test_unimplemented_kinds_fail_without_fallback() {
    // Corpus contains the bare word "if", which rescues implemented kinds.
    let text = "if (x) { }";
    let kinds = [
        ConditionalKind::Disjunction,
        ConditionalKind::IfExpression,
        ConditionalKind::Quantified,
        ConditionalKind::BooleanFunction
    ];

    for kind in kinds {
        let result = check_conditional(&conditional(kind, "@A or @B"), text);
        assert!(!result.success);
        assert!(result.message.contains("Coverage check not implemented for"));
    }
}

#[test]
fn test_fallback_rescues_verbatim_clause() {
    let cond = conditional(ConditionalKind::Comparison, "@Weird > 5");

    let result = check_conditional(&cond, "the predicate @weird > 5 appears here");
    assert!(result.success);
    assert!(result.message.contains("demonstrated textually"));
}

#[test]
fn test_fallback_rescues_on_bare_if() {
    let cond = conditional(ConditionalKind::Comparison, "@Weird > 5");

    let result = check_conditional(&cond, "if (a) { b(); }");
    assert!(result.success);
}

#[test]
fn test_unrecognized_form_fails() {
    let cond = conditional(ConditionalKind::Other, "mystery clause");

    let result = check_conditional(&cond, "unrelated text");
    assert!(!result.success);
    assert!(result.message.contains("Unrecognized conditional form"));
}
