// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;

use xpath_rule_coverage::{
    coverage::{CoverageEvidence, CoverageResult, Dimension, XPathCoverageResult},
    engine::LabelComparison,
    output::{OutputFormat, OutputOptions, RuleVerification, format_verifications}
};

fn plain_options(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        colored: false,
        verbose: false
    }
}

fn passing_coverage() -> XPathCoverageResult {
    XPathCoverageResult {
        coverage:             vec![CoverageResult::passed(
            "Node type coverage: 1/1",
            vec![CoverageEvidence::new(Dimension::NodeType, 1, 1, String::new())]
        )],
        overall_success:      true,
        uncovered_branches:   Vec::new(),
        covered_line_numbers: BTreeSet::new()
    }
}

fn failing_coverage() -> XPathCoverageResult {
    XPathCoverageResult {
        coverage:             vec![CoverageResult::failed(
            "Attribute coverage: 0/1",
            vec![CoverageEvidence::new(
                Dimension::Attribute,
                0,
                1,
                "Missing:\n  - @Static (line 9)".to_string()
            )]
        )],
        overall_success:      false,
        uncovered_branches:   vec![
            "Conjunction missing 'static' keyword in examples (line 9)".to_string(),
        ],
        covered_line_numbers: BTreeSet::from([9])
    }
}

fn verification(rule: &str, coverage: XPathCoverageResult) -> RuleVerification {
    RuleVerification {
        rule: rule.to_string(),
        coverage,
        engine: None
    }
}

#[test]
fn test_text_output_pass() {
    let results = vec![verification("AvoidDeepWhile", passing_coverage())];
    let output = format_verifications(&results, &plain_options(OutputFormat::Text));

    assert!(output.contains("=== XPath Rule Coverage ==="));
    assert!(output.contains("Rule 'AvoidDeepWhile': PASS"));
    assert!(output.contains("Node type coverage: 1/1"));
    assert!(output.contains("1/1 rules fully covered"));
}

#[test]
fn test_text_output_fail_lists_gaps() {
    let results = vec![verification("NoStaticFinal", failing_coverage())];
    let output = format_verifications(&results, &plain_options(OutputFormat::Text));

    assert!(output.contains("Rule 'NoStaticFinal': FAIL"));
    assert!(output.contains("    Missing:\n      - @Static (line 9)"));
    assert!(output.contains("  Uncovered branches:"));
    assert!(output.contains("    - Conjunction missing 'static' keyword in examples (line 9)"));
    assert!(output.contains("0/1 rules fully covered"));
}

#[test]
fn test_text_output_mixed_summary() {
    let results = vec![
        verification("First", passing_coverage()),
        verification("Second", failing_coverage()),
    ];
    let output = format_verifications(&results, &plain_options(OutputFormat::Text));

    assert!(output.contains("1/2 rules fully covered"));
}

#[test]
fn test_json_output_round_trips() {
    let results = vec![verification("AvoidDeepWhile", passing_coverage())];
    let output = format_verifications(&results, &plain_options(OutputFormat::Json));

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["rule"], "AvoidDeepWhile");
    assert_eq!(parsed[0]["coverage"]["overall_success"], true);
    assert!(parsed[0].get("engine").is_none());
}

#[test]
fn test_json_output_includes_engine_when_present() {
    let mut result = verification("R", passing_coverage());
    result.engine = Some(vec![LabelComparison {
        file:     "RExample0.java".to_string(),
        expected: vec![1],
        actual:   vec![1]
    }]);
    let output = format_verifications(&[result], &plain_options(OutputFormat::Json));

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["engine"][0]["file"], "RExample0.java");
}

#[test]
fn test_yaml_output() {
    let results = vec![verification("AvoidDeepWhile", passing_coverage())];
    let output = format_verifications(&results, &plain_options(OutputFormat::Yaml));

    assert!(output.contains("rule: AvoidDeepWhile"));
    assert!(output.contains("overall_success: true"));
}

#[test]
fn test_engine_summary_match() {
    let mut result = verification("R", passing_coverage());
    result.engine = Some(vec![LabelComparison {
        file:     "RExample0.java".to_string(),
        expected: vec![1],
        actual:   vec![1]
    }]);
    let output = format_verifications(&[result], &plain_options(OutputFormat::Text));

    assert!(output.contains("Engine labels: match (1 files checked)"));
}

#[test]
fn test_engine_summary_mismatch_details() {
    let mut result = verification("R", passing_coverage());
    result.engine = Some(vec![LabelComparison {
        file:     "RExample0.java".to_string(),
        expected: vec![1],
        actual:   vec![2]
    }]);
    let output = format_verifications(&[result], &plain_options(OutputFormat::Text));

    assert!(output.contains("Rule 'R': FAIL"));
    assert!(output.contains("Engine labels: MISMATCH"));
    assert!(output.contains("RExample0.java: expected lines [1], engine flagged [2]"));
}

#[test]
fn test_verbose_engine_summary_confirms_matches() {
    let mut result = verification("R", passing_coverage());
    result.engine = Some(vec![LabelComparison {
        file:     "RExample0.java".to_string(),
        expected: vec![1],
        actual:   vec![1]
    }]);
    let opts = OutputOptions {
        format:  OutputFormat::Text,
        colored: false,
        verbose: true
    };
    let output = format_verifications(&[result], &opts);

    assert!(output.contains("RExample0.java: lines [1] confirmed"));
}

#[test]
fn test_passed_requires_both_coverage_and_engine() {
    let clean = verification("R", passing_coverage());
    assert!(clean.passed());

    let mut engine_mismatch = verification("R", passing_coverage());
    engine_mismatch.engine = Some(vec![LabelComparison {
        file:     "RExample0.java".to_string(),
        expected: vec![1],
        actual:   Vec::new()
    }]);
    assert!(!engine_mismatch.passed());

    let coverage_gap = verification("R", failing_coverage());
    assert!(!coverage_gap.passed());
}

#[test]
fn test_default_options() {
    let opts = OutputOptions::default();

    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
    assert!(!opts.verbose);
}
