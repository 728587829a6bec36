//! Application logic for the coverage checker CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

use std::{
    collections::BTreeSet,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration
};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::{
    cli::Format,
    config::{Config, EngineConfig},
    coverage::{LocatorContext, verify_coverage},
    engine::{compare_labels, run_engine},
    error::{AppResult, config_error, file_read_error, file_write_error},
    lcov,
    output::{OutputFormat, OutputOptions, RuleVerification, format_verifications},
    ruledef::{RuleDefinition, RuleSet},
    testgen,
    xpath::{FeatureSet, analyze_expression}
};

/// Parameters for the check command
#[derive(Debug, Clone)]
pub struct CheckParams {
    pub ruleset:       PathBuf,
    pub rule:          Option<String>,
    pub run_engine:    bool,
    pub engine_bin:    Option<String>,
    pub timeout:       Option<u64>,
    pub lcov:          Option<PathBuf>,
    pub output_format: Format,
    pub dry_run:       bool,
    pub verbose:       bool,
    pub no_color:      bool
}

/// Result of a check run
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub exit_code: i32,
    pub report:    String
}

/// Convert CLI format to internal OutputFormat
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Calculate exit code from per-rule verdicts
pub fn calculate_exit_code(results: &[RuleVerification], fail_on_uncovered: bool) -> i32 {
    if !fail_on_uncovered || results.iter().all(|r| r.passed()) {
        0
    } else {
        1
    }
}

/// Read a ruleset from file or stdin
pub fn read_ruleset_input(path: &Path) -> AppResult<RuleSet> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        RuleSet::parse(&buffer, PathBuf::from("<stdin>"))
    } else {
        RuleSet::load(path)
    }
}

/// Merge CLI engine overrides into the configured engine settings
pub fn effective_engine_config(
    config: &Config,
    engine_bin: Option<String>,
    timeout: Option<u64>
) -> EngineConfig {
    EngineConfig {
        binary:       engine_bin.or_else(|| config.engine.binary.clone()),
        timeout_secs: timeout.unwrap_or(config.engine.timeout_secs)
    }
}

/// Select the rules to check, honoring the optional name filter
pub fn select_rules<'a>(ruleset: &'a RuleSet, filter: Option<&str>) -> Vec<&'a RuleDefinition> {
    ruleset
        .xpath_rules()
        .filter(|rule| filter.is_none_or(|name| rule.name.as_str() == name))
        .collect()
}

/// Render the extracted structure of one rule for dry-run output
pub fn format_structure_summary(rule: &RuleDefinition) -> String {
    let structure = analyze_expression(&rule.xpath);
    let mut out = format!("Rule '{}'\n", rule.name);
    out.push_str(&format!(
        "  node types: {}\n",
        format_features(&structure.node_types)
    ));
    out.push_str(&format!(
        "  attributes: {}\n",
        format_features(&structure.attributes)
    ));
    out.push_str(&format!(
        "  operators:  {}\n",
        format_features(&structure.operators)
    ));
    out.push_str(&format!("  conditionals: {}\n", structure.conditionals.len()));
    for conditional in &structure.conditionals {
        out.push_str(&format!(
            "    - {}: {}\n",
            conditional.kind, conditional.expression
        ));
    }
    out
}

fn format_features(features: &FeatureSet) -> String {
    if features.is_empty() {
        return "(none)".to_string();
    }
    features
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Verify coverage for the selected rules in parallel
pub fn verify_rules(ruleset: &RuleSet, rules: &[&RuleDefinition]) -> Vec<RuleVerification> {
    rules
        .par_iter()
        .map(|rule| {
            let locator = LocatorContext::new(&ruleset.path, &rule.xpath);
            let coverage =
                verify_coverage(&rule.xpath, &rule.aggregated_examples(), Some(&locator));
            RuleVerification {
                rule: rule.name.to_string(),
                coverage,
                engine: None
            }
        })
        .collect()
}

/// Run the external engine per rule and attach label comparisons
pub async fn run_engine_checks(
    engine_config: &EngineConfig,
    ruleset: &RuleSet,
    rules: &[&RuleDefinition],
    results: &mut [RuleVerification]
) -> AppResult<()> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    for (rule, result) in rules.iter().zip(results.iter_mut()) {
        if !rule.has_examples() {
            continue;
        }
        pb.set_message(format!("Running engine for rule '{}'...", rule.name));
        let sources = testgen::synthesize(&rule.name, &rule.examples)?;
        let report = run_engine(engine_config, &ruleset.path, sources.dir_path()).await?;
        result.engine = Some(compare_labels(&report, &rule.name, &sources.files));
    }
    pb.finish_and_clear();
    Ok(())
}

/// Write an LCOV trace of covered ruleset lines
pub fn write_lcov(path: &Path, ruleset: &RuleSet, results: &[RuleVerification]) -> AppResult<()> {
    let mut lines = BTreeSet::new();
    for result in results {
        lines.extend(result.coverage.covered_line_numbers.iter().copied());
    }
    let entries = vec![(ruleset.path.clone(), lines)];
    fs::write(path, lcov::render_report(&entries))
        .map_err(|e| file_write_error(&path.display().to_string(), e))
}

/// Run the check command
pub async fn run_check(params: CheckParams, config: Config) -> AppResult<CheckOutcome> {
    if params.run_engine && params.ruleset.to_str() == Some("-") {
        return Err(config_error(
            "--run-engine requires a ruleset file path, not stdin"
        ));
    }
    let ruleset = read_ruleset_input(&params.ruleset)?;
    let rules = select_rules(&ruleset, params.rule.as_deref());
    if rules.is_empty() {
        if let Some(name) = &params.rule {
            return Err(config_error(format!(
                "No XPath rule named '{}' in ruleset '{}'",
                name, ruleset.name
            )));
        }
    }
    let rules: Vec<&RuleDefinition> = if config.coverage.require_examples {
        rules
    } else {
        rules.into_iter().filter(|rule| rule.has_examples()).collect()
    };

    if params.dry_run {
        let mut report = String::from("=== Extracted XPath structure ===\n");
        for rule in &rules {
            report.push('\n');
            report.push_str(&format_structure_summary(rule));
        }
        return Ok(CheckOutcome {
            exit_code: 0,
            report
        });
    }

    let mut results = verify_rules(&ruleset, &rules);
    if params.run_engine {
        let engine_config = effective_engine_config(&config, params.engine_bin, params.timeout);
        run_engine_checks(&engine_config, &ruleset, &rules, &mut results).await?;
    }
    if let Some(lcov_path) = &params.lcov {
        write_lcov(lcov_path, &ruleset, &results)?;
    }
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    let report = format_verifications(&results, &output_opts);
    let exit_code = calculate_exit_code(&results, config.coverage.fail_on_uncovered);
    Ok(CheckOutcome {
        exit_code,
        report
    })
}
