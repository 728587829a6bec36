use colored::Colorize;
use serde::Serialize;

use crate::{coverage::XPathCoverageResult, engine::LabelComparison};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Verification outcome for one rule
#[derive(Debug, Serialize)]
pub struct RuleVerification {
    /// Rule name from the ruleset
    pub rule:     String,
    /// Coverage verdict for the rule's expression
    pub coverage: XPathCoverageResult,
    /// Violation-label comparison, present when the engine ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine:   Option<Vec<LabelComparison>>
}

impl RuleVerification {
    /// Coverage passed and, when the engine ran, every label matched.
    pub fn passed(&self) -> bool {
        self.coverage.overall_success
            && self
                .engine
                .as_ref()
                .is_none_or(|comparisons| comparisons.iter().all(LabelComparison::matches))
    }
}

/// Format verification results based on output options
pub fn format_verifications(results: &[RuleVerification], opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(results).unwrap_or_default(),
        OutputFormat::Text => format_text(results, opts)
    }
}

fn format_text(results: &[RuleVerification], opts: &OutputOptions) -> String {
    let mut output = String::new();
    if opts.colored {
        output.push_str(&"=== XPath Rule Coverage ===\n\n".bold().to_string());
    } else {
        output.push_str("=== XPath Rule Coverage ===\n\n");
    }

    for result in results {
        output.push_str(&format_rule(result, opts));
        output.push('\n');
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    let summary = format!("{passed}/{} rules fully covered\n", results.len());
    if opts.colored {
        if passed == results.len() {
            output.push_str(&summary.green().to_string());
        } else {
            output.push_str(&summary.yellow().to_string());
        }
    } else {
        output.push_str(&summary);
    }
    output
}

fn format_rule(result: &RuleVerification, opts: &OutputOptions) -> String {
    let mut section = String::new();
    let verdict = if result.passed() { "PASS" } else { "FAIL" };
    let header = format!("Rule '{}': {verdict}", result.rule);
    if opts.colored {
        let colored_header = if result.passed() {
            header.green().bold().to_string()
        } else {
            header.red().bold().to_string()
        };
        section.push_str(&colored_header);
    } else {
        section.push_str(&header);
    }
    section.push('\n');

    for dimension in &result.coverage.coverage {
        section.push_str(&format!("  {}\n", dimension.message));
        for evidence in &dimension.evidence {
            if evidence.description.is_empty() {
                continue;
            }
            section.push_str(&indent(&evidence.description, "    "));
            section.push('\n');
        }
    }

    if !result.coverage.uncovered_branches.is_empty() {
        section.push_str("  Uncovered branches:\n");
        for branch in &result.coverage.uncovered_branches {
            section.push_str(&format!("    - {branch}\n"));
        }
    }

    if let Some(comparisons) = &result.engine {
        section.push_str(&format_engine_summary(comparisons, opts.verbose));
    }
    section
}

fn format_engine_summary(comparisons: &[LabelComparison], verbose: bool) -> String {
    let mut summary = String::new();
    let mismatches: Vec<&LabelComparison> =
        comparisons.iter().filter(|c| !c.matches()).collect();
    if mismatches.is_empty() {
        summary.push_str(&format!(
            "  Engine labels: match ({} files checked)\n",
            comparisons.len()
        ));
    } else {
        summary.push_str("  Engine labels: MISMATCH\n");
        for comparison in &mismatches {
            summary.push_str(&format!(
                "    {}: expected lines {:?}, engine flagged {:?}\n",
                comparison.file, comparison.expected, comparison.actual
            ));
        }
    }
    if verbose {
        for comparison in comparisons {
            if comparison.matches() {
                summary.push_str(&format!(
                    "    {}: lines {:?} confirmed\n",
                    comparison.file, comparison.actual
                ));
            }
        }
    }
    summary
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
