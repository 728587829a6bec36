//! External static-analysis engine invocation.
//!
//! Runs the PMD-compatible engine over synthesized example sources and
//! decodes its JSON report, so annotated expectations can be compared
//! with real violations instead of trusting the annotations alone.
//!
//! # Exit Codes
//!
//! | Code | Meaning | Treated as |
//! |------|---------|------------|
//! | 0 | clean run, no violations | success |
//! | 4 | violations found | success |
//! | other | configuration or processing error | failure |
//!
//! # Report Shape
//!
//! Only the fields the comparison needs are decoded; everything else in
//! the report is ignored so format additions never break the read:
//!
//! ```json
//! {"files": [{"filename": "...", "violations": [{"beginline": 3, "rule": "..."}]}]}
//! ```

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::{process::Command, time::timeout};

use crate::{
    config::EngineConfig,
    error::{AppResult, engine_error, report_parse_error},
    ruledef,
    testgen::GeneratedFile
};

/// Exit codes for a completed analysis run.
const SUCCESS_CODES: [i32; 2] = [0, 4];

/// One violation from the engine report.
#[derive(Debug, Clone)]
pub struct EngineViolation {
    /// Reported file path
    pub file: String,
    /// Rule that fired
    pub rule: String,
    /// 1-based begin line
    pub line: usize
}

/// Flattened engine report.
#[derive(Debug, Clone, Default)]
pub struct EngineReport {
    pub violations: Vec<EngineViolation>
}

#[derive(Deserialize)]
struct RawReport {
    #[serde(default)]
    files: Vec<RawFile>
}

#[derive(Deserialize)]
struct RawFile {
    #[serde(default)]
    filename:   String,
    #[serde(default)]
    violations: Vec<RawViolation>
}

#[derive(Deserialize)]
struct RawViolation {
    #[serde(default, alias = "beginline")]
    begin_line: usize,
    #[serde(default)]
    rule:       String
}

impl EngineReport {
    /// Decode a JSON report, tolerating absent fields.
    pub fn parse(json: &str) -> AppResult<Self> {
        let raw: RawReport =
            serde_json::from_str(json).map_err(|e| report_parse_error(e.to_string()))?;
        let violations = raw
            .files
            .into_iter()
            .flat_map(|file| {
                let filename = file.filename;
                file.violations
                    .into_iter()
                    .map(move |violation| EngineViolation {
                        file: filename.clone(),
                        rule: violation.rule,
                        line: violation.begin_line
                    })
            })
            .collect();
        Ok(Self {
            violations
        })
    }

    /// Violation lines a rule produced in one file, sorted and deduplicated.
    pub fn lines_for_file(&self, file_name: &str, rule: &str) -> Vec<usize> {
        let mut lines: Vec<usize> = self
            .violations
            .iter()
            .filter(|violation| violation.file.ends_with(file_name) && violation.rule == rule)
            .map(|violation| violation.line)
            .collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

/// Run the engine over a source directory with one ruleset.
pub async fn run_engine(
    config: &EngineConfig,
    ruleset: &Path,
    sources: &Path
) -> AppResult<EngineReport> {
    let binary = config.binary.as_deref().unwrap_or("pmd");
    let mut command = Command::new(binary);
    command
        .arg("check")
        .arg("--dir")
        .arg(sources)
        .arg("--rulesets")
        .arg(ruleset)
        .arg("--format")
        .arg("json")
        .arg("--no-progress");

    let output = timeout(Duration::from_secs(config.timeout_secs), command.output())
        .await
        .map_err(|_| engine_error(format!("Engine timed out after {}s", config.timeout_secs)))?
        .map_err(|e| engine_error(format!("Failed to run engine '{binary}': {e}")))?;

    let code = output.status.code().unwrap_or(-1);
    if !SUCCESS_CODES.contains(&code) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(engine_error(format!(
            "Engine exited with code {code}: {}",
            stderr.trim()
        )));
    }
    EngineReport::parse(&String::from_utf8_lossy(&output.stdout))
}

/// Annotated expectations versus the engine's verdicts for one file.
#[derive(Debug, Clone, Serialize)]
pub struct LabelComparison {
    /// Synthesized file name
    pub file:     String,
    /// Lines annotated `// violation` in the written source
    pub expected: Vec<usize>,
    /// Lines the engine actually flagged
    pub actual:   Vec<usize>
}

impl LabelComparison {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

/// Compare every synthesized file's annotations against the report.
pub fn compare_labels(
    report: &EngineReport,
    rule_name: &str,
    files: &[GeneratedFile]
) -> Vec<LabelComparison> {
    files
        .iter()
        .map(|file| {
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let expected = ruledef::example_violation_lines(&file.text);
            let actual = report.lines_for_file(&name, rule_name);
            LabelComparison {
                file: name,
                expected,
                actual
            }
        })
        .collect()
}
