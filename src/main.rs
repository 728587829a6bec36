//! # XPath Rule Coverage
//!
//! Coverage verification for XPath-based static-analysis rules.
//!
//! `xpath-rule-coverage` checks that the worked examples bundled with an
//! XPath rule definition actually exercise every structural feature the
//! rule's query tests for, and maps any gap back to the exact line of the
//! ruleset XML for human review.
//!
//! # Architecture
//!
//! Verification runs in three phases:
//!
//! 1. **Structural Analysis** (always runs) - Regex passes extract node
//!    types, attributes, operators, and conditional clauses from each rule's
//!    XPath expression.
//!
//! 2. **Coverage Verification** (always runs) - Dimension checkers match
//!    every extracted feature against the rule's aggregated example code, in
//!    parallel across rules using [`rayon`]. Missing features are annotated
//!    with their ruleset line via a three-tier locator.
//!
//! 3. **Engine Cross-Check** (optional) - With `--run-engine`, examples are
//!    wrapped into compilable sources and the external engine's violation
//!    lines are compared against the `// violation` annotations.
//!
//! # Quick Start
//!
//! ```bash
//! # Check every XPath rule in a ruleset
//! xpath-rule-coverage check -r ruleset.xml
//!
//! # CI integration with JSON output and line-coverage export
//! xpath-rule-coverage check -r ruleset.xml -f json --lcov coverage.lcov
//!
//! # Stream a ruleset from stdin
//! cat ruleset.xml | xpath-rule-coverage check -r -
//!
//! # Cross-check violation labels against the real engine
//! export XPATH_COVERAGE_ENGINE=/opt/pmd/bin/pmd
//! xpath-rule-coverage check -r ruleset.xml --run-engine
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`XPATH_COVERAGE_ENGINE`,
//!    `XPATH_COVERAGE_ENGINE_TIMEOUT`)
//! 3. `.xpath-coverage.toml` in current directory
//! 4. `~/.config/xpath-rule-coverage/config.toml`
//!
//! ## Example Configuration
//!
//! ```toml
//! [engine]
//! binary = "/opt/pmd/bin/pmd"
//! timeout_secs = 120
//!
//! [coverage]
//! fail_on_uncovered = true
//! require_examples = false
//! ```
//!
//! # Coverage Dimensions
//!
//! Each rule's expression is decomposed into four dimensions, and every
//! non-empty dimension must be fully demonstrated by the rule's examples:
//!
//! | Dimension | Extracted from | Demonstrated by |
//! |-----------|----------------|-----------------|
//! | Node type | `WhileStatement`, `//MethodCall`, ... | Matching source construct |
//! | Attribute | `@Final`, `@MethodName`, ... | Keyword or annotation comment |
//! | Operator | `>`, `!=`, `div`, ... | Operator text in an example |
//! | Conditional | `and`/`or`/`not(...)` clauses | Per-kind strategy |
//!
//! # Exit Codes
//!
//! - `0` - Every checked rule is fully covered
//! - `1` - Coverage gaps or engine label mismatches found
//! - `2` - Hard error (unreadable input, invalid ruleset, engine failure)
//!
//! # Output Formats
//!
//! - `text` - Human-readable colored output (default)
//! - `json` - Structured JSON for programmatic processing
//! - `yaml` - YAML for pipeline consumption
//!
//! # Modules
//!
//! - `xpath` - Structural analysis of XPath expressions
//! - `coverage` - Dimension checkers, conditional strategies, line locator
//! - `ruledef` - Ruleset XML parsing and example extraction
//! - `testgen` - Compilable source synthesis from examples
//! - `engine` - External engine invocation and report decoding
//! - `lcov` - Line-coverage export for the ruleset file
//! - `config` - Configuration loading and validation
//! - `output` - Result formatting for various output formats
//! - `cache` - Rule-file text cache for the line locator
//! - `error` - Error types and constructors

use std::process;

use clap::Parser;
use tokio::main;
use xpath_rule_coverage::{
    app::{CheckParams, run_check},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};

#[main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Check {
            ruleset,
            rule,
            run_engine,
            engine_bin,
            timeout,
            lcov,
            output_format,
            dry_run,
            verbose,
            no_color
        } => {
            let outcome = run_check(
                CheckParams {
                    ruleset,
                    rule,
                    run_engine,
                    engine_bin,
                    timeout,
                    lcov,
                    output_format,
                    dry_run,
                    verbose,
                    no_color
                },
                config
            )
            .await?;
            println!("{}", outcome.report);
            Ok(outcome.exit_code)
        }
    }
}
